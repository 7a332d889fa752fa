//! # エラー情報カタログ
//!
//! API が返すエラー条件を表す不変レコード [`ErrorInfo`] と、
//! ビルド時に確定する閉じたカタログ（[`ErrorInfo::OK`] など）を提供する。
//!
//! ## カタログ
//!
//! | 名前 | code | reason | HTTP ステータス |
//! |------|------|--------|-----------------|
//! | `OK` | 0 | `ok` | 200 |
//! | `FAILED` | 1 | `failed` | 400 |
//! | `REQUEST_VALIDATION_ERROR` | 1001 | `request validation error` | 422 |
//! | `UNAUTHORIZED` | 1002 | `unauthorized` | 401 |
//! | `NOT_FOUND` | 1004 | `not found` | 404 |
//! | `INTERNAL_ERROR` | 1500 | `internal error` | 500 |
//!
//! ## 使用例
//!
//! ```rust
//! use base_api_shared::ErrorInfo;
//!
//! let error = ErrorInfo::FAILED.with_message("在庫が不足しています");
//! assert_eq!(error.code(), ErrorInfo::FAILED.code());
//! assert_eq!(error.message(), Some("在庫が不足しています"));
//! ```

use std::{borrow::Cow, fmt};

/// 1 つのエラー条件を表す不変レコード
///
/// `code` / `reason` の組はカタログで固定されている。
/// メッセージだけを差し替えたい場合は [`with_message`](ErrorInfo::with_message)
/// で新しいインスタンスを作る（元のインスタンスは変更されない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
   code:        i32,
   reason:      Option<Cow<'static, str>>,
   message:     Option<Cow<'static, str>>,
   http_status: u16,
}

impl ErrorInfo {
   /// 成功
   pub const OK: Self = Self::catalog(0, "ok", "success", 200);

   /// 汎用的な失敗
   pub const FAILED: Self = Self::catalog(1, "failed", "request failed", 400);

   /// リクエストのスキーマ検証エラー
   pub const REQUEST_VALIDATION_ERROR: Self = Self::catalog(
      1001,
      "request validation error",
      "request parameters are invalid",
      422,
   );

   /// 認証が必要
   pub const UNAUTHORIZED: Self =
      Self::catalog(1002, "unauthorized", "authentication required", 401);

   /// リソースが存在しない
   pub const NOT_FOUND: Self = Self::catalog(1004, "not found", "resource not found", 404);

   /// 内部サーバーエラー
   ///
   /// 正規化されずに外側の境界まで到達したエラーに使用する。
   pub const INTERNAL_ERROR: Self =
      Self::catalog(1500, "internal error", "internal server error", 500);

   const fn catalog(
      code: i32,
      reason: &'static str,
      message: &'static str,
      http_status: u16,
   ) -> Self {
      Self {
         code,
         reason: Some(Cow::Borrowed(reason)),
         message: Some(Cow::Borrowed(message)),
         http_status,
      }
   }

   /// メッセージだけを差し替えたコピーを返す
   ///
   /// `code` / `reason` / `http_status` は元の値を引き継ぐ。
   #[must_use]
   pub fn with_message(&self, message: impl Into<String>) -> Self {
      Self {
         message: Some(Cow::Owned(message.into())),
         ..self.clone()
      }
   }

   /// メッセージと reason を差し替えたコピーを返す
   ///
   /// 重複キー違反のように、同じ `code` の中で reason を細分化したい場合に使う。
   #[must_use]
   pub fn with_message_and_reason(
      &self,
      message: impl Into<String>,
      reason: impl Into<String>,
   ) -> Self {
      Self {
         reason: Some(Cow::Owned(reason.into())),
         ..self.with_message(message)
      }
   }

   pub fn code(&self) -> i32 {
      self.code
   }

   pub fn reason(&self) -> Option<&str> {
      self.reason.as_deref()
   }

   pub fn message(&self) -> Option<&str> {
      self.message.as_deref()
   }

   /// レスポンスに使用する HTTP ステータスコード
   pub fn http_status(&self) -> u16 {
      self.http_status
   }
}

impl fmt::Display for ErrorInfo {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(
         f,
         "[{}] {}: {}",
         self.code,
         self.reason().unwrap_or("-"),
         self.message().unwrap_or("-")
      )
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case::ok(ErrorInfo::OK)]
   #[case::failed(ErrorInfo::FAILED)]
   #[case::request_validation_error(ErrorInfo::REQUEST_VALIDATION_ERROR)]
   #[case::unauthorized(ErrorInfo::UNAUTHORIZED)]
   #[case::not_found(ErrorInfo::NOT_FOUND)]
   #[case::internal_error(ErrorInfo::INTERNAL_ERROR)]
   fn test_with_messageはmessage以外を保持する(#[case] original: ErrorInfo) {
      let snapshot = original.clone();

      let replaced = original.with_message("差し替え後");

      assert_eq!(replaced.code(), original.code());
      assert_eq!(replaced.reason(), original.reason());
      assert_eq!(replaced.http_status(), original.http_status());
      assert_eq!(replaced.message(), Some("差し替え後"));
      // 元のインスタンスは変更されない
      assert_eq!(original, snapshot);
   }

   #[test]
   fn test_with_messageを繰り返しても結果は同じ() {
      let once = ErrorInfo::FAILED.with_message("boom");
      let twice = once.with_message("boom");

      assert_eq!(once, twice);
   }

   #[test]
   fn test_with_message_and_reasonはcodeとstatusを保持する() {
      let error = ErrorInfo::FAILED.with_message_and_reason("data already exists", "data exist");

      assert_eq!(error.code(), ErrorInfo::FAILED.code());
      assert_eq!(error.http_status(), ErrorInfo::FAILED.http_status());
      assert_eq!(error.reason(), Some("data exist"));
      assert_eq!(error.message(), Some("data already exists"));
   }

   #[test]
   fn test_カタログのcodeは重複しない() {
      let codes = [
         ErrorInfo::OK.code(),
         ErrorInfo::FAILED.code(),
         ErrorInfo::REQUEST_VALIDATION_ERROR.code(),
         ErrorInfo::UNAUTHORIZED.code(),
         ErrorInfo::NOT_FOUND.code(),
         ErrorInfo::INTERNAL_ERROR.code(),
      ];
      let unique: std::collections::HashSet<_> = codes.iter().collect();

      assert_eq!(unique.len(), codes.len());
   }

   #[test]
   fn test_displayにcodeとreasonとmessageが含まれる() {
      assert_eq!(
         ErrorInfo::FAILED.with_message("boom").to_string(),
         "[1] failed: boom"
      );
   }
}
