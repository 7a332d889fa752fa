//! # ドメイン例外
//!
//! ビジネスロジックが意図的に送出する例外。
//! 例外自身が [`ErrorInfo`] を持ち、Gateway はそれを加工せずにそのままレスポンスにする。
//!
//! ## 使用例
//!
//! ```rust
//! use base_api_domain::AppException;
//! use base_api_shared::ErrorInfo;
//!
//! fn reserve(stock: u32) -> Result<(), AppException> {
//!     if stock == 0 {
//!         return Err(AppException::failed("在庫がありません"));
//!     }
//!     Ok(())
//! }
//!
//! let err = reserve(0).unwrap_err();
//! assert_eq!(err.error().code(), ErrorInfo::FAILED.code());
//! ```

use base_api_shared::ErrorInfo;
use thiserror::Error;

/// カタログのエラー情報を持つドメイン例外
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct AppException {
   error: ErrorInfo,
}

impl AppException {
   pub fn new(error: ErrorInfo) -> Self {
      Self { error }
   }

   /// [`ErrorInfo::FAILED`] にメッセージを付けた例外
   pub fn failed(message: impl Into<String>) -> Self {
      Self::new(ErrorInfo::FAILED.with_message(message))
   }

   /// [`ErrorInfo::NOT_FOUND`] にメッセージを付けた例外
   pub fn not_found(message: impl Into<String>) -> Self {
      Self::new(ErrorInfo::NOT_FOUND.with_message(message))
   }

   /// [`ErrorInfo::UNAUTHORIZED`]
   pub fn unauthorized() -> Self {
      Self::new(ErrorInfo::UNAUTHORIZED)
   }

   /// 例外が運ぶエラー情報
   pub fn error(&self) -> &ErrorInfo {
      &self.error
   }

   pub fn into_error(self) -> ErrorInfo {
      self.error
   }
}

impl From<ErrorInfo> for AppException {
   fn from(error: ErrorInfo) -> Self {
      Self::new(error)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_failedはfailedのcodeとstatusを持つ() {
      let exception = AppException::failed("在庫がありません");

      assert_eq!(exception.error().code(), ErrorInfo::FAILED.code());
      assert_eq!(
         exception.error().http_status(),
         ErrorInfo::FAILED.http_status()
      );
      assert_eq!(exception.error().message(), Some("在庫がありません"));
   }

   #[test]
   fn test_error_infoから変換しても内容は変わらない() {
      let exception = AppException::from(ErrorInfo::NOT_FOUND);

      assert_eq!(exception.into_error(), ErrorInfo::NOT_FOUND);
   }

   #[test]
   fn test_displayはエラー情報を表示する() {
      let exception = AppException::unauthorized();

      assert_eq!(
         exception.to_string(),
         "[1002] unauthorized: authentication required"
      );
   }
}
