//! # Gateway エラーハンドリング
//!
//! リクエスト処理中に発生したエラーを、統一 JSON エンベロープ
//! `{code, reason, message}` と HTTP ステータスコードに変換する。
//!
//! ## 振り分け
//!
//! | エラー種別 | 変換先 |
//! |-----------|--------|
//! | `RequestValidation`（axum の Json / Query / Path リジェクション） | `REQUEST_VALIDATION_ERROR`（メッセージはカタログのまま） |
//! | `Assertion` | `FAILED`（メッセージはアサーションの文言） |
//! | `Domain`（[`AppException`]） | 例外が持つ `ErrorInfo` をそのまま使う |
//! | `Integrity`（コード `gkpj`） | `FAILED`（message: `data already exists`, reason: `data exist`） |
//! | `Integrity`（その他のコード） | 変換せず外側の境界へ送出 → `INTERNAL_ERROR` |
//! | `Internal` | `INTERNAL_ERROR`（詳細はログのみ） |
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use base_api_gateway::error::{ApiError, ensure};
//!
//! async fn handler(Json(body): Json<Value>) -> Result<Json<ApiResponse<Value>>, ApiError> {
//!     ensure(body.is_object(), "body must be a JSON object")?;
//!     Ok(Json(ApiResponse::ok(body)))
//! }
//! ```

use std::{any::type_name, convert::Infallible, fmt};

use axum::{
   Json,
   extract::{
      FromRequestParts,
      rejection::{JsonRejection, PathRejection, QueryRejection},
   },
   http::{Method, StatusCode, request::Parts},
   response::{IntoResponse, Response},
};
use base_api_domain::AppException;
use base_api_infra::IntegrityError;
use base_api_shared::{ErrorInfo, api_response::ErrorBody, observability::REQUEST_ID_HEADER};
use thiserror::Error;

/// 重複キー違反のメッセージ
const DUPLICATE_ENTRY_MESSAGE: &str = "data already exists";

/// 重複キー違反の reason
const DUPLICATE_ENTRY_REASON: &str = "data exist";

/// [`build_error_response`] に渡すエラー
///
/// カタログのエラー情報か、それ以外の任意の値のどちらか。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSubject {
   Known(ErrorInfo),
   Other(String),
}

impl From<ErrorInfo> for ErrorSubject {
   fn from(info: ErrorInfo) -> Self {
      Self::Known(info)
   }
}

impl From<String> for ErrorSubject {
   fn from(value: String) -> Self {
      Self::Other(value)
   }
}

impl From<&str> for ErrorSubject {
   fn from(value: &str) -> Self {
      Self::Other(value.to_string())
   }
}

/// エラーの原因となった例外の要約
///
/// 型名と表示文字列を保持し、`"{型名}: {表示}"` の形式でメッセージにする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
   type_name: String,
   message:   String,
}

impl ExceptionInfo {
   pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
      Self {
         type_name: type_name.into(),
         message:   message.into(),
      }
   }

   /// エラー値から作成する（型名はモジュールパスとジェネリクスを除いたもの）
   pub fn of<E: std::error::Error + ?Sized>(error: &E) -> Self {
      Self::new(short_type_name::<E>(), error.to_string())
   }

   /// `"{型名}: {表示}"`
   pub fn formatted(&self) -> String {
      format!("{}: {}", self.type_name, self.message)
   }
}

fn short_type_name<T: ?Sized>() -> &'static str {
   let full = type_name::<T>();
   let without_generics = full.split('<').next().unwrap_or(full);
   without_generics
      .rsplit("::")
      .next()
      .unwrap_or(without_generics)
}

/// エラーを起こしたリクエストの情報（ログ用）
///
/// ハンドラの引数として受け取れる（抽出は失敗しない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
   pub method:     Method,
   pub path:       String,
   pub request_id: Option<String>,
}

impl RequestContext {
   pub fn from_parts(parts: &Parts) -> Self {
      Self {
         method:     parts.method.clone(),
         path:       parts.uri.path().to_string(),
         request_id: parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
      }
   }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
   type Rejection = Infallible;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      Ok(Self::from_parts(parts))
   }
}

/// エラーレスポンスを作成する
///
/// - `error` がカタログのエラー情報で `exception` がある場合は、例外を
///   `"{型名}: {表示}"` に整形したメッセージを持つ `REQUEST_VALIDATION_ERROR` に置き換える
/// - `error` がカタログのエラー情報なら、その `http_status` で `{code, reason, message}` を返す
/// - それ以外の値は `{code: 0, reason: 値, message: 値}` を 200 OK で返す
///
/// `request` はログにのみ使用し、レスポンスには影響しない。
pub fn build_error_response(
   error: impl Into<ErrorSubject>,
   exception: Option<&ExceptionInfo>,
   request: Option<&RequestContext>,
) -> Response {
   match error.into() {
      ErrorSubject::Known(info) => {
         let info = match exception {
            Some(exception) => {
               ErrorInfo::REQUEST_VALIDATION_ERROR.with_message(exception.formatted())
            }
            None => info,
         };

         if let Some(request) = request {
            tracing::warn!(
               method = %request.method,
               path = %request.path,
               request_id = request.request_id.as_deref().unwrap_or("-"),
               code = info.code(),
               reason = info.reason().unwrap_or_default(),
               message = info.message().unwrap_or_default(),
               "エラーレスポンスを返します"
            );
         }

         let status =
            StatusCode::from_u16(info.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
         (status, Json(ErrorBody::from(&info))).into_response()
      }
      // カタログ外の値はステータスを変えずに返す
      ErrorSubject::Other(value) => {
         if let Some(request) = request {
            tracing::warn!(
               method = %request.method,
               path = %request.path,
               request_id = request.request_id.as_deref().unwrap_or("-"),
               reason = %value,
               "カタログ外のエラーを返します"
            );
         }
         (StatusCode::OK, Json(ErrorBody::unrecognized(value))).into_response()
      }
   }
}

/// 整合性制約違反をエラー情報に変換する
///
/// 重複キー（`gkpj`）のみ変換し、それ以外は元のエラーをそのまま返す。
pub fn integrity_error_info(error: IntegrityError) -> Result<ErrorInfo, IntegrityError> {
   if error.is_duplicate_entry() {
      Ok(ErrorInfo::FAILED.with_message_and_reason(DUPLICATE_ENTRY_MESSAGE, DUPLICATE_ENTRY_REASON))
   } else {
      Err(error)
   }
}

/// 正規化されなかったエラーを外側の境界で 500 に変換する
///
/// 詳細はログにのみ出力する。
pub fn unhandled_error_response(error: &dyn fmt::Debug, request: Option<&RequestContext>) -> Response {
   tracing::error!(
      error.category = "unhandled",
      request_id = request
         .and_then(|r| r.request_id.as_deref())
         .unwrap_or("-"),
      "未処理のエラー: {:?}",
      error
   );
   build_error_response(ErrorInfo::INTERNAL_ERROR, None, None)
}

/// 条件が成り立たなければ [`ApiError::Assertion`] を返す
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), ApiError> {
   if condition {
      Ok(())
   } else {
      Err(ApiError::Assertion(message.into()))
   }
}

/// ハンドラから返されるエラー
///
/// `IntoResponse` を実装しているため、axum が自動的に HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum ApiError {
   /// リクエストのスキーマ検証エラー
   #[error("リクエストの検証に失敗しました: {0}")]
   RequestValidation(String),

   /// 処理中のアサーション失敗
   #[error("アサーション失敗: {0}")]
   Assertion(String),

   /// ビジネスロジックが送出したドメイン例外
   #[error(transparent)]
   Domain(#[from] AppException),

   /// データベースの整合性制約違反
   #[error(transparent)]
   Integrity(#[from] IntegrityError),

   /// 内部サーバーエラー
   ///
   /// 内部エラーの詳細はクライアントに返さない。
   #[error("内部サーバーエラー")]
   Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
   fn from(rejection: JsonRejection) -> Self {
      Self::RequestValidation(rejection.body_text())
   }
}

impl From<QueryRejection> for ApiError {
   fn from(rejection: QueryRejection) -> Self {
      Self::RequestValidation(rejection.body_text())
   }
}

impl From<PathRejection> for ApiError {
   fn from(rejection: PathRejection) -> Self {
      Self::RequestValidation(rejection.body_text())
   }
}

impl ApiError {
   /// リクエスト情報をログに含めてレスポンスに変換する
   pub fn into_response_for(self, request: Option<&RequestContext>) -> Response {
      match self {
         ApiError::RequestValidation(detail) => {
            tracing::debug!(detail = %detail, "リクエストの検証に失敗しました");
            build_error_response(ErrorInfo::REQUEST_VALIDATION_ERROR, None, request)
         }
         ApiError::Assertion(message) => {
            build_error_response(ErrorInfo::FAILED.with_message(message), None, request)
         }
         ApiError::Domain(exception) => build_error_response(exception.into_error(), None, request),
         ApiError::Integrity(error) => match integrity_error_info(error) {
            Ok(info) => build_error_response(info, None, request),
            Err(escalated) => unhandled_error_response(&escalated, request),
         },
         ApiError::Internal(err) => unhandled_error_response(&err, request),
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      self.into_response_for(None)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[derive(Debug, Error)]
   #[error("boom")]
   struct ValidationError;

   #[derive(Debug, Error)]
   #[error("wrapped")]
   struct Wrapper<T: fmt::Debug>(T);

   #[test]
   fn test_exception_infoは型名と表示を整形する() {
      assert_eq!(
         ExceptionInfo::of(&ValidationError).formatted(),
         "ValidationError: boom"
      );
   }

   #[test]
   fn test_exception_infoの型名からジェネリクスを除く() {
      assert_eq!(
         ExceptionInfo::of(&Wrapper(1u8)).formatted(),
         "Wrapper: wrapped"
      );
   }

   #[test]
   fn test_重複キー違反はdata_existに変換される() {
      let info = integrity_error_info(IntegrityError::duplicate_entry("dup")).unwrap();

      assert_eq!(info.code(), ErrorInfo::FAILED.code());
      assert_eq!(info.reason(), Some("data exist"));
      assert_eq!(info.message(), Some("data already exists"));
      assert_eq!(info.http_status(), ErrorInfo::FAILED.http_status());
   }

   #[test]
   fn test_その他の整合性制約違反は元のエラーをそのまま返す() {
      let original = IntegrityError::new("23000", "cannot be null");

      let escalated = integrity_error_info(original.clone()).unwrap_err();

      assert_eq!(escalated, original);
   }

   #[test]
   fn test_ensureは条件が偽ならassertionを返す() {
      assert!(ensure(true, "never").is_ok());
      assert!(matches!(
         ensure(false, "limit must be positive"),
         Err(ApiError::Assertion(ref m)) if m == "limit must be positive"
      ));
   }

   #[test]
   fn test_error_subjectの変換() {
      assert_eq!(
         ErrorSubject::from(ErrorInfo::OK),
         ErrorSubject::Known(ErrorInfo::OK)
      );
      assert_eq!(
         ErrorSubject::from("oops"),
         ErrorSubject::Other("oops".to_string())
      );
   }
}
