//! # エラーレスポンス変換のテスト
//!
//! `build_error_response` と `ApiError` の振り分けが、統一エンベロープと
//! HTTP ステータスコードを正しく返すことを検証する。

use axum::{
   body::to_bytes,
   http::{Method, StatusCode},
   response::{IntoResponse, Response},
};
use base_api_domain::AppException;
use base_api_gateway::error::{
   ApiError,
   ExceptionInfo,
   RequestContext,
   build_error_response,
};
use base_api_infra::IntegrityError;
use base_api_shared::ErrorInfo;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("boom")]
struct ValidationError;

async fn into_parts(response: Response) -> (StatusCode, Value) {
   let status = response.status();
   let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   (status, serde_json::from_slice(&bytes).unwrap())
}

fn request_context() -> RequestContext {
   RequestContext {
      method:     Method::POST,
      path:       "/api/echo".to_string(),
      request_id: Some("req-1".to_string()),
   }
}

// ===== build_error_response =====

#[tokio::test]
async fn test_カタログのエラーはhttp_statusとボディを返す() {
   let response = build_error_response(ErrorInfo::FAILED.with_message("在庫がありません"), None, None);

   let (status, body) = into_parts(response).await;

   assert_eq!(status, StatusCode::BAD_REQUEST);
   assert_eq!(
      body,
      json!({"code": 1, "reason": "failed", "message": "在庫がありません"})
   );
}

#[tokio::test]
async fn test_例外付きならrequest_validation_errorに置き換える() {
   let exception = ExceptionInfo::of(&ValidationError);

   let response = build_error_response(ErrorInfo::FAILED, Some(&exception), None);
   let (status, body) = into_parts(response).await;

   assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
   assert_eq!(body["code"], ErrorInfo::REQUEST_VALIDATION_ERROR.code());
   assert_eq!(body["reason"], "request validation error");
   assert_eq!(body["message"], "ValidationError: boom");
}

#[tokio::test]
async fn test_カタログ外の値はcode0と200を返す() {
   let response = build_error_response("oops", None, None);

   let (status, body) = into_parts(response).await;

   assert_eq!(status, StatusCode::OK);
   assert_eq!(body, json!({"code": 0, "reason": "oops", "message": "oops"}));
}

#[tokio::test]
async fn test_リクエスト情報はレスポンスに影響しない() {
   let request = request_context();

   let with_request = into_parts(build_error_response(ErrorInfo::NOT_FOUND, None, Some(&request))).await;
   let without_request = into_parts(build_error_response(ErrorInfo::NOT_FOUND, None, None)).await;

   assert_eq!(with_request, without_request);
}

#[tokio::test]
async fn test_エラーボディにdataは含まれない() {
   let (_, body) = into_parts(build_error_response(ErrorInfo::FAILED, None, None)).await;

   assert!(body.get("data").is_none());
}

// ===== ApiError の振り分け =====

#[tokio::test]
async fn test_リクエスト検証エラーはカタログのメッセージを使う() {
   let response = ApiError::RequestValidation("missing field `name`".to_string()).into_response();

   let (status, body) = into_parts(response).await;

   assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
   assert_eq!(body["reason"], "request validation error");
   assert_eq!(body["message"], "request parameters are invalid");
}

#[tokio::test]
async fn test_アサーション失敗はfailedにアサーション文言を入れる() {
   let response = ApiError::Assertion("limit must be positive".to_string()).into_response();

   let (status, body) = into_parts(response).await;

   assert_eq!(status, StatusCode::BAD_REQUEST);
   assert_eq!(
      body,
      json!({"code": 1, "reason": "failed", "message": "limit must be positive"})
   );
}

#[tokio::test]
async fn test_ドメイン例外は埋め込まれたエラー情報をそのまま使う() {
   let exception = AppException::not_found("ユーザーが見つかりません");

   let (status, body) = into_parts(ApiError::from(exception).into_response()).await;

   assert_eq!(status, StatusCode::NOT_FOUND);
   assert_eq!(
      body,
      json!({"code": 1004, "reason": "not found", "message": "ユーザーが見つかりません"})
   );
}

#[tokio::test]
async fn test_重複キー違反はdata_existになる() {
   let error = IntegrityError::duplicate_entry("Duplicate entry 'alice' for key 'name'");

   let (status, body) = into_parts(ApiError::from(error).into_response()).await;

   assert_eq!(status, StatusCode::BAD_REQUEST);
   assert_eq!(
      body,
      json!({"code": 1, "reason": "data exist", "message": "data already exists"})
   );
}

#[tokio::test]
async fn test_その他の整合性制約違反は内部エラーとして扱う() {
   let error = IntegrityError::new("23000", "Column 'name' cannot be null");

   let (status, body) = into_parts(
      ApiError::from(error).into_response_for(Some(&request_context())),
   )
   .await;

   assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
   assert_eq!(body["reason"], "internal error");
   // ドライバのメッセージはクライアントに返さない
   assert!(!body.to_string().contains("cannot be null"));
}

#[tokio::test]
async fn test_内部エラーは詳細を返さない() {
   let error = ApiError::from(anyhow::anyhow!("connection refused: 10.0.0.1"));

   let (status, body) = into_parts(error.into_response()).await;

   assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
   assert_eq!(
      body,
      json!({"code": 1500, "reason": "internal error", "message": "internal server error"})
   );
}
