//! # JSON API ハンドラ
//!
//! `/api` 配下のエンドポイント。レスポンスはすべて統一エンベロープ
//! `{code, reason, message, data}` で返す。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 説明 |
//! |----------|------|------|
//! | GET | `/api/status` | サービス名・バージョン・実行環境・実行時設定 |
//! | POST | `/api/echo` | JSON オブジェクトをそのまま返す |

use std::sync::Arc;

use axum::{
   Json,
   extract::{State, rejection::JsonRejection},
   response::{IntoResponse, Response},
};
use base_api_shared::ApiResponse;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
   app_builder::AppState,
   config::Environment,
   error::{ApiError, RequestContext, ensure},
};

/// `/api/status` のペイロード
#[derive(Debug, Serialize)]
pub struct StatusData {
   pub name:        &'static str,
   pub version:     &'static str,
   pub environment: Environment,
   pub settings:    Map<String, Value>,
}

/// サービスの状態を返す
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatusData>> {
   Json(ApiResponse::ok(StatusData {
      name:        env!("CARGO_PKG_NAME"),
      version:     env!("CARGO_PKG_VERSION"),
      environment: state.environment,
      settings:    state.settings.clone(),
   }))
}

/// 受け取った JSON オブジェクトを `data` に入れて返す
///
/// - ボディが JSON として不正: `REQUEST_VALIDATION_ERROR`
/// - JSON だがオブジェクトでない: `FAILED`
pub async fn echo(
   request: RequestContext,
   payload: Result<Json<Value>, JsonRejection>,
) -> Response {
   match echo_body(payload) {
      Ok(body) => Json(ApiResponse::ok(body)).into_response(),
      Err(e) => e.into_response_for(Some(&request)),
   }
}

fn echo_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
   let Json(body) = payload?;
   ensure(body.is_object(), "body must be a JSON object")?;
   Ok(body)
}
