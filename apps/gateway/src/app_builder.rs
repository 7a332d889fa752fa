//! # ルーター構築
//!
//! 設定からルーターとミドルウェアを組み立てる。`main.rs` と統合テストの両方から使う。
//!
//! ## レイヤー構成（下に書いたものが外側）
//!
//! 1. `SetRequestIdLayer`（最外）: UUID v7 の Request ID を生成（クライアント提供値を優先）
//! 2. `TraceLayer`: `request_id` を含むスパンを作り、全ログに付与
//! 3. `PropagateRequestIdLayer`: レスポンスヘッダーに `X-Request-Id` をコピー
//! 4. `CorsLayer`: CORS プリフライトと `Access-Control-*` ヘッダー
//! 5. `CompressionLayer`: gzip 圧縮

use std::sync::Arc;

use axum::{
   Router,
   http::HeaderValue,
   routing::{get, post},
};
use base_api_shared::observability::{MakeRequestUuidV7, make_request_span};
use serde_json::{Map, Value};
use tower_http::{
   compression::CompressionLayer,
   cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   config::{Environment, GatewayConfig},
   handler,
};

/// ハンドラ間で共有する状態
#[derive(Debug, Clone)]
pub struct AppState {
   pub environment: Environment,
   pub settings:    Map<String, Value>,
}

impl AppState {
   pub fn from_config(config: &GatewayConfig) -> Self {
      Self {
         environment: config.environment,
         settings:    config.settings.clone(),
      }
   }
}

/// アプリケーションのルーターを構築する
pub fn build_app(config: &GatewayConfig) -> Router {
   let state = Arc::new(AppState::from_config(config));

   let api = Router::new()
      .route("/status", get(handler::status))
      .route("/echo", post(handler::echo))
      .with_state(state);

   Router::new()
      .route("/", get(handler::index))
      .route("/health", get(handler::health_check))
      .nest("/api", api)
      .fallback(handler::not_found)
      .layer(CompressionLayer::new())
      .layer(cors_layer(&config.cors_allow_origins))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// CORS レイヤーを構築する
///
/// 認証情報付きリクエストを許可するため、ワイルドカードは使わずリクエストの
/// `Origin` / メソッド / ヘッダーをそのまま許可として返す。
/// `*` 以外が指定された場合はそのオリジンのみ許可する（不正な値は無視する）。
pub fn cors_layer(origins: &[String]) -> CorsLayer {
   let allow_origin = if origins.iter().any(|origin| origin == "*") {
      AllowOrigin::mirror_request()
   } else {
      let list: Vec<HeaderValue> = origins
         .iter()
         .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
               tracing::warn!(origin = %origin, "CORS オリジンとして不正な値を無視します");
               None
            }
         })
         .collect();
      AllowOrigin::list(list)
   };

   CorsLayer::new()
      .allow_origin(allow_origin)
      .allow_credentials(true)
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
}
