//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定、リクエスト ID の生成を提供する。
//! 環境変数 `LOG_FORMAT` による JSON / Pretty 出力の切り替えに対応する。

use crate::env::{Env, EnvEnum, EnvSource, EnvValue};

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// JSON 形式（本番環境向け）
   Json,
   /// 人間が読みやすい形式（開発環境向け）
   #[default]
   Pretty,
}

impl EnvValue for LogFormat {}

impl EnvEnum for LogFormat {
   type Repr = String;

   fn from_repr(repr: String) -> Option<Self> {
      match repr.as_str() {
         "json" => Some(Self::Json),
         "pretty" => Some(Self::Pretty),
         _ => None,
      }
   }
}

impl LogFormat {
   /// 環境変数 `LOG_FORMAT` から読み取る
   ///
   /// トレーシング初期化前に呼ばれるため、不正な値の警告は stderr に出力する。
   pub fn from_env<S: EnvSource>(env: &Env<S>) -> Self {
      env.enumeration("LOG_FORMAT", Self::default())
         .unwrap_or_else(|e| {
            eprintln!("WARNING: {e}, falling back to pretty");
            Self::Pretty
         })
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// サービス名（`app` スパンの `service` フィールドに出力）
   pub service_name: String,
   /// ログ出力形式
   pub log_format:   LogFormat,
}

impl TracingConfig {
   pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
      }
   }

   /// 環境変数から設定を読み取る
   pub fn from_env<S: EnvSource>(service_name: impl Into<String>, env: &Env<S>) -> Self {
      Self::new(service_name, LogFormat::from_env(env))
   }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// 未設定の場合は `"info,base_api=debug"` をデフォルトとする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| "info,base_api=debug".into());

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .init();
}

/// `X-Request-Id` ヘッダー名
#[cfg(feature = "observability")]
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID v7 のリクエスト ID を生成する
///
/// `SetRequestIdLayer` に渡す。クライアントが `X-Request-Id` を送った場合はそちらが優先される。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
   fn make_request_id<B>(
      &mut self,
      _request: &http::Request<B>,
   ) -> Option<tower_http::request_id::RequestId> {
      let value = http::HeaderValue::from_str(&uuid::Uuid::now_v7().to_string()).ok()?;
      Some(tower_http::request_id::RequestId::new(value))
   }
}

/// リクエストから `X-Request-Id` を取り出す
#[cfg(feature = "observability")]
pub fn request_id_of<B>(request: &http::Request<B>) -> Option<&str> {
   request
      .headers()
      .get(REQUEST_ID_HEADER)
      .and_then(|v| v.to_str().ok())
}

/// `TraceLayer` 用のリクエストスパンを作る
///
/// スパンに `request_id` を含めることで、リクエスト中のすべてのログに ID が付く。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
   tracing::info_span!(
      "request",
      method = %request.method(),
      uri = %request.uri(),
      request_id = request_id_of(request).unwrap_or("-"),
   )
}
