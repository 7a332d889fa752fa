//! # Base API Gateway サーバー
//!
//! ## 環境変数
//!
//! `.env` ファイルがあれば起動時に読み込む。本番環境では環境変数を直接設定する。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `GATEWAY_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `GATEWAY_PORT` | No | ポート番号（デフォルト: `8000`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,base_api=debug`） |
//!
//! その他は [`base_api_gateway::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p base-api-gateway
//!
//! # 本番環境
//! GATEWAY_PORT=8080 LOG_FORMAT=json cargo run -p base-api-gateway --release
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use base_api_gateway::{app_builder::build_app, config::GatewayConfig};
use base_api_shared::{Env, observability::TracingConfig};
use tokio::net::TcpListener;

/// Gateway サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み（不正な値があれば起動を中止する）
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動（Ctrl-C / SIGTERM で graceful shutdown）
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("gateway", &Env::process());
   base_api_shared::observability::init_tracing(&tracing_config);
   let _tracing_guard =
      tracing::info_span!("app", service = %tracing_config.service_name).entered();

   let config = GatewayConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      environment = ?config.environment,
      mysql = ?config.mysql,
      redis = ?config.redis,
      sms_configured = config.sms.is_configured(),
      oauth2_token_url = %config.oauth2_token_url,
      "Gateway サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   let app = build_app(&config);

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Gateway サーバーが起動しました: {}", addr);

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await?;

   tracing::info!("Gateway サーバーを停止しました");
   Ok(())
}

/// Ctrl-C または SIGTERM を待つ
async fn shutdown_signal() {
   let ctrl_c = async {
      if let Err(e) = tokio::signal::ctrl_c().await {
         tracing::error!("Ctrl-C の待機に失敗しました: {}", e);
      }
   };

   #[cfg(unix)]
   let terminate = async {
      match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
         Ok(mut signal) => {
            signal.recv().await;
         }
         Err(e) => tracing::error!("SIGTERM の待機に失敗しました: {}", e),
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      () = ctrl_c => {},
      () = terminate => {},
   }

   tracing::info!("シャットダウンシグナルを受信しました");
}
