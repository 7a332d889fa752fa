//! # ヘルスチェックハンドラ
//!
//! ロードバランサーやコンテナオーケストレーターからの死活監視用エンドポイント。
//!
//! ```text
//! GET /health
//! {"status":"healthy","version":"0.1.0"}
//! ```

use axum::Json;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
   /// 稼働状態（`"healthy"` 固定）
   pub status:  String,
   /// アプリケーションバージョン（Cargo.toml から取得）
   pub version: String,
}

/// ヘルスチェックエンドポイント
///
/// 外部サービスへの接続は確認せず、常に 200 OK を返す。
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}
