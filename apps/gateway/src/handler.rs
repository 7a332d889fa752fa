//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── api.rs      # /api 配下の JSON API
//!     ├── health.rs   # ヘルスチェック
//!     └── index.rs    # トップページとフォールバック
//! ```

pub mod api;
pub mod health;
pub mod index;

pub use api::{StatusData, echo, status};
pub use health::{HealthResponse, health_check};
pub use index::{index, not_found};
