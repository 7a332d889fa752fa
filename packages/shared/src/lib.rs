//! # Base API 共有ユーティリティ
//!
//! Gateway とドメイン層・インフラ層から共通で使用されるユーティリティを提供する。
//!
//! ## モジュール構成
//!
//! - [`error_info`] - エラー情報カタログ（`ErrorInfo`）
//! - [`api_response`] - 統一レスポンスエンベロープ `{code, reason, message, data}`
//! - [`env`] - 環境変数からの型付き設定読み込み（`Env`）と `auto_load`
//! - [`observability`] - トレーシング初期化とリクエスト ID
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（HTTP レスポンスへの変換は Gateway の責務）

pub mod api_response;
pub mod env;
pub mod error_info;
pub mod observability;

pub use api_response::ApiResponse;
pub use env::{Env, EnvEnum, EnvError, EnvKey, EnvSource, ProcessEnv, auto_load};
pub use error_info::ErrorInfo;
