//! # Base API インフラ層
//!
//! 外部の永続化層・キャッシュ・SMS プロバイダとの境界で使う型を提供する。
//! 接続そのものはこのリポジトリでは行わず、接続設定とドライバのエラー表現のみを持つ。
//!
//! ## モジュール構成
//!
//! - [`error`] - データベースの整合性制約違反（[`IntegrityError`]）
//! - [`settings`] - MySQL / Redis / SMS の接続設定

pub mod error;
pub mod settings;

pub use error::{DUPLICATE_ENTRY_CODE, IntegrityError};
pub use settings::{MysqlSettings, RedisSettings, SmsSettings};
