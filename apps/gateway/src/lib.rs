//! # Base API Gateway
//!
//! バックエンドサービスの前段に置く薄い HTTP API ゲートウェイ。
//!
//! ## 役割
//!
//! - **ルーティング**: トップページ・ヘルスチェック・`/api` 配下の JSON API
//! - **CORS**: 設定したオリジンからの認証情報付きリクエストを許可
//! - **エラーの正規化**: ハンドラで発生したエラーを統一エンベロープ
//!   `{code, reason, message}` と HTTP ステータスに変換
//! - **設定**: 環境変数からの型付き設定読み込み
//!
//! ビジネスロジック・永続化・認証は外部サービスが担う。
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの構築
//! - [`config`] - Gateway 設定（環境変数からの読み込み）
//! - [`error`] - エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
