//! # Base API ドメイン層
//!
//! ビジネスロジックが送出する例外を定義する。
//! ビジネスロジック本体はこのリポジトリの外にあり、ここでは
//! Gateway との境界で使う型のみを提供する。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン例外（[`AppException`]）

pub mod error;

pub use error::AppException;
