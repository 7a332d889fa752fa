//! # Gateway 設定
//!
//! 環境変数から Gateway の設定を読み込む。すべての値は [`Env`] 経由で読み、
//! シークレットはマスクした上でログに残る。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `GATEWAY_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `GATEWAY_PORT` | No | `8000` | ポート番号 |
//! | `ENVIRONMENT` | No | `development` | 実行環境（development/staging/production） |
//! | `CORS_ALLOW_ORIGINS` | No | `*` | 許可するオリジン（カンマ区切り） |
//! | `OAUTH2_TOKEN_URL` | No | `auth/users/login` | OAuth2 パスワードフローのトークン URL |
//! | `BASE_API__SETTINGS__<key>` | No | - | 実行時設定 [`default_settings`] の上書き |
//!
//! MySQL / Redis / SMS の変数は [`base_api_infra::settings`] を参照。

use base_api_infra::{MysqlSettings, RedisSettings, SmsSettings};
use base_api_shared::{Env, EnvEnum, EnvError, EnvSource, env::EnvValue};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// 実行時設定の名前空間（環境変数の接頭辞は `BASE_API__SETTINGS__`）
pub const SETTINGS_NAMESPACE: &str = "base_api.settings";

/// 実行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
   #[default]
   Development,
   Staging,
   Production,
}

impl EnvValue for Environment {}

impl EnvEnum for Environment {
   type Repr = String;

   fn from_repr(repr: String) -> Option<Self> {
      match repr.as_str() {
         "development" => Some(Self::Development),
         "staging" => Some(Self::Staging),
         "production" => Some(Self::Production),
         _ => None,
      }
   }
}

/// Gateway の設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
   /// バインドアドレス
   pub host:               String,
   /// ポート番号
   pub port:               u16,
   /// 実行環境
   pub environment:        Environment,
   /// CORS で許可するオリジン（`*` はすべて許可）
   pub cors_allow_origins: Vec<String>,
   /// OAuth2 のトークン発行 URL（認証は外部サービスが担う）
   pub oauth2_token_url:   String,
   /// MySQL 接続設定
   pub mysql:              MysqlSettings,
   /// Redis 接続設定
   pub redis:              RedisSettings,
   /// SMS 設定
   pub sms:                SmsSettings,
   /// 実行時設定（デフォルト値を環境変数で上書きしたもの）
   pub settings:           Map<String, Value>,
}

impl GatewayConfig {
   /// プロセスの環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, EnvError> {
      Self::load(&Env::process())
   }

   /// 指定した読み取り元から設定を読み込む
   pub fn load<S: EnvSource>(env: &Env<S>) -> Result<Self, EnvError> {
      let defaults = default_settings();
      let mut settings = defaults.clone();
      env.auto_load(SETTINGS_NAMESPACE, &mut settings)?;
      // 実行時設定は `/api/status` で公開されるため、既定値のないキーは捨てる
      settings.retain(|key, _| {
         let known = defaults.contains_key(key);
         if !known {
            tracing::warn!(key = %key, "未定義の実行時設定を無視します");
         }
         known
      });

      Ok(Self {
         host: env.string("GATEWAY_HOST", "0.0.0.0"),
         port: env.load("GATEWAY_PORT", 8000u16, str::parse::<u16>)?,
         environment: env.enumeration("ENVIRONMENT", Environment::default())?,
         cors_allow_origins: parse_origins(&env.string("CORS_ALLOW_ORIGINS", "*")),
         oauth2_token_url: env.string("OAUTH2_TOKEN_URL", "auth/users/login"),
         mysql: MysqlSettings::from_env(env)?,
         redis: RedisSettings::from_env(env)?,
         sms: SmsSettings::from_env(env),
         settings,
      })
   }
}

/// 実行時設定のデフォルト値
///
/// 値が文字列以外のキーは、環境変数の値が JSON / リテラルとして解釈される。
/// ここにないキーは環境変数で設定しても取り込まない。
pub fn default_settings() -> Map<String, Value> {
   let defaults = json!({
      "page_size": 20,
      "request_timeout_secs": 30,
      "maintenance": false,
      "allowed_upload_types": ["png", "jpg", "pdf"],
      "announcement": "",
   });
   match defaults {
      Value::Object(map) => map,
      _ => Map::new(),
   }
}

fn parse_origins(raw: &str) -> Vec<String> {
   raw.split(',')
      .map(str::trim)
      .filter(|origin| !origin.is_empty())
      .map(str::to_owned)
      .collect()
}
