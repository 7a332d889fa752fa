//! # 外部サービスの接続設定
//!
//! MySQL / Redis / Tencent Cloud SMS の接続設定を環境変数から読み込む。
//! いずれもこのリポジトリ外のサービスであり、ここでは接続 URL の組み立てまでを担う。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | デフォルト | シークレット |
//! |--------|------------|--------------|
//! | `MYSQL_USER` | `root` | |
//! | `MYSQL_PASSWORD` | （空） | ✓ |
//! | `MYSQL_HOST` | （空） | |
//! | `MYSQL_PORT` | `3306` | |
//! | `MYSQL_DB_BASE` | `base` | |
//! | `REDIS_HOST` | （空） | |
//! | `REDIS_PORT` | `6379` | |
//! | `REDIS_PASSWORD` | （空） | ✓ |
//! | `TENCENT_SECRET_ID` / `TENCENT_SECRET_KEY` | （空） | ✓ |
//! | `SMS_SDK_APP_ID` / `SIGN_NAME` / `EXTEND_CODE` / `SESSION_CONTEXT` / `SENDER_ID` | （空） | |
//! | `TENCENT_ENDPOINT` / `TENCENT_SIGN_METHOD` / `TENCENT_LANGUAGE` | （空） | |

use std::fmt;

use base_api_shared::{
   Env,
   EnvError,
   EnvKey,
   EnvSource,
   env::redact,
};

/// Redis の論理データベース番号
const REDIS_DB: u8 = 9;

/// MySQL 接続設定
///
/// `Debug` ではパスワードをマスクする。
#[derive(Clone)]
pub struct MysqlSettings {
   pub user:     String,
   pub password: String,
   pub host:     String,
   pub port:     u16,
   /// 既定のデータベース名
   pub database: String,
}

impl MysqlSettings {
   pub fn from_env<S: EnvSource>(env: &Env<S>) -> Result<Self, EnvError> {
      Ok(Self {
         user:     env.string("MYSQL_USER", "root"),
         password: env.string(
            EnvKey::new("MYSQL_PASSWORD")
               .description("MySQL パスワード")
               .secret(),
            "",
         ),
         host:     env.string("MYSQL_HOST", ""),
         port:     env.load("MYSQL_PORT", 3306u16, str::parse::<u16>)?,
         database: env.string("MYSQL_DB_BASE", "base"),
      })
   }

   /// データベース名を含まないサーバーの URL（末尾は `/`）
   pub fn server_url(&self) -> String {
      format!(
         "mysql://{}:{}@{}:{}/",
         self.user, self.password, self.host, self.port
      )
   }

   /// 指定したデータベースの接続 URL
   pub fn database_url(&self, database: &str) -> String {
      format!("{}{database}", self.server_url())
   }

   /// 既定のデータベースの接続 URL
   pub fn base_url(&self) -> String {
      self.database_url(&self.database)
   }
}

impl fmt::Debug for MysqlSettings {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("MysqlSettings")
         .field("user", &self.user)
         .field("password", &redact(&self.password))
         .field("host", &self.host)
         .field("port", &self.port)
         .field("database", &self.database)
         .finish()
   }
}

/// Redis 接続設定
#[derive(Clone)]
pub struct RedisSettings {
   pub host:     String,
   pub port:     u16,
   pub password: String,
   pub db:       u8,
}

impl RedisSettings {
   pub fn from_env<S: EnvSource>(env: &Env<S>) -> Result<Self, EnvError> {
      Ok(Self {
         host:     env.string("REDIS_HOST", ""),
         port:     env.load("REDIS_PORT", 6379u16, str::parse::<u16>)?,
         password: env.string(
            EnvKey::new("REDIS_PASSWORD")
               .description("Redis パスワード")
               .secret(),
            "",
         ),
         db:       REDIS_DB,
      })
   }

   /// 接続 URL（例: `redis://:password@localhost:6379/9`）
   pub fn url(&self) -> String {
      format!(
         "redis://:{}@{}:{}/{}",
         self.password, self.host, self.port, self.db
      )
   }
}

impl fmt::Debug for RedisSettings {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("RedisSettings")
         .field("host", &self.host)
         .field("port", &self.port)
         .field("password", &redact(&self.password))
         .field("db", &self.db)
         .finish()
   }
}

/// Tencent Cloud SMS の設定
#[derive(Clone)]
pub struct SmsSettings {
   pub secret_id:       String,
   pub secret_key:      String,
   pub sdk_app_id:      String,
   pub sign_name:       String,
   pub extend_code:     String,
   pub session_context: String,
   pub sender_id:       String,
   pub endpoint:        String,
   pub sign_method:     String,
   pub language:        String,
}

impl SmsSettings {
   pub fn from_env<S: EnvSource>(env: &Env<S>) -> Self {
      Self {
         secret_id:       env.string(EnvKey::new("TENCENT_SECRET_ID").secret(), ""),
         secret_key:      env.string(EnvKey::new("TENCENT_SECRET_KEY").secret(), ""),
         sdk_app_id:      env.string("SMS_SDK_APP_ID", ""),
         sign_name:       env.string("SIGN_NAME", ""),
         extend_code:     env.string("EXTEND_CODE", ""),
         session_context: env.string("SESSION_CONTEXT", ""),
         sender_id:       env.string("SENDER_ID", ""),
         endpoint:        env.string("TENCENT_ENDPOINT", ""),
         sign_method:     env.string("TENCENT_SIGN_METHOD", ""),
         language:        env.string("TENCENT_LANGUAGE", ""),
      }
   }

   /// SMS 送信に必要な認証情報が揃っているか
   pub fn is_configured(&self) -> bool {
      !self.secret_id.is_empty() && !self.secret_key.is_empty() && !self.sdk_app_id.is_empty()
   }
}

impl fmt::Debug for SmsSettings {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("SmsSettings")
         .field("secret_id", &redact(&self.secret_id))
         .field("secret_key", &redact(&self.secret_key))
         .field("sdk_app_id", &self.sdk_app_id)
         .field("sign_name", &self.sign_name)
         .field("endpoint", &self.endpoint)
         .finish_non_exhaustive()
   }
}

#[cfg(test)]
mod tests {
   use std::collections::HashMap;

   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn env_of(pairs: &[(&str, &str)]) -> Env<HashMap<String, String>> {
      Env::with_source(
         pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
      )
   }

   #[test]
   fn test_mysqlは未設定ならデフォルトを使う() {
      let settings = MysqlSettings::from_env(&env_of(&[])).unwrap();

      assert_eq!(settings.user, "root");
      assert_eq!(settings.port, 3306);
      assert_eq!(settings.database, "base");
   }

   #[test]
   fn test_mysqlの接続urlを組み立てる() {
      let settings = MysqlSettings::from_env(&env_of(&[
         ("MYSQL_USER", "app"),
         ("MYSQL_PASSWORD", "pw"),
         ("MYSQL_HOST", "db.internal"),
         ("MYSQL_PORT", "13306"),
         ("MYSQL_DB_BASE", "main"),
      ]))
      .unwrap();

      assert_eq!(settings.server_url(), "mysql://app:pw@db.internal:13306/");
      assert_eq!(settings.base_url(), "mysql://app:pw@db.internal:13306/main");
      assert_eq!(
         settings.database_url("fanblog"),
         "mysql://app:pw@db.internal:13306/fanblog"
      );
   }

   #[rstest]
   #[case("abc")]
   #[case("70000")]
   fn test_ポート番号が不正ならエラー(#[case] port: &str) {
      assert!(MysqlSettings::from_env(&env_of(&[("MYSQL_PORT", port)])).is_err());
      assert!(RedisSettings::from_env(&env_of(&[("REDIS_PORT", port)])).is_err());
   }

   #[test]
   fn test_redisの接続url() {
      let settings = RedisSettings::from_env(&env_of(&[
         ("REDIS_HOST", "cache"),
         ("REDIS_PASSWORD", "secret"),
      ]))
      .unwrap();

      assert_eq!(settings.url(), "redis://:secret@cache:6379/9");
   }

   #[test]
   fn test_debugでパスワードをマスクする() {
      let settings = MysqlSettings::from_env(&env_of(&[(
         "MYSQL_PASSWORD",
         "very-long-database-password",
      )]))
      .unwrap();

      let shown = format!("{settings:?}");

      assert!(!shown.contains("very-long-database-password"));
      assert!(shown.contains("very**word"));
   }

   #[test]
   fn test_smsは認証情報が揃っていればis_configured() {
      let empty = SmsSettings::from_env(&env_of(&[]));
      let configured = SmsSettings::from_env(&env_of(&[
         ("TENCENT_SECRET_ID", "id"),
         ("TENCENT_SECRET_KEY", "key"),
         ("SMS_SDK_APP_ID", "1400000000"),
      ]));

      assert!(!empty.is_configured());
      assert!(configured.is_configured());
   }
}
