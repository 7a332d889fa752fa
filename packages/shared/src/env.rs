//! # 環境変数からの設定読み込み
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! 設定値を環境変数から型付きで読み込む。
//!
//! ## 型付きローダー
//!
//! | メソッド | 型 | 解釈 |
//! |----------|----|------|
//! | [`Env::int`] | `i64` | 10 進数としてパース |
//! | [`Env::float`] | `f64` | 小数としてパース（ロケール非依存） |
//! | [`Env::string`] | `String` | そのまま |
//! | [`Env::boolean`] | `bool` | 大文字小文字を区別せず `true` / `1` / `yes` のいずれかなら `true` |
//! | [`Env::json`] | `serde_json::Value` | JSON としてパース |
//! | [`Env::enumeration`] | [`EnvEnum`] | 宣言された基底型でパースしてからバリアントに変換 |
//!
//! 未設定の場合はデフォルト値をパースせずにそのまま返す。
//! パースに失敗した場合は [`EnvError::Parse`] を返す（起動時に即座に失敗させる想定）。
//!
//! ## シークレット
//!
//! [`EnvKey::secret`] を指定した値は、ログに出力する前にマスクされる
//! （10 文字を超える文字列は先頭 4 文字と末尾 4 文字のみ残す）。
//!
//! ## 使用例
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use base_api_shared::{Env, EnvKey};
//!
//! let source = HashMap::from([("MYSQL_PORT".to_string(), "13306".to_string())]);
//! let env = Env::with_source(source);
//!
//! assert_eq!(env.int("MYSQL_PORT", 3306).unwrap(), 13306);
//! assert_eq!(env.int("REDIS_PORT", 6379).unwrap(), 6379);
//! assert_eq!(
//!    env.string(EnvKey::new("MYSQL_PASSWORD").secret(), ""),
//!    ""
//! );
//! ```

pub mod literal;

use std::{any::type_name, collections::HashMap, env, fmt, str::FromStr};

use serde_json::{Map, Value};
use thiserror::Error;

/// `auto_load` で使用する区切り文字
const SEPARATOR: &str = "__";

/// マスク後の表示
const REDACTED: &str = "**";

/// `boolean` で `true` とみなす値（小文字で比較する）
const TRUTHY: [&str; 3] = ["true", "1", "yes"];

/// 設定読み込みで発生するエラー
#[derive(Debug, Error)]
pub enum EnvError {
   /// 環境変数の値を目的の型に変換できない
   #[error("環境変数 {name} の値を解釈できません: {reason}")]
   Parse {
      /// 環境変数名
      name:   String,
      /// 変換に失敗した理由
      reason: String,
   },

   /// `auto_load` に渡された名前空間がパッケージ名を含まない
   #[error("設定モジュール名 {0:?} が不正です。パッケージ名を含む完全な名前を指定してください")]
   InvalidNamespace(String),
}

impl EnvError {
   fn parse(name: &str, reason: impl fmt::Display) -> Self {
      Self::Parse {
         name:   name.to_string(),
         reason: reason.to_string(),
      }
   }
}

/// 環境変数の読み取り元
///
/// 本番では [`ProcessEnv`] を使い、テストでは `HashMap` を渡す。
pub trait EnvSource {
   /// 指定した名前の値を返す（未設定なら `None`）
   fn get(&self, name: &str) -> Option<String>;

   /// すべての `(名前, 値)` を返す
   fn vars(&self) -> Vec<(String, String)>;
}

/// プロセスの環境変数
///
/// 呼び出しのたびに読み取る（キャッシュしない）。
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
   fn get(&self, name: &str) -> Option<String> {
      env::var_os(name).map(|value| value.to_string_lossy().into_owned())
   }

   fn vars(&self) -> Vec<(String, String)> {
      env::vars_os()
         .map(|(name, value)| {
            (
               name.to_string_lossy().into_owned(),
               value.to_string_lossy().into_owned(),
            )
         })
         .collect()
   }
}

impl EnvSource for HashMap<String, String> {
   fn get(&self, name: &str) -> Option<String> {
      HashMap::get(self, name).cloned()
   }

   fn vars(&self) -> Vec<(String, String)> {
      self.iter()
         .map(|(name, value)| (name.clone(), value.clone()))
         .collect()
   }
}

/// 読み込む環境変数の指定
///
/// `&str` から変換できるため、説明やシークレット指定が不要なら名前だけ渡せばよい。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvKey<'a> {
   name:        &'a str,
   description: Option<&'a str>,
   secret:      bool,
}

impl<'a> EnvKey<'a> {
   pub fn new(name: &'a str) -> Self {
      Self {
         name,
         description: None,
         secret: false,
      }
   }

   /// ログに添える説明（値の解釈には影響しない）
   pub fn description(mut self, description: &'a str) -> Self {
      self.description = Some(description);
      self
   }

   /// 値をマスクしてからログに出力する
   pub fn secret(mut self) -> Self {
      self.secret = true;
      self
   }

   pub fn name(&self) -> &'a str {
      self.name
   }

   pub fn is_secret(&self) -> bool {
      self.secret
   }
}

impl<'a> From<&'a str> for EnvKey<'a> {
   fn from(name: &'a str) -> Self {
      Self::new(name)
   }
}

/// 環境変数から読み込める値
///
/// [`redacted`](EnvValue::redacted) はシークレット指定時のログ表示。
/// 既定では値全体をマスクする。
pub trait EnvValue: fmt::Debug {
   fn redacted(&self) -> String {
      REDACTED.to_string()
   }
}

macro_rules! impl_env_value {
   ($($ty:ty),* $(,)?) => {
      $(impl EnvValue for $ty {})*
   };
}

impl_env_value!(i32, i64, u16, u32, u64, usize, f64, bool, Value);

impl EnvValue for String {
   fn redacted(&self) -> String {
      redact(self)
   }
}

/// 列挙型の値を環境変数から読み込むためのトレイト
///
/// 環境変数の文字列はまず [`Repr`](EnvEnum::Repr)（基底型）としてパースされ、
/// その後 [`from_repr`](EnvEnum::from_repr) でバリアントに変換される。
///
/// ```rust
/// use base_api_shared::{EnvEnum, env::EnvValue};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Level {
///    Low = 1,
///    High = 2,
/// }
///
/// impl EnvValue for Level {}
///
/// impl EnvEnum for Level {
///    type Repr = u8;
///
///    fn from_repr(repr: u8) -> Option<Self> {
///       match repr {
///          1 => Some(Self::Low),
///          2 => Some(Self::High),
///          _ => None,
///       }
///    }
/// }
/// ```
pub trait EnvEnum: EnvValue + Sized {
   /// バリアントの基底型
   type Repr: FromStr;

   /// 基底型の値に対応するバリアントを返す
   fn from_repr(repr: Self::Repr) -> Option<Self>;
}

/// 環境変数ローダー
///
/// 読み取り元 `S` を差し替えられる。本番では [`Env::process`] を使う。
#[derive(Debug, Clone, Default)]
pub struct Env<S = ProcessEnv> {
   source: S,
}

impl Env<ProcessEnv> {
   /// プロセスの環境変数を読み取るローダーを作成する
   pub fn process() -> Self {
      Self { source: ProcessEnv }
   }
}

impl<S: EnvSource> Env<S> {
   pub fn with_source(source: S) -> Self {
      Self { source }
   }

   /// 汎用ローダー
   ///
   /// 環境変数が設定されていれば `parse` で変換し、未設定ならデフォルト値を返す。
   /// デフォルト値は `parse` を通さない。
   pub fn load<'k, T, E>(
      &self,
      key: impl Into<EnvKey<'k>>,
      default: T,
      parse: impl FnOnce(&str) -> Result<T, E>,
   ) -> Result<T, EnvError>
   where
      T: EnvValue,
      E: fmt::Display,
   {
      let key = key.into();
      let value = match self.source.get(key.name) {
         Some(raw) => parse(&raw).map_err(|e| EnvError::parse(key.name, e))?,
         None => default,
      };
      Ok(self.record(&key, value))
   }

   /// 整数を読み込む
   ///
   /// 前後の空白と、数字の間の `_`（`1_000`）は無視する。
   pub fn int<'k>(&self, key: impl Into<EnvKey<'k>>, default: i64) -> Result<i64, EnvError> {
      self.load(key, default, |raw| {
         numeric_text(raw).and_then(|text| text.parse::<i64>().map_err(|e| e.to_string()))
      })
   }

   /// 小数を読み込む
   ///
   /// 空白と `_` の扱いは [`int`](Env::int) と同じ。
   pub fn float<'k>(&self, key: impl Into<EnvKey<'k>>, default: f64) -> Result<f64, EnvError> {
      self.load(key, default, |raw| {
         numeric_text(raw).and_then(|text| text.parse::<f64>().map_err(|e| e.to_string()))
      })
   }

   /// 文字列を読み込む
   pub fn string<'k>(&self, key: impl Into<EnvKey<'k>>, default: impl Into<String>) -> String {
      let key = key.into();
      let value = self
         .source
         .get(key.name)
         .unwrap_or_else(|| default.into());
      self.record(&key, value)
   }

   /// 真偽値を読み込む
   ///
   /// `true` / `1` / `yes`（大文字小文字を区別しない）以外はすべて `false`。
   pub fn boolean<'k>(&self, key: impl Into<EnvKey<'k>>, default: bool) -> bool {
      let key = key.into();
      let value = match self.source.get(key.name) {
         Some(raw) => TRUTHY.contains(&raw.to_lowercase().as_str()),
         None => default,
      };
      self.record(&key, value)
   }

   /// JSON を読み込む
   pub fn json<'k>(&self, key: impl Into<EnvKey<'k>>, default: Value) -> Result<Value, EnvError> {
      self.load(key, default, |raw| serde_json::from_str::<Value>(raw))
   }

   /// 列挙型を読み込む
   pub fn enumeration<'k, E: EnvEnum>(
      &self,
      key: impl Into<EnvKey<'k>>,
      default: E,
   ) -> Result<E, EnvError> {
      self.load(key, default, |raw| {
         raw.parse::<E::Repr>()
            .map_err(|_| format!("{raw:?} を {} に変換できません", type_name::<E::Repr>()))
            .and_then(|repr| {
               E::from_repr(repr).ok_or_else(|| {
                  format!(
                     "{raw:?} に一致する {} のバリアントがありません",
                     type_name::<E>()
                  )
               })
            })
      })
   }

   /// 名前空間に対応する環境変数で設定を上書きする
   ///
   /// 名前空間 `a.b.settings` の場合、`a__b__settings__<key>` という名前の環境変数
   /// （接頭辞は ASCII の大文字小文字を区別しない）が `settings[<key>]` を上書きする。
   ///
   /// - `<key>` が空、または `__` を含む（ネストしている）場合は無視する
   /// - 既存の値が `null` でも文字列でもない場合は、JSON、次に
   ///   Python 風リテラル（[`literal`]）として解釈し直す
   /// - それ以外は文字列のまま代入する
   ///
   /// # エラー
   ///
   /// - 名前空間が `.` を含まない: [`EnvError::InvalidNamespace`]（環境変数は読まない）
   /// - 値を解釈し直せない: [`EnvError::Parse`]
   pub fn auto_load(&self, namespace: &str, settings: &mut Map<String, Value>) -> Result<(), EnvError> {
      let prefix = format!("{}{SEPARATOR}", settings_prefix(namespace)?);

      for (name, raw) in self.source.vars() {
         let Some(key) = strip_prefix_ignore_ascii_case(&name, &prefix) else {
            continue;
         };
         if key.is_empty() || key.contains(SEPARATOR) {
            continue;
         }

         let value = match settings.get(key) {
            Some(existing) if !existing.is_null() && !existing.is_string() => {
               reinterpret(&name, &raw)?
            }
            _ => Value::String(raw),
         };

         tracing::debug!(env = %name, key, "環境変数で設定を上書きしました");
         settings.insert(key.to_string(), value);
      }

      Ok(())
   }

   /// 読み込んだ値をログに記録して返す
   fn record<T: EnvValue>(&self, key: &EnvKey<'_>, value: T) -> T {
      let shown = if key.secret {
         value.redacted()
      } else {
         format!("{value:?}")
      };
      tracing::debug!(
         name = key.name,
         value = %shown,
         description = key.description.unwrap_or_default(),
         "環境変数を読み込みました"
      );
      value
   }
}

/// [`ProcessEnv`] に対して [`Env::auto_load`] を実行する
pub fn auto_load(namespace: &str, settings: &mut Map<String, Value>) -> Result<(), EnvError> {
   Env::process().auto_load(namespace, settings)
}

/// 名前空間から環境変数の接頭辞を作る（`a.b.settings` → `a__b__settings`）
///
/// 名前空間が `.` を含まない場合はエラーになる。
/// 短すぎる接頭辞で無関係な環境変数を拾わないようにするため。
pub fn settings_prefix(namespace: &str) -> Result<String, EnvError> {
   if !namespace.contains('.') {
      return Err(EnvError::InvalidNamespace(namespace.to_string()));
   }
   Ok(namespace.replace('.', SEPARATOR))
}

/// シークレットをログ用にマスクする
///
/// 10 文字を超える場合は先頭 4 文字と末尾 4 文字を残し、それ以外は全体を隠す。
pub fn redact(value: &str) -> String {
   let chars: Vec<char> = value.chars().collect();
   if chars.len() <= 10 {
      return REDACTED.to_string();
   }
   let head: String = chars[..4].iter().collect();
   let tail: String = chars[chars.len() - 4..].iter().collect();
   format!("{head}{REDACTED}{tail}")
}

/// 数値の表記を正規化する（前後の空白を除き、数字の間の `_` を取り除く）
fn numeric_text(raw: &str) -> Result<String, String> {
   let trimmed = raw.trim();
   let chars: Vec<char> = trimmed.chars().collect();
   let separators_ok = chars.iter().enumerate().all(|(i, &c)| {
      c != '_'
         || (i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit))
   });
   if !separators_ok {
      return Err(format!("{raw:?} の `_` は数字の間にしか置けません"));
   }
   Ok(trimmed.replace('_', ""))
}

fn strip_prefix_ignore_ascii_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
   let head = name.get(..prefix.len())?;
   head.eq_ignore_ascii_case(prefix)
      .then(|| &name[prefix.len()..])
}

fn reinterpret(name: &str, raw: &str) -> Result<Value, EnvError> {
   serde_json::from_str::<Value>(raw)
      .or_else(|_| literal::parse(raw))
      .map_err(|e| EnvError::parse(name, e))
}
