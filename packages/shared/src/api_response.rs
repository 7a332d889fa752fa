//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "code", "reason", "message", "data" }` を提供する。
//!
//! - 成功レスポンス: [`ApiResponse`]（`data` にエンドポイントごとのペイロード）
//! - エラーレスポンス: [`ErrorBody`]（`data` を持たない `{code, reason, message}`）

use serde::{Deserialize, Serialize};

use crate::ErrorInfo;

/// 公開 API の統一レスポンス型
///
/// 既定値は [`ErrorInfo::OK`] の `code` / `reason` / `message` で、`data` は `null`。
///
/// ## 使用例
///
/// ```
/// use base_api_shared::ApiResponse;
///
/// let response = ApiResponse::ok("hello");
/// assert_eq!(response.code, 0);
/// assert_eq!(response.data, Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
   pub code:    i32,
   pub reason:  Option<String>,
   pub message: Option<String>,
   pub data:    Option<T>,
}

impl<T> ApiResponse<T> {
   /// ペイロード付きの成功レスポンスを作成する
   pub fn ok(data: T) -> Self {
      Self {
         data: Some(data),
         ..Self::from_info(&ErrorInfo::OK)
      }
   }

   /// カタログのエントリからペイロードなしのレスポンスを作成する
   pub fn from_info(info: &ErrorInfo) -> Self {
      Self {
         code:    info.code(),
         reason:  info.reason().map(str::to_owned),
         message: info.message().map(str::to_owned),
         data:    None,
      }
   }
}

impl<T> Default for ApiResponse<T> {
   fn default() -> Self {
      Self::from_info(&ErrorInfo::OK)
   }
}

/// エラーレスポンスのボディ
///
/// HTTP ステータスコードはトランスポート層で別に運ぶため、ここには含めない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
   pub code:    i32,
   pub reason:  Option<String>,
   pub message: Option<String>,
}

impl ErrorBody {
   /// カタログ外の任意の値から作成する
   ///
   /// `code` は 0 固定、`reason` と `message` には同じ文字列が入る。
   pub fn unrecognized(value: impl Into<String>) -> Self {
      let value = value.into();
      Self {
         code:    0,
         reason:  Some(value.clone()),
         message: Some(value),
      }
   }
}

impl From<&ErrorInfo> for ErrorBody {
   fn from(info: &ErrorInfo) -> Self {
      Self {
         code:    info.code(),
         reason:  info.reason().map(str::to_owned),
         message: info.message().map(str::to_owned),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_okはエンベロープ形状でシリアライズされる() {
      let response = ApiResponse::ok(vec!["a", "b"]);
      let json = serde_json::to_value(&response).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "code": 0,
            "reason": "ok",
            "message": "success",
            "data": ["a", "b"]
         })
      );
   }

   #[test]
   fn test_defaultはdataがnullになる() {
      let response = ApiResponse::<String>::default();
      let json = serde_json::to_value(&response).unwrap();

      assert_eq!(json["code"], 0);
      assert!(json["data"].is_null());
   }

   #[test]
   fn test_deserializeでnullのreasonとdataを受け付ける() {
      let json = r#"{"code": 1, "reason": null, "message": "x", "data": null}"#;
      let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();

      assert_eq!(response.code, 1);
      assert_eq!(response.reason, None);
      assert_eq!(response.data, None);
   }

   #[test]
   fn test_error_bodyはdataを持たない() {
      let body = ErrorBody::from(&ErrorInfo::NOT_FOUND);
      let json = serde_json::to_value(&body).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "code": 1004,
            "reason": "not found",
            "message": "resource not found"
         })
      );
   }

   #[test]
   fn test_unrecognizedはreasonとmessageに同じ値を入れる() {
      let body = ErrorBody::unrecognized("oops");

      assert_eq!(
         body,
         ErrorBody {
            code:    0,
            reason:  Some("oops".to_string()),
            message: Some("oops".to_string()),
         }
      );
   }
}
