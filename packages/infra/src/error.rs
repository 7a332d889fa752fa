//! # インフラ層エラー定義
//!
//! データベースドライバが報告する整合性制約違反を表現する。
//! ドライバのエラーコードをそのまま保持し、Gateway 側でコードに応じて振り分ける。

use thiserror::Error;

/// 一意制約違反（重複キー）を表すドライバのエラーコード
pub const DUPLICATE_ENTRY_CODE: &str = "gkpj";

/// データベースの整合性制約違反
///
/// 一意制約・外部キー制約・NOT NULL 制約などの違反を、ドライバのエラーコードと
/// メッセージの組として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("整合性制約違反 ({code}): {message}")]
pub struct IntegrityError {
   code:    String,
   message: String,
}

impl IntegrityError {
   pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
      Self {
         code:    code.into(),
         message: message.into(),
      }
   }

   /// 重複キーによる違反
   pub fn duplicate_entry(message: impl Into<String>) -> Self {
      Self::new(DUPLICATE_ENTRY_CODE, message)
   }

   /// ドライバのエラーコード
   pub fn code(&self) -> &str {
      &self.code
   }

   pub fn message(&self) -> &str {
      &self.message
   }

   /// 重複キーによる違反かどうか
   pub fn is_duplicate_entry(&self) -> bool {
      self.code == DUPLICATE_ENTRY_CODE
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_duplicate_entryはgkpjを持つ() {
      let err = IntegrityError::duplicate_entry("Duplicate entry 'a' for key 'name'");

      assert_eq!(err.code(), "gkpj");
      assert!(err.is_duplicate_entry());
   }

   #[test]
   fn test_他のコードは重複キーではない() {
      let err = IntegrityError::new("3f6c", "foreign key constraint fails");

      assert!(!err.is_duplicate_entry());
      assert_eq!(
         err.to_string(),
         "整合性制約違反 (3f6c): foreign key constraint fails"
      );
   }
}
