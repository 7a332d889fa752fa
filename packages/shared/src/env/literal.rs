//! # Python 風リテラルのパーサ
//!
//! `auto_load` で JSON として解釈できなかった値を、もう一度だけ解釈し直すための
//! 制限付きリテラル文法。式の評価は行わない。
//!
//! ## 文法
//!
//! ```text
//! value  := number | string | "True" | "False" | "None"
//!         | "[" items "]" | "(" items ")" | "{" pairs "}"
//! items  := (value ("," value)* ","?)?
//! pairs  := (string ":" value ("," string ":" value)* ","?)?
//! number := ("+" | "-")? digits ("." digits)? (("e" | "E") ("+" | "-")? digits)?
//! string := '...' | "..."   （\\ \' \" \n \r \t \0 をエスケープとして解釈）
//! ```
//!
//! タプルとリストはどちらも JSON 配列になる。`(x)` は括弧付きの `x`、
//! `(x,)` は要素 1 つの配列として扱う。
//!
//! コンテナのネストは 128 段まで。それより深い入力は [`LiteralError::TooDeep`] になる。

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// コンテナのネストの上限（serde_json の再帰制限に合わせる）
const MAX_DEPTH: usize = 128;

/// リテラルの解釈エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
   #[error("入力が途中で終わっています")]
   UnexpectedEnd,

   #[error("{position} 文字目の {found:?} は解釈できません")]
   UnexpectedChar { position: usize, found: char },

   #[error("数値として解釈できません: {0}")]
   InvalidNumber(String),

   #[error("辞書のキーは文字列である必要があります（{position} 文字目）")]
   NonStringKey { position: usize },

   #[error("ネストが深すぎます（上限 {max} 段、{position} 文字目）", max = MAX_DEPTH)]
   TooDeep { position: usize },
}

/// 文字列をリテラルとして解釈する
pub fn parse(input: &str) -> Result<Value, LiteralError> {
   let mut parser = Parser::new(input);
   let value = parser.value()?;
   parser.skip_whitespace();
   match parser.peek() {
      None => Ok(value),
      Some(found) => Err(LiteralError::UnexpectedChar {
         position: parser.pos,
         found,
      }),
   }
}

struct Parser {
   chars: Vec<char>,
   pos:   usize,
   depth: usize,
}

impl Parser {
   fn new(input: &str) -> Self {
      Self {
         chars: input.chars().collect(),
         pos:   0,
         depth: 0,
      }
   }

   fn peek(&self) -> Option<char> {
      self.chars.get(self.pos).copied()
   }

   fn bump(&mut self) -> Option<char> {
      let c = self.peek()?;
      self.pos += 1;
      Some(c)
   }

   fn skip_whitespace(&mut self) {
      while self.peek().is_some_and(char::is_whitespace) {
         self.pos += 1;
      }
   }

   fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
      self.skip_whitespace();
      match self.bump() {
         Some(c) if c == expected => Ok(()),
         Some(found) => Err(LiteralError::UnexpectedChar {
            position: self.pos - 1,
            found,
         }),
         None => Err(LiteralError::UnexpectedEnd),
      }
   }

   fn value(&mut self) -> Result<Value, LiteralError> {
      self.skip_whitespace();
      match self.peek() {
         None => Err(LiteralError::UnexpectedEnd),
         Some(open @ ('[' | '(' | '{')) => {
            self.enter()?;
            let value = self.container(open);
            self.depth -= 1;
            value
         }
         Some(quote @ ('\'' | '"')) => {
            self.pos += 1;
            self.string(quote).map(Value::String)
         }
         Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
         Some(c) if c.is_alphabetic() => self.keyword(),
         Some(found) => Err(LiteralError::UnexpectedChar {
            position: self.pos,
            found,
         }),
      }
   }

   /// 開き括弧を読み進め、ネストの深さを 1 段増やす
   fn enter(&mut self) -> Result<(), LiteralError> {
      if self.depth >= MAX_DEPTH {
         return Err(LiteralError::TooDeep { position: self.pos });
      }
      self.depth += 1;
      self.pos += 1;
      Ok(())
   }

   /// 開き括弧の直後からコンテナを読む
   fn container(&mut self, open: char) -> Result<Value, LiteralError> {
      match open {
         '[' => {
            let (items, _) = self.items(']')?;
            Ok(Value::Array(items))
         }
         '(' => {
            let (mut items, trailing_comma) = self.items(')')?;
            if items.len() == 1 && !trailing_comma {
               return Ok(items.remove(0));
            }
            Ok(Value::Array(items))
         }
         _ => self.pairs(),
      }
   }

   /// 区切り `,` の要素列を読み、閉じ括弧まで進める
   ///
   /// 戻り値の `bool` は末尾に `,` があったかどうか。
   fn items(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
      let mut items = Vec::new();
      let mut trailing_comma = false;
      loop {
         self.skip_whitespace();
         if self.peek() == Some(close) {
            self.pos += 1;
            return Ok((items, trailing_comma));
         }
         items.push(self.value()?);
         self.skip_whitespace();
         match self.bump() {
            Some(',') => trailing_comma = true,
            Some(c) if c == close => return Ok((items, false)),
            Some(found) => {
               return Err(LiteralError::UnexpectedChar {
                  position: self.pos - 1,
                  found,
               });
            }
            None => return Err(LiteralError::UnexpectedEnd),
         }
      }
   }

   fn pairs(&mut self) -> Result<Value, LiteralError> {
      let mut map = Map::new();
      loop {
         self.skip_whitespace();
         match self.peek() {
            Some('}') => {
               self.pos += 1;
               return Ok(Value::Object(map));
            }
            Some(quote @ ('\'' | '"')) => {
               self.pos += 1;
               let key = self.string(quote)?;
               self.expect(':')?;
               let value = self.value()?;
               map.insert(key, value);
            }
            Some(_) => {
               return Err(LiteralError::NonStringKey { position: self.pos });
            }
            None => return Err(LiteralError::UnexpectedEnd),
         }
         self.skip_whitespace();
         match self.bump() {
            Some(',') => {}
            Some('}') => return Ok(Value::Object(map)),
            Some(found) => {
               return Err(LiteralError::UnexpectedChar {
                  position: self.pos - 1,
                  found,
               });
            }
            None => return Err(LiteralError::UnexpectedEnd),
         }
      }
   }

   /// 開きクォートの直後から閉じクォートまでを読む
   fn string(&mut self, quote: char) -> Result<String, LiteralError> {
      let mut out = String::new();
      loop {
         match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
            c if c == quote => return Ok(out),
            '\\' => {
               let escaped = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
               out.push(match escaped {
                  'n' => '\n',
                  'r' => '\r',
                  't' => '\t',
                  '0' => '\0',
                  '\\' | '\'' | '"' => escaped,
                  found => {
                     return Err(LiteralError::UnexpectedChar {
                        position: self.pos - 1,
                        found,
                     });
                  }
               });
            }
            c => out.push(c),
         }
      }
   }

   fn number(&mut self) -> Result<Value, LiteralError> {
      let start = self.pos;
      while self
         .peek()
         .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_'))
      {
         self.pos += 1;
      }
      let text: String = self.chars[start..self.pos].iter().collect();
      let digits = text.replace('_', "");
      let unsigned = digits.strip_prefix('+').unwrap_or(&digits);

      let is_float = unsigned.contains(['.', 'e', 'E']);
      let number = if is_float {
         unsigned.parse::<f64>().ok().and_then(Number::from_f64)
      } else {
         unsigned
            .parse::<i64>()
            .map(Number::from)
            .or_else(|_| unsigned.parse::<u64>().map(Number::from))
            .ok()
      };
      number
         .map(Value::Number)
         .ok_or(LiteralError::InvalidNumber(text))
   }

   fn keyword(&mut self) -> Result<Value, LiteralError> {
      let start = self.pos;
      while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
         self.pos += 1;
      }
      let word: String = self.chars[start..self.pos].iter().collect();
      match word.as_str() {
         "True" => Ok(Value::Bool(true)),
         "False" => Ok(Value::Bool(false)),
         "None" => Ok(Value::Null),
         _ => Err(LiteralError::UnexpectedChar {
            position: start,
            found:    self.chars[start],
         }),
      }
   }
}
