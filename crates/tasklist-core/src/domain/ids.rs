//! Domain identifiers.
//!
//! # TodoId はバックエンドが払い出す不透明な ID
//! クライアントは ID を生成しません。バックエンドが返した値をそのまま保持し、
//! そのままの形（数値 or 文字列）で送り返します。
//!
//! ## なぜ enum なのか？
//! - 参照実装のバックエンドは 1 から始まる整数を返す
//! - 他のバックエンドは文字列 ID を返すことがある
//! - どちらも JSON 上の表現を崩さずにラウンドトリップしたい

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identifier of a todo item, as assigned by the backend.
///
/// `#[serde(untagged)]` なので `1` は `Number(1)`、`"a1"` は `Text("a1")` になります。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl TodoId {
    /// URL のパスセグメントとして使う文字列
    pub fn as_path_segment(&self) -> String {
        self.to_string()
    }
}

impl From<u64> for TodoId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// CLI などユーザー入力からの変換
///
/// 数値として読めるものは `Number`、それ以外は `Text` として扱います。
impl FromStr for TodoId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => s.fmt(f),
        }
    }
}
