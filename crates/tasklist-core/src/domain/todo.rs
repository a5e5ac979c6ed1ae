use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ClientError;
use super::ids::TodoId;

/// A todo item as the backend knows it.
///
/// `text` は作成後に変更されません（編集操作は存在しない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl TodoItem {
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>, done: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            done,
        }
    }

    /// 表示できるテキストを持っているか（空はバックエンド側の不整合）
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// 作成用の検証済みテキスト
///
/// 前後の空白を取り除いた結果が空でないことを保証します。
/// これを作れない入力はネットワークに出ません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoText(String);

impl TodoText {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClientError::EmptyText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// POST /api/todos のボディ
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo<'a> {
    pub text: &'a TodoText,
}

/// PATCH /api/todos/{id} のボディ
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DoneUpdate {
    pub done: bool,
}

/// 非 2xx レスポンスのボディ（`{"error": "..."}`）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// 生のボディから `error` を取り出す。JSON でなければ None。
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty())
    }
}
