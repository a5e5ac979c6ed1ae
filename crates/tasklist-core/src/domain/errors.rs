//! Errors - エラー型と分類
//!
//! すべての失敗はそれを引き起こしたユーザー操作に対して終端的です。
//! リトライもキューイングもせず、その場でアラートとして報告します。

use thiserror::Error;

use super::ids::TodoId;

/// ErrorKind はクライアント操作の失敗の分類
///
/// # 分類
/// - Validation: ローカル検証で弾いた（ネットワーク呼び出しなし）
/// - Transport: 接続・プロトコルの失敗
/// - Timeout: 時間切れ（Transport とは区別する）
/// - Rejected: バックエンドが非 2xx を返した
/// - Decode: レスポンスの JSON が壊れていた
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Timeout,
    Rejected,
    Decode,
}

/// ClientError はタスクリストクライアントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("todo text is empty")]
    EmptyText,

    #[error("todo {0} is not displayed")]
    NotDisplayed(TodoId),

    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("backend rejected request (HTTP {status}){}", message_suffix(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyText | Self::NotDisplayed(_) | Self::InvalidUrl(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Timeout => ErrorKind::Timeout,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// バックエンドがボディの `error` フィールドで返したメッセージ
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
