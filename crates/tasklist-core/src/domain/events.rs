//! Events - ユーザー操作（Command）と、その結果（Completion）
//!
//! # フロー
//! 1. UI イベントが Command になる
//! 2. Command ごとに非同期タスクを 1 本起動してバックエンドを呼ぶ
//! 3. 結果は Completion として 1 件だけ届く
//! 4. Completion は対象の TodoId を持っているので、到着順に関係なく
//!    対象の行にだけ適用される

use std::fmt;

use super::errors::ClientError;
use super::ids::TodoId;
use super::todo::{TodoItem, TodoText};

/// 4 種類のユーザー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Refresh,
    Create,
    Toggle,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Refresh => "refresh",
            Self::Create => "create",
            Self::Toggle => "toggle",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// バックエンドへ送る操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Create { text: TodoText },
    Toggle { id: TodoId, done: bool },
    Delete { id: TodoId },
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Refresh => Operation::Refresh,
            Self::Create { .. } => Operation::Create,
            Self::Toggle { .. } => Operation::Toggle,
            Self::Delete { .. } => Operation::Delete,
        }
    }

    /// バックエンドの応答が得られなかったときの Completion
    pub fn failed(self, error: ClientError) -> Completion {
        match self {
            Self::Refresh => Completion::Refreshed(Err(error)),
            Self::Create { .. } => Completion::Created(Err(error)),
            Self::Toggle { id, done } => Completion::Toggled {
                id,
                done,
                result: Err(error),
            },
            Self::Delete { id } => Completion::Deleted {
                id,
                result: Err(error),
            },
        }
    }
}

/// Command 1 件に対する結果
///
/// Toggle / Delete は発行時の id を運ぶ。index ではなく id で引き直すので、
/// 順不同に届いても無関係な行を壊さない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Refreshed(Result<Vec<TodoItem>, ClientError>),
    Created(Result<TodoItem, ClientError>),
    Toggled {
        id: TodoId,
        done: bool,
        result: Result<(), ClientError>,
    },
    Deleted {
        id: TodoId,
        result: Result<(), ClientError>,
    },
}

impl Completion {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Refreshed(_) => Operation::Refresh,
            Self::Created(_) => Operation::Create,
            Self::Toggled { .. } => Operation::Toggle,
            Self::Deleted { .. } => Operation::Delete,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Refreshed(result) => result.is_ok(),
            Self::Created(result) => result.is_ok(),
            Self::Toggled { result, .. } | Self::Deleted { result, .. } => result.is_ok(),
        }
    }
}
