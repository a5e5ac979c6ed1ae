//! TodoList - 画面に出ているタスクリストの状態
//!
//! # 更新ポリシー
//! - Refresh: 悲観的。結果が届いてから全置換（届く前に消さない）
//! - Create: 悲観的。バックエンドが確定したアイテムだけを追加
//! - Toggle: チェックボックスだけ即時に反転、done マーカーは確定後
//! - Delete: 悲観的。確定後に削除
//!
//! # 既知の乖離
//! Toggle が失敗してもチェックボックスは戻しません（ユーザーが置いた状態のまま）。
//! 同じアイテムへの操作を重ねた場合は、最後に届いたレスポンスが勝ちます。

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::domain::{ClientError, Command, Completion, Operation, TodoId, TodoItem, TodoText};

pub const REFRESH_FAILED: &str = "Failed to fetch todos";
pub const CREATE_FAILED: &str = "Failed to add";
pub const TOGGLE_FAILED: &str = "Failed to update";
pub const DELETE_FAILED: &str = "Failed to delete";

/// 1 行分の状態
///
/// - `item.done`: バックエンドが確定した完了状態（テキストの取り消し線）
/// - `checked`: チェックボックスの見た目（クリックで即時に変わる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    item: TodoItem,
    checked: bool,
}

impl TodoRow {
    fn new(item: TodoItem) -> Self {
        let checked = item.done;
        Self { item, checked }
    }

    pub fn item(&self) -> &TodoItem {
        &self.item
    }

    pub fn id(&self) -> &TodoId {
        &self.item.id
    }

    pub fn text(&self) -> &str {
        &self.item.text
    }

    /// 確定済みの done マーカー
    pub fn done(&self) -> bool {
        self.item.done
    }

    /// チェックボックスの見た目
    pub fn checked(&self) -> bool {
        self.checked
    }
}

/// 完了数 / 総数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedCount {
    pub completed: usize,
    pub total: usize,
}

impl fmt::Display for DerivedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} completed", self.completed, self.total)
    }
}

/// ユーザーに見せる失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub operation: Operation,
    pub message: String,
    pub error: ClientError,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Completion を適用した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// 状態が変わった（再描画が必要）
    Changed,
    /// 何も変わらなかった（対象の行がもう無い、など）
    Unchanged,
    /// 失敗。状態は変えずにアラートを出す
    Failed(Alert),
}

#[derive(Debug, Default)]
pub struct TodoList {
    rows: IndexMap<TodoId, TodoRow>,
    input: String,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> impl Iterator<Item = &TodoRow> {
        self.rows.values()
    }

    pub fn get(&self, id: &TodoId) -> Option<&TodoRow> {
        self.rows.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// 今見えている行を数え直す（キャッシュしない）
    pub fn derived_count(&self) -> DerivedCount {
        DerivedCount {
            completed: self.rows.values().filter(|row| row.checked).count(),
            total: self.rows.len(),
        }
    }

    /// 空テキストはここで弾く（ネットワークに出さない）
    pub fn begin_create(&self, raw: &str) -> Result<Command, ClientError> {
        let text = TodoText::parse(raw)?;
        Ok(Command::Create { text })
    }

    /// 入力欄の内容で作成
    pub fn begin_submit(&self) -> Result<Command, ClientError> {
        self.begin_create(&self.input)
    }

    /// チェックボックスを即時に反転してから送る
    pub fn begin_toggle(&mut self, id: &TodoId, done: bool) -> Result<Command, ClientError> {
        let row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| ClientError::NotDisplayed(id.clone()))?;
        row.checked = done;
        Ok(Command::Toggle {
            id: id.clone(),
            done,
        })
    }

    pub fn begin_delete(&self, id: &TodoId) -> Result<Command, ClientError> {
        if !self.rows.contains_key(id) {
            return Err(ClientError::NotDisplayed(id.clone()));
        }
        Ok(Command::Delete { id: id.clone() })
    }

    pub fn apply(&mut self, completion: Completion) -> Applied {
        match completion {
            Completion::Refreshed(Ok(items)) => {
                self.replace_all(items);
                Applied::Changed
            }
            Completion::Refreshed(Err(error)) => failed(
                Operation::Refresh,
                format!("{REFRESH_FAILED}: {error}"),
                error,
            ),
            Completion::Created(Ok(item)) => {
                self.insert_confirmed(item);
                self.input.clear();
                Applied::Changed
            }
            Completion::Created(Err(error)) => {
                let message = match (&error, error.backend_message()) {
                    (_, Some(message)) => message.to_string(),
                    (ClientError::Rejected { .. }, None) => CREATE_FAILED.to_string(),
                    _ => format!("{CREATE_FAILED}: {error}"),
                };
                failed(Operation::Create, message, error)
            }
            Completion::Toggled {
                id,
                done,
                result: Ok(()),
            } => match self.rows.get_mut(&id) {
                Some(row) => {
                    row.item.done = done;
                    Applied::Changed
                }
                None => {
                    debug!(%id, "toggle confirmed for a row that is no longer displayed");
                    Applied::Unchanged
                }
            },
            Completion::Toggled {
                id,
                result: Err(error),
                ..
            } => failed(
                Operation::Toggle,
                format!("{TOGGLE_FAILED} todo {id}: {error}"),
                error,
            ),
            Completion::Deleted { id, result: Ok(()) } => {
                if self.rows.shift_remove(&id).is_some() {
                    Applied::Changed
                } else {
                    debug!(%id, "delete confirmed for a row that is no longer displayed");
                    Applied::Unchanged
                }
            }
            Completion::Deleted {
                id,
                result: Err(error),
            } => failed(
                Operation::Delete,
                format!("{DELETE_FAILED} todo {id}: {error}"),
                error,
            ),
        }
    }

    fn replace_all(&mut self, items: Vec<TodoItem>) {
        let mut rows = IndexMap::with_capacity(items.len());
        for item in items {
            warn_if_blank(&item);
            let id = item.id.clone();
            if rows.insert(id.clone(), TodoRow::new(item)).is_some() {
                warn!(%id, "backend listed the same id twice; keeping the last one");
            }
        }
        self.rows = rows;
    }

    fn insert_confirmed(&mut self, item: TodoItem) {
        warn_if_blank(&item);
        let id = item.id.clone();
        if self.rows.insert(id.clone(), TodoRow::new(item)).is_some() {
            warn!(%id, "created item was already displayed; updated in place");
        }
    }
}

/// バックエンドが空テキストを返しても行は出す（正本に従う）
fn warn_if_blank(item: &TodoItem) {
    if !item.has_text() {
        warn!(id = %item.id, "backend returned a todo with empty text");
    }
}

fn failed(operation: Operation, message: String, error: ClientError) -> Applied {
    warn!(%operation, kind = ?error.kind(), %error, "operation failed");
    Applied::Failed(Alert {
        operation,
        message,
        error,
    })
}
