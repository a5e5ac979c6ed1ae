//! View - TodoList の純粋な射影
//!
//! 状態を直接いじらず、毎回 `TodoView::project` で作り直します。
//! CLI はこれを `Display` でテキストとして描画します。

use std::fmt;

use super::state::{DerivedCount, TodoList};
use crate::domain::TodoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TodoId,
    pub text: String,
    /// チェックボックス
    pub checked: bool,
    /// 取り消し線（確定済みの done）
    pub struck: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub rows: Vec<RowView>,
    pub count: DerivedCount,
}

impl TodoView {
    pub fn project(list: &TodoList) -> Self {
        let rows = list
            .rows()
            .map(|row| RowView {
                id: row.id().clone(),
                text: row.text().to_string(),
                checked: row.checked(),
                struck: row.done(),
            })
            .collect();
        Self {
            rows,
            count: list.derived_count(),
        }
    }
}

impl fmt::Display for RowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.checked { 'x' } else { ' ' };
        if self.struck {
            write!(f, "[{mark}] {:>4}  ~{}~", self.id, self.text)
        } else {
            write!(f, "[{mark}] {:>4}  {}", self.id, self.text)
        }
    }
}

impl fmt::Display for TodoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        write!(f, "{}", self.count)
    }
}
