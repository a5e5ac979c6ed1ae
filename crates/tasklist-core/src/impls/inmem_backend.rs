//! InMemoryTodoBackend - 開発・テスト用のバックエンド
//!
//! 参照実装のバックエンドと同じ振る舞いをします:
//! - ID は 1 から連番
//! - 作成時にテキストを trim、空なら 400 `{"error": "text is required"}`
//! - 存在しない ID は 404 `{"error": "not found"}`
//!
//! # テスト用の仕掛け
//! - `fail_next`: 次の呼び出しを指定のエラーで失敗させる
//! - `hold` / `release`: 特定 ID への呼び出しを止めておき、好きな順で完了させる
//! - `calls`: 受け付けたリクエスト数

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use crate::domain::{ClientError, Operation, TodoId, TodoItem, TodoText};
use crate::ports::TodoBackend;

struct InMemoryState {
    todos: Vec<TodoItem>,
    next_id: u64,
    calls: usize,
    failures: HashMap<Operation, VecDeque<ClientError>>,
}

pub struct InMemoryTodoBackend {
    state: Mutex<InMemoryState>,
    /// 保留中の ID ごとのゲート（permit 0 で作って release で 1 ずつ開ける）
    gates: Mutex<HashMap<TodoId, Arc<Semaphore>>>,
}

impl InMemoryTodoBackend {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// 既存データ入りで作成。次の ID は既存の最大数値 ID + 1。
    pub fn with_items(todos: Vec<TodoItem>) -> Self {
        let next_id = todos
            .iter()
            .filter_map(|item| match item.id {
                TodoId::Number(n) => Some(n),
                TodoId::Text(_) => None,
            })
            .max()
            .map_or(1, |max| max + 1);
        Self {
            state: Mutex::new(InMemoryState {
                todos,
                next_id,
                calls: 0,
                failures: HashMap::new(),
            }),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fail_next(&self, operation: Operation, error: ClientError) {
        let mut state = self.state.lock().await;
        state.failures.entry(operation).or_default().push_back(error);
    }

    /// 以後この ID に対する toggle/delete を release まで止める
    pub async fn hold(&self, id: &TodoId) {
        let mut gates = self.gates.lock().await;
        gates.insert(id.clone(), Arc::new(Semaphore::new(0)));
    }

    /// 止めている呼び出しを 1 件だけ進める
    pub async fn release(&self, id: &TodoId) {
        let gates = self.gates.lock().await;
        if let Some(gate) = gates.get(id) {
            gate.add_permits(1);
        }
    }

    pub async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }

    pub async fn items(&self) -> Vec<TodoItem> {
        self.state.lock().await.todos.clone()
    }

    async fn begin(&self, operation: Operation, target: Option<&TodoId>) -> Result<(), ClientError> {
        self.state.lock().await.calls += 1;

        if let Some(id) = target {
            let gate = self.gates.lock().await.get(id).cloned();
            if let Some(gate) = gate
                && let Ok(permit) = gate.acquire().await
            {
                permit.forget();
            }
        }

        let mut state = self.state.lock().await;
        match state.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryTodoBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found() -> ClientError {
    ClientError::Rejected {
        status: 404,
        message: Some("not found".to_string()),
    }
}

#[async_trait]
impl TodoBackend for InMemoryTodoBackend {
    async fn list(&self) -> Result<Vec<TodoItem>, ClientError> {
        self.begin(Operation::Refresh, None).await?;
        Ok(self.state.lock().await.todos.clone())
    }

    async fn create(&self, text: &TodoText) -> Result<TodoItem, ClientError> {
        self.begin(Operation::Create, None).await?;
        let text = text.as_str().trim();
        if text.is_empty() {
            return Err(ClientError::Rejected {
                status: 400,
                message: Some("text is required".to_string()),
            });
        }
        let mut state = self.state.lock().await;
        let item = TodoItem::new(state.next_id, text, false);
        state.next_id += 1;
        state.todos.push(item.clone());
        Ok(item)
    }

    async fn set_done(&self, id: &TodoId, done: bool) -> Result<(), ClientError> {
        self.begin(Operation::Toggle, Some(id)).await?;
        let mut state = self.state.lock().await;
        let item = state
            .todos
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(not_found)?;
        item.done = done;
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ClientError> {
        self.begin(Operation::Delete, Some(id)).await?;
        let mut state = self.state.lock().await;
        let before = state.todos.len();
        state.todos.retain(|item| &item.id != id);
        if state.todos.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
