//! TaskListClient - Command の発行と Completion の適用をつなぐ接着剤
//!
//! # 実行モデル
//! - Command 1 件につき tokio タスクを 1 本起動（直列化しない）
//! - 各タスクは Completion を 1 件だけチャネルに流す
//! - Completion の適用はクライアントを所有する側が 1 件ずつ行う
//!   （TodoList にロックは要らない）
//! - 発行済みの Command はキャンセルできない。リトライもしない

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::state::{Applied, DerivedCount, TodoList};
use super::view::TodoView;
use crate::domain::{ClientError, Command, Completion, TodoId};
use crate::ports::TodoBackend;

pub struct TaskListClient {
    backend: Arc<dyn TodoBackend>,
    state: TodoList,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl TaskListClient {
    pub fn new(backend: Arc<dyn TodoBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            state: TodoList::new(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &TodoList {
        &self.state
    }

    pub fn view(&self) -> TodoView {
        TodoView::project(&self.state)
    }

    pub fn derived_count(&self) -> DerivedCount {
        self.state.derived_count()
    }

    /// まだ Completion が届いていない Command の数
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    pub fn refresh(&mut self) {
        self.dispatch(Command::Refresh);
    }

    pub fn create(&mut self, raw: &str) -> Result<(), ClientError> {
        let command = self.state.begin_create(raw)?;
        self.dispatch(command);
        Ok(())
    }

    /// 入力欄の内容で作成（空ならネットワークに出ない）
    pub fn submit_input(&mut self) -> Result<(), ClientError> {
        let command = self.state.begin_submit()?;
        self.dispatch(command);
        Ok(())
    }

    pub fn toggle(&mut self, id: &TodoId, done: bool) -> Result<(), ClientError> {
        let command = self.state.begin_toggle(id, done)?;
        self.dispatch(command);
        Ok(())
    }

    pub fn delete(&mut self, id: &TodoId) -> Result<(), ClientError> {
        let command = self.state.begin_delete(id)?;
        self.dispatch(command);
        Ok(())
    }

    /// Command を非同期タスクとして起動する（完了を待たない）
    ///
    /// begin_* でローカル検証を済ませた Command だけが来る。
    /// バックエンド呼び出しが panic しても Completion は必ず 1 件届く。
    fn dispatch(&mut self, command: Command) {
        debug!(operation = %command.operation(), in_flight = self.in_flight, "dispatch");
        self.in_flight += 1;
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let issued = command.clone();
        tokio::spawn(async move {
            let call = tokio::spawn(async move { execute(backend.as_ref(), command).await });
            let completion = match call.await {
                Ok(completion) => completion,
                Err(err) => {
                    warn!(operation = %issued.operation(), %err, "backend call did not finish");
                    issued.failed(ClientError::Transport(format!("backend call aborted: {err}")))
                }
            };
            // 受信側が先に drop されていたら結果は捨てる
            let _ = tx.send(completion);
        });
    }

    /// 次に届いた Completion を適用する。発行中の Command が無ければ None。
    ///
    /// キャンセルセーフ（`tokio::select!` の分岐に置いてよい）。
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        debug!(
            operation = %completion.operation(),
            success = completion.is_success(),
            "completion"
        );
        Some(self.state.apply(completion))
    }

    /// 発行中の Command がすべて終わるまで適用し続ける
    pub async fn settle(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(next) = self.next_completion().await {
            applied.push(next);
        }
        applied
    }
}

/// Command 1 件分のバックエンド呼び出し
pub async fn execute(backend: &dyn TodoBackend, command: Command) -> Completion {
    match command {
        Command::Refresh => Completion::Refreshed(backend.list().await),
        Command::Create { text } => Completion::Created(backend.create(&text).await),
        Command::Toggle { id, done } => {
            let result = backend.set_done(&id, done).await;
            Completion::Toggled { id, done, result }
        }
        Command::Delete { id } => {
            let result = backend.delete(&id).await;
            Completion::Deleted { id, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Operation, TodoItem};
    use crate::impls::InMemoryTodoBackend;

    fn seeded(items: Vec<TodoItem>) -> (Arc<InMemoryTodoBackend>, TaskListClient) {
        let backend = Arc::new(InMemoryTodoBackend::with_items(items));
        let client = TaskListClient::new(backend.clone());
        (backend, client)
    }

    async fn loaded(items: Vec<TodoItem>) -> (Arc<InMemoryTodoBackend>, TaskListClient) {
        let (backend, mut client) = seeded(items);
        client.refresh();
        assert_eq!(client.settle().await, vec![Applied::Changed]);
        (backend, client)
    }

    #[tokio::test]
    async fn refresh_loads_backend_list() {
        let (_, client) = loaded(vec![
            TodoItem::new(1, "a", false),
            TodoItem::new(2, "b", true),
        ])
        .await;
        assert_eq!(client.state().len(), 2);
        assert_eq!(client.derived_count().to_string(), "1/2 completed");
    }

    #[tokio::test]
    async fn create_shows_confirmed_item_once_and_clears_input() {
        let (backend, mut client) = loaded(vec![]).await;
        client.set_input("  write docs ");
        client.submit_input().unwrap();

        assert_eq!(client.state().len(), 0);
        assert_eq!(client.settle().await, vec![Applied::Changed]);

        let rows: Vec<_> = client.state().rows().map(|r| r.item().clone()).collect();
        assert_eq!(rows, vec![TodoItem::new(1, "write docs", false)]);
        assert_eq!(client.state().input(), "");
        assert_eq!(client.derived_count().to_string(), "0/1 completed");
        assert_eq!(backend.items().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_create_makes_no_request() {
        let (backend, mut client) = loaded(vec![]).await;
        let calls_before = backend.calls().await;

        client.set_input("   ");
        assert_eq!(client.submit_input(), Err(ClientError::EmptyText));
        assert_eq!(client.create(""), Err(ClientError::EmptyText));

        assert_eq!(client.in_flight(), 0);
        assert_eq!(backend.calls().await, calls_before);
        assert!(client.state().is_empty());
    }

    #[tokio::test]
    async fn toggle_success_adds_one_completed() {
        let (_, mut client) = loaded(vec![TodoItem::new(1, "a", false)]).await;
        let before = client.derived_count();

        client.toggle(&TodoId::from(1), true).unwrap();
        assert_eq!(client.settle().await, vec![Applied::Changed]);

        assert!(client.state().get(&TodoId::from(1)).unwrap().done());
        assert_eq!(client.derived_count().completed, before.completed + 1);
    }

    #[tokio::test]
    async fn toggle_failure_keeps_the_row() {
        let (backend, mut client) = loaded(vec![TodoItem::new(1, "a", false)]).await;
        backend
            .fail_next(
                Operation::Toggle,
                ClientError::Rejected {
                    status: 500,
                    message: None,
                },
            )
            .await;

        client.toggle(&TodoId::from(1), true).unwrap();
        let applied = client.settle().await;

        assert!(matches!(applied.as_slice(), [Applied::Failed(_)]));
        let row = client.state().get(&TodoId::from(1)).unwrap();
        assert!(!row.done());
        // 見た目はユーザーが置いたまま
        assert!(row.checked());
    }

    #[tokio::test]
    async fn delete_success_and_failure() {
        let (backend, mut client) = loaded(vec![
            TodoItem::new(1, "a", false),
            TodoItem::new(2, "b", false),
        ])
        .await;

        client.delete(&TodoId::from(1)).unwrap();
        client.settle().await;
        assert_eq!(client.derived_count().total, 1);

        backend
            .fail_next(Operation::Delete, ClientError::Transport("reset".into()))
            .await;
        client.delete(&TodoId::from(2)).unwrap();
        let applied = client.settle().await;
        assert!(matches!(applied.as_slice(), [Applied::Failed(_)]));
        assert_eq!(client.derived_count().total, 1);
    }

    #[tokio::test]
    async fn concurrent_toggles_complete_out_of_order() {
        let (backend, mut client) = loaded(vec![
            TodoItem::new(1, "a", false),
            TodoItem::new(2, "b", false),
        ])
        .await;
        let first = TodoId::from(1);
        let second = TodoId::from(2);
        backend.hold(&first).await;
        backend
            .fail_next(
                Operation::Toggle,
                ClientError::Rejected {
                    status: 409,
                    message: None,
                },
            )
            .await;

        // 1 は止めておき、2 が先に（失敗で）返る
        client.toggle(&first, true).unwrap();
        client.toggle(&second, true).unwrap();
        assert_eq!(client.in_flight(), 2);

        let applied = client.next_completion().await.unwrap();
        assert!(matches!(applied, Applied::Failed(ref alert) if alert.message.contains("todo 2")));

        backend.release(&first).await;
        assert_eq!(client.next_completion().await, Some(Applied::Changed));
        assert_eq!(client.next_completion().await, None);

        assert!(client.state().get(&first).unwrap().done());
        assert!(!client.state().get(&second).unwrap().done());
    }

    struct PanickingBackend;

    #[async_trait::async_trait]
    impl TodoBackend for PanickingBackend {
        async fn list(&self) -> Result<Vec<TodoItem>, ClientError> {
            panic!("list blew up");
        }

        async fn create(&self, _text: &crate::domain::TodoText) -> Result<TodoItem, ClientError> {
            panic!("create blew up");
        }

        async fn set_done(&self, _id: &TodoId, _done: bool) -> Result<(), ClientError> {
            panic!("set_done blew up");
        }

        async fn delete(&self, _id: &TodoId) -> Result<(), ClientError> {
            panic!("delete blew up");
        }
    }

    #[tokio::test]
    async fn panicking_backend_still_completes_every_command() {
        let mut client = TaskListClient::new(Arc::new(PanickingBackend));
        client.set_input("x");

        client.refresh();
        client.submit_input().unwrap();
        let applied = client.settle().await;

        assert_eq!(applied.len(), 2);
        assert!(applied.iter().all(|a| matches!(
            a,
            Applied::Failed(alert) if matches!(alert.error, ClientError::Transport(_))
        )));
        assert_eq!(client.in_flight(), 0);
        assert_eq!(client.state().input(), "x");
    }

    #[tokio::test]
    async fn operations_on_hidden_rows_are_rejected_locally() {
        let (backend, mut client) = loaded(vec![]).await;
        let calls_before = backend.calls().await;
        let id = TodoId::from(5);

        assert_eq!(client.toggle(&id, true), Err(ClientError::NotDisplayed(id.clone())));
        assert_eq!(client.delete(&id), Err(ClientError::NotDisplayed(id.clone())));
        assert_eq!(backend.calls().await, calls_before);
    }
}
