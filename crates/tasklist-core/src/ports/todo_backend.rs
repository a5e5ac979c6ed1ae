//! TodoBackend port - 正本（source of truth）である REST バックエンド
//!
//! ID の払い出しと永続化はバックエンドだけが行います。
//! クライアントはここで返ってきた値だけを信じます。
//!
//! # 実装
//! - **HttpTodoBackend**: `/api/todos` に対する REST 呼び出し（本番用）
//! - **InMemoryTodoBackend**: 開発・テスト用

use async_trait::async_trait;

use crate::domain::{ClientError, TodoId, TodoItem, TodoText};

/// TodoBackend はタスクリストの CRUD を提供
///
/// # 設計原則
/// - 1 回の呼び出しは 1 回のリクエスト（リトライしない）
/// - 失敗はすべて `ClientError` で分類して返す
/// - `Send + Sync` を要求（呼び出しごとに別タスクから使う）
#[async_trait]
pub trait TodoBackend: Send + Sync {
    /// GET /api/todos
    async fn list(&self) -> Result<Vec<TodoItem>, ClientError>;

    /// POST /api/todos - 確定したアイテム（ID 付き）を返す
    async fn create(&self, text: &TodoText) -> Result<TodoItem, ClientError>;

    /// PATCH /api/todos/{id} - 成功時のボディは無視する
    async fn set_done(&self, id: &TodoId, done: bool) -> Result<(), ClientError>;

    /// DELETE /api/todos/{id}
    async fn delete(&self, id: &TodoId) -> Result<(), ClientError>;
}
