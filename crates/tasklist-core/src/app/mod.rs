//! App - アプリケーション層
//!
//! ports を組み合わせて、画面の状態とバックエンドの正本を同期させます。
//!
//! # 主要コンポーネント
//! - **TodoList**: 行の状態（id をキーにしたアリーナ）と 4 操作の適用ルール
//! - **TodoView**: TodoList の純粋な射影
//! - **TaskListClient**: Command を非同期タスクに流し、Completion を適用する

pub mod client;
pub mod state;
pub mod view;

pub use self::client::TaskListClient;
pub use self::state::{Alert, Applied, DerivedCount, TodoList, TodoRow};
pub use self::view::{RowView, TodoView};
