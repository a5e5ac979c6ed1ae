//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpTodoBackend**: REST バックエンド（本番用）
//! - **InMemoryTodoBackend**: 開発・テスト用のバックエンド
//! - **RecordingNotifier**: 通知を記録するだけの Notifier

pub mod http_backend;
pub mod inmem_backend;
pub mod recording_notifier;

pub use self::http_backend::HttpTodoBackend;
pub use self::inmem_backend::InMemoryTodoBackend;
pub use self::recording_notifier::{Notification, RecordingNotifier};
