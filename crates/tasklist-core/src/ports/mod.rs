//! Ports - 抽象化レイヤー
//!
//! 外部の協力者（REST バックエンド、通知 UI）へのインターフェースです。
//! 実装の詳細は `impls` と各フロントエンドに置きます。

pub mod notifier;
pub mod todo_backend;

pub use self::notifier::Notifier;
pub use self::todo_backend::TodoBackend;
