//! tasklist-core
//!
//! REST バックエンドを正本とするタスクリストクライアントの中核。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, todo, events, errors）
//! - **ports**: 抽象化レイヤー（TodoBackend, Notifier）
//! - **impls**: 実装（HttpTodoBackend, InMemoryTodoBackend, RecordingNotifier）
//! - **app**: 状態同期ロジック（TodoList, TodoView, TaskListClient）
//! - **fetch**: タイムアウト付き JSON GET とヘルスチェック
//! - **config**: 接続設定

pub mod app;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod impls;
pub mod ports;
