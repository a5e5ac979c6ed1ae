//! Notifier port - ユーザーに見える通知
//!
//! エディタ拡張のホストなら通知トースト、CLI なら標準出力/標準エラー。

/// Notifier は通知 UI を抽象化
pub trait Notifier: Send + Sync {
    /// 時間のかかる処理の開始を知らせる
    fn progress(&self, title: &str);

    fn info(&self, message: &str);

    fn error(&self, message: &str);
}
