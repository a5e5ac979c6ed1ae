use tasklist_core::ports::Notifier;

/// 情報は標準出力、進捗とエラーは標準エラーに出す
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn progress(&self, title: &str) {
        eprintln!("{title}");
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}
