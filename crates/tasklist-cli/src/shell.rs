//! Shell - 標準入力から操作を受けつけ、完了を逐次反映する対話ループ
//!
//! 入力待ちと Completion 待ちを `tokio::select!` で並べるので、
//! 遅いリクエストがあっても次の操作をすぐに発行できます。

use tokio::io::{AsyncBufReadExt, BufReader};

use tasklist_core::app::{Applied, TaskListClient, TodoRow};
use tasklist_core::domain::{ClientError, TodoId};

pub const HELP: &str = "\
commands:
  add <text>    create a todo
  toggle <id>   flip the checkbox of a todo
  rm <id>       delete a todo
  refresh       reload from the backend
  show          print the list
  help          this message
  quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(TodoId),
    Remove(TodoId),
    Refresh,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// 数値として読めるものは `Number`（バックエンドが返す JSON の形に合わせる）
fn parse_id(raw: &str) -> TodoId {
    match raw.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" => ShellCommand::Empty,
        "add" => ShellCommand::Add(rest.to_string()),
        "toggle" | "t" if !rest.is_empty() => ShellCommand::Toggle(parse_id(rest)),
        "rm" | "delete" if !rest.is_empty() => ShellCommand::Remove(parse_id(rest)),
        "refresh" | "r" => ShellCommand::Refresh,
        "show" | "ls" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

enum Event {
    Line(Option<String>),
    Applied(Applied),
}

pub async fn run(mut client: TaskListClient) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    client.refresh();

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            Some(applied) = client.next_completion(), if client.in_flight() > 0 => Event::Applied(applied),
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                let command = parse_line(&line);
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(err) = handle(&mut client, command) {
                    eprintln!("error: {err}");
                }
            }
            Event::Applied(applied) => render(&client, applied),
        }
    }

    // 発行済みの操作は結果を見届けてから抜ける
    for applied in client.settle().await {
        render(&client, applied);
    }
    Ok(())
}

fn render(client: &TaskListClient, applied: Applied) {
    match applied {
        Applied::Changed => println!("{}", client.view()),
        Applied::Unchanged => {}
        Applied::Failed(alert) => eprintln!("error: {alert}"),
    }
}

fn handle(client: &mut TaskListClient, command: ShellCommand) -> Result<(), ClientError> {
    match command {
        ShellCommand::Add(text) => {
            client.set_input(text);
            match client.submit_input() {
                // 空入力は何もしない
                Err(ClientError::EmptyText) => Ok(()),
                other => other,
            }
        }
        ShellCommand::Toggle(id) => {
            let checked = client
                .state()
                .get(&id)
                .map(TodoRow::checked)
                .ok_or_else(|| ClientError::NotDisplayed(id.clone()))?;
            client.toggle(&id, !checked)
        }
        ShellCommand::Remove(id) => client.delete(&id),
        ShellCommand::Refresh => {
            client.refresh();
            Ok(())
        }
        ShellCommand::Show => {
            println!("{}", client.view());
            Ok(())
        }
        ShellCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        ShellCommand::Unknown(line) => {
            eprintln!("unknown command: {line} (try `help`)");
            Ok(())
        }
        ShellCommand::Empty | ShellCommand::Quit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use tasklist_core::domain::TodoItem;
    use tasklist_core::impls::InMemoryTodoBackend;

    #[rstest]
    #[case::add("add buy milk", ShellCommand::Add("buy milk".into()))]
    #[case::add_padded("  add   a  b ", ShellCommand::Add("a  b".into()))]
    #[case::add_empty("add", ShellCommand::Add(String::new()))]
    #[case::toggle_numeric("toggle 3", ShellCommand::Toggle(TodoId::from(3)))]
    #[case::toggle_padded("toggle  12 ", ShellCommand::Toggle(TodoId::Number(12)))]
    #[case::toggle_text("t abc", ShellCommand::Toggle(TodoId::from("abc")))]
    #[case::remove("rm 7", ShellCommand::Remove(TodoId::from(7)))]
    #[case::remove_text("delete k-1", ShellCommand::Remove(TodoId::from("k-1")))]
    #[case::refresh("refresh", ShellCommand::Refresh)]
    #[case::show("ls", ShellCommand::Show)]
    #[case::quit("quit", ShellCommand::Quit)]
    #[case::blank("   ", ShellCommand::Empty)]
    #[case::toggle_without_id("toggle", ShellCommand::Unknown("toggle".into()))]
    #[case::unknown("frobnicate 1", ShellCommand::Unknown("frobnicate 1".into()))]
    fn parses_lines(#[case] line: &str, #[case] expected: ShellCommand) {
        assert_eq!(parse_line(line), expected);
    }

    async fn loaded_client() -> TaskListClient {
        let backend = InMemoryTodoBackend::with_items(vec![
            TodoItem::new(1, "a", false),
            TodoItem::new(2, "b", true),
        ]);
        let mut client = TaskListClient::new(Arc::new(backend));
        client.refresh();
        client.settle().await;
        client
    }

    #[tokio::test]
    async fn toggle_flips_the_current_checkbox() {
        let mut client = loaded_client().await;

        handle(&mut client, ShellCommand::Toggle(TodoId::from(2))).unwrap();
        assert!(!client.state().get(&TodoId::from(2)).unwrap().checked());

        client.settle().await;
        assert_eq!(client.derived_count().to_string(), "0/2 completed");
    }

    #[tokio::test]
    async fn typed_lines_reach_rows_with_numeric_ids() {
        let mut client = loaded_client().await;

        handle(&mut client, parse_line("toggle 1")).unwrap();
        assert!(client.state().get(&TodoId::Number(1)).unwrap().checked());
        client.settle().await;
        assert_eq!(client.derived_count().to_string(), "2/2 completed");

        handle(&mut client, parse_line("rm 2")).unwrap();
        client.settle().await;
        assert!(client.state().get(&TodoId::Number(2)).is_none());
        assert_eq!(client.derived_count().to_string(), "1/1 completed");
    }

    #[tokio::test]
    async fn toggle_of_hidden_id_is_an_error() {
        let mut client = loaded_client().await;

        let err = handle(&mut client, ShellCommand::Toggle(TodoId::from(9))).unwrap_err();
        assert_eq!(err, ClientError::NotDisplayed(TodoId::from(9)));
        assert_eq!(client.in_flight(), 0);
    }

    #[tokio::test]
    async fn empty_add_is_a_silent_no_op() {
        let mut client = loaded_client().await;

        handle(&mut client, ShellCommand::Add("   ".into())).unwrap();
        assert_eq!(client.in_flight(), 0);
    }
}
