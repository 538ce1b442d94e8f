//! 端末向けフロントエンドのコマンド解釈

use crate::components::{Filter, Page};

pub const HELP: &str = "\
Commands:
  add <title> [| <description>]   create a todo
  filter all|active|completed     change the list filter
  toggle <n>                      flip completion of item n
  edit <n>                        open the editor for item n
    title <text> / desc <text> / done / undone / save / cancel
  delete <n>                      delete item n (asks for confirmation)
  retry                           fetch the list again
  help / quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Retry,
    Filter(Filter),
    Add { title: String, description: String },
    Toggle(usize),
    Edit(usize),
    Delete(usize),
    Confirm(bool),
    SetTitle(String),
    SetDescription(String),
    SetCompleted(bool),
    Save,
    Cancel,
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 1 行を解釈する。削除確認中は y/yes のみ確定、それ以外は取り消し。
pub fn parse_command(line: &str, awaiting_confirmation: bool) -> Command {
    let line = line.trim();
    if awaiting_confirmation {
        return Command::Confirm(matches!(line.to_ascii_lowercase().as_str(), "y" | "yes"));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "retry" => Command::Retry,
        "filter" => match rest.parse() {
            Ok(filter) => Command::Filter(filter),
            Err(e) => Command::Invalid(e),
        },
        "add" => {
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            Command::Add {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
            }
        }
        "toggle" => position(rest).map_or_else(Command::Invalid, Command::Toggle),
        "edit" => position(rest).map_or_else(Command::Invalid, Command::Edit),
        "delete" => position(rest).map_or_else(Command::Invalid, Command::Delete),
        "title" => Command::SetTitle(rest.to_string()),
        "desc" => Command::SetDescription(rest.to_string()),
        "done" => Command::SetCompleted(true),
        "undone" => Command::SetCompleted(false),
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "" => Command::Invalid("Empty command".to_string()),
        other => Command::Invalid(format!("Unknown command: {other}")),
    }
}

fn position(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("Expected an item number, got '{raw}'"))
}

/// コマンドを画面に適用する。利用者向けのメッセージがあれば返す。
pub async fn apply(page: &mut Page, command: Command) -> (Flow, Option<String>) {
    let message = match command {
        Command::Help => Some(HELP.to_string()),
        Command::Quit => return (Flow::Quit, None),
        Command::Retry => {
            page.try_again().await;
            None
        }
        Command::Filter(filter) => {
            page.list.set_filter(filter);
            None
        }
        Command::Add { title, description } => {
            page.form.title = title;
            page.form.description = description;
            if page.form.can_submit() {
                page.submit_form().await;
                None
            } else {
                Some("Title is required".to_string())
            }
        }
        Command::Toggle(n) => match visible_id(page, n) {
            Some(id) => {
                page.toggle_complete(&id).await;
                None
            }
            None => Some(format!("No item {n}")),
        },
        Command::Edit(n) => match page.list.nth_visible(page.hook.todos(), n).cloned() {
            Some(todo) => {
                page.list.begin_edit(&todo);
                None
            }
            None => Some(format!("No item {n}")),
        },
        Command::Delete(n) => match visible_id(page, n) {
            Some(id) => {
                page.list.request_delete(&id);
                None
            }
            None => Some(format!("No item {n}")),
        },
        Command::Confirm(true) => {
            page.confirm_delete().await;
            None
        }
        Command::Confirm(false) => {
            page.list.cancel_delete();
            Some("Delete cancelled".to_string())
        }
        Command::SetTitle(_)
        | Command::SetDescription(_)
        | Command::SetCompleted(_)
        | Command::Save
        | Command::Cancel
            if !page.list.editor().is_open() =>
        {
            Some("No todo is being edited".to_string())
        }
        Command::SetTitle(title) => {
            page.list.editor_mut().title = title;
            None
        }
        Command::SetDescription(description) => {
            page.list.editor_mut().description = description;
            None
        }
        Command::SetCompleted(completed) => {
            page.list.editor_mut().completed = completed;
            None
        }
        Command::Save => {
            if page.list.editor().can_save() {
                page.save_edit().await;
                None
            } else {
                Some("Title is required".to_string())
            }
        }
        Command::Cancel => {
            page.list.editor_mut().close();
            None
        }
        Command::Invalid(message) => Some(message),
    };

    (Flow::Continue, message)
}

fn visible_id(page: &Page, n: usize) -> Option<String> {
    page.list
        .nth_visible(page.hook.todos(), n)
        .map(|t| t.id.clone())
}
