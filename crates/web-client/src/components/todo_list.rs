use crate::components::edit_dialog::EditTodoDialog;
use crate::components::filter::Filter;
use crate::hooks::UseTodos;
use domain::{parse_timestamp, TodoRecord, UpdateTodoInput};
use std::fmt::Write as _;

/// フィルタ付きの一覧。編集ダイアログと削除確認を持つ。
#[derive(Debug, Default)]
pub struct TodoList {
    filter: Filter,
    editor: EditTodoDialog,
    pending_delete: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn visible<'a>(&self, todos: &'a [TodoRecord]) -> Vec<&'a TodoRecord> {
        self.filter.apply(todos)
    }

    /// 表示中の並び（1 始まり）でレコードを引く
    pub fn nth_visible<'a>(&self, todos: &'a [TodoRecord], position: usize) -> Option<&'a TodoRecord> {
        position
            .checked_sub(1)
            .and_then(|index| self.visible(todos).get(index).copied())
    }

    pub async fn toggle_complete(&self, hook: &mut UseTodos, id: &str) -> bool {
        let Some(completed) = hook.cache().get(id).map(|t| t.completed) else {
            return false;
        };
        hook.update(id, UpdateTodoInput::completed(!completed)).await
    }

    pub fn begin_edit(&mut self, todo: &TodoRecord) {
        self.editor.open(todo);
    }

    pub fn editor(&self) -> &EditTodoDialog {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditTodoDialog {
        &mut self.editor
    }

    /// 削除は確認を経てから行う
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self, hook: &mut UseTodos) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        hook.delete(&id).await
    }

    pub fn render(&self, todos: &[TodoRecord], loading: bool) -> String {
        if loading {
            return "Loading todos...".to_string();
        }

        let mut out = String::new();
        let tabs: Vec<String> = Filter::ALL
            .iter()
            .map(|f| {
                let tab = format!("{} ({})", f.label(), f.count(todos));
                if *f == self.filter {
                    format!("[{tab}]")
                } else {
                    tab
                }
            })
            .collect();
        let _ = writeln!(out, "{}", tabs.join("  "));

        let visible = self.visible(todos);
        if visible.is_empty() {
            let _ = writeln!(out, "  {}", self.filter.empty_message());
        }
        for (index, todo) in visible.iter().enumerate() {
            let mark = if todo.completed { "[x]" } else { "[ ]" };
            let _ = writeln!(out, "{:>3}. {mark} {}", index + 1, todo.title);
            if !todo.description.is_empty() {
                let _ = writeln!(out, "       {}", todo.description);
            }
            let _ = write!(out, "       Created: {}", display_date(&todo.created_at));
            if todo.updated_at != todo.created_at {
                let _ = write!(out, "  Updated: {}", display_date(&todo.updated_at));
            }
            out.push('\n');
        }

        if let Some(id) = &self.pending_delete {
            let title = todos
                .iter()
                .find(|t| &t.id == id)
                .map(|t| t.title.as_str())
                .unwrap_or(id);
            let _ = writeln!(
                out,
                "Are you sure you want to delete \"{title}\"? (y/N)"
            );
        }

        let editor = self.editor.render();
        if !editor.is_empty() {
            out.push_str(&editor);
            out.push('\n');
        }

        out
    }
}

fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, completed: bool) -> TodoRecord {
        TodoRecord {
            store_id: id.to_string(),
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            completed,
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            updated_at: "2024-05-03T09:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_render_shows_counts_and_items() {
        let list = TodoList::new();
        let todos = vec![record("a", "Buy milk", false), record("b", "Walk dog", true)];

        let text = list.render(&todos, false);

        assert!(text.contains("[All (2)]"));
        assert!(text.contains("Active (1)"));
        assert!(text.contains("Completed (1)"));
        assert!(text.contains("1. [ ] Buy milk"));
        assert!(text.contains("2. [x] Walk dog"));
        assert!(text.contains("Created: 2024-05-01"));
        assert!(text.contains("Updated: 2024-05-03"));
    }

    #[test]
    fn test_render_empty_message_follows_filter() {
        let mut list = TodoList::new();
        list.set_filter(Filter::Completed);

        let text = list.render(&[record("a", "Buy milk", false)], false);

        assert!(text.contains("No completed todos!"));
    }

    #[test]
    fn test_render_while_loading() {
        let list = TodoList::new();

        assert_eq!(list.render(&[], true), "Loading todos...");
    }

    #[test]
    fn test_nth_visible_uses_filtered_positions() {
        let mut list = TodoList::new();
        list.set_filter(Filter::Active);
        let todos = vec![
            record("a", "A", true),
            record("b", "B", false),
            record("c", "C", false),
        ];

        assert_eq!(list.nth_visible(&todos, 1).map(|t| t.id.as_str()), Some("b"));
        assert_eq!(list.nth_visible(&todos, 2).map(|t| t.id.as_str()), Some("c"));
        assert!(list.nth_visible(&todos, 0).is_none());
        assert!(list.nth_visible(&todos, 3).is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut list = TodoList::new();
        let todos = vec![record("a", "Buy milk", false)];

        list.request_delete("a");
        assert_eq!(list.pending_delete(), Some("a"));
        assert!(list.render(&todos, false).contains("delete \"Buy milk\"?"));

        list.cancel_delete();
        assert!(list.pending_delete().is_none());
    }
}
