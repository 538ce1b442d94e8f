use crate::api::TodoApiClient;
use crate::components::add_todo::AddTodoForm;
use crate::components::todo_list::TodoList;
use crate::hooks::UseTodos;
use std::fmt::Write as _;

/// 1 画面分の構成（ヘッダ・作成フォーム・エラー・一覧・集計）
#[derive(Debug)]
pub struct Page {
    pub hook: UseTodos,
    pub form: AddTodoForm,
    pub list: TodoList,
}

impl Page {
    pub fn new(api: TodoApiClient) -> Self {
        Self {
            hook: UseTodos::new(api),
            form: AddTodoForm::new(),
            list: TodoList::new(),
        }
    }

    /// 表示開始時に一度だけ一覧を取得する
    pub async fn mount(&mut self) {
        self.hook.activate().await;
    }

    /// エラー表示の「Try Again」
    pub async fn try_again(&mut self) {
        self.hook.refetch().await;
    }

    pub async fn submit_form(&mut self) -> bool {
        self.form.submit(&mut self.hook).await
    }

    pub async fn save_edit(&mut self) -> bool {
        self.list.editor_mut().save(&mut self.hook).await
    }

    pub async fn confirm_delete(&mut self) -> bool {
        self.list.confirm_delete(&mut self.hook).await
    }

    pub async fn toggle_complete(&mut self, id: &str) -> bool {
        self.list.toggle_complete(&mut self.hook, id).await
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Todo App ===");
        let _ = writeln!(out, "{}", self.form.render());

        if let Some(error) = self.hook.error() {
            let _ = writeln!(out, "! {error}  [Try Again]");
        }

        out.push_str(&self.list.render(self.hook.todos(), self.hook.loading()));

        let cache = self.hook.cache();
        let _ = writeln!(
            out,
            "Total: {}  Completed: {}  Active: {}",
            cache.len(),
            cache.completed_count(),
            cache.active_count()
        );
        out
    }
}
