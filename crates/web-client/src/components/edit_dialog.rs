use crate::components::add_todo::placeholder;
use crate::hooks::UseTodos;
use domain::{TodoRecord, UpdateTodoInput};

/// 編集ダイアログ
#[derive(Debug, Default)]
pub struct EditTodoDialog {
    todo_id: Option<String>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    saving: bool,
}

impl EditTodoDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 選択したレコードの内容で開く
    pub fn open(&mut self, todo: &TodoRecord) {
        self.todo_id = Some(todo.id.clone());
        self.title = todo.title.clone();
        self.description = todo.description.clone();
        self.completed = todo.completed;
        self.saving = false;
    }

    pub fn is_open(&self) -> bool {
        self.todo_id.is_some()
    }

    pub fn todo_id(&self) -> Option<&str> {
        self.todo_id.as_deref()
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn can_save(&self) -> bool {
        self.is_open() && !self.saving && !self.title.trim().is_empty()
    }

    /// 成功したら閉じる。失敗時は入力を残したまま開いておく。
    pub async fn save(&mut self, hook: &mut UseTodos) -> bool {
        if !self.can_save() {
            return false;
        }
        let Some(id) = self.todo_id.clone() else {
            return false;
        };

        self.saving = true;
        let update = UpdateTodoInput {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            completed: Some(self.completed),
        };
        let success = hook.update(&id, update).await;
        self.saving = false;

        if success {
            self.close();
        }
        success
    }

    pub fn render(&self) -> String {
        if !self.is_open() {
            return String::new();
        }

        let checkbox = if self.completed { "[x]" } else { "[ ]" };
        let save = if self.saving {
            "Saving..."
        } else {
            "Save Changes"
        };
        format!(
            "== Edit Todo ==\nTitle *: {}\nDescription: {}\n{checkbox} Completed\n[ Cancel ] [ {save} ]",
            placeholder(&self.title, "What needs to be done?"),
            placeholder(&self.description, "Add more details..."),
        )
    }
}
