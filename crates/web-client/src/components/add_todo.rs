use crate::hooks::UseTodos;
use domain::CreateTodoInput;

/// 作成フォーム
#[derive(Debug, Default)]
pub struct AddTodoForm {
    pub title: String,
    pub description: String,
    submitting: bool,
}

impl AddTodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信中は入力・送信とも無効
    pub fn is_disabled(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    /// 送信に成功したら入力をクリアする。空タイトルは送信しない。
    pub async fn submit(&mut self, hook: &mut UseTodos) -> bool {
        if !self.can_submit() {
            return false;
        }

        self.submitting = true;
        let input = CreateTodoInput::new(self.title.trim(), self.description.trim());
        let success = hook.add(input).await;
        if success {
            self.title.clear();
            self.description.clear();
        }
        self.submitting = false;

        success
    }

    pub fn render(&self) -> String {
        let button = if self.submitting {
            "[ Adding... ]"
        } else if self.can_submit() {
            "[ Add Todo ]"
        } else {
            "( Add Todo )"
        };

        format!(
            "Title: {}\nDescription: {}\n{button}",
            placeholder(&self.title, "What needs to be done?"),
            placeholder(&self.description, "Description (optional)"),
        )
    }
}

pub(crate) fn placeholder<'a>(value: &'a str, hint: &'a str) -> &'a str {
    if value.is_empty() {
        hint
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TodoApiClient;

    #[test]
    fn test_blank_title_cannot_be_submitted() {
        let mut form = AddTodoForm::new();
        assert!(!form.can_submit());

        form.title = "   ".to_string();
        assert!(!form.can_submit());

        form.title = "Buy milk".to_string();
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn test_submit_with_blank_title_does_not_call_api() {
        // 到達不能なアドレス。呼ばれればエラーが記録される
        let mut hook = UseTodos::new(TodoApiClient::new("http://127.0.0.1:9"));
        let mut form = AddTodoForm::new();
        form.title = "  ".to_string();

        let submitted = form.submit(&mut hook).await;

        assert!(!submitted);
        assert!(hook.error().is_none());
    }

    #[test]
    fn test_render_shows_placeholders() {
        let form = AddTodoForm::new();

        let text = form.render();

        assert!(text.contains("What needs to be done?"));
        assert!(text.contains("( Add Todo )"));
    }
}
