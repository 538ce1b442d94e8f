use domain::{TodoRecord, UpdateTodoInput};

/// クライアント側で保持する ToDo 一覧
///
/// 変更は `replace_all` / `merge_one` / `remove_one` の 3 操作に限る。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoCache {
    items: Vec<TodoRecord>,
}

impl TodoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// サーバーから取得した一覧で丸ごと置き換える
    pub fn replace_all(&mut self, items: Vec<TodoRecord>) {
        self.items = items;
    }

    /// 送信したフィールドだけを該当レコードに反映する（`updatedAt` は触らない）
    pub fn merge_one(&mut self, id: &str, update: &UpdateTodoInput) -> bool {
        let Some(record) = self.items.iter_mut().find(|t| t.id == id) else {
            return false;
        };

        if let Some(title) = &update.title {
            record.title = title.clone();
        }
        if let Some(description) = &update.description {
            record.description = description.clone();
        }
        if let Some(completed) = update.completed {
            record.completed = completed;
        }
        true
    }

    pub fn remove_one(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[TodoRecord] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&TodoRecord> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    pub fn active_count(&self) -> usize {
        self.len() - self.completed_count()
    }
}
