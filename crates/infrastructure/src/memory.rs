use crate::models::{item_to_todo, sort_newest_first, todo_to_item, Item};
use crate::TodoStore;
use domain::{now, NewTodo, Todo, TodoError, TodoId, TodoPatch};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 簡易な InMemory 実装（開発/テスト用）
///
/// DynamoDB と同じアイテム表現で保持するので、コーデックも本番と同じ経路を通る。
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    items: Arc<Mutex<HashMap<TodoId, Item>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TodoId, Item>>, TodoError> {
        self.items
            .lock()
            .map_err(|_| TodoError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl TodoStore for InMemoryTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let items = self.lock()?;
        let mut todos = items.values().map(item_to_todo).collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut todos);
        Ok(todos)
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo, TodoError> {
        let todo = Todo::create(TodoId::new(), input, now());
        self.lock()?.insert(todo.id, todo_to_item(&todo));
        Ok(todo)
    }

    async fn find_by_id(&self, todo_id: &TodoId) -> Result<Option<Todo>, TodoError> {
        self.lock()?.get(todo_id).map(item_to_todo).transpose()
    }

    async fn update_by_id(&self, todo_id: &TodoId, patch: &TodoPatch) -> Result<bool, TodoError> {
        let mut items = self.lock()?;
        let Some(item) = items.get_mut(todo_id) else {
            return Ok(false);
        };

        let mut todo = item_to_todo(item)?;
        todo.apply(patch);
        *item = todo_to_item(&todo);
        Ok(true)
    }

    async fn delete_by_id(&self, todo_id: &TodoId) -> Result<bool, TodoError> {
        Ok(self.lock()?.remove(todo_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ATTR_TITLE;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo::new(Some(title), None).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        // Arrange
        let store = InMemoryTodoStore::new();

        // Act
        let created = store.insert(new_todo("Buy milk")).await.unwrap();
        let found = store.find_by_id(&created.id).await.unwrap();

        // Assert
        assert_eq!(found, Some(created.clone()));
        assert!(!created.completed);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_list_all_is_newest_first() {
        let store = InMemoryTodoStore::new();
        for title in ["t1", "t2", "t3"] {
            store.insert(new_todo(title)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let titles: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_update_reports_match_and_applies_patch() {
        // Arrange
        let store = InMemoryTodoStore::new();
        let created = store.insert(new_todo("Task")).await.unwrap();
        let patch = TodoPatch::new(None, None, Some(true)).unwrap();

        // Act
        let matched = store.update_by_id(&created.id, &patch).await.unwrap();
        let updated = store.find_by_id(&created.id).await.unwrap().unwrap();

        // Assert
        assert!(matched);
        assert!(updated.completed);
        assert_eq!(updated.title, "Task");
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_matched() {
        let store = InMemoryTodoStore::new();
        let patch = TodoPatch::new(Some("x"), None, None).unwrap();

        let matched = store.update_by_id(&TodoId::new(), &patch).await.unwrap();

        assert!(!matched);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = InMemoryTodoStore::new();
        let created = store.insert(new_todo("Task")).await.unwrap();

        assert!(store.delete_by_id(&created.id).await.unwrap());
        assert!(!store.delete_by_id(&created.id).await.unwrap());
        assert_eq!(store.find_by_id(&created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_document_surfaces_as_storage_error() {
        // Arrange: タイトルの欠けたドキュメントを直接書き込む
        let store = InMemoryTodoStore::new();
        let created = store.insert(new_todo("Task")).await.unwrap();
        store
            .items
            .lock()
            .unwrap()
            .get_mut(&created.id)
            .unwrap()
            .remove(ATTR_TITLE);

        // Act
        let result = store.list_all().await;

        // Assert
        assert!(matches!(result, Err(TodoError::Storage(_))));
    }
}
