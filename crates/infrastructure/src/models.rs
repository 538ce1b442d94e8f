use aws_sdk_dynamodb::types::AttributeValue;
use domain::{format_timestamp, parse_timestamp, Todo, TodoError, TodoId};
use std::collections::HashMap;

/// DynamoDB のアイテム（ストアのネイティブなドキュメント表現）
pub type Item = HashMap<String, AttributeValue>;

/// すべての ToDo を格納するパーティション
pub const TODO_PARTITION: &str = "TODO";

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_COMPLETED: &str = "completed";
pub const ATTR_CREATED_AT: &str = "createdAt";
pub const ATTR_UPDATED_AT: &str = "updatedAt";

/// DynamoDB Single Table Design のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String,
    pub sk: String,
}

impl DynamoDbKeys {
    /// ToDo 用のキーを生成
    ///
    /// 識別子の文字列化はここでのみ行う。
    pub fn for_todo(todo_id: &TodoId) -> Self {
        Self {
            pk: TODO_PARTITION.to_string(),
            sk: format!("TODO#{todo_id}"),
        }
    }

    pub fn into_key_map(self) -> Item {
        HashMap::from([
            (ATTR_PK.to_string(), AttributeValue::S(self.pk)),
            (ATTR_SK.to_string(), AttributeValue::S(self.sk)),
        ])
    }
}

/// ToDo を DynamoDB アイテムへ変換
pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = DynamoDbKeys::for_todo(&todo.id).into_key_map();

    item.insert(ATTR_ID.to_string(), AttributeValue::S(todo.id.to_string()));
    item.insert(ATTR_TITLE.to_string(), AttributeValue::S(todo.title.clone()));
    item.insert(
        ATTR_DESCRIPTION.to_string(),
        AttributeValue::S(todo.description.clone()),
    );
    item.insert(
        ATTR_COMPLETED.to_string(),
        AttributeValue::Bool(todo.completed),
    );
    item.insert(
        ATTR_CREATED_AT.to_string(),
        AttributeValue::S(format_timestamp(&todo.created_at)),
    );
    item.insert(
        ATTR_UPDATED_AT.to_string(),
        AttributeValue::S(format_timestamp(&todo.updated_at)),
    );

    item
}

/// DynamoDB アイテムから ToDo を復元
///
/// `title`・`id`・タイムスタンプが欠けていれば失敗する。
/// `description` が無ければ空文字、`completed` が無ければ false とみなす。
pub fn item_to_todo(item: &Item) -> Result<Todo, TodoError> {
    let id = TodoId::parse(required_s(item, ATTR_ID)?).map_err(malformed)?;
    let title = required_s(item, ATTR_TITLE)?.to_string();
    let description = item
        .get(ATTR_DESCRIPTION)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default();
    let completed = item
        .get(ATTR_COMPLETED)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false);
    let created_at = parse_timestamp(required_s(item, ATTR_CREATED_AT)?).map_err(malformed)?;
    let updated_at = parse_timestamp(required_s(item, ATTR_UPDATED_AT)?).map_err(malformed)?;

    Ok(Todo {
        id,
        title,
        description,
        completed,
        created_at,
        updated_at,
    })
}

/// 作成日時の降順（同時刻は ID の降順）に並べる
pub fn sort_newest_first(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn required_s<'a>(item: &'a Item, name: &str) -> Result<&'a str, TodoError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
        .ok_or_else(|| TodoError::Storage(format!("Malformed todo document: missing {name}")))
}

fn malformed(e: domain::DomainError) -> TodoError {
    TodoError::Storage(format!("Malformed todo document: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{now, NewTodo};

    fn sample_todo(title: &str) -> Todo {
        Todo::create(
            TodoId::new(),
            NewTodo::new(Some(title), Some("details")).unwrap(),
            now(),
        )
    }

    #[test]
    fn test_item_roundtrip_preserves_todo() {
        // Arrange
        let todo = sample_todo("Buy milk");

        // Act
        let item = todo_to_item(&todo);
        let restored = item_to_todo(&item).unwrap();

        // Assert
        assert_eq!(restored, todo);
    }

    #[test]
    fn test_item_carries_single_table_keys() {
        let todo = sample_todo("Buy milk");

        let item = todo_to_item(&todo);

        assert_eq!(item[ATTR_PK], AttributeValue::S("TODO".to_string()));
        assert_eq!(item[ATTR_SK], AttributeValue::S(format!("TODO#{}", todo.id)));
    }

    #[test]
    fn test_decoding_fails_without_title() {
        // Arrange
        let mut item = todo_to_item(&sample_todo("Buy milk"));
        item.remove(ATTR_TITLE);

        // Act
        let result = item_to_todo(&item);

        // Assert
        match result {
            Err(TodoError::Storage(message)) => assert!(message.contains("title")),
            other => panic!("Expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_decoding_applies_defaults_for_optional_fields() {
        let mut item = todo_to_item(&sample_todo("Buy milk"));
        item.remove(ATTR_DESCRIPTION);
        item.remove(ATTR_COMPLETED);

        let todo = item_to_todo(&item).unwrap();

        assert_eq!(todo.description, "");
        assert!(!todo.completed);
    }

    #[test]
    fn test_decoding_rejects_malformed_identifier() {
        let mut item = todo_to_item(&sample_todo("Buy milk"));
        item.insert(ATTR_ID.to_string(), AttributeValue::S("not-an-id".to_string()));

        assert!(matches!(item_to_todo(&item), Err(TodoError::Storage(_))));
    }

    #[test]
    fn test_sort_newest_first() {
        // Arrange
        let base = now();
        let mut todos: Vec<Todo> = (0..3)
            .map(|i| {
                let mut todo = sample_todo(&format!("t{i}"));
                todo.created_at = base + chrono::Duration::seconds(i);
                todo
            })
            .collect();

        // Act
        sort_newest_first(&mut todos);

        // Assert
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["t2", "t1", "t0"]);
    }
}
