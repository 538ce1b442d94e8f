//! クライアントとやり取りするワイヤ表現

use crate::todo::{format_timestamp, Todo};
use serde::{Deserialize, Serialize};

/// ToDo のワイヤ表現
///
/// 識別子は `_id` と `id` の両方に同じ文字列を載せる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    #[serde(rename = "_id")]
    pub store_id: String,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Todo> for TodoRecord {
    fn from(todo: &Todo) -> Self {
        let id = todo.id.to_string();
        Self {
            store_id: id.clone(),
            id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            created_at: format_timestamp(&todo.created_at),
            updated_at: format_timestamp(&todo.updated_at),
        }
    }
}

impl From<Todo> for TodoRecord {
    fn from(todo: Todo) -> Self {
        Self::from(&todo)
    }
}

/// POST /api/todos リクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTodoInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// PUT /api/todos/{id} リクエスト（すべて任意）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodoInput {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

/// 全エンドポイント共通のレスポンスエンベロープ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// `data` を持たない成功レスポンス（`{"success":true}`）
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}
