use crate::errors::DomainError;
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// ストアが払い出す ToDo の識別子（ULID）
///
/// 文字列表現は常に 26 文字の Crockford Base32（大文字）に正規化される。
/// ハンドラ・ストアともにこの型を経由して照合するため、表記揺れによる
/// 不一致は発生しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Ulid);

impl TodoId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// 外部から受け取った文字列を識別子として解釈する
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Ulid::from_string(raw.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(raw.to_string()))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 現在時刻（ミリ秒精度に切り詰め）
///
/// ワイヤ表現がミリ秒精度なので、保存値と表示値が一致するようにここで揃える。
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601（例: `2024-05-01T10:00:00.000Z`）
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Validation(format!("Invalid timestamp '{raw}': {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// 検証済みの入力から新しい ToDo を組み立てる
    pub fn create(id: TodoId, input: NewTodo, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// 部分更新を適用する
    ///
    /// `updated_at` は必ず前回値より進める（同一ミリ秒内の連続更新でも単調増加）。
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = patch
            .updated_at
            .max(self.updated_at + Duration::milliseconds(1));
    }
}

/// 作成リクエストを検証した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

impl NewTodo {
    pub fn new(title: Option<&str>, description: Option<&str>) -> Result<Self, DomainError> {
        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
        })
    }
}

/// 更新リクエストを検証した結果
///
/// `None` のフィールドは保存値をそのまま残す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl TodoPatch {
    pub fn new(
        title: Option<&str>,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Self, DomainError> {
        let title = title.map(str::trim);
        if title.is_some_and(str::is_empty) {
            return Err(DomainError::Validation("Title cannot be empty".to_string()));
        }

        Ok(Self {
            title: title.map(str::to_string),
            description: description.map(|d| d.trim().to_string()),
            completed,
            updated_at: now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_id_new_generates_26_char_string() {
        // Act
        let todo_id = TodoId::new();
        let id_str = todo_id.to_string();

        // Assert: 26文字のBase32形式であることを確認
        assert_eq!(id_str.len(), 26);
        let valid_chars = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
        for c in id_str.chars() {
            assert!(valid_chars.contains(c), "Invalid character: {c}");
        }
    }

    #[test]
    fn test_todo_id_parse_roundtrips_canonical_form() {
        let todo_id = TodoId::new();

        let parsed = TodoId::parse(&todo_id.to_string()).unwrap();

        assert_eq!(parsed, todo_id);
    }

    #[test]
    fn test_todo_id_parse_rejects_malformed_input() {
        for raw in ["not-an-id", "", "123", "ZZZZZZZZZZZZZZZZZZZZZZZZZZZ"] {
            let result = TodoId::parse(raw);
            assert_eq!(
                result,
                Err(DomainError::InvalidTodoId(raw.to_string())),
                "input: {raw:?}"
            );
        }
    }

    #[test]
    fn test_new_todo_trims_fields() {
        let input = NewTodo::new(Some("  Buy milk  "), Some("  2 liters ")).unwrap();

        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.description, "2 liters");
    }

    #[test]
    fn test_new_todo_defaults_description_to_empty() {
        let input = NewTodo::new(Some("Buy milk"), None).unwrap();

        assert_eq!(input.description, "");
    }

    #[test]
    fn test_new_todo_rejects_blank_or_missing_title() {
        assert!(matches!(
            NewTodo::new(Some("   "), None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewTodo::new(None, Some("desc")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_create_sets_defaults() {
        // Arrange
        let id = TodoId::new();
        let timestamp = now();
        let input = NewTodo::new(Some("Task"), None).unwrap();

        // Act
        let todo = Todo::create(id, input, timestamp);

        // Assert
        assert_eq!(todo.id, id);
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn test_apply_leaves_omitted_fields_untouched() {
        // Arrange
        let mut todo = Todo::create(
            TodoId::new(),
            NewTodo::new(Some("Task"), Some("details")).unwrap(),
            now(),
        );
        let patch = TodoPatch::new(None, None, Some(true)).unwrap();

        // Act
        todo.apply(&patch);

        // Assert
        assert_eq!(todo.title, "Task");
        assert_eq!(todo.description, "details");
        assert!(todo.completed);
    }

    #[test]
    fn test_apply_strictly_advances_updated_at() {
        // Arrange: 未来の時刻で作成された ToDo に「今」のパッチを当てる
        let future = now() + Duration::seconds(60);
        let mut todo = Todo::create(
            TodoId::new(),
            NewTodo::new(Some("Task"), None).unwrap(),
            future,
        );
        let patch = TodoPatch::new(Some("Renamed"), None, None).unwrap();

        // Act
        todo.apply(&patch);

        // Assert
        assert!(todo.updated_at > todo.created_at);
        assert_eq!(todo.title, "Renamed");
    }

    #[test]
    fn test_patch_trims_and_rejects_blank_title() {
        let patch = TodoPatch::new(Some(" New "), Some(" d "), None).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert_eq!(patch.description.as_deref(), Some("d"));

        assert!(matches!(
            TodoPatch::new(Some("  "), None, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_timestamp_format_is_iso8601_millis() {
        let timestamp = parse_timestamp("2024-05-01T10:00:00.123Z").unwrap();

        assert_eq!(format_timestamp(&timestamp), "2024-05-01T10:00:00.123Z");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
