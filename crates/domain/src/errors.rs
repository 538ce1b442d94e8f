use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    /// ストア側の障害（接続不可・壊れたドキュメントなど）はすべてここに集約する
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_converts_into_todo_error() {
        // Arrange
        let domain_error = DomainError::InvalidTodoId("abc".to_string());

        // Act
        let error: TodoError = domain_error.clone().into();

        // Assert
        match error {
            TodoError::Domain(inner) => assert_eq!(inner, domain_error),
            other => panic!("Expected Domain variant, got {other:?}"),
        }
    }
}
