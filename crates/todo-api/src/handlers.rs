use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use domain::{
    ApiResponse, CreateTodoInput, NewTodo, TodoId, TodoPatch, TodoRecord, UpdateTodoInput,
};
use infrastructure::TodoStore;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// GET /api/todos
pub async fn list_todos<S: TodoStore>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<ApiResponse<Vec<TodoRecord>>>> {
    let todos = state.store.list_all().await?;
    let records = todos.iter().map(TodoRecord::from).collect();
    Ok(Json(ApiResponse::ok(records)))
}

/// POST /api/todos
///
/// 作成したレコードは 1 要素の配列で返す。
pub async fn create_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTodoInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<TodoRecord>>>)> {
    let Json(input) = payload?;
    let new_todo = NewTodo::new(input.title.as_deref(), input.description.as_deref())?;

    let todo = state.store.insert(new_todo).await?;
    info!(todo_id = %todo.id, "Todo created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(vec![TodoRecord::from(&todo)])),
    ))
}

/// GET /api/todos/{id}
pub async fn get_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<TodoRecord>>> {
    let Path(id) = path?;
    let todo_id = TodoId::parse(&id)?;

    let todo = state
        .store
        .find_by_id(&todo_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ApiResponse::ok(TodoRecord::from(&todo))))
}

/// PUT /api/todos/{id}
///
/// 指定されたフィールドだけを置き換え、`updatedAt` は常に更新する。
pub async fn update_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoInput>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    let todo_id = TodoId::parse(&id)?;
    let Json(input) = payload?;
    let patch = TodoPatch::new(
        input.title.as_deref(),
        input.description.as_deref(),
        input.completed,
    )?;

    if !state.store.update_by_id(&todo_id, &patch).await? {
        return Err(ApiError::NotFound);
    }
    info!(todo_id = %todo_id, "Todo updated");

    Ok(Json(ApiResponse::empty()))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    let todo_id = TodoId::parse(&id)?;

    if !state.store.delete_by_id(&todo_id).await? {
        return Err(ApiError::NotFound);
    }
    info!(todo_id = %todo_id, "Todo deleted");

    Ok(Json(ApiResponse::empty()))
}

/// ルートは存在するが未対応のメソッド
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
