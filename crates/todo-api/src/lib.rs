//! HTTP API（axum）
//!
//! `/api/todos` 配下の CRUD と `/health` を提供します。
//! レスポンスはすべて `{ success, data?, error? }` のエンベロープで返します。

pub mod error;
pub mod handlers;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use infrastructure::{InMemoryTodoStore, TodoStore};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

/// インメモリストアでルータを構築して返します（ローカル開発/テスト用）。
pub fn app() -> Router {
    app_with_state(AppState::new(InMemoryTodoStore::new()))
}

/// 外部から状態を注入できる版
pub fn app_with_state<S: TodoStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/todos",
            get(handlers::list_todos::<S>)
                .post(handlers::create_todo::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/todos/:id",
            get(handlers::get_todo::<S>)
                .put(handlers::update_todo::<S>)
                .delete(handlers::delete_todo::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
}

impl<S: TodoStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}

/// ヘルスチェック用ハンドラ
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::Request,
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn get_health_returns_ok() {
        let app = app();

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
