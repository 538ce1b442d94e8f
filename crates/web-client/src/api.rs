//! `/api/todos` を呼び出す HTTP クライアント
//!
//! ステータスコードに関わらずレスポンスボディをエンベロープとして解釈する。
//! 成否の判断は呼び出し側（[`crate::hooks::UseTodos`]）が `success` を見て行う。

use domain::{ApiResponse, CreateTodoInput, TodoRecord, UpdateTodoInput};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response (HTTP {status}): {message}")]
    InvalidResponse { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct TodoApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/api/todos/{id}", self.base_url)
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<TodoRecord>>, ClientError> {
        let response = self.http.get(self.collection_url()).send().await?;
        decode(response).await
    }

    pub async fn create(
        &self,
        input: &CreateTodoInput,
    ) -> Result<ApiResponse<Vec<TodoRecord>>, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get(&self, id: &str) -> Result<ApiResponse<TodoRecord>, ClientError> {
        let response = self.http.get(self.item_url(id)).send().await?;
        decode(response).await
    }

    pub async fn update(
        &self,
        id: &str,
        input: &UpdateTodoInput,
    ) -> Result<ApiResponse<()>, ClientError> {
        let response = self.http.put(self.item_url(id)).json(input).send().await?;
        decode(response).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<()>, ClientError> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, ClientError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    debug!(status, len = bytes.len(), "API response received");

    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse {
        status,
        message: e.to_string(),
    })
}
