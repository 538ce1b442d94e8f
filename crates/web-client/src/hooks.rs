use crate::api::TodoApiClient;
use crate::cache::TodoCache;
use domain::{CreateTodoInput, TodoRecord, UpdateTodoInput};
use tracing::{info, warn};

/// ToDo 一覧の取得と変更をまとめた状態ホルダー
///
/// - 作成後は一覧を再取得する（サーバーが払い出した値に揃えるため）
/// - 更新・削除は成功したらローカルのキャッシュだけを書き換える
/// - 失敗は `error` に文字列で残し、それ以外の状態は変えない（自動リトライはしない）
#[derive(Debug)]
pub struct UseTodos {
    api: TodoApiClient,
    cache: TodoCache,
    loading: bool,
    error: Option<String>,
    activated: bool,
}

impl UseTodos {
    pub fn new(api: TodoApiClient) -> Self {
        Self {
            api,
            cache: TodoCache::new(),
            loading: true,
            error: None,
            activated: false,
        }
    }

    /// 初回のみ一覧を取得する
    pub async fn activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.refetch().await;
    }

    pub async fn refetch(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list().await {
            Ok(response) => match (response.success, response.data) {
                (true, Some(todos)) => {
                    info!(count = todos.len(), "Todos fetched");
                    self.cache.replace_all(todos);
                }
                (_, _) => {
                    self.fail(
                        response
                            .error
                            .unwrap_or_else(|| "Failed to fetch todos".to_string()),
                    );
                }
            },
            Err(e) => self.fail(e.to_string()),
        }

        self.loading = false;
    }

    pub async fn add(&mut self, input: CreateTodoInput) -> bool {
        match self.api.create(&input).await {
            Ok(response) if response.success => {
                self.refetch().await;
                true
            }
            Ok(response) => {
                self.fail(
                    response
                        .error
                        .unwrap_or_else(|| "Failed to add todo".to_string()),
                );
                false
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    pub async fn update(&mut self, id: &str, input: UpdateTodoInput) -> bool {
        let input = trimmed(input);
        match self.api.update(id, &input).await {
            Ok(response) if response.success => {
                self.cache.merge_one(id, &input);
                self.error = None;
                true
            }
            Ok(response) => {
                self.fail(
                    response
                        .error
                        .unwrap_or_else(|| "Failed to update todo".to_string()),
                );
                false
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        match self.api.delete(id).await {
            Ok(response) if response.success => {
                self.cache.remove_one(id);
                self.error = None;
                true
            }
            Ok(response) => {
                self.fail(
                    response
                        .error
                        .unwrap_or_else(|| "Failed to delete todo".to_string()),
                );
                false
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    pub fn todos(&self) -> &[TodoRecord] {
        self.cache.items()
    }

    pub fn cache(&self) -> &TodoCache {
        &self.cache
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Todo request failed");
        self.error = Some(message);
    }
}

/// サーバーと同じく文字列フィールドを trim する
fn trimmed(input: UpdateTodoInput) -> UpdateTodoInput {
    UpdateTodoInput {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description.map(|d| d.trim().to_string()),
        completed: input.completed,
    }
}
