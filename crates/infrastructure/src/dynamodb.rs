use crate::models::{
    item_to_todo, sort_newest_first, todo_to_item, DynamoDbKeys, Item, ATTR_UPDATED_AT,
    TODO_PARTITION,
};
use crate::TodoStore;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use domain::{format_timestamp, now, NewTodo, Todo, TodoError, TodoId, TodoPatch};
use shared::Config;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// 遅延初期化される共有 DynamoDB クライアント
///
/// 最初の呼び出しで SDK クライアントを生成し、以降はすべてのクローンで同じものを使う。
#[derive(Clone)]
pub struct DynamoDbClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: OnceCell<Client>,
    table_name: String,
    region: String,
    endpoint: Option<String>,
}

impl DynamoDbClient {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                client: OnceCell::new(),
                table_name: config.dynamodb_table.clone(),
                region: config.aws_region.clone(),
                endpoint: config.dynamodb_endpoint.clone(),
            }),
        }
    }

    pub async fn client(&self) -> &Client {
        self.inner
            .client
            .get_or_init(|| build_client(&self.inner.region, self.inner.endpoint.as_deref()))
            .await
    }

    pub fn table_name(&self) -> &str {
        &self.inner.table_name
    }
}

async fn build_client(region: &str, endpoint: Option<&str>) -> Client {
    // SDK の自動リトライは無効化する（失敗はそのまま呼び出し側へ返す）
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::disabled())
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(endpoint) = endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    info!(region, endpoint = ?endpoint, "DynamoDB client initialized");
    Client::from_conf(builder.build())
}

fn storage_error<E>(operation: &str, err: E) -> TodoError
where
    E: std::error::Error,
{
    TodoError::Storage(format!("{operation} failed: {}", DisplayErrorContext(err)))
}

/// 更新の競合時に読み直す最大回数
const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// DynamoDB を使ったドキュメントストア
#[derive(Clone)]
pub struct DynamoDbTodoStore {
    db: DynamoDbClient,
}

impl DynamoDbTodoStore {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

impl TodoStore for DynamoDbTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let client = self.db.client().await;
        let mut todos = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = client
                .query()
                .table_name(self.db.table_name())
                .key_condition_expression("PK = :pk")
                .expression_attribute_values(":pk", AttributeValue::S(TODO_PARTITION.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| storage_error("Query", e))?;

            for item in output.items() {
                todos.push(item_to_todo(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        sort_newest_first(&mut todos);
        debug!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo, TodoError> {
        let todo = Todo::create(TodoId::new(), input, now());

        self.db
            .client()
            .await
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| storage_error("PutItem", e))?;

        Ok(todo)
    }

    async fn find_by_id(&self, todo_id: &TodoId) -> Result<Option<Todo>, TodoError> {
        let output = self
            .db
            .client()
            .await
            .get_item()
            .table_name(self.db.table_name())
            .set_key(Some(DynamoDbKeys::for_todo(todo_id).into_key_map()))
            .send()
            .await
            .map_err(|e| storage_error("GetItem", e))?;

        output.item().map(item_to_todo).transpose()
    }

    async fn update_by_id(&self, todo_id: &TodoId, patch: &TodoPatch) -> Result<bool, TodoError> {
        // 読み取り → Todo::apply → 前回の updatedAt を条件に書き戻す（楽観的ロック）
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let Some(mut todo) = self.find_by_id(todo_id).await? else {
                return Ok(false);
            };
            let expected_updated_at = format_timestamp(&todo.updated_at);
            todo.apply(patch);

            let result = self
                .db
                .client()
                .await
                .put_item()
                .table_name(self.db.table_name())
                .set_item(Some(todo_to_item(&todo)))
                .condition_expression("attribute_exists(PK) AND #updatedAt = :expectedUpdatedAt")
                .expression_attribute_names("#updatedAt", ATTR_UPDATED_AT)
                .expression_attribute_values(
                    ":expectedUpdatedAt",
                    AttributeValue::S(expected_updated_at),
                )
                .send()
                .await;

            match result {
                Ok(_) => return Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
                {
                    // 削除された場合は次の読み取りで not matched になる
                    warn!(todo_id = %todo_id, attempt, "Concurrent update detected, retrying");
                }
                Err(err) => return Err(storage_error("PutItem", err)),
            }
        }

        Err(TodoError::Storage(format!(
            "Update of {todo_id} conflicted {MAX_UPDATE_ATTEMPTS} times"
        )))
    }

    async fn delete_by_id(&self, todo_id: &TodoId) -> Result<bool, TodoError> {
        let result = self
            .db
            .client()
            .await
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(DynamoDbKeys::for_todo(todo_id).into_key_map()))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(storage_error("DeleteItem", err)),
        }
    }
}
