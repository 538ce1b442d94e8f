//! ToDo アプリのクライアント側
//!
//! - [`api`]: `/api/todos` を呼ぶ HTTP クライアント
//! - [`cache`] / [`hooks`]: 取得した一覧の保持と更新
//! - [`components`]: 一覧・作成フォーム・編集ダイアログなどの表示部品
//! - [`terminal`]: 端末フロントエンドのコマンド解釈

pub mod api;
pub mod cache;
pub mod components;
pub mod hooks;
pub mod terminal;

pub use api::{ClientError, TodoApiClient};
pub use cache::TodoCache;
pub use hooks::UseTodos;
