use domain::{NewTodo, Todo, TodoError, TodoId, TodoPatch};
use std::future::Future;

/// ドキュメントストアの抽象
///
/// すべて単一ドキュメント・単一ラウンドトリップの操作。トランザクションやバッチは持たない。
/// 実装はクローンしても同じストアを指すハンドルであること。
pub trait TodoStore: Clone + Send + Sync + 'static {
    /// 全件を作成日時の降順で取得
    fn list_all(&self) -> impl Future<Output = Result<Vec<Todo>, TodoError>> + Send;

    /// 識別子とタイムスタンプを払い出して保存し、保存したドキュメントを返す
    fn insert(&self, input: NewTodo) -> impl Future<Output = Result<Todo, TodoError>> + Send;

    fn find_by_id(
        &self,
        todo_id: &TodoId,
    ) -> impl Future<Output = Result<Option<Todo>, TodoError>> + Send;

    /// 一致するドキュメントがあれば部分更新して true を返す
    fn update_by_id(
        &self,
        todo_id: &TodoId,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<bool, TodoError>> + Send;

    /// 一致するドキュメントがあれば削除して true を返す
    fn delete_by_id(&self, todo_id: &TodoId)
        -> impl Future<Output = Result<bool, TodoError>> + Send;
}
