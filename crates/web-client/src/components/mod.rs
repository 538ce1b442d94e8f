pub mod add_todo;
pub mod edit_dialog;
pub mod filter;
pub mod page;
pub mod todo_list;

pub use add_todo::AddTodoForm;
pub use edit_dialog::EditTodoDialog;
pub use filter::Filter;
pub use page::Page;
pub use todo_list::TodoList;
