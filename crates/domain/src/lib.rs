pub mod errors;
pub mod record;
pub mod todo;

pub use errors::*;
pub use record::*;
pub use todo::*;
