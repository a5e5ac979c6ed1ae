//! Domain model (ids, items, commands/completions, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod todo;

pub use self::errors::{ClientError, ErrorKind};
pub use self::events::{Command, Completion, Operation};
pub use self::ids::TodoId;
pub use self::todo::{DoneUpdate, ErrorBody, NewTodo, TodoItem, TodoText};
