pub mod todo;

pub use todo::{
    CreateTodoRequest, NewTodo, Todo, TodoFilter, TodoPatch, TodoPriority, TodoStats, TodoStatus,
    UpdateTodoRequest, ValidationError,
};
