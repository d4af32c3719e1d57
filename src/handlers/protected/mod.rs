// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/todos
// Middleware: JWT validation, which injects the caller's `AuthUser`
//
// Every handler here receives `AuthUser` explicitly and passes its `user_id`
// to the store; no handler reads or writes a todo without it.

pub mod todos;

pub use todos::*;
