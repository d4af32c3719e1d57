pub mod collection;
pub mod record;
pub mod stats;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::create as todo_create;
pub use collection::list as todo_list;

pub use record::delete as todo_delete;
pub use record::get as todo_get;
pub use record::put as todo_put;

pub use stats::get as todo_stats;
