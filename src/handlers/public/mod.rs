// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: none (e.g., /health)
// Middleware: CORS and request tracing only

pub mod health;

pub use health::{health, ready};
