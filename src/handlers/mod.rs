// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth)
pub mod protected;
pub mod public;
