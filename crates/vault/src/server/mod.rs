//! Axum HTTP server, routing, and shared state.
//!
//! # Responsibilities
//! - Define the Axum router with the encryption utility routes and shared
//!   middleware.
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod router;
pub mod state;
