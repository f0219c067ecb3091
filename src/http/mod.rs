//! HTTP delivery layer.
//!
//! # Responsibilities
//! - Assemble the Axum router and its middleware stack
//! - Expose the config pipeline under `/api/v1`
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - Validation problems ride inside the `ConfigBag` with HTTP 200; only
//!   handler bugs surface as 5xx

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
