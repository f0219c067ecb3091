//! Config pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! request (?config=name-or-url)
//!     → usecase.rs  get_config: resolve alias, fetch via loader.rs
//!     → loader.rs   strict JSON decode → Config (typed decode errors)
//!     → verify.rs   top-level + per-tile validation against the registry
//!     → hydrate.rs  URL assignment, generator expansion, cache fallback
//!     → ConfigBag (config + accumulated errors) back to the handler
//! ```
//!
//! # Design Decisions
//! - Every stage returns the same [`schema::ConfigBag`] envelope; errors
//!   accumulate and a partially populated config may ride along with them
//! - Verify and Hydrate never halt on the first tile error; get_config stops
//!   on its single input's first failure
//! - Serialisation is canonical (declared field order, `None` skipped) so
//!   error extracts are reproducible

pub mod errors;
pub mod hydrate;
pub mod loader;
pub mod schema;
pub mod usecase;
pub mod verify;
pub mod version;

#[cfg(test)]
pub(crate) mod testsupport;

pub use schema::{Config, ConfigBag, Tile};
pub use usecase::{ConfigParams, ConfigUsecase};
