//! Observability concerns.

pub mod logging;
