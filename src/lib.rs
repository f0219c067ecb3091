//! Tileboard — dashboard aggregation backend.
//!
//! A browser tile grid asks this service for its dashboard plan; the service
//! resolves the authored JSON config (inline URL or named alias), validates
//! every tile against the registered providers, expands dynamic generator
//! tiles and hands back the list of probe URLs the UI will poll.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /api/v1/config?config=...
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────────────────────────────────────┐
//!   │  http   │───▶│                config pipeline                │
//!   │ server  │    │  loader ──▶ usecase ──▶ verify ──▶ hydrate    │
//!   └─────────┘    └──────┬───────────────────┬────────────┬──────┘
//!                         │                   │            │
//!                         ▼                   ▼            ▼
//!                  ┌────────────┐      ┌────────────┐ ┌──────────┐
//!                  │ repository │      │  registry  │ │generator │
//!                  │ path / URL │      │ + params   │ │  cache   │
//!                  └────────────┘      └────────────┘ └──────────┘
//! ```
//!
//! Providers under [`monitorables`] register their tile types, parameter
//! schemas and route templates at startup; the registry is immutable
//! afterwards.

// Core subsystems
pub mod cache;
pub mod config;
pub mod http;
pub mod params;
pub mod registry;

// Providers
pub mod monitorables;

// Cross-cutting concerns
pub mod observability;
pub mod settings;

pub use config::schema::ConfigBag;
pub use config::usecase::ConfigUsecase;
pub use http::HttpServer;
pub use registry::TileRegistry;
pub use settings::Settings;
