//! Monitorable providers.
//!
//! Each provider owns its tile type constant, parameter schemas and backend
//! route templates, and registers them with the [`TileRegistry`] at startup.
//! Status evaluation happens behind the registered routes and is a separate
//! concern; the config pipeline only needs to know what can be served.

pub mod http;
pub mod jenkins;
pub mod ping;
pub mod pingdom;
pub mod port;

use crate::registry::TileRegistry;
use crate::settings::MonitorableSettings;

/// Register every built-in provider. Called once at startup, before the
/// registry is frozen behind an `Arc`.
pub fn register_all(registry: &mut TileRegistry, settings: &MonitorableSettings) {
    ping::register(registry);
    port::register(registry);
    http::register(registry);
    pingdom::register(registry);
    jenkins::register(registry, &settings.jenkins);
}
