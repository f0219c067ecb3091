//! Pingdom uptime check provider registration.

use crate::config::schema::{TileType, VariantName};
use crate::config::version::MINIMAL_VERSION;
use crate::params::{FieldKind, FieldSpec, ParamsSchema};
use crate::registry::TileRegistry;

pub const PINGDOM_CHECK_TILE_TYPE: &str = "PINGDOM-CHECK";

pub fn params_schema() -> ParamsSchema {
    ParamsSchema::new(vec![FieldSpec::required("id", FieldKind::Int).query()])
}

pub fn route(variant: &VariantName) -> String {
    format!("/pingdom/{variant}/check")
}

pub fn register(registry: &mut TileRegistry) {
    let variant = VariantName::default();
    registry
        .register_tile(
            TileType::new(PINGDOM_CHECK_TILE_TYPE),
            MINIMAL_VERSION,
            &[variant.clone()],
        )
        .enable(&variant, params_schema(), &route(&variant));
}
