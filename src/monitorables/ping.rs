//! ICMP ping provider registration.

use crate::config::schema::{TileType, VariantName};
use crate::config::version::MINIMAL_VERSION;
use crate::params::{FieldKind, FieldSpec, ParamsSchema};
use crate::registry::TileRegistry;

pub const PING_TILE_TYPE: &str = "PING";

pub fn params_schema() -> ParamsSchema {
    ParamsSchema::new(vec![
        FieldSpec::required("hostname", FieldKind::Str).query(),
        FieldSpec::optional("values", FieldKind::IntList).query(),
    ])
}

pub fn route(variant: &VariantName) -> String {
    format!("/ping/{variant}/ping")
}

pub fn register(registry: &mut TileRegistry) {
    let variant = VariantName::default();
    registry
        .register_tile(TileType::new(PING_TILE_TYPE), MINIMAL_VERSION, &[variant.clone()])
        .enable(&variant, params_schema(), &route(&variant));
}
