//! TCP port provider registration.

use crate::config::schema::{TileType, VariantName};
use crate::config::version::MINIMAL_VERSION;
use crate::params::{FieldKind, FieldSpec, FieldViolation, ParamsSchema, ParamsValues};
use crate::registry::TileRegistry;

pub const PORT_TILE_TYPE: &str = "PORT";

pub fn params_schema() -> ParamsSchema {
    ParamsSchema::new(vec![
        FieldSpec::required("hostname", FieldKind::Str).query(),
        FieldSpec::required("port", FieldKind::Int).query(),
    ])
    .with_check(check_port)
}

fn check_port(values: &ParamsValues) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if values.int_value("port").is_some_and(|port| port <= 0) {
        violations.push(FieldViolation::new("port", "port > 0"));
    }
    violations
}

pub fn route(variant: &VariantName) -> String {
    format!("/port/{variant}/port")
}

pub fn register(registry: &mut TileRegistry) {
    let variant = VariantName::default();
    registry
        .register_tile(TileType::new(PORT_TILE_TYPE), MINIMAL_VERSION, &[variant.clone()])
        .enable(&variant, params_schema(), &route(&variant));
}
