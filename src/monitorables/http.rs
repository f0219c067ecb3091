//! HTTP status provider registration.

use crate::config::schema::{TileType, VariantName};
use crate::config::version::MINIMAL_VERSION;
use crate::params::{FieldKind, FieldSpec, FieldViolation, ParamsSchema, ParamsValues};
use crate::registry::TileRegistry;

pub const HTTP_STATUS_TILE_TYPE: &str = "HTTP-STATUS";

pub fn params_schema() -> ParamsSchema {
    ParamsSchema::new(vec![
        FieldSpec::required("url", FieldKind::Str).query(),
        FieldSpec::optional("statusCodeMin", FieldKind::Int).query(),
        FieldSpec::optional("statusCodeMax", FieldKind::Int).query(),
    ])
    .with_check(check_status_range)
}

fn check_status_range(values: &ParamsValues) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    if let (Some(min), Some(max)) = (
        values.int_value("statusCodeMin"),
        values.int_value("statusCodeMax"),
    ) {
        if min > max {
            violations.push(FieldViolation::new(
                "statusCodeMin",
                "statusCodeMin <= statusCodeMax",
            ));
        }
    }
    violations
}

pub fn route(variant: &VariantName) -> String {
    format!("/http/{variant}/status")
}

pub fn register(registry: &mut TileRegistry) {
    let variant = VariantName::default();
    registry
        .register_tile(
            TileType::new(HTTP_STATUS_TILE_TYPE),
            MINIMAL_VERSION,
            &[variant.clone()],
        )
        .enable(&variant, params_schema(), &route(&variant));
}
