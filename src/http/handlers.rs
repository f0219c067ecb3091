//! `/api/v1` handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::schema::{ConfigBag, ConfigMetadata};
use crate::config::usecase::ConfigParams;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigQuery {
    /// Named config alias or inline URL; empty behaves as an unknown name.
    #[serde(default)]
    pub config: String,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Resolve, verify and hydrate the requested dashboard config. Always 200;
/// problems ride inside the bag's `errors`.
pub async fn get_config(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
) -> Json<ConfigBag> {
    tracing::debug!(config = %query.config, "resolving dashboard config");
    let bag = state
        .usecase
        .resolve(&ConfigParams {
            config: query.config,
        })
        .await;
    if bag.has_errors() {
        tracing::debug!(errors = bag.errors.len(), "config resolved with errors");
    }
    Json(bag)
}

/// List the configured dashboard names.
pub async fn get_config_list(State(state): State<AppState>) -> Json<Vec<ConfigMetadata>> {
    Json(state.usecase.get_config_list())
}

pub async fn get_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
