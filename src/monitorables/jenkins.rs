//! Jenkins provider registration.
//!
//! Registers the `JENKINS-BUILD` tile plus the `GENERATE:JENKINS-BUILD`
//! generator, whose builder lists jobs from the Jenkins JSON API and emits
//! one tile per matching job. The generator is only enabled when a Jenkins
//! base URL is configured.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Map;

use crate::config::schema::{GeneratedTile, TileType, VariantName};
use crate::config::version::{ConfigVersion, MINIMAL_VERSION};
use crate::params::{FieldKind, FieldSpec, ParamsSchema, ParamsValues};
use crate::registry::{GeneratorError, TileBuilder, TileBuilderFuture, TileRegistry};
use crate::settings::JenkinsSettings;

pub const JENKINS_BUILD_TILE_TYPE: &str = "JENKINS-BUILD";

pub fn build_schema() -> ParamsSchema {
    ParamsSchema::new(vec![
        FieldSpec::required("job", FieldKind::Str).query(),
        FieldSpec::optional("branch", FieldKind::Str)
            .query()
            .available_since(ConfigVersion::new(1, 1)),
    ])
}

pub fn generator_schema() -> ParamsSchema {
    ParamsSchema::new(vec![
        FieldSpec::required("job", FieldKind::Str),
        FieldSpec::optional("match", FieldKind::Str),
        FieldSpec::optional("unmatch", FieldKind::Str),
    ])
}

pub fn build_route(variant: &VariantName) -> String {
    format!("/jenkins/{variant}/build")
}

pub fn register(registry: &mut TileRegistry, settings: &JenkinsSettings) {
    let variant = VariantName::default();
    registry
        .register_tile(
            TileType::new(JENKINS_BUILD_TILE_TYPE),
            MINIMAL_VERSION,
            &[variant.clone()],
        )
        .enable(&variant, build_schema(), &build_route(&variant));

    let enabler = registry.register_generator(
        TileType::new(JENKINS_BUILD_TILE_TYPE),
        MINIMAL_VERSION,
        &[variant.clone()],
    );
    if settings.url.is_empty() {
        tracing::info!("no jenkins URL configured, build generator stays disabled");
    } else {
        let client = JenkinsClient::new(&settings.url);
        enabler.enable(&variant, generator_schema(), generator_builder(client));
    }
}

/// Thin client for the Jenkins JSON API.
#[derive(Clone)]
pub struct JenkinsClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct JobListing {
    jobs: Vec<JenkinsJob>,
}

#[derive(Debug, Deserialize)]
struct JenkinsJob {
    name: String,
}

impl JenkinsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn list_jobs(&self) -> Result<Vec<String>, GeneratorError> {
        let url = format!("{}/api/json?tree=jobs[name]", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(map_transport_error)?;
        let listing: JobListing = response.json().await.map_err(map_transport_error)?;
        Ok(listing.jobs.into_iter().map(|job| job.name).collect())
    }
}

fn map_transport_error(err: reqwest::Error) -> GeneratorError {
    if err.is_timeout() {
        GeneratorError::Timeout
    } else {
        GeneratorError::Failed(err.to_string())
    }
}

fn generator_builder(client: JenkinsClient) -> TileBuilder {
    Arc::new(move |values: ParamsValues| -> TileBuilderFuture {
        let client = client.clone();
        Box::pin(async move {
            let jobs = client.list_jobs().await?;
            Ok(select_jobs(jobs, &values)
                .into_iter()
                .map(job_tile)
                .collect())
        })
    })
}

/// Keep the jobs whose name contains the `job` pattern, then apply the
/// optional `match`/`unmatch` refinements.
fn select_jobs(jobs: Vec<String>, values: &ParamsValues) -> Vec<String> {
    let pattern = values.str_value("job").unwrap_or_default().to_string();
    let keep = values.str_value("match").map(str::to_string);
    let drop = values.str_value("unmatch").map(str::to_string);

    jobs.into_iter()
        .filter(|name| name.contains(&pattern))
        .filter(|name| keep.as_ref().is_none_or(|keep| name.contains(keep)))
        .filter(|name| drop.as_ref().is_none_or(|drop| !name.contains(drop)))
        .collect()
}

fn job_tile(name: String) -> GeneratedTile {
    let mut params = Map::new();
    params.insert("job".to_string(), name.clone().into());
    GeneratedTile {
        label: Some(name),
        params,
        config_variant: None,
    }
}
