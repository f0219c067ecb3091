//! Shared fixtures for config pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;

use crate::config::loader::{parse_config, ConfigRepository, RepositoryError};
use crate::config::schema::{Config, ConfigBag, GeneratedTile, Tile, TileType, VariantName};
use crate::config::usecase::ConfigUsecase;
use crate::config::version::{CURRENT_VERSION, MINIMAL_VERSION};
use crate::monitorables::{jenkins, ping, pingdom, port};
use crate::registry::{GeneratorError, TileBuilder, TileBuilderFuture, TileRegistry};

/// Call counters shared with a [`MockRepository`].
#[derive(Clone, Default)]
pub(crate) struct Counters {
    path: Arc<AtomicUsize>,
    url: Arc<AtomicUsize>,
}

impl Counters {
    pub fn path_calls(&self) -> usize {
        self.path.load(Ordering::SeqCst)
    }

    pub fn url_calls(&self) -> usize {
        self.url.load(Ordering::SeqCst)
    }
}

/// Test double for the config repository.
#[derive(Default)]
pub(crate) struct MockRepository {
    path_error: Option<RepositoryError>,
    url_error: Option<RepositoryError>,
    counters: Counters,
}

impl MockRepository {
    pub fn with_path_error(mut self, error: RepositoryError) -> Self {
        self.path_error = Some(error);
        self
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

#[async_trait]
impl ConfigRepository for MockRepository {
    async fn get_config_from_path(&self, _path: &str) -> Result<Config, RepositoryError> {
        self.counters.path.fetch_add(1, Ordering::SeqCst);
        match &self.path_error {
            Some(error) => Err(error.clone()),
            None => Ok(Config::default()),
        }
    }

    async fn get_config_from_url(&self, _url: &str) -> Result<Config, RepositoryError> {
        self.counters.url.fetch_add(1, Ordering::SeqCst);
        match &self.url_error {
            Some(error) => Err(error.clone()),
            None => Ok(Config::default()),
        }
    }
}

/// Registry mirroring a small production setup: ping, port, pingdom and a
/// jenkins tile with an extra enabled variant plus one declared-but-disabled
/// variant.
pub(crate) fn test_registry() -> TileRegistry {
    let mut registry = TileRegistry::new();
    ping::register(&mut registry);
    port::register(&mut registry);
    pingdom::register(&mut registry);

    let default = VariantName::default();
    let variant1 = VariantName::new("variant1");
    registry
        .register_tile(
            TileType::new(jenkins::JENKINS_BUILD_TILE_TYPE),
            MINIMAL_VERSION,
            &[
                default.clone(),
                variant1.clone(),
                VariantName::new("disabledVariant"),
            ],
        )
        .enable(
            &default,
            jenkins::build_schema(),
            &jenkins::build_route(&default),
        )
        .enable(
            &variant1,
            jenkins::build_schema(),
            &jenkins::build_route(&variant1),
        );
    registry
}

pub(crate) fn test_usecase(
    repository: MockRepository,
    named_configs: HashMap<String, String>,
) -> ConfigUsecase {
    test_usecase_with_registry(repository, named_configs, test_registry())
}

pub(crate) fn test_usecase_with_registry(
    repository: MockRepository,
    named_configs: HashMap<String, String>,
    registry: TileRegistry,
) -> ConfigUsecase {
    ConfigUsecase::new(Arc::new(repository), Arc::new(registry), named_configs)
}

/// Parse a raw config document into a bag, panicking on decode errors.
pub(crate) fn bag_from(raw: &str) -> ConfigBag {
    ConfigBag {
        config: Some(parse_config(raw).expect("test config must parse")),
        errors: Vec::new(),
    }
}

/// Bag holding an empty config at the current version, for tile-level tests.
pub(crate) fn current_version_bag() -> ConfigBag {
    ConfigBag {
        config: Some(Config {
            version: Some(CURRENT_VERSION),
            ..Config::default()
        }),
        errors: Vec::new(),
    }
}

/// Parse one tile document.
pub(crate) fn tile_from(raw: &str) -> Tile {
    serde_json::from_str(raw).expect("test tile must parse")
}

/// A generated tile carrying a `job` param.
pub(crate) fn generated(job: &str, label: Option<&str>) -> GeneratedTile {
    let mut params = Map::new();
    params.insert("job".to_string(), job.into());
    GeneratedTile {
        label: label.map(str::to_string),
        params,
        config_variant: None,
    }
}

/// Builder returning a fixed tile list.
pub(crate) fn fixed_builder(tiles: Vec<GeneratedTile>) -> TileBuilder {
    Arc::new(move |_values| -> TileBuilderFuture {
        let tiles = tiles.clone();
        Box::pin(async move { Ok(tiles) })
    })
}

/// Builder failing with a plain error.
pub(crate) fn failing_builder(message: &'static str) -> TileBuilder {
    Arc::new(move |_values| -> TileBuilderFuture {
        Box::pin(async move { Err(GeneratorError::Failed(message.to_string())) })
    })
}

/// Builder signalling a deadline expiry.
pub(crate) fn timeout_builder() -> TileBuilder {
    Arc::new(|_values| -> TileBuilderFuture { Box::pin(async { Err(GeneratorError::Timeout) }) })
}
