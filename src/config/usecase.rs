//! Config pipeline orchestration.
//!
//! [`ConfigUsecase`] owns the three pipeline stages — `get_config`
//! (resolve + parse), `verify` (structural + schema validation, in
//! `verify.rs`) and `hydrate` (URL assignment + generator expansion, in
//! `hydrate.rs`) — plus the `get_config_list` read. Every stage returns or
//! mutates a [`ConfigBag`]; errors accumulate, the bag always goes back to
//! the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::GeneratorResultCache;
use crate::config::errors::{ConfigError, ConfigErrorId};
use crate::config::loader::{ConfigRepository, DecodeErrorKind, RepositoryError, RECOGNISED_KEYS};
use crate::config::schema::{ConfigBag, ConfigMetadata};
use crate::config::version::ConfigVersion;
use crate::registry::TileRegistry;

/// Deadline for one generator builder invocation.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters of a dashboard config request.
#[derive(Debug, Clone, Default)]
pub struct ConfigParams {
    /// A named config alias, or an inline `http(s)://` URL.
    pub config: String,
}

pub struct ConfigUsecase {
    repository: Arc<dyn ConfigRepository>,
    registry: Arc<TileRegistry>,
    named_configs: HashMap<String, String>,
    pub(crate) generator_cache: GeneratorResultCache,
    pub(crate) generator_timeout: Duration,
}

impl ConfigUsecase {
    pub fn new(
        repository: Arc<dyn ConfigRepository>,
        registry: Arc<TileRegistry>,
        named_configs: HashMap<String, String>,
    ) -> Self {
        Self {
            repository,
            registry,
            named_configs,
            generator_cache: GeneratorResultCache::default(),
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    pub fn with_generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }

    pub(crate) fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Resolve the requested config to raw JSON and parse it.
    pub async fn get_config(&self, params: &ConfigParams) -> ConfigBag {
        let mut bag = ConfigBag::default();

        let result = if is_url(&params.config) {
            self.repository.get_config_from_url(&params.config).await
        } else if let Some(target) = self.named_config_target(&params.config) {
            if is_url(&target) {
                self.repository.get_config_from_url(&target).await
            } else {
                self.repository.get_config_from_path(&target).await
            }
        } else {
            tracing::debug!(name = %params.config, "unknown named config requested");
            bag.add_error(
                ConfigError::new(
                    ConfigErrorId::UnknownNamedConfig,
                    format!("unknown named config {:?}", params.config),
                )
                .with_value(params.config.clone())
                .with_expected(self.known_config_names().join(", ")),
            );
            return bag;
        };

        match result {
            Ok(config) => bag.config = Some(config),
            Err(err) => bag.add_error(translate_repository_error(err)),
        }
        bag
    }

    /// Names of the configured dashboards, sorted for stable output.
    pub fn get_config_list(&self) -> Vec<ConfigMetadata> {
        self.known_config_names()
            .into_iter()
            .map(|name| ConfigMetadata { name })
            .collect()
    }

    /// Run the whole pipeline, stopping after the first stage that records
    /// errors. The bag is returned in every case.
    pub async fn resolve(&self, params: &ConfigParams) -> ConfigBag {
        let mut bag = self.get_config(params).await;
        if bag.has_errors() {
            return bag;
        }
        self.verify(&mut bag);
        if bag.has_errors() {
            return bag;
        }
        self.hydrate(&mut bag).await;
        bag
    }

    fn named_config_target(&self, name: &str) -> Option<String> {
        self.named_configs
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, target)| target.clone())
    }

    fn known_config_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.named_configs.keys().cloned().collect();
        names.sort();
        names
    }
}

fn is_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Map a repository failure onto the error identifier the UI routes on.
fn translate_repository_error(err: RepositoryError) -> ConfigError {
    match err {
        RepositoryError::NotFound { path_or_url } => {
            ConfigError::new(ConfigErrorId::ConfigNotFound, "config not found")
                .with_value(path_or_url)
        }
        RepositoryError::VersionFormat { wrong_version } => ConfigError::new(
            ConfigErrorId::UnsupportedVersion,
            format!("unsupported config version {wrong_version:?}"),
        )
        .with_field("version")
        .with_value(wrong_version)
        .with_expected(ConfigVersion::supported_range_hint()),
        RepositoryError::Unmarshal {
            kind,
            message,
            raw_config,
        } => match kind {
            DecodeErrorKind::UnknownField { field } => {
                ConfigError::new(ConfigErrorId::UnknownField, message)
                    .with_field(field)
                    .with_expected(RECOGNISED_KEYS)
                    .with_extract(raw_config)
            }
            DecodeErrorKind::TypeMismatch { field, expected } => {
                ConfigError::new(ConfigErrorId::FieldTypeMismatch, message)
                    .with_field(field)
                    .with_expected(expected)
                    .with_extract(raw_config)
            }
            DecodeErrorKind::InvalidEscape { highlight } => {
                ConfigError::new(ConfigErrorId::InvalidEscapedCharacter, message)
                    .with_extract(raw_config)
                    .with_highlight(highlight)
            }
            DecodeErrorKind::Other => {
                ConfigError::new(ConfigErrorId::UnableToParseConfig, message)
                    .with_extract(raw_config)
            }
        },
        RepositoryError::Transport { message } => {
            tracing::warn!(error = %message, "unexpected repository failure");
            ConfigError::new(ConfigErrorId::UnexpectedError, message)
        }
    }
}
