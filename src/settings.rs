//! Service settings.
//!
//! Process-level knobs resolved once at startup: bind address, request
//! timeout, the named-config aliases and per-provider endpoints. Values come
//! from `TILEBOARD_*` environment variables with working defaults, so a bare
//! `tileboard` starts and serves.

use std::collections::HashMap;
use std::time::Duration;

/// Env var holding the listener bind address.
const BIND_ADDRESS_VAR: &str = "TILEBOARD_ADDRESS";

/// Env var prefix declaring named configs: `TILEBOARD_CONFIG_<NAME>=<path-or-url>`.
const NAMED_CONFIG_PREFIX: &str = "TILEBOARD_CONFIG_";

/// Env var holding the Jenkins base URL for the build generator.
const JENKINS_URL_VAR: &str = "TILEBOARD_JENKINS_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Listener bind address (e.g. "0.0.0.0:8080").
    pub bind_address: String,

    /// Total budget for one config request, generator calls included.
    pub request_timeout: Duration,

    /// Named config aliases, name → path or URL.
    pub named_configs: HashMap<String, String>,

    pub monitorables: MonitorableSettings,
}

#[derive(Debug, Clone, Default)]
pub struct MonitorableSettings {
    pub jenkins: JenkinsSettings,
}

#[derive(Debug, Clone, Default)]
pub struct JenkinsSettings {
    /// Jenkins base URL; empty keeps the build generator disabled.
    pub url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            named_configs: HashMap::new(),
            monitorables: MonitorableSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `TILEBOARD_*` environment variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(address) = std::env::var(BIND_ADDRESS_VAR) {
            settings.bind_address = address;
        }
        if let Ok(url) = std::env::var(JENKINS_URL_VAR) {
            settings.monitorables.jenkins.url = url;
        }
        for (key, value) in std::env::vars() {
            if let Some(name) = key.strip_prefix(NAMED_CONFIG_PREFIX) {
                if !name.is_empty() && !value.is_empty() {
                    settings
                        .named_configs
                        .insert(name.to_ascii_lowercase(), value);
                }
            }
        }

        settings
    }
}
