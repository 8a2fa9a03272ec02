//! Probe configuration: an optional YAML file overlaid with
//! `SESSION_PROBE__`-prefixed environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use session::SessionConfig;
use static_identity_plugin::StaticIdentityPluginConfig;

/// Environment prefix; nested keys are separated by `__`, e.g.
/// `SESSION_PROBE__SESSION__AUTH_DISABLED=true`.
pub const ENV_PREFIX: &str = "SESSION_PROBE__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub session: SessionConfig,
    pub static_identity_plugin: StaticIdentityPluginConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the credential file. The platform config directory
    /// when unset.
    pub dir: Option<PathBuf>,
}

impl ProbeConfig {
    /// Load from `path` (if given) and the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or the merged configuration does not
    /// deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid session-probe configuration")
    }
}
