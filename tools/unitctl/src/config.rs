//! unitctl configuration
//!
//! Sources, later ones override earlier ones:
//! 1. Built-in defaults
//! 2. YAML file (`--config`, default `config/units.yaml`; a missing file is skipped)
//! 3. Environment variables prefixed `UNITCTL_` (e.g. `UNITCTL_HEX_UPPERCASE=false`)

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use unit_codec::UnitDescriptor;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/units.yaml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "UNITCTL_";

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitctlConfig {
    /// Print hex digits in upper case
    #[serde(default = "default_hex_uppercase")]
    pub hex_uppercase: bool,
    /// Named descriptors, validated while loading
    #[serde(default)]
    pub descriptors: BTreeMap<String, UnitDescriptor>,
}

fn default_hex_uppercase() -> bool {
    true
}

impl Default for UnitctlConfig {
    fn default() -> Self {
        Self {
            hex_uppercase: default_hex_uppercase(),
            descriptors: BTreeMap::new(),
        }
    }
}

impl UnitctlConfig {
    /// Load configuration from defaults, `path` and the environment
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading unitctl config from {}", path.display());
        let config: Self = Self::figment(path)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        debug!(
            "Loaded {} descriptor(s), hex_uppercase={}",
            config.descriptors.len(),
            config.hex_uppercase
        );
        Ok(config)
    }

    /// Output settings only; the catalog is not read or validated
    pub fn load_hex_uppercase(path: &Path) -> Result<bool> {
        Self::figment(path)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract_inner("hex_uppercase")
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Defaults plus the YAML file, without environment overrides
    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Yaml::file(path))
    }

    /// Look up a catalog entry by name
    pub fn descriptor(&self, name: &str) -> Option<&UnitDescriptor> {
        self.descriptors.get(name)
    }
}
