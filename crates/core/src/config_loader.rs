use crate::config::MonitorConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/flowstate.yaml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads monitor configuration by layering the built-in defaults, the
    /// default YAML file (if present), and `FLOWSTATE_`-prefixed environment
    /// variables (`FLOWSTATE_SIGNALS__EPSILON=0.1` overrides
    /// `signals.epsilon`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load() -> Result<MonitorConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads monitor configuration from a specific YAML file, still applying
    /// defaults underneath and environment overrides on top.
    ///
    /// A missing file is not an error; the defaults simply stand.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<MonitorConfig> {
        let config: MonitorConfig = Figment::from(Serialized::defaults(MonitorConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("FLOWSTATE_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }
}
