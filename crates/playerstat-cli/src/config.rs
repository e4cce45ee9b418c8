//! playerstat CLI Configuration Management
//!
//! Configuration is layered with figment, lowest priority first: built-in
//! defaults, `playerstat.toml` in the working directory, `~/.playerstat/config.toml`,
//! `PLAYERSTAT_*` environment variables, then command line overrides.
//! Nested keys use a double underscore in environment variables, for example
//! `PLAYERSTAT_STATUS__SERVER_KEY`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use playerstat_core::StatusConfig;

use crate::error::{CliError, Result};

const LOCAL_CONFIG_FILE: &str = "playerstat.toml";

// ----------------------------------------------------------------------------
// Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the playerstat CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Status aggregation, persistence and notification settings
    pub status: StatusConfig,
    /// Logging output settings
    pub logging: LoggingConfig,
}

/// Logging output options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable debug-level logging
    pub verbose: bool,
    /// Include the tracing target in log lines
    pub show_target: bool,
}

/// Values given on the command line, applied over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub library: Option<String>,
    pub status_interval_secs: Option<u64>,
    pub verbose: bool,
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration from the standard sources
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(LOCAL_CONFIG_FILE))
            .merge(Toml::file(Self::default_config_path()?))
            .merge(Env::prefixed("PLAYERSTAT_").split("__"));

        Self::extract(Self::apply_overrides(figment, overrides))
    }

    /// Load configuration from a specific file, still honoring the
    /// environment and command line overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P, overrides: &Overrides) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PLAYERSTAT_").split("__"));

        Self::extract(Self::apply_overrides(figment, overrides))
    }

    fn apply_overrides(mut figment: Figment, overrides: &Overrides) -> Figment {
        if let Some(library) = &overrides.library {
            figment = figment.merge(("status.library_path", library.clone()));
        }
        if let Some(interval) = overrides.status_interval_secs {
            figment = figment.merge(("status.status_interval_secs", interval));
        }
        if overrides.verbose {
            figment = figment.merge(("logging.verbose", true));
        }
        figment
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("No home directory available")?;
        Ok(home.join(".playerstat").join("config.toml"))
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<()> {
        self.status.validate()?;
        if self.status.library_path.as_os_str().is_empty() {
            return Err(CliError::Config("Library path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Generate an example configuration file
    pub fn example_config() -> String {
        let mut example = Self::default();
        example.status.library_path = PathBuf::from("/var/lib/player/library");
        example.status.server_key = "changeme".to_string();
        example.status.hardware_key = "0123456789abcdef".to_string();
        example.status.xmds_url = "https://cms.example.com/xmds.php?v=5".to_string();

        toml::to_string_pretty(&example).unwrap_or_else(|_| {
            "# Failed to generate example configuration\n".to_string()
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
