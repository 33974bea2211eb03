use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::commission::{CommissionResolver, ExpectedTier, TierRule};

/// Main configuration structure for AdLab Hub
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdlabConfig {
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Commission tier table and audit expectations
    pub commission: CommissionConfig,
    /// Status notification settings
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, e.g. "info" or "adlab_hub=debug"
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommissionConfig {
    /// Live tier rules. Left empty, the built-in fallback table applies.
    pub tiers: Vec<TierRule>,
    /// Expectations used by `adlab verify`
    pub expected: Vec<ExpectedTier>,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            tiers: Vec::new(),
            expected: ExpectedTier::defaults(),
        }
    }
}

impl CommissionConfig {
    pub fn resolver(&self) -> CommissionResolver {
        CommissionResolver::from_rules(self.tiers.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Buffered status changes per subscriber before the oldest are dropped
    pub channel_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

impl AdlabConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. adlab.toml in the working directory
    /// 3. An explicit file, when given
    /// 4. Environment variables (prefixed with ADLAB__, nested keys split on "__")
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::with_name("adlab").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("ADLAB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AdlabConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists. Returns whether one was read.
    ///
    /// Runs before the subscriber is installed, so callers log the result.
    pub fn load_env_file() -> Result<bool> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            return Ok(true);
        }
        Ok(false)
    }
}
