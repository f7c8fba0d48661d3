//! JSON pipeline configuration with environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::compile::options::{CompileOptions, InputStrategy};
use crate::foundation::error::{ScssError, ScssResult};

/// Environment variable overriding [`PipelineConfig::bin_dir`].
pub const ENV_BIN_DIR: &str = "SCSS_ASSET_BIN_DIR";
/// Environment variable overriding [`PipelineConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "SCSS_ASSET_TIMEOUT_MS";

/// Settings for building a [`crate::CompileFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding the compiler binary; the bundled `dist/` when unset.
    pub bin_dir: Option<PathBuf>,
    /// Input strategy; the platform default when unset.
    pub input: Option<InputStrategy>,
    /// Wait bound per compiler run, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Compiler flags.
    pub compiler: CompileOptions,
}

impl PipelineConfig {
    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ScssResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&data)
    }

    /// Parse a JSON config document.
    pub fn from_json_str(data: &str) -> ScssResult<Self> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| ScssError::serde(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no compile could succeed with.
    pub fn validate(&self) -> ScssResult<()> {
        if self.timeout_ms == Some(0) {
            return Err(ScssError::validation(
                "timeout_ms must be greater than zero; omit it for no bound",
            ));
        }
        Ok(())
    }

    /// Layer overrides from the process environment on top of this config.
    pub fn with_env(self) -> ScssResult<Self> {
        self.with_overrides(EnvOverrides::from_env())
    }

    fn with_overrides(mut self, env: EnvOverrides) -> ScssResult<Self> {
        if let Some(dir) = env.bin_dir.filter(|d| !d.is_empty()) {
            self.bin_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = env.timeout_ms {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                ScssError::validation(format!(
                    "{ENV_TIMEOUT_MS} must be a number of milliseconds, got '{raw}'"
                ))
            })?;
            self.timeout_ms = Some(ms);
        }
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Default, Clone)]
struct EnvOverrides {
    bin_dir: Option<String>,
    timeout_ms: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            bin_dir: std::env::var(ENV_BIN_DIR).ok(),
            timeout_ms: std::env::var(ENV_TIMEOUT_MS).ok(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
