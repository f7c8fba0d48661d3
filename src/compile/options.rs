use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output formatting style understood by the compiler's `--style` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Nested indentation mirroring the source.
    Nested,
    /// One declaration per line.
    Expanded,
    /// One rule per line.
    Compact,
    /// Minified.
    Compressed,
}

impl OutputStyle {
    /// Flag value passed to the compiler.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }
}

impl FromStr for OutputStyle {
    type Err = OutputStyleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nested" => Ok(OutputStyle::Nested),
            "expanded" => Ok(OutputStyle::Expanded),
            "compact" => Ok(OutputStyle::Compact),
            "compressed" => Ok(OutputStyle::Compressed),
            other => Err(OutputStyleParseError::UnknownStyle(other.to_string())),
        }
    }
}

/// Error returned when parsing an [`OutputStyle`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OutputStyleParseError {
    /// The name is not one of the compiler's styles.
    #[error("unknown output style '{0}'")]
    UnknownStyle(String),
}

/// How the asset content reaches the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStrategy {
    /// Pipe the content into the child's standard input (`-s`).
    Stdin,
    /// Write the content to a temporary file and pass its path.
    TempFile,
}

impl InputStrategy {
    /// Strategy used when nothing is configured: temp files on Windows, stdin elsewhere.
    pub fn for_platform(platform: &crate::HostPlatform) -> Self {
        if platform.os_family.is_windows() {
            InputStrategy::TempFile
        } else {
            InputStrategy::Stdin
        }
    }
}

/// Compiler flag configuration. Every option is unset by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// `--unix-newlines`
    pub unix_newlines: bool,
    /// `--style <name>`
    pub style: Option<OutputStyle>,
    /// `--precision <n>`
    pub precision: Option<u32>,
    /// `--quiet`
    pub quiet: bool,
    /// `--debug-info`
    pub debug_info: bool,
    /// `--line-numbers`
    pub line_numbers: bool,
    /// `--sourcemap`
    pub source_map: bool,
    /// `--cache-location <dir>`
    pub cache_location: Option<PathBuf>,
    /// `--no-cache`
    pub no_cache: bool,
    /// Extra `--load-path <dir>` entries, emitted in order.
    pub load_paths: Vec<PathBuf>,
}

impl CompileOptions {
    /// Build the flag list for one invocation, excluding the input selector.
    ///
    /// `source_dir` is the asset's own directory; when non-empty it becomes the first load path.
    pub fn to_args(&self, source_dir: Option<&str>) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        if let Some(dir) = source_dir.filter(|d| !d.is_empty()) {
            args.push("--load-path".into());
            args.push(dir.into());
        }
        if self.unix_newlines {
            args.push("--unix-newlines".into());
        }
        if let Some(style) = self.style {
            args.push("--style".into());
            args.push(style.as_str().into());
        }
        if let Some(precision) = self.precision {
            args.push("--precision".into());
            args.push(precision.to_string().into());
        }
        if self.quiet {
            args.push("--quiet".into());
        }
        if self.debug_info {
            args.push("--debug-info".into());
        }
        if self.line_numbers {
            args.push("--line-numbers".into());
        }
        if self.source_map {
            args.push("--sourcemap".into());
        }
        for path in &self.load_paths {
            args.push("--load-path".into());
            args.push(path.into());
        }
        if let Some(cache) = &self.cache_location {
            args.push("--cache-location".into());
            args.push(cache.into());
        }
        if self.no_cache {
            args.push("--no-cache".into());
        }

        args
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/options.rs"]
mod tests;
