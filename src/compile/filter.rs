use std::ffi::OsString;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::asset::Asset;
use crate::compile::binary::resolve_binary;
use crate::compile::options::{CompileOptions, InputStrategy, OutputStyle};
use crate::compile::process::{ProcessOutput, ProcessRunner, SystemRunner, render_command_line};
use crate::config::PipelineConfig;
use crate::filter::Filter;
use crate::foundation::error::{CompilationFailure, ScssError, ScssResult};
use crate::foundation::platform::HostPlatform;

/// Flag telling the compiler to read its source from standard input.
pub const STDIN_FLAG: &str = "-s";

/// Filter that compiles the asset content with the external `sassc` binary.
///
/// The binary path is resolved once, at construction, from the explicit directory (or the
/// bundled one) and the host platform. Each [`CompileFilter::apply`] then builds the argument
/// list from [`CompileOptions`], runs the compiler through a [`ProcessRunner`] and, on a zero
/// exit, replaces the asset content with the compiler's standard output. On failure the asset is
/// left untouched.
pub struct CompileFilter {
    binary: PathBuf,
    platform: HostPlatform,
    strategy: InputStrategy,
    options: CompileOptions,
    system: SystemRunner,
    injected: Option<Arc<dyn ProcessRunner>>,
}

impl CompileFilter {
    /// Filter for the running host, using the binary found in `bin_dir` (or the bundled one).
    pub fn new(bin_dir: Option<&Path>) -> Self {
        Self::for_platform(bin_dir, HostPlatform::detect())
    }

    /// Filter for an explicit platform description.
    pub fn for_platform(bin_dir: Option<&Path>, platform: HostPlatform) -> Self {
        Self {
            binary: resolve_binary(bin_dir, &platform),
            platform,
            strategy: InputStrategy::for_platform(&platform),
            options: CompileOptions::default(),
            system: SystemRunner::new(),
            injected: None,
        }
    }

    /// Build a filter from a loaded [`PipelineConfig`].
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut filter = Self::new(config.bin_dir.as_deref());
        if let Some(strategy) = config.input {
            filter.strategy = strategy;
        }
        filter.options = config.compiler.clone();
        let timeout = config.timeout_ms.map(Duration::from_millis);
        filter.system = SystemRunner::new().with_timeout(timeout);
        filter
    }

    /// Swap the process runner (test doubles, custom sandboxes).
    ///
    /// An injected runner owns its own timing; [`CompileFilter::with_timeout`] only bounds the
    /// built-in [`SystemRunner`].
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.injected = Some(runner);
        self
    }

    /// Override the platform default input strategy.
    pub fn with_strategy(mut self, strategy: InputStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Bound the built-in [`SystemRunner`]; the child is killed when it overruns.
    ///
    /// A zero duration means no bound. Has no effect on a runner set through
    /// [`CompileFilter::with_runner`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.system = self.system.with_timeout(Some(timeout));
        self
    }

    /// Wait bound of the built-in runner, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.system.timeout()
    }

    fn runner(&self) -> &dyn ProcessRunner {
        match &self.injected {
            Some(runner) => runner.as_ref(),
            None => &self.system,
        }
    }

    /// Resolved compiler path.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Platform the binary was resolved for.
    pub fn platform(&self) -> &HostPlatform {
        &self.platform
    }

    /// Active input strategy.
    pub fn strategy(&self) -> InputStrategy {
        self.strategy
    }

    /// Current flag configuration.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Mutable flag configuration.
    pub fn options_mut(&mut self) -> &mut CompileOptions {
        &mut self.options
    }

    /// `--unix-newlines`
    pub fn set_unix_newlines(&mut self, enabled: bool) {
        self.options.unix_newlines = enabled;
    }

    /// `--style <name>`; `None` leaves the compiler default.
    pub fn set_style(&mut self, style: Option<OutputStyle>) {
        self.options.style = style;
    }

    /// `--precision <n>`
    pub fn set_precision(&mut self, precision: Option<u32>) {
        self.options.precision = precision;
    }

    /// `--quiet`
    pub fn set_quiet(&mut self, enabled: bool) {
        self.options.quiet = enabled;
    }

    /// `--debug-info`
    pub fn set_debug_info(&mut self, enabled: bool) {
        self.options.debug_info = enabled;
    }

    /// `--line-numbers`
    pub fn set_line_numbers(&mut self, enabled: bool) {
        self.options.line_numbers = enabled;
    }

    /// `--sourcemap`
    pub fn set_source_map(&mut self, enabled: bool) {
        self.options.source_map = enabled;
    }

    /// `--cache-location <dir>`
    pub fn set_cache_location(&mut self, location: Option<PathBuf>) {
        self.options.cache_location = location;
    }

    /// `--no-cache`
    pub fn set_no_cache(&mut self, enabled: bool) {
        self.options.no_cache = enabled;
    }

    /// Replace the extra load paths.
    pub fn set_load_paths(&mut self, paths: Vec<PathBuf>) {
        self.options.load_paths = paths;
    }

    /// Append one extra `--load-path`.
    pub fn add_load_path(&mut self, path: impl Into<PathBuf>) {
        self.options.load_paths.push(path.into());
    }

    /// Arguments for compiling `asset` through standard input.
    pub fn stdin_args(&self, asset: &dyn Asset) -> Vec<OsString> {
        let mut args = self.options.to_args(Some(asset.source_directory()));
        args.push(STDIN_FLAG.into());
        args
    }

    /// Shell-escaped rendering of the compiler invocation for `args`.
    pub fn command_line(&self, args: &[OsString]) -> String {
        render_command_line(&self.binary, args, self.platform.os_family)
    }

    /// Compile the asset in place.
    ///
    /// Errors: [`ScssError::ProcessLaunch`] when the binary cannot start,
    /// [`ScssError::Compilation`] on a non-zero exit, [`ScssError::ProcessTimeout`] when a bound
    /// is configured and exceeded, [`ScssError::TemporaryIo`] for temp-file strategy I/O.
    #[tracing::instrument(
        skip_all,
        fields(binary = %self.binary.display(), strategy = ?self.strategy)
    )]
    pub fn apply(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        let input = asset.content().unwrap_or_default().to_string();

        let (args, output) = match self.strategy {
            InputStrategy::Stdin => {
                let args = self.stdin_args(asset);
                tracing::debug!(command = %self.command_line(&args), "invoking compiler");
                let output = self.runner().run(&self.binary, &args, Some(input.as_bytes()))?;
                (args, output)
            }
            InputStrategy::TempFile => self.run_with_temp_file(asset, &input)?,
        };

        if !output.success() {
            let failure = CompilationFailure {
                command_line: self.command_line(&args),
                exit_code: output.exit_code,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                input,
            };
            tracing::warn!(
                exit_code = ?failure.exit_code,
                "compiler failed: {}",
                failure.stderr.trim()
            );
            return Err(failure.into());
        }

        asset.set_content(String::from_utf8_lossy(&output.stdout).into_owned());
        Ok(())
    }

    fn run_with_temp_file(
        &self,
        asset: &dyn Asset,
        input: &str,
    ) -> ScssResult<(Vec<OsString>, ProcessOutput)> {
        let mut file = tempfile::Builder::new()
            .prefix("scss")
            .suffix(".scss")
            .tempfile()
            .map_err(ScssError::TemporaryIo)?;
        file.write_all(input.as_bytes())
            .and_then(|()| file.flush())
            .map_err(ScssError::TemporaryIo)?;
        // Close our handle; the path is still removed on drop.
        let temp_path = file.into_temp_path();

        let mut args = self.options.to_args(Some(asset.source_directory()));
        args.push(temp_path.as_os_str().to_os_string());
        tracing::debug!(command = %self.command_line(&args), "invoking compiler on temp file");

        let run = self.runner().run(&self.binary, &args, None);
        let removed = temp_path.close();
        let output = run?;
        removed.map_err(ScssError::TemporaryIo)?;
        Ok((args, output))
    }
}

impl std::fmt::Debug for CompileFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileFilter")
            .field("binary", &self.binary)
            .field("platform", &self.platform)
            .field("strategy", &self.strategy)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Filter for CompileFilter {
    fn filter_load(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        self.apply(asset)
    }

    fn filter_dump(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        self.apply(asset)
    }

    fn name(&self) -> &str {
        "compile"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/filter.rs"]
mod tests;
