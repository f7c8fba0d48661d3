use std::path::PathBuf;
use std::time::Duration;

/// Convenience result type used across the crate.
pub type ScssResult<T> = Result<T, ScssError>;

/// Top-level error taxonomy for assets, filters and compiler invocation.
#[derive(thiserror::Error, Debug)]
pub enum ScssError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The compiler binary could not be started (missing, not executable, ...).
    #[error("failed to launch '{}': {source}", program.display())]
    ProcessLaunch {
        /// Resolved path of the binary that failed to start.
        program: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran and reported a failure.
    #[error("compilation error: {0}")]
    Compilation(Box<CompilationFailure>),

    /// The compiler did not finish within the configured bound and was killed.
    #[error("'{}' did not finish within {}ms", program.display(), timeout.as_millis())]
    ProcessTimeout {
        /// Resolved path of the binary that was killed.
        program: PathBuf,
        /// Configured wait bound.
        timeout: Duration,
    },

    /// Creating, writing or deleting the temporary input file failed.
    #[error("temporary file error: {0}")]
    TemporaryIo(#[source] std::io::Error),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScssError {
    /// Build a [`ScssError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScssError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Borrow the compilation diagnostics when this is a [`ScssError::Compilation`].
    pub fn compilation_failure(&self) -> Option<&CompilationFailure> {
        match self {
            Self::Compilation(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<CompilationFailure> for ScssError {
    fn from(failure: CompilationFailure) -> Self {
        Self::Compilation(Box::new(failure))
    }
}

/// Diagnostics captured from a compiler run that exited unsuccessfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilationFailure {
    /// Shell-escaped command line that was executed.
    pub command_line: String,
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Asset content that was fed to the compiler.
    pub input: String,
}

impl std::fmt::Display for CompilationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} exited with status {code}", self.command_line)?,
            None => write!(f, "{} was terminated by a signal", self.command_line)?,
        }
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        if !detail.is_empty() {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
