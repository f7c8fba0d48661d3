//! Stylesheet assets with a filter chain, compiled by the external `sassc` binary.
//!
//! # Overview
//!
//! 1. **Asset**: [`ScssAsset`] holds stylesheet text and an ordered chain of [`Filter`]s.
//! 2. **Load**: [`Asset::load`] / [`Asset::ensure_filter`] attach filters; nothing runs yet.
//! 3. **Dump**: [`Asset::dump`] runs every filter in order and returns the final text.
//! 4. **Compile**: [`CompileFilter`] resolves the platform's `sassc` build, feeds it the content
//!    (stdin, or a temp file on Windows) and replaces the content with the compiled CSS.
//!
//! ```no_run
//! use std::sync::Arc;
//! use scss_asset::{Asset, CompileFilter, ScssAsset};
//!
//! let mut asset = ScssAsset::with_content("$c: #333; a { color: $c; }");
//! let mut filter = CompileFilter::new(None);
//! filter.set_precision(Some(5));
//! let css = asset.dump(Some(Arc::new(filter)))?;
//! # Ok::<(), scss_asset::ScssError>(())
//! ```
//!
//! Dumping writes filter output back into the asset; see [`asset`] for what that means for
//! repeated dumps.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod asset;
pub mod compile;
pub mod config;
pub mod filter;

pub use crate::asset::scss::ScssAsset;
pub use crate::asset::{Asset, CURRENT_DIR};
pub use crate::compile::binary::{BINARY_BASE_NAME, binary_name, bundled_bin_dir, resolve_binary};
pub use crate::compile::filter::{CompileFilter, STDIN_FLAG};
pub use crate::compile::options::{
    CompileOptions, InputStrategy, OutputStyle, OutputStyleParseError,
};
pub use crate::compile::process::{
    ProcessOutput, ProcessRunner, SystemRunner, render_command_line, shell_escape,
};
pub use crate::config::PipelineConfig;
pub use crate::filter::{CallbackFilter, Filter};
pub use crate::foundation::error::{CompilationFailure, ScssError, ScssResult};
pub use crate::foundation::platform::{HostPlatform, OsFamily};
