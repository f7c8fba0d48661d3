//! Asset contract and the stylesheet asset.
//!
//! An asset owns a piece of text plus an ordered chain of [`Filter`]s. The lifecycle has two
//! phases: `load` only attaches filters, `dump` runs them and returns the final text.
//!
//! # Dump mutates
//!
//! The classic asset contract says dumping should not change the asset. Filters here write their
//! output back through [`Asset::set_content`], so after a dump the asset holds the filtered text
//! and a second `dump` filters that text again. Repeated dumps are idempotent only when every
//! attached filter is.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::SystemTime;

use crate::filter::Filter;
use crate::foundation::error::ScssResult;

pub(crate) mod scss;

/// Value assigned to unset source and target locations: the current directory.
pub const CURRENT_DIR: &str = "./";

/// Mutable text payload with an attached filter chain.
pub trait Asset {
    /// Attach `filter` through [`Asset::load`] unless the same instance is already attached.
    fn ensure_filter(&mut self, filter: Arc<dyn Filter>);

    /// Filters in chain order.
    fn filters(&self) -> &[Arc<dyn Filter>];

    /// Detach every filter.
    fn clear_filters(&mut self);

    /// Append `additional` to the chain. Runs nothing.
    fn load(&mut self, additional: Option<Arc<dyn Filter>>);

    /// Ensure `additional` is attached, run every filter's dump hook in order and return the
    /// resulting content. With an empty chain the current content is returned unchanged.
    fn dump(&mut self, additional: Option<Arc<dyn Filter>>) -> ScssResult<Option<String>>;

    /// Current content; `None` until content is first set.
    fn content(&self) -> Option<&str>;

    /// Replace the content. No validation.
    fn set_content(&mut self, content: String);

    /// Root directory (or URL) of the source asset. Defaults to [`CURRENT_DIR`].
    fn source_root(&self) -> &str;

    /// Source path relative to [`Asset::source_root`]. Defaults to [`CURRENT_DIR`].
    fn source_path(&self) -> &str;

    /// Directory used to resolve relative imports. Defaults to [`CURRENT_DIR`].
    fn source_directory(&self) -> &str;

    /// Where the output is meant to be written. Advisory. Defaults to [`CURRENT_DIR`].
    fn target_path(&self) -> &str;

    /// Set the advisory output location.
    fn set_target_path(&mut self, target_path: String);

    /// Always the current time; there is no modification tracking.
    fn last_modified(&self) -> SystemTime;

    /// Variable names understood by this asset.
    fn vars(&self) -> &BTreeSet<String>;

    /// Current variable values.
    fn values(&self) -> &BTreeMap<String, serde_json::Value>;

    /// Merge `values` into the current values. Existing keys are overwritten, others kept.
    fn set_values(&mut self, values: BTreeMap<String, serde_json::Value>);
}
