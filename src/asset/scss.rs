use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context as _;

use crate::asset::{Asset, CURRENT_DIR};
use crate::filter::Filter;
use crate::foundation::error::ScssResult;

/// In-memory stylesheet asset.
pub struct ScssAsset {
    content: Option<String>,
    filters: Vec<Arc<dyn Filter>>,

    source_root: String,
    source_path: String,
    source_directory: String,
    target_path: String,

    vars: BTreeSet<String>,
    values: BTreeMap<String, serde_json::Value>,
}

impl ScssAsset {
    /// Create an asset with no content.
    pub fn new() -> Self {
        Self {
            content: None,
            filters: Vec::new(),
            source_root: CURRENT_DIR.to_string(),
            source_path: CURRENT_DIR.to_string(),
            source_directory: CURRENT_DIR.to_string(),
            target_path: CURRENT_DIR.to_string(),
            vars: BTreeSet::new(),
            values: BTreeMap::new(),
        }
    }

    /// Create an asset holding `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        let mut asset = Self::new();
        asset.set_content(content.into());
        asset
    }

    /// Read a stylesheet from disk.
    ///
    /// The file's directory becomes the source directory (and root), its file name the source
    /// path, so relative imports resolve next to the file.
    pub fn from_path(path: impl AsRef<Path>) -> ScssResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet '{}'", path.display()))?;

        let mut asset = Self::with_content(content);
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let dir = dir.to_string_lossy().into_owned();
            asset.set_source_root(dir.clone());
            asset.set_source_directory(dir);
        }
        if let Some(name) = path.file_name() {
            asset.set_source_path(name.to_string_lossy().into_owned());
        }
        Ok(asset)
    }

    /// Declare the variable names this asset understands.
    pub fn with_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source root.
    pub fn set_source_root(&mut self, source_root: String) {
        self.source_root = source_root;
    }

    /// Set the source path.
    pub fn set_source_path(&mut self, source_path: String) {
        self.source_path = source_path;
    }

    /// Set the directory used to resolve relative imports.
    pub fn set_source_directory(&mut self, source_directory: String) {
        self.source_directory = source_directory;
    }
}

impl Default for ScssAsset {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScssAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScssAsset")
            .field("content_len", &self.content.as_ref().map(String::len))
            .field(
                "filters",
                &self.filters.iter().map(|x| x.name()).collect::<Vec<_>>(),
            )
            .field("source_root", &self.source_root)
            .field("source_path", &self.source_path)
            .field("source_directory", &self.source_directory)
            .field("target_path", &self.target_path)
            .field("vars", &self.vars)
            .field("values", &self.values)
            .finish()
    }
}

impl Asset for ScssAsset {
    fn ensure_filter(&mut self, filter: Arc<dyn Filter>) {
        if !self.filters.iter().any(|f| Arc::ptr_eq(f, &filter)) {
            self.load(Some(filter));
        }
    }

    fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    fn clear_filters(&mut self) {
        self.filters.clear();
    }

    fn load(&mut self, additional: Option<Arc<dyn Filter>>) {
        if let Some(filter) = additional {
            tracing::trace!(filter = filter.name(), "attach filter");
            self.filters.push(filter);
        }
    }

    #[tracing::instrument(skip_all, fields(source = %self.source_path))]
    fn dump(&mut self, additional: Option<Arc<dyn Filter>>) -> ScssResult<Option<String>> {
        if let Some(filter) = additional {
            self.ensure_filter(filter);
        }
        if self.filters.is_empty() {
            return Ok(self.content.clone());
        }

        // The chain is cloned so filters can borrow the asset mutably.
        let chain = self.filters.clone();
        let mut dumped = None;
        for filter in &chain {
            tracing::trace!(filter = filter.name(), "dump filter");
            filter.filter_dump(&mut *self)?;
            dumped = self.content.clone();
        }
        Ok(dumped)
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    fn source_root(&self) -> &str {
        &self.source_root
    }

    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn source_directory(&self) -> &str {
        &self.source_directory
    }

    fn target_path(&self) -> &str {
        &self.target_path
    }

    fn set_target_path(&mut self, target_path: String) {
        self.target_path = target_path;
    }

    fn last_modified(&self) -> SystemTime {
        SystemTime::now()
    }

    fn vars(&self) -> &BTreeSet<String> {
        &self.vars
    }

    fn values(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.values
    }

    fn set_values(&mut self, values: BTreeMap<String, serde_json::Value>) {
        self.values.extend(values);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/asset/scss.rs"]
mod tests;
