//! Filter contract and a closure-backed filter.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::asset::Asset;
use crate::foundation::error::ScssResult;

/// A transformation step attached to an [`Asset`].
///
/// Filters are shared as `Arc<dyn Filter>`; the asset's chain compares them by identity.
/// Both hooks may rewrite the asset's content through [`Asset::set_content`].
pub trait Filter: Send + Sync {
    /// Hook run when the asset is loaded.
    fn filter_load(&self, asset: &mut dyn Asset) -> ScssResult<()>;

    /// Hook run by [`Asset::dump`], once per dump, in chain order.
    fn filter_dump(&self, asset: &mut dyn Asset) -> ScssResult<()>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

type ContentFn = dyn Fn(&str) -> ScssResult<String> + Send + Sync;

/// Filter that rewrites content with a closure on dump (and optionally on load).
///
/// Counts its invocations, which makes it handy for tests and debugging.
pub struct CallbackFilter {
    name: String,
    on_load: bool,
    transform: Box<ContentFn>,
    calls: AtomicUsize,
}

impl CallbackFilter {
    /// Create a filter applying `transform` to the current content (absent content reads as `""`).
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> ScssResult<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            on_load: false,
            transform: Box::new(transform),
            calls: AtomicUsize::new(0),
        }
    }

    /// Also run the transform from `filter_load`.
    pub fn on_load(mut self, enabled: bool) -> Self {
        self.on_load = enabled;
        self
    }

    /// Number of times the transform ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn apply(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = (self.transform)(asset.content().unwrap_or_default())?;
        asset.set_content(next);
        Ok(())
    }
}

impl std::fmt::Debug for CallbackFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackFilter")
            .field("name", &self.name)
            .field("on_load", &self.on_load)
            .field("calls", &self.calls())
            .finish()
    }
}

impl Filter for CallbackFilter {
    fn filter_load(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        if self.on_load {
            self.apply(asset)?;
        }
        Ok(())
    }

    fn filter_dump(&self, asset: &mut dyn Asset) -> ScssResult<()> {
        self.apply(asset)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/callback.rs"]
mod tests;
