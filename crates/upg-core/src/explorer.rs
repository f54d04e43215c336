use std::sync::Arc;

use tracing::{info, warn};

use crate::function::Function;
use crate::navigation::Navigation;
use crate::panel::Panel;
use crate::source::{DataSource, SourceError};

/// A browsing session over one data source.
///
/// The navigation index is loaded once and shared read-only; functions are
/// fetched on demand when a path is selected. Cloning is cheap and the clone
/// keeps the index it was made with.
pub struct Explorer<S: DataSource> {
    source: Arc<S>,
    navi: Arc<Navigation>,
}

impl<S: DataSource> Clone for Explorer<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            navi: Arc::clone(&self.navi),
        }
    }
}

impl<S: DataSource> Explorer<S> {
    /// Loads the navigation index from `source`.
    pub async fn load(source: S) -> Result<Self, SourceError> {
        let navi = Arc::new(source.navigation().await?);
        info!(source = %source.describe(), paths = navi.len(), "loaded navigation");
        Ok(Self {
            source: Arc::new(source),
            navi,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navi
    }

    /// Shared handle to the current index. Survives a later reload.
    pub fn navigation_handle(&self) -> Arc<Navigation> {
        Arc::clone(&self.navi)
    }

    /// Fetches a fresh navigation index without touching the current one.
    pub async fn fetch_navigation(&self) -> Result<Navigation, SourceError> {
        self.source.navigation().await
    }

    /// Swaps in a new navigation index. Indices from the previous index
    /// must not be used afterwards.
    pub fn replace(&mut self, navi: Navigation) {
        info!(paths = navi.len(), "reloaded navigation");
        self.navi = Arc::new(navi);
    }

    /// Fetches and swaps in a new navigation index.
    pub async fn reload(&mut self) -> Result<(), SourceError> {
        let navi = self.fetch_navigation().await?;
        self.replace(navi);
        Ok(())
    }

    /// Fetches a function by qualified name.
    pub async fn function(&self, name: &str) -> Result<Function, SourceError> {
        let func = self.source.function(name).await?;
        if let Some(tags) = &func.tags {
            let missing = tags.missing_specs();
            if !missing.is_empty() {
                warn!(function = %name, ?missing, "tags without spec entries");
            }
        }
        Ok(func)
    }

    /// Fetches the function at a navigation index.
    pub async fn function_at(&self, idx: usize) -> Result<Function, SourceError> {
        let name = self
            .navi
            .name_of(idx)
            .ok_or(SourceError::UnknownPath(idx))?
            .to_string();
        if !self.navi.is_fn(idx) {
            return Err(SourceError::NotAFunction(name));
        }
        self.function(&name).await
    }

    /// Renders one panel of a function.
    pub async fn panel(&self, name: &str, panel: Panel) -> Result<String, SourceError> {
        let func = self.function(name).await?;
        panel
            .render(&func)
            .map_err(|e| SourceError::decode(name, e))
    }
}
