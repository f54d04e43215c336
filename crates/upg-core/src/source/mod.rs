//! Where navigation and function documents come from.
//!
//! Both sources share one layout under a data root:
//!
//! ```text
//! {root}/navi/navi.json          # Navigation index
//! {root}/function/{name}.json    # One Function per qualified name
//! ```

mod error;
mod file;
mod remote;

pub use error::SourceError;
pub use file::FileSource;
pub use remote::RemoteSource;

use async_trait::async_trait;

use crate::config::DataConfig;
use crate::function::Function;
use crate::navigation::Navigation;

/// Trait for analysis data backends.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Loads and validates the navigation index.
    async fn navigation(&self) -> Result<Navigation, SourceError>;

    /// Loads the function document for a qualified name.
    async fn function(&self, name: &str) -> Result<Function, SourceError>;

    /// Human-readable location, for logs and the page header.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Box<T> {
    async fn navigation(&self) -> Result<Navigation, SourceError> {
        (**self).navigation().await
    }

    async fn function(&self, name: &str) -> Result<Function, SourceError> {
        (**self).function(name).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Pick the source named by the config: a local directory when
/// `data_dir` is set, the remote host otherwise.
pub fn from_config(config: &DataConfig) -> Result<Box<dyn DataSource>, SourceError> {
    match &config.data_dir {
        Some(dir) => Ok(Box::new(FileSource::with_config(dir, config))),
        None => Ok(Box::new(RemoteSource::new(config)?)),
    }
}

/// Reject names that would escape the function directory.
pub(crate) fn check_name(name: &str) -> Result<(), SourceError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(SourceError::InvalidName(name.to_string()));
    }
    Ok(())
}
