use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::config::{DataConfig, DEFAULT_FUNCTION_DIR, DEFAULT_NAVI_PATH};
use crate::function::Function;
use crate::navigation::Navigation;

use super::error::SourceError;
use super::{check_name, DataSource};

/// Analysis data stored in a local directory.
///
/// ```text
/// {root}/
///   navi/navi.json
///   function/
///     poc::SecretRegion::from.json
/// ```
pub struct FileSource {
    root: PathBuf,
    navi_path: String,
    function_dir: String,
}

impl FileSource {
    /// Creates a FileSource with the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            navi_path: DEFAULT_NAVI_PATH.to_string(),
            function_dir: DEFAULT_FUNCTION_DIR.to_string(),
        }
    }

    /// Creates a FileSource using the layout from `config`.
    pub fn with_config(root: impl Into<PathBuf>, config: &DataConfig) -> Self {
        Self {
            root: root.into(),
            navi_path: config.navi_path.clone(),
            function_dir: config.function_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the navigation document.
    pub fn navi_file(&self) -> PathBuf {
        self.root.join(&self.navi_path)
    }

    /// Returns the path to a function document.
    pub fn function_file(&self, name: &str) -> Result<PathBuf, SourceError> {
        check_name(name)?;
        Ok(self
            .root
            .join(&self.function_dir)
            .join(format!("{name}.json")))
    }

    /// Writes the navigation document, creating directories as needed.
    pub async fn save_navigation(&self, navi: &Navigation) -> Result<(), SourceError> {
        let path = self.navi_file();
        let json = serde_json::to_string_pretty(navi)
            .map_err(|e| SourceError::encode("navigation", e))?;
        write_file(&path, json).await
    }

    /// Writes a function document under `name`.
    pub async fn save_function(&self, name: &str, func: &Function) -> Result<(), SourceError> {
        let path = self.function_file(name)?;
        let json =
            serde_json::to_string_pretty(func).map_err(|e| SourceError::encode(name, e))?;
        write_file(&path, json).await
    }

    async fn read(&self, path: &Path, what: &str) -> Result<String, SourceError> {
        debug!(path = %path.display(), "reading");
        match fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(what.to_string()))
            }
            Err(e) => Err(SourceError::io(path, e)),
        }
    }
}

async fn write_file(path: &Path, content: String) -> Result<(), SourceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SourceError::io(parent, e))?;
    }
    fs::write(path, content)
        .await
        .map_err(|e| SourceError::io(path, e))
}

#[async_trait]
impl DataSource for FileSource {
    async fn navigation(&self) -> Result<Navigation, SourceError> {
        let path = self.navi_file();
        let json = self.read(&path, &path.display().to_string()).await?;
        Ok(Navigation::from_json(&json)?)
    }

    async fn function(&self, name: &str) -> Result<Function, SourceError> {
        let path = self.function_file(name)?;
        let json = self.read(&path, name).await?;
        Function::from_json(&json).map_err(|e| SourceError::decode(name, e))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
