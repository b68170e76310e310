//! Source readers for local files and in-memory buffers

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::ports::{SourceBytes, SourceReader};

/// A document on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

#[async_trait]
impl SourceReader for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<SourceBytes> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(SourceBytes::new(self.name.clone(), bytes))
    }
}

/// A document already held in memory (uploads, tests)
#[derive(Debug, Clone)]
pub struct MemorySource {
    document: SourceBytes,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: SourceBytes::new(name, bytes),
        }
    }
}

#[async_trait]
impl SourceReader for MemorySource {
    fn name(&self) -> &str {
        &self.document.name
    }

    async fn read(&self) -> Result<SourceBytes> {
        Ok(self.document.clone())
    }
}
