//! Source document port
//!
//! A source is read with a single suspending call that yields the whole
//! document. Everything downstream of the read is synchronous.

use async_trait::async_trait;

use crate::domain::result::Result;

/// Bytes of one source document plus the name it is reported under
#[derive(Debug, Clone)]
pub struct SourceBytes {
    /// File name, used for format detection and in row errors
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceBytes {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension of the source name, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Something a batch can read one document from
///
/// Implementations: local files, in-memory buffers.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Name reported for this source before it is read
    fn name(&self) -> &str;

    /// Read the whole document
    async fn read(&self) -> Result<SourceBytes>;
}
