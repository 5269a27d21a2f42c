// ABOUTME: Template source reading templates from the local filesystem
// ABOUTME: Uses tokio fs so loading never blocks the async runtime

use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::fs;
use tracing::debug;

use super::error::{Result, SourceError};
use super::location::TemplateLocation;
use super::TemplateSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileTemplateSource;

impl FileTemplateSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, location: &TemplateLocation) -> Result<Vec<u8>> {
        let path = match location {
            TemplateLocation::File(path) => path,
            other => {
                return Err(SourceError::Unsupported {
                    source_name: self.name(),
                    location: other.to_string(),
                })
            }
        };

        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound { path: path.clone() },
            _ => SourceError::IoError(e),
        })?;

        debug!("Read template {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }
}
