// ABOUTME: Template source module for loading template packages from files or URLs
// ABOUTME: Exports the TemplateSource trait, its file and HTTP implementations, and a dispatching loader

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod location;

use async_trait::async_trait;

pub use config::SourceConfig;
pub use error::{Result, SourceError};
pub use file::FileTemplateSource;
pub use http::HttpTemplateSource;
pub use location::TemplateLocation;

#[async_trait]
pub trait TemplateSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw bytes of the template package at `location`.
    async fn fetch(&self, location: &TemplateLocation) -> Result<Vec<u8>>;
}

/// Routes each location to the source that can load it.
pub struct TemplateLoader {
    config: SourceConfig,
    file: FileTemplateSource,
    http: HttpTemplateSource,
}

impl TemplateLoader {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let http = HttpTemplateSource::new(&config)?;
        Ok(Self {
            config,
            file: FileTemplateSource::new(),
            http,
        })
    }

    /// Parse `input` using the configured base URL.
    pub fn locate(&self, input: &str) -> Result<TemplateLocation> {
        TemplateLocation::parse(input, self.config.base_url.as_deref())
    }

    pub async fn load(&self, location: &TemplateLocation) -> Result<Vec<u8>> {
        match location {
            TemplateLocation::File(_) => self.file.fetch(location).await,
            TemplateLocation::Url(_) => self.http.fetch(location).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_loader_dispatches_to_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("letter.docx");
        std::fs::write(&path, b"bytes").unwrap();

        let loader = TemplateLoader::new(SourceConfig::default()).unwrap();
        let location = loader.locate(&path.to_string_lossy()).unwrap();

        assert!(!location.is_remote());
        assert_eq!(loader.load(&location).await.unwrap(), b"bytes");
    }

    #[test]
    fn test_loader_uses_base_url() {
        let config = SourceConfig {
            base_url: Some("https://files.example.com/".to_string()),
            ..SourceConfig::default()
        };
        let loader = TemplateLoader::new(config).unwrap();

        let location = loader.locate("offer-letter.docx").unwrap();
        assert!(location.is_remote());
    }
}
