// ABOUTME: Template source downloading templates over HTTP(S)
// ABOUTME: Applies the configured timeout and user agent and rejects non-success responses

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::config::SourceConfig;
use super::error::{Result, SourceError};
use super::location::TemplateLocation;
use super::TemplateSource;

#[derive(Debug, Clone)]
pub struct HttpTemplateSource {
    client: Client,
}

impl HttpTemplateSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, location: &TemplateLocation) -> Result<Vec<u8>> {
        let url = match location {
            TemplateLocation::Url(url) => url,
            other => {
                return Err(SourceError::Unsupported {
                    source_name: self.name(),
                    location: other.to_string(),
                })
            }
        };

        debug!("Fetching template from {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        info!("Fetched template {} ({} bytes)", url, bytes.len());
        Ok(bytes)
    }
}
