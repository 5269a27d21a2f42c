// ABOUTME: Configuration management for the docmerge application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::config::OutputConfig;
use crate::source::SourceConfig;
use crate::template::RenderOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub render: RenderOptions,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&contents)?
            }
            _ => Config::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            PathBuf::from("docmerge.yaml"),
            PathBuf::from("docmerge.yml"),
            PathBuf::from(".docmerge.yaml"),
            PathBuf::from(".docmerge.yml"),
        ];

        if let Some(path) = possible_paths.into_iter().find(|path| path.exists()) {
            return Some(path);
        }

        dirs::home_dir()
            .map(|home| home.join(".docmerge").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    fn merge_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("DOCMERGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DOCMERGE_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(base_url) = lookup("DOCMERGE_TEMPLATE_BASE_URL") {
            self.source.base_url = Some(base_url);
        }
        if let Some(timeout) = lookup("DOCMERGE_HTTP_TIMEOUT") {
            self.source.timeout_secs = timeout.parse()?;
        }

        if let Some(directory) = lookup("DOCMERGE_OUTPUT_DIR") {
            self.output.directory = Some(PathBuf::from(directory));
        }

        Ok(())
    }
}
