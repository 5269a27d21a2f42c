// ABOUTME: Configuration types for output handling
// ABOUTME: Defines where generated documents go and how error reports are formatted and delivered

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::template::{suggested_filename, GeneratedDocument};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated documents; the working directory when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Fixed file name for generated documents.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_format")]
    pub report_format: String,
    #[serde(default = "default_true")]
    pub create_dirs: bool,
    #[serde(default)]
    pub backup_existing: bool,
    #[serde(default = "default_report_destinations")]
    pub report_destinations: Vec<OutputDestination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDestination {
    pub writer_type: String,
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWriterConfig {
    pub path: String,
    #[serde(default = "default_true")]
    pub create_dirs: bool,
    #[serde(default)]
    pub backup_existing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleWriterConfig {
    #[serde(default)]
    pub quiet: bool,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_report_destinations() -> Vec<OutputDestination> {
    vec![OutputDestination::new_stderr()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: None,
            report_format: default_format(),
            create_dirs: true,
            backup_existing: false,
            report_destinations: default_report_destinations(),
        }
    }
}

impl OutputConfig {
    /// Where a generated document is written.
    ///
    /// An explicit path wins. Otherwise the configured file name, or
    /// `<template stem>-<UTC timestamp>.docx`, or the document's own
    /// suggested name, inside the configured directory.
    pub fn document_path(
        &self,
        explicit: Option<&Path>,
        template_stem: Option<&str>,
        document: &GeneratedDocument,
    ) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        let filename = match (&self.filename, template_stem) {
            (Some(filename), _) => filename.clone(),
            (None, Some(stem)) => suggested_filename(stem),
            (None, None) => document.filename().to_string(),
        };

        match &self.directory {
            Some(directory) => directory.join(filename),
            None => PathBuf::from(filename),
        }
    }
}

impl OutputDestination {
    pub fn new_stdout() -> Self {
        Self {
            writer_type: "stdout".to_string(),
            config: HashMap::new(),
        }
    }

    pub fn new_stderr() -> Self {
        Self {
            writer_type: "stderr".to_string(),
            config: HashMap::new(),
        }
    }

    pub fn new_file<S: Into<String>>(path: S) -> Self {
        let mut config = HashMap::new();
        config.insert("path".to_string(), serde_yaml::Value::String(path.into()));

        Self {
            writer_type: "file".to_string(),
            config,
        }
    }

    pub fn with_option(mut self, key: &str, value: serde_yaml::Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn get_config<T>(&self) -> Result<T, crate::output::error::OutputError>
    where
        T: serde::de::DeserializeOwned,
    {
        let config_value = serde_yaml::Value::Mapping(
            self.config
                .iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
                .collect(),
        );

        serde_yaml::from_value(config_value).map_err(|e| {
            crate::output::error::OutputError::ConfigError {
                message: format!("Failed to parse destination config: {}", e),
            }
        })
    }
}
