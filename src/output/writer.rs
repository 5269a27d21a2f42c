// ABOUTME: Output writers for different destinations (stdout, stderr, files)
// ABOUTME: Writes formatted reports and generated document bytes to their destinations

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::config::{ConsoleWriterConfig, FileWriterConfig, OutputDestination};
use super::error::{OutputError, Result};

#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, content: &[u8], destination: &OutputDestination) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

pub struct ConsoleWriter {
    stream: Stream,
}

pub struct FileWriter;

impl ConsoleWriter {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

#[async_trait]
impl OutputWriter for ConsoleWriter {
    async fn write(&self, content: &[u8], destination: &OutputDestination) -> Result<()> {
        let config: ConsoleWriterConfig = destination.get_config().unwrap_or_default();
        if config.quiet {
            return Ok(());
        }

        match self.stream {
            Stream::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(content).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Stream::Stderr => {
                let mut stderr = tokio::io::stderr();
                stderr.write_all(content).await?;
                stderr.write_all(b"\n").await?;
                stderr.flush().await?;
            }
        }

        debug!("Output written to {:?} ({} bytes)", self.stream, content.len());
        Ok(())
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for FileWriter {
    async fn write(&self, content: &[u8], destination: &OutputDestination) -> Result<()> {
        let config: FileWriterConfig =
            destination
                .get_config()
                .map_err(|e| OutputError::ConfigError {
                    message: format!("Invalid file writer config: {}", e),
                })?;

        let output_path = Path::new(&config.path);

        if config.create_dirs {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| OutputError::WriteError {
                        message: format!("Failed to create directory {}: {}", parent.display(), e),
                    })?;
            }
        }

        if config.backup_existing && fs::try_exists(output_path).await.unwrap_or(false) {
            let backup_path = format!("{}.bak", config.path);
            fs::copy(&config.path, &backup_path)
                .await
                .map_err(|e| OutputError::WriteError {
                    message: format!("Failed to backup existing file: {}", e),
                })?;
            debug!("Backed up existing file to {}", backup_path);
        }

        fs::write(&config.path, content)
            .await
            .map_err(|e| OutputError::WriteError {
                message: format!("Failed to write file {}: {}", config.path, e),
            })?;

        info!(
            "Output written to file: {} ({} bytes)",
            config.path,
            content.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_console_writer() {
        let writer = ConsoleWriter::stdout();
        let destination = OutputDestination::new_stdout();

        let result = writer.write(b"Test output", &destination).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_file_writer() {
        let writer = FileWriter::new();
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("letter.docx");

        let destination = OutputDestination::new_file(test_file.to_string_lossy());
        writer.write(&[0x50, 0x4b, 0x03, 0x04], &destination).await.unwrap();

        let content = fs::read(&test_file).await.unwrap();
        assert_eq!(content, vec![0x50, 0x4b, 0x03, 0x04]);
    }

    #[tokio::test]
    async fn test_file_writer_with_directories_and_backup() {
        let writer = FileWriter::new();
        let temp_dir = TempDir::new().unwrap();
        let nested_file = temp_dir.path().join("nested").join("dir").join("out.docx");

        let destination = OutputDestination::new_file(nested_file.to_string_lossy())
            .with_option("backup_existing", serde_yaml::Value::Bool(true));

        writer.write(b"first", &destination).await.unwrap();
        writer.write(b"second", &destination).await.unwrap();

        let content = fs::read_to_string(&nested_file).await.unwrap();
        assert_eq!(content, "second");
        let backup = fs::read_to_string(format!("{}.bak", nested_file.display()))
            .await
            .unwrap();
        assert_eq!(backup, "first");
    }
}
