// ABOUTME: Template location parsing
// ABOUTME: Distinguishes local files from http(s) URLs and resolves names against a base URL

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use super::error::{Result, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    File(PathBuf),
    Url(Url),
}

impl TemplateLocation {
    /// Parse a location given on the command line.
    ///
    /// `http://` and `https://` inputs are URLs. With a base URL, a bare
    /// relative name such as `offer-letter.docx` is joined onto it; inputs
    /// starting with `./`, `../` or `/` always stay local paths.
    pub fn parse(input: &str, base_url: Option<&str>) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SourceError::InvalidLocation {
                location: input.to_string(),
                reason: "location is empty".to_string(),
            });
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Ok(TemplateLocation::Url(Url::parse(input)?));
        }
        if let Some(path) = input.strip_prefix("file://") {
            return Ok(TemplateLocation::File(PathBuf::from(path)));
        }

        let explicit_path = input.starts_with("./")
            || input.starts_with("../")
            || Path::new(input).is_absolute();
        match base_url {
            Some(base) if !explicit_path => {
                let mut base = Url::parse(base)?;
                if !base.path().ends_with('/') {
                    let path = format!("{}/", base.path());
                    base.set_path(&path);
                }
                Ok(TemplateLocation::Url(base.join(input)?))
            }
            _ => Ok(TemplateLocation::File(PathBuf::from(input))),
        }
    }

    /// File name without extension, used to name generated documents.
    pub fn stem(&self) -> Option<String> {
        match self {
            TemplateLocation::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned()),
            TemplateLocation::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .and_then(|name| Path::new(name).file_stem())
                .map(|stem| stem.to_string_lossy().into_owned()),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, TemplateLocation::Url(_))
    }
}

impl fmt::Display for TemplateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateLocation::File(path) => write!(f, "{}", path.display()),
            TemplateLocation::Url(url) => write!(f, "{}", url),
        }
    }
}
