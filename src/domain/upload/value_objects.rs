use std::fmt;
use std::path::Path;

/// Image format token such as `png` or `jpg`, used to build `image/<token>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    value: String,
}

impl ImageFormat {
    /// Wraps an explicit format token. Returns `None` for blank input.
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let value = token.as_ref().trim().trim_start_matches('.');
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
        })
    }

    /// Infers the format from a filename's extension (lowercased).
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::new(ext.to_ascii_lowercase()))
    }

    /// Sniffs the format from the payload's magic number.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        image::guess_format(data)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn content_type(&self) -> String {
        format!("image/{}", self.value)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
