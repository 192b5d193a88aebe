//! Uploader configuration loading from environment variables.
//!
//! The binary reads everything from the environment (optionally seeded from a
//! `.env` file via `dotenvy`), so it can run unchanged from a shell, a job
//! runner or a container.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `SIGNED_POLICY_PATH`: JSON file holding the signed upload policy
//! - `IMAGE_PATH`: File to upload, raw image bytes or a `data:image/...` URI
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,s3_image_upload=debug")
//! - `IMAGE_FILENAME`: Name to upload under (default: file name of `IMAGE_PATH`)
//! - `IMAGE_FORMAT`: Explicit image format token, e.g. `png`
//! - `UPLOAD_TIMEOUT_SECONDS`: Transport request timeout (default: 30)
//! - `UPLOAD_USER_AGENT`: HTTP User-Agent (default: "s3-image-upload/<version>")

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete uploader configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the signed policy JSON document
    pub signed_policy_path: PathBuf,

    /// Path to the image payload
    pub image_path: PathBuf,

    /// Filename to upload the image as
    pub image_filename: String,

    /// Explicit image format; inferred from the filename when absent
    pub image_format: Option<String>,

    /// Request timeout applied by the HTTP transport, in seconds
    pub upload_timeout_seconds: u64,

    /// HTTP User-Agent sent with the upload
    pub upload_user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a variable
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let image_path = PathBuf::from(env_required("IMAGE_PATH")?);
        let image_filename = match std::env::var("IMAGE_FILENAME") {
            Ok(name) => name,
            Err(_) => default_filename(&image_path)?,
        };

        Ok(Self {
            signed_policy_path: PathBuf::from(env_required("SIGNED_POLICY_PATH")?),
            image_path,
            image_filename,
            image_format: std::env::var("IMAGE_FORMAT").ok().filter(|f| !f.trim().is_empty()),
            upload_timeout_seconds: env_or("UPLOAD_TIMEOUT_SECONDS", 30)?,
            upload_user_agent: env_or(
                "UPLOAD_USER_AGENT",
                format!("s3-image-upload/{}", env!("CARGO_PKG_VERSION")),
            )?,
        })
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_seconds)
    }
}

fn default_filename(image_path: &Path) -> anyhow::Result<String> {
    image_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "IMAGE_PATH {} has no file name; set IMAGE_FILENAME",
                image_path.display()
            )
        })
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
