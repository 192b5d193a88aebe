use thiserror::Error;

/// Failure of a single image upload.
///
/// The `Display` text of each variant is the message surfaced to callers, so
/// the backend-facing variants keep the exact wording clients match on.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The storage backend rejected the signed request (HTTP 403).
    #[error("S3 {code} - {message}")]
    Backend { code: String, message: String },

    /// Any status other than 201/204, carrying the raw response body.
    #[error("S3 Upload Error: {0}")]
    UnexpectedStatus(String),

    /// The response carried no usable object location.
    #[error("S3 Invalid location header")]
    InvalidLocation,

    #[error("Invalid signed policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid image data: {0}")]
    InvalidImageData(#[from] base64::DecodeError),

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Unable to determine image format for {0}")]
    UnknownImageFormat(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors raised by an [`UploadTransport`](crate::infrastructure::transport::traits::UploadTransport)
/// before a response could be read.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Upload request timed out: {0}")]
    Timeout(String),

    #[error("Connection to storage endpoint failed: {0}")]
    Connect(String),

    #[error("Invalid upload request: {0}")]
    Request(String),

    #[error("Storage endpoint unavailable: {0}")]
    Other(String),
}
