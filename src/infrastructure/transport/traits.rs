use crate::domain::upload::errors::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, header::HeaderName};

/// Name of the multipart part carrying the image.
pub const FILE_FIELD: &str = "file";

/// A multipart/form-data POST: text fields followed by one file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub filename: String,
    pub data: Bytes,
}

impl MultipartUpload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// What the uploader needs back from the wire: status, headers, raw body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// HTTP client used to submit the signed form. Retries and timeouts are the
/// implementation's business; the uploader calls it exactly once per upload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn post_multipart(
        &self,
        upload: MultipartUpload,
    ) -> Result<TransportResponse, TransportError>;
}
