use super::traits::{MultipartUpload, TransportResponse, UploadTransport};
use crate::domain::upload::errors::TransportError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, instrument};

/// [`UploadTransport`] backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadTransport for ReqwestTransport {
    #[instrument(skip(self, upload), fields(
        url = %upload.url,
        filename = %upload.filename,
        size = upload.data.len()
    ))]
    async fn post_multipart(
        &self,
        upload: MultipartUpload,
    ) -> Result<TransportResponse, TransportError> {
        let MultipartUpload {
            url,
            fields,
            file_field,
            filename,
            data,
        } = upload;

        // Backends require the file part to come after every policy field.
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part(file_field, Part::bytes(data.to_vec()).file_name(filename));

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(%status, body_len = body.len(), "Upload response received");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!(reqwest_timeout = %err);
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            tracing::warn!(reqwest_connect = %err);
            TransportError::Connect(err.to_string())
        } else if err.is_request() || err.is_builder() {
            tracing::warn!(reqwest_request = %err);
            TransportError::Request(err.to_string())
        } else {
            tracing::error!(reqwest_error = %err);
            TransportError::Other(err.to_string())
        }
    }
}
