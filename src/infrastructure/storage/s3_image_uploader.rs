use super::{response::interpret_response, traits::ImageUploader};
use crate::{
    domain::upload::{
        errors::UploadError, image_data::ImageData, policy::SignedUploadPolicy,
        value_objects::ImageFormat,
    },
    infrastructure::transport::traits::{FILE_FIELD, MultipartUpload, UploadTransport},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Endpoints containing this fragment are Google Cloud Storage, which rejects
/// an explicit `Content-Type` form field.
pub const GCS_HOST_MARKER: &str = "storage.googleapis.com";

pub const CONTENT_TYPE_FIELD: &str = "Content-Type";

pub fn default_endpoint(bucket_name: &str) -> String {
    format!("https://{}.s3.amazonaws.com/", bucket_name)
}

pub fn targets_gcs(endpoint: &str) -> bool {
    endpoint.contains(GCS_HOST_MARKER)
}

/// Uploads images with a pre-signed POST policy to S3 or an S3-compatible
/// backend such as GCS.
///
/// The bucket name and endpoint are derived from the policy on first use and
/// cached for the lifetime of the uploader.
pub struct S3ImageUploader {
    signed_data: SignedUploadPolicy,
    transport: Arc<dyn UploadTransport>,
    bucket_name: Option<String>,
    endpoint: Option<String>,
}

impl S3ImageUploader {
    pub fn new(signed_data: SignedUploadPolicy, transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            signed_data,
            transport,
            bucket_name: None,
            endpoint: None,
        }
    }

    /// Builds an uploader from a serialized signed request.
    pub fn from_json(raw: &str, transport: Arc<dyn UploadTransport>) -> Result<Self, UploadError> {
        Ok(Self::new(SignedUploadPolicy::from_json(raw)?, transport))
    }

    pub fn signed_data(&self) -> &SignedUploadPolicy {
        &self.signed_data
    }

    /// Bucket named by the policy document, if any.
    pub fn bucket_name(&mut self) -> Result<Option<&str>, UploadError> {
        if self.bucket_name.is_none() {
            self.bucket_name = self.signed_data.bucket_name()?;
        }
        Ok(self.bucket_name.as_deref())
    }

    /// The URL the form is posted to.
    ///
    /// An explicit `url` field wins and is removed from the form data;
    /// otherwise the default S3 endpoint of the policy's bucket is used.
    pub fn endpoint(&mut self) -> Result<&str, UploadError> {
        let endpoint = match self.endpoint.take() {
            Some(endpoint) => endpoint,
            None => self.resolve_endpoint()?,
        };
        Ok(self.endpoint.insert(endpoint).as_str())
    }

    fn resolve_endpoint(&mut self) -> Result<String, UploadError> {
        if let Some(url) = self.signed_data.take_url() {
            debug!(%url, "Using endpoint from signed policy");
            return Ok(url);
        }

        let bucket = self.bucket_name()?.ok_or_else(|| {
            UploadError::InvalidPolicy(
                "no `url` field and no bucket condition to derive an endpoint from".to_string(),
            )
        })?;
        let url = default_endpoint(bucket);
        debug!(%url, "Derived default endpoint from bucket condition");
        Ok(url)
    }

    fn form_fields(&self, content_type: Option<String>) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .signed_data
            .form_fields()
            .filter(|(key, _)| content_type.is_none() || *key != CONTENT_TYPE_FIELD)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        if let Some(content_type) = content_type {
            fields.push((CONTENT_TYPE_FIELD.to_string(), content_type));
        }
        fields
    }
}

/// Explicit format first, then the filename, then whatever the payload says
/// about itself.
fn resolve_format(
    explicit: Option<&str>,
    filename: &str,
    data_uri_extension: Option<String>,
    data: &[u8],
) -> Option<ImageFormat> {
    explicit
        .and_then(ImageFormat::new)
        .or_else(|| ImageFormat::from_filename(filename))
        .or_else(|| data_uri_extension.and_then(ImageFormat::new))
        .or_else(|| ImageFormat::sniff(data))
}

#[async_trait]
impl ImageUploader for S3ImageUploader {
    #[instrument(skip(self, image_data), fields(payload_size = image_data.len()))]
    async fn upload(
        &mut self,
        image_data: ImageData,
        filename: &str,
        image_format: Option<&str>,
    ) -> Result<String, UploadError> {
        let data_uri_extension = image_data.data_uri_extension();
        let data = image_data.decode()?;

        let format = resolve_format(image_format, filename, data_uri_extension, &data);
        let endpoint = self.endpoint()?.to_string();

        let content_type = if targets_gcs(&endpoint) {
            None
        } else {
            let format =
                format.ok_or_else(|| UploadError::UnknownImageFormat(filename.to_string()))?;
            Some(format.content_type())
        };

        let upload = MultipartUpload {
            url: endpoint.clone(),
            fields: self.form_fields(content_type),
            file_field: FILE_FIELD.to_string(),
            filename: filename.to_string(),
            data,
        };

        info!(%endpoint, size = upload.data.len(), "Submitting signed upload");
        let response = self.transport.post_multipart(upload).await?;
        let url = interpret_response(&response, &endpoint)?;
        info!(%url, "Image uploaded");

        Ok(url)
    }
}
