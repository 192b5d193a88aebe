#![allow(dead_code)]

use async_trait::async_trait;
use http::{HeaderValue, StatusCode, header::LOCATION};
use s3_image_upload::{
    domain::upload::{errors::TransportError, policy::SignedUploadPolicy},
    infrastructure::{
        storage::s3_image_uploader::S3ImageUploader,
        transport::traits::{MultipartUpload, TransportResponse, UploadTransport},
    },
};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

pub const GCS_URL: &str = "https://pydocx.storage.googleapis.com";

/// Answers every upload with one canned response and keeps what was sent.
#[derive(Clone)]
pub struct RecordingTransport {
    response: TransportResponse,
    requests: Arc<Mutex<Vec<MultipartUpload>>>,
}

impl RecordingTransport {
    pub fn new(response: TransportResponse) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<MultipartUpload> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub fn single_request(&self) -> MultipartUpload {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upload request");
        requests.into_iter().next().expect("one request")
    }
}

#[async_trait]
impl UploadTransport for RecordingTransport {
    async fn post_multipart(
        &self,
        upload: MultipartUpload,
    ) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(upload);
        Ok(self.response.clone())
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("failed to read text fixture")
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("failed to read binary fixture")
}

pub fn signed_request() -> String {
    fixture("upload_signed_request.json")
}

pub fn signed_policy() -> SignedUploadPolicy {
    SignedUploadPolicy::from_json(&signed_request()).expect("fixture policy is valid")
}

pub fn no_content(location: Option<&'static str>) -> TransportResponse {
    let response = TransportResponse::new(StatusCode::NO_CONTENT);
    match location {
        Some(location) => response.with_header(LOCATION, HeaderValue::from_static(location)),
        None => response,
    }
}

pub fn status_with_body(status: StatusCode, body: impl Into<bytes::Bytes>) -> TransportResponse {
    TransportResponse::new(status).with_body(body)
}

pub fn uploader(policy: SignedUploadPolicy, transport: &RecordingTransport) -> S3ImageUploader {
    S3ImageUploader::new(policy, Arc::new(transport.clone()))
}

/// Signed policy fields as the backend should receive them, `url` excluded.
pub fn expected_form_fields(policy: &SignedUploadPolicy) -> Vec<(String, String)> {
    policy
        .form_fields()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
