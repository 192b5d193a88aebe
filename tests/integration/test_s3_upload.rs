use super::helpers::{
    RecordingTransport, fixture, fixture_bytes, no_content, signed_policy, signed_request,
    status_with_body, uploader,
};
use http::StatusCode;
use s3_image_upload::{
    domain::upload::{errors::UploadError, image_data::ImageData},
    infrastructure::storage::{
        s3_image_uploader::{CONTENT_TYPE_FIELD, S3ImageUploader},
        traits::ImageUploader,
    },
};
use std::sync::Arc;

const UPLOADED_URL: &str = "http://pydocx.s3.amazonaws.com/uploads/pydocx/image2.png";

#[test]
fn signed_request_can_be_given_as_json() {
    let transport = RecordingTransport::new(no_content(None));
    let s3 = S3ImageUploader::from_json(&signed_request(), Arc::new(transport)).unwrap();

    assert_eq!(s3.signed_data().get("acl"), Some("public-read"));
    assert_eq!(s3.signed_data().get("url"), Some("http://pydocx.s3.amazonaws.com/"));
}

#[tokio::test]
async fn upload_image_returns_location_header() {
    let transport = RecordingTransport::new(no_content(Some(UPLOADED_URL)));
    let mut s3 = uploader(signed_policy(), &transport);

    let result = s3
        .upload(
            ImageData::from(fixture_bytes("image1.png")),
            "image2.png",
            Some("png"),
        )
        .await
        .unwrap();

    assert_eq!(result, UPLOADED_URL);

    let request = transport.single_request();
    assert_eq!(request.url, "http://pydocx.s3.amazonaws.com/");
    assert_eq!(request.field(CONTENT_TYPE_FIELD), Some("image/png"));
    assert_eq!(request.field("url"), None);
    assert_eq!(request.file_field, "file");
    assert_eq!(request.filename, "image2.png");
    assert_eq!(request.data.to_vec(), fixture_bytes("image1.png"));
}

#[tokio::test]
async fn upload_image_missing_url_uses_bucket_endpoint() {
    let transport = RecordingTransport::new(no_content(Some("/uploads/pydocx/image1.png")));
    let mut policy = signed_policy();
    policy.take_url();
    let mut s3 = uploader(policy, &transport);

    let result = s3
        .upload(ImageData::from(fixture_bytes("image1.png")), "image1.png", None)
        .await
        .unwrap();

    assert_eq!(result, "https://pydocx.s3.amazonaws.com/uploads/pydocx/image1.png");
    assert_eq!(transport.single_request().url, "https://pydocx.s3.amazonaws.com/");
}

#[tokio::test]
async fn upload_image_invalid_bucket_url() {
    let transport = RecordingTransport::new(status_with_body(
        StatusCode::FORBIDDEN,
        fixture("s3_invalid_response.xml"),
    ));
    let mut policy = signed_policy();
    policy.insert("url", "http://invalid_bucket.s3.amazonaws.com/");
    let mut s3 = uploader(policy, &transport);

    let err = s3
        .upload(ImageData::from(fixture_bytes("image1.png")), "image2.png", Some("png"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "S3 NoSuchBucket - The specified bucket does not exist");
    assert_eq!(transport.single_request().url, "http://invalid_bucket.s3.amazonaws.com/");
}

#[tokio::test]
async fn upload_image_invalid_response() {
    let transport = RecordingTransport::new(status_with_body(StatusCode::NOT_FOUND, "Not Found"));
    let mut s3 = uploader(signed_policy(), &transport);

    let err = s3
        .upload(ImageData::from(fixture_bytes("image1.png")), "image1.png", None)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("S3 Upload Error"));
    assert!(matches!(err, UploadError::UnexpectedStatus(body) if body == "Not Found"));
}

#[tokio::test]
async fn upload_image_invalid_signed_request() {
    let transport = RecordingTransport::new(status_with_body(
        StatusCode::FORBIDDEN,
        fixture("s3_invalid_access_key.xml"),
    ));
    let mut policy = signed_policy();
    policy.insert("AWSAccessKeyId", "AKIAIOSFODNN7EXAMPLEtest");
    let mut s3 = uploader(policy, &transport);

    let err = s3
        .upload(ImageData::from(fixture_bytes("image1.png")), "image3.png", Some("png"))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("S3 InvalidAccessKeyId "));
    assert_eq!(
        transport.single_request().field("AWSAccessKeyId"),
        Some("AKIAIOSFODNN7EXAMPLEtest")
    );
}

#[tokio::test]
async fn upload_image_as_data_uri() {
    let transport = RecordingTransport::new(no_content(Some(
        "http://pydocx.s3.amazonaws.com/uploads/pydocx/image4.jpg",
    )));
    let mut s3 = uploader(signed_policy(), &transport);

    let result = s3
        .upload(ImageData::from(fixture("image1.data")), "image4.jpg", None)
        .await
        .unwrap();

    assert_eq!(result, "http://pydocx.s3.amazonaws.com/uploads/pydocx/image4.jpg");

    let request = transport.single_request();
    assert_eq!(request.data.to_vec(), fixture_bytes("image1.png"));
    assert_eq!(request.field(CONTENT_TYPE_FIELD), Some("image/jpg"));
}

#[tokio::test]
async fn upload_image_invalid_location_header() {
    let transport = RecordingTransport::new(no_content(None));
    let mut s3 = uploader(signed_policy(), &transport);

    let err = s3
        .upload(ImageData::from(fixture_bytes("image1.png")), "image4.png", None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "S3 Invalid location header");
}

#[tokio::test]
async fn endpoint_is_resolved_once_across_uploads() {
    let transport = RecordingTransport::new(no_content(Some(UPLOADED_URL)));
    let mut s3 = uploader(signed_policy(), &transport);

    for name in ["image1.png", "image2.png"] {
        s3.upload(ImageData::from(fixture_bytes("image1.png")), name, None)
            .await
            .unwrap();
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| r.url == "http://pydocx.s3.amazonaws.com/" && r.field("url").is_none())
    );
    assert_eq!(s3.endpoint().unwrap(), "http://pydocx.s3.amazonaws.com/");
}
