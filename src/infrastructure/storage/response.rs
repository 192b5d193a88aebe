//! Normalizes S3 and GCS answers to a POST-policy upload into one contract:
//! the object URL, or an [`UploadError`].
//!
//! The two backends differ in where they put the object location. S3 with
//! `success_action_status=204` answers with a `Location` header; GCS never
//! sets that header and has to be asked for `201`, which returns the location
//! inside an XML body. No backend identity is available here, only the
//! response shape, so the header is tried first and the body second.

use super::xml;
use crate::domain::upload::errors::UploadError;
use crate::infrastructure::transport::traits::TransportResponse;
use http::{HeaderMap, StatusCode, header::LOCATION};
use percent_encoding::percent_decode_str;
use reqwest::Url;
use tracing::{debug, warn};

pub const OK_STATUSES: [StatusCode; 2] = [StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Status a backend uses to reject the signed request itself.
pub const S3_ERROR_STATUS: StatusCode = StatusCode::FORBIDDEN;

/// Maps an upload response to the object URL.
///
/// `endpoint` is the URL the form was posted to; relative `Location` headers
/// are resolved against it.
pub fn interpret_response(response: &TransportResponse, endpoint: &str) -> Result<String, UploadError> {
    let status = response.status;

    if status == S3_ERROR_STATUS {
        let err = backend_error(&response.body);
        warn!(%status, error = %err, "Storage backend rejected upload");
        return Err(err);
    }

    if !OK_STATUSES.contains(&status) {
        warn!(%status, "Unexpected upload response status");
        return Err(UploadError::UnexpectedStatus(body_text(&response.body)));
    }

    if let Some(url) = location_header(&response.headers, endpoint) {
        debug!(%url, "Object location taken from header");
        return Ok(url);
    }

    if status == StatusCode::CREATED {
        if let Some(url) = location_value(&response.body) {
            debug!(%url, "Object location taken from response body");
            return Ok(url);
        }
    }

    warn!(%status, "Upload response carried no object location");
    Err(UploadError::InvalidLocation)
}

/// Percent-decoded `Location` header, made absolute against `endpoint`.
pub fn location_header(headers: &HeaderMap, endpoint: &str) -> Option<String> {
    let raw = headers.get(LOCATION)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    // Path-only locations get the endpoint's origin; the path is kept verbatim.
    let absolute = match Url::parse(endpoint) {
        Ok(base) if raw.starts_with('/') && !raw.starts_with("//") => {
            format!("{}{}", base.origin().ascii_serialization(), raw)
        }
        _ => raw.to_string(),
    };

    Some(percent_decode_str(&absolute).decode_utf8_lossy().into_owned())
}

/// Text of the root-level `Location` element of an XML body.
///
/// Bodies that are not UTF-8 or not well-formed XML have no location.
pub fn location_value(body: &[u8]) -> Option<String> {
    let document = std::str::from_utf8(body).ok()?;
    xml::root_child_text(document, "Location").filter(|location| !location.is_empty())
}

fn backend_error(body: &[u8]) -> UploadError {
    let parsed = std::str::from_utf8(body)
        .ok()
        .and_then(xml::root_children)
        .and_then(|children| {
            let text = |name: &str| {
                children
                    .iter()
                    .find(|child| child.name == name)
                    .map(|child| child.text.clone())
            };
            Some(UploadError::Backend {
                code: text("Code")?,
                message: text("Message")?,
            })
        });

    parsed.unwrap_or_else(|| UploadError::UnexpectedStatus(body_text(body)))
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
