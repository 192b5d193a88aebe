use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;

lazy_static! {
    // (timestamp)-image(number).(extension), as produced when re-exporting documents
    static ref TIMESTAMPED_IMAGE_REGEX: Regex = Regex::new(r"^\d{10}-image\d+\.\w{3,4}").unwrap();
}

/// Strips the `<timestamp>-` prefix added to `image<N>` names on round-trips,
/// then percent-decodes the result.
///
/// Only programmatically added prefixes are removed; names that merely
/// contain a dash are left alone.
pub fn sanitize_filename(filename: &str) -> String {
    let name = if TIMESTAMPED_IMAGE_REGEX.is_match(filename) {
        filename
            .rsplit_once('-')
            .map(|(_, name)| name)
            .unwrap_or(filename)
    } else {
        filename
    };

    percent_decode_str(name).decode_utf8_lossy().into_owned()
}

/// Last path segment of a URI.
pub fn uri_filename(uri: &str) -> &str {
    uri.rsplit_once('/').map(|(_, name)| name).unwrap_or(uri)
}

pub fn uri_is_internal(uri: &str) -> bool {
    uri.starts_with('/')
}

pub fn uri_is_external(uri: &str) -> bool {
    !uri_is_internal(uri)
}

/// Whether `uri` points into the given bucket's default S3 endpoint.
pub fn uri_is_self_hosted(uri: &str, bucket_name: &str) -> bool {
    uri.starts_with(&format!("https://{}.s3.amazonaws.com", bucket_name))
}
