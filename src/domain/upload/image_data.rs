use super::errors::UploadError;
use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Standard alphabet, tolerating non-zero trailing bits in the last symbol.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

lazy_static! {
    // Byte-oriented so textual and binary inputs share one matcher.
    static ref IMAGE_DATA_URI_REGEX: Regex =
        Regex::new(r"^data:image/(?P<extension>\w+);base64,(?P<image_data>.+)").unwrap();
}

/// Image payload as handed to an uploader: raw bytes, or a
/// `data:image/<ext>;base64,<data>` URI in either textual or byte form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
    Bytes(Bytes),
    Text(String),
}

impl ImageData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ImageData::Bytes(bytes) => bytes,
            ImageData::Text(text) => text.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Extension declared by a data URI payload, e.g. `png`.
    pub fn data_uri_extension(&self) -> Option<String> {
        IMAGE_DATA_URI_REGEX
            .captures(self.as_bytes())
            .and_then(|captures| captures.name("extension"))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
    }

    /// Normalizes the payload to the raw bytes to transmit.
    ///
    /// Data URIs are base64-decoded; anything else is returned unchanged.
    pub fn decode(self) -> Result<Bytes, UploadError> {
        let decoded = IMAGE_DATA_URI_REGEX
            .captures(self.as_bytes())
            .and_then(|captures| captures.name("image_data"))
            .map(|payload| {
                let compact: Vec<u8> = payload
                    .as_bytes()
                    .iter()
                    .copied()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                PAYLOAD_ENGINE.decode(compact)
            });

        match decoded {
            Some(result) => Ok(Bytes::from(result?)),
            None => Ok(self.into_bytes()),
        }
    }

    fn into_bytes(self) -> Bytes {
        match self {
            ImageData::Bytes(bytes) => bytes,
            ImageData::Text(text) => Bytes::from(text),
        }
    }
}

impl From<Bytes> for ImageData {
    fn from(bytes: Bytes) -> Self {
        ImageData::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ImageData {
    fn from(bytes: Vec<u8>) -> Self {
        ImageData::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for ImageData {
    fn from(bytes: &[u8]) -> Self {
        ImageData::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for ImageData {
    fn from(text: String) -> Self {
        ImageData::Text(text)
    }
}

impl From<&str> for ImageData {
    fn from(text: &str) -> Self {
        ImageData::Text(text.to_owned())
    }
}
