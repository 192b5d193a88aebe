use super::errors::UploadError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Form field holding an explicit upload endpoint. Not itself a POST field.
pub const URL_FIELD: &str = "url";

/// Form field holding the base64-encoded policy document.
pub const POLICY_FIELD: &str = "policy";

/// Pre-signed POST policy: the form fields a storage backend expects next to
/// the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedUploadPolicy {
    fields: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    conditions: Vec<Value>,
}

impl SignedUploadPolicy {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Parses a serialized signed request (a flat JSON object).
    ///
    /// Non-string scalar values are kept in their JSON text form so that
    /// e.g. `"success_action_status": 201` still reaches the backend as `201`.
    pub fn from_json(raw: &str) -> Result<Self, UploadError> {
        let object: BTreeMap<String, Value> = serde_json::from_str(raw)
            .map_err(|e| UploadError::InvalidPolicy(format!("signed request is not a JSON object: {}", e)))?;

        let fields = object
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(Self { fields })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes and returns the explicit endpoint, if the policy carries one.
    pub fn take_url(&mut self) -> Option<String> {
        self.fields.remove(URL_FIELD)
    }

    /// The fields to send as multipart text parts.
    pub fn form_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != URL_FIELD)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Decodes the policy document and returns the first `bucket` condition.
    ///
    /// A document without a bucket condition is not an error: the bucket is
    /// only needed when no explicit endpoint was supplied.
    pub fn bucket_name(&self) -> Result<Option<String>, UploadError> {
        let encoded = self
            .get(POLICY_FIELD)
            .ok_or_else(|| UploadError::InvalidPolicy("missing `policy` field".to_string()))?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| UploadError::InvalidPolicy(format!("policy document is not base64: {}", e)))?;

        let document: PolicyDocument = serde_json::from_slice(&decoded)
            .map_err(|e| UploadError::InvalidPolicy(format!("policy document is not valid JSON: {}", e)))?;

        let bucket = document
            .conditions
            .iter()
            .filter_map(Value::as_object)
            .find_map(|condition| {
                condition
                    .get("bucket")
                    .and_then(Value::as_str)
                    .filter(|bucket| !bucket.is_empty())
            })
            .map(str::to_owned);

        Ok(bucket)
    }
}

impl From<BTreeMap<String, String>> for SignedUploadPolicy {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self::new(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for SignedUploadPolicy
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
