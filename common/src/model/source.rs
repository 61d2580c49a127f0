use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Where a PDF comes from.
///
/// `Bytes` travels as standard base64 inside JSON. `Url` sources are fetched by
/// the browser and replaced with `Bytes` before they reach the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocumentSource {
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    DataUri(String),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source is a URL and must be fetched first.
    Unresolved(String),
    /// The data URI is not `data:[<mime>][;base64],<payload>`.
    MalformedDataUri,
    InvalidBase64(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unresolved(url) => write!(f, "URL source was not fetched: {}", url),
            SourceError::MalformedDataUri => f.write_str("malformed data URI"),
            SourceError::InvalidBase64(e) => write!(f, "invalid base64 payload: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl DocumentSource {
    /// Decodes the source into raw bytes. `Url` sources yield
    /// [`SourceError::Unresolved`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, SourceError> {
        match self {
            DocumentSource::Bytes(bytes) => Ok(bytes.clone()),
            DocumentSource::DataUri(uri) => decode_data_uri(uri),
            DocumentSource::Url(url) => Err(SourceError::Unresolved(url.clone())),
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, DocumentSource::Url(_))
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, SourceError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or(SourceError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(SourceError::MalformedDataUri)?;
    if meta.ends_with(";base64") {
        // Browsers may emit base64 wrapped across lines.
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64
            .decode(compact)
            .map_err(|e| SourceError::InvalidBase64(e.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}
