//! Blob values: a content type plus an owned byte payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use sha2::{Digest, Sha256};

/// Opaque binary attachment stored inline in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content_type: String,
    content: Vec<u8>,
}

impl Blob {
    /// Create a blob from a MIME type and its bytes.
    pub fn new(content_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Payload size in bytes.
    pub fn length(&self) -> u64 {
        self.content.len() as u64
    }

    /// Content digest in the form `sha256-<base64>`.
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(&self.content);
        format!("sha256-{}", STANDARD.encode(hash))
    }

    /// JSON metadata form used when a document is exported.
    ///
    /// The payload itself is not included.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "@type": "blob",
            "content_type": self.content_type,
            "digest": self.digest(),
            "length": self.length(),
        })
    }
}
