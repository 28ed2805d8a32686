//! Wire types exchanged with Kendra and read from S3.
//!
//! Kendra invokes the post-extraction hook with an [`InvocationRequest`] and
//! expects an [`InvocationResponse`] back. Field names on the wire are
//! camelCase, matching the Kendra Custom Document Enrichment contract.

use crate::error::EnrichError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The event Kendra sends for one extracted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub version: String,
    #[serde(rename = "s3Bucket")]
    pub bucket: String,
    #[serde(rename = "s3ObjectKey")]
    pub object_key: String,
    /// Existing document metadata; not interpreted by the hook.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl InvocationRequest {
    /// Load a request from a JSON event file (local one-shot mode).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, EnrichError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EnrichError::EventFileInvalid {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        serde_json::from_str(&raw).map_err(|e| EnrichError::EventFileInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

/// A Kendra document attribute value. Only string values are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub string_value: String,
}

/// One metadata field to set on the indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeUpdate {
    pub name: String,
    pub value: AttributeValue,
}

impl AttributeUpdate {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue {
                string_value: value.into(),
            },
        }
    }

    /// The plain string value.
    pub fn value_str(&self) -> &str {
        &self.value.string_value
    }
}

/// The hook's answer to Kendra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub version: String,
    #[serde(rename = "s3ObjectKey")]
    pub object_key: String,
    #[serde(rename = "metadataUpdates")]
    pub metadata_updates: Vec<AttributeUpdate>,
}

impl InvocationResponse {
    /// Response format version.
    pub const RESPONSE_VERSION: &'static str = "1.0";

    /// Placed in `s3ObjectKey` instead of the real key. Kendra keeps the
    /// extracted document under its own key and does not read this field back.
    pub const OBJECT_KEY_LABEL: &'static str = "updated_document";

    /// Look up an update by attribute name.
    pub fn update(&self, name: &str) -> Option<&AttributeUpdate> {
        self.metadata_updates.iter().find(|u| u.name == name)
    }
}

/// The extracted document Kendra writes to S3 before calling the hook.
///
/// Only the body text is read; all other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub text_content: TextContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub document_body_text: String,
}
