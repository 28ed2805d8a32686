//! Document retrieval: load the extracted document Kendra staged in S3.
//!
//! Kendra writes its extraction result as JSON and passes the bucket and key
//! in the invocation event. Only `textContent.documentBodyText` is needed
//! downstream, so the rest of the document is never materialised.
//!
//! Storage access sits behind [`ObjectStore`] so the handler can be driven by
//! an in-memory store in tests.

use crate::error::EnrichError;
use crate::event::StoredDocument;
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use tracing::debug;

/// Read-only access to object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Return the full object body. Errors must be retrieval-kind.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EnrichError>;
}

/// [`ObjectStore`] backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EnrichError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_get_error(bucket, key, e))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| EnrichError::StorageRequestFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: format!("body stream: {e}"),
            })?;

        Ok(body.into_bytes().to_vec())
    }
}

/// Map an S3 `GetObject` failure onto the retrieval variants.
fn classify_get_error(bucket: &str, key: &str, err: SdkError<GetObjectError>) -> EnrichError {
    if let Some(service) = err.as_service_error() {
        if service.is_no_such_key() || service.code() == Some("NoSuchBucket") {
            return EnrichError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            };
        }
        if service.code() == Some("AccessDenied") {
            return EnrichError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
            };
        }
    }
    EnrichError::StorageRequestFailed {
        bucket: bucket.to_string(),
        key: key.to_string(),
        detail: DisplayErrorContext(&err).to_string(),
    }
}

/// Fetch the document at `bucket`/`key` and return its body text.
pub async fn fetch_document(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<String, EnrichError> {
    if bucket.is_empty() || key.is_empty() {
        return Err(EnrichError::InvalidLocation {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
    }

    let bytes = store.get_object(bucket, key).await?;
    debug!("Fetched s3://{}/{} ({} bytes)", bucket, key, bytes.len());

    let text = parse_document(key, bytes)?;
    debug!("Extracted document body ({} chars): {}", text.chars().count(), text);
    Ok(text)
}

/// Decode raw object bytes and extract `textContent.documentBodyText`.
pub fn parse_document(key: &str, bytes: Vec<u8>) -> Result<String, EnrichError> {
    let raw = String::from_utf8(bytes).map_err(|e| EnrichError::InvalidUtf8 {
        key: key.to_string(),
        detail: format!("invalid byte at offset {}", e.utf8_error().valid_up_to()),
    })?;

    // Parse to a Value first so a well-formed document without the body
    // field is reported as such, not as a JSON syntax error.
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| EnrichError::MalformedDocument {
            key: key.to_string(),
            detail: e.to_string(),
        })?;

    let doc: StoredDocument =
        serde_json::from_value(value).map_err(|_| EnrichError::MissingDocumentBody {
            key: key.to_string(),
        })?;

    Ok(doc.text_content.document_body_text)
}
