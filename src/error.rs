//! Error type for the kendra-enrich library.
//!
//! Every failure is fatal to the invocation: there is no partial result and no
//! retry. [`EnrichError`] still keeps the variants apart so logs say *which*
//! remote call broke, and [`EnrichError::kind`] folds them back into the three
//! classes a caller cares about (storage, model, configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`EnrichError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source document could not be read or did not have the expected shape.
    Retrieval,
    /// The model call failed or its response could not be used.
    Inference,
    /// The hook was configured incorrectly.
    Configuration,
    /// Anything else.
    Internal,
}

/// All fatal errors returned by the kendra-enrich library.
#[derive(Debug, Error)]
pub enum EnrichError {
    // ── Retrieval errors ──────────────────────────────────────────────────
    /// Bucket or key was empty.
    #[error("Invalid document location: bucket '{bucket}', key '{key}'")]
    InvalidLocation { bucket: String, key: String },

    /// The object does not exist.
    #[error("Object not found: s3://{bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// The execution role may not read the object.
    #[error("Access denied reading s3://{bucket}/{key}\nCheck the function role has s3:GetObject on this bucket.")]
    AccessDenied { bucket: String, key: String },

    /// Any other storage failure (network, throttling, body stream error).
    #[error("Failed to read s3://{bucket}/{key}: {detail}")]
    StorageRequestFailed {
        bucket: String,
        key: String,
        detail: String,
    },

    /// Object bytes are not UTF-8 text.
    #[error("Document '{key}' is not valid UTF-8: {detail}")]
    InvalidUtf8 { key: String, detail: String },

    /// Object text is not JSON.
    #[error("Document '{key}' is not valid JSON: {detail}")]
    MalformedDocument { key: String, detail: String },

    /// JSON lacks `textContent.documentBodyText`.
    #[error("Document '{key}' has no textContent.documentBodyText field")]
    MissingDocumentBody { key: String },

    // ── Inference errors ──────────────────────────────────────────────────
    /// The InvokeModel call itself failed.
    #[error("Model invocation failed for '{model_id}': {detail}")]
    InvokeFailed { model_id: String, detail: String },

    /// The response body is not JSON.
    #[error("Model response is not valid JSON: {detail}")]
    MalformedResponse { detail: String },

    /// The response JSON has no string `completion` field.
    #[error("Model response has no 'completion' field")]
    MissingCompletion,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Local mode ────────────────────────────────────────────────────────
    /// An event file passed with `--event` could not be loaded.
    #[error("Failed to load event file '{path}': {detail}")]
    EventFileInvalid { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EnrichError {
    /// Which part of the invocation produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnrichError::InvalidLocation { .. }
            | EnrichError::ObjectNotFound { .. }
            | EnrichError::AccessDenied { .. }
            | EnrichError::StorageRequestFailed { .. }
            | EnrichError::InvalidUtf8 { .. }
            | EnrichError::MalformedDocument { .. }
            | EnrichError::MissingDocumentBody { .. } => ErrorKind::Retrieval,
            EnrichError::InvokeFailed { .. }
            | EnrichError::MalformedResponse { .. }
            | EnrichError::MissingCompletion => ErrorKind::Inference,
            EnrichError::InvalidConfig(_) => ErrorKind::Configuration,
            EnrichError::EventFileInvalid { .. } | EnrichError::Internal(_) => ErrorKind::Internal,
        }
    }
}
