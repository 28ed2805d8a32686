//! Stages of one enrichment invocation.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ enrich ×3 ──▶ assemble
//! (S3)      (Bedrock)     (response)
//! ```
//!
//! 1. [`fetch`]    — read the staged document and extract its body text
//! 2. [`enrich`]   — one model call per task; the only stage that talks to
//!    the model endpoint
//! 3. [`assemble`] — pure packaging of the three results

pub mod assemble;
pub mod enrich;
pub mod fetch;
