//! # kendra-enrich
//!
//! A Kendra Custom Document Enrichment post-extraction hook that asks a
//! Bedrock-hosted model for three derived attributes of each document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! InvocationRequest (bucket, key)
//!  │
//!  ├─ 1. Fetch     read extracted document JSON from S3, take documentBodyText
//!  ├─ 2. Enrich    three InvokeModel calls: category, summary, keywords
//!  └─ 3. Assemble  InvocationResponse with _category / summary / keywords
//! ```
//!
//! Every invocation either returns a fully populated response or fails as a
//! whole. There are no retries; Kendra decides whether to re-invoke.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kendra_enrich::{EnrichmentConfig, EnrichmentHook, InvocationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EnrichmentConfig::builder()
//!         .model_id("anthropic.claude-v2")
//!         .build()?;
//!     let hook = EnrichmentHook::from_aws(config).await;
//!     let request = InvocationRequest::from_file("event.json").await?;
//!     let response = hook.handle(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `kendra-enrich` binary (Lambda runtime + local mode) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConfigOverrides, EnrichmentConfig, EnrichmentConfigBuilder, InferenceParameters};
pub use error::{EnrichError, ErrorKind};
pub use event::{AttributeUpdate, AttributeValue, InvocationRequest, InvocationResponse};
pub use handler::{handle_sync, EnrichmentHook};
pub use pipeline::enrich::{ModelInvocationPayload, ModelInvoker};
pub use pipeline::fetch::ObjectStore;
pub use prompts::EnrichmentTask;
