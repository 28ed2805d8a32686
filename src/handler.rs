//! Invocation entry points.
//!
//! [`EnrichmentHook`] owns the configuration and the two remote clients for
//! the lifetime of the process. Each [`EnrichmentHook::handle`] call runs the
//! straight-line pipeline: fetch the document, derive category, summary and
//! keywords, assemble the response. Any failure aborts the invocation with no
//! partial output.

use crate::config::EnrichmentConfig;
use crate::error::EnrichError;
use crate::event::{InvocationRequest, InvocationResponse};
use crate::pipeline::assemble::assemble;
use crate::pipeline::enrich::{enrich, BedrockInvoker, ModelInvoker};
use crate::pipeline::fetch::{fetch_document, ObjectStore, S3ObjectStore};
use crate::prompts::EnrichmentTask;
use aws_config::{BehaviorVersion, Region};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The enrichment hook: configuration plus storage and model clients.
///
/// Cheap to clone; clones share the underlying clients.
#[derive(Clone)]
pub struct EnrichmentHook {
    config: EnrichmentConfig,
    store: Arc<dyn ObjectStore>,
    invoker: Arc<dyn ModelInvoker>,
}

impl fmt::Debug for EnrichmentHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentHook")
            .field("config", &self.config)
            .field("store", &"<dyn ObjectStore>")
            .field("invoker", &"<dyn ModelInvoker>")
            .finish()
    }
}

impl EnrichmentHook {
    /// Build a hook from explicit collaborators.
    pub fn new(
        config: EnrichmentConfig,
        store: Arc<dyn ObjectStore>,
        invoker: Arc<dyn ModelInvoker>,
    ) -> Self {
        Self {
            config,
            store,
            invoker,
        }
    }

    /// Build a hook backed by S3 and Bedrock.
    ///
    /// Credentials come from the SDK's default provider chain (the Lambda
    /// execution role in production). `config.region` overrides the region.
    pub async fn from_aws(config: EnrichmentConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&shared));
        let invoker = BedrockInvoker::new(aws_sdk_bedrockruntime::Client::new(&shared));
        info!(
            "AWS clients ready (region: {})",
            shared.region().map(|r| r.as_ref()).unwrap_or("<default>")
        );

        Self::new(config, Arc::new(store), Arc::new(invoker))
    }

    /// Handle one Kendra invocation.
    ///
    /// # Errors
    /// Returns the first error hit; nothing is returned on partial success.
    pub async fn handle(
        &self,
        request: &InvocationRequest,
    ) -> Result<InvocationResponse, EnrichError> {
        let start = Instant::now();
        info!(
            "Enriching s3://{}/{} with model {}",
            request.bucket, request.object_key, self.config.model_id
        );

        match self.run(request).await {
            Ok(response) => {
                info!(
                    "Enrichment complete for {} in {}ms",
                    request.object_key,
                    start.elapsed().as_millis()
                );
                debug!("Response: {:?}", response);
                Ok(response)
            }
            Err(e) => {
                error!(
                    kind = ?e.kind(),
                    "Enrichment failed for s3://{}/{}: {}",
                    request.bucket,
                    request.object_key,
                    e
                );
                Err(e)
            }
        }
    }

    async fn run(&self, request: &InvocationRequest) -> Result<InvocationResponse, EnrichError> {
        // ── Step 1: Fetch document text ──────────────────────────────────
        let text =
            fetch_document(self.store.as_ref(), &request.bucket, &request.object_key).await?;

        // ── Step 2: Derive attributes ────────────────────────────────────
        let [category, summary, keywords] = if self.config.concurrent {
            self.enrich_concurrent(&text).await?
        } else {
            self.enrich_sequential(&text).await?
        };

        // ── Step 3: Assemble ─────────────────────────────────────────────
        Ok(assemble(&request.object_key, category, summary, keywords))
    }

    async fn enrich_one(&self, text: &str, task: EnrichmentTask) -> Result<String, EnrichError> {
        debug!("Requesting {}", task.attribute_name());
        enrich(self.invoker.as_ref(), &self.config, text, task.template()).await
    }

    /// One call at a time, in attribute order; stops at the first failure.
    async fn enrich_sequential(&self, text: &str) -> Result<[String; 3], EnrichError> {
        let category = self.enrich_one(text, EnrichmentTask::Category).await?;
        let summary = self.enrich_one(text, EnrichmentTask::Summary).await?;
        let keywords = self.enrich_one(text, EnrichmentTask::Keywords).await?;
        Ok([category, summary, keywords])
    }

    /// All three calls in flight at once, joined before assembly.
    async fn enrich_concurrent(&self, text: &str) -> Result<[String; 3], EnrichError> {
        let (category, summary, keywords) = futures::try_join!(
            self.enrich_one(text, EnrichmentTask::Category),
            self.enrich_one(text, EnrichmentTask::Summary),
            self.enrich_one(text, EnrichmentTask::Keywords),
        )?;
        Ok([category, summary, keywords])
    }
}

/// Synchronous wrapper around [`EnrichmentHook::handle`].
///
/// Creates a temporary tokio runtime internally; do not call from async code.
pub fn handle_sync(
    hook: &EnrichmentHook,
    request: &InvocationRequest,
) -> Result<InvocationResponse, EnrichError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| EnrichError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(hook.handle(request))
}
