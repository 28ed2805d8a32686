//! Model interaction: build the prompt, call Bedrock, read `completion`.
//!
//! Each enrichment is one synchronous `InvokeModel` round-trip. The response
//! text is returned exactly as the model produced it; trimming or validating
//! it would change what ends up in the index.
//!
//! One [`BedrockInvoker`] (and so one SDK client with its connection pool) is
//! shared by all calls of an invocation.

use crate::config::{EnrichmentConfig, InferenceParameters};
use crate::error::EnrichError;
use crate::prompts::build_prompt;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde::Serialize;
use tracing::debug;

/// A single model request.
///
/// Serialises to the request body: the prompt with the sampling parameters
/// alongside it. The model identifier is not part of the body; it selects the
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInvocationPayload {
    #[serde(skip)]
    pub model_id: String,
    pub prompt: String,
    #[serde(flatten)]
    pub parameters: InferenceParameters,
}

impl ModelInvocationPayload {
    pub fn new(config: &EnrichmentConfig, prompt: String) -> Self {
        Self {
            model_id: config.model_id.clone(),
            prompt,
            parameters: config.parameters,
        }
    }

    /// JSON request body bytes.
    pub fn body(&self) -> Result<Vec<u8>, EnrichError> {
        serde_json::to_vec(self)
            .map_err(|e| EnrichError::Internal(format!("payload serialisation: {e}")))
    }
}

/// Sends a payload to the hosted model and returns the raw response body.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, payload: &ModelInvocationPayload) -> Result<Vec<u8>, EnrichError>;
}

/// [`ModelInvoker`] backed by Amazon Bedrock Runtime.
#[derive(Debug, Clone)]
pub struct BedrockInvoker {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockInvoker {
    pub fn new(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, payload: &ModelInvocationPayload) -> Result<Vec<u8>, EnrichError> {
        let body = payload.body()?;
        let output = self
            .client
            .invoke_model()
            .model_id(&payload.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| classify_invoke_error(&payload.model_id, e))?;

        Ok(output.body.into_inner())
    }
}

/// Map an `InvokeModel` failure, keeping the service error code in the detail.
fn classify_invoke_error(model_id: &str, err: SdkError<InvokeModelError>) -> EnrichError {
    EnrichError::InvokeFailed {
        model_id: model_id.to_string(),
        detail: DisplayErrorContext(&err).to_string(),
    }
}

/// Run one enrichment: prompt the model with `template` over `document_text`.
pub async fn enrich(
    invoker: &dyn ModelInvoker,
    config: &EnrichmentConfig,
    document_text: &str,
    template: &str,
) -> Result<String, EnrichError> {
    let payload = ModelInvocationPayload::new(config, build_prompt(template, document_text));
    let response = invoker.invoke(&payload).await?;
    debug!("Model response raw: {}", String::from_utf8_lossy(&response));

    let completion = extract_completion(&response)?;
    debug!("Model completion: {} chars", completion.chars().count());
    Ok(completion)
}

/// Pull the `completion` string out of a response body, unmodified.
pub fn extract_completion(response: &[u8]) -> Result<String, EnrichError> {
    let value: serde_json::Value =
        serde_json::from_slice(response).map_err(|e| EnrichError::MalformedResponse {
            detail: e.to_string(),
        })?;

    value
        .get("completion")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(EnrichError::MissingCompletion)
}
