//! Configuration for the enrichment hook.
//!
//! All behaviour is controlled through [`EnrichmentConfig`], built via its
//! [`EnrichmentConfigBuilder`] or read once from the Lambda environment with
//! [`EnrichmentConfig::from_env`], where command-line [`ConfigOverrides`]
//! take precedence over variables. The config is handed to
//! [`crate::handler::EnrichmentHook`] at construction; nothing in the library
//! reads ambient state after that.

use crate::error::EnrichError;
use serde::{Deserialize, Serialize};

/// Environment variable holding the Bedrock model identifier.
pub const MODEL_ID_ENV: &str = "BEDROCK_MODEL_ID";

/// Environment variable overriding the AWS region.
pub const REGION_ENV: &str = "AWS_REGION";

/// Environment variable enabling concurrent enrichment calls.
pub const CONCURRENT_ENV: &str = "ENRICH_CONCURRENT";

/// Sampling parameters sent with every model call.
///
/// Field names are the wire names the model expects in its request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceParameters {
    /// Sampling temperature. Default: 0.40.
    pub temperature: f64,
    /// Nucleus-sampling threshold. Default: 0.75.
    pub p: f64,
    /// Top-k cutoff; 0 disables it. Default: 0.
    pub k: u32,
    /// Maximum output tokens. Default: 200.
    pub max_tokens: u32,
}

impl Default for InferenceParameters {
    fn default() -> Self {
        Self {
            temperature: 0.40,
            p: 0.75,
            k: 0,
            max_tokens: 200,
        }
    }
}

/// Configuration for one hook instance.
///
/// # Example
/// ```rust
/// use kendra_enrich::EnrichmentConfig;
///
/// let config = EnrichmentConfig::builder()
///     .model_id("anthropic.claude-v2")
///     .region("eu-central-1")
///     .build()
///     .unwrap();
/// assert_eq!(config.parameters.max_tokens, 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// Bedrock model identifier, e.g. `anthropic.claude-v2`. Required.
    pub model_id: String,

    /// AWS region override. If None, the SDK's default provider chain decides.
    pub region: Option<String>,

    /// Sampling parameters, identical for all three calls.
    pub parameters: InferenceParameters,

    /// Run the three model calls concurrently. Default: false.
    ///
    /// The calls are independent, so joining them cuts latency to roughly one
    /// round-trip. Sequential mode stops at the first failure, so later calls
    /// are never issued; concurrent mode may already have them in flight.
    pub concurrent: bool,
}

impl EnrichmentConfig {
    /// Create a new builder. `model_id` must be set before [`EnrichmentConfigBuilder::build`].
    pub fn builder() -> EnrichmentConfigBuilder {
        EnrichmentConfigBuilder {
            config: EnrichmentConfig {
                model_id: String::new(),
                region: None,
                parameters: InferenceParameters::default(),
                concurrent: false,
            },
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, EnrichError> {
        Self::from_lookup(overrides, |name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Set fields of `overrides` win over the looked-up values.
    pub fn from_lookup<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Self, EnrichError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_id = overrides
            .model_id
            .clone()
            .or_else(|| lookup(MODEL_ID_ENV))
            .ok_or_else(|| EnrichError::InvalidConfig(format!("{MODEL_ID_ENV} is not set")))?;

        let mut builder = Self::builder().model_id(model_id);

        let region = overrides.region.clone().or_else(|| lookup(REGION_ENV));
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            builder = builder.region(region);
        }

        let concurrent = match lookup(CONCURRENT_ENV) {
            Some(raw) => parse_flag(CONCURRENT_ENV, &raw)?,
            None => false,
        };
        builder = builder.concurrent(overrides.concurrent || concurrent);

        builder.build()
    }
}

/// Values given on the command line, applied on top of the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub model_id: Option<String>,
    pub region: Option<String>,
    /// Forces concurrent mode on; `false` leaves the environment in charge.
    pub concurrent: bool,
}

/// Builder for [`EnrichmentConfig`].
#[derive(Debug)]
pub struct EnrichmentConfigBuilder {
    config: EnrichmentConfig,
}

impl EnrichmentConfigBuilder {
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.config.model_id = model_id.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    pub fn parameters(mut self, parameters: InferenceParameters) -> Self {
        self.config.parameters = parameters;
        self
    }

    pub fn concurrent(mut self, v: bool) -> Self {
        self.config.concurrent = v;
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A blank model identifier is rejected here rather than surfacing as a
    /// model-not-found error on the first call.
    pub fn build(self) -> Result<EnrichmentConfig, EnrichError> {
        let c = &self.config;
        if c.model_id.trim().is_empty() {
            return Err(EnrichError::InvalidConfig(
                "model identifier must not be empty".into(),
            ));
        }
        if c.parameters.max_tokens == 0 {
            return Err(EnrichError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, EnrichError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(EnrichError::InvalidConfig(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
