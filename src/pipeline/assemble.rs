//! Response assembly: package the three enrichments for Kendra.

use crate::event::{AttributeUpdate, InvocationResponse};
use crate::prompts::EnrichmentTask;

/// Build the hook response from the three model outputs.
///
/// Pure: the same inputs always give the same response. `object_key` is not
/// echoed; the response carries [`InvocationResponse::OBJECT_KEY_LABEL`].
pub fn assemble(
    _object_key: &str,
    category: String,
    summary: String,
    keywords: String,
) -> InvocationResponse {
    let updates = EnrichmentTask::ALL
        .into_iter()
        .zip([category, summary, keywords])
        .map(|(task, value)| AttributeUpdate::new(task.attribute_name(), value))
        .collect();

    InvocationResponse {
        version: InvocationResponse::RESPONSE_VERSION.to_string(),
        object_key: InvocationResponse::OBJECT_KEY_LABEL.to_string(),
        metadata_updates: updates,
    }
}
