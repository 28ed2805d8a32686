//! Instruction prompts for the three enrichment tasks.
//!
//! The model behind the hook expects a Human/Assistant transcript, so every
//! prompt is wrapped in [`PROMPT_HEAD`] and [`PROMPT_TAIL`]. The delimiters are
//! matched byte for byte by the model; do not reformat them.

/// Opens the human turn.
pub const PROMPT_HEAD: &str = "\n\nHuman:";

/// Opens the assistant turn the model completes.
pub const PROMPT_TAIL: &str = "\n\nAssistant:";

/// Asks for a single category name (or `OTHER`).
pub const CATEGORY_PROMPT: &str = "Analyze the provided corporate document and determine the most fitting category from the predefined set. Return only the category name that best represents the document's content. If the document does not align with the provided categories, categorize it as 'OTHER'. Do not include any additional information or summary, just the category name. \n ### predefined set: \n";

/// Asks for a search-oriented summary.
pub const SUMMARY_PROMPT: &str = "Please generate a concise summary of the provided corporate document, highlighting the key points and relevant details that can assist in keyword search optimization. Focus on capturing the essence of the content, including objectives, main findings, significant figures, and any conclusions or recommendations that are crucial for understanding the document's purpose and content. \n### vDocument:\n";

/// Asks for a comma-separated keyword list.
pub const KEYWORDS_PROMPT: &str = "Identify and extract the keywords from the provided corporate document, which describes various business processes. List the keywords separated by commas, without any additional explanations or context. Ensure that the keywords are relevant to the document's processes and content, enabling efficient search and categorization.";

/// One of the three derived artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentTask {
    Category,
    Summary,
    Keywords,
}

impl EnrichmentTask {
    /// All tasks, in the order their attributes appear in the response.
    pub const ALL: [EnrichmentTask; 3] = [
        EnrichmentTask::Category,
        EnrichmentTask::Summary,
        EnrichmentTask::Keywords,
    ];

    /// The instruction template for this task.
    pub fn template(self) -> &'static str {
        match self {
            EnrichmentTask::Category => CATEGORY_PROMPT,
            EnrichmentTask::Summary => SUMMARY_PROMPT,
            EnrichmentTask::Keywords => KEYWORDS_PROMPT,
        }
    }

    /// Name of the Kendra attribute this task fills.
    ///
    /// `_category` is a Kendra reserved field; the other two are custom
    /// attributes that must exist in the index.
    pub fn attribute_name(self) -> &'static str {
        match self {
            EnrichmentTask::Category => "_category",
            EnrichmentTask::Summary => "summary",
            EnrichmentTask::Keywords => "keywords",
        }
    }
}

/// Build the full model prompt: head, template, document text, tail.
pub fn build_prompt(template: &str, document_text: &str) -> String {
    let mut prompt = String::with_capacity(
        PROMPT_HEAD.len() + template.len() + document_text.len() + PROMPT_TAIL.len(),
    );
    prompt.push_str(PROMPT_HEAD);
    prompt.push_str(template);
    prompt.push_str(document_text);
    prompt.push_str(PROMPT_TAIL);
    prompt
}
