//! End-to-end tests for the enrichment hook.
//!
//! S3 and Bedrock are replaced with in-memory fakes that record every call,
//! so these run offline and can assert which remote calls happened. Log
//! output is captured with a scoped `tracing-subscriber` where it matters.

use async_trait::async_trait;
use kendra_enrich::prompts::PROMPT_HEAD;
use kendra_enrich::{
    EnrichError, EnrichmentConfig, EnrichmentHook, EnrichmentTask, ErrorKind, InvocationRequest,
    ModelInvocationPayload, ModelInvoker, ObjectStore,
};
use serde_json::json;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
    objects: HashMap<(String, String), Vec<u8>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    fn with_document(bucket: &str, key: &str, body_text: &str) -> Self {
        let doc = json!({
            "documentId": key,
            "textContent": { "documentBodyText": body_text }
        });
        let mut store = Self::default();
        store
            .objects
            .insert((bucket.into(), key.into()), doc.to_string().into_bytes());
        store
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EnrichError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| EnrichError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

/// Answers each task with a canned response body, recording prompts.
#[derive(Default)]
struct ScriptedModel {
    responses: HashMap<EnrichmentTask, Vec<u8>>,
    calls: Mutex<Vec<EnrichmentTask>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn completing(category: &str, summary: &str, keywords: &str) -> Self {
        let mut model = Self::default();
        for (task, text) in EnrichmentTask::ALL
            .into_iter()
            .zip([category, summary, keywords])
        {
            model.respond(task, json!({ "completion": text, "stop_reason": "stop_sequence" }));
        }
        model
    }

    fn respond(&mut self, task: EnrichmentTask, body: serde_json::Value) {
        self.responses.insert(task, body.to_string().into_bytes());
    }

    fn task_of(prompt: &str) -> EnrichmentTask {
        EnrichmentTask::ALL
            .into_iter()
            .find(|t| prompt.starts_with(&format!("{PROMPT_HEAD}{}", t.template())))
            .expect("prompt does not start with a known template")
    }
}

#[async_trait]
impl ModelInvoker for ScriptedModel {
    async fn invoke(&self, payload: &ModelInvocationPayload) -> Result<Vec<u8>, EnrichError> {
        let task = Self::task_of(&payload.prompt);
        self.calls.lock().unwrap().push(task);
        self.prompts.lock().unwrap().push(payload.prompt.clone());
        self.responses
            .get(&task)
            .cloned()
            .ok_or_else(|| EnrichError::InvokeFailed {
                model_id: payload.model_id.clone(),
                detail: "no scripted response".into(),
            })
    }
}

/// Collects formatted log lines written by the test subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's `kendra_enrich` logs (debug and up) into a buffer.
fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("kendra_enrich=debug"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn config(concurrent: bool) -> EnrichmentConfig {
    EnrichmentConfig::builder()
        .model_id("anthropic.claude-v2")
        .concurrent(concurrent)
        .build()
        .unwrap()
}

fn request(bucket: &str, key: &str) -> InvocationRequest {
    serde_json::from_value(json!({
        "version": "v0",
        "s3Bucket": bucket,
        "s3ObjectKey": key,
        "metadata": { "attributes": [] }
    }))
    .unwrap()
}

fn hook(
    store: &Arc<MemoryStore>,
    model: &Arc<ScriptedModel>,
    concurrent: bool,
) -> EnrichmentHook {
    EnrichmentHook::new(
        config(concurrent),
        Arc::clone(store) as Arc<dyn ObjectStore>,
        Arc::clone(model) as Arc<dyn ModelInvoker>,
    )
}

const BODY: &str = "Acme Corp Q3 report...";

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn enriches_document_with_three_attributes() {
    let store = Arc::new(MemoryStore::with_document("kendra-cde", "pre/acme.json", BODY));
    let model = Arc::new(ScriptedModel::completing(
        "FINANCE",
        "Concise summary...",
        "revenue, growth, quarter",
    ));

    let response = hook(&store, &model, false)
        .handle(&request("kendra-cde", "pre/acme.json"))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "version": "1.0",
            "s3ObjectKey": "updated_document",
            "metadataUpdates": [
                { "name": "_category", "value": { "stringValue": "FINANCE" } },
                { "name": "summary",   "value": { "stringValue": "Concise summary..." } },
                { "name": "keywords",  "value": { "stringValue": "revenue, growth, quarter" } }
            ]
        })
    );

    assert_eq!(
        *store.calls.lock().unwrap(),
        vec![("kendra-cde".to_string(), "pre/acme.json".to_string())]
    );
    assert_eq!(*model.calls.lock().unwrap(), EnrichmentTask::ALL.to_vec());
    for prompt in model.prompts.lock().unwrap().iter() {
        assert!(prompt.ends_with(&format!("{BODY}\n\nAssistant:")), "{prompt}");
    }
}

#[tokio::test]
async fn missing_object_fails_before_any_model_call() {
    let store = Arc::new(MemoryStore::default());
    let model = Arc::new(ScriptedModel::completing("a", "b", "c"));

    let err = hook(&store, &model, false)
        .handle(&request("kendra-cde", "pre/missing.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::ObjectNotFound { .. }), "{err}");
    assert_eq!(err.kind(), ErrorKind::Retrieval);
    assert!(model.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn document_without_body_fails_before_any_model_call() {
    let mut store = MemoryStore::default();
    store.objects.insert(
        ("b".into(), "k".into()),
        br#"{"textContent":{"title":"no body"}}"#.to_vec(),
    );
    let store = Arc::new(store);
    let model = Arc::new(ScriptedModel::completing("a", "b", "c"));

    let err = hook(&store, &model, false)
        .handle(&request("b", "k"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::MissingDocumentBody { .. }), "{err}");
    assert!(model.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_completion_on_summary_stops_before_keywords() {
    let store = Arc::new(MemoryStore::with_document("b", "k", BODY));
    let mut model = ScriptedModel::completing("FINANCE", "unused", "unused");
    model.respond(EnrichmentTask::Summary, json!({ "type": "error" }));
    let model = Arc::new(model);

    let err = hook(&store, &model, false)
        .handle(&request("b", "k"))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::MissingCompletion), "{err}");
    assert_eq!(err.kind(), ErrorKind::Inference);
    assert_eq!(
        *model.calls.lock().unwrap(),
        vec![EnrichmentTask::Category, EnrichmentTask::Summary]
    );
}

#[tokio::test]
async fn concurrent_mode_keeps_attribute_order() {
    let store = Arc::new(MemoryStore::with_document("b", "k", BODY));
    let model = Arc::new(ScriptedModel::completing("HR", "Policy update", "leave, policy"));

    let response = hook(&store, &model, true)
        .handle(&request("b", "k"))
        .await
        .unwrap();

    let values: Vec<_> = response
        .metadata_updates
        .iter()
        .map(|u| (u.name.as_str(), u.value_str()))
        .collect();
    assert_eq!(
        values,
        [
            ("_category", "HR"),
            ("summary", "Policy update"),
            ("keywords", "leave, policy")
        ]
    );
    assert_eq!(model.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn concurrent_mode_fails_whole_invocation() {
    let store = Arc::new(MemoryStore::with_document("b", "k", BODY));
    let mut model = ScriptedModel::completing("a", "b", "c");
    model.responses.remove(&EnrichmentTask::Keywords);
    let model = Arc::new(model);

    let err = hook(&store, &model, true)
        .handle(&request("b", "k"))
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::InvokeFailed { .. }), "{err}");
}

#[tokio::test]
async fn completion_is_not_post_processed() {
    let store = Arc::new(MemoryStore::with_document("b", "k", BODY));
    let model = Arc::new(ScriptedModel::completing(" FINANCE\n", "", "  a,b  "));

    let response = hook(&store, &model, false)
        .handle(&request("b", "k"))
        .await
        .unwrap();

    assert_eq!(response.update("_category").unwrap().value_str(), " FINANCE\n");
    assert_eq!(response.update("summary").unwrap().value_str(), "");
    assert_eq!(response.update("keywords").unwrap().value_str(), "  a,b  ");
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_invocation_is_logged_with_kind() {
    let (logs, _guard) = capture_logs();
    let store = Arc::new(MemoryStore::default());
    let model = Arc::new(ScriptedModel::completing("a", "b", "c"));

    let result = hook(&store, &model, false)
        .handle(&request("kendra-cde", "pre/missing.json"))
        .await;
    assert!(result.is_err());

    let out = logs.contents();
    assert!(out.contains("ERROR"), "{out}");
    assert!(
        out.contains("Enrichment failed for s3://kendra-cde/pre/missing.json"),
        "{out}"
    );
    assert!(out.contains("kind=Retrieval"), "{out}");
}

#[tokio::test]
async fn document_body_is_logged_at_debug() {
    let (logs, _guard) = capture_logs();
    let store = Arc::new(MemoryStore::with_document("b", "k", BODY));
    let model = Arc::new(ScriptedModel::completing("a", "b", "c"));

    hook(&store, &model, false)
        .handle(&request("b", "k"))
        .await
        .unwrap();

    let out = logs.contents();
    assert!(out.contains("DEBUG"), "{out}");
    assert!(out.contains("Extracted document body"), "{out}");
    assert!(out.contains(BODY), "{out}");
}

// ── Event files ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn loads_request_from_event_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"version":"v0","s3Bucket":"kendra-cde","s3ObjectKey":"pre/doc.json","metadata":null}}"#
    )
    .unwrap();

    let req = InvocationRequest::from_file(file.path()).await.unwrap();
    assert_eq!(req.bucket, "kendra-cde");
    assert_eq!(req.object_key, "pre/doc.json");
}

#[tokio::test]
async fn bad_event_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let err = InvocationRequest::from_file(file.path()).await.unwrap_err();
    assert!(matches!(err, EnrichError::EventFileInvalid { .. }), "{err}");

    let err = InvocationRequest::from_file("/nonexistent/event.json")
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::EventFileInvalid { .. }), "{err}");
}
