/// End-to-end tests for the HTTP boundary.
///
/// Tests the complete flow:
///   request → validation → analyzer (mock model) → response → apply-fix
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use visecode::analysis::Analyzer;
use visecode::config::Config;
use visecode::fix::FixApplicator;
use visecode::generator::Generator;
use visecode::generator::mock::MockGenerator;
use visecode::schema::AnalysisResult;
use visecode::server::{self, AppState};
use visecode::triage::{self, Verdict};

const SAMPLE_CODE: &str = "function greet(user) {\n  const name = user.profile.name;\n  return `Hi ${name}`;\n}\n";

struct TestServer {
    base: String,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(generator: Arc<dyn Generator>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let state = AppState::new(Analyzer::new(generator), FixApplicator::builtin());
        tokio::spawn(async move {
            server::serve(listener, state, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });
        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            shutdown: Some(tx),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{path}", self.base))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn model_output() -> Value {
    json!({
        "bugs": [
            {
                "id": "bug-1",
                "description": "Potential null dereference",
                "explanation": "user or user.profile may be undefined.",
                "lineNumber": 2,
                "codeSnippet": "const name = user.profile.name;",
                "severity": "critical"
            },
            {
                "id": "bug-2",
                "description": "Template literal",
                "explanation": "Style only.",
                "severity": "info"
            }
        ],
        "fixSuggestions": [{
            "id": "fix-1",
            "bugId": "bug-1",
            "description": "Null check",
            "suggestedCodePatch": "const name = user?.profile?.name;",
            "explanation": "Optional chaining short-circuits on undefined."
        }]
    })
}

/// Full flow: analyze → classify → apply the first fix → re-apply
#[tokio::test]
async fn test_analyze_then_apply_fix() {
    let server = TestServer::start(Arc::new(MockGenerator::with_output(model_output()))).await;

    let (status, body) = server
        .post("/analyze", &json!({"code": SAMPLE_CODE, "fileName": "greet.js"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, model_output(), "valid model output passes through unchanged");

    let result: AnalysisResult = serde_json::from_value(body).unwrap();
    assert_eq!(triage::classify(&result), Verdict::Critical);
    let fix = triage::primary_fix(&result).unwrap();

    let (status, applied) = server
        .post(
            "/apply-fix",
            &json!({
                "currentCode": SAMPLE_CODE,
                "fixId": fix.id,
                "candidates": result.fix_suggestions,
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        applied["updatedCode"],
        SAMPLE_CODE.replacen(
            "const name = user.profile.name;",
            "const name = user?.profile?.name;",
            1
        )
    );
    assert_eq!(
        applied["message"],
        "Fix \"Null check\" applied successfully. Please review the changes."
    );

    // Applying again finds no snippet and prepends the suggestion instead.
    let patched = applied["updatedCode"].as_str().unwrap();
    let (status, reapplied) = server
        .post(
            "/apply-fix",
            &json!({"currentCode": patched, "fixId": "fix-1", "candidates": result.fix_suggestions}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        reapplied["updatedCode"],
        format!("// Suggested fix for: Null check\nconst name = user?.profile?.name;\n\n{patched}")
    );
}

/// `/api/analyze-code` is an alias of `/analyze`
#[tokio::test]
async fn test_legacy_route() {
    let server = TestServer::start(Arc::new(MockGenerator::with_output(model_output()))).await;
    let (status, body) = server
        .post("/api/analyze-code", &json!({"code": SAMPLE_CODE}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["bugs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_request_is_bad_request() {
    let server = TestServer::start(Arc::new(MockGenerator::with_output(model_output()))).await;

    let (status, body) = server.post("/analyze", &json!({"code": ""})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid input");
    assert_eq!(body["details"]["issues"][0]["path"], "code");

    let (status, body) = server.post("/analyze", &json!({"fileName": 3})).await;
    assert_eq!(status, 400);
    assert_eq!(body["details"]["issues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start(Arc::new(MockGenerator::no_output())).await;
    let resp = server
        .client
        .post(format!("{}/analyze", server.base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid input");
}

#[tokio::test]
async fn test_model_failures_degrade_to_empty() {
    let empty = json!({"bugs": [], "fixSuggestions": []});

    let server = TestServer::start(Arc::new(MockGenerator::no_output())).await;
    let (status, body) = server.post("/analyze", &json!({"code": SAMPLE_CODE})).await;
    assert_eq!(status, 200);
    assert_eq!(body, empty);

    let garbage = json!({"bugs": [{"id": "b", "severity": "meh"}], "fixSuggestions": []});
    let server = TestServer::start(Arc::new(MockGenerator::with_output(garbage))).await;
    let (status, body) = server.post("/analyze", &json!({"code": SAMPLE_CODE})).await;
    assert_eq!(status, 200);
    assert_eq!(body, empty);
}

#[tokio::test]
async fn test_transport_failure_is_server_error() {
    let server = TestServer::start(Arc::new(MockGenerator::failing("connection reset"))).await;
    let (status, body) = server.post("/analyze", &json!({"code": SAMPLE_CODE})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to analyze code");
    assert!(body["details"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_unknown_fix_is_not_found() {
    let server = TestServer::start(Arc::new(MockGenerator::no_output())).await;
    let (status, body) = server
        .post(
            "/apply-fix",
            &json!({"currentCode": SAMPLE_CODE, "fixId": "fix-9", "candidates": []}),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Fix suggestion not found.");
    assert_eq!(body["details"], "fix-9");
}

#[tokio::test]
async fn test_apply_fix_rejects_bad_candidates() {
    let server = TestServer::start(Arc::new(MockGenerator::no_output())).await;
    let (status, body) = server
        .post(
            "/apply-fix",
            &json!({"currentCode": "x", "fixId": "fix-1", "candidates": [{"id": "fix-1"}]}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid input");
}

#[tokio::test]
async fn test_schema_and_health() {
    let server = TestServer::start(Arc::new(MockGenerator::no_output())).await;

    let schema: Value = server
        .client
        .get(format!("{}/schema", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(schema.to_string().contains("suggestedCodePatch"));

    let health: Value = server
        .client
        .get(format!("{}/health", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
}

/// Test config defaults and validation
#[test]
fn test_config_defaults_and_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.bind_addr().is_ok());

    let mut bad_config = Config::default();
    bad_config.model.api_base = "ftp://models".to_string();
    assert!(bad_config.validate().is_err());
}
