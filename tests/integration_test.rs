//! Integration tests for pdf-qa
//!
//! The session is wired exactly as the binary wires it (`Session::from_config`)
//! with remote extraction, so every hosted call lands on a mock server.

use pdf_qa::api::AnswerBackend;
use pdf_qa::extract::{LocalExtractor, TextExtractor};
use pdf_qa::pdf::PdfReader;
use pdf_qa::session::SEARCHING;
use pdf_qa::{Config, ExtractionStrategy, Phase, Provider, Role, SelectedFile, Session, StatusKind};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn config_for(server: &MockServer) -> Config {
    Config {
        api_key: "test-key".to_string(),
        endpoint: format!("{}/v1/messages", server.uri()),
        model: "test-model".to_string(),
        extraction: ExtractionStrategy::Remote,
        ..Config::default()
    }
}

fn policy_pdf() -> SelectedFile {
    SelectedFile::from_bytes("policy.pdf", "application/pdf", PDF_BYTES.to_vec())
}

async fn mount_extraction(server: &MockServer, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains(r#""type":"document""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

async fn mount_answer(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("QUESTION: "))
        .respond_with(template)
        .mount(server)
        .await;
}

fn entries(session: &Session) -> Vec<(Role, String)> {
    session
        .transcript()
        .entries()
        .iter()
        .map(|e| (e.role, e.text.clone()))
        .collect()
}

#[tokio::test]
async fn test_upload_valid_pdf() {
    let server = MockServer::start().await;
    mount_extraction(
        &server,
        serde_json::json!({"content": [{"type": "text", "text": "Vacation policy: 20 days per year."}]}),
    )
    .await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    assert!(!session.controls().ask);

    assert!(session.upload(policy_pdf()).await);

    let status = session.status().unwrap();
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(status.message, "Successfully loaded policy.pdf");
    assert_eq!(session.document_text(), "Vacation policy: 20 days per year.");
    assert!(session.controls().ask);
    assert!(session.controls().question_input);
    assert_eq!(
        entries(&session),
        vec![(
            Role::System,
            "Document loaded: policy.pdf (34 characters extracted)".to_string()
        )]
    );
}

#[tokio::test]
async fn test_upload_non_pdf_rejected() {
    let server = MockServer::start().await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    let notes = SelectedFile::from_bytes("notes.txt", "text/plain", b"just notes".to_vec());

    assert!(!session.upload(notes).await);

    let status = session.status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, "Please upload a PDF file");
    assert!(session.transcript().is_empty());
    assert!(session.document().is_none());
    assert!(!session.controls().ask);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_question_answered_from_document() {
    let server = MockServer::start().await;
    mount_extraction(
        &server,
        serde_json::json!({"content": [{"type": "text", "text": "Section 3: Employees receive 20 vacation days."}]}),
    )
    .await;
    mount_answer(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": "Employees receive 20 vacation days (Section 3)."}]
        })),
    )
    .await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    session.upload(policy_pdf()).await;

    let pending = session.begin_question("What is the vacation policy?").unwrap();
    assert_eq!(
        entries(&session)[1..].to_vec(),
        vec![
            (Role::User, "What is the vacation policy?".to_string()),
            (Role::System, SEARCHING.to_string()),
        ]
    );
    assert!(!session.controls().ask);

    let done = pending.run().await;
    session.finish_question(done);

    assert_eq!(
        entries(&session)[1..].to_vec(),
        vec![
            (Role::User, "What is the vacation policy?".to_string()),
            (
                Role::Assistant,
                "Employees receive 20 vacation days (Section 3).".to_string()
            ),
        ]
    );
    assert!(session.controls().ask);

    // The answer request carried the whole document and the question
    let requests = server.received_requests().await.unwrap();
    let answer_request = requests
        .iter()
        .find(|r| String::from_utf8_lossy(&r.body).contains("QUESTION: "))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&answer_request.body).unwrap();
    let prompt = body["messages"][0]["content"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Section 3: Employees receive 20 vacation days."));
    assert!(prompt.contains("QUESTION: What is the vacation policy?"));
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["max_tokens"], 1024);
}

#[tokio::test]
async fn test_answer_api_failure() {
    let server = MockServer::start().await;
    mount_extraction(
        &server,
        serde_json::json!({"content": [{"type": "text", "text": "Some text"}]}),
    )
    .await;
    mount_answer(&server, ResponseTemplate::new(500)).await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    session.upload(policy_pdf()).await;

    assert!(session.ask("What is the vacation policy?").await);

    let last = session.transcript().last().unwrap();
    assert_eq!(last.role, Role::System);
    assert_eq!(last.text, "Error: Failed to get answer");
    assert_eq!(session.phase(), Phase::DocumentLoaded);
    assert!(session.controls().ask);
    assert!(session.controls().question_input);
}

#[tokio::test]
async fn test_answer_api_failure_reports_api_message() {
    let server = MockServer::start().await;
    mount_extraction(
        &server,
        serde_json::json!({"content": [{"type": "text", "text": "Some text"}]}),
    )
    .await;
    mount_answer(
        &server,
        ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "type": "error",
            "error": {"type": "rate_limit_error", "message": "Number of requests has exceeded your rate limit"}
        })),
    )
    .await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    session.upload(policy_pdf()).await;
    session.ask("anything").await;

    assert_eq!(
        session.transcript().last().unwrap().text,
        "Error: Number of requests has exceeded your rate limit"
    );

    // The conversation stays usable after a failure
    assert!(session.begin_question("again?").is_some());
}

#[tokio::test]
async fn test_extraction_without_text_still_loads() {
    let server = MockServer::start().await;
    mount_extraction(&server, serde_json::json!({"content": []})).await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();

    assert!(session.upload(policy_pdf()).await);

    assert_eq!(session.document_text(), "");
    assert_eq!(session.phase(), Phase::DocumentLoaded);
    assert_eq!(
        session.status().unwrap().message,
        "Successfully loaded policy.pdf"
    );
    assert_eq!(
        session.transcript().last().unwrap().text,
        "Document loaded: policy.pdf (0 characters extracted)"
    );

    // Nothing to ground an answer on: no request goes out
    assert!(!session.ask("What is the vacation policy?").await);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_extraction_failure_is_not_a_load() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"message": "Could not process PDF"}
        })))
        .mount(&server)
        .await;

    let mut session = Session::from_config(&config_for(&server)).unwrap();

    assert!(!session.upload(policy_pdf()).await);

    let status = session.status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, "Error processing PDF: Could not process PDF");
    assert!(session.transcript().is_empty());
    assert_eq!(session.phase(), Phase::NoDocument);
}

#[tokio::test]
async fn test_uploading_from_disk() {
    let server = MockServer::start().await;
    mount_extraction(
        &server,
        serde_json::json!({"content": [{"type": "text", "text": "From disk"}]}),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("handbook.pdf");
    std::fs::write(&pdf_path, PDF_BYTES).unwrap();

    let mut session = Session::from_config(&config_for(&server)).unwrap();
    assert!(session.upload(SelectedFile::from_path(&pdf_path)).await);

    assert_eq!(session.document().unwrap().file_name, "handbook.pdf");
    assert_eq!(session.document_text(), "From disk");
}

#[tokio::test]
async fn test_gemini_provider_answers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "AIzaTestKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Twenty days."}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_key: "AIzaTestKey".to_string(),
        provider: Provider::Gemini,
        endpoint: format!("{}/v1beta", server.uri()),
        model: "gemini-2.0-flash".to_string(),
        ..Config::default()
    };
    let backend = pdf_qa::api::answer_backend(&config, reqwest::Client::new());
    let answer = backend
        .generate(&pdf_qa::api::grounding_prompt("Vacation: 20 days", "How many days?"))
        .await
        .unwrap();

    assert_eq!(answer, "Twenty days.");
}

#[test]
fn test_read_two_page_pdf() {
    let data = std::fs::read(fixture_path("two-pages.pdf")).expect("Failed to read two-pages.pdf");
    let reader = PdfReader::open_bytes(&data).expect("Failed to open two-pages.pdf");

    assert_eq!(reader.page_count(), 2);
    assert!(reader.pages()[0].contains("alpha"));
    assert!(reader.pages()[1].contains("beta"));
}

#[tokio::test]
async fn test_local_extraction_keeps_page_order() {
    let data = std::fs::read(fixture_path("two-pages.pdf")).expect("Failed to read two-pages.pdf");

    let text = LocalExtractor
        .extract(data)
        .await
        .expect("Failed to extract two-pages.pdf");

    assert!(!text.trim().is_empty());
    assert!(text.ends_with('\n'));
    assert_eq!(text.matches('\n').count(), 2);

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("First") && lines[0].contains("alpha"));
    assert!(lines[1].contains("Second") && lines[1].contains("beta"));
}

#[tokio::test]
async fn test_local_session_upload_from_disk() {
    let config = Config {
        api_key: "unused".to_string(),
        ..Config::default()
    };
    let mut session = Session::from_config(&config).unwrap();

    assert!(session.upload(SelectedFile::from_path(fixture_path("two-pages.pdf"))).await);

    let document = session.document().unwrap();
    assert_eq!(document.file_name, "two-pages.pdf");
    assert!(document.text.find("alpha").unwrap() < document.text.find("beta").unwrap());
}
