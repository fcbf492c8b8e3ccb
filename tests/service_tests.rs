use std::cell::RefCell;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use cta_optimizer::api::{AnalysisService, ExportPayload, HttpAnalysisService};
use cta_optimizer::config::ClientConfig;
use cta_optimizer::error::ServiceError;
use cta_optimizer::export::{self, ExportFormat};
use cta_optimizer::session::driver;
use cta_optimizer::session::entry::ResultEntry;
use cta_optimizer::session::input::{ImageUpload, Submission, SubmissionKind};
use cta_optimizer::session::{Phase, SessionController, SubmitOutcome};

#[derive(Debug, Clone, PartialEq)]
struct Upload {
    field: String,
    file_name: String,
    content_type: String,
    size: usize,
}

#[derive(Clone, Default)]
struct MockState {
    history: Arc<Mutex<Vec<Value>>>,
    url_requests: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

impl MockState {
    async fn record(&self, kind: &str, input: &str, results: &Value) -> String {
        let mut history = self.history.lock().await;
        let n = history.len();
        let id = format!("{}_{}", kind, n + 1);
        history.push(json!({
            "id": id,
            "type": kind,
            "input": input,
            "timestamp": format!("2024-05-01T10:{:02}:00", n),
            "results": results,
        }));
        id
    }
}

fn sample_results(cta: &str, source: &str) -> Value {
    json!([{
        "original_cta": cta,
        "suggested_improvement": "Start your free trial",
        "confidence": "high",
        "source": source,
    }])
}

fn success(id: String, results: Value) -> Json<Value> {
    Json(json!({
        "success": true,
        "analysis_id": id,
        "results": results,
        "stats": {"ctas_analyzed": 1, "suggestions_provided": 1},
    }))
}

async fn analyze_text(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let text = body["text"].as_str().unwrap_or_default().to_string();
    if text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "No text provided"})),
        )
            .into_response();
    }
    let results = sample_results(&text, "N/A");
    let id = state.record("text", &text, &results).await;
    success(id, results).into_response()
}

async fn analyze_url(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.url_requests.lock().await.push(body.clone());
    let url = body["url"].as_str().unwrap_or_default().to_string();
    let results = sample_results("Learn more", "Homepage Hero Section");
    let id = state.record("url", &url, &results).await;
    success(id, results)
}

async fn analyze_image(State(state): State<MockState>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            size: 0,
        };
        let bytes = field.bytes().await.unwrap();
        state.uploads.lock().await.push(Upload {
            size: bytes.len(),
            ..upload
        });
    }
    let results = sample_results("Buy now", "Screenshot");
    let id = state.record("image", "hero.png", &results).await;
    success(id, results)
}

async fn history(State(state): State<MockState>) -> Json<Vec<Value>> {
    Json(state.history.lock().await.clone())
}

async fn export_results(Json(body): Json<Value>) -> Response {
    let results: Vec<ResultEntry> = serde_json::from_value(body["results"].clone()).unwrap();
    if results.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No results to export"})),
        )
            .into_response();
    }
    match body["format"].as_str() {
        Some("csv") => (
            [(header::CONTENT_TYPE, "text/csv")],
            export::to_csv(&results),
        )
            .into_response(),
        Some("json") => Json(body["results"].clone()).into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Unsupported format"})),
        )
            .into_response(),
    }
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn spawn_mock_service() -> (String, MockState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock service");
    let addr = listener.local_addr().expect("mock service address");
    let state = MockState::default();
    let app = Router::new()
        .route("/api/analyze-text", post(analyze_text))
        .route("/api/analyze-url", post(analyze_url))
        .route("/api/analyze-image", post(analyze_image))
        .route("/api/history", get(history))
        .route("/api/export-results", post(export_results))
        .route("/broken/api/analyze-text", post(broken))
        .route("/broken/api/history", get(broken))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn controller() -> RefCell<SessionController> {
    RefCell::new(SessionController::new(ClientConfig::default()))
}

#[tokio::test]
async fn test_text_submission_round_trip() {
    let (base, state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");
    let cell = controller();
    cell.borrow_mut().form_mut().text = "Click here".to_string();

    let outcome = driver::submit(&cell, &service, SubmissionKind::Text).await;
    assert_eq!(outcome, Some(SubmitOutcome::Loaded { count: 1 }));

    let c = cell.borrow();
    assert_eq!(c.phase(), Phase::ResultsReady);
    assert_eq!(c.session().analysis_id.as_deref(), Some("text_1"));
    assert_eq!(c.table().rows()[0].display_cta, "Click here");
    assert_eq!(c.table().rows()[0].suggestion, "Start your free trial");
    assert_eq!(c.stats().summary(), "1 CTAs analyzed \u{b7} 1 suggestions provided");
    assert_eq!(c.history().len(), 1, "history should refresh after a successful submit");
    assert_eq!(state.history.lock().await.len(), 1);
}

#[tokio::test]
async fn test_url_submission_sends_crawl_limits() {
    let (base, state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");
    let cell = controller();
    {
        let mut c = cell.borrow_mut();
        c.form_mut().url = "  https://example.com/pricing ".to_string();
        c.form_mut().max_pages = 3;
    }

    let outcome = driver::submit(&cell, &service, SubmissionKind::Url).await;
    assert_eq!(outcome, Some(SubmitOutcome::Loaded { count: 1 }));

    let requests = state.url_requests.lock().await;
    assert_eq!(
        requests[0],
        json!({"url": "https://example.com/pricing", "max_pages": 3, "scan_depth": 2})
    );
    assert_eq!(
        cell.borrow().table().rows()[0].source,
        "Homepage Hero Section"
    );
}

#[tokio::test]
async fn test_image_submission_is_multipart() {
    let (base, state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");
    let cell = controller();
    cell.borrow_mut().form_mut().image = Some(ImageUpload {
        file_name: "hero.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    });

    let outcome = driver::submit(&cell, &service, SubmissionKind::Image).await;
    assert_eq!(outcome, Some(SubmitOutcome::Loaded { count: 1 }));

    let uploads = state.uploads.lock().await;
    assert_eq!(
        uploads.as_slice(),
        &[Upload {
            field: "image".to_string(),
            file_name: "hero.png".to_string(),
            content_type: "image/png".to_string(),
            size: 4,
        }]
    );
}

#[tokio::test]
async fn test_service_rejection_carries_message() {
    let (base, _state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");

    let response = service
        .analyze(&Submission::Text {
            text: "   ".to_string(),
        })
        .await
        .expect("a 400 with a JSON body is still a response");
    assert!(!response.success);
    assert_eq!(
        response.into_outcome().unwrap_err(),
        ServiceError::Rejected("No text provided".to_string())
    );
}

#[tokio::test]
async fn test_server_error_leaves_session_untouched() {
    let (base, _state) = spawn_mock_service().await;
    let good = HttpAnalysisService::new(&base).expect("service");
    let broken = HttpAnalysisService::new(&format!("{base}/broken")).expect("service");
    let cell = controller();
    cell.borrow_mut().form_mut().text = "Click here".to_string();
    driver::submit(&cell, &good, SubmissionKind::Text).await;

    cell.borrow_mut().form_mut().text = "Sign up".to_string();
    let outcome = driver::submit(&cell, &broken, SubmissionKind::Text).await;
    match outcome {
        Some(SubmitOutcome::Failed(message)) => {
            assert!(message.contains("500"), "unexpected message: {}", message)
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let c = cell.borrow();
    assert_eq!(c.phase(), Phase::Idle);
    assert!(!c.is_loading());
    assert_eq!(c.results().len(), 1);
    assert_eq!(c.results().get(0).unwrap().original_cta, "Click here");
}

#[tokio::test]
async fn test_history_shows_five_newest_and_replays() {
    let (base, _state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");
    let cell = controller();

    for i in 1..=7 {
        cell.borrow_mut().form_mut().text = format!("CTA number {i}");
        driver::submit(&cell, &service, SubmissionKind::Text).await;
    }

    {
        let c = cell.borrow();
        assert_eq!(c.history().len(), 7);
        let recent = c.history().recent();
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["text_7", "text_6", "text_5", "text_4", "text_3"]);
    }

    cell.borrow_mut().load_from_history("text_2").expect("entry exists");
    let c = cell.borrow();
    assert_eq!(c.session().analysis_id.as_deref(), Some("text_2"));
    assert_eq!(c.table().rows()[0].display_cta, "CTA number 2");
}

#[tokio::test]
async fn test_history_failure_is_reported() {
    let (base, _state) = spawn_mock_service().await;
    let broken = HttpAnalysisService::new(&format!("{base}/broken")).expect("service");

    let err = broken.history().await.unwrap_err();
    assert!(matches!(err, ServiceError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_remote_export() {
    let (base, _state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");
    let cell = controller();
    cell.borrow_mut().form_mut().text = "Get \"started\", today".to_string();
    driver::submit(&cell, &service, SubmissionKind::Text).await;
    cell.borrow_mut().accept(0).expect("row 0");

    let now = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let file = driver::export_remote(&cell, &service, ExportFormat::Csv, now)
        .await
        .expect("csv export");
    assert_eq!(file.file_name, "cta_optimization_results_20240501_090000.csv");
    let decoded = export::parse_csv(&file.contents).expect("service CSV parses");
    assert_eq!(decoded[0].original_cta, "Start your free trial");

    let file = driver::export_remote(&cell, &service, ExportFormat::Json, now)
        .await
        .expect("json export");
    let decoded = export::from_json(&file.contents).expect("service JSON parses");
    assert_eq!(decoded, cell.borrow().results().to_vec());
}

#[tokio::test]
async fn test_export_rejection() {
    let (base, _state) = spawn_mock_service().await;
    let service = HttpAnalysisService::new(&base).expect("service");

    let err = service.export(&[], ExportFormat::Csv).await.unwrap_err();
    assert_eq!(err, ServiceError::Rejected("No results to export".to_string()));

    let payload = service
        .export(
            &[ResultEntry::new("a", "b", Default::default(), None)],
            ExportFormat::Json,
        )
        .await
        .expect("json export");
    assert!(matches!(payload, ExportPayload::Json(Value::Array(_))));
}

#[tokio::test]
async fn test_unreachable_service() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let service = HttpAnalysisService::new(&format!("http://{addr}")).expect("service");
    let err = service.history().await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)), "got {:?}", err);
}
