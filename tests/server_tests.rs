//! # Server Tests
//!
//! Drives the router with `tower::ServiceExt::oneshot`, backed by the
//! in-memory spooler.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use ticketera::error::OperationError;
use ticketera::fetch::ImageFetcher;
use ticketera::job::{JobContext, Pacing};
use ticketera::server::{self, AppState, ServerConfig};
use ticketera::transport::recording::{FailAt, RecordingSpooler};

/// Every download is a 404.
struct NotFound;

impl ImageFetcher for NotFound {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, OperationError> {
        Err(OperationError::Fetch(format!("Failed to download {}: HTTP 404 Not Found", url)))
    }
}

fn app(spooler: &RecordingSpooler) -> axum::Router {
    let context = JobContext {
        spooler: Arc::new(spooler.clone()),
        fetcher: Arc::new(NotFound),
        pacing: Pacing::immediate(),
    };
    let config = ServerConfig {
        serialize_printers: true,
        ..Default::default()
    };
    server::router(Arc::new(AppState::new(context, &config)))
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// GET
// ============================================================================

#[tokio::test]
async fn test_version() {
    let spooler = RecordingSpooler::new(["POS"]);
    let response = app(&spooler)
        .oneshot(Request::get("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"ok": true, "version": env!("CARGO_PKG_VERSION")})
    );
}

#[tokio::test]
async fn test_list_printers() {
    let spooler = RecordingSpooler::new(["EPSON TM-T20", "POS-58"]);
    let response = app(&spooler)
        .oneshot(Request::get("/impresoras").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["EPSON TM-T20", "POS-58"]));
}

#[tokio::test]
async fn test_list_printers_failure() {
    let spooler = RecordingSpooler::new(["POS"]).fail_enumeration("spooler service stopped");
    let response = app(&spooler)
        .oneshot(Request::get("/impresoras").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("spooler service stopped"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let spooler = RecordingSpooler::new(["POS"]);
    let response = app(&spooler)
        .oneshot(
            Request::get("/version")
                .header(header::ORIGIN, "https://pos.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

// ============================================================================
// POST /imprimir
// ============================================================================

#[tokio::test]
async fn test_print_text_job() {
    let spooler = RecordingSpooler::new(["POS"]);
    let body = json!({
        "nombreImpresora": "POS",
        "operaciones": [
            {"nombre": "Feed", "argumentos": [2]},
            {"nombre": "EscribirTexto", "argumentos": ["Hola"]},
            {"nombre": "AbrirCajon", "argumentos": []}
        ]
    });

    let response = app(&spooler)
        .oneshot(post_json("/imprimir", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"ok": true, "message": server::PRINT_OK})
    );
    assert_eq!(
        spooler.writes(),
        vec![vec![0x0A, 0x0A, b'H', b'o', b'l', b'a', 0x1B, b'p', 0, 25, 250]]
    );
}

#[tokio::test]
async fn test_odd_operation_entry_does_not_reject_job() {
    let spooler = RecordingSpooler::new(["POS"]);
    let body = json!({
        "nombreImpresora": "POS",
        "operaciones": [
            {"nombre": 5},
            {"nombre": "Feed", "argumentos": "total"},
            {"nombre": "EscribirTexto", "argumentos": ["Hola"]}
        ]
    });

    let response = app(&spooler)
        .oneshot(post_json("/imprimir", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], json!(true));
    assert_eq!(spooler.writes(), vec![b"Hola".to_vec()]);
}

#[tokio::test]
async fn test_failed_image_still_ok() {
    let spooler = RecordingSpooler::new(["POS"]);
    let body = json!({
        "nombreImpresora": "POS",
        "anchoImpresora": "58mm",
        "operaciones": [
            {"nombre": "DescargarImagenDeInternetEImprimir", "argumentos": ["https://cdn.example.com/nope.png", 200]},
            {"nombre": "EscribirTexto", "argumentos": ["Total: 10.00\n"]}
        ]
    });

    let response = app(&spooler)
        .oneshot(post_json("/imprimir", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], json!(true));
    assert_eq!(spooler.writes(), vec![b"Total: 10.00\n".to_vec()]);
}

#[tokio::test]
async fn test_empty_printer_name() {
    let spooler = RecordingSpooler::new(["POS"]);
    let body = json!({"nombreImpresora": "", "operaciones": []});

    let response = app(&spooler)
        .oneshot(post_json("/imprimir", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("required"));
    assert!(spooler.events().is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let spooler = RecordingSpooler::new(["POS"]);
    let response = app(&spooler)
        .oneshot(post_json("/imprimir", "{\"nombreImpresora\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["ok"], json!(false));
    assert!(spooler.events().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let spooler = RecordingSpooler::new(["POS"]).fail_at(FailAt::Write(0));
    let body = json!({
        "nombreImpresora": "POS",
        "operaciones": [{"nombre": "EscribirTexto", "argumentos": ["x"]}]
    });

    let response = app(&spooler)
        .oneshot(post_json("/imprimir", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("injected failure"));
}

#[tokio::test]
async fn test_server_survives_failed_job() {
    let spooler = RecordingSpooler::new(["POS"]).fail_at(FailAt::Open);
    let app = app(&spooler);
    let body = json!({"nombreImpresora": "POS", "operaciones": []}).to_string();

    let first = app.clone().oneshot(post_json("/imprimir", body.clone())).await.unwrap();
    let second = app.oneshot(post_json("/imprimir", body)).await.unwrap();

    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(spooler.events().len(), 2);
}
