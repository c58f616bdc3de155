//! Common test utilities for integration tests.
//!
//! Each test gets its own ledger workbook inside a temporary directory and a
//! recording notifier in place of SMTP.

// Not every helper is used by every integration test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use domain::services::MockRequestNotifier;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use maintenance_intake_api::{
    app::create_app,
    config::{
        Config, EmailConfig, LoggingConfig, ServerConfig, StoreConfig, TechnicianConfig,
    },
};
use persistence::WorkbookStore;
use std::sync::Arc;
use tempfile::TempDir;

pub const TECHNICIAN_USERNAME: &str = "tecnico";
pub const TECHNICIAN_PASSWORD: &str = "1234";

/// A router wired to a throwaway ledger.
pub struct TestApp {
    pub router: Router,
    pub notifier: MockRequestNotifier,
    pub store: WorkbookStore,
    // Dropping the directory deletes the ledger.
    _dir: TempDir,
}

/// Test configuration writing the ledger to `store_path`.
pub fn test_config(store_path: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        store: StoreConfig {
            path: store_path.to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        technician: TechnicianConfig {
            username: TECHNICIAN_USERNAME.to_string(),
            password: TECHNICIAN_PASSWORD.to_string(),
        },
        email: EmailConfig::default(),
    }
}

/// Create a test app with a recording notifier.
pub fn create_test_app() -> TestApp {
    create_test_app_with(MockRequestNotifier::new())
}

pub fn create_test_app_with(notifier: MockRequestNotifier) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("solicitacoes_manutencao.xlsx");
    let config = test_config(path.to_str().expect("Temp path is not UTF-8"));

    TestApp {
        router: create_app(config, Arc::new(notifier.clone())),
        notifier,
        store: WorkbookStore::new(path),
        _dir: dir,
    }
}

/// Submission form fields as posted by the browser.
#[derive(Debug, Clone)]
pub struct TestSubmission {
    pub solicitante: String,
    pub email_solicitante: String,
    pub equipamento: String,
    pub descricao: String,
}

impl TestSubmission {
    /// Random requester data.
    pub fn new() -> Self {
        Self {
            solicitante: Name().fake(),
            email_solicitante: SafeEmail().fake(),
            equipamento: format!("Printer-{}", (1..100).fake::<u32>()),
            descricao: Sentence(3..8).fake(),
        }
    }

    pub fn with(solicitante: &str, email: &str, equipamento: &str, descricao: &str) -> Self {
        Self {
            solicitante: solicitante.to_string(),
            email_solicitante: email.to_string(),
            equipamento: equipamento.to_string(),
            descricao: descricao.to_string(),
        }
    }

    pub fn encoded(&self) -> String {
        serde_urlencoded::to_string([
            ("solicitante", self.solicitante.as_str()),
            ("email_solicitante", self.email_solicitante.as_str()),
            ("equipamento", self.equipamento.as_str()),
            ("descricao", self.descricao.as_str()),
        ])
        .expect("Failed to encode form")
    }
}

/// Helper to create a form-encoded POST request.
pub fn form_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Helper to create a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// `Authorization: Basic ...` value for the given credentials.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Add technician credentials to a request.
pub fn as_technician(mut request: Request<Body>) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        basic_auth(TECHNICIAN_USERNAME, TECHNICIAN_PASSWORD)
            .parse()
            .unwrap(),
    );
    request
}

/// Helper to read the response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}
