//! HTTP API tests against a stub remote service.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use clipcoach_api::{create_router, ApiConfig, AppState};
use clipcoach_core::{CoachConfig, CoachError, CoachResult, RemoteAssetService};
use clipcoach_models::{AssetState, ReadyAsset, RemoteAsset};

const PASSWORD: &str = "letmein";
const BOUNDARY: &str = "clipcoach-test-boundary";

/// What the stub returns from `generate`.
#[derive(Clone, Copy)]
enum Generate {
    Text,
    TransportError,
    ConfigError,
}

/// Remote service with a scripted upload state, poll state and generate outcome.
struct StubRemote {
    upload_state: AssetState,
    poll_state: Option<AssetState>,
    generate: Generate,
    instructions: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl StubRemote {
    /// Uploads are immediately active and generation succeeds.
    fn new() -> Self {
        Self {
            upload_state: AssetState::Active,
            poll_state: None,
            generate: Generate::Text,
            instructions: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    fn generating(generate: Generate) -> Self {
        Self {
            generate,
            ..Self::new()
        }
    }

    /// Uploads start processing and every state fetch reports `state`.
    fn processing_then(state: AssetState) -> Self {
        Self {
            upload_state: AssetState::Processing,
            poll_state: Some(state),
            ..Self::new()
        }
    }

    fn asset(&self, state: AssetState) -> RemoteAsset {
        RemoteAsset {
            name: "files/test-asset".to_string(),
            uri: "https://example.test/v1beta/files/test-asset".to_string(),
            mime_type: "video/mp4".to_string(),
            state,
            error: (state == AssetState::Failed).then(|| "unsupported codec".to_string()),
        }
    }
}

#[async_trait]
impl RemoteAssetService for StubRemote {
    fn model(&self) -> &str {
        "stub-model"
    }

    async fn upload(&self, _path: &Path, mime_type: &str, _display_name: &str) -> CoachResult<RemoteAsset> {
        Ok(RemoteAsset {
            mime_type: mime_type.to_string(),
            ..self.asset(self.upload_state)
        })
    }

    async fn get_state(&self, name: &str) -> CoachResult<RemoteAsset> {
        match self.poll_state {
            Some(state) => Ok(self.asset(state)),
            None => Err(CoachError::transport(format!("unexpected state fetch for {}", name))),
        }
    }

    async fn generate(&self, _asset: &ReadyAsset, instruction: &str) -> CoachResult<String> {
        self.instructions.lock().unwrap().push(instruction.to_string());
        match self.generate {
            Generate::Text => Ok(
                "1. Pre-aim corners.\n2. Stop before shooting.\n3. Keep crosshair at head level."
                    .to_string(),
            ),
            Generate::TransportError => {
                Err(CoachError::transport("Gemini API returned 503: overloaded"))
            }
            Generate::ConfigError => Err(CoachError::config("model rejected the API key")),
        }
    }

    async fn delete(&self, name: &str) -> CoachResult<()> {
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        access_password: Some(PASSWORD.to_string()),
        session_ttl: Duration::from_secs(60),
        ..ApiConfig::default()
    }
}

fn coach_config(work_dir: &Path) -> CoachConfig {
    CoachConfig {
        work_dir: Some(work_dir.to_path_buf()),
        ..CoachConfig::default()
    }
}

fn router(config: ApiConfig, service: Arc<StubRemote>, coach: &CoachConfig) -> Router {
    let state = AppState::from_parts(config, service, coach).unwrap();
    create_router(state, None)
}

fn app_with(service: Arc<StubRemote>, work_dir: &Path) -> Router {
    router(test_config(), service, &coach_config(work_dir))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn unlock(app: &Router, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::post("/api/access")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::json!({ "password": password }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn token(app: &Router) -> String {
    let response = unlock(app, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

fn multipart_body(game: Option<&str>, file: Option<(&str, &[u8])>) -> Body {
    let mut body = Vec::new();
    if let Some(game) = game {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"game\"\r\n\r\n{game}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

async fn submit(app: &Router, token: &str, game: &str, file: (&str, &[u8])) -> axum::response::Response {
    let body = multipart_body(Some(game), Some(file));
    app.clone()
        .oneshot(feedback_request(Some(token), body))
        .await
        .unwrap()
}

fn feedback_request(token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::post("/api/feedback").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(Arc::new(StubRemote::new()), dir.path());

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");

    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model"], "stub-model");
    assert_eq!(json["available_slots"], 4);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(Arc::new(StubRemote::new()), dir.path());

    let response = app
        .oneshot(
            Request::get("/healthz")
                .header("X-Request-ID", "trace-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
}

#[tokio::test]
async fn test_games_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(Arc::new(StubRemote::new()), dir.path());

    let response = app
        .oneshot(Request::get("/api/games").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let games = json["games"].as_array().unwrap();
    assert_eq!(games.len(), 7);
    assert_eq!(games[0]["slug"], "valorant");
    assert_eq!(games[0]["label"], "Valorant");
    assert!(games.iter().any(|g| g["label"] == "Counter-Strike 2"));
}

#[tokio::test]
async fn test_access_gate_accepts_and_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(Arc::new(StubRemote::new()), dir.path());

    let response = unlock(&app, "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Password incorrect");

    let response = unlock(&app, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json["token"].as_str().unwrap().is_empty());
    assert!(json["expires_at"].is_string());
}

#[tokio::test]
async fn test_feedback_requires_session() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::new());
    let app = app_with(service.clone(), dir.path());

    let body = multipart_body(Some("Valorant"), Some(("ace.mp4", b"not really a video")));
    let response = app.clone().oneshot(feedback_request(None, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = multipart_body(Some("Valorant"), Some(("ace.mp4", b"not really a video")));
    let response = app
        .oneshot(feedback_request(Some("made-up-token"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(service.instructions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::new());
    let app = app_with(service.clone(), dir.path());
    let token = token(&app).await;

    let body = multipart_body(Some("Rocket League"), Some(("kickoff.mov", b"fake clip bytes")));
    let response = app
        .oneshot(feedback_request(Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["game"], "rocket-league");
    assert_eq!(json["model"], "stub-model");
    assert_eq!(json["polls"], 0);
    assert!(json["text"].as_str().unwrap().starts_with("1. Pre-aim corners."));

    let instructions = service.instructions.lock().unwrap().clone();
    assert_eq!(instructions.len(), 1);
    assert!(instructions[0].contains("Rocket League"));
    assert_eq!(*service.deleted.lock().unwrap(), vec!["files/test-asset".to_string()]);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_feedback_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::new());
    let app = app_with(service.clone(), dir.path());
    let token = token(&app).await;

    let body = multipart_body(Some("Chess"), Some(("game.mp4", b"bytes")));
    let response = app
        .clone()
        .oneshot(feedback_request(Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "unknown_game");

    let body = multipart_body(Some("Valorant"), Some(("clip.avi", b"bytes")));
    let response = app
        .clone()
        .oneshot(feedback_request(Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "unsupported_format");

    let body = multipart_body(Some("Valorant"), None);
    let response = app
        .oneshot(feedback_request(Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(service.instructions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_remote_failure_surfaces_as_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::generating(Generate::TransportError));
    let app = app_with(service.clone(), dir.path());
    let token = token(&app).await;

    let body = multipart_body(Some("valorant"), Some(("clutch.mp4", b"bytes")));
    let response = app
        .oneshot(feedback_request(Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "transport");
    assert!(json.get("text").is_none());
    assert_eq!(service.deleted.lock().unwrap().len(), 1);
}

#[test]
fn test_state_requires_access_password() {
    let dir = tempfile::tempdir().unwrap();
    let coach = coach_config(dir.path());

    let missing = ApiConfig {
        access_password: None,
        ..ApiConfig::default()
    };
    let err = AppState::from_parts(missing, Arc::new(StubRemote::new()), &coach).unwrap_err();
    assert!(err.to_string().contains("ACCESS_PASSWORD"));

    let empty = ApiConfig {
        access_password: Some(String::new()),
        ..ApiConfig::default()
    };
    assert!(AppState::from_parts(empty, Arc::new(StubRemote::new()), &coach).is_err());
}

#[tokio::test]
async fn test_oversized_clip_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::new());
    let config = ApiConfig {
        max_body_size: 1024,
        ..test_config()
    };
    let app = router(config, service.clone(), &coach_config(dir.path()));
    let token = token(&app).await;

    let clip = vec![0u8; 4096];
    let response = submit(&app, &token, "Valorant", ("huge.mp4", &clip)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(service.instructions.lock().unwrap().is_empty());
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_rate_limit_keys_on_peer_address() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        rate_limit_rps: 1,
        rate_limit_burst: 1,
        ..test_config()
    };
    let app = router(config, Arc::new(StubRemote::new()), &coach_config(dir.path()));

    let games = |forwarded_for: &str| {
        from_peer(
            Request::get("/api/games")
                .header("X-Forwarded-For", forwarded_for)
                .body(Body::empty())
                .unwrap(),
            "192.0.2.10:50000",
        )
    };

    let response = app.clone().oneshot(games("203.0.113.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A fresh forwarded address does not buy a new budget
    let response = app.clone().oneshot(games("203.0.113.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "1");
    assert_eq!(body_json(response).await["code"], "rate_limited");

    // Other peers are unaffected
    let response = app
        .oneshot(from_peer(
            Request::get("/api/games").body(Body::empty()).unwrap(),
            "192.0.2.11:50000",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_trusted_proxy_rate_limits_per_forwarded_client() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        rate_limit_rps: 1,
        rate_limit_burst: 1,
        trust_proxy_headers: true,
        ..test_config()
    };
    let app = router(config, Arc::new(StubRemote::new()), &coach_config(dir.path()));

    for client in ["203.0.113.1", "203.0.113.2"] {
        let request = from_peer(
            Request::get("/api/games")
                .header("X-Forwarded-For", client)
                .body(Body::empty())
                .unwrap(),
            "10.0.0.1:443",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_lock_revokes_session() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::new());
    let app = app_with(service.clone(), dir.path());
    let token = token(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::delete("/api/access")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = submit(&app, &token, "Valorant", ("ace.mp4", b"bytes")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(service.instructions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_lock_without_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(Arc::new(StubRemote::new()), dir.path());

    let response = app
        .oneshot(Request::delete("/api/access").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Missing session token");
}

#[tokio::test]
async fn test_failed_processing_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::processing_then(AssetState::Failed));
    let coach = CoachConfig {
        poll_interval: Duration::from_millis(10),
        ..coach_config(dir.path())
    };
    let app = router(test_config(), service.clone(), &coach);
    let token = token(&app).await;

    let response = submit(&app, &token, "Valorant", ("clip.mp4", b"bytes")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "processing_failed");
    assert!(json["detail"].as_str().unwrap().contains("unsupported codec"));
    assert!(service.instructions.lock().unwrap().is_empty());
    assert_eq!(service.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_processing_timeout_is_gateway_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::processing_then(AssetState::Processing));
    let coach = CoachConfig {
        poll_interval: Duration::from_millis(10),
        max_poll_wait: Duration::from_millis(30),
        ..coach_config(dir.path())
    };
    let app = router(test_config(), service.clone(), &coach);
    let token = token(&app).await;

    let response = submit(&app, &token, "Valorant", ("clip.mp4", b"bytes")).await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body_json(response).await["code"], "timeout");
    assert_eq!(service.deleted.lock().unwrap().len(), 1);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_internal_detail_hidden_in_production() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        environment: "production".to_string(),
        ..test_config()
    };
    let service = Arc::new(StubRemote::generating(Generate::ConfigError));
    let app = router(config, service, &coach_config(dir.path()));
    let token = token(&app).await;

    let response = submit(&app, &token, "Valorant", ("clip.mp4", b"bytes")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["detail"], "An internal error occurred");
    assert_eq!(json["code"], "config");

    // Client errors keep their detail
    let response = submit(&app, &token, "Chess", ("clip.mp4", b"bytes")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["detail"].as_str().unwrap().contains("Chess"));
}

#[tokio::test]
async fn test_internal_detail_shown_in_development() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(StubRemote::generating(Generate::ConfigError));
    let app = app_with(service, dir.path());
    let token = token(&app).await;

    let response = submit(&app, &token, "Valorant", ("clip.mp4", b"bytes")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("model rejected the API key"));
}
