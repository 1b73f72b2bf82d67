//! `ApiClient` against a local stub of the dashboard API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

use folio::api::{ApiClient, TaskBackend};
use folio::config::Config;
use folio::error::FolioError;
use folio::session::{Session, SessionHandle};
use folio::types::{RecordId, User};

const FRESH_TOKEN: &str = "fresh-access";

/// How the stub answers `POST /auth/refresh`
#[derive(Debug, Clone, Copy)]
enum RefreshReply {
    Grant,
    Reject,
    /// Hands out a token the task endpoint still refuses
    GrantRevoked,
}

struct Stub {
    reply: RefreshReply,
    authorizations: Mutex<Vec<String>>,
    refresh_bodies: Mutex<Vec<Value>>,
}

impl Stub {
    fn authorizations(&self) -> Vec<String> {
        self.authorizations.lock().clone()
    }

    fn refresh_bodies(&self) -> Vec<Value> {
        self.refresh_bodies.lock().clone()
    }
}

async fn list_tasks(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.authorizations.lock().push(auth.clone());

    if auth == format!("Bearer {FRESH_TOKEN}") {
        let tasks = json!([{"id": 1, "title": "Write blog post", "status": "todo"}]);
        (StatusCode::OK, Json(tasks))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "jwt expired"})))
    }
}

async fn refresh(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.refresh_bodies.lock().push(body);
    match stub.reply {
        RefreshReply::Grant => (
            StatusCode::OK,
            Json(json!({"accessToken": FRESH_TOKEN, "refreshToken": "refresh-2"})),
        ),
        RefreshReply::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "refresh token revoked"})),
        ),
        RefreshReply::GrantRevoked => {
            (StatusCode::OK, Json(json!({"accessToken": "revoked-access"})))
        }
    }
}

async fn serve(reply: RefreshReply) -> (Arc<Stub>, String) {
    let stub = Arc::new(Stub {
        reply,
        authorizations: Mutex::new(Vec::new()),
        refresh_bodies: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/api/tasks", get(list_tasks))
        .route("/api/auth/refresh", post(refresh))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve stub") });

    (stub, format!("http://{addr}/api"))
}

fn signed_in() -> SessionHandle {
    let user = User {
        id: RecordId::Int(1),
        name: "Dana".to_string(),
        email: "dana@example.com".to_string(),
        role: Some("admin".to_string()),
    };
    SessionHandle::in_memory(Some(Session::new(
        "stale-access".to_string(),
        "refresh-1".to_string(),
        user,
    )))
}

fn client(api_url: String, session: &SessionHandle) -> ApiClient {
    let config = Config {
        api_url,
        ..Config::default()
    };
    ApiClient::from_config(&config, session.clone()).unwrap()
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_replayed_once() {
    let (stub, url) = serve(RefreshReply::Grant).await;
    let session = signed_in();

    let tasks = client(url, &session).list_tasks().await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Write blog post");
    assert_eq!(
        stub.authorizations(),
        vec!["Bearer stale-access".to_string(), format!("Bearer {FRESH_TOKEN}")]
    );
    assert_eq!(stub.refresh_bodies(), vec![json!({"refreshToken": "refresh-1"})]);
    assert_eq!(session.access_token().as_deref(), Some(FRESH_TOKEN));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_rejected_refresh_clears_session() {
    let (stub, url) = serve(RefreshReply::Reject).await;
    let session = signed_in();

    let err = client(url, &session).list_tasks().await.unwrap_err();

    assert!(matches!(err, FolioError::SessionExpired), "got {err:?}");
    assert!(!session.is_authenticated());
    assert_eq!(stub.refresh_bodies().len(), 1);
    // No replay after a failed refresh
    assert_eq!(stub.authorizations().len(), 1);
}

#[tokio::test]
async fn test_second_unauthorized_clears_session() {
    let (stub, url) = serve(RefreshReply::GrantRevoked).await;
    let session = signed_in();

    let err = client(url, &session).list_tasks().await.unwrap_err();

    assert!(matches!(err, FolioError::SessionExpired), "got {err:?}");
    assert!(!session.is_authenticated());
    assert_eq!(
        stub.authorizations(),
        vec![
            "Bearer stale-access".to_string(),
            "Bearer revoked-access".to_string()
        ]
    );
    assert_eq!(stub.refresh_bodies().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_without_session_does_not_refresh() {
    let (stub, url) = serve(RefreshReply::Grant).await;
    let session = SessionHandle::in_memory(None);

    let err = client(url, &session).list_tasks().await.unwrap_err();

    assert!(matches!(err, FolioError::NotAuthenticated), "got {err:?}");
    assert_eq!(stub.authorizations(), vec![String::new()]);
    assert!(stub.refresh_bodies().is_empty());
}
