#![allow(dead_code)]

//! Fake remote services for integration tests: a Firestore REST surface for
//! `users/{uid}` documents and the resume upload endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

pub const FORBIDDEN_UID: &str = "locked-out";

pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn write_session(dir: &Path, uid: &str, token: &str) -> std::path::PathBuf {
    let path = dir.join("session.json");
    std::fs::write(
        &path,
        json!({ "uid": uid, "email": "ada@example.com", "idToken": token }).to_string(),
    )
    .unwrap();
    path
}

// ── Firestore ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub uid: String,
    pub params: Vec<(String, String)>,
    pub body: Value,
}

impl PatchRequest {
    pub fn mask(&self) -> Vec<String> {
        self.params
            .iter()
            .filter(|(k, _)| k == "updateMask.fieldPaths")
            .map(|(_, v)| v.clone())
            .collect()
    }
}

#[derive(Default)]
pub struct FakeFirestore {
    /// Typed Firestore `fields` per uid.
    pub documents: Mutex<HashMap<String, Map<String, Value>>>,
    pub patches: Mutex<Vec<PatchRequest>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
}

impl FakeFirestore {
    pub async fn insert(&self, uid: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        self.documents.lock().await.insert(uid.to_string(), fields);
    }

    pub async fn fields(&self, uid: &str) -> Option<Map<String, Value>> {
        self.documents.lock().await.get(uid).cloned()
    }
}

type Db = Arc<FakeFirestore>;

fn firestore_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "error": { "code": status.as_u16(), "message": message, "status": "ERROR" }
        })),
    )
}

fn document_body(project: &str, uid: &str, fields: &Map<String, Value>) -> Value {
    json!({
        "name": format!("projects/{project}/databases/(default)/documents/users/{uid}"),
        "fields": fields,
        "createTime": "2024-05-01T10:00:00.000000Z",
        "updateTime": "2024-05-02T09:30:00.000000Z"
    })
}

async fn get_document(
    State(db): State<Db>,
    UrlPath((project, _database, uid)): UrlPath<(String, String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_auth(&db, &headers).await;
    if uid == FORBIDDEN_UID {
        return firestore_error(StatusCode::FORBIDDEN, "Missing or insufficient permissions.");
    }
    match db.documents.lock().await.get(&uid) {
        Some(fields) => (StatusCode::OK, Json(document_body(&project, &uid, fields))),
        None => firestore_error(StatusCode::NOT_FOUND, "Document not found."),
    }
}

async fn patch_document(
    State(db): State<Db>,
    UrlPath((project, _database, uid)): UrlPath<(String, String, String)>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_auth(&db, &headers).await;
    let request = PatchRequest {
        uid: uid.clone(),
        params,
        body,
    };
    db.patches.lock().await.push(request.clone());

    let must_exist = request
        .params
        .iter()
        .any(|(k, v)| k == "currentDocument.exists" && v == "true");
    let mut documents = db.documents.lock().await;
    if must_exist && !documents.contains_key(&uid) {
        return firestore_error(StatusCode::NOT_FOUND, "No document to update.");
    }

    let incoming = request.body["fields"].as_object().cloned().unwrap_or_default();
    let doc = documents.entry(uid.clone()).or_default();
    for path in request.mask() {
        match incoming.get(&path) {
            Some(value) => {
                doc.insert(path, value.clone());
            }
            None => {
                doc.remove(&path);
            }
        }
    }
    (StatusCode::OK, Json(document_body(&project, &uid, doc)))
}

async fn record_auth(db: &Db, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    db.auth_headers.lock().await.push(auth);
}

/// Starts a fake Firestore; returns its `.../v1` base URL.
pub async fn spawn_firestore(db: Db) -> String {
    let app = Router::new()
        .route(
            "/v1/projects/:project/databases/:database/documents/users/:uid",
            get(get_document).patch(patch_document),
        )
        .with_state(db);
    let addr = serve(app).await;
    format!("http://{addr}/v1")
}

// ── Upload endpoint ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceivedUpload {
    pub user_id: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Default)]
pub struct FakeUploadServer {
    pub received: Mutex<Vec<ReceivedUpload>>,
}

type Uploads = Arc<FakeUploadServer>;

async fn read_upload(mut multipart: Multipart) -> ReceivedUpload {
    let mut received = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                received.file_name = field.file_name().map(str::to_string);
                received.content_type = field.content_type().map(str::to_string);
                received.size = field.bytes().await.unwrap().len();
            }
            "userId" => received.user_id = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    received
}

async fn accept_upload(State(uploads): State<Uploads>, multipart: Multipart) -> Json<Value> {
    let received = read_upload(multipart).await;
    let url = format!(
        "https://files.example.com/{}/{}",
        received.user_id.clone().unwrap_or_default(),
        received.file_name.clone().unwrap_or_default()
    );
    uploads.received.lock().await.push(received);
    Json(json!({ "fileUrl": url }))
}

async fn fail_upload(State(uploads): State<Uploads>, multipart: Multipart) -> StatusCode {
    let received = read_upload(multipart).await;
    uploads.received.lock().await.push(received);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbled_upload(State(uploads): State<Uploads>, multipart: Multipart) -> &'static str {
    let received = read_upload(multipart).await;
    uploads.received.lock().await.push(received);
    "stored!"
}

/// Starts a fake upload service; returns its base URL. Routes:
/// `/upload-resume` (200 + fileUrl), `/broken` (500), `/garbled` (200, not JSON).
pub async fn spawn_uploads(uploads: Uploads) -> String {
    let app = Router::new()
        .route("/upload-resume", post(accept_upload))
        .route("/broken", post(fail_upload))
        .route("/garbled", post(garbled_upload))
        .with_state(uploads);
    let addr = serve(app).await;
    format!("http://{addr}")
}
