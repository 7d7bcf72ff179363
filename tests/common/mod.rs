#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use ayon_client_rust::client::{MemoryTokenStore, TokenStore};
use ayon_client_rust::{AyonClient, AyonClientBuilder, Credentials};

pub const PROJECT: &str = "demo";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

type Records = BTreeMap<String, Map<String, Value>>;

/// In-memory stand-in for the AYON REST API
#[derive(Default)]
pub struct FakeState {
    pub logins: AtomicUsize,
    pub requests: AtomicUsize,
    reject_next: AtomicUsize,
    forbid_next: AtomicUsize,
    fail_next: AtomicUsize,
    broken_login: AtomicBool,
    empty_creates: AtomicBool,
    fixed_token: Mutex<Option<String>>,
    issued: Mutex<HashSet<String>>,
    last_authorization: Mutex<Option<String>>,
    accounts: Mutex<BTreeMap<String, String>>,
    projects: Mutex<Records>,
    collections: Mutex<BTreeMap<(String, String), Records>>,
    users: Mutex<Vec<Value>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeState {
    fn seeded() -> Self {
        let state = Self::default();
        lock(&state.accounts).insert(USERNAME.to_string(), PASSWORD.to_string());
        lock(&state.accounts).insert("u".to_string(), "p".to_string());

        let mut project = Map::new();
        project.insert("name".to_string(), json!(PROJECT));
        project.insert("code".to_string(), json!("dm"));
        project.insert("active".to_string(), json!(true));
        lock(&state.projects).insert(PROJECT.to_string(), project);

        *lock(&state.users) = vec![
            json!({"name": "admin", "active": true, "attrib": {"fullName": "Admin"}}),
            json!({"name": "ana", "active": true, "attrib": {"fullName": "Ana Lima"}, "accessGroups": {"demo": ["artist"]}}),
            json!({"name": "bo", "active": false}),
        ];
        state
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Answer the next `n` authenticated requests with 401
    pub fn reject_next(&self, n: usize) {
        self.reject_next.store(n, Ordering::SeqCst);
    }

    /// Answer the next `n` authenticated requests with 403
    pub fn forbid_next(&self, n: usize) {
        self.forbid_next.store(n, Ordering::SeqCst);
    }

    /// Answer the next `n` authenticated requests with 500
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Return 200 from login without a token
    pub fn break_login(&self) {
        self.broken_login.store(true, Ordering::SeqCst);
    }

    /// Answer creates with 201 and no body
    pub fn answer_creates_empty(&self) {
        self.empty_creates.store(true, Ordering::SeqCst);
    }

    fn creates_empty(&self) -> bool {
        self.empty_creates.load(Ordering::SeqCst)
    }

    /// Issue this exact token on every login
    pub fn issue_token(&self, token: &str) {
        *lock(&self.fixed_token) = Some(token.to_string());
    }

    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.last_authorization).clone()
    }

    pub fn project(&self, name: &str) -> Option<Value> {
        lock(&self.projects).get(name).cloned().map(Value::Object)
    }

    fn take_one(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *lock(&self.last_authorization) = authorization.clone();

        if Self::take_one(&self.reject_next) {
            return Err(detail(StatusCode::UNAUTHORIZED, "Token expired"));
        }
        if Self::take_one(&self.forbid_next) {
            return Err(detail(StatusCode::FORBIDDEN, "Forbidden"));
        }
        if Self::take_one(&self.fail_next) {
            return Err(detail(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
        }

        let token = authorization.as_deref().and_then(|h| h.strip_prefix("Bearer "));
        match token {
            Some(token) if lock(&self.issued).contains(token) => Ok(()),
            _ => Err(detail(StatusCode::UNAUTHORIZED, "Not logged in")),
        }
    }
}

type Shared = Arc<FakeState>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn known_collection(collection: &str) -> bool {
    matches!(collection, "folders" | "products" | "tasks")
}

fn matches_params(record: &Map<String, Value>, params: &[(String, String)]) -> bool {
    let assignees: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "assignees")
        .map(|(_, v)| v.as_str())
        .collect();
    if !assignees.is_empty() {
        let assigned = record
            .get("assignees")
            .and_then(Value::as_array)
            .is_some_and(|list| list.iter().any(|a| a.as_str().is_some_and(|a| assignees.contains(&a))));
        if !assigned {
            return false;
        }
    }

    params
        .iter()
        .filter(|(k, _)| k != "assignees" && k != "force")
        .all(|(k, v)| record.get(k).and_then(Value::as_str) == Some(v.as_str()))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.logins.fetch_add(1, Ordering::SeqCst);
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let valid = lock(&state.accounts).get(name).is_some_and(|p| p == password);
    if !valid {
        return detail(StatusCode::UNAUTHORIZED, "Invalid login credentials");
    }
    if state.broken_login.load(Ordering::SeqCst) {
        return Json(json!({ "detail": "Logged in" })).into_response();
    }

    let token = lock(&state.fixed_token)
        .clone()
        .unwrap_or_else(|| format!("token-{}", state.login_count()));
    lock(&state.issued).insert(token.clone());
    Json(json!({ "token": token, "user": { "name": name } })).into_response()
}

async fn list_projects(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let projects: Vec<Value> = lock(&state.projects).values().cloned().map(Value::Object).collect();
    Json(json!({ "projects": projects })).into_response()
}

async fn get_project(
    State(state): State<Shared>,
    Path(project): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    match lock(&state.projects).get(&project) {
        Some(record) => Json(Value::Object(record.clone())).into_response(),
        None => detail(StatusCode::NOT_FOUND, &format!("Project {} not found", project)),
    }
}

async fn put_project(
    State(state): State<Shared>,
    Path(project): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let Value::Object(record) = body.clone() else {
        return detail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    let mut projects = lock(&state.projects);
    let existed = projects.insert(project, record).is_some();
    if existed {
        StatusCode::NO_CONTENT.into_response()
    } else if state.creates_empty() {
        StatusCode::CREATED.into_response()
    } else {
        (StatusCode::CREATED, Json(body)).into_response()
    }
}

async fn delete_project(
    State(state): State<Shared>,
    Path(project): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    match lock(&state.projects).remove(&project) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => detail(StatusCode::NOT_FOUND, &format!("Project {} not found", project)),
    }
}

async fn list_entities(
    State(state): State<Shared>,
    Path((project, collection)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    if !known_collection(&collection) || !lock(&state.projects).contains_key(&project) {
        return detail(StatusCode::NOT_FOUND, "Not found");
    }

    let records: Vec<Value> = lock(&state.collections)
        .get(&(project, collection.clone()))
        .map(|records| {
            records
                .values()
                .filter(|r| matches_params(r, &params))
                .cloned()
                .map(Value::Object)
                .collect()
        })
        .unwrap_or_default();

    // Folders come wrapped, the others as a bare array
    if collection == "folders" {
        Json(json!({ "folders": records })).into_response()
    } else {
        Json(Value::Array(records)).into_response()
    }
}

async fn create_entity(
    State(state): State<Shared>,
    Path((project, collection)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    if !known_collection(&collection) || !lock(&state.projects).contains_key(&project) {
        return detail(StatusCode::NOT_FOUND, "Not found");
    }
    let Value::Object(mut record) = body else {
        return detail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    let id = uuid::Uuid::new_v4().simple().to_string();
    record.insert("id".to_string(), json!(id));
    lock(&state.collections)
        .entry((project, collection))
        .or_default()
        .insert(id, record.clone());
    if state.creates_empty() {
        return StatusCode::CREATED.into_response();
    }
    (StatusCode::CREATED, Json(Value::Object(record))).into_response()
}

async fn get_entity(
    State(state): State<Shared>,
    Path((project, collection, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let record = lock(&state.collections)
        .get(&(project, collection))
        .and_then(|records| records.get(&id).cloned());
    match record {
        Some(record) => Json(Value::Object(record)).into_response(),
        None => detail(StatusCode::NOT_FOUND, &format!("Entity {} not found", id)),
    }
}

async fn replace_entity(
    State(state): State<Shared>,
    Path((project, collection, id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let Value::Object(mut replacement) = body else {
        return detail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    let mut collections = lock(&state.collections);
    match collections.get_mut(&(project, collection)).and_then(|r| r.get_mut(&id)) {
        Some(record) => {
            replacement.insert("id".to_string(), json!(id));
            *record = replacement;
            StatusCode::NO_CONTENT.into_response()
        }
        None => detail(StatusCode::NOT_FOUND, &format!("Entity {} not found", id)),
    }
}

async fn patch_entity(
    State(state): State<Shared>,
    Path((project, collection, id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let Value::Object(changes) = body else {
        return detail(StatusCode::BAD_REQUEST, "Expected an object");
    };

    let mut collections = lock(&state.collections);
    match collections.get_mut(&(project, collection)).and_then(|r| r.get_mut(&id)) {
        Some(record) => {
            record.extend(changes);
            Json(Value::Object(record.clone())).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, &format!("Entity {} not found", id)),
    }
}

async fn delete_entity(
    State(state): State<Shared>,
    Path((project, collection, id)): Path<(String, String, String)>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let force = params.iter().any(|(k, v)| k == "force" && v == "true");

    let mut collections = lock(&state.collections);
    let Some(records) = collections.get_mut(&(project, collection.clone())) else {
        return detail(StatusCode::NOT_FOUND, &format!("Entity {} not found", id));
    };
    if !records.contains_key(&id) {
        return detail(StatusCode::NOT_FOUND, &format!("Entity {} not found", id));
    }

    if collection == "folders" {
        let children: Vec<String> = records
            .iter()
            .filter(|(_, r)| r.get("parent_id").and_then(Value::as_str) == Some(id.as_str()))
            .map(|(child, _)| child.clone())
            .collect();
        if !children.is_empty() && !force {
            return detail(StatusCode::CONFLICT, "Folder has children");
        }
        for child in children {
            records.remove(&child);
        }
    }

    records.remove(&id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_users(
    State(state): State<Shared>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let wanted: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "userNames")
        .map(|(_, v)| v.as_str())
        .collect();
    let users: Vec<Value> = lock(&state.users)
        .iter()
        .filter(|u| {
            wanted.is_empty() || u.get("name").and_then(Value::as_str).is_some_and(|n| wanted.contains(&n))
        })
        .cloned()
        .collect();
    Json(Value::Array(users)).into_response()
}

async fn get_user(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let user = lock(&state.users)
        .iter()
        .find(|u| u.get("name").and_then(Value::as_str) == Some(name.as_str()))
        .cloned();
    match user {
        Some(user) => Json(user).into_response(),
        None => detail(StatusCode::NOT_FOUND, &format!("User {} not found", name)),
    }
}

async fn graphql(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(rejected) = state.authorize(&headers) {
        return rejected;
    }
    let query = body.get("query").and_then(Value::as_str).unwrap_or_default();
    if query.contains("boom") {
        return Json(json!({
            "data": null,
            "errors": [
                { "message": "Cannot query field \"boom\"" },
                { "message": "Unknown argument" }
            ]
        }))
        .into_response();
    }

    let projects: Vec<Value> = lock(&state.projects)
        .keys()
        .map(|name| json!({ "node": { "name": name } }))
        .collect();
    Json(json!({
        "data": {
            "projects": { "edges": projects },
            "variables": body.get("variables").cloned().unwrap_or(Value::Null)
        }
    }))
    .into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/projects", get(list_projects))
        .route(
            "/api/projects/:project",
            get(get_project).put(put_project).delete(delete_project),
        )
        .route(
            "/api/projects/:project/:collection",
            get(list_entities).post(create_entity),
        )
        .route(
            "/api/projects/:project/:collection/:id",
            get(get_entity)
                .put(replace_entity)
                .patch(patch_entity)
                .delete(delete_entity),
        )
        .route("/api/users", get(list_users))
        .route("/api/users/:name", get(get_user))
        .route("/api/graphql", post(graphql))
        .with_state(state)
}

pub struct FakeAyon {
    pub base_url: String,
    pub state: Shared,
}

impl FakeAyon {
    /// Client logging in as the default account with its own token store
    pub fn client(&self) -> Result<AyonClient> {
        self.client_as(Credentials::password(USERNAME, PASSWORD), Arc::new(MemoryTokenStore::new()))
    }

    pub fn client_as(&self, credentials: Credentials, store: Arc<dyn TokenStore>) -> Result<AyonClient> {
        self.builder(credentials, store)
            .build()
            .context("failed to build client")
    }

    /// Builder with test timeouts, for clients that need more settings
    pub fn builder(&self, credentials: Credentials, store: Arc<dyn TokenStore>) -> AyonClientBuilder {
        AyonClient::builder(self.base_url.clone())
            .credentials(credentials)
            .token_store(store)
            .connect_timeout(Duration::from_secs(2))
            .request_timeout(Duration::from_secs(5))
    }
}

/// Start a fresh fake server on an unused port
pub async fn spawn_server() -> Result<FakeAyon> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind fake AYON server")?;

    let state = Arc::new(FakeState::seeded());
    let app = router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(FakeAyon {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    })
}

/// Base URL on which nothing listens
pub fn dead_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}/api", port))
}
