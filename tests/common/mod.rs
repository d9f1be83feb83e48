use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use neona_tui::remote::{ClientConfig, DaemonClient};

type Shared = Arc<Mutex<DaemonState>>;
type Reply = Result<Json<Value>, (StatusCode, String)>;

/// What the fake daemon knows. Records are kept as raw JSON so tests can seed partial or
/// odd-looking objects.
pub struct DaemonState {
    pub healthy: bool,
    pub tasks: Vec<Value>,
    pub runs: HashMap<String, Vec<Value>>,
    pub memory: Vec<Value>,
    /// `METHOD path?query` of every request, in arrival order.
    pub requests: Vec<String>,
    next_id: u64,
}

impl Default for DaemonState {
    fn default() -> Self {
        Self {
            healthy: true,
            tasks: Vec::new(),
            runs: HashMap::new(),
            memory: Vec::new(),
            requests: Vec::new(),
            next_id: 1,
        }
    }
}

impl DaemonState {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{:04}-0000-4000-8000-000000000000", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Value, (StatusCode, String)> {
        self.tasks
            .iter_mut()
            .find(|t| t["id"] == id)
            .ok_or_else(|| (StatusCode::NOT_FOUND, "task not found".to_string()))
    }
}

/// An in-process daemon on `127.0.0.1:<random port>`. Stops when dropped.
pub struct FakeDaemon {
    pub base_url: String,
    state: Shared,
    _runtime: tokio::runtime::Runtime,
}

impl FakeDaemon {
    pub fn start() -> Result<Self> {
        let state: Shared = Arc::new(Mutex::new(DaemonState::default()));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .context("build fake daemon runtime")?;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("set listener nonblocking")?;
        let addr = listener.local_addr().context("read listener local addr")?;

        let app = router(state.clone());
        {
            let _enter = runtime.enter();
            let listener =
                tokio::net::TcpListener::from_std(listener).context("adopt fake daemon listener")?;
            runtime.spawn(async move {
                let _ = axum::serve(listener, app).await;
            });
        }

        Ok(Self {
            base_url: format!("http://{}", addr),
            state,
            _runtime: runtime,
        })
    }

    pub fn state(&self) -> MutexGuard<'_, DaemonState> {
        self.state.lock().expect("daemon state lock")
    }

    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state().healthy = healthy;
    }

    pub fn seed_task(&self, title: &str, status: &str, claimed_by: &str) -> String {
        let mut state = self.state();
        let id = state.next_id("task");
        state.tasks.push(json!({
            "id": id,
            "title": title,
            "description": "",
            "status": status,
            "claimed_by": claimed_by,
            "created_at": "2026-01-25T10:00:00Z",
            "updated_at": "2026-01-25T10:05:00Z",
        }));
        id
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    pub fn client(&self) -> Result<DaemonClient> {
        DaemonClient::new(&self.config())
    }
}

/// A base URL that nothing listens on.
pub fn unreachable_base_url() -> Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind probe port")?;
    let addr = listener.local_addr().context("read probe addr")?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", get(get_task))
        .route("/tasks/:id/claim", post(claim_task))
        .route("/tasks/:id/release", post(release_task))
        .route("/tasks/:id/run", post(run_task))
        .route("/tasks/:id/logs", get(task_logs))
        .route("/tasks/:id/memory", get(task_memory))
        .route("/memory", get(query_memory).post(add_memory))
        .route("/workers", get(workers))
        .with_state(state)
}

fn lock<'a>(state: &'a Shared, request: String) -> MutexGuard<'a, DaemonState> {
    let mut guard = state.lock().expect("daemon state lock");
    guard.requests.push(request);
    guard
}

fn query_suffix(params: &HashMap<String, String>) -> String {
    let mut pairs = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>();
    pairs.sort();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Go-style list encoding: an empty list is `null`.
fn list(items: Vec<Value>) -> Json<Value> {
    if items.is_empty() {
        Json(Value::Null)
    } else {
        Json(Value::Array(items))
    }
}

fn conflict(msg: String) -> (StatusCode, String) {
    (StatusCode::CONFLICT, msg)
}

fn str_field<'a>(v: &'a Value, key: &str) -> &'a str {
    v[key].as_str().unwrap_or("")
}

async fn health(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let state = lock(&state, "GET /health".to_string());
    if state.healthy {
        (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "db": "neona.db",
                "version": "0.3.0",
                "time": "2026-01-25T10:10:00Z",
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "db": "locked" })),
        )
    }
}

async fn list_tasks(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = lock(&state, format!("GET /tasks{}", query_suffix(&params)));
    let wanted = params.get("status").map(String::as_str).unwrap_or("");
    let tasks = state
        .tasks
        .iter()
        .filter(|t| wanted.is_empty() || t["status"] == wanted)
        .map(|t| {
            let mut summary = serde_json::Map::new();
            for key in ["id", "title", "status", "claimed_by"] {
                if let Some(v) = t.get(key) {
                    summary.insert(key.to_string(), v.clone());
                }
            }
            Value::Object(summary)
        })
        .collect();
    list(tasks)
}

async fn get_task(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut state = lock(&state, format!("GET /tasks/{}", id));
    Ok(Json(state.task_mut(&id)?.clone()))
}

async fn create_task(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state, "POST /tasks".to_string());
    let title = str_field(&body, "title").to_string();
    if title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "title is required".to_string()));
    }
    let id = state.next_id("task");
    state.tasks.push(json!({
        "id": id,
        "title": title,
        "description": str_field(&body, "description"),
        "status": "pending",
        "claimed_by": null,
        "created_at": "2026-01-25T10:00:00Z",
        "updated_at": "2026-01-25T10:00:00Z",
    }));
    Ok(Json(json!({ "id": id })))
}

async fn claim_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = lock(&state, format!("POST /tasks/{}/claim", id));
    let holder = str_field(&body, "holder_id").to_string();
    let ttl = body["ttl_sec"].as_u64().unwrap_or(0);
    let task = state.task_mut(&id)?;
    let current = str_field(task, "claimed_by").to_string();
    if !current.is_empty() && current != holder {
        return Err(conflict(format!("task already claimed by {}", current)));
    }
    task["claimed_by"] = json!(holder);
    task["status"] = json!("claimed");
    Ok(Json(json!({
        "task_id": id,
        "holder_id": holder,
        "ttl_sec": ttl,
    })))
}

async fn release_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut state = lock(&state, format!("POST /tasks/{}/release", id));
    let holder = str_field(&body, "holder_id").to_string();
    let task = state.task_mut(&id)?;
    if str_field(task, "claimed_by") != holder {
        return Err(conflict("lease not held".to_string()));
    }
    task["claimed_by"] = json!("");
    task["status"] = json!("pending");
    Ok(StatusCode::NO_CONTENT)
}

async fn run_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = lock(&state, format!("POST /tasks/{}/run", id));
    let holder = str_field(&body, "holder_id").to_string();
    let command = str_field(&body, "command").to_string();
    let args = body["args"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let task = state.task_mut(&id)?;
    if str_field(task, "claimed_by") != holder {
        return Err(conflict("lease not held".to_string()));
    }

    let run_id = state.next_id("run");
    let run = if command == "false" {
        json!({ "id": run_id, "command": command, "exit_code": 1, "stdout": "", "stderr": "command failed\n" })
    } else {
        json!({ "id": run_id, "command": command, "exit_code": 0, "stdout": format!("{} {}", command, args).trim(), "stderr": "" })
    };
    state.runs.entry(id).or_default().push(run.clone());
    Ok(Json(run))
}

async fn task_logs(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut state = lock(&state, format!("GET /tasks/{}/logs", id));
    state.task_mut(&id)?;
    Ok(list(state.runs.get(&id).cloned().unwrap_or_default()))
}

async fn task_memory(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let state = lock(&state, format!("GET /tasks/{}/memory", id));
    Ok(list(
        state
            .memory
            .iter()
            .filter(|m| m["task_id"] == id.as_str())
            .cloned()
            .collect(),
    ))
}

async fn add_memory(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = lock(&state, "POST /memory".to_string());
    let content = str_field(&body, "content").to_string();
    if content.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "content is required".to_string()));
    }
    let id = state.next_id("mem");
    let item = json!({
        "id": id,
        "content": content,
        "tags": str_field(&body, "tags"),
        "task_id": str_field(&body, "task_id"),
    });
    state.memory.push(item.clone());
    Ok(Json(item))
}

async fn query_memory(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = lock(&state, format!("GET /memory{}", query_suffix(&params)));
    let q = params.get("q").cloned().unwrap_or_default();
    list(
        state
            .memory
            .iter()
            .filter(|m| str_field(m, "content").contains(q.as_str()))
            .cloned()
            .collect(),
    )
}

async fn workers(State(state): State<Shared>) -> Json<Value> {
    let _state = lock(&state, "GET /workers".to_string());
    Json(json!({
        "active_workers": 1,
        "global_max": 4,
        "connector_counts": { "local": 1 },
        "workers": null,
    }))
}
