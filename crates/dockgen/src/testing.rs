//! In-process stand-in for the agent service, used by the shell tests.
//!
//! Serves the thread / message / run endpoints on a random local port,
//! records every request, and replays a scripted sequence of run statuses.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dockgen_core::config::{Credential, FoundryConfig};
use serde_json::{json, Value};

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    requests: Vec<RecordedRequest>,
    statuses: VecDeque<String>,
    last_status: Option<String>,
    run_extra: Value,
    messages: Value,
    failures: HashMap<String, (u16, Value)>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockAgent {
    pub base_url: String,
    state: Shared,
}

impl MockAgent {
    /// Start a mock whose runs complete on the first poll and whose thread
    /// holds one assistant reply `FROM scratch`.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            statuses: VecDeque::from(vec!["completed".to_string()]),
            run_extra: json!({}),
            messages: json!({
                "data": [
                    {"role": "assistant", "content": [{"type": "text", "text": {"value": "FROM scratch"}}]},
                    {"role": "user", "content": [{"type": "text", "text": {"value": "prompt"}}]}
                ]
            }),
            ..Default::default()
        }));

        let app = axum::Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockAgent {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Statuses returned by successive run polls. The last one repeats.
    pub fn script_statuses(&self, statuses: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.statuses = statuses.iter().map(|s| s.to_string()).collect();
        state.last_status = None;
    }

    /// Extra fields merged into every polled run object.
    pub fn set_run_extra(&self, extra: Value) {
        self.state.lock().unwrap().run_extra = extra;
    }

    /// Response body of the message listing.
    pub fn set_messages(&self, messages: Value) {
        self.state.lock().unwrap().messages = messages;
    }

    /// Answer every request to `path` with `status` and `body`.
    pub fn fail_path(&self, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(path.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn run_polls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == Method::GET && r.path.contains("/runs/"))
            .count()
    }
}

/// Configuration pointing at the mock.
pub fn config_for(mock: &MockAgent, credential: Credential) -> FoundryConfig {
    FoundryConfig {
        endpoint: mock.base_url.clone(),
        api_version: "2024-05-01-preview".to_string(),
        agent_id: "asst_test".to_string(),
        credential,
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let mut state = state.lock().unwrap();

    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        api_key: header(&headers, "api-key"),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    if let Some((status, body)) = state.failures.get(&path) {
        let status = StatusCode::from_u16(*status).unwrap();
        return (status, Json(body.clone())).into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let body = match (method, segments.as_slice()) {
        (Method::POST, ["threads"]) => json!({"id": "t1", "object": "thread"}),
        (Method::POST, ["threads", thread, "messages"]) => {
            json!({"id": "m1", "object": "thread.message", "thread_id": thread})
        }
        (Method::POST, ["threads", thread, "runs"]) => {
            json!({"id": "r1", "object": "thread.run", "thread_id": thread, "status": "queued"})
        }
        (Method::GET, ["threads", thread, "runs", run]) => {
            let status = match state.statuses.pop_front() {
                Some(status) => status,
                None => state.last_status.clone().unwrap_or_default(),
            };
            state.last_status = Some(status.clone());

            let mut run = json!({"id": run, "thread_id": thread, "status": status});
            if let (Some(run), Some(extra)) = (run.as_object_mut(), state.run_extra.as_object()) {
                run.extend(extra.clone());
            }
            run
        }
        (Method::GET, ["threads", _, "messages"]) => state.messages.clone(),
        _ => return (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    };

    Json(body).into_response()
}
