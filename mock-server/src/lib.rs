use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Sample `/ios/searches.json` response served on the happy path.
pub const FIXTURE: &str = include_str!("../../fixtures/keyword_search.json");

pub const API_KEY_HEADER: &str = "x-apptweak-key";
pub const SEARCH_PATH: &str = "/ios/searches.json";

/// What the search endpoint answers once the API key has been accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The fixture, with the received parameters echoed into its metadata.
    Fixture,
    /// An error payload with this status code.
    Status(u16),
    /// A 200 whose body is truncated JSON.
    Malformed,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub token: String,
    pub reply: Reply,
}

impl MockConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            reply: Reply::Fixture,
        }
    }

    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.reply = reply;
        self
    }
}

/// A request as seen by the mock, for assertions in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
}

pub type Recorder = Arc<RwLock<Vec<RecordedRequest>>>;

#[derive(Clone)]
struct AppState {
    config: Arc<MockConfig>,
    recorder: Recorder,
}

pub fn app(config: MockConfig) -> (Router, Recorder) {
    let recorder: Recorder = Arc::new(RwLock::new(Vec::new()));
    let state = AppState {
        config: Arc::new(config),
        recorder: recorder.clone(),
    };
    let router = Router::new()
        .route(SEARCH_PATH, get(search))
        .with_state(state);
    (router, recorder)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn search(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    info!(path = uri.path(), term = ?query.get("term"), "search request");

    state.recorder.write().await.push(RecordedRequest {
        path: uri.path().to_string(),
        query: query.clone(),
        api_key: api_key.clone(),
    });

    if api_key.as_deref() != Some(state.config.token.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid or missing API key" })),
        )
            .into_response();
    }

    match state.config.reply {
        Reply::Fixture => match echo_params(&query) {
            Ok(body) => Json(body).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        },
        Reply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": status.to_string() }))).into_response()
        }
        Reply::Malformed => (
            [(header::CONTENT_TYPE, "application/json")],
            truncated(FIXTURE),
        )
            .into_response(),
    }
}

/// First half of `body` by bytes, which never parses as a complete JSON value.
pub fn truncated(body: &str) -> Vec<u8> {
    body.as_bytes()[..body.len() / 2].to_vec()
}

/// The fixture with `metadata.request.params` replaced by the received
/// parameters, falling back to the API defaults for absent ones.
pub fn echo_params(query: &HashMap<String, String>) -> Result<Value, serde_json::Error> {
    let mut body: Value = serde_json::from_str(FIXTURE)?;
    let param = |key: &str, default: &str| {
        query
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };
    let num = param("num", "100");
    let num = num.parse::<u64>().map(Value::from).unwrap_or(Value::String(num));

    body["metadata"]["request"]["path"] = json!(SEARCH_PATH);
    body["metadata"]["request"]["params"] = json!({
        "term": query.get("term"),
        "num": num,
        "country": param("country", "us"),
        "language": param("language", "us"),
        "device": param("device", "iphone"),
    });
    Ok(body)
}
