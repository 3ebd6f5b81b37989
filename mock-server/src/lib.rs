use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

const RESERVED_SHORT: &str = "manage";
const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 1000;
const RANDOM_SHORT_LEN: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortLink {
    pub id: u64,
    pub root_link: String,
    pub short_link: String,
    pub accesses: u64,
}

#[derive(Deserialize)]
pub struct LinkBody {
    #[serde(default)]
    pub root_link: String,
    #[serde(default)]
    pub short_link: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub total_entries: Option<String>,
}

#[derive(Default)]
struct Store {
    next_id: u64,
    links: BTreeMap<u64, ShortLink>,
}

impl Store {
    /// Lookup by numeric id first, then by short alias.
    fn find(&self, key: &str) -> Option<u64> {
        key.parse::<u64>()
            .ok()
            .filter(|id| self.links.contains_key(id))
            .or_else(|| {
                self.links
                    .values()
                    .find(|l| l.short_link == key)
                    .map(|l| l.id)
            })
    }

    fn short_taken(&self, short: &str) -> bool {
        self.links.values().any(|l| l.short_link == short)
    }
}

pub struct AppState {
    token: String,
    store: RwLock<Store>,
    sessions: RwLock<HashSet<String>>,
}

pub type Shared = Arc<AppState>;

/// JSON error body `{"code": ..., "message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "code": self.status.as_u16(), "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

pub fn app(token: &str) -> Router {
    let state: Shared = Arc::new(AppState {
        token: token.to_string(),
        store: RwLock::new(Store::default()),
        sessions: RwLock::new(HashSet::new()),
    });
    Router::new()
        .route("/api/login", post(login))
        .route("/api/shortlinks", get(list_links).post(create_link))
        .route(
            "/api/shortlinks/{id}",
            get(get_link).post(modify_link).delete(delete_link),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn basic_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

async fn require_auth(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let by_token = basic_token(headers) == Some(state.token.as_str());
    let by_session = match session_id(headers) {
        Some(id) => state.sessions.read().await.contains(&id),
        None => false,
    };
    if !(by_token || by_session) {
        return ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    next.run(request).await
}

async fn login(State(state): State<Shared>) -> Response {
    let session = Uuid::new_v4().simple().to_string();
    state.sessions.write().await.insert(session.clone());
    tracing::debug!("session created");
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly"))],
        Json(json!({})),
    )
        .into_response()
}

async fn list_links(
    State(state): State<Shared>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ApiError::bad_request("size must be in range (0, 1000]"));
    }

    let store = state.store.read().await;
    let results: Vec<ShortLink> = store
        .links
        .values()
        .skip(page.saturating_mul(size))
        .take(size)
        .cloned()
        .collect();

    let mut body = json!({ "n": results.len(), "results": results });
    if query.total_entries.is_some() {
        body["total"] = json!(store.links.len());
    }
    Ok(Json(body))
}

fn check_root(root: &str) -> Result<(), ApiError> {
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(())
    } else {
        Err(ApiError::bad_request("invalid root link"))
    }
}

fn check_short(short: &str) -> Result<(), ApiError> {
    let allowed = short
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if short.is_empty() || !allowed {
        return Err(ApiError::bad_request("invalid short link"));
    }
    if short == RESERVED_SHORT {
        return Err(ApiError::bad_request("short link is reserved"));
    }
    Ok(())
}

async fn create_link(
    State(state): State<Shared>,
    Json(input): Json<LinkBody>,
) -> Result<Json<ShortLink>, ApiError> {
    if input.root_link.is_empty() {
        return Err(ApiError::bad_request("invalid arguments"));
    }
    check_root(&input.root_link)?;

    let short = if input.short_link.is_empty() {
        Uuid::new_v4().simple().to_string()[..RANDOM_SHORT_LEN].to_string()
    } else {
        input.short_link
    };
    check_short(&short)?;

    let mut store = state.store.write().await;
    if store.short_taken(&short) {
        return Err(ApiError::bad_request("short link already exists"));
    }
    store.next_id += 1;
    let link = ShortLink {
        id: store.next_id,
        root_link: input.root_link,
        short_link: short,
        accesses: 0,
    };
    store.links.insert(link.id, link.clone());
    Ok(Json(link))
}

async fn get_link(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<ShortLink>, ApiError> {
    let store = state.store.read().await;
    store
        .find(&id)
        .and_then(|id| store.links.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

async fn modify_link(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<LinkBody>,
) -> Result<Json<ShortLink>, ApiError> {
    let mut store = state.store.write().await;
    let id = store.find(&id).ok_or_else(ApiError::not_found)?;
    let current = store.links[&id].clone();

    let short_changed = !input.short_link.is_empty() && input.short_link != current.short_link;
    let root_changed = !input.root_link.is_empty() && input.root_link != current.root_link;
    if short_changed && root_changed {
        return Err(ApiError::bad_request(
            "short and root link can not be updated at once",
        ));
    }

    if short_changed {
        check_short(&input.short_link)?;
        if store.short_taken(&input.short_link) {
            return Err(ApiError::bad_request("short link already exists"));
        }
    }
    if root_changed {
        check_root(&input.root_link)?;
    }

    let link = store.links.get_mut(&id).ok_or_else(ApiError::not_found)?;
    if short_changed {
        link.short_link = input.short_link;
    }
    if root_changed {
        link.root_link = input.root_link;
    }
    Ok(Json(link.clone()))
}

async fn delete_link(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    let id = store.find(&id).ok_or_else(ApiError::not_found)?;
    store.links.remove(&id);
    Ok(StatusCode::OK)
}
