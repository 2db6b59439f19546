use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use boutique_core::{
    compile, normalize_filters, plan_reply, AppConfig, CategoryResolver, ChatSession,
    CompileOptions, FilterPayload, MessageRole, QueryPlan, ReplyMeta, SessionStore, StoreError,
    DEFAULT_PAGE_SIZE,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::categories::StaticCategoryResolver;
use crate::session::InMemorySessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub categories: Arc<dyn CategoryResolver>,
    pub known_brands: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            categories: Arc::new(StaticCategoryResolver::with_default_catalog()),
            known_brands: Arc::new(config.catalog.known_brands.clone()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/message", post(post_message))
        .route("/products", get(products_plan))
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            ApiError::Store(error) => {
                tracing::error!(
                    event_name = "system.store.error",
                    error = %error,
                    "session store failure"
                );
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The service is temporarily unavailable. Please retry shortly.",
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionCreated {
    pub id: String,
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionCreated>, ApiError> {
    let session = ChatSession::new(uuid::Uuid::new_v4().to_string());
    let id = session.id.clone();
    state.sessions.put(session).await?;

    tracing::info!(event_name = "chat.session.created", session_id = %id, "chat session created");
    Ok(Json(SessionCreated { id }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatSession>, ApiError> {
    state.sessions.get(&id).await?.map(Json).ok_or(ApiError::NotFound)
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    /// Client-held filters; when present they take precedence over the
    /// stored session state for this turn.
    #[serde(default)]
    pub current_filters: Option<FilterPayload>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub filters: FilterPayload,
    pub apply_filters: bool,
    pub meta: ReplyMeta,
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Sessions materialize on first message; callers may also run stateless
    // by sending their own current_filters each turn.
    let mut session =
        state.sessions.get(&id).await?.unwrap_or_else(|| ChatSession::new(id.clone()));
    let prior =
        request.current_filters.clone().unwrap_or_else(|| session.active_filters.clone());

    let plan = plan_reply(&request.text, &prior, &state.known_brands);

    session.record(MessageRole::User, request.text.as_str());
    session.record(MessageRole::Assistant, plan.message.as_str());
    session.active_filters = plan.filters.clone();
    state.sessions.put(session).await?;

    tracing::debug!(
        event_name = "chat.turn.planned",
        session_id = %id,
        apply_filters = plan.apply_filters,
        cleared = plan.meta.cleared,
        "planned assistant reply"
    );

    Ok(Json(MessageResponse {
        message: plan.message,
        filters: plan.filters,
        apply_filters: plan.apply_filters,
        meta: plan.meta,
    }))
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductPlanResponse {
    pub filters: FilterPayload,
    pub plan: QueryPlan,
    pub page: u32,
    pub limit: u32,
}

/// Compile the query plan for a product listing request. Category names are
/// resolved to identifiers first; execution belongs to the external store.
pub async fn products_plan(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ProductPlanResponse>, ApiError> {
    let input = query_pairs_to_value(&params);
    let mut filters = normalize_filters(&input);

    if let Some(names) = filters.include_categories.take() {
        let resolved = state.categories.resolve(&names).await?;
        if !resolved.is_empty() {
            let mut ids = filters.category_ids.take().unwrap_or_default();
            for id in resolved {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            filters.category_ids = Some(ids);
        }
    }

    let project_fields = params
        .iter()
        .find(|(key, _)| key == "fields")
        .map(|(_, value)| {
            value
                .split(',')
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|fields| !fields.is_empty());

    let plan = compile(&filters, &CompileOptions { project_fields });
    let page = filters.page.unwrap_or(1);
    let limit = filters.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    Ok(Json(ProductPlanResponse { filters, plan, page, limit }))
}

/// Rebuild a JSON object from query pairs, turning repeated keys into
/// arrays so `normalize_filters` sees the same shape either way.
fn query_pairs_to_value(pairs: &[(String, String)]) -> Value {
    let mut object = serde_json::Map::new();
    for (key, value) in pairs {
        match object.get_mut(key) {
            None => {
                object.insert(key.clone(), Value::String(value.clone()));
            }
            Some(Value::Array(items)) => items.push(Value::String(value.clone())),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value.clone())]);
            }
        }
    }
    Value::Object(object)
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub session_store: HealthCheck,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let session_store = match state.sessions.get("health-probe").await {
        Ok(_) => HealthCheck { status: "ready", detail: "session store reachable".to_string() },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("session store failure: {error}"),
        },
    };
    let ready = session_store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "boutique-server runtime initialized".to_string(),
        },
        session_store,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
