use axum::{
    extract::{Path, State},
    http::Method,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use skillswap_core::input::parse_request_id;
use skillswap_core::{
    DirectoryQuery, Login, Marketplace, NewSwapRequest, ProfilePatch, Registration, Session,
    StatusUpdate,
};
use skillswap_shared::RequestId;
use skillswap_store::{Notification, SwapRequest, User};

use crate::error::ServerError;
use crate::extract::{ApiJson, ApiQuery, AuthUser};

#[derive(Clone)]
pub struct AppState {
    pub market: Marketplace,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/users", get(list_users))
        .route("/users/profile", get(get_profile).put(update_profile))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/status", put(update_request_status))
        .route("/notifications", get(list_notifications));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Marketplace calls hash passwords and hit SQLite, so they run on the
/// blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ServerError>
where
    F: FnOnce() -> skillswap_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(format!("worker task failed: {e}")))?
        .map_err(ServerError::from)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Serialize)]
struct UserResponse {
    user: User,
}

#[derive(Serialize)]
struct RequestsResponse {
    requests: Vec<SwapRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestCreatedResponse {
    request_id: RequestId,
}

#[derive(Serialize)]
struct RequestResponse {
    request: SwapRequest,
}

#[derive(Serialize)]
struct NotificationsResponse {
    notifications: Vec<Notification>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Registration>,
) -> Result<Json<Session>, ServerError> {
    let market = state.market;
    let session = blocking(move || market.identity.register(body)).await?;
    Ok(Json(session))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Login>,
) -> Result<Json<Session>, ServerError> {
    let market = state.market;
    let session = blocking(move || market.identity.login(body)).await?;
    Ok(Json(session))
}

async fn list_users(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiQuery(query): ApiQuery<DirectoryQuery>,
) -> Result<Json<UsersResponse>, ServerError> {
    let market = state.market;
    let users = blocking(move || market.directory.list_users(me.id, &query)).await?;
    Ok(Json(UsersResponse { users }))
}

async fn get_profile(AuthUser(me): AuthUser) -> Json<User> {
    Json(me)
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> Result<Json<UserResponse>, ServerError> {
    let market = state.market;
    let user = blocking(move || market.profiles.update_profile(me.id, patch)).await?;
    Ok(Json(UserResponse { user }))
}

async fn list_requests(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<RequestsResponse>, ServerError> {
    let market = state.market;
    let requests = blocking(move || market.requests.list_requests(me.id)).await?;
    Ok(Json(RequestsResponse { requests }))
}

async fn create_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    ApiJson(body): ApiJson<NewSwapRequest>,
) -> Result<Json<RequestCreatedResponse>, ServerError> {
    let market = state.market;
    let request = blocking(move || market.requests.create_request(&me, body)).await?;
    Ok(Json(RequestCreatedResponse {
        request_id: request.id,
    }))
}

async fn update_request_status(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<RequestResponse>, ServerError> {
    let market = state.market;
    let request = blocking(move || {
        // an invalid status is reported before an unknown id
        body.decision()?;
        let id = parse_request_id(&id)?;
        market.requests.transition_status(id, &me, body)
    })
    .await?;
    Ok(Json(RequestResponse { request }))
}

async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<NotificationsResponse>, ServerError> {
    let market = state.market;
    let notifications = blocking(move || market.notifications.list_notifications(me.id)).await?;
    Ok(Json(NotificationsResponse { notifications }))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
