use axum::{
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::session_controller::SessionController;
use crate::dto::api_response::ApiResponse;
use crate::dto::session_dto::{
    CreateSessionRequest, ScheduleRequest, ScheduleSummary, SessionFilters, SessionResponse,
    UpdateSessionRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_session_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/", get(list_sessions))
        .route("/schedule", post(create_schedule))
        .route("/:id", get(get_session))
        .route("/:id", put(update_session))
        .route("/:id", delete(delete_session))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(filters): Query<SessionFilters>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn update_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    let response = controller.update(id, &user, request).await?;
    Ok(Json(response))
}

async fn delete_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    controller.delete(id, &user).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Sesión eliminada exitosamente"
    })))
}

async fn create_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ApiResponse<ScheduleSummary>>, AppError> {
    let controller = SessionController::new(state.pool.clone());
    let response = controller.create_schedule(&user, request).await?;
    Ok(Json(response))
}
