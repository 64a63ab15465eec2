use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::track_controller::TrackController;
use crate::dto::api_response::ApiResponse;
use crate::dto::track_dto::{CreateTrackRequest, TrackResponse, UpdateTrackRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_track_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_track))
        .route("/", post(create_track))
        .route("/", put(update_track))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn get_track(State(state): State<AppState>) -> Result<Json<TrackResponse>, AppError> {
    let controller = TrackController::new(state.pool.clone());
    let response = controller.get().await?;
    Ok(Json(response))
}

async fn create_track(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTrackRequest>,
) -> Result<Json<ApiResponse<TrackResponse>>, AppError> {
    let controller = TrackController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_track(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateTrackRequest>,
) -> Result<Json<ApiResponse<TrackResponse>>, AppError> {
    let controller = TrackController::new(state.pool.clone());
    let response = controller.update(&user, request).await?;
    Ok(Json(response))
}
