use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::kart_controller::KartController;
use crate::dto::api_response::ApiResponse;
use crate::dto::kart_dto::{CreateKartRequest, KartResponse, UpdateKartRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_kart_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_kart))
        .route("/", get(list_karts))
        .route("/:id", get(get_kart))
        .route("/:id", put(update_kart))
        .route("/:id", delete(delete_kart))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn create_kart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateKartRequest>,
) -> Result<Json<ApiResponse<KartResponse>>, AppError> {
    let controller = KartController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn list_karts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<KartResponse>>, AppError> {
    let controller = KartController::new(state.pool.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn get_kart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<KartResponse>, AppError> {
    let controller = KartController::new(state.pool.clone());
    let response = controller.get(id, &user).await?;
    Ok(Json(response))
}

async fn update_kart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateKartRequest>,
) -> Result<Json<ApiResponse<KartResponse>>, AppError> {
    let controller = KartController::new(state.pool.clone());
    let response = controller.update(id, &user, request).await?;
    Ok(Json(response))
}

async fn delete_kart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = KartController::new(state.pool.clone());
    controller.delete(id, &user).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Kart eliminado exitosamente"
    })))
}
