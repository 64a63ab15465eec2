//! Controller del circuito
//!
//! El circuito es único: la creación falla si ya existe uno.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::track_dto::{CreateTrackRequest, TrackResponse, UpdateTrackRequest};
use crate::middleware::auth::{require_manager, AuthenticatedUser};
use crate::repositories::track_repository::TrackRepository;
use crate::utils::errors::AppError;

pub struct TrackController {
    repository: TrackRepository,
}

impl TrackController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TrackRepository::new(pool),
        }
    }

    pub async fn get(&self) -> Result<TrackResponse, AppError> {
        let track = self
            .repository
            .find()
            .await?
            .ok_or_else(|| AppError::NotFound("Circuito no configurado".to_string()))?;

        Ok(TrackResponse::from(track))
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateTrackRequest,
    ) -> Result<ApiResponse<TrackResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;

        let track = self
            .repository
            .create(
                request.name,
                request.address,
                request.phone,
                request.email,
                request.description.unwrap_or_default(),
                request.notes.unwrap_or_default(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            TrackResponse::from(track),
            "Circuito creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        request: UpdateTrackRequest,
    ) -> Result<ApiResponse<TrackResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;

        let track = self
            .repository
            .update(
                request.name,
                request.address,
                request.phone,
                request.email,
                request.description,
                request.notes,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            TrackResponse::from(track),
            "Circuito actualizado exitosamente".to_string(),
        ))
    }
}
