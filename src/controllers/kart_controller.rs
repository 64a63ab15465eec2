//! Controller de karts
//!
//! Gestión de la flota: alta, estado operacional y baja. Todas las
//! operaciones son de manager.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::kart_dto::{CreateKartRequest, KartResponse, UpdateKartRequest};
use crate::middleware::auth::{require_manager, AuthenticatedUser};
use crate::repositories::kart_repository::KartRepository;
use crate::utils::errors::{conflict_error, validation_error, AppError};
use crate::utils::validation::validate_kart_number;

pub struct KartController {
    repository: KartRepository,
}

impl KartController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: KartRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateKartRequest,
    ) -> Result<ApiResponse<KartResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;
        validate_kart_number(request.number).map_err(|_| {
            validation_error(
                "number",
                "El número de kart debe estar entre 1 y 99.".to_string(),
            )
        })?;

        if self.repository.number_exists(request.number).await? {
            return Err(conflict_error(
                "Kart",
                "number",
                &request.number.to_string(),
            ));
        }

        let kart = self
            .repository
            .create(request.number, request.notes.unwrap_or_default())
            .await?;

        Ok(ApiResponse::success_with_message(
            KartResponse::from(kart),
            format!("Kart #{} creado exitosamente", request.number),
        ))
    }

    pub async fn get(&self, id: Uuid, actor: &AuthenticatedUser) -> Result<KartResponse, AppError> {
        require_manager(actor)?;

        let kart = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Kart no encontrado".to_string()))?;

        Ok(KartResponse::from(kart))
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<KartResponse>, AppError> {
        require_manager(actor)?;

        let karts = self.repository.list().await?;
        Ok(karts.into_iter().map(KartResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
        request: UpdateKartRequest,
    ) -> Result<ApiResponse<KartResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;

        let kart = self
            .repository
            .update(id, request.status, request.notes)
            .await?;

        Ok(ApiResponse::success_with_message(
            KartResponse::from(kart),
            "Kart actualizado exitosamente".to_string(),
        ))
    }

    /// Dar de baja un kart. Las reservas que lo tenían asignado quedan
    /// sin kart (referencia anulada), nunca se borran.
    pub async fn delete(&self, id: Uuid, actor: &AuthenticatedUser) -> Result<(), AppError> {
        require_manager(actor)?;
        self.repository.delete(id).await
    }
}
