//! Controller de sesiones
//!
//! CRUD del catálogo de sesiones y generación del calendario recurrente.
//! Las mutaciones son de manager; los listados, de cualquier usuario
//! autenticado e incluyen la disponibilidad derivada.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::session_dto::{
    CreateSessionRequest, ScheduleRequest, ScheduleSummary, SessionFilters, SessionResponse,
    UpdateSessionRequest,
};
use crate::middleware::auth::{require_manager, AuthenticatedUser};
use crate::repositories::session_repository::{NewSessionSlot, SessionRepository};
use crate::repositories::track_repository::TrackRepository;
use crate::services::schedule_service;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{
    validate_datetime_order, validate_maximum_duration, validate_minimum_duration,
    validate_non_negative, validate_session_capacity, validate_session_times,
    MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
};

pub struct SessionController {
    repository: SessionRepository,
    tracks: TrackRepository,
}

impl SessionController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SessionRepository::new(pool.clone()),
            tracks: TrackRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateSessionRequest,
    ) -> Result<ApiResponse<SessionResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;

        let now = Utc::now();
        validate_session_times(request.start_datetime, request.end_datetime, now)
            .map_err(|_| session_times_error())?;
        validate_session_capacity(request.capacity)
            .map_err(|_| validation_error("capacity", "La capacidad debe estar entre 1 y 20 drivers.".to_string()))?;
        validate_non_negative(request.price)
            .map_err(|_| validation_error("price", "El precio no puede ser negativo.".to_string()))?;

        let track = self
            .tracks
            .find()
            .await?
            .ok_or_else(|| AppError::NotFound("Circuito no configurado".to_string()))?;

        let session = self
            .repository
            .create(NewSessionSlot {
                track_id: track.id,
                session_type: request.session_type,
                start_datetime: request.start_datetime,
                end_datetime: request.end_datetime,
                capacity: request.capacity,
                price: request.price,
                description: request.description.unwrap_or_default(),
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            SessionResponse::from_slot(session, 0),
            "Sesión creada exitosamente".to_string(),
        ))
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionResponse, AppError> {
        let session = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sesión no encontrada".to_string()))?;

        let active = self.repository.active_booking_count(id).await?;
        Ok(SessionResponse::from_slot(session, active))
    }

    pub async fn list(&self, filters: SessionFilters) -> Result<Vec<SessionResponse>, AppError> {
        let sessions = self.repository.list(&filters).await?;

        let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let counts: HashMap<Uuid, i64> = self
            .repository
            .active_booking_counts(&ids)
            .await?
            .into_iter()
            .collect();

        Ok(sessions
            .into_iter()
            .map(|session| {
                let active = counts.get(&session.id).copied().unwrap_or(0);
                SessionResponse::from_slot(session, active)
            })
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
        request: UpdateSessionRequest,
    ) -> Result<ApiResponse<SessionResponse>, AppError> {
        require_manager(actor)?;
        request.validate().map_err(AppError::Validation)?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sesión no encontrada".to_string()))?;

        // Al editar no se exige inicio futuro, pero sí orden y duración
        let start = request.start_datetime.unwrap_or(current.start_datetime);
        let end = request.end_datetime.unwrap_or(current.end_datetime);
        validate_datetime_order(start, end).map_err(|_| session_times_error())?;
        validate_minimum_duration(start, end, MIN_SESSION_MINUTES)
            .map_err(|_| session_times_error())?;
        validate_maximum_duration(start, end, MAX_SESSION_MINUTES)
            .map_err(|_| session_times_error())?;

        if let Some(capacity) = request.capacity {
            validate_session_capacity(capacity).map_err(|_| {
                validation_error("capacity", "La capacidad debe estar entre 1 y 20 drivers.".to_string())
            })?;
        }
        if let Some(price) = request.price {
            validate_non_negative(price)
                .map_err(|_| validation_error("price", "El precio no puede ser negativo.".to_string()))?;
        }

        let session = self
            .repository
            .update(
                id,
                request.session_type,
                request.start_datetime,
                request.end_datetime,
                request.capacity,
                request.price,
                request.description,
            )
            .await?;

        let active = self.repository.active_booking_count(id).await?;
        Ok(ApiResponse::success_with_message(
            SessionResponse::from_slot(session, active),
            "Sesión actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthenticatedUser) -> Result<(), AppError> {
        require_manager(actor)?;
        self.repository.delete(id).await
    }

    /// Generar el calendario recurrente de sesiones para los próximos
    /// días, como llamada masiva al catálogo. Idempotente: las franjas
    /// ya existentes se saltan.
    pub async fn create_schedule(
        &self,
        actor: &AuthenticatedUser,
        request: ScheduleRequest,
    ) -> Result<ApiResponse<ScheduleSummary>, AppError> {
        require_manager(actor)?;

        let now = Utc::now();
        let days = request.days.unwrap_or(30);
        if !(1..=90).contains(&days) {
            return Err(validation_error(
                "days",
                "El número de días debe estar entre 1 y 90.".to_string(),
            ));
        }

        let track = self
            .tracks
            .find()
            .await?
            .ok_or_else(|| AppError::NotFound("Circuito no configurado".to_string()))?;

        let cleared = if request.clear.unwrap_or(false) {
            self.repository.delete_future(now).await?
        } else {
            0
        };

        let slots = schedule_service::build_schedule(now, days);
        let mut created = 0u64;
        let mut skipped = 0u64;

        for slot in slots {
            let inserted = self
                .repository
                .create_if_absent(NewSessionSlot {
                    track_id: track.id,
                    session_type: slot.session_type,
                    start_datetime: slot.start_datetime,
                    end_datetime: slot.end_datetime,
                    capacity: slot.capacity,
                    price: slot.price,
                    description: String::new(),
                })
                .await?;

            if inserted {
                created += 1;
            } else {
                skipped += 1;
            }
        }

        log::info!(
            "Calendario generado: {} sesiones creadas, {} existentes, {} eliminadas",
            created,
            skipped,
            cleared
        );

        Ok(ApiResponse::success_with_message(
            ScheduleSummary {
                created,
                skipped,
                cleared,
            },
            format!("{} sesiones creadas", created),
        ))
    }
}

fn session_times_error() -> AppError {
    validation_error(
        "end_datetime",
        "Los tiempos de la sesión no son válidos: el inicio debe ser futuro y anterior al fin, con una duración de 30 a 240 minutos."
            .to_string(),
    )
}
