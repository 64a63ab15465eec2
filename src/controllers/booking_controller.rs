//! Controller de reservas
//!
//! Orquesta el ciclo de vida completo de una reserva: creación validada,
//! confirmación con asignación de kart, cancelación y finalización.
//! Toda mutación corre dentro de una transacción; las reglas de negocio
//! se reevalúan en cada escritura salvo cuando el estado resultante es
//! terminal.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::booking_dto::{BookingFilters, BookingResponse, CreateBookingRequest};
use crate::middleware::auth::{require_manager, AuthenticatedUser};
use crate::models::booking::{Booking, BookingStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::session_repository::SessionRepository;
use crate::services::booking_rules::{self, BookingCandidate};
use crate::services::kart_assignment;
use crate::utils::errors::{forbidden_error, is_lock_conflict, not_found_error, AppError};
use validator::Validate;

pub struct BookingController {
    pool: PgPool,
    repository: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Crear una reserva PENDING para el driver autenticado
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let session = SessionRepository::load(&mut tx, request.session_slot_id)
            .await?
            .ok_or_else(|| {
                not_found_error("Sesión", &request.session_slot_id.to_string())
            })?;

        if !session.is_upcoming(now) {
            return Err(AppError::BadRequest(
                "No se puede reservar una sesión que ya ha comenzado.".to_string(),
            ));
        }

        // Capacidad, solapamiento y kart elegido, con lecturas bloqueantes
        // dentro de la misma transacción que el insert
        let candidate = BookingCandidate {
            id: None,
            session_slot_id: session.id,
            driver_id: actor.user_id,
            status: BookingStatus::Pending,
            chosen_kart_number: request.chosen_kart_number,
        };
        booking_rules::validate_booking(&mut tx, &candidate).await?;

        let booking_id = BookingRepository::insert(
            &mut tx,
            session.id,
            actor.user_id,
            request.chosen_kart_number,
            request.driver_notes.unwrap_or_default(),
        )
        .await?;

        tx.commit().await?;

        let booking = self.fetch(booking_id).await?;
        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            "Tu reserva ha sido creada. Queda pendiente de confirmación por un manager."
                .to_string(),
        ))
    }

    /// Confirmar una reserva pendiente asignándole un kart.
    /// Solo managers. Un conflicto de bloqueo se reintenta una vez antes
    /// de devolver un error genérico de "inténtalo de nuevo".
    pub async fn confirm(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_manager(actor)?;

        match self.try_confirm(id).await {
            Err(error) if is_lock_conflict(&error) => {
                log::warn!(
                    "Conflicto de bloqueo al confirmar la reserva {}, reintentando",
                    id
                );
                self.try_confirm(id).await.map_err(|retry_error| {
                    if is_lock_conflict(&retry_error) {
                        AppError::Conflict(
                            "La reserva está siendo procesada por otra operación. Inténtalo de nuevo."
                                .to_string(),
                        )
                    } else {
                        retry_error
                    }
                })
            }
            other => other,
        }
    }

    async fn try_confirm(&self, id: Uuid) -> Result<ApiResponse<BookingResponse>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;

        let session = SessionRepository::load(&mut tx, booking.session_slot_id)
            .await?
            .ok_or_else(|| not_found_error("Sesión", &booking.session_slot_id.to_string()))?;

        if !booking.can_be_confirmed(&session, now) {
            return Err(AppError::BadRequest(
                "Esta reserva no puede ser confirmada. Puede que la sesión ya haya comenzado o que la reserva no esté pendiente."
                    .to_string(),
            ));
        }

        // Reevaluar las reglas con el estado resultante antes de asignar
        let candidate = BookingCandidate {
            id: Some(booking.id),
            session_slot_id: booking.session_slot_id,
            driver_id: booking.driver_id,
            status: BookingStatus::Confirmed,
            chosen_kart_number: booking.chosen_kart_number,
        };
        booking_rules::validate_booking(&mut tx, &candidate).await?;

        let mut rng = StdRng::from_entropy();
        match kart_assignment::assign_kart(&mut tx, &booking, &session, &mut rng).await? {
            Some(kart) => {
                BookingRepository::bind_kart(&mut tx, booking.id, kart.id).await?;
                tx.commit().await?;

                let confirmed = self.fetch(booking.id).await?;
                Ok(ApiResponse::success_with_message(
                    BookingResponse::from(confirmed),
                    format!("Reserva confirmada. Kart #{} asignado.", kart.number),
                ))
            }
            None => {
                // Resultado recuperable: la reserva sigue PENDING
                tx.rollback().await?;
                Ok(ApiResponse::failure(
                    "No hay karts disponibles para esta sesión. Revisa el estado de los karts o los conflictos de horario."
                        .to_string(),
                ))
            }
        }
    }

    /// Cancelar una reserva. El driver puede cancelar las suyas; un
    /// manager, cualquiera. Solo antes del inicio de la sesión.
    pub async fn cancel(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;

        if !actor.role.is_manager() && booking.driver_id != actor.user_id {
            return Err(forbidden_error(
                "cancelar esta reserva",
                "solo el driver titular o un manager pueden cancelarla",
            ));
        }

        let session = SessionRepository::load(&mut tx, booking.session_slot_id)
            .await?
            .ok_or_else(|| not_found_error("Sesión", &booking.session_slot_id.to_string()))?;

        if !booking.can_be_cancelled(&session, now) {
            return Err(AppError::BadRequest(
                "Esta reserva no puede ser cancelada. Puede que la sesión ya haya comenzado o que la reserva esté finalizada."
                    .to_string(),
            ));
        }

        // Estado terminal: exento de las reglas de negocio
        BookingRepository::set_status(&mut tx, booking.id, BookingStatus::Cancelled).await?;
        tx.commit().await?;

        let cancelled = self.fetch(booking.id).await?;
        Ok(ApiResponse::success_with_message(
            BookingResponse::from(cancelled),
            "Tu reserva ha sido cancelada.".to_string(),
        ))
    }

    /// Marcar como completada una reserva confirmada cuya sesión terminó.
    /// Solo managers.
    pub async fn complete(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_manager(actor)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;

        let session = SessionRepository::load(&mut tx, booking.session_slot_id)
            .await?
            .ok_or_else(|| not_found_error("Sesión", &booking.session_slot_id.to_string()))?;

        if !booking.can_be_completed(&session, now) {
            return Err(AppError::BadRequest(
                "Esta reserva no puede marcarse como completada. Puede que la sesión no haya terminado todavía."
                    .to_string(),
            ));
        }

        BookingRepository::set_status(&mut tx, booking.id, BookingStatus::Completed).await?;
        tx.commit().await?;

        let completed = self.fetch(booking.id).await?;
        Ok(ApiResponse::success_with_message(
            BookingResponse::from(completed),
            "Reserva marcada como completada.".to_string(),
        ))
    }

    /// Detalle de una reserva: el driver solo ve las suyas
    pub async fn get(
        &self,
        id: Uuid,
        actor: &AuthenticatedUser,
    ) -> Result<BookingResponse, AppError> {
        let booking = self.fetch(id).await?;

        if !actor.role.is_manager() && booking.driver_id != actor.user_id {
            return Err(forbidden_error(
                "ver esta reserva",
                "pertenece a otro driver",
            ));
        }

        Ok(BookingResponse::from(booking))
    }

    /// Listado: drivers ven sus reservas, managers todas
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        filters: BookingFilters,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = if actor.role.is_manager() {
            self.repository.list_all(&filters).await?
        } else {
            self.repository.list_for_driver(actor.user_id, &filters).await?
        };

        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Booking, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))
    }
}
