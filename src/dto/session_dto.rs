//! DTOs de sesiones

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::session_slot::{available_spots, SessionSlot, SessionType};

/// Request para crear una sesión
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub session_type: SessionType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub description: Option<String>,
}

/// Request para actualizar una sesión existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    pub session_type: Option<SessionType>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

/// Filtros para el listado de sesiones
#[derive(Debug, Deserialize)]
pub struct SessionFilters {
    pub upcoming: Option<bool>,
    pub session_type: Option<SessionType>,
}

/// Request para generar el calendario recurrente de sesiones
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub days: Option<i64>,
    pub clear: Option<bool>,
}

/// Resumen de la generación de calendario
#[derive(Debug, Serialize)]
pub struct ScheduleSummary {
    pub created: u64,
    pub skipped: u64,
    pub cleared: u64,
}

/// Response de sesión con disponibilidad y estado temporal derivados
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub track_id: Uuid,
    pub session_type: SessionType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub description: String,
    pub available_spots: i64,
    pub is_full: bool,
    pub is_past: bool,
    pub is_upcoming: bool,
    pub is_in_progress: bool,
}

impl SessionResponse {
    /// Construir la response a partir de la sesión y el número de
    /// reservas activas (PENDING o CONFIRMED)
    pub fn from_slot(slot: SessionSlot, active_bookings: i64) -> Self {
        let now = Utc::now();
        let spots = available_spots(slot.capacity, active_bookings);
        Self {
            id: slot.id,
            track_id: slot.track_id,
            session_type: slot.session_type,
            start_datetime: slot.start_datetime,
            end_datetime: slot.end_datetime,
            capacity: slot.capacity,
            price: slot.price,
            description: slot.description.clone(),
            available_spots: spots,
            is_full: spots <= 0,
            is_past: slot.is_past(now),
            is_upcoming: slot.is_upcoming(now),
            is_in_progress: slot.is_in_progress(now),
        }
    }
}
