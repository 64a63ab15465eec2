//! DTOs de reservas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{Booking, BookingStatus};

/// Request para crear una reserva sobre una sesión
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub session_slot_id: Uuid,

    #[validate(range(min = 1, max = 99))]
    pub chosen_kart_number: Option<i32>,

    pub driver_notes: Option<String>,
}

/// Filtros para el listado de reservas.
/// `status` acepta un estado concreto o "upcoming".
#[derive(Debug, Deserialize)]
pub struct BookingFilters {
    pub status: Option<String>,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub session_slot_id: Uuid,
    pub driver_id: Uuid,
    pub chosen_kart_number: Option<i32>,
    pub assigned_kart_id: Option<Uuid>,
    pub assigned_kart_number: Option<i32>,
    pub status: BookingStatus,
    pub driver_notes: String,
    pub manager_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            session_slot_id: booking.session_slot_id,
            driver_id: booking.driver_id,
            chosen_kart_number: booking.chosen_kart_number,
            assigned_kart_id: booking.assigned_kart_id,
            assigned_kart_number: booking.assigned_kart_number,
            status: booking.status,
            driver_notes: booking.driver_notes,
            manager_notes: booking.manager_notes,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
