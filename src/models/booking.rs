//! Modelo de Booking
//!
//! La reserva es la entidad central del sistema. Su máquina de estados:
//!
//! ```text
//! PENDING --confirmar(kart asignado)--> CONFIRMED
//! PENDING --confirmar(sin karts)-----> PENDING (error reportado)
//! {PENDING, CONFIRMED} --cancelar(antes del inicio)--> CANCELLED
//! CONFIRMED --completar(tras el fin)--> COMPLETED
//! ```
//!
//! Los guards no mutan nada: el fallo de un guard se reporta al caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::session_slot::SessionSlot;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Estados que cuentan contra la capacidad y el solapamiento
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Estados terminales: exentos de las reglas de negocio al persistir
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            "COMPLETED" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// Booking - proyección de la tabla bookings con el número del kart
/// asignado (LEFT JOIN sobre karts)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
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

impl Booking {
    /// Guard de cancelación: reserva activa y sesión aún no comenzada
    pub fn can_be_cancelled(&self, session: &SessionSlot, now: DateTime<Utc>) -> bool {
        self.status.is_active() && session.start_datetime > now
    }

    /// Guard de confirmación: reserva pendiente y sesión aún no comenzada
    pub fn can_be_confirmed(&self, session: &SessionSlot, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Pending && session.start_datetime > now
    }

    /// Guard de finalización: reserva confirmada y sesión ya terminada
    pub fn can_be_completed(&self, session: &SessionSlot, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Confirmed && session.end_datetime < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session_slot::SessionType;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap()
    }

    fn session(start: DateTime<Utc>, end: DateTime<Utc>) -> SessionSlot {
        SessionSlot {
            id: Uuid::new_v4(),
            track_id: Uuid::new_v4(),
            session_type: SessionType::OpenSession,
            start_datetime: start,
            end_datetime: end,
            capacity: 10,
            price: Decimal::new(3500, 2),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            session_slot_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            chosen_kart_number: None,
            assigned_kart_id: None,
            assigned_kart_number: None,
            status,
            driver_notes: String::new(),
            manager_notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_sets() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("PENDING"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("COMPLETED"), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse("upcoming"), None);
    }

    #[test]
    fn test_can_be_cancelled_before_start() {
        let future = session(at(10), at(11));
        let now = at(8);

        assert!(booking(BookingStatus::Pending).can_be_cancelled(&future, now));
        assert!(booking(BookingStatus::Confirmed).can_be_cancelled(&future, now));
        assert!(!booking(BookingStatus::Completed).can_be_cancelled(&future, now));
        // una reserva ya cancelada no puede volver a cancelarse
        assert!(!booking(BookingStatus::Cancelled).can_be_cancelled(&future, now));
    }

    #[test]
    fn test_can_be_cancelled_after_start() {
        let started = session(at(10), at(11));
        assert!(!booking(BookingStatus::Pending).can_be_cancelled(&started, at(10)));
        assert!(!booking(BookingStatus::Confirmed).can_be_cancelled(&started, at(12)));
    }

    #[test]
    fn test_can_be_confirmed() {
        let future = session(at(10), at(11));
        let now = at(8);

        assert!(booking(BookingStatus::Pending).can_be_confirmed(&future, now));
        assert!(!booking(BookingStatus::Confirmed).can_be_confirmed(&future, now));
        assert!(!booking(BookingStatus::Cancelled).can_be_confirmed(&future, now));
        // sesión ya comenzada
        assert!(!booking(BookingStatus::Pending).can_be_confirmed(&future, at(10)));
    }

    #[test]
    fn test_can_be_completed() {
        let past = session(at(10), at(11));

        assert!(booking(BookingStatus::Confirmed).can_be_completed(&past, at(12)));
        assert!(!booking(BookingStatus::Confirmed).can_be_completed(&past, at(10)));
        assert!(!booking(BookingStatus::Pending).can_be_completed(&past, at(12)));
        assert!(!booking(BookingStatus::Completed).can_be_completed(&past, at(12)));
    }
}
