//! Modelo de SessionSlot
//!
//! Una sesión es una franja horaria reservable del circuito, con capacidad
//! y precio. La comparación de solapamiento usa intervalos semiabiertos:
//! dos sesiones que solo se tocan en un extremo no se solapan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de sesión - mapea al ENUM session_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "session_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    OpenSession,
    GrandPrix,
}

/// SessionSlot - mapea a la tabla session_slots
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionSlot {
    pub id: Uuid,
    pub track_id: Uuid,
    pub session_type: SessionType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSlot {
    /// Verificar si la sesión ya terminó
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.end_datetime < now
    }

    /// Verificar si la sesión aún no ha comenzado
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime > now
    }

    /// Verificar si la sesión está en curso
    pub fn is_in_progress(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime <= now && now <= self.end_datetime
    }

    /// Verificar si esta sesión se solapa en el tiempo con otra
    pub fn overlaps(&self, other: &SessionSlot) -> bool {
        intervals_overlap(
            self.start_datetime,
            self.end_datetime,
            other.start_datetime,
            other.end_datetime,
        )
    }
}

/// Comparación de solapamiento con intervalos semiabiertos:
/// los extremos exactamente adyacentes (fin == inicio) no se solapan.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Plazas restantes de una sesión dado el número de reservas activas
pub fn available_spots(capacity: i32, active_bookings: i64) -> i64 {
    capacity as i64 - active_bookings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, minute, 0).unwrap()
    }

    fn slot(start: DateTime<Utc>, end: DateTime<Utc>) -> SessionSlot {
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

    #[test]
    fn test_intervals_overlap_partial() {
        // 10:00-11:00 contra 10:30-11:30
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(10, 30), at(11, 30)));
        assert!(intervals_overlap(at(10, 30), at(11, 30), at(10, 0), at(11, 0)));
    }

    #[test]
    fn test_intervals_adjacent_do_not_overlap() {
        // 10:00-11:00 contra 11:00-12:00: adyacentes, no se solapan
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(11, 0), at(12, 0)));
        assert!(!intervals_overlap(at(11, 0), at(12, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn test_intervals_contained() {
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(10, 30), at(11, 0)));
    }

    #[test]
    fn test_session_overlaps() {
        let a = slot(at(10, 0), at(11, 0));
        let b = slot(at(10, 30), at(11, 30));
        let c = slot(at(11, 0), at(12, 0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_session_time_state() {
        let s = slot(at(10, 0), at(11, 0));
        assert!(s.is_upcoming(at(9, 0)));
        assert!(!s.is_upcoming(at(10, 0)));
        assert!(s.is_in_progress(at(10, 30)));
        assert!(s.is_in_progress(at(10, 0)));
        assert!(s.is_in_progress(at(11, 0)));
        assert!(s.is_past(at(11, 1)));
        assert!(!s.is_past(at(11, 0)));
    }

    #[test]
    fn test_available_spots() {
        assert_eq!(available_spots(10, 3), 7);
        assert_eq!(available_spots(2, 2), 0);
        assert_eq!(available_spots(2, 3), -1);
    }
}
