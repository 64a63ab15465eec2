//! Utilidades de validación
//!
//! Este módulo contiene las reglas de validación de campos compartidas:
//! tiempos de sesión, capacidad, números de kart y valores monetarios.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use validator::ValidationError;

/// Duración mínima de una sesión en minutos
pub const MIN_SESSION_MINUTES: i64 = 30;
/// Duración máxima de una sesión en minutos
pub const MAX_SESSION_MINUTES: i64 = 240;
/// Capacidad máxima de drivers por sesión
pub const MAX_SESSION_CAPACITY: i32 = 20;
/// Rango válido de números de kart
pub const MIN_KART_NUMBER: i32 = 1;
pub const MAX_KART_NUMBER: i32 = 99;

/// Validar que un datetime esté en el futuro
pub fn validate_future_datetime(
    value: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if value <= now {
        let mut error = ValidationError::new("future_datetime");
        error.add_param("value".into(), &value.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Validar que el inicio sea anterior al fin
pub fn validate_datetime_order(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if start >= end {
        let mut error = ValidationError::new("datetime_order");
        error.add_param("start".into(), &start.to_rfc3339());
        error.add_param("end".into(), &end.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Validar duración mínima entre inicio y fin
pub fn validate_minimum_duration(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_minutes: i64,
) -> Result<(), ValidationError> {
    if end - start < Duration::minutes(min_minutes) {
        let mut error = ValidationError::new("minimum_duration");
        error.add_param("min_minutes".into(), &min_minutes);
        error.add_param("actual_minutes".into(), &(end - start).num_minutes());
        return Err(error);
    }
    Ok(())
}

/// Validar duración máxima entre inicio y fin
pub fn validate_maximum_duration(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_minutes: i64,
) -> Result<(), ValidationError> {
    if end - start > Duration::minutes(max_minutes) {
        let mut error = ValidationError::new("maximum_duration");
        error.add_param("max_minutes".into(), &max_minutes);
        error.add_param("actual_minutes".into(), &(end - start).num_minutes());
        return Err(error);
    }
    Ok(())
}

/// Validación completa de los tiempos de una sesión nueva:
/// inicio futuro, inicio < fin, duración entre 30 y 240 minutos.
pub fn validate_session_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    validate_future_datetime(start, now)?;
    validate_datetime_order(start, end)?;
    validate_minimum_duration(start, end, MIN_SESSION_MINUTES)?;
    validate_maximum_duration(start, end, MAX_SESSION_MINUTES)?;
    Ok(())
}

/// Validar capacidad de sesión (1 a 20 drivers)
pub fn validate_session_capacity(capacity: i32) -> Result<(), ValidationError> {
    if capacity < 1 || capacity > MAX_SESSION_CAPACITY {
        let mut error = ValidationError::new("session_capacity");
        error.add_param("min".into(), &1);
        error.add_param("max".into(), &MAX_SESSION_CAPACITY);
        error.add_param("actual".into(), &capacity);
        return Err(error);
    }
    Ok(())
}

/// Validar número de kart (1 a 99)
pub fn validate_kart_number(number: i32) -> Result<(), ValidationError> {
    if number < MIN_KART_NUMBER || number > MAX_KART_NUMBER {
        let mut error = ValidationError::new("kart_number");
        error.add_param("min".into(), &MIN_KART_NUMBER);
        error.add_param("max".into(), &MAX_KART_NUMBER);
        error.add_param("actual".into(), &number);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo (precios)
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_validate_future_datetime() {
        assert!(validate_future_datetime(at(11, 0), at(10, 0)).is_ok());
        assert!(validate_future_datetime(at(10, 0), at(10, 0)).is_err());
        assert!(validate_future_datetime(at(9, 0), at(10, 0)).is_err());
    }

    #[test]
    fn test_validate_datetime_order() {
        assert!(validate_datetime_order(at(10, 0), at(11, 0)).is_ok());
        assert!(validate_datetime_order(at(11, 0), at(10, 0)).is_err());
        assert!(validate_datetime_order(at(10, 0), at(10, 0)).is_err());
    }

    #[test]
    fn test_validate_durations() {
        assert!(validate_minimum_duration(at(10, 0), at(10, 30), 30).is_ok());
        assert!(validate_minimum_duration(at(10, 0), at(10, 29), 30).is_err());
        assert!(validate_maximum_duration(at(10, 0), at(14, 0), 240).is_ok());
        assert!(validate_maximum_duration(at(10, 0), at(14, 1), 240).is_err());
    }

    #[test]
    fn test_validate_session_times() {
        let now = at(8, 0);
        assert!(validate_session_times(at(10, 0), at(11, 0), now).is_ok());
        // en el pasado
        assert!(validate_session_times(at(7, 0), at(8, 30), now).is_err());
        // demasiado corta
        assert!(validate_session_times(at(10, 0), at(10, 15), now).is_err());
        // demasiado larga
        assert!(validate_session_times(at(10, 0), at(15, 0), now).is_err());
    }

    #[test]
    fn test_validate_session_capacity() {
        assert!(validate_session_capacity(1).is_ok());
        assert!(validate_session_capacity(20).is_ok());
        assert!(validate_session_capacity(0).is_err());
        assert!(validate_session_capacity(21).is_err());
    }

    #[test]
    fn test_validate_kart_number() {
        assert!(validate_kart_number(1).is_ok());
        assert!(validate_kart_number(99).is_ok());
        assert!(validate_kart_number(0).is_err());
        assert!(validate_kart_number(100).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(Decimal::ZERO).is_ok());
        assert!(validate_non_negative(Decimal::new(3500, 2)).is_ok());
        assert!(validate_non_negative(Decimal::new(-1, 2)).is_err());
    }
}
