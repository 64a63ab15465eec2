//! Reglas de negocio de las reservas
//!
//! Valida cada escritura de una reserva contra las tres reglas del
//! sistema, en orden y con corte en la primera violación:
//!
//! 1. capacidad de la sesión
//! 2. solapamiento horario del driver
//! 3. disponibilidad del kart elegido
//!
//! Los estados terminales (CANCELLED, COMPLETED) están exentos: una
//! cancelación debe poder persistirse aunque las reglas ya no se cumplan.
//!
//! Las lecturas de capacidad y solapamiento bloquean las filas implicadas
//! (FOR UPDATE), por lo que este validador debe ejecutarse dentro de la
//! transacción que hace la escritura. No tiene efectos secundarios.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::booking::BookingStatus;
use crate::models::kart::Kart;
use crate::models::session_slot::SessionSlot;
use crate::utils::errors::{validation_error, AppError};

/// Reserva candidata a persistirse. `id` es None al crear y Some al
/// reescribir una reserva existente, que se excluye de sus propios
/// recuentos.
#[derive(Debug)]
pub struct BookingCandidate {
    pub id: Option<Uuid>,
    pub session_slot_id: Uuid,
    pub driver_id: Uuid,
    pub status: BookingStatus,
    pub chosen_kart_number: Option<i32>,
}

/// ¿El número de reservas activas agota la capacidad?
pub fn exceeds_capacity(active_count: i64, capacity: i32) -> bool {
    active_count >= capacity as i64
}

/// Validar una reserva candidata dentro de la transacción abierta
pub async fn validate_booking(
    conn: &mut PgConnection,
    candidate: &BookingCandidate,
) -> Result<(), AppError> {
    // Estados terminales exentos
    if candidate.status.is_terminal() {
        return Ok(());
    }

    let session = sqlx::query_as::<_, SessionSlot>("SELECT * FROM session_slots WHERE id = $1")
        .bind(candidate.session_slot_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Sesión no encontrada".to_string()))?;

    let excluded_id = candidate.id.unwrap_or_else(Uuid::nil);

    // 1. Capacidad: lectura con bloqueo para que dos creaciones
    // concurrentes no pasen ambas el recuento
    let active: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM bookings
        WHERE session_slot_id = $1
          AND status IN ('PENDING', 'CONFIRMED')
          AND id <> $2
        FOR UPDATE
        "#,
    )
    .bind(candidate.session_slot_id)
    .bind(excluded_id)
    .fetch_all(&mut *conn)
    .await?;

    if exceeds_capacity(active.len() as i64, session.capacity) {
        return Err(validation_error(
            "session_slot",
            "Esta sesión está completa.".to_string(),
        ));
    }

    // 2. Solapamiento del driver: intervalos semiabiertos, los extremos
    // adyacentes no cuentan
    let overlapping: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT b.id FROM bookings b
        JOIN session_slots s ON s.id = b.session_slot_id
        WHERE b.driver_id = $1
          AND b.status IN ('PENDING', 'CONFIRMED')
          AND b.id <> $2
          AND s.start_datetime < $3
          AND s.end_datetime > $4
        FOR UPDATE OF b
        "#,
    )
    .bind(candidate.driver_id)
    .bind(excluded_id)
    .bind(session.end_datetime)
    .bind(session.start_datetime)
    .fetch_all(&mut *conn)
    .await?;

    if !overlapping.is_empty() {
        return Err(validation_error(
            "session_slot",
            "Ya tienes una reserva durante este horario.".to_string(),
        ));
    }

    // 3. Kart elegido: debe existir y estar ACTIVE
    if let Some(number) = candidate.chosen_kart_number {
        let kart = sqlx::query_as::<_, Kart>("SELECT * FROM karts WHERE number = $1")
            .bind(number)
            .fetch_optional(&mut *conn)
            .await?;

        match kart {
            None => {
                return Err(validation_error(
                    "chosen_kart_number",
                    format!("El kart #{} no existe.", number),
                ));
            }
            Some(kart) if !kart.is_available() => {
                return Err(validation_error(
                    "chosen_kart_number",
                    format!("El kart #{} está actualmente en mantenimiento.", number),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_capacity_at_limit() {
        // capacidad 2: la tercera reserva activa se rechaza
        assert!(!exceeds_capacity(0, 2));
        assert!(!exceeds_capacity(1, 2));
        assert!(exceeds_capacity(2, 2));
        assert!(exceeds_capacity(3, 2));
    }

    #[test]
    fn test_terminal_states_are_exempt() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }
}
