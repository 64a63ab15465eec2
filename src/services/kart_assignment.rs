//! Motor de asignación de karts
//!
//! Dada una reserva en vías de confirmarse, selecciona y fija un kart de
//! forma atómica: dos reservas confirmadas cuyas sesiones se solapan en
//! el tiempo nunca comparten kart.
//!
//! El orden de operaciones importa: primero se bloquean las filas de los
//! karts ACTIVE y las reservas competidoras (FOR UPDATE), y solo después
//! se calcula el conjunto excluido. Dos confirmaciones concurrentes sobre
//! sesiones solapadas no pueden leer ambas el mismo kart como libre antes
//! de que una de las dos confirme.
//!
//! La fuente de aleatoriedad se inyecta para que los tests sean
//! deterministas.

use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::kart::Kart;
use crate::models::session_slot::SessionSlot;
use crate::utils::errors::AppError;

/// Karts ACTIVE que no están ligados a ninguna reserva competidora
pub fn candidate_pool(active_karts: Vec<Kart>, taken_kart_ids: &[Uuid]) -> Vec<Kart> {
    active_karts
        .into_iter()
        .filter(|kart| !taken_kart_ids.contains(&kart.id))
        .collect()
}

/// Elegir un kart del pool: la preferencia del driver gana si sigue
/// disponible; si no, elección uniforme al azar.
pub fn select_kart<'a, R: Rng>(
    pool: &'a [Kart],
    chosen_number: Option<i32>,
    rng: &mut R,
) -> Option<&'a Kart> {
    if let Some(number) = chosen_number {
        if let Some(kart) = pool.iter().find(|kart| kart.number == number) {
            return Some(kart);
        }
    }

    pool.choose(rng)
}

/// Seleccionar un kart para la reserva dentro de la transacción abierta.
/// Devuelve None si no queda ningún kart disponible: resultado de negocio
/// recuperable, la reserva sigue PENDING y no se muta nada.
pub async fn assign_kart<R: Rng>(
    conn: &mut PgConnection,
    booking: &Booking,
    session: &SessionSlot,
    rng: &mut R,
) -> Result<Option<Kart>, AppError> {
    // Bloquear los karts activos antes de calcular el conjunto excluido
    let active_karts = sqlx::query_as::<_, Kart>(
        "SELECT * FROM karts WHERE status = 'ACTIVE' ORDER BY number FOR UPDATE",
    )
    .fetch_all(&mut *conn)
    .await?;

    // Sesiones que se solapan con la de esta reserva (incluida ella misma)
    let overlapping_sessions: Vec<Uuid> = sqlx::query_scalar(
        "SELECT id FROM session_slots WHERE start_datetime < $1 AND end_datetime > $2",
    )
    .bind(session.end_datetime)
    .bind(session.start_datetime)
    .fetch_all(&mut *conn)
    .await?;

    // Karts ya ligados a reservas CONFIRMED/COMPLETED de cualquiera de
    // esas sesiones, bloqueando esas reservas hasta el commit
    let taken_kart_ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT assigned_kart_id FROM bookings
        WHERE session_slot_id = ANY($1)
          AND status IN ('CONFIRMED', 'COMPLETED')
          AND assigned_kart_id IS NOT NULL
          AND id <> $2
        FOR UPDATE
        "#,
    )
    .bind(&overlapping_sessions)
    .bind(booking.id)
    .fetch_all(&mut *conn)
    .await?;

    let pool = candidate_pool(active_karts, &taken_kart_ids);
    let selected = select_kart(&pool, booking.chosen_kart_number, rng).cloned();

    if pool.is_empty() {
        log::warn!(
            "Sin karts disponibles para la reserva {} (sesión {})",
            booking.id,
            session.id
        );
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kart::KartStatus;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn kart(number: i32) -> Kart {
        Kart {
            id: Uuid::new_v4(),
            number,
            status: KartStatus::Active,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_candidate_pool_excludes_taken_karts() {
        let karts = vec![kart(1), kart(2), kart(3)];
        let taken = vec![karts[0].id, karts[2].id];

        let pool = candidate_pool(karts, &taken);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].number, 2);
    }

    #[test]
    fn test_select_kart_honors_preference() {
        let pool = vec![kart(1), kart(5), kart(9)];
        let mut rng = StdRng::seed_from_u64(42);

        let selected = select_kart(&pool, Some(5), &mut rng).unwrap();
        assert_eq!(selected.number, 5);
    }

    #[test]
    fn test_select_kart_falls_back_when_preference_unavailable() {
        let pool = vec![kart(1), kart(9)];
        let mut rng = StdRng::seed_from_u64(42);

        // el kart 5 no está en el pool: elección al azar entre los demás
        let selected = select_kart(&pool, Some(5), &mut rng).unwrap();
        assert!(pool.iter().any(|k| k.id == selected.id));
    }

    #[test]
    fn test_select_kart_random_is_deterministic_with_seed() {
        let pool = vec![kart(1), kart(2), kart(3), kart(4)];

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);

        let a = select_kart(&pool, None, &mut rng_a).unwrap();
        let b = select_kart(&pool, None, &mut rng_b).unwrap();

        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_select_kart_empty_pool() {
        let pool: Vec<Kart> = Vec::new();
        let mut rng = StdRng::seed_from_u64(42);

        assert!(select_kart(&pool, None, &mut rng).is_none());
        assert!(select_kart(&pool, Some(3), &mut rng).is_none());
    }

    #[test]
    fn test_exclusion_blocks_kart_from_overlapping_session() {
        // el kart 1 está ligado a una reserva confirmada de una sesión
        // solapada: aunque el driver lo prefiera, no puede asignarse
        let karts = vec![kart(1), kart(2)];
        let taken = vec![karts[0].id];
        let mut rng = StdRng::seed_from_u64(42);

        let pool = candidate_pool(karts, &taken);
        let selected = select_kart(&pool, Some(1), &mut rng).unwrap();

        assert_eq!(selected.number, 2);
    }
}
