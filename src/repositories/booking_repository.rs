use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::booking_dto::BookingFilters;
use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppError;

/// Proyección estándar de reservas: columnas de la tabla más el número
/// del kart asignado y el horario de la sesión para filtrar/ordenar.
const BOOKING_SELECT: &str = r#"
SELECT b.id, b.session_slot_id, b.driver_id, b.chosen_kart_number,
       b.assigned_kart_id, k.number AS assigned_kart_number, b.status,
       b.driver_notes, b.manager_notes, b.created_at, b.updated_at
FROM bookings b
LEFT JOIN karts k ON k.id = b.assigned_kart_id
JOIN session_slots s ON s.id = b.session_slot_id
"#;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let sql = format!("{} WHERE b.id = $1", BOOKING_SELECT);
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Cargar una reserva bloqueando su fila hasta el fin de la transacción
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!("{} WHERE b.id = $1 FOR UPDATE OF b", BOOKING_SELECT);
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(booking)
    }

    /// Insertar una reserva PENDING. Debe ejecutarse dentro de la misma
    /// transacción en la que se validaron capacidad y solapamiento.
    pub async fn insert(
        conn: &mut PgConnection,
        session_slot_id: Uuid,
        driver_id: Uuid,
        chosen_kart_number: Option<i32>,
        driver_notes: String,
    ) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (id, session_slot_id, driver_id, chosen_kart_number, status, driver_notes, manager_notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'PENDING', $5, '', NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_slot_id)
        .bind(driver_id)
        .bind(chosen_kart_number)
        .bind(driver_notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Transición de estado simple (cancelar, completar)
    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Confirmar la reserva y fijar el kart asignado en la misma escritura
    pub async fn bind_kart(
        conn: &mut PgConnection,
        id: Uuid,
        kart_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE bookings SET status = 'CONFIRMED', assigned_kart_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(kart_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn list_for_driver(
        &self,
        driver_id: Uuid,
        filters: &BookingFilters,
    ) -> Result<Vec<Booking>, AppError> {
        self.list_filtered(Some(driver_id), filters).await
    }

    pub async fn list_all(&self, filters: &BookingFilters) -> Result<Vec<Booking>, AppError> {
        self.list_filtered(None, filters).await
    }

    async fn list_filtered(
        &self,
        driver_id: Option<Uuid>,
        filters: &BookingFilters,
    ) -> Result<Vec<Booking>, AppError> {
        // $1 siempre es el driver (NULL = todos), $2 el filtro opcional
        let mut sql = format!(
            "{} WHERE ($1::uuid IS NULL OR b.driver_id = $1)",
            BOOKING_SELECT
        );

        let status = filters.status.as_deref();
        let parsed_status = status.and_then(BookingStatus::parse);
        let upcoming = status == Some("upcoming");

        if upcoming {
            sql.push_str(" AND b.status IN ('PENDING', 'CONFIRMED') AND s.start_datetime >= $2");
        } else if parsed_status.is_some() {
            sql.push_str(" AND b.status = $2");
        }
        sql.push_str(" ORDER BY s.start_datetime DESC");

        let mut query = sqlx::query_as::<_, Booking>(&sql).bind(driver_id);
        if upcoming {
            query = query.bind(Utc::now());
        } else if let Some(status) = parsed_status {
            query = query.bind(status);
        }

        let bookings = query.fetch_all(&self.pool).await?;

        Ok(bookings)
    }
}
