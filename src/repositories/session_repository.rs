use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::session_dto::SessionFilters;
use crate::models::session_slot::{SessionSlot, SessionType};
use crate::utils::errors::AppError;

pub struct SessionRepository {
    pool: PgPool,
}

/// Parámetros de inserción de una sesión
#[derive(Debug)]
pub struct NewSessionSlot {
    pub track_id: Uuid,
    pub session_type: SessionType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub description: String,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, slot: NewSessionSlot) -> Result<SessionSlot, AppError> {
        let session = sqlx::query_as::<_, SessionSlot>(
            r#"
            INSERT INTO session_slots (id, track_id, session_type, start_datetime, end_datetime, capacity, price, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(slot.track_id)
        .bind(slot.session_type)
        .bind(slot.start_datetime)
        .bind(slot.end_datetime)
        .bind(slot.capacity)
        .bind(slot.price)
        .bind(slot.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Insertar una sesión solo si no existe ya una del mismo tipo en el
    /// mismo horario (clave única). Devuelve true si se insertó.
    pub async fn create_if_absent(&self, slot: NewSessionSlot) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO session_slots (id, track_id, session_type, start_datetime, end_datetime, capacity, price, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            ON CONFLICT (track_id, session_type, start_datetime) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(slot.track_id)
        .bind(slot.session_type)
        .bind(slot.start_datetime)
        .bind(slot.end_datetime)
        .bind(slot.capacity)
        .bind(slot.price)
        .bind(slot.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionSlot>, AppError> {
        let session = sqlx::query_as::<_, SessionSlot>("SELECT * FROM session_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    /// Variante para usar dentro de una transacción abierta
    pub async fn load(conn: &mut PgConnection, id: Uuid) -> Result<Option<SessionSlot>, AppError> {
        let session = sqlx::query_as::<_, SessionSlot>("SELECT * FROM session_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(session)
    }

    pub async fn list(&self, filters: &SessionFilters) -> Result<Vec<SessionSlot>, AppError> {
        let mut sql = String::from("SELECT * FROM session_slots WHERE TRUE");

        if filters.upcoming.unwrap_or(false) {
            sql.push_str(" AND start_datetime >= NOW()");
        }
        if filters.session_type.is_some() {
            sql.push_str(" AND session_type = $1");
        }
        sql.push_str(" ORDER BY start_datetime");

        let mut query = sqlx::query_as::<_, SessionSlot>(&sql);
        if let Some(session_type) = filters.session_type {
            query = query.bind(session_type);
        }

        let sessions = query.fetch_all(&self.pool).await?;

        Ok(sessions)
    }

    pub async fn update(
        &self,
        id: Uuid,
        session_type: Option<SessionType>,
        start_datetime: Option<DateTime<Utc>>,
        end_datetime: Option<DateTime<Utc>>,
        capacity: Option<i32>,
        price: Option<Decimal>,
        description: Option<String>,
    ) -> Result<SessionSlot, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sesión no encontrada".to_string()))?;

        let session = sqlx::query_as::<_, SessionSlot>(
            r#"
            UPDATE session_slots
            SET session_type = $2, start_datetime = $3, end_datetime = $4, capacity = $5, price = $6, description = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(session_type.unwrap_or(current.session_type))
        .bind(start_datetime.unwrap_or(current.start_datetime))
        .bind(end_datetime.unwrap_or(current.end_datetime))
        .bind(capacity.unwrap_or(current.capacity))
        .bind(price.unwrap_or(current.price))
        .bind(description.unwrap_or(current.description))
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Eliminar una sesión. Sus reservas se eliminan en cascada.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sesión no encontrada".to_string()))?;

        sqlx::query("DELETE FROM session_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Eliminar todas las sesiones futuras. Devuelve cuántas se borraron.
    pub async fn delete_future(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM session_slots WHERE start_datetime >= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Número de reservas activas (PENDING o CONFIRMED) de una sesión
    pub async fn active_booking_count(&self, session_id: Uuid) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings WHERE session_slot_id = $1 AND status IN ('PENDING', 'CONFIRMED')",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Recuento de reservas activas agrupado por sesión, para listados
    pub async fn active_booking_counts(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, i64)>, AppError> {
        let counts: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT session_slot_id, COUNT(*)
            FROM bookings
            WHERE session_slot_id = ANY($1) AND status IN ('PENDING', 'CONFIRMED')
            GROUP BY session_slot_id
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
