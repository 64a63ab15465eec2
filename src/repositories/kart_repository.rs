use sqlx::PgPool;
use uuid::Uuid;

use crate::models::kart::{Kart, KartStatus};
use crate::utils::errors::AppError;

pub struct KartRepository {
    pool: PgPool,
}

impl KartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, number: i32, notes: String) -> Result<Kart, AppError> {
        let kart = sqlx::query_as::<_, Kart>(
            r#"
            INSERT INTO karts (id, number, status, notes, created_at, updated_at)
            VALUES ($1, $2, 'ACTIVE', $3, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(number)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(kart)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Kart>, AppError> {
        let kart = sqlx::query_as::<_, Kart>("SELECT * FROM karts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(kart)
    }

    pub async fn find_by_number(&self, number: i32) -> Result<Option<Kart>, AppError> {
        let kart = sqlx::query_as::<_, Kart>("SELECT * FROM karts WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(kart)
    }

    pub async fn number_exists(&self, number: i32) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM karts WHERE number = $1)")
                .bind(number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn list(&self) -> Result<Vec<Kart>, AppError> {
        let karts = sqlx::query_as::<_, Kart>("SELECT * FROM karts ORDER BY number")
            .fetch_all(&self.pool)
            .await?;

        Ok(karts)
    }

    pub async fn update(
        &self,
        id: Uuid,
        status: Option<KartStatus>,
        notes: Option<String>,
    ) -> Result<Kart, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Kart no encontrado".to_string()))?;

        let kart = sqlx::query_as::<_, Kart>(
            r#"
            UPDATE karts
            SET status = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.unwrap_or(current.status))
        .bind(notes.unwrap_or(current.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(kart)
    }

    /// Eliminar un kart. Las reservas que lo referencian quedan con
    /// assigned_kart_id en NULL (ON DELETE SET NULL).
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Kart no encontrado".to_string()))?;

        sqlx::query("DELETE FROM karts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
