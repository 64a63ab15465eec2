use sqlx::PgPool;
use uuid::Uuid;

use crate::models::track::Track;
use crate::utils::errors::AppError;

pub struct TrackRepository {
    pool: PgPool,
}

impl TrackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear el circuito. Solo puede existir una fila: la creación se hace
    /// dentro de una transacción que primero comprueba la ausencia de otra.
    pub async fn create(
        &self,
        name: String,
        address: String,
        phone: String,
        email: String,
        description: String,
        notes: String,
    ) -> Result<Track, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tracks)")
            .fetch_one(&mut *tx)
            .await?;

        if existing.0 {
            return Err(AppError::Conflict(
                "Solo puede existir un circuito".to_string(),
            ));
        }

        let track = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (id, name, address, phone, email, description, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(email)
        .bind(description)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(track)
    }

    pub async fn find(&self) -> Result<Option<Track>, AppError> {
        let track = sqlx::query_as::<_, Track>("SELECT * FROM tracks LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(track)
    }

    pub async fn update(
        &self,
        name: Option<String>,
        address: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        description: Option<String>,
        notes: Option<String>,
    ) -> Result<Track, AppError> {
        let current = self
            .find()
            .await?
            .ok_or_else(|| AppError::NotFound("Circuito no configurado".to_string()))?;

        let track = sqlx::query_as::<_, Track>(
            r#"
            UPDATE tracks
            SET name = $2, address = $3, phone = $4, email = $5, description = $6, notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(name.unwrap_or(current.name))
        .bind(address.unwrap_or(current.address))
        .bind(phone.unwrap_or(current.phone))
        .bind(email.unwrap_or(current.email))
        .bind(description.unwrap_or(current.description))
        .bind(notes.unwrap_or(current.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(track)
    }
}
