//! DTOs del circuito

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::track::Track;

/// Request para crear el circuito (solo puede existir uno)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrackRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 5))]
    pub address: String,

    #[validate(length(min = 7, max = 20))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Request para actualizar los datos del circuito
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTrackRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 5))]
    pub address: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Response del circuito para la API
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Track> for TrackResponse {
    fn from(track: Track) -> Self {
        Self {
            id: track.id,
            name: track.name,
            address: track.address,
            phone: track.phone,
            email: track.email,
            description: track.description,
            created_at: track.created_at,
            updated_at: track.updated_at,
        }
    }
}
