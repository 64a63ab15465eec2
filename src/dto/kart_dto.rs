//! DTOs de karts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::kart::{Kart, KartStatus};

/// Request para dar de alta un kart.
/// El rango del número se valida con el validador compartido.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateKartRequest {
    pub number: i32,

    pub notes: Option<String>,
}

/// Request para actualizar estado o notas de un kart.
/// El número no es editable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateKartRequest {
    pub status: Option<KartStatus>,
    pub notes: Option<String>,
}

/// Response de kart para la API
#[derive(Debug, Serialize)]
pub struct KartResponse {
    pub id: Uuid,
    pub number: i32,
    pub status: KartStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Kart> for KartResponse {
    fn from(kart: Kart) -> Self {
        Self {
            id: kart.id,
            number: kart.number,
            status: kart.status,
            notes: kart.notes,
            created_at: kart.created_at,
            updated_at: kart.updated_at,
        }
    }
}
