//! Modelo de Kart
//!
//! Este módulo contiene el struct Kart y su estado operacional.
//! El número de kart es único e inmutable (1-99).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del kart - mapea al ENUM kart_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "kart_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum KartStatus {
    Active,
    Maintenance,
}

/// Kart - mapea a la tabla karts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Kart {
    pub id: Uuid,
    pub number: i32,
    pub status: KartStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Kart {
    /// Verificar si el kart está disponible para reservas (estado ACTIVE)
    pub fn is_available(&self) -> bool {
        self.status == KartStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kart(status: KartStatus) -> Kart {
        Kart {
            id: Uuid::new_v4(),
            number: 7,
            status,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_available() {
        assert!(kart(KartStatus::Active).is_available());
        assert!(!kart(KartStatus::Maintenance).is_available());
    }
}
