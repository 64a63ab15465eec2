//! Modelo de User
//!
//! Este módulo contiene el struct User y el rol tipado que gobierna
//! los permisos. El campo `role` de la tabla users es la única fuente
//! de verdad: los permisos se calculan en lectura a partir del enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Driver,
    Manager,
    Marshal,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Driver => "DRIVER",
            UserRole::Manager => "MANAGER",
            UserRole::Marshal => "MARSHAL",
        }
    }

    /// Verificar si el rol es manager
    pub fn is_manager(self) -> bool {
        self == UserRole::Manager
    }

    /// Verificar si el rol es marshal
    pub fn is_marshal(self) -> bool {
        self == UserRole::Marshal
    }

    /// Verificar si el rol es driver
    pub fn is_driver(self) -> bool {
        self == UserRole::Driver
    }
}

/// User - mapea a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        assert!(UserRole::Manager.is_manager());
        assert!(!UserRole::Driver.is_manager());
        assert!(!UserRole::Marshal.is_manager());
        assert!(UserRole::Marshal.is_marshal());
        assert!(UserRole::Driver.is_driver());
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Driver.as_str(), "DRIVER");
        assert_eq!(UserRole::Manager.as_str(), "MANAGER");
        assert_eq!(UserRole::Marshal.as_str(), "MARSHAL");
    }
}
