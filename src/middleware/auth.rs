//! Middleware de autenticación JWT
//!
//! Este módulo extrae y verifica el token, carga el usuario y lo inyecta
//! en la request. El rol se lee siempre de la fila de users: la columna
//! `role` es la fuente canónica de permisos, el claim del token es solo
//! informativo.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::errors::{AppError, AppResult},
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Comprobación única de permisos de manager. Todas las operaciones
/// restringidas pasan por aquí.
pub fn require_manager(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.role.is_manager() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Se requiere rol de manager para esta operación".to_string(),
        ))
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe y leer su rol actual
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_require_manager() {
        assert!(require_manager(&user(UserRole::Manager)).is_ok());
        assert!(require_manager(&user(UserRole::Driver)).is_err());
        assert!(require_manager(&user(UserRole::Marshal)).is_err());
    }
}
