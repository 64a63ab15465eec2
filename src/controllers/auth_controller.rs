//! Controller de autenticación y usuarios
//!
//! Registro, login y gestión de roles. El registro siempre crea un
//! usuario con rol DRIVER; los cambios de rol son una operación de
//! manager.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateRoleRequest, UserResponse,
};
use crate::middleware::auth::{require_manager, AuthenticatedUser};
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<LoginResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        if self.repository.username_exists(&request.username).await? {
            return Err(conflict_error("Usuario", "username", &request.username));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

        let user = self
            .repository
            .create(
                request.username,
                password_hash,
                request.full_name,
                request.email,
                request.phone,
                UserRole::Driver,
            )
            .await?;

        let response = self.login_response(user.id, user.role, UserResponse::from(user.clone()))?;
        Ok(ApiResponse::success_with_message(
            response,
            "Usuario registrado exitosamente".to_string(),
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let password_valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

        if !password_valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        self.login_response(user.id, user.role, UserResponse::from(user))
    }

    pub async fn me(&self, actor: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// Cambiar el rol de un usuario. Solo managers.
    pub async fn update_role(
        &self,
        user_id: Uuid,
        actor: &AuthenticatedUser,
        request: UpdateRoleRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        require_manager(actor)?;

        let user = self.repository.update_role(user_id, request.role).await?;

        log::info!("Rol de {} actualizado a {}", user.username, user.role.as_str());

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Rol actualizado exitosamente".to_string(),
        ))
    }

    fn login_response(
        &self,
        user_id: Uuid,
        role: UserRole,
        user: UserResponse,
    ) -> Result<LoginResponse, AppError> {
        let jwt_config = JwtConfig::from(&self.config);
        let access_token = generate_token(user_id, role, &jwt_config)?;

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.expiration,
            user,
        })
    }
}
