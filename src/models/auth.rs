// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário ("owner") vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub age: Option<i16>,
    pub phone: Option<String>,
    pub date_registered: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, max = 150, message = "O nome de usuário deve ter entre 1 e 150 caracteres."))]
    pub username: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(range(min = 0, max = 150, message = "Idade inválida."))]
    pub age: Option<i16>,
    #[validate(length(max = 32, message = "Telefone muito longo."))]
    pub phone: Option<String>,
}

// Dados para login (por nome de usuário)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O nome de usuário é obrigatório."))]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Edição do próprio perfil. Campos ausentes ficam como estão.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Idade inválida."))]
    pub age: Option<i16>,
    #[validate(length(max = 32, message = "Telefone muito longo."))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenPayload {
    #[validate(length(min = 1, message = "O refresh token é obrigatório."))]
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserBrief {
    pub username: String,
    pub email: String,
}

// Resposta de registro/login: par de tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserBrief,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
    pub jti: Uuid,  // ID do token, usado na revogação (logout)
    pub typ: TokenKind,
}

// --- Redefinição de senha ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyResetCodePayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(range(min = 1000, max = 9999, message = "O código tem 4 dígitos."))]
    pub reset_code: u32,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub attempts: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
