// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros de domínio + infraestrutura. Convertidos em `ApiError` na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Regras do estoque ---
    #[error("Unidade vendida sem preço de venda")]
    MissingSalePrice,

    #[error("Preço de venda {high_price} abaixo do custo {low_price}")]
    PriceBelowCost { high_price: i32, low_price: i32 },

    #[error("Data do grupo no futuro")]
    FutureGroupDate,

    #[error("Já existe um grupo nesta data")]
    GroupDateAlreadyExists,

    // --- Contas ---
    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Código de redefinição inválido")]
    InvalidResetCode,

    #[error("E-mail desconhecido")]
    UnknownEmail,

    // --- Não encontrados ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Grupo não encontrado")]
    GroupNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Unidade não encontrada")]
    UnitNotFound,

    #[error("Vendedor não encontrado")]
    SellerNotFound,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Chave estável usada no catálogo de mensagens.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::MissingSalePrice => "MISSING_SALE_PRICE",
            AppError::PriceBelowCost { .. } => "PRICE_BELOW_COST",
            AppError::FutureGroupDate => "FUTURE_GROUP_DATE",
            AppError::GroupDateAlreadyExists => "GROUP_DATE_ALREADY_EXISTS",
            AppError::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InvalidResetCode => "INVALID_RESET_CODE",
            AppError::UnknownEmail => "UNKNOWN_EMAIL",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::GroupNotFound => "GROUP_NOT_FOUND",
            AppError::ProductNotFound => "PRODUCT_NOT_FOUND",
            AppError::UnitNotFound => "UNIT_NOT_FOUND",
            AppError::SellerNotFound => "SELLER_NOT_FOUND",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingSalePrice
            | AppError::PriceBelowCost { .. }
            | AppError::FutureGroupDate
            | AppError::InvalidResetCode
            | AppError::UnknownEmail => StatusCode::BAD_REQUEST,
            AppError::GroupDateAlreadyExists
            | AppError::UsernameAlreadyExists
            | AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound
            | AppError::GroupNotFound
            | AppError::ProductNotFound
            | AppError::UnitNotFound
            | AppError::SellerNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Campo do payload ao qual o erro de domínio se refere, se houver.
    fn field(&self) -> Option<&'static str> {
        match self {
            AppError::MissingSalePrice | AppError::PriceBelowCost { .. } => Some("high_price"),
            AppError::FutureGroupDate | AppError::GroupDateAlreadyExists => Some("group_date"),
            AppError::UsernameAlreadyExists => Some("username"),
            AppError::EmailAlreadyExists | AppError::UnknownEmail => Some("email"),
            AppError::InvalidResetCode => Some("reset_code"),
            _ => None,
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::PriceBelowCost { high_price, low_price } => vec![
                ("high_price", high_price.to_string()),
                ("low_price", low_price.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let message = store.translate(&locale.0, self.code(), &self.params());

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            other => other
                .field()
                .map(|field| json!({ field: [message.clone()] })),
        };

        ApiError {
            status,
            error: message,
            details,
        }
    }
}

fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    json!(details)
}

// Resposta de erro já localizada.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelas rejeições de extratores, onde não há Locale disponível.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::new())
            .into_response()
    }
}
