// src/handlers/password_reset.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{MessageResponse, PasswordResetRequestPayload, VerifyResetCodePayload},
};

#[utoipa::path(
    post,
    path = "/api/password_reset",
    tag = "Auth",
    request_body = PasswordResetRequestPayload,
    responses(
        (status = 200, description = "Código enviado", body = MessageResponse),
        (status = 400, description = "E-mail desconhecido")
    )
)]
pub async fn request_reset(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PasswordResetRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .password_reset_service
        .request_reset(&payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "PASSWORD_RESET_SENT", &[]);
    Ok((StatusCode::OK, Json(MessageResponse { message })))
}

#[utoipa::path(
    post,
    path = "/api/password_reset/verify_code",
    tag = "Auth",
    request_body = VerifyResetCodePayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "Código inválido ou expirado")
    )
)]
pub async fn verify_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<VerifyResetCodePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .password_reset_service
        .verify_and_reset(&payload.email, payload.reset_code, &payload.new_password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .i18n_store
        .translate(&locale.0, "PASSWORD_RESET_DONE", &[]);
    Ok((StatusCode::OK, Json(MessageResponse { message })))
}
