// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{
        AccessTokenResponse, AuthResponse, LoginUserPayload, RefreshTokenPayload,
        RegisterUserPayload, UpdateProfilePayload, User,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome de usuário ou e-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .register_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 205, description = "Refresh token revogado"),
        (status = 400, description = "Token malformado ou expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .auth_service
        .logout(&payload.refresh)
        .await
        .map_err(|e| {
            let invalid = matches!(e, AppError::InvalidToken);
            let mut api = e.to_api_error(&locale, &app_state.i18n_store);
            // Aqui o token é dado do corpo, não credencial
            if invalid {
                api.status = StatusCode::BAD_REQUEST;
            }
            api
        })?;

    Ok(StatusCode::RESET_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/auth/token/refresh",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 200, description = "Novo access token", body = AccessTokenResponse),
        (status = 401, description = "Refresh token inválido ou revogado")
    )
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let access = app_state
        .auth_service
        .refresh_access(&payload.refresh)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(AccessTokenResponse { access })))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil", body = User),
        (status = 403, description = "Perfil de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .auth_service
        .get_profile(user.id, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Users",
    request_body = UpdateProfilePayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil atualizado", body = User),
        (status = 403, description = "Perfil de outro usuário"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let profile = app_state
        .auth_service
        .update_profile(user.id, user_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Conta removida com todo o estoque"),
        (status = 403, description = "Conta de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .delete_account(user.id, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
