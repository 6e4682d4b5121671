// src/handlers/sellers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::inventory::Seller,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SellerPayload {
    #[validate(length(min = 1, max = 32, message = "O nome deve ter entre 1 e 32 caracteres."))]
    pub seller_name: String,
}

#[utoipa::path(
    get,
    path = "/api/seller",
    tag = "Sellers",
    responses(
        (status = 200, description = "Vendedores do usuário", body = [Seller])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sellers(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let sellers = app_state
        .inventory_service
        .list_sellers(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sellers)))
}

#[utoipa::path(
    post,
    path = "/api/seller",
    tag = "Sellers",
    request_body = SellerPayload,
    responses(
        (status = 201, description = "Vendedor criado", body = Seller)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_seller(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SellerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let seller = app_state
        .inventory_service
        .create_seller(user.id, &payload.seller_name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(seller)))
}

#[utoipa::path(
    get,
    path = "/api/seller/{id}",
    tag = "Sellers",
    params(("id" = Uuid, Path, description = "ID do vendedor")),
    responses(
        (status = 200, description = "Vendedor", body = Seller),
        (status = 404, description = "Vendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_seller(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(seller_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let seller = app_state
        .inventory_service
        .get_seller(user.id, seller_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(seller)))
}

#[utoipa::path(
    put,
    path = "/api/seller/{id}",
    tag = "Sellers",
    request_body = SellerPayload,
    params(("id" = Uuid, Path, description = "ID do vendedor")),
    responses(
        (status = 200, description = "Vendedor renomeado", body = Seller),
        (status = 404, description = "Vendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_seller(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(seller_id): Path<Uuid>,
    Json(payload): Json<SellerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let seller = app_state
        .inventory_service
        .rename_seller(user.id, seller_id, &payload.seller_name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(seller)))
}

#[utoipa::path(
    delete,
    path = "/api/seller/{id}",
    tag = "Sellers",
    params(("id" = Uuid, Path, description = "ID do vendedor")),
    responses(
        (status = 204, description = "Vendedor removido; unidades ficam sem vendedor"),
        (status = 404, description = "Vendedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_seller(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(seller_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_seller(user.id, seller_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
