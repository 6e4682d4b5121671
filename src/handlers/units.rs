// src/handlers/units.rs
//
// Unidades (ProductSize). Criação e PUT passam pelo mesmo caminho de escrita,
// que mantém o histórico de vendas em sincronia com `have`.

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
    models::inventory::{ProductSize, UnitState},
};

fn default_have() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUnitPayload {
    pub product_id: Uuid,

    #[validate(range(min = 0, message = "O tamanho não pode ser negativo."))]
    pub size: i32,

    /// true = em estoque (padrão)
    #[serde(default = "default_have")]
    pub have: bool,

    #[validate(range(min = 0, message = "O preço de venda não pode ser negativo."))]
    pub high_price: Option<i32>,

    pub seller_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUnitPayload {
    #[validate(range(min = 0, message = "O tamanho não pode ser negativo."))]
    pub size: i32,

    pub have: bool,

    #[validate(range(min = 0, message = "O preço de venda não pode ser negativo."))]
    pub high_price: Option<i32>,

    pub seller_id: Option<Uuid>,
}

impl CreateUnitPayload {
    fn state(&self) -> UnitState {
        UnitState {
            size: self.size,
            have: self.have,
            high_price: self.high_price,
            seller_id: self.seller_id,
        }
    }
}

impl From<UpdateUnitPayload> for UnitState {
    fn from(p: UpdateUnitPayload) -> Self {
        Self {
            size: p.size,
            have: p.have,
            high_price: p.high_price,
            seller_id: p.seller_id,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/product_size",
    tag = "Units",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Unidade criada", body = ProductSize),
        (status = 400, description = "Preço de venda ausente ou abaixo do custo"),
        (status = 403, description = "Produto de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let unit = app_state
        .inventory_service
        .create_unit(user.id, payload.product_id, payload.state())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/product_size/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade", body = ProductSize),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(unit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = app_state
        .inventory_service
        .get_unit(user.id, unit_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    put,
    path = "/api/product_size/{id}",
    tag = "Units",
    request_body = UpdateUnitPayload,
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 200, description = "Unidade atualizada", body = ProductSize),
        (status = 400, description = "Preço de venda ausente ou abaixo do custo"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<UpdateUnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let unit = app_state
        .inventory_service
        .update_unit(user.id, unit_id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    delete,
    path = "/api/product_size/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses(
        (status = 204, description = "Unidade removida"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(unit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_unit(user.id, unit_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_units_default_to_in_stock() {
        let payload: CreateUnitPayload = serde_json::from_value(serde_json::json!({
            "product_id": Uuid::new_v4(),
            "size": 42
        }))
        .unwrap();

        let state = payload.state();
        assert!(state.have);
        assert_eq!(state.high_price, None);
        assert_eq!(state.seller_id, None);
    }

    #[test]
    fn negative_prices_are_rejected_before_the_store() {
        let payload = UpdateUnitPayload {
            size: 42,
            have: false,
            high_price: Some(-5),
            seller_id: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("high_price"));
    }
}
