// src/handlers/products.rs

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
    models::{
        inventory::{Product, ProductFields},
        reports::ProductDetail,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductPayload {
    pub group_id: Uuid,

    #[validate(url(message = "A imagem deve ser uma URL."))]
    pub image: Option<String>,

    #[validate(length(min = 1, max = 64, message = "O nome deve ter entre 1 e 64 caracteres."))]
    pub product_name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "O preço de compra não pode ser negativo."))]
    pub low_price: i32,

    #[validate(length(max = 32, message = "O artigo deve ter no máximo 32 caracteres."))]
    pub article: Option<String>,
}

// PUT substitui todos os campos editáveis; o grupo não muda.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductPayload {
    #[validate(url(message = "A imagem deve ser uma URL."))]
    pub image: Option<String>,

    #[validate(length(min = 1, max = 64, message = "O nome deve ter entre 1 e 64 caracteres."))]
    pub product_name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "O preço de compra não pode ser negativo."))]
    pub low_price: i32,

    #[validate(length(max = 32, message = "O artigo deve ter no máximo 32 caracteres."))]
    pub article: Option<String>,
}

impl From<CreateProductPayload> for ProductFields {
    fn from(p: CreateProductPayload) -> Self {
        Self {
            image: p.image,
            product_name: p.product_name,
            description: p.description,
            low_price: p.low_price,
            article: p.article,
        }
    }
}

impl From<UpdateProductPayload> for ProductFields {
    fn from(p: UpdateProductPayload) -> Self {
        Self {
            image: p.image,
            product_name: p.product_name,
            description: p.description,
            low_price: p.low_price,
            article: p.article,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/product",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let group_id = payload.group_id;
    let product = app_state
        .inventory_service
        .create_product(user.id, group_id, &payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto com unidades e lucro por unidade", body = ProductDetail),
        (status = 403, description = "Produto de outro usuário"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .inventory_service
        .product_detail(user.id, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    put,
    path = "/api/product/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDetail),
        (status = 400, description = "Custo acima de um preço de venda já registrado"),
        (status = 403, description = "Produto de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .inventory_service
        .update_product(user.id, product_id, &payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/product/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 403, description = "Produto de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_product(user.id, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateProductPayload {
        CreateProductPayload {
            group_id: Uuid::new_v4(),
            image: None,
            product_name: "Air Max 90".into(),
            description: None,
            low_price: 100,
            article: Some("DM0029-100".into()),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn negative_cost_and_long_names_are_rejected() {
        let mut p = payload();
        p.low_price = -1;
        p.product_name = "x".repeat(65);
        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("low_price"));
        assert!(fields.contains_key("product_name"));
    }

    #[test]
    fn image_must_be_a_url() {
        let mut p = payload();
        p.image = Some("not a url".into());
        assert!(p.validate().is_err());

        p.image = Some("https://cdn.example.com/a.png".into());
        assert!(p.validate().is_ok());
    }
}
