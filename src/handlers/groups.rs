// src/handlers/groups.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::inventory_repo::{GroupFilter, GroupOrdering},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        inventory::Group,
        reports::{GroupDetail, GroupSummary},
    },
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateGroupPayload {
    /// Ausente = hoje
    pub group_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupListQuery {
    /// Só grupos com uma unidade em estoque deste tamanho
    pub size: Option<i32>,
    pub have: Option<bool>,
    pub search: Option<String>,
    /// group_date, -group_date, created_date ou -created_date
    pub ordering: Option<String>,
}

impl GroupListQuery {
    fn into_filter(self) -> Result<GroupFilter, AppError> {
        let ordering = match self.ordering.as_deref() {
            None | Some("") => GroupOrdering::default(),
            Some(raw) => GroupOrdering::parse(raw).ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                let mut err = ValidationError::new("invalid_ordering");
                err.message = Some(format!("Ordenação desconhecida: {raw}").into());
                errors.add("ordering", err);
                AppError::ValidationError(errors)
            })?,
        };

        Ok(GroupFilter {
            size: self.size,
            have: self.have,
            search: self.search.filter(|s| !s.trim().is_empty()),
            ordering,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/group",
    tag = "Groups",
    request_body = CreateGroupPayload,
    responses(
        (status = 201, description = "Grupo criado", body = Group),
        (status = 400, description = "Data no futuro"),
        (status = 409, description = "Já existe um grupo nesta data")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_group(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Option<Json<CreateGroupPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let group = app_state
        .inventory_service
        .create_group(user.id, payload.group_date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/group",
    tag = "Groups",
    params(GroupListQuery),
    responses(
        (status = 200, description = "Grupos do usuário com totais", body = [GroupSummary])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_groups(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<GroupListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query
        .into_filter()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let groups = app_state
        .inventory_service
        .list_groups(user.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(groups)))
}

#[utoipa::path(
    get,
    path = "/api/group/{id}",
    tag = "Groups",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 200, description = "Grupo com seus produtos", body = GroupDetail),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_group(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .inventory_service
        .group_detail(user.id, group_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/group/{id}",
    tag = "Groups",
    params(("id" = Uuid, Path, description = "ID do grupo")),
    responses(
        (status = 204, description = "Grupo removido"),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_group(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_group(user.id, group_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ordering_defaults_to_newest_group_first() {
        let filter = GroupListQuery::default().into_filter().unwrap();
        assert_eq!(filter.ordering, GroupOrdering::GroupDateDesc);
    }

    #[test]
    fn unknown_ordering_is_a_field_error() {
        let query = GroupListQuery {
            ordering: Some("price".into()),
            ..Default::default()
        };
        match query.into_filter() {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.field_errors().contains_key("ordering"));
            }
            other => panic!("esperava erro de validação, veio {other:?}"),
        }
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = GroupListQuery {
            search: Some("   ".into()),
            size: Some(42),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert!(filter.search.is_none());
        assert_eq!(filter.size, Some(42));
    }
}
