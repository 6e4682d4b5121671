// src/handlers/history.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::reports::HistoryView,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Vendas a partir deste dia (inclusive)
    pub sold_date_gte: Option<NaiveDate>,
    /// Vendas até este dia (inclusive)
    pub sold_date_lte: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/history",
    tag = "History",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Vendas do usuário, mais recentes primeiro", body = HistoryView)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_history(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .inventory_service
        .history(user.id, query.sold_date_gte, query.sold_date_lte)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(history)))
}
