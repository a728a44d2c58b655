// src/handlers/settings.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::json_body,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::settings::{ProfitMargin, UpdateProfitMarginRequest},
};

// GET /api/settings/profit-margin
#[utoipa::path(
    get,
    path = "/api/settings/profit-margin",
    tag = "Settings",
    responses(
        (status = 200, description = "Margem de lucro global vigente", body = ProfitMargin)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profit_margin(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let margin = app_state
        .settings_service
        .current_margin(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(margin)))
}

// PUT /api/settings/profit-margin
#[utoipa::path(
    put,
    path = "/api/settings/profit-margin",
    tag = "Settings",
    request_body = UpdateProfitMarginRequest,
    responses(
        (status = 200, description = "Margem atualizada; produtos existentes mantêm o preço sugerido", body = ProfitMargin),
        (status = 400, description = "Margem ausente ou negativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profit_margin(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<UpdateProfitMarginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload, &locale, &app_state.i18n_store)?;

    let updated = app_state
        .settings_service
        .set_margin(payload.profit_margin)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(user_id = %user.id, "Margem alterada via API");
    Ok((StatusCode::OK, Json(updated)))
}
