// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::relatorio::{ResumoRelatorio, TopProduto, TopProdutosQuery},
};

#[utoipa::path(
    get,
    path = "/api/relatorios/resumo",
    tag = "Relatórios",
    responses(
        (status = 200, description = "Totais de vendas e estoque do usuário", body = ResumoRelatorio)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let resumo = app_state
        .report_service
        .resumo(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resumo)))
}

#[utoipa::path(
    get,
    path = "/api/relatorios/top-produtos",
    tag = "Relatórios",
    params(TopProdutosQuery),
    responses(
        (status = 200, description = "Produtos mais vendidos (unidades)", body = Vec<TopProduto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_produtos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<TopProdutosQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ranking = app_state
        .report_service
        .top_produtos(user.id, query.limite)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ranking)))
}
