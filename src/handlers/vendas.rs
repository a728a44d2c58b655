// src/handlers/vendas.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::json_body,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::venda::{NovaVenda, RegistrarVendaPayload, Venda, VendaDetalhe},
};

// Só chamado depois de `validate()`, que já garante os campos obrigatórios
fn into_command(payload: RegistrarVendaPayload) -> Result<NovaVenda, AppError> {
    Ok(NovaVenda {
        produto_id: payload
            .produto_id
            .ok_or_else(|| AppError::InvalidField("produtoId".into()))?,
        quantidade: payload
            .quantidade_vendida
            .ok_or_else(|| AppError::InvalidField("quantidadeVendida".into()))?,
        preco_unitario: payload
            .preco_venda
            .ok_or_else(|| AppError::InvalidField("precoVenda".into()))?,
        observacoes: payload.observacoes,
    })
}

#[utoipa::path(
    get,
    path = "/api/vendas",
    tag = "Vendas",
    responses(
        (status = 200, description = "Vendas do usuário, mais recentes primeiro", body = Vec<VendaDetalhe>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vendas(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let vendas = app_state
        .sale_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(vendas)))
}

#[utoipa::path(
    get,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com dados do produto", body = VendaDetalhe),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_venda(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let venda = app_state
        .sale_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(venda)))
}

#[utoipa::path(
    post,
    path = "/api/vendas",
    tag = "Vendas",
    request_body = RegistrarVendaPayload,
    responses(
        (status = 201, description = "Venda registrada e estoque debitado", body = Venda),
        (status = 400, description = "Dados inválidos ou estoque insuficiente"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn registrar_venda(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<RegistrarVendaPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload, &locale, &app_state.i18n_store)?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let nova = into_command(payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let venda = app_state
        .sale_service
        .register(user.id, nova)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(venda)))
}

#[utoipa::path(
    delete,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda cancelada e estoque devolvido"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancelar_venda(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sale_service
        .cancel(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
