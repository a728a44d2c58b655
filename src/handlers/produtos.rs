// src/handlers/produtos.rs

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::{ApiError, AppError},
        money::parse_decimal,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::produto::{AlteracaoProduto, ImagemUpload, NovoProduto, Produto, ProdutoForm},
};

// Campos crus do formulário multipart. Campos desconhecidos são ignorados.
#[derive(Debug, Default)]
struct CamposProduto {
    nome: Option<String>,
    preco_compra: Option<String>,
    quantidade_comprada: Option<String>,
    fornecedor: Option<String>,
    imagem: Option<ImagemUpload>,
}

async fn read_form(mut multipart: Multipart) -> Result<CamposProduto, AppError> {
    let mut campos = CamposProduto::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "imagem" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidMultipart(e.body_text()))?;
                // Navegadores mandam a parte vazia quando nenhum arquivo foi escolhido
                if !bytes.is_empty() {
                    campos.imagem = Some(ImagemUpload { file_name, bytes: bytes.to_vec() });
                }
            }
            "nome" | "precoCompra" | "quantidadeComprada" | "fornecedor" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidMultipart(e.body_text()))?;
                match name.as_str() {
                    "nome" => campos.nome = Some(text),
                    "precoCompra" => campos.preco_compra = Some(text),
                    "quantidadeComprada" => campos.quantidade_comprada = Some(text),
                    _ => campos.fornecedor = Some(text),
                }
            }
            _ => {}
        }
    }

    Ok(campos)
}

fn parse_preco(raw: &str) -> Result<Decimal, AppError> {
    parse_decimal(raw).ok_or_else(|| AppError::InvalidField("precoCompra".into()))
}

fn parse_quantidade(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidField("quantidadeComprada".into()))
}

impl CamposProduto {
    fn into_novo(self) -> Result<NovoProduto, AppError> {
        let nome = self.nome.ok_or_else(|| AppError::InvalidField("nome".into()))?;
        let preco_compra = self
            .preco_compra
            .as_deref()
            .ok_or_else(|| AppError::InvalidField("precoCompra".into()))
            .and_then(parse_preco)?;
        let quantidade_comprada = self
            .quantidade_comprada
            .as_deref()
            .ok_or_else(|| AppError::InvalidField("quantidadeComprada".into()))
            .and_then(parse_quantidade)?;

        Ok(NovoProduto {
            nome,
            preco_compra,
            quantidade_comprada,
            fornecedor: self.fornecedor,
            imagem: self.imagem,
        })
    }

    fn into_alteracao(self) -> Result<AlteracaoProduto, AppError> {
        Ok(AlteracaoProduto {
            nome: self.nome,
            preco_compra: self.preco_compra.as_deref().map(parse_preco).transpose()?,
            quantidade_comprada: self.quantidade_comprada.as_deref().map(parse_quantidade).transpose()?,
            // Campo presente (mesmo vazio) substitui o fornecedor
            fornecedor: self.fornecedor.map(Some),
            imagem: self.imagem,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produtos do usuário, mais recentes primeiro", body = Vec<Produto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_produtos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let produtos = app_state
        .product_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(produtos)))
}

#[utoipa::path(
    get,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_produto(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let produto = app_state
        .product_service
        .get(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(produto)))
}

#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body(content = ProdutoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Produto cadastrado com preço sugerido", body = Produto),
        (status = 400, description = "Campo ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_produto(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let novo = read_form(multipart)
        .await
        .and_then(CamposProduto::into_novo)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let produto = app_state
        .product_service
        .create(user.id, novo)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(produto)))
}

#[utoipa::path(
    put,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body(content = ProdutoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Produto atualizado", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_produto(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let alteracao = read_form(multipart)
        .await
        .and_then(CamposProduto::into_alteracao)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let produto = app_state
        .product_service
        .update(user.id, id, alteracao)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(produto)))
}

#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto e suas vendas excluídos"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_produto(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .product_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_fields_are_reported_by_name() {
        let campos = CamposProduto { nome: Some("Caneta".into()), ..Default::default() };
        match campos.into_novo() {
            Err(AppError::InvalidField(field)) => assert_eq!(field, "precoCompra"),
            other => panic!("esperava InvalidField, veio {:?}", other.map(|n| n.nome)),
        }
    }

    #[test]
    fn comma_decimal_and_blank_supplier_are_accepted() {
        let campos = CamposProduto {
            nome: Some("Caneta".into()),
            preco_compra: Some("2,50".into()),
            quantidade_comprada: Some(" 10 ".into()),
            fornecedor: Some(String::new()),
            imagem: None,
        };
        let novo = campos.into_novo().unwrap();
        assert_eq!(novo.preco_compra, Decimal::new(250, 2));
        assert_eq!(novo.quantidade_comprada, 10);
    }

    #[test]
    fn partial_update_keeps_absent_fields_untouched() {
        let campos = CamposProduto { quantidade_comprada: Some("200".into()), ..Default::default() };
        let alteracao = campos.into_alteracao().unwrap();
        assert_eq!(alteracao.quantidade_comprada, Some(200));
        assert!(alteracao.nome.is_none());
        assert!(alteracao.fornecedor.is_none());
    }
}
