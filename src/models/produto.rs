// src/models/produto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::money::from_cents;
use crate::common::ownership::Owned;

// Linha crua da tabela 'produtos' (preços em centavos)
#[derive(Debug, Clone, FromRow)]
pub struct ProdutoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nome: String,
    pub preco_compra: i64,
    pub preco_venda_sugerido: i64,
    pub quantidade_comprada: i64,
    pub quantidade_disponivel: i64,
    pub imagem: Option<String>,
    pub fornecedor: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Produto como exposto pela API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Camiseta básica")]
    pub nome: String,
    #[schema(example = 10.0)]
    pub preco_compra: Decimal,
    #[schema(example = 15.0)]
    pub preco_venda_sugerido: Decimal,
    #[schema(example = 100)]
    pub quantidade_comprada: i64,
    #[schema(example = 70)]
    pub quantidade_disponivel: i64,
    pub imagem: Option<String>,
    pub fornecedor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProdutoRow> for Produto {
    fn from(row: ProdutoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            nome: row.nome,
            preco_compra: from_cents(row.preco_compra),
            preco_venda_sugerido: from_cents(row.preco_venda_sugerido),
            quantidade_comprada: row.quantidade_comprada,
            quantidade_disponivel: row.quantidade_disponivel,
            imagem: row.imagem,
            fornecedor: row.fornecedor,
            created_at: row.created_at,
        }
    }
}

impl Owned for ProdutoRow {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn not_found() -> AppError {
        AppError::ProductNotFound
    }
}

// Imagem recebida no formulário multipart
#[derive(Debug, Clone)]
pub struct ImagemUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

// Comando de criação já validado (vindo do formulário multipart)
#[derive(Debug, Clone)]
pub struct NovoProduto {
    pub nome: String,
    pub preco_compra: Decimal,
    pub quantidade_comprada: i64,
    pub fornecedor: Option<String>,
    pub imagem: Option<ImagemUpload>,
}

// Alteração parcial: `None` mantém o valor anterior.
// `fornecedor: Some(None)` limpa o fornecedor.
#[derive(Debug, Clone, Default)]
pub struct AlteracaoProduto {
    pub nome: Option<String>,
    pub preco_compra: Option<Decimal>,
    pub quantidade_comprada: Option<i64>,
    pub fornecedor: Option<Option<String>>,
    pub imagem: Option<ImagemUpload>,
}

// Documentação do formulário multipart (apenas para o OpenAPI)
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ProdutoForm {
    #[schema(example = "Camiseta básica")]
    pub nome: String,
    #[schema(example = "10.00")]
    pub preco_compra: String,
    #[schema(example = "100")]
    pub quantidade_comprada: String,
    pub fornecedor: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub imagem: Option<Vec<u8>>,
}
