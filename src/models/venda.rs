// src/models/venda.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::money::from_cents;
use crate::common::ownership::Owned;

// Linha crua da tabela 'vendas'
#[derive(Debug, Clone, FromRow)]
pub struct VendaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub produto_id: Uuid,
    pub produto_nome: String,
    pub quantidade_vendida: i64,
    pub preco_venda: i64,
    pub valor_total: i64,
    pub data_venda: DateTime<Utc>,
    pub observacoes: Option<String>,
}

impl Owned for VendaRow {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn not_found() -> AppError {
        AppError::SaleNotFound
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venda {
    pub id: Uuid,
    pub user_id: Uuid,
    pub produto_id: Uuid,
    pub produto_nome: String,
    #[schema(example = 30)]
    pub quantidade_vendida: i64,
    #[schema(example = 15.0)]
    pub preco_venda: Decimal,
    #[schema(example = 450.0)]
    pub valor_total: Decimal,
    pub data_venda: DateTime<Utc>,
    pub observacoes: Option<String>,
}

impl From<VendaRow> for Venda {
    fn from(row: VendaRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            produto_id: row.produto_id,
            produto_nome: row.produto_nome,
            quantidade_vendida: row.quantidade_vendida,
            preco_venda: from_cents(row.preco_venda),
            valor_total: from_cents(row.valor_total),
            data_venda: row.data_venda,
            observacoes: row.observacoes,
        }
    }
}

// Venda + campos do produto (JOIN) para as telas de listagem/detalhe
#[derive(Debug, Clone, FromRow)]
pub struct VendaDetalheRow {
    #[sqlx(flatten)]
    pub venda: VendaRow,
    pub produto_preco_compra: Option<i64>,
    pub produto_quantidade_disponivel: Option<i64>,
    pub produto_imagem: Option<String>,
}

impl Owned for VendaDetalheRow {
    fn owner_id(&self) -> Uuid {
        self.venda.user_id
    }

    fn not_found() -> AppError {
        AppError::SaleNotFound
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendaDetalhe {
    #[serde(flatten)]
    pub venda: Venda,
    pub preco_compra: Option<Decimal>,
    pub quantidade_disponivel: Option<i64>,
    pub imagem: Option<String>,
}

impl From<VendaDetalheRow> for VendaDetalhe {
    fn from(row: VendaDetalheRow) -> Self {
        Self {
            venda: row.venda.into(),
            preco_compra: row.produto_preco_compra.map(from_cents),
            quantidade_disponivel: row.produto_quantidade_disponivel,
            imagem: row.produto_imagem,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarVendaPayload {
    #[validate(required(message = "O campo 'produtoId' é obrigatório."))]
    pub produto_id: Option<Uuid>,

    #[validate(
        required(message = "O campo 'quantidadeVendida' é obrigatório."),
        range(min = 1, message = "A quantidade vendida deve ser maior que zero.")
    )]
    #[schema(example = 30)]
    pub quantidade_vendida: Option<i64>,

    #[validate(
        required(message = "O campo 'precoVenda' é obrigatório."),
        custom(function = "validate_not_negative")
    )]
    #[schema(example = 15.0)]
    pub preco_venda: Option<Decimal>,

    #[validate(length(max = 1000, message = "As observações devem ter no máximo 1000 caracteres."))]
    pub observacoes: Option<String>,
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), validator::ValidationError> {
    if val.is_sign_negative() {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Comando já validado
#[derive(Debug, Clone)]
pub struct NovaVenda {
    pub produto_id: Uuid,
    pub quantidade: i64,
    pub preco_unitario: Decimal,
    pub observacoes: Option<String>,
}
