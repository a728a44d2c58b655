// src/models/relatorio.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::money::{from_cents, from_wide_cents};

// Agregados crus (centavos), acumulados em i128
#[derive(Debug, Default)]
pub struct TotaisVendas {
    pub total_vendas: i64,
    pub unidades_vendidas: i128,
    pub faturamento: i128,
    pub custo_vendas: i128,
}

#[derive(Debug, Default)]
pub struct TotaisEstoque {
    pub produtos_cadastrados: i64,
    pub unidades_em_estoque: i128,
    pub valor_em_estoque: i128,
    pub produtos_esgotados: i64,
}

// 1. Resumo geral (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoRelatorio {
    pub total_vendas: i64,
    pub unidades_vendidas: i64,
    pub faturamento: Decimal,
    pub custo_vendas: Decimal,
    pub lucro_bruto: Decimal,
    pub produtos_cadastrados: i64,
    pub unidades_em_estoque: i64,
    pub valor_em_estoque: Decimal,
    pub produtos_esgotados: i64,
}

impl ResumoRelatorio {
    pub fn from_rows(vendas: TotaisVendas, estoque: TotaisEstoque) -> Result<Self, AppError> {
        Ok(Self {
            total_vendas: vendas.total_vendas,
            unidades_vendidas: unidades(vendas.unidades_vendidas)?,
            faturamento: from_wide_cents(vendas.faturamento)?,
            custo_vendas: from_wide_cents(vendas.custo_vendas)?,
            lucro_bruto: from_wide_cents(vendas.faturamento - vendas.custo_vendas)?,
            produtos_cadastrados: estoque.produtos_cadastrados,
            unidades_em_estoque: unidades(estoque.unidades_em_estoque)?,
            valor_em_estoque: from_wide_cents(estoque.valor_em_estoque)?,
            produtos_esgotados: estoque.produtos_esgotados,
        })
    }
}

fn unidades(total: i128) -> Result<i64, AppError> {
    i64::try_from(total)
        .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("Total de unidades fora do intervalo: {}", total)))
}

// 2. Ranking de produtos mais vendidos
#[derive(Debug, FromRow)]
pub struct TopProdutoRow {
    pub produto_id: Uuid,
    pub nome: String,
    pub quantidade_vendida: i64,
    pub faturamento: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduto {
    pub produto_id: Uuid,
    pub nome: String,
    pub quantidade_vendida: i64,
    pub faturamento: Decimal,
}

impl From<TopProdutoRow> for TopProduto {
    fn from(row: TopProdutoRow) -> Self {
        Self {
            produto_id: row.produto_id,
            nome: row.nome,
            quantidade_vendida: row.quantidade_vendida,
            faturamento: from_cents(row.faturamento),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopProdutosQuery {
    /// Quantidade de produtos no ranking (padrão 5, máximo 50).
    pub limite: Option<i64>,
}
