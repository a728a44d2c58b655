// src/db/relatorio_repo.rs

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::relatorio::{TotaisEstoque, TotaisVendas, TopProdutoRow};

#[derive(Clone)]
pub struct RelatorioRepository {
    pool: SqlitePool,
}

impl RelatorioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Custo das vendas usa o preço de compra atual do produto.
    // Somas em i128 no Rust: `quantidade × preço` estoura o INTEGER do SQLite.
    pub async fn resumo_vendas(&self, user_id: Uuid) -> Result<TotaisVendas, AppError> {
        let linhas = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT v.quantidade_vendida, v.valor_total, p.preco_compra
            FROM vendas v
            JOIN produtos p ON p.id = v.produto_id
            WHERE v.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas.into_iter().fold(TotaisVendas::default(), |mut acc, (quantidade, total, custo)| {
            acc.total_vendas += 1;
            acc.unidades_vendidas += i128::from(quantidade);
            acc.faturamento += i128::from(total);
            acc.custo_vendas += i128::from(quantidade) * i128::from(custo);
            acc
        }))
    }

    pub async fn resumo_estoque(&self, user_id: Uuid) -> Result<TotaisEstoque, AppError> {
        let linhas = sqlx::query_as::<_, (i64, i64)>(
            "SELECT quantidade_disponivel, preco_compra FROM produtos WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas.into_iter().fold(TotaisEstoque::default(), |mut acc, (disponivel, preco)| {
            acc.produtos_cadastrados += 1;
            acc.unidades_em_estoque += i128::from(disponivel);
            acc.valor_em_estoque += i128::from(disponivel) * i128::from(preco);
            if disponivel == 0 {
                acc.produtos_esgotados += 1;
            }
            acc
        }))
    }

    // Ranking por unidades vendidas (Curva ABC)
    pub async fn top_produtos(&self, user_id: Uuid, limite: i64) -> Result<Vec<TopProdutoRow>, AppError> {
        let rows = sqlx::query_as::<_, TopProdutoRow>(
            r#"
            SELECT
                p.id AS produto_id,
                p.nome AS nome,
                SUM(v.quantidade_vendida) AS quantidade_vendida,
                SUM(v.valor_total) AS faturamento
            FROM vendas v
            JOIN produtos p ON p.id = v.produto_id
            WHERE v.user_id = ?
            GROUP BY p.id, p.nome
            ORDER BY quantidade_vendida DESC, faturamento DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
