// src/db/venda_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::venda::{VendaDetalheRow, VendaRow};

const VENDA_COLUMNS: &str = r#"
    id, user_id, produto_id, produto_nome, quantidade_vendida,
    preco_venda, valor_total, data_venda, observacoes
"#;

// JOIN com produtos para os campos de exibição
const VENDA_DETALHE_SELECT: &str = r#"
    SELECT
        v.id, v.user_id, v.produto_id, v.produto_nome, v.quantidade_vendida,
        v.preco_venda, v.valor_total, v.data_venda, v.observacoes,
        p.preco_compra AS produto_preco_compra,
        p.quantidade_disponivel AS produto_quantidade_disponivel,
        p.imagem AS produto_imagem
    FROM vendas v
    LEFT JOIN produtos p ON p.id = v.produto_id
"#;

pub struct VendaRecord<'a> {
    pub produto_id: Uuid,
    pub produto_nome: &'a str,
    pub quantidade_vendida: i64,
    pub preco_venda: i64,
    pub valor_total: i64,
    pub observacoes: Option<&'a str>,
}

#[derive(Clone)]
pub struct VendaRepository {
    pool: SqlitePool,
}

impl VendaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<VendaDetalheRow>, AppError> {
        let sql = format!(
            "{VENDA_DETALHE_SELECT} WHERE v.user_id = ? ORDER BY v.data_venda DESC, v.rowid DESC"
        );
        Ok(sqlx::query_as::<_, VendaDetalheRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<VendaDetalheRow>, AppError> {
        let sql = format!("{VENDA_DETALHE_SELECT} WHERE v.id = ?");
        Ok(sqlx::query_as::<_, VendaDetalheRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        record: VendaRecord<'_>,
    ) -> Result<VendaRow, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            INSERT INTO vendas (
                id, user_id, produto_id, produto_nome, quantidade_vendida,
                preco_venda, valor_total, data_venda, observacoes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {VENDA_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, VendaRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(record.produto_id)
            .bind(record.produto_nome)
            .bind(record.quantidade_vendida)
            .bind(record.preco_venda)
            .bind(record.valor_total)
            .bind(Utc::now())
            .bind(record.observacoes)
            .fetch_one(executor)
            .await?)
    }

    /// Remove a venda do dono e devolve a linha apagada.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid, user_id: Uuid) -> Result<Option<VendaRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("DELETE FROM vendas WHERE id = ? AND user_id = ? RETURNING {VENDA_COLUMNS}");
        Ok(sqlx::query_as::<_, VendaRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?)
    }
}
