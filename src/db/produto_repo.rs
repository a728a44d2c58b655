// src/db/produto_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::produto::ProdutoRow;

const PRODUTO_COLUMNS: &str = r#"
    id, user_id, nome, preco_compra, preco_venda_sugerido, quantidade_comprada,
    quantidade_disponivel, imagem, fornecedor, created_at
"#;

// Valores já em centavos / inteiros, prontos para gravação
pub struct ProdutoRecord<'a> {
    pub nome: &'a str,
    pub preco_compra: i64,
    pub preco_venda_sugerido: i64,
    pub quantidade_comprada: i64,
    pub quantidade_disponivel: i64,
    pub imagem: Option<&'a str>,
    pub fornecedor: Option<&'a str>,
}

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: SqlitePool,
}

impl ProdutoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Mais recentes primeiro
    pub async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ProdutoRow>, AppError> {
        let sql = format!(
            "SELECT {PRODUTO_COLUMNS} FROM produtos WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
        );
        Ok(sqlx::query_as::<_, ProdutoRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ProdutoRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {PRODUTO_COLUMNS} FROM produtos WHERE id = ?");
        Ok(sqlx::query_as::<_, ProdutoRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        record: ProdutoRecord<'_>,
    ) -> Result<ProdutoRow, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            INSERT INTO produtos (
                id, user_id, nome, preco_compra, preco_venda_sugerido,
                quantidade_comprada, quantidade_disponivel, imagem, fornecedor, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PRODUTO_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, ProdutoRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(record.nome)
            .bind(record.preco_compra)
            .bind(record.preco_venda_sugerido)
            .bind(record.quantidade_comprada)
            .bind(record.quantidade_disponivel)
            .bind(record.imagem)
            .bind(record.fornecedor)
            .bind(Utc::now())
            .fetch_one(executor)
            .await?)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        user_id: Uuid,
        record: ProdutoRecord<'_>,
    ) -> Result<ProdutoRow, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            UPDATE produtos
            SET nome = ?, preco_compra = ?, preco_venda_sugerido = ?,
                quantidade_comprada = ?, quantidade_disponivel = ?, imagem = ?, fornecedor = ?
            WHERE id = ? AND user_id = ?
            RETURNING {PRODUTO_COLUMNS}
            "#
        );
        sqlx::query_as::<_, ProdutoRow>(&sql)
            .bind(record.nome)
            .bind(record.preco_compra)
            .bind(record.preco_venda_sugerido)
            .bind(record.quantidade_comprada)
            .bind(record.quantidade_disponivel)
            .bind(record.imagem)
            .bind(record.fornecedor)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // Vendas do produto somem via ON DELETE CASCADE
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Baixa condicional: só debita se houver saldo. Devolve se a linha foi alterada.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        user_id: Uuid,
        quantidade: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE produtos
            SET quantidade_disponivel = quantidade_disponivel - ?
            WHERE id = ? AND user_id = ? AND quantidade_disponivel >= ?
            "#,
        )
        .bind(quantidade)
        .bind(id)
        .bind(user_id)
        .bind(quantidade)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn increment_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        user_id: Uuid,
        quantidade: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE produtos SET quantidade_disponivel = quantidade_disponivel + ? WHERE id = ? AND user_id = ?",
        )
        .bind(quantidade)
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
