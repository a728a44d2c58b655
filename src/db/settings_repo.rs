use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;

// Linha de 'configuracoes' (chave/valor)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingRow {
    pub chave: String,
    pub valor: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get<'e, E>(&self, executor: E, chave: &str) -> Result<Option<SettingRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let setting = sqlx::query_as::<_, SettingRow>(
            "SELECT chave, valor, updated_at FROM configuracoes WHERE chave = ?",
        )
        .bind(chave)
        .fetch_optional(executor)
        .await?;
        Ok(setting)
    }

    // UPSERT (Insert or Update): no máximo uma linha por chave
    pub async fn upsert(&self, chave: &str, valor: &str) -> Result<SettingRow, AppError> {
        let setting = sqlx::query_as::<_, SettingRow>(
            r#"
            INSERT INTO configuracoes (chave, valor, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (chave)
            DO UPDATE SET
                valor = excluded.valor,
                updated_at = excluded.updated_at
            RETURNING chave, valor, updated_at
            "#,
        )
        .bind(chave)
        .bind(valor)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }
}
