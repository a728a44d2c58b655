// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::common::error::{map_unique_violation, AppError};
use crate::models::auth::{DocumentType, User};

const USER_COLUMNS: &str = r#"
    id, username, password_hash, nome_completo, documento, tipo_documento, created_at,
    is_admin, is_approved, is_blocked, block_reason, blocked_at, approved_by, approved_at
"#;

// Dados já normalizados para o INSERT
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub nome_completo: &'a str,
    pub documento: &'a str,
    pub tipo_documento: DocumentType,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    // Cria uma conta pendente (não aprovada, não admin, não bloqueada).
    // Violações de UNIQUE viram UsernameAlreadyExists / DocumentAlreadyExists.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (id, username, password_hash, nome_completo, documento, tipo_documento, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_user.username)
            .bind(new_user.password_hash)
            .bind(new_user.nome_completo)
            .bind(new_user.documento)
            .bind(new_user.tipo_documento)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn list_pending(&self) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_approved = 0 ORDER BY created_at ASC, rowid ASC"
        );
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, rowid ASC");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    /// Promove a conta mais antiga a admin aprovado se ainda não houver admin.
    /// Um único UPDATE condicional: duas chamadas simultâneas não promovem duas contas.
    pub async fn promote_first_admin(&self, now: DateTime<Utc>) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET is_admin = 1, is_approved = 1, approved_at = COALESCE(approved_at, ?)
            WHERE id = (SELECT id FROM users ORDER BY created_at ASC, rowid ASC LIMIT 1)
              AND NOT EXISTS (SELECT 1 FROM users WHERE is_admin = 1)
            RETURNING {USER_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Só altera contas ainda pendentes; devolve se houve transição.
    pub async fn approve(&self, id: Uuid, admin_id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_approved = 1, approved_by = ?, approved_at = ?
            WHERE id = ? AND is_approved = 0
            "#,
        )
        .bind(admin_id)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn block(&self, id: Uuid, reason: Option<&str>, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_blocked = 1, block_reason = ?, blocked_at = ? WHERE id = ?")
            .bind(reason)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn unblock(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_blocked = 0, block_reason = NULL, blocked_at = NULL WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Produtos e vendas somem via ON DELETE CASCADE
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
