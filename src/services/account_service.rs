// src/services/account_service.rs
//
// Ciclo de vida das contas: Pending -> Approved, com a flag Blocked ortogonal.
// Não existe transição de Approved de volta para Pending.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AccountState, User},
};

#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(user_repo: UserRepository, pool: SqlitePool) -> Self {
        Self { user_repo, pool }
    }

    /// Idempotente: se nenhuma conta é admin, promove a mais antiga a admin aprovado.
    /// Devolve a conta promovida, se houve promoção.
    pub async fn ensure_first_admin(&self) -> Result<Option<User>, AppError> {
        let promoted = self.user_repo.promote_first_admin(Utc::now()).await?;

        if let Some(admin) = &promoted {
            tracing::info!(user_id = %admin.id, username = %admin.username, "👑 Primeira conta promovida a administrador");
        }
        Ok(promoted)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn list_pending(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_pending().await
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    // Aprovar uma conta já aprovada não muda nada (mantém o aprovador original)
    pub async fn approve_user(&self, admin_id: Uuid, target_id: Uuid) -> Result<User, AppError> {
        let target = self.get_user(target_id).await?;

        if target.state() == AccountState::Pending {
            self.user_repo.approve(target_id, admin_id, Utc::now()).await?;
            tracing::info!(%admin_id, %target_id, "Conta aprovada");
        }

        self.get_user(target_id).await
    }

    // Rejeição = exclusão de uma conta ainda pendente
    pub async fn reject_user(&self, admin_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        let target = self.get_user(target_id).await?;

        if target.is_admin {
            return Err(AppError::AdminTargetForbidden);
        }
        if target.state() == AccountState::Approved {
            return Err(AppError::AccountAlreadyApproved);
        }

        if !self.user_repo.delete(target_id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!(%admin_id, %target_id, "Conta rejeitada");
        Ok(())
    }

    pub async fn block_user(
        &self,
        admin_id: Uuid,
        target_id: Uuid,
        reason: Option<&str>,
    ) -> Result<User, AppError> {
        let target = self.get_user(target_id).await?;

        if target.is_admin {
            return Err(AppError::AdminTargetForbidden);
        }

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        self.user_repo.block(target_id, reason, Utc::now()).await?;
        tracing::info!(%admin_id, %target_id, ?reason, "Conta bloqueada");

        self.get_user(target_id).await
    }

    pub async fn unblock_user(&self, admin_id: Uuid, target_id: Uuid) -> Result<User, AppError> {
        self.get_user(target_id).await?;

        self.user_repo.unblock(target_id).await?;
        tracing::info!(%admin_id, %target_id, "Conta desbloqueada");

        self.get_user(target_id).await
    }

    // Exclusão definitiva de conta não-admin (produtos e vendas em cascata)
    pub async fn delete_user(&self, admin_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        let target = self.get_user(target_id).await?;

        if target.is_admin {
            return Err(AppError::AdminTargetForbidden);
        }

        if !self.user_repo.delete(target_id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!(%admin_id, %target_id, "Conta excluída");
        Ok(())
    }
}
