// src/services/settings_service.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{ProfitMargin, PROFIT_MARGIN_KEY},
};

/// Margem usada quando a configuração ainda não existe (50%).
pub const DEFAULT_PROFIT_MARGIN: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Teto da margem (10000%).
pub const MAX_PROFIT_MARGIN: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

fn margin_in_range(value: Decimal) -> bool {
    !value.is_sign_negative() && value <= MAX_PROFIT_MARGIN
}

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository) -> Self {
        Self { repo }
    }

    /// Margem vigente lida no executor recebido (pool ou transação).
    pub async fn current_margin<'e, E>(&self, executor: E) -> Result<ProfitMargin, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let setting = self.repo.get(executor, PROFIT_MARGIN_KEY).await?;

        let margin = match setting {
            Some(row) => match Decimal::from_str(row.valor.trim()) {
                Ok(value) if margin_in_range(value) => ProfitMargin {
                    profit_margin: value,
                    updated_at: Some(row.updated_at),
                },
                _ => {
                    tracing::warn!(valor = %row.valor, "Margem gravada inválida; usando o padrão");
                    ProfitMargin { profit_margin: DEFAULT_PROFIT_MARGIN, updated_at: None }
                }
            },
            None => ProfitMargin { profit_margin: DEFAULT_PROFIT_MARGIN, updated_at: None },
        };
        Ok(margin)
    }

    // Não recalcula o preço sugerido dos produtos existentes
    pub async fn set_margin(&self, value: Option<Decimal>) -> Result<ProfitMargin, AppError> {
        let value = value.ok_or(AppError::InvalidMargin)?;
        if !margin_in_range(value) {
            return Err(AppError::InvalidMargin);
        }

        let row = self
            .repo
            .upsert(PROFIT_MARGIN_KEY, &value.normalize().to_string())
            .await?;

        tracing::info!(margem = %value, "Margem de lucro atualizada");
        Ok(ProfitMargin { profit_margin: value, updated_at: Some(row.updated_at) })
    }
}
