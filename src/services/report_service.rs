// src/services/report_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RelatorioRepository,
    models::relatorio::{ResumoRelatorio, TopProduto},
};

pub const DEFAULT_TOP_LIMIT: i64 = 5;
pub const MAX_TOP_LIMIT: i64 = 50;

pub fn clamp_limit(limite: Option<i64>) -> i64 {
    limite.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT)
}

#[derive(Clone)]
pub struct ReportService {
    repo: RelatorioRepository,
}

impl ReportService {
    pub fn new(repo: RelatorioRepository) -> Self {
        Self { repo }
    }

    pub async fn resumo(&self, owner_id: Uuid) -> Result<ResumoRelatorio, AppError> {
        let vendas = self.repo.resumo_vendas(owner_id).await?;
        let estoque = self.repo.resumo_estoque(owner_id).await?;
        ResumoRelatorio::from_rows(vendas, estoque)
    }

    pub async fn top_produtos(&self, owner_id: Uuid, limite: Option<i64>) -> Result<Vec<TopProduto>, AppError> {
        let rows = self.repo.top_produtos(owner_id, clamp_limit(limite)).await?;
        Ok(rows.into_iter().map(TopProduto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 5);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(500)), 50);
    }
}
