// src/services/sale_service.rs

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{checked_price, round_currency, to_cents},
        ownership::ensure_owned,
    },
    db::{begin_write, venda_repo::VendaRecord, ProdutoRepository, VendaRepository},
    models::venda::{NovaVenda, Venda, VendaDetalhe},
};

/// valor total = quantidade × preço unitário, arredondado em centavos.
pub fn sale_total(quantidade: i64, preco_unitario: Decimal) -> Result<Decimal, AppError> {
    Decimal::from(quantidade)
        .checked_mul(preco_unitario)
        .map(round_currency)
        .ok_or_else(|| AppError::InvalidField("precoVenda".into()))
}

#[derive(Clone)]
pub struct SaleService {
    produto_repo: ProdutoRepository,
    venda_repo: VendaRepository,
    pool: SqlitePool,
}

impl SaleService {
    pub fn new(produto_repo: ProdutoRepository, venda_repo: VendaRepository, pool: SqlitePool) -> Self {
        Self { produto_repo, venda_repo, pool }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<VendaDetalhe>, AppError> {
        let rows = self.venda_repo.list_by_owner(owner_id).await?;
        Ok(rows.into_iter().map(VendaDetalhe::from).collect())
    }

    pub async fn get(&self, owner_id: Uuid, venda_id: Uuid) -> Result<VendaDetalhe, AppError> {
        let row = self.venda_repo.find_detail(venda_id).await?;
        Ok(ensure_owned(row, owner_id)?.into())
    }

    /// Registra a venda e debita o estoque numa única transação.
    /// Ou as duas coisas acontecem, ou nenhuma.
    pub async fn register(&self, owner_id: Uuid, nova: NovaVenda) -> Result<Venda, AppError> {
        if nova.quantidade < 1 {
            return Err(AppError::InvalidField("quantidadeVendida".into()));
        }
        let preco_unitario = checked_price(nova.preco_unitario, "precoVenda")?;

        let mut tx = begin_write(&self.pool).await?;

        // 1. Baixa condicional (só debita se houver saldo)
        let debitado = self
            .produto_repo
            .decrement_stock(&mut *tx, nova.produto_id, owner_id, nova.quantidade)
            .await?;

        // 2. Produto precisa existir e ser do usuário
        let produto = ensure_owned(
            self.produto_repo.find_by_id(&mut *tx, nova.produto_id).await?,
            owner_id,
        )?;

        // 3. Sem saldo: nada foi alterado
        if !debitado {
            return Err(AppError::InsufficientStock { available: produto.quantidade_disponivel });
        }

        // 4. Total só depois do saldo confirmado; estouro desfaz a baixa
        let valor_total = sale_total(nova.quantidade, preco_unitario)?;

        // 5. Grava a venda com o nome do produto no momento
        let row = self
            .venda_repo
            .insert(
                &mut *tx,
                owner_id,
                VendaRecord {
                    produto_id: produto.id,
                    produto_nome: &produto.nome,
                    quantidade_vendida: nova.quantidade,
                    preco_venda: to_cents(preco_unitario)?,
                    valor_total: to_cents(valor_total)?,
                    observacoes: nova.observacoes.as_deref().map(str::trim).filter(|o| !o.is_empty()),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            venda_id = %row.id,
            produto_id = %produto.id,
            quantidade = nova.quantidade,
            %owner_id,
            "💰 Venda registrada"
        );
        Ok(row.into())
    }

    /// Cancela a venda: remove o registro e devolve as unidades ao produto.
    pub async fn cancel(&self, owner_id: Uuid, venda_id: Uuid) -> Result<(), AppError> {
        let mut tx = begin_write(&self.pool).await?;

        let venda = ensure_owned(
            self.venda_repo.delete(&mut *tx, venda_id, owner_id).await?,
            owner_id,
        )?;

        // Produto excluído leva as vendas junto (cascata), então ele existe aqui
        self.produto_repo
            .increment_stock(&mut *tx, venda.produto_id, owner_id, venda.quantidade_vendida)
            .await?;

        tx.commit().await?;

        tracing::info!(%venda_id, produto_id = %venda.produto_id, %owner_id, "Venda cancelada, estoque devolvido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn total_is_quantity_times_unit_price() {
        assert_eq!(sale_total(30, Decimal::from_str("15").unwrap()).unwrap(), Decimal::from(450));
        assert_eq!(
            sale_total(3, Decimal::from_str("3.33").unwrap()).unwrap(),
            Decimal::from_str("9.99").unwrap()
        );
        assert_eq!(sale_total(5, Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn total_overflow_is_an_error() {
        let result = sale_total(9_000_000_000_000_000_000, Decimal::from(1_000_000_000_000_i64));
        assert!(matches!(result, Err(AppError::InvalidField(_))));
    }
}
