// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{checked_price, from_cents, round_currency, to_cents, MAX_QUANTIDADE},
        ownership::ensure_owned,
    },
    db::{begin_write, produto_repo::ProdutoRecord, ProdutoRepository},
    models::produto::{AlteracaoProduto, NovoProduto, Produto},
    services::{image_store::ImageStore, settings_service::SettingsService},
};

/// preço sugerido = preço de compra × (1 + margem), arredondado em centavos.
pub fn suggested_price(preco_compra: Decimal, margin: Decimal) -> Result<Decimal, AppError> {
    Decimal::ONE
        .checked_add(margin)
        .and_then(|fator| preco_compra.checked_mul(fator))
        .map(round_currency)
        .ok_or_else(|| AppError::InvalidField("precoCompra".into()))
}

/// Mantém a proporção disponível/comprada quando a quantidade comprada muda (piso).
pub fn rescale_available(disponivel: i64, comprada_anterior: i64, comprada_nova: i64) -> Result<i64, AppError> {
    if comprada_anterior <= 0 {
        return Ok(comprada_nova);
    }
    let scaled = (i128::from(disponivel) * i128::from(comprada_nova)) / i128::from(comprada_anterior);
    i64::try_from(scaled).map_err(|_| AppError::InvalidField("quantidadeComprada".into()))
}

fn validate_nome(nome: &str) -> Result<String, AppError> {
    let nome = nome.trim();
    if nome.is_empty() {
        return Err(AppError::InvalidField("nome".into()));
    }
    Ok(nome.to_string())
}

fn validate_preco_compra(preco: Decimal) -> Result<Decimal, AppError> {
    checked_price(preco, "precoCompra")
}

fn validate_quantidade_comprada(quantidade: i64) -> Result<i64, AppError> {
    if !(1..=MAX_QUANTIDADE).contains(&quantidade) {
        return Err(AppError::InvalidField("quantidadeComprada".into()));
    }
    Ok(quantidade)
}

fn normalize_fornecedor(fornecedor: Option<String>) -> Option<String> {
    fornecedor
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
}

#[derive(Clone)]
pub struct ProductService {
    repo: ProdutoRepository,
    settings_service: SettingsService,
    images: ImageStore,
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(
        repo: ProdutoRepository,
        settings_service: SettingsService,
        images: ImageStore,
        pool: SqlitePool,
    ) -> Self {
        Self { repo, settings_service, images, pool }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Produto>, AppError> {
        let rows = self.repo.list_by_owner(owner_id).await?;
        Ok(rows.into_iter().map(Produto::from).collect())
    }

    pub async fn get(&self, owner_id: Uuid, produto_id: Uuid) -> Result<Produto, AppError> {
        let row = self.repo.find_by_id(&self.pool, produto_id).await?;
        Ok(ensure_owned(row, owner_id)?.into())
    }

    pub async fn create(&self, owner_id: Uuid, novo: NovoProduto) -> Result<Produto, AppError> {
        let nome = validate_nome(&novo.nome)?;
        let preco_compra = validate_preco_compra(novo.preco_compra)?;
        let quantidade_comprada = validate_quantidade_comprada(novo.quantidade_comprada)?;
        let fornecedor = normalize_fornecedor(novo.fornecedor);

        let imagem = match &novo.imagem {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };

        let result = self
            .insert_product(owner_id, &nome, preco_compra, quantidade_comprada, fornecedor.as_deref(), imagem.as_deref())
            .await;

        match result {
            Ok(produto) => {
                tracing::info!(produto_id = %produto.id, %owner_id, "Produto cadastrado");
                Ok(produto)
            }
            Err(e) => {
                // A imagem já foi gravada; sem a linha ela ficaria órfã
                if let Some(imagem) = &imagem {
                    self.images.remove(imagem).await;
                }
                Err(e)
            }
        }
    }

    async fn insert_product(
        &self,
        owner_id: Uuid,
        nome: &str,
        preco_compra: Decimal,
        quantidade_comprada: i64,
        fornecedor: Option<&str>,
        imagem: Option<&str>,
    ) -> Result<Produto, AppError> {
        let mut tx = begin_write(&self.pool).await?;

        // Margem lida no momento da escrita
        let margin = self.settings_service.current_margin(&mut *tx).await?.profit_margin;
        let sugerido = suggested_price(preco_compra, margin)?;

        let row = self
            .repo
            .insert(
                &mut *tx,
                owner_id,
                ProdutoRecord {
                    nome,
                    preco_compra: to_cents(preco_compra)?,
                    preco_venda_sugerido: to_cents(sugerido)?,
                    quantidade_comprada,
                    quantidade_disponivel: quantidade_comprada,
                    imagem,
                    fornecedor,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        produto_id: Uuid,
        alteracao: AlteracaoProduto,
    ) -> Result<Produto, AppError> {
        let mut tx = begin_write(&self.pool).await?;

        let atual = ensure_owned(self.repo.find_by_id(&mut *tx, produto_id).await?, owner_id)?;

        let nome = match &alteracao.nome {
            Some(nome) => validate_nome(nome)?,
            None => atual.nome.clone(),
        };
        let preco_compra = match alteracao.preco_compra {
            Some(preco) => validate_preco_compra(preco)?,
            None => from_cents(atual.preco_compra),
        };
        let (quantidade_comprada, quantidade_disponivel) = match alteracao.quantidade_comprada {
            Some(nova) if nova != atual.quantidade_comprada => {
                let nova = validate_quantidade_comprada(nova)?;
                (
                    nova,
                    rescale_available(atual.quantidade_disponivel, atual.quantidade_comprada, nova)?,
                )
            }
            _ => (atual.quantidade_comprada, atual.quantidade_disponivel),
        };
        let fornecedor = match alteracao.fornecedor {
            Some(f) => normalize_fornecedor(f),
            None => atual.fornecedor.clone(),
        };

        let margin = self.settings_service.current_margin(&mut *tx).await?.profit_margin;
        let sugerido = suggested_price(preco_compra, margin)?;

        let nova_imagem = match &alteracao.imagem {
            Some(upload) => Some(self.images.save(upload).await?),
            None => None,
        };
        let imagem = nova_imagem.clone().or_else(|| atual.imagem.clone());

        let updated = async {
            let row = self
                .repo
                .update(
                    &mut *tx,
                    produto_id,
                    owner_id,
                    ProdutoRecord {
                        nome: &nome,
                        preco_compra: to_cents(preco_compra)?,
                        preco_venda_sugerido: to_cents(sugerido)?,
                        quantidade_comprada,
                        quantidade_disponivel,
                        imagem: imagem.as_deref(),
                        fornecedor: fornecedor.as_deref(),
                    },
                )
                .await?;
            tx.commit().await?;
            Ok::<_, AppError>(row)
        }
        .await;

        match updated {
            Ok(row) => {
                // Troca de imagem: a antiga sai só depois do commit
                if let (Some(_), Some(antiga)) = (&nova_imagem, &atual.imagem) {
                    self.images.remove(antiga).await;
                }
                tracing::info!(%produto_id, %owner_id, "Produto atualizado");
                Ok(row.into())
            }
            Err(e) => {
                if let Some(nova) = &nova_imagem {
                    self.images.remove(nova).await;
                }
                Err(e)
            }
        }
    }

    pub async fn delete(&self, owner_id: Uuid, produto_id: Uuid) -> Result<(), AppError> {
        let produto = ensure_owned(self.repo.find_by_id(&self.pool, produto_id).await?, owner_id)?;

        if !self.repo.delete(produto_id, owner_id).await? {
            return Err(AppError::ProductNotFound);
        }

        if let Some(imagem) = &produto.imagem {
            self.images.remove(imagem).await;
        }
        tracing::info!(%produto_id, %owner_id, "Produto excluído");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn suggested_price_applies_margin() {
        assert_eq!(suggested_price(d("10"), d("0.5")).unwrap(), d("15"));
        assert_eq!(suggested_price(d("10"), d("0.2")).unwrap(), d("12"));
        assert_eq!(suggested_price(d("9.99"), d("0.333")).unwrap(), d("13.32"));
        assert_eq!(suggested_price(d("7"), Decimal::ZERO).unwrap(), d("7"));
    }

    #[test]
    fn suggested_price_overflow_is_an_error() {
        assert!(matches!(suggested_price(Decimal::MAX, d("1")), Err(AppError::InvalidField(_))));
        assert!(matches!(suggested_price(d("10"), Decimal::MAX), Err(AppError::InvalidField(_))));
        // Maiores valores aceitos na entrada ainda cabem em centavos
        let teto = suggested_price(Decimal::from(crate::common::money::MAX_VALOR), d("100")).unwrap();
        assert!(to_cents(teto).is_ok());
    }

    #[test]
    fn rescale_keeps_ratio_with_floor() {
        assert_eq!(rescale_available(70, 100, 200).unwrap(), 140);
        assert_eq!(rescale_available(70, 100, 50).unwrap(), 35);
        assert_eq!(rescale_available(1, 3, 10).unwrap(), 3);
        assert_eq!(rescale_available(0, 10, 50).unwrap(), 0);
        assert!(rescale_available(i64::MAX, 1, 2).is_err());
    }

    #[test]
    fn invalid_inputs_are_bad_requests() {
        assert!(matches!(validate_nome("   "), Err(AppError::InvalidField(_))));
        assert!(matches!(validate_preco_compra(d("-1")), Err(AppError::InvalidField(_))));
        assert!(matches!(validate_quantidade_comprada(0), Err(AppError::InvalidField(_))));
        assert!(matches!(validate_quantidade_comprada(MAX_QUANTIDADE + 1), Err(AppError::InvalidField(_))));
        assert!(matches!(validate_preco_compra(Decimal::MAX), Err(AppError::InvalidField(_))));
        assert_eq!(normalize_fornecedor(Some("  ".into())), None);
    }
}
