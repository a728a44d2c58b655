// src/common/money.rs
//
// Valores monetários trafegam como `Decimal` na API e são gravados em centavos (INTEGER).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::error::AppError;

/// Maior valor monetário aceito na entrada (R$ 1 trilhão).
pub const MAX_VALOR: i64 = 1_000_000_000_000;

/// Maior quantidade aceita na entrada.
pub const MAX_QUANTIDADE: i64 = 1_000_000_000;

/// Arredonda para 2 casas decimais (meio para longe do zero).
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_cents(value: Decimal) -> Result<i64, AppError> {
    round_currency(value)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| i64::try_from(cents.trunc()).ok())
        .ok_or_else(|| AppError::InvalidField(format!("valor fora do intervalo: {}", value)))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Somatórios de centavos feitos em i128 (relatórios).
pub fn from_wide_cents(cents: i128) -> Result<Decimal, AppError> {
    Decimal::try_from_i128_with_scale(cents, 2)
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Total fora do intervalo: {}", e)))
}

/// Preço não negativo e até `MAX_VALOR`, já arredondado em centavos.
pub fn checked_price(value: Decimal, field: &str) -> Result<Decimal, AppError> {
    if value.is_sign_negative() || value > Decimal::from(MAX_VALOR) {
        return Err(AppError::InvalidField(field.to_string()));
    }
    Ok(round_currency(value))
}

/// Aceita "10.5", "10,5" ou " 10 ".
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.trim().replace(',', ".").parse::<Decimal>().ok()
}
