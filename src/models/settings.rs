// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Chave única da margem global em 'configuracoes'
pub const PROFIT_MARGIN_KEY: &str = "profitMargin";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitMargin {
    /// Fração aplicada ao preço de compra (0.5 = 50%).
    #[schema(example = 0.5)]
    pub profit_margin: Decimal,

    // Ausente quando ainda vale o padrão
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfitMarginRequest {
    /// Entre 0 e 100.
    #[schema(example = 0.2, minimum = 0, maximum = 100)]
    pub profit_margin: Option<Decimal>,
}
