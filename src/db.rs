pub mod user_repo;
pub use user_repo::UserRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod venda_repo;
pub use venda_repo::VendaRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod relatorio_repo;
pub use relatorio_repo::RelatorioRepository;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::common::error::AppError;

/// Transação que já começa com o lock de escrita (`BEGIN IMMEDIATE`).
/// Evita o `SQLITE_BUSY` de quem lê primeiro e tenta escrever depois.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, AppError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
