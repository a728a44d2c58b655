pub mod auth;
pub mod produto;
pub mod relatorio;
pub mod settings;
pub mod venda;
