// src/common/ownership.rs

use uuid::Uuid;

use crate::common::error::AppError;

/// Entidades com dono (row-level tenancy).
pub trait Owned {
    fn owner_id(&self) -> Uuid;

    /// Erro devolvido quando a entidade não existe ou pertence a outra conta.
    /// Os dois casos são indistinguíveis para o cliente.
    fn not_found() -> AppError;
}

pub fn belongs_to<T: Owned>(entity: &T, caller_id: Uuid) -> bool {
    entity.owner_id() == caller_id
}

/// Único predicado de autorização usado pelos serviços antes de ler ou alterar
/// um produto/venda.
pub fn ensure_owned<T: Owned>(entity: Option<T>, caller_id: Uuid) -> Result<T, AppError> {
    match entity {
        Some(e) if belongs_to(&e, caller_id) => Ok(e),
        _ => Err(T::not_found()),
    }
}
