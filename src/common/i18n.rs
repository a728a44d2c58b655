// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens em português. Placeholders posicionais: {0}, {1}...
const PT: &[(&str, &str)] = &[
    ("validation_error", "Um ou mais campos são inválidos."),
    ("invalid_field", "Campo obrigatório ausente ou inválido: {0}."),
    ("invalid_multipart", "Formulário inválido: {0}."),
    ("invalid_document", "Documento inválido: CPF deve ter 11 dígitos e CNPJ 14 dígitos."),
    ("invalid_margin", "A margem de lucro deve ser um número entre 0 e 100."),
    ("insufficient_stock", "Estoque insuficiente. Disponível: {0}."),
    ("username_exists", "Este nome de usuário já está em uso."),
    ("document_exists", "Este documento já está cadastrado."),
    ("invalid_credentials", "Usuário ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("pending_approval", "Sua conta está aguardando aprovação do administrador."),
    ("account_blocked", "Sua conta está bloqueada."),
    ("account_blocked_reason", "Sua conta está bloqueada. Motivo: {0}"),
    ("admin_required", "Acesso restrito a administradores."),
    ("admin_target", "Esta operação não pode ser aplicada a um administrador."),
    ("already_approved", "A conta já foi aprovada; use a exclusão em vez da rejeição."),
    ("user_not_found", "Usuário não encontrado."),
    ("product_not_found", "Produto não encontrado."),
    ("sale_not_found", "Venda não encontrada."),
    ("internal_error", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation_error", "One or more fields are invalid."),
    ("invalid_field", "Missing or invalid field: {0}."),
    ("invalid_multipart", "Invalid form: {0}."),
    ("invalid_document", "Invalid document: CPF must have 11 digits and CNPJ 14 digits."),
    ("invalid_margin", "Profit margin must be a number between 0 and 100."),
    ("insufficient_stock", "Insufficient stock. Available: {0}."),
    ("username_exists", "This username is already taken."),
    ("document_exists", "This document is already registered."),
    ("invalid_credentials", "Invalid username or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("pending_approval", "Your account is pending administrator approval."),
    ("account_blocked", "Your account is blocked."),
    ("account_blocked_reason", "Your account is blocked. Reason: {0}"),
    ("admin_required", "Administrator access required."),
    ("admin_target", "This operation cannot target an administrator."),
    ("already_approved", "The account is already approved; delete it instead of rejecting."),
    ("user_not_found", "User not found."),
    ("product_not_found", "Product not found."),
    ("sale_not_found", "Sale not found."),
    ("internal_error", "An unexpected error occurred."),
];

/// Catálogo de mensagens por idioma, compartilhado pelo `AppState`.
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages: Arc::new(messages) }
    }
}

impl I18nStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traduz `key` para `lang`, caindo para o português e, por fim, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[&str]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter()
            .enumerate()
            .fold(template.to_string(), |msg, (i, arg)| {
                msg.replace(&format!("{{{}}}", i), arg)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_with_placeholders() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("en", "insufficient_stock", &["7"]),
            "Insufficient stock. Available: 7."
        );
    }

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("de", "product_not_found", &[]),
            "Produto não encontrado."
        );
    }

    #[test]
    fn unknown_key_returns_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "nope", &[]), "nope");
    }
}
