use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo obrigatório ausente ou inválido: {0}")]
    InvalidField(String),

    #[error("Formulário multipart inválido: {0}")]
    InvalidMultipart(String),

    #[error("Documento inválido")]
    InvalidDocument,

    #[error("Margem de lucro inválida")]
    InvalidMargin,

    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: i64 },

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Documento já cadastrado")]
    DocumentAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta aguardando aprovação")]
    AccountPendingApproval,

    #[error("Conta bloqueada")]
    AccountBlocked(Option<String>),

    #[error("Acesso restrito a administradores")]
    AdminRequired,

    #[error("Operação não permitida sobre administradores")]
    AdminTargetForbidden,

    #[error("Conta já aprovada")]
    AccountAlreadyApproved,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Venda não encontrada")]
    SaleNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro "pronto para o cliente": status + mensagem traduzida + detalhes opcionais.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidField(_)
            | AppError::InvalidMultipart(_)
            | AppError::InvalidDocument
            | AppError::InvalidMargin
            | AppError::InsufficientStock { .. }
            | AppError::AccountAlreadyApproved => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AccountPendingApproval
            | AppError::AccountBlocked(_)
            | AppError::AdminRequired
            | AppError::AdminTargetForbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ProductNotFound | AppError::SaleNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::UsernameAlreadyExists | AppError::DocumentAlreadyExists => {
                StatusCode::CONFLICT
            }
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Chave da mensagem no I18nStore.
    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidField(_) => "invalid_field",
            AppError::InvalidMultipart(_) => "invalid_multipart",
            AppError::InvalidDocument => "invalid_document",
            AppError::InvalidMargin => "invalid_margin",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::UsernameAlreadyExists => "username_exists",
            AppError::DocumentAlreadyExists => "document_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::AccountPendingApproval => "pending_approval",
            AppError::AccountBlocked(Some(_)) => "account_blocked_reason",
            AppError::AccountBlocked(None) => "account_blocked",
            AppError::AdminRequired => "admin_required",
            AppError::AdminTargetForbidden => "admin_target",
            AppError::AccountAlreadyApproved => "already_approved",
            AppError::UserNotFound => "user_not_found",
            AppError::ProductNotFound => "product_not_found",
            AppError::SaleNotFound => "sale_not_found",
            _ => "internal_error",
        }
    }

    fn message_args(&self) -> Vec<String> {
        match self {
            AppError::InvalidField(field) => vec![field.clone()],
            AppError::InvalidMultipart(reason) => vec![reason.clone()],
            AppError::InsufficientStock { available } => vec![available.to_string()],
            AppError::AccountBlocked(Some(reason)) => vec![reason.clone()],
            _ => Vec::new(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::InvalidCredentials => Some(json!({ "code": "INVALID_CREDENTIALS" })),
            AppError::AccountPendingApproval => Some(json!({ "code": "PENDING_APPROVAL" })),
            AppError::AccountBlocked(reason) => {
                Some(json!({ "code": "ACCOUNT_BLOCKED", "reason": reason }))
            }
            AppError::InsufficientStock { available } => {
                Some(json!({ "code": "INSUFFICIENT_STOCK", "available": available }))
            }
            _ => None,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let args = self.message_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        ApiError {
            status,
            error: store.translate(&locale.0, self.message_key(), &args),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}

// Converte violações de UNIQUE do SQLite em erros de domínio.
// O SQLite reporta "UNIQUE constraint failed: tabela.coluna".
pub fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return AppError::UsernameAlreadyExists;
            }
            if message.contains("users.documento") {
                return AppError::DocumentAlreadyExists;
            }
        }
    }
    e.into()
}
