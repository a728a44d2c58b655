pub mod admin;
pub mod auth;
pub mod produtos;
pub mod relatorios;
pub mod settings;
pub mod vendas;

use axum::{extract::rejection::JsonRejection, Json};

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    middleware::i18n::Locale,
};

// Corpo JSON malformado ou incompleto vira 400 no formato padrão de erro
pub(crate) fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    locale: &Locale,
    store: &I18nStore,
) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidField(rejection.body_text()).to_api_error(locale, store))
}
