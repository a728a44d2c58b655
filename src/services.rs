pub mod account_service;
pub mod auth;
pub mod image_store;
pub mod product_service;
pub mod report_service;
pub mod sale_service;
pub mod settings_service;
