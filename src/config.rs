// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    common::i18n::I18nStore,
    db::{ProdutoRepository, RelatorioRepository, SettingsRepository, UserRepository, VendaRepository},
    services::{
        account_service::AccountService, auth::AuthService, image_store::ImageStore,
        product_service::ProductService, report_service::ReportService, sale_service::SaleService,
        settings_service::SettingsService,
    },
};

const DEFAULT_DATABASE_URL: &str = "sqlite://estoque.db?mode=rwc";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub upload_dir: PathBuf,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub request_timeout: Duration,
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} possui um valor inválido: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET não pode ser vazio");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env_or("JWT_EXPIRATION_HOURS", 24)?,
            bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            upload_dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string())),
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            request_timeout: Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: AppConfig,
    pub i18n_store: I18nStore,
    pub images: ImageStore,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub product_service: ProductService,
    pub sale_service: SaleService,
    pub settings_service: SettingsService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("DATABASE_URL inválida: {}", config.database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // Monta o gráfico de dependências sobre um pool já aberto
    pub fn from_pool(db_pool: SqlitePool, config: AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let venda_repo = VendaRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let relatorio_repo = RelatorioRepository::new(db_pool.clone());

        let images = ImageStore::new(config.upload_dir.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            config.bcrypt_cost,
            db_pool.clone(),
        );
        let account_service = AccountService::new(user_repo, db_pool.clone());
        let settings_service = SettingsService::new(settings_repo);
        let product_service = ProductService::new(
            produto_repo.clone(),
            settings_service.clone(),
            images.clone(),
            db_pool.clone(),
        );
        let sale_service = SaleService::new(produto_repo, venda_repo, db_pool.clone());
        let report_service = ReportService::new(relatorio_repo);

        Self {
            db_pool,
            config,
            i18n_store: I18nStore::new(),
            images,
            auth_service,
            account_service,
            product_service,
            sale_service,
            settings_service,
            report_service,
        }
    }
}
