// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{InventoryRepository, UserRepository},
    services::{
        auth::{AuthService, JwtKeys},
        inventory_service::InventoryService,
        password_reset::{LogMailer, PasswordResetService},
    },
};

// Configuração lida do ambiente (.env é carregado antes)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub reset_code_ttl_minutes: i64,
    pub mail_from: String,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 60)?,
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_TTL_DAYS", 7)?,
            reset_code_ttl_minutes: parse_or("RESET_CODE_TTL_MINUTES", 1440)?,
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@localhost".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub password_reset_service: PasswordResetService,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, settings: Settings) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let keys = JwtKeys::new(
            settings.jwt_secret.clone(),
            chrono::Duration::minutes(settings.access_token_ttl_minutes),
            chrono::Duration::days(settings.refresh_token_ttl_days),
        );
        let auth_service = AuthService::new(user_repo.clone(), keys);

        let mailer = Arc::new(LogMailer {
            from: settings.mail_from.clone(),
        });
        let password_reset_service = PasswordResetService::new(
            user_repo,
            mailer,
            chrono::Duration::minutes(settings.reset_code_ttl_minutes),
        );

        let inventory_service = InventoryService::new(inventory_repo);

        Self {
            db_pool,
            settings,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            password_reset_service,
            inventory_service,
        }
    }
}
