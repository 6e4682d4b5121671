// src/services/password_reset.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{
    common::error::AppError,
    db::UserRepository,
    services::auth::hash_password,
};

/// Canal de notificação (e-mail) usado para entregar o código.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Entrega "de desenvolvimento": apenas registra a mensagem no log.
pub struct LogMailer {
    pub from: String,
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        tracing::info!(from = %self.from, to, subject, body, "📧 e-mail enviado");
        Ok(())
    }
}

/// Tentativas erradas aceitas antes de descartar o código ativo.
pub const MAX_RESET_ATTEMPTS: i32 = 5;

/// Código aleatório de 4 dígitos (1000..=9999).
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

pub fn reset_message(code: &str) -> String {
    format!("Your password reset code: {code}")
}

pub fn is_expired(created_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    created_at + ttl < now
}

#[derive(Clone)]
pub struct PasswordResetService {
    user_repo: UserRepository,
    mailer: Arc<dyn Mailer>,
    code_ttl: Duration,
}

impl PasswordResetService {
    pub fn new(user_repo: UserRepository, mailer: Arc<dyn Mailer>, code_ttl: Duration) -> Self {
        Self {
            user_repo,
            mailer,
            code_ttl,
        }
    }

    /// Gera um novo código e o envia. Se o envio falhar, o código não fica gravado.
    pub async fn request_reset(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UnknownEmail)?;

        let code = generate_code();

        let mut tx = self.user_repo.pool().begin().await?;
        self.user_repo
            .replace_reset_code(&mut *tx, user.id, &code)
            .await?;

        self.mailer
            .send(&user.email, "Password reset", &reset_message(&code))
            .await?;

        tx.commit().await?;
        tracing::info!(user_id = %user.id, "código de redefinição emitido");
        Ok(())
    }

    /// Consome o código e troca a senha na mesma transação; cada código vale uma vez.
    pub async fn verify_and_reset(
        &self,
        email: &str,
        reset_code: u32,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidResetCode)?;

        let code = reset_code.to_string();
        let mut tx = self.user_repo.pool().begin().await?;

        let row = match self
            .user_repo
            .consume_reset_code(&mut *tx, user.id, &code)
            .await?
        {
            Some(row) => row,
            None => {
                self.user_repo
                    .register_failed_reset_attempt(&mut *tx, user.id, MAX_RESET_ATTEMPTS)
                    .await?;
                tx.commit().await?;
                tracing::warn!(user_id = %user.id, "código de redefinição incorreto");
                return Err(AppError::InvalidResetCode);
            }
        };

        // Código vencido sai do banco do mesmo jeito.
        if is_expired(row.created_at, self.code_ttl, Utc::now()) {
            tx.commit().await?;
            return Err(AppError::InvalidResetCode);
        }

        let hashed = hash_password(new_password).await?;
        self.user_repo.set_password(&mut *tx, user.id, &hashed).await?;
        self.user_repo.delete_reset_codes(&mut *tx, user.id).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "senha redefinida");
        Ok(())
    }
}
