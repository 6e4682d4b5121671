// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{PasswordResetCode, User},
};

/// Dados já validados (e com senha já em hash) para criar um usuário.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: Option<i16>,
    pub phone: Option<&'a str>,
}

/// Alterações de perfil; `None` mantém o valor atual.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i16>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

// Converte violação de chave única em um erro mais amigável
fn map_user_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("username") {
                return AppError::UsernameAlreadyExists;
            }
            if constraint.contains("email") {
                return AppError::EmailAlreadyExists;
            }
        }
    }
    e.into()
}

// O repositório de usuários, responsável pelas tabelas 'users', 'revoked_tokens'
// e 'password_reset_codes'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create_user<'e, E>(&self, executor: E, new_user: &NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, age, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.age)
        .bind(new_user.phone)
        .fetch_one(executor)
        .await
        .map_err(map_user_conflict)
    }

    pub async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                age = COALESCE($5, age),
                phone = COALESCE($6, phone),
                password_hash = COALESCE($7, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(changes.age)
        .bind(&changes.phone)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_conflict)?
        .ok_or(AppError::UserNotFound)
    }

    pub async fn set_password<'e, E>(&self, executor: E, id: Uuid, password_hash: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Cascata no banco remove grupos, vendedores e histórico do usuário.
    pub async fn delete_user(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Tokens revogados (logout)
    // ---

    pub async fn revoke_token(&self, jti: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn is_token_revoked(&self, jti: Uuid) -> Result<bool, AppError> {
        let revoked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)",
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await?;
        Ok(revoked)
    }

    // ---
    // Códigos de redefinição de senha
    // ---

    /// Mantém um único código ativo por usuário.
    pub async fn replace_reset_code(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        code: &str,
    ) -> Result<PasswordResetCode, AppError> {
        sqlx::query("DELETE FROM password_reset_codes WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query_as::<_, PasswordResetCode>(
            "INSERT INTO password_reset_codes (user_id, code) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(code)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Remove e devolve o código, se bater. Duas verificações simultâneas não
    /// conseguem consumir o mesmo código: a segunda espera a primeira e não acha a linha.
    pub async fn consume_reset_code<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<PasswordResetCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, PasswordResetCode>(
            "DELETE FROM password_reset_codes WHERE user_id = $1 AND code = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Conta uma tentativa errada; ao atingir `max_attempts` o código ativo é descartado.
    pub async fn register_failed_reset_attempt(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        max_attempts: i32,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE password_reset_codes SET attempts = attempts + 1 WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM password_reset_codes WHERE user_id = $1 AND attempts >= $2")
            .bind(user_id)
            .bind(max_attempts)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    pub async fn delete_reset_codes<'e, E>(&self, executor: E, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM password_reset_codes WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_user, test_pool, unique_email};

    #[tokio::test]
    async fn emails_differing_only_in_case_are_one_account() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepository::new(pool.clone());

        let email = unique_email("Bob");
        let bob = seed_user(&pool, &email).await;

        let err = repo
            .create_user(
                &pool,
                &NewUser {
                    username: &format!("u{}", Uuid::new_v4().simple()),
                    email: &email.to_lowercase(),
                    password_hash: "not-a-hash",
                    first_name: "",
                    last_name: "",
                    age: None,
                    phone: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists), "{err:?}");

        let found = repo.find_by_email(&email.to_uppercase()).await.unwrap().unwrap();
        assert_eq!(found.id, bob.id);
    }

    #[tokio::test]
    async fn profile_email_cannot_take_another_accounts_address_in_other_case() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepository::new(pool.clone());

        let taken = unique_email("Taken");
        seed_user(&pool, &taken).await;
        let other = seed_user(&pool, &unique_email("other")).await;

        let changes = ProfileChanges {
            email: Some(taken.to_uppercase()),
            ..Default::default()
        };
        let err = repo.update_profile(other.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists), "{err:?}");
    }

    #[tokio::test]
    async fn a_reset_code_is_consumed_once() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepository::new(pool.clone());
        let user = seed_user(&pool, &unique_email("once")).await;

        let mut conn = pool.acquire().await.unwrap();
        repo.replace_reset_code(&mut conn, user.id, "4821").await.unwrap();

        assert!(repo.consume_reset_code(&pool, user.id, "1111").await.unwrap().is_none());
        assert!(repo.consume_reset_code(&pool, user.id, "4821").await.unwrap().is_some());
        assert!(repo.consume_reset_code(&pool, user.id, "4821").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_attempts_discard_the_code_at_the_limit() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepository::new(pool.clone());
        let user = seed_user(&pool, &unique_email("attempts")).await;

        let mut conn = pool.acquire().await.unwrap();
        repo.replace_reset_code(&mut conn, user.id, "4821").await.unwrap();
        repo.register_failed_reset_attempt(&mut conn, user.id, 2).await.unwrap();

        // Ainda abaixo do limite: o código segue ativo.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_codes WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        repo.register_failed_reset_attempt(&mut conn, user.id, 2).await.unwrap();
        assert!(repo.consume_reset_code(&pool, user.id, "4821").await.unwrap().is_none());
    }
}
