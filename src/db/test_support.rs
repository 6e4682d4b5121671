// src/db/test_support.rs
//
// Postgres real para os testes de repositório. Sem DATABASE_URL esses testes retornam cedo.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::{user_repo::NewUser, UserRepository},
    models::auth::User,
};

pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL ausente; pulando teste com banco");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("conexão com o banco de testes");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("migrações no banco de testes");
    Some(pool)
}

/// E-mail que não colide entre execuções.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

pub async fn seed_user(pool: &PgPool, email: &str) -> User {
    let username = format!("u{}", Uuid::new_v4().simple());
    UserRepository::new(pool.clone())
        .create_user(
            pool,
            &NewUser {
                username: &username,
                email,
                password_hash: "not-a-hash",
                first_name: "",
                last_name: "",
                age: None,
                phone: None,
            },
        )
        .await
        .expect("usuário de teste")
}
