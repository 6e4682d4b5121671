// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        user_repo::{NewUser, ProfileChanges},
        UserRepository,
    },
    models::auth::{
        AuthResponse, Claims, RegisterUserPayload, TokenKind, UpdateProfilePayload, User,
        UserBrief,
    },
    services::stock::ensure_owner,
};

// Hash fora do runtime async: bcrypt é CPU-bound.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

/// Emissão e leitura dos JWTs (HS256) de acesso e de refresh.
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: String, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user_id,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
            typ: kind,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?)
    }

    /// Decodifica e exige o tipo esperado (um refresh token não autentica rotas).
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?
        .claims;

        if claims.typ != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, keys: JwtKeys) -> Self {
        Self { user_repo, keys }
    }

    fn token_pair(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            user: UserBrief {
                username: user.username.clone(),
                email: user.email.clone(),
            },
            access: self.keys.issue(user.id, TokenKind::Access)?,
            refresh: self.keys.issue(user.id, TokenKind::Refresh)?,
        })
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let new_user = self
            .user_repo
            .create_user(
                self.user_repo.pool(),
                &NewUser {
                    username: &payload.username,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    first_name: &payload.first_name,
                    last_name: &payload.last_name,
                    age: payload.age,
                    phone: payload.phone.as_deref(),
                },
            )
            .await?;

        tracing::info!(user_id = %new_user.id, "✅ Usuário registrado");
        self.token_pair(&new_user)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.token_pair(&user)
    }

    /// Usado pelo auth_guard: só tokens de acesso, de usuários existentes.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.decode(token, TokenKind::Access)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn refresh_access(&self, refresh: &str) -> Result<String, AppError> {
        let claims = self.keys.decode(refresh, TokenKind::Refresh)?;

        if self.user_repo.is_token_revoked(claims.jti).await? {
            return Err(AppError::InvalidToken);
        }
        if self.user_repo.find_by_id(claims.sub).await?.is_none() {
            return Err(AppError::InvalidToken);
        }

        self.keys.issue(claims.sub, TokenKind::Access)
    }

    /// Logout = revogar o refresh token (equivalente ao "blacklist").
    pub async fn logout(&self, refresh: &str) -> Result<(), AppError> {
        let claims = self.keys.decode(refresh, TokenKind::Refresh)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)
            .ok_or(AppError::InvalidToken)?;

        self.user_repo
            .revoke_token(claims.jti, claims.sub, expires_at)
            .await?;
        tracing::info!(user_id = %claims.sub, "refresh token revogado");
        Ok(())
    }

    pub async fn get_profile(&self, actor_id: Uuid, user_id: Uuid) -> Result<User, AppError> {
        ensure_owner(actor_id, user_id)?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_profile(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<User, AppError> {
        ensure_owner(actor_id, user_id)?;

        let password_hash = match &payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let changes = ProfileChanges {
            email: payload.email.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            age: payload.age,
            phone: payload.phone.clone(),
            password_hash,
        };
        self.user_repo.update_profile(user_id, &changes).await
    }

    pub async fn delete_account(&self, actor_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        ensure_owner(actor_id, user_id)?;
        if self.user_repo.delete_user(user_id).await? == 0 {
            return Err(AppError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "conta removida");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret".into(), Duration::minutes(5), Duration::days(1))
    }

    #[test]
    fn access_token_round_trips() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, TokenKind::Access).unwrap();

        let claims = keys.decode(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.typ, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let keys = keys();
        let refresh = keys.issue(Uuid::new_v4(), TokenKind::Refresh).unwrap();
        assert!(matches!(
            keys.decode(&refresh, TokenKind::Access),
            Err(AppError::InvalidToken)
        ));

        let access = keys.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(keys.decode(&access, TokenKind::Refresh).is_err());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let other = JwtKeys::new("other".into(), Duration::minutes(5), Duration::days(1));
        let token = other.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(keys().decode(&token, TokenKind::Access).is_err());
        assert!(keys().decode("not-a-jwt", TokenKind::Access).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Bem além da tolerância padrão (60s) do jsonwebtoken.
        let expired = JwtKeys::new("test-secret".into(), Duration::minutes(-10), Duration::days(1));
        let token = expired.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        assert!(keys().decode(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn every_token_gets_a_fresh_jti() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let a = keys.decode(&keys.issue(user_id, TokenKind::Refresh).unwrap(), TokenKind::Refresh).unwrap();
        let b = keys.decode(&keys.issue(user_id, TokenKind::Refresh).unwrap(), TokenKind::Refresh).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[tokio::test]
    async fn password_hash_verifies_only_the_original() {
        let hashed = hash_password("s3cret!").await.unwrap();
        assert!(verify_password("s3cret!", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }
}
