//! Registration, login, and JWT issuance/verification (C2 ambient auth).

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Claims;
use crate::repositories::UserRepository;

use super::traits::AuthService as AuthServiceTrait;

#[derive(Clone)]
pub struct AuthServiceImpl {
    repository: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>, jwt_secret: String, token_ttl_seconds: i64) -> Self {
        Self {
            repository,
            jwt_secret,
            token_ttl: Duration::seconds(token_ttl_seconds),
        }
    }

    fn issue_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.jwt_secret.as_bytes()))
            .map_err(|e| AppError::internal(format!("failed to sign token: {e}")))
    }
}

#[async_trait]
impl AuthServiceTrait for AuthServiceImpl {
    async fn register(&self, username: String, password: String) -> AppResult<Uuid> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))?
            .to_string();

        let user = self.repository.create(username, password_hash).await?;
        Ok(user.user_id)
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "invalid username or password".to_string(),
            })?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::internal(format!("stored password hash is malformed: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized {
                message: "invalid username or password".to_string(),
            })?;

        self.issue_token(user.user_id)
    }

    fn verify(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Unauthorized {
            message: format!("invalid token: {e}"),
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthorized {
            message: "token subject is not a valid user id".to_string(),
        })
    }
}
