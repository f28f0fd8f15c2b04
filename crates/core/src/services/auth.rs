//! Credential service: registration, login, bearer token verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use hotdeals_common::{AppError, AppResult, Config, IdGenerator};
use hotdeals_db::{
    entities::user::{self, Role},
    repositories::UserRepository,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Bearer token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Role at issue time. Informational; authorization always re-reads the
    /// user row, so a role change takes effect before the token expires.
    pub role: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        custom(function = validate_alphanumeric)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn validate_alphanumeric(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message("Username must be alphanumeric".into()))
    }
}

/// Credential service for registration, login and token verification.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl AuthService {
    /// Create a new credential service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &Config) -> Self {
        let secret = config.auth.token_secret.as_bytes();
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime: Duration::days(config.auth.token_lifetime_days),
        }
    }

    /// Register a new account and issue a token for it.
    ///
    /// The password is hashed exactly once, here, where the plaintext arrives.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(String, user::Model)> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();

        if self
            .user_repo
            .find_by_username_or_email(&input.username, &email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Username or email already in use".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(Role::User),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        // A registration racing past the check above still lands on the
        // unique index; the repository reports that as Conflict too.
        let user = self.user_repo.create(model).await?;
        let token = self.issue_token(&user)?;

        Ok((token, user))
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password produce the same error, so callers
    /// cannot probe which addresses have accounts.
    pub async fn login(&self, input: LoginInput) -> AppResult<(String, user::Model)> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    /// Resolve a bearer token to its user.
    ///
    /// Fails with `Unauthorized` for malformed/expired tokens and for tokens
    /// whose subject no longer exists.
    pub async fn verify(&self, token: &str) -> AppResult<user::Model> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?
            .claims;

        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Issue a signed, time-bounded token for a user.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
