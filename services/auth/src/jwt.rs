//! JWT service for token generation and validation
//!
//! Access and refresh tokens are HS256 JWTs signed with two distinct secrets,
//! so a token of one kind never verifies as the other. Verification is purely
//! a function of the signature and the encoded expiry.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::AuthError;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_TOKEN_SECRET`: Secret for signing access tokens
    /// - `JWT_REFRESH_TOKEN_SECRET`: Secret for signing refresh tokens, distinct from the access secret
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let access_secret = std::env::var("JWT_ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_TOKEN_SECRET environment variable not set"))?;

        let refresh_secret = std::env::var("JWT_REFRESH_TOKEN_SECRET").map_err(|_| {
            anyhow::anyhow!("JWT_REFRESH_TOKEN_SECRET environment variable not set")
        })?;

        if access_secret.is_empty() || refresh_secret.is_empty() {
            anyhow::bail!("JWT secrets must not be empty");
        }

        if access_secret == refresh_secret {
            anyhow::bail!("Access and refresh tokens must be signed with different secrets");
        }

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        Ok(JwtConfig {
            access_secret,
            refresh_secret,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Unique token ID, so two tokens minted in the same second still differ
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Key material for one token type
#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            access: KeyPair::from_secret(&config.access_secret),
            refresh: KeyPair::from_secret(&config.refresh_secret),
            validation,
            config,
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let claims = self.claims_for(user_id, TokenType::Access, self.config.access_token_expiry)?;
        self.encode_claims(&claims)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let claims =
            self.claims_for(user_id, TokenType::Refresh, self.config.refresh_token_expiry)?;
        self.encode_claims(&claims)
    }

    /// Validate an access token and return its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenType::Access)
    }

    /// Validate a refresh token and return its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenType::Refresh)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Get the refresh token expiry time
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }

    /// Sign arbitrary claims with the key for their token type
    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        let keys = self.keys(claims.token_type);
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding).map_err(|e| {
            error!("Failed to sign {:?} token: {}", claims.token_type, e);
            AuthError::InternalFailure
        })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let keys = self.keys(expected);
        let token_data = decode::<Claims>(token, &keys.decoding, &self.validation).map_err(|e| {
            warn!("Rejected {:?} token: {}", expected, e);
            AuthError::InvalidCredential
        })?;

        if token_data.claims.token_type != expected {
            warn!("Rejected token of type {:?}", token_data.claims.token_type);
            return Err(AuthError::InvalidCredential);
        }

        Ok(token_data.claims)
    }

    fn claims_for(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        ttl: u64,
    ) -> Result<Claims, AuthError> {
        let now = unix_now()?;
        let exp = now.checked_add(ttl).ok_or_else(|| {
            error!("{:?} token expiry of {} seconds overflows", token_type, ttl);
            AuthError::InternalFailure
        })?;

        Ok(Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now,
            exp,
            token_type,
        })
    }

    fn keys(&self, token_type: TokenType) -> &KeyPair {
        match token_type {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }
}

pub(crate) fn unix_now() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| {
            error!("Failed to get current time: {}", e);
            AuthError::InternalFailure
        })
}
