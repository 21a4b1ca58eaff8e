/*!
 * # Authentication and Authorization Module
 *
 * This module provides authentication services for the procurement API:
 *
 * - JWT access tokens with rotating refresh tokens stored server-side
 * - Email verification tokens carried as single-purpose JWTs
 * - Argon2 password hashing
 *
 * Refresh tokens are recorded in the `refresh_tokens` table by their `jti`
 * claim, so individual sessions can be revoked without a shared blacklist.
 */

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::{refresh_token, user};
use crate::errors::ServiceError;
use crate::metrics::SECURITY_METRICS;

const JWT_ISSUER: &str = "procura-auth";
const JWT_AUDIENCE: &str = "procura-api";

/// What a token is allowed to be used for. Checked on every decode so a
/// refresh token can never pass as an access token, nor a verification link
/// as either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
    Verify,
}

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,               // Subject (user ID)
    pub name: Option<String>,      // User's name
    pub email: Option<String>,     // User's email
    pub tenant_id: Option<String>, // Owning tenant, when resolved at login
    pub token_use: TokenUse,       // Purpose of this token
    pub jti: String,               // JWT ID (unique identifier for this token)
    pub iat: i64,                  // Issued at time
    pub exp: i64,                  // Expiration time
    pub nbf: i64,                  // Not valid before time
    pub iss: String,               // Issuer
    pub aud: String,               // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub token_id: String,
}

impl AuthUser {
    /// Check if the user belongs to a specific tenant
    pub fn belongs_to_tenant(&self, tenant_id: Uuid) -> bool {
        self.tenant_id.map_or(false, |tid| tid == tenant_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
    pub verification_token_expiration: Duration,
}

impl AuthConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_audience: JWT_AUDIENCE.to_string(),
            jwt_issuer: JWT_ISSUER.to_string(),
            access_token_expiration: Duration::from_secs(config.jwt_expiration as u64),
            refresh_token_expiration: Duration::from_secs(config.refresh_token_expiration as u64),
            verification_token_expiration: Duration::from_secs(
                config.verification_token_expiration as u64,
            ),
        }
    }
}

/// Token pair response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

/// Encode claims into a signed JWT
fn encode_claims(secret: &str, claims: &Claims) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Decode a JWT, checking signature, expiry, not-before, audience and issuer
fn decode_claims(
    secret: &str,
    audience: &str,
    issuer: &str,
    token: &str,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[issuer]);
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// Authentication service that handles token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DbPool>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    fn build_claims(
        &self,
        user: &user::Model,
        tenant_id: Option<Uuid>,
        token_use: TokenUse,
        lifetime: Duration,
        jti: &str,
    ) -> Result<Claims, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(lifetime)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        Ok(Claims {
            sub: user.id.to_string(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            tenant_id: tenant_id.map(|id| id.to_string()),
            token_use,
            jti: jti.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        })
    }

    /// Issue an access/refresh token pair and record the refresh token
    pub async fn issue_token_pair(
        &self,
        user: &user::Model,
        tenant_id: Option<Uuid>,
    ) -> Result<TokenPair, AuthError> {
        let access_jti = Uuid::new_v4().to_string();
        let refresh_jti = Uuid::new_v4().to_string();

        let access_claims = self.build_claims(
            user,
            tenant_id,
            TokenUse::Access,
            self.config.access_token_expiration,
            &access_jti,
        )?;
        let refresh_claims = self.build_claims(
            user,
            tenant_id,
            TokenUse::Refresh,
            self.config.refresh_token_expiration,
            &refresh_jti,
        )?;

        let access_token = encode_claims(&self.config.jwt_secret, &access_claims)?;
        let refresh_token_value = encode_claims(&self.config.jwt_secret, &refresh_claims)?;

        let expires_at = DateTime::<Utc>::from_timestamp(refresh_claims.exp, 0)
            .ok_or_else(|| AuthError::InternalError("Invalid expiry timestamp".to_string()))?;
        self.store_refresh_token(user.id, &refresh_jti, expires_at)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token_value,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            refresh_expires_in: self.config.refresh_token_expiration.as_secs() as i64,
        })
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_claims(
            &self.config.jwt_secret,
            &self.config.jwt_audience,
            &self.config.jwt_issuer,
            token,
        )
    }

    /// Validate an access token, rejecting tokens minted for another purpose
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validate_token(token)?;
        if claims.token_use != TokenUse::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Refresh an access token using a refresh token, rotating the stored entry
    pub async fn refresh_token(&self, refresh_token_value: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token_value)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::InvalidToken);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let stored = refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenId.eq(claims.jti.as_str()))
            .filter(refresh_token::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        if stored.revoked {
            return Err(AuthError::RevokedToken);
        }
        if stored.expires_at < Utc::now() {
            return Err(AuthError::TokenExpired);
        }

        let user = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !user.active {
            return Err(AuthError::AccountDisabled);
        }

        let tenant_id = claims
            .tenant_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok());

        self.revoke_refresh_token(&claims.jti).await?;
        let pair = self.issue_token_pair(&user, tenant_id).await?;

        SECURITY_METRICS.token_refreshes.inc();
        Ok(pair)
    }

    /// Revoke a refresh token by its `jti`
    pub async fn revoke_refresh_token(&self, token_id: &str) -> Result<(), AuthError> {
        refresh_token::Entity::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .filter(refresh_token::Column::TokenId.eq(token_id))
            .exec(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        debug!("Revoked refresh token {}", token_id);
        Ok(())
    }

    /// Revoke the refresh token presented at logout
    pub async fn logout(&self, refresh_token_value: &str) -> Result<(), AuthError> {
        let claims = self.validate_token(refresh_token_value)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::InvalidToken);
        }
        self.revoke_refresh_token(&claims.jti).await
    }

    /// Mint the single-purpose JWT embedded in verification emails
    pub fn generate_verification_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let jti = Uuid::new_v4().to_string();
        let claims = self.build_claims(
            user,
            None,
            TokenUse::Verify,
            self.config.verification_token_expiration,
            &jti,
        )?;
        encode_claims(&self.config.jwt_secret, &claims)
    }

    /// Validate a verification token and return the user it belongs to
    pub fn verify_email_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.validate_token(token)?;
        if claims.token_use != TokenUse::Verify {
            return Err(AuthError::InvalidToken);
        }
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    /// Decode a verification token without checking expiry. The signature,
    /// audience, issuer and purpose are still enforced, so only a token this
    /// service minted can identify the user asking for a fresh link.
    pub fn verification_token_user_allow_expired(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.jwt_audience]);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.validate_exp = false;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)?;

        if claims.token_use != TokenUse::Verify {
            return Err(AuthError::InvalidToken);
        }
        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let record = refresh_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_id: Set(token_id.to_string()),
            created_at: Set(Utc::now()),
            expires_at: Set(expires_at),
            revoked: Set(false),
        };

        record
            .insert(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        debug!("Stored refresh token {} for user {}", token_id, user_id);
        Ok(())
    }
}

/// Hash a password with Argon2 and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required".to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REVOKED_TOKEN",
                "Authentication token has been revoked".to_string(),
            ),
            Self::EmailNotVerified => (
                StatusCode::FORBIDDEN,
                "AUTH_EMAIL_NOT_VERIFIED",
                "Email address has not been verified".to_string(),
            ),
            Self::AccountDisabled => (
                StatusCode::FORBIDDEN,
                "AUTH_ACCOUNT_DISABLED",
                "Account is disabled".to_string(),
            ),
            Self::UserNotFound => (
                StatusCode::NOT_FOUND,
                "AUTH_USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::TokenCreation(_) | Self::DatabaseError(_) | Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ServiceError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::EmailNotVerified => {
                ServiceError::Forbidden("Email address has not been verified".to_string())
            }
            AuthError::AccountDisabled => {
                ServiceError::Forbidden("Account is disabled".to_string())
            }
            AuthError::UserNotFound => ServiceError::NotFound("User not found".to_string()),
            AuthError::TokenCreation(msg)
            | AuthError::DatabaseError(msg)
            | AuthError::InternalError(msg) => ServiceError::InternalError(msg),
            other => ServiceError::AuthError(other.to_string()),
        }
    }
}

/// Authentication middleware that extracts and validates auth tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    // The auth service is installed as a request extension at router build time
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extract authentication info from request headers
fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    let claims = auth_service.validate_access_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthUser {
        user_id,
        name: claims.name,
        email: claims.email,
        tenant_id: claims
            .tenant_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok()),
        token_id: claims.jti,
    })
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret-key-that-is-long-enough-for-hs256-signing".to_string(),
            jwt_audience: JWT_AUDIENCE.to_string(),
            jwt_issuer: JWT_ISSUER.to_string(),
            access_token_expiration: Duration::from_secs(3600),
            refresh_token_expiration: Duration::from_secs(86_400),
            verification_token_expiration: Duration::from_secs(86_400),
        }
    }

    fn test_claims(token_use: TokenUse, exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4().to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            tenant_id: None,
            token_use,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + exp_offset_secs,
            nbf: now,
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
        }
    }

    #[test]
    fn claims_round_trip_through_encode_and_decode() {
        let config = test_config();
        let claims = test_claims(TokenUse::Access, 3600);

        let token = encode_claims(&config.jwt_secret, &claims).unwrap();
        let decoded = decode_claims(
            &config.jwt_secret,
            &config.jwt_audience,
            &config.jwt_issuer,
            &token,
        )
        .unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.token_use, TokenUse::Access);
    }

    #[test]
    fn decode_rejects_wrong_audience() {
        let config = test_config();
        let mut claims = test_claims(TokenUse::Access, 3600);
        claims.aud = "another-service".to_string();

        let token = encode_claims(&config.jwt_secret, &claims).unwrap();
        let result = decode_claims(
            &config.jwt_secret,
            &config.jwt_audience,
            &config.jwt_issuer,
            &token,
        );

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn decode_rejects_expired_token() {
        let config = test_config();
        // Past the default decoding leeway
        let claims = test_claims(TokenUse::Access, -300);

        let token = encode_claims(&config.jwt_secret, &claims).unwrap();
        let result = decode_claims(
            &config.jwt_secret,
            &config.jwt_audience,
            &config.jwt_issuer,
            &token,
        );

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn access_validation_rejects_refresh_tokens() {
        let service = AuthService::new(
            test_config(),
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
        );
        let claims = test_claims(TokenUse::Refresh, 3600);
        let token = encode_claims(&service.config.jwt_secret, &claims).unwrap();

        assert!(matches!(
            service.validate_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn verification_tokens_are_single_purpose() {
        let service = AuthService::new(
            test_config(),
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
        );
        let access_claims = test_claims(TokenUse::Access, 3600);
        let token = encode_claims(&service.config.jwt_secret, &access_claims).unwrap();

        assert!(matches!(
            service.verify_email_token(&token),
            Err(AuthError::InvalidToken)
        ));

        let verify_claims = test_claims(TokenUse::Verify, 3600);
        let token = encode_claims(&service.config.jwt_secret, &verify_claims).unwrap();
        let user_id = service.verify_email_token(&token).unwrap();
        assert_eq!(user_id.to_string(), verify_claims.sub);
    }

    #[test]
    fn expired_verification_token_still_identifies_the_user() {
        let service = AuthService::new(
            test_config(),
            Arc::new(sea_orm::DatabaseConnection::Disconnected),
        );
        let claims = test_claims(TokenUse::Verify, -3600);
        let sub = claims.sub.clone();
        let token = encode_claims(&service.config.jwt_secret, &claims).unwrap();

        assert!(matches!(
            service.verify_email_token(&token),
            Err(AuthError::TokenExpired)
        ));
        let user_id = service.verification_token_user_allow_expired(&token).unwrap();
        assert_eq!(user_id.to_string(), sub);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }
}
