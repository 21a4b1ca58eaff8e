use crate::{
    auth::{hash_password, verify_password, AuthError, AuthService, TokenPair},
    config::AppConfig,
    db::DbPool,
    entities::{password_reset_token, tenant, tenant_domain, user},
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::{BUSINESS_METRICS, SECURITY_METRICS},
    notifications::{self, Mailer, OutboundEmail},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::Serialize;
use sha2::Sha256;
use slog::Logger;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Bytes of randomness behind each password reset token.
const RESET_TOKEN_BYTES: usize = 32;

/// A freshly registered tenant with its owning account and primary domain.
#[derive(Debug)]
pub struct Registration {
    pub user: user::Model,
    pub tenant: tenant::Model,
    pub domain: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum VerifyEmailOutcome {
    Verified,
    AlreadyVerified,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResendVerificationOutcome {
    Sent,
    AlreadyVerified,
}

/// An authenticated session: the token pair plus where the tenant's UI lives.
#[derive(Debug, Serialize)]
pub struct LoginSession {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub redirect_url: String,
    pub tenant_id: Uuid,
    pub company_name: String,
}

/// Service for tenant registration, email verification, login and password
/// recovery.
#[derive(Clone)]
pub struct TenantService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    auth: Arc<AuthService>,
    mailer: Arc<dyn Mailer>,
    config: Arc<AppConfig>,
    logger: Logger,
}

impl TenantService {
    /// Creates a new tenant service instance
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        auth: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
        config: Arc<AppConfig>,
        logger: Logger,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            auth,
            mailer,
            config,
            logger,
        }
    }

    /// Registers a company: owning user, tenant and primary domain are
    /// created in one transaction, then a verification link is emailed.
    /// A failed email does not undo the registration; the resend endpoint
    /// recovers from it.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        company_name: String,
        owner_name: String,
        email: String,
        password: String,
    ) -> Result<Registration, ServiceError> {
        let email = email.trim().to_lowercase();
        let schema_name = slugify(&company_name);
        if schema_name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Company name must contain letters or numbers".to_string(),
            ));
        }
        let domain = format!("{}.{}", schema_name, self.config.tenant_base_domain);

        let db = &*self.db_pool;
        if user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "Email address is already registered".to_string(),
            ));
        }
        if tenant::Entity::find()
            .filter(tenant::Column::SchemaName.eq(schema_name.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "Company name is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;
        let tx_company_name = company_name.clone();
        let tx_schema_name = schema_name.clone();
        let tx_email = email.clone();
        let tx_domain = domain.clone();

        let (user, tenant) = db
            .transaction::<_, (user::Model, tenant::Model), ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let user = user::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        name: Set(owner_name),
                        email: Set(tx_email),
                        password_hash: Set(password_hash),
                        email_verified: Set(false),
                        active: Set(true),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                    let tenant = tenant::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        company_name: Set(tx_company_name),
                        schema_name: Set(tx_schema_name),
                        owner_user_id: Set(user.id),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                    tenant_domain::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        tenant_id: Set(tenant.id),
                        domain: Set(tx_domain),
                        is_primary: Set(true),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                    Ok((user, tenant))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        BUSINESS_METRICS.tenants_registered.inc();
        info!(tenant_id = %tenant.id, user_id = %user.id, domain = %domain, "Tenant registered");

        self.event_sender
            .send(Event::TenantRegistered {
                tenant_id: tenant.id,
                user_id: user.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        if let Err(e) = self.email_verification_link(&user).await {
            warn!(
                user_id = %user.id,
                error = %e,
                "Verification email was not sent; the account can request a resend"
            );
        }

        Ok(Registration {
            user,
            tenant,
            domain,
        })
    }

    /// Flips the account's `email_verified` flag. Verifying twice is
    /// harmless.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailOutcome, ServiceError> {
        let user_id = self.auth.verify_email_token(token).map_err(|e| match e {
            AuthError::TokenExpired => ServiceError::BadRequest(
                "Verification link has expired; request a new one from the resend endpoint"
                    .to_string(),
            ),
            _ => ServiceError::BadRequest("Invalid verification token".to_string()),
        })?;

        let db = &*self.db_pool;
        let user = user::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if user.email_verified {
            return Ok(VerifyEmailOutcome::AlreadyVerified);
        }

        let mut active: user::ActiveModel = user.into();
        active.email_verified = Set(true);
        active.updated_at = Set(Utc::now());
        let user = active
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(user_id = %user.id, "Email address verified");
        self.event_sender
            .send(Event::EmailVerified(user.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(VerifyEmailOutcome::Verified)
    }

    /// Issues a fresh verification link from an existing token, expired or
    /// not. The old token's signature must still check out.
    #[instrument(skip(self, token))]
    pub async fn resend_verification(
        &self,
        token: &str,
    ) -> Result<ResendVerificationOutcome, ServiceError> {
        let user_id = self
            .auth
            .verification_token_user_allow_expired(token)
            .map_err(|_| ServiceError::BadRequest("Invalid verification token".to_string()))?;

        let db = &*self.db_pool;
        let user = user::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if user.email_verified {
            return Ok(ResendVerificationOutcome::AlreadyVerified);
        }

        self.email_verification_link(&user).await?;
        Ok(ResendVerificationOutcome::Sent)
    }

    /// Authenticates an account and returns tokens plus the tenant redirect.
    /// Accounts that never verified their email are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<LoginSession, ServiceError> {
        let email = email.trim().to_lowercase();
        let db = &*self.db_pool;

        let user = match user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            Some(user) => user,
            None => {
                SECURITY_METRICS.auth_failures.inc();
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(&password, &user.password_hash)? {
            SECURITY_METRICS.auth_failures.inc();
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.email_verified {
            SECURITY_METRICS.auth_failures.inc();
            return Err(AuthError::EmailNotVerified.into());
        }
        if !user.active {
            SECURITY_METRICS.auth_failures.inc();
            return Err(AuthError::AccountDisabled.into());
        }

        let tenant = tenant::Entity::find()
            .filter(tenant::Column::OwnerUserId.eq(user.id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError("Account has no tenant attached".to_string())
            })?;

        let domain = tenant_domain::Entity::find()
            .filter(tenant_domain::Column::TenantId.eq(tenant.id))
            .filter(tenant_domain::Column::IsPrimary.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError("Tenant has no primary domain".to_string())
            })?;

        let tokens = self
            .auth
            .issue_token_pair(&user, Some(tenant.id))
            .await
            .map_err(ServiceError::from)?;

        SECURITY_METRICS.auth_success.inc();
        info!(user_id = %user.id, tenant_id = %tenant.id, "Login succeeded");

        let scheme = if self.config.app_base_url.starts_with("https://") {
            "https"
        } else {
            "http"
        };

        Ok(LoginSession {
            tokens,
            redirect_url: format!("{}://{}", scheme, domain.domain),
            tenant_id: tenant.id,
            company_name: tenant.company_name,
        })
    }

    /// Emails a single-use password reset link. Only the HMAC of the token
    /// is stored; the raw value travels in the email alone.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: String) -> Result<(), ServiceError> {
        let email = email.trim().to_lowercase();
        let db = &*self.db_pool;

        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound("No account with that email address".to_string())
            })?;

        if !user.email_verified {
            return Err(ServiceError::Forbidden(
                "Email address has not been verified".to_string(),
            ));
        }

        let mut token_bytes = [0u8; RESET_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let token = URL_SAFE_NO_PAD.encode(token_bytes);
        let token_hash = self.hash_reset_token(&token)?;
        let expires_at = Utc::now()
            + ChronoDuration::seconds(self.config.reset_token_expiration as i64);

        let user_id = user.id;
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                // One outstanding link per account
                password_reset_token::Entity::delete_many()
                    .filter(password_reset_token::Column::UserId.eq(user_id))
                    .filter(password_reset_token::Column::UsedAt.is_null())
                    .exec(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                password_reset_token::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    token_hash: Set(token_hash),
                    expires_at: Set(expires_at),
                    created_at: Set(Utc::now()),
                    used_at: Set(None),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        let link = format!(
            "{}/api/v1/tenants/password-reset/{}/{}",
            self.config.app_base_url, user.id, token
        );
        let hours = self.config.reset_token_expiration / 3600;
        let body = format!(
            "Hello {},\n\nReset your password using the link below:\n\n{}\n\nThe link is valid for {} hours and can be used once.\n",
            user.name, link, hours
        );
        let message = OutboundEmail::new(
            user.email.clone(),
            "Reset your password".to_string(),
            body,
        );
        notifications::deliver(self.mailer.as_ref(), message).await?;

        info!(user_id = %user.id, "Password reset link emailed");
        self.event_sender
            .send(Event::PasswordResetRequested(user.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    /// Checks that a reset link is still usable without consuming it.
    #[instrument(skip(self, token))]
    pub async fn check_password_reset(&self, uid: Uuid, token: &str) -> Result<(), ServiceError> {
        self.find_usable_reset_token(uid, token).await.map(|_| ())
    }

    /// Consumes a reset link and stores the new password.
    #[instrument(skip(self, token, new_password))]
    pub async fn confirm_password_reset(
        &self,
        uid: Uuid,
        token: &str,
        new_password: String,
    ) -> Result<(), ServiceError> {
        let reset = self.find_usable_reset_token(uid, token).await?;
        let password_hash = hash_password(&new_password)?;

        let db = &*self.db_pool;
        let reset_id = reset.id;
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let user = user::Entity::find_by_id(uid)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

                let mut active: user::ActiveModel = user.into();
                active.password_hash = Set(password_hash);
                active.updated_at = Set(now);
                active
                    .update(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                let reset = password_reset_token::Entity::find_by_id(reset_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::BadRequest("Invalid or expired reset token".to_string())
                    })?;
                let mut reset: password_reset_token::ActiveModel = reset.into();
                reset.used_at = Set(Some(now));
                reset
                    .update(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        info!(user_id = %uid, "Password reset completed");
        self.event_sender
            .send(Event::PasswordResetCompleted(uid))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(())
    }

    async fn find_usable_reset_token(
        &self,
        uid: Uuid,
        token: &str,
    ) -> Result<password_reset_token::Model, ServiceError> {
        let token_hash = self.hash_reset_token(token)?;
        let db = &*self.db_pool;

        let reset = password_reset_token::Entity::find()
            .filter(password_reset_token::Column::UserId.eq(uid))
            .filter(password_reset_token::Column::TokenHash.eq(token_hash))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::BadRequest("Invalid or expired reset token".to_string())
            })?;

        if reset.used_at.is_some() {
            return Err(ServiceError::BadRequest(
                "Reset token has already been used".to_string(),
            ));
        }
        if reset.expires_at < Utc::now() {
            return Err(ServiceError::BadRequest(
                "Reset token has expired".to_string(),
            ));
        }
        Ok(reset)
    }

    fn hash_reset_token(&self, token: &str) -> Result<String, ServiceError> {
        let mut mac = HmacSha256::new_from_slice(self.config.jwt_secret.as_bytes())
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn email_verification_link(&self, user: &user::Model) -> Result<(), ServiceError> {
        let token = self
            .auth
            .generate_verification_token(user)
            .map_err(ServiceError::from)?;
        let link = format!(
            "{}/api/v1/tenants/verify-email?token={}",
            self.config.app_base_url, token
        );
        let hours = self.config.verification_token_expiration / 3600;
        let body = format!(
            "Hello {},\n\nVerify your email address to activate your account:\n\n{}\n\nThe link expires in {} hours.\n",
            user.name, link, hours
        );
        let message = OutboundEmail::new(
            user.email.clone(),
            "Verify your email address".to_string(),
            body,
        );
        notifications::deliver(self.mailer.as_ref(), message).await
    }
}

/// Lowercases a company name into the subdomain label used as the tenant's
/// schema name. Runs of non-alphanumeric characters collapse to one hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::notifications::InMemoryMailer;
    use std::time::Duration;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::new(
            "sqlite::memory:".to_string(),
            "unit-test-secret-key-that-is-long-enough-for-hs256-signing-12345".to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        config.tenant_base_domain = "procura.test".to_string();
        config.app_base_url = "http://localhost:8080".to_string();
        config
    }

    fn test_service(mailer: Arc<InMemoryMailer>) -> TenantService {
        let config = Arc::new(test_config());
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                jwt_audience: "procura-api".to_string(),
                jwt_issuer: "procura-auth".to_string(),
                access_token_expiration: Duration::from_secs(3600),
                refresh_token_expiration: Duration::from_secs(86_400),
                verification_token_expiration: Duration::from_secs(86_400),
            },
            db_pool.clone(),
        ));
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let event_sender = Arc::new(EventSender::new(tx));
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        TenantService::new(db_pool, event_sender, auth, mailer, config, logger)
    }

    #[test]
    fn slugify_flattens_company_names() {
        assert_eq!(slugify("Acme Corp Ltd."), "acme-corp-ltd");
        assert_eq!(slugify("  Fjord & Sons  "), "fjord-sons");
        assert_eq!(slugify("___"), "");
    }

    #[tokio::test]
    async fn register_fails_without_database_before_mailing() {
        let mailer = Arc::new(InMemoryMailer::new());
        let service = test_service(mailer.clone());
        let result = service
            .register(
                "Acme Corp".to_string(),
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "correct horse battery staple".to_string(),
            )
            .await;
        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn register_rejects_unusable_company_names() {
        let service = test_service(Arc::new(InMemoryMailer::new()));
        let result = service
            .register(
                "!!!".to_string(),
                "Ada".to_string(),
                "ada@example.com".to_string(),
                "correct horse battery staple".to_string(),
            )
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn login_fails_without_database() {
        let service = test_service(Arc::new(InMemoryMailer::new()));
        let result = service
            .login("ada@example.com".to_string(), "password".to_string())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reset_token_hashing_is_stable() {
        let service = test_service(Arc::new(InMemoryMailer::new()));
        let a = service.hash_reset_token("token-material").unwrap();
        let b = service.hash_reset_token("token-material").unwrap();
        let c = service.hash_reset_token("other-material").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
