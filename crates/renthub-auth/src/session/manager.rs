//! Session lifecycle manager — register, sign-in, sign-out, refresh flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use renthub_core::config::{auth::AuthConfig, session::SessionConfig};
use renthub_core::error::AppError;
use renthub_database::repositories::{SessionRepository, UserRepository};
use renthub_entity::session::{CreateSession, Session};
use renthub_entity::user::{CreateUser, User, UserRole, UserStatus};

use crate::jwt::encoder::TokenPair;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordPolicy};

/// Result of a successful registration or sign-in.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session.
    pub session: Session,
    /// The authenticated user.
    pub user: User,
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    jwt_decoder: Arc<JwtDecoder>,
    /// Session persistence.
    session_repo: Arc<SessionRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Password strength policy.
    password_policy: PasswordPolicy,
    /// Auth configuration.
    auth_config: AuthConfig,
    /// Session configuration.
    session_config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("auth_config", &self.auth_config)
            .field("session_config", &self.session_config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        session_repo: Arc<SessionRepository>,
        user_repo: Arc<UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        auth_config: AuthConfig,
        session_config: SessionConfig,
    ) -> Self {
        let password_policy = PasswordPolicy::new(&auth_config);
        Self {
            jwt_encoder,
            jwt_decoder,
            session_repo,
            user_repo,
            password_hasher,
            password_policy,
            auth_config,
            session_config,
        }
    }

    /// Registers a new account and signs it in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResult, AppError> {
        self.password_policy.check(password, email)?;

        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "Account registered");

        self.create_session_and_tokens(&user, ip_address, user_agent)
            .await
    }

    /// Performs the complete sign-in flow:
    ///
    /// 1. Find the account by email
    /// 2. Check account status and lockout
    /// 3. Verify the password, counting failures
    /// 4. Create session + generate JWT pair
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResult, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        self.check_user_status(&user)?;

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            self.handle_failed_login(&user).await?;
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        self.reset_failed_attempts(&user).await?;

        let result = self
            .create_session_and_tokens(&user, ip_address, user_agent)
            .await?;

        let _ = self.user_repo.update_last_login(user.id, Utc::now()).await;
        info!(
            user_id = %user.id,
            session_id = %result.session.id,
            "Sign-in successful"
        );
        Ok(result)
    }

    /// Performs the complete sign-out flow:
    ///
    /// 1. Blocklist the current JWT
    /// 2. Blocklist the session
    /// 3. Mark the session as terminated
    pub async fn logout(&self, claims: &Claims) -> Result<(), AppError> {
        let session_id = claims.session_id();

        self.jwt_decoder
            .blocklist_token(claims.jti, claims.remaining_ttl_seconds())
            .await?;
        self.jwt_decoder.blocklist_session(session_id).await?;
        self.session_repo.terminate(session_id, "User sign-out").await?;

        info!(user_id = %claims.user_id(), session_id = %session_id, "Signed out");
        Ok(())
    }

    /// Refreshes an access token using a valid refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token).await?;
        let session_id = claims.session_id();

        let session = self.validate_session(session_id).await?;

        // Role or profile may have changed since issue; reload the user.
        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;
        self.check_user_status(&user)?;

        // The old refresh token is single-use.
        self.jwt_decoder
            .blocklist_token(claims.jti, claims.remaining_ttl_seconds())
            .await?;

        let tokens = self.jwt_encoder.generate_token_pair(&user, session.id)?;
        self.session_repo
            .update_refresh_token(session.id, &token_hash(&tokens.refresh_token))
            .await?;
        self.session_repo.touch_activity(session.id).await?;

        info!(user_id = %user.id, session_id = %session.id, "Token refreshed");
        Ok(tokens)
    }

    /// Validates that the given session is still valid and active.
    pub async fn validate_session(&self, session_id: Uuid) -> Result<Session, AppError> {
        if self.jwt_decoder.is_session_blocked(session_id).await? {
            return Err(AppError::unauthorized("Session has been blocked"));
        }

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session not found"))?;

        if session.terminated_at.is_some() {
            return Err(AppError::unauthorized("Session has been terminated"));
        }

        if session.expires_at <= Utc::now() {
            return Err(AppError::unauthorized("Session has expired"));
        }

        let idle_cutoff =
            Utc::now() - chrono::Duration::minutes(self.session_config.idle_timeout_minutes as i64);

        if session.last_activity < idle_cutoff {
            self.session_repo
                .terminate(session.id, "Idle timeout")
                .await?;
            return Err(AppError::unauthorized("Session expired due to inactivity"));
        }

        Ok(session)
    }

    /// Checks user status and lockout state.
    fn check_user_status(&self, user: &User) -> Result<(), AppError> {
        match user.status {
            UserStatus::Inactive => Err(AppError::forbidden(
                "Account is deactivated. Contact support.",
            )),
            UserStatus::Locked => {
                if let Some(locked_until) = user.locked_until {
                    if locked_until > Utc::now() {
                        return Err(AppError::forbidden(format!(
                            "Account is locked until {}",
                            locked_until.format("%Y-%m-%d %H:%M:%S UTC")
                        )));
                    }
                    // Lock expired; sign-in may proceed.
                    Ok(())
                } else {
                    Err(AppError::forbidden("Account is locked. Contact support."))
                }
            }
            UserStatus::Active => Ok(()),
        }
    }

    /// Handles a failed sign-in attempt, locking the account when the
    /// configured maximum is reached.
    async fn handle_failed_login(&self, user: &User) -> Result<(), AppError> {
        let new_count = user.failed_login_attempts + 1;

        if new_count >= self.auth_config.max_failed_attempts {
            let locked_until = Utc::now()
                + chrono::Duration::minutes(self.auth_config.lockout_duration_minutes as i64);

            self.user_repo
                .lock_user(user.id, new_count, Some(locked_until))
                .await?;

            warn!(
                user_id = %user.id,
                attempts = new_count,
                locked_until = %locked_until,
                "Account locked after failed sign-in attempts"
            );
        } else {
            self.user_repo
                .increment_failed_attempts(user.id, new_count)
                .await?;
        }

        Ok(())
    }

    /// Resets the failed sign-in counter on successful authentication.
    async fn reset_failed_attempts(&self, user: &User) -> Result<(), AppError> {
        if user.failed_login_attempts > 0 {
            self.user_repo.reset_failed_attempts(user.id).await?;
        }
        Ok(())
    }

    /// Creates the session record and generates the JWT pair.
    async fn create_session_and_tokens(
        &self,
        user: &User,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResult, AppError> {
        let session_id = Uuid::new_v4();
        let tokens = self.jwt_encoder.generate_token_pair(user, session_id)?;

        let expires_at =
            Utc::now() + chrono::Duration::hours(self.session_config.ttl_hours as i64);

        let session = self
            .session_repo
            .create(&CreateSession {
                id: session_id,
                user_id: user.id,
                token_hash: token_hash(&tokens.access_token),
                refresh_token_hash: token_hash(&tokens.refresh_token),
                ip_address: ip_address.to_string(),
                user_agent: user_agent.map(String::from),
                expires_at,
            })
            .await?;

        Ok(LoginResult {
            tokens,
            session,
            user: user.clone(),
        })
    }
}

/// Stable 64-bit hash of a token, hex-encoded.
///
/// Stored for correlation only; session validity is decided by JWT
/// signature checks plus the session row, never by comparing hashes.
fn token_hash(input: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}
