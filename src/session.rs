//! Session Management
//!
//! Establishes who a request runs as. Tokens are HS256 JWTs carrying the
//! actor's id, role and department; logout revokes a token's `jti` until the
//! token would have expired anyway.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::domain::{Actor, ActorId, Department, Email, Role};
use crate::error::{CoreError, CoreResult};
use crate::models::LoginPortal;
use crate::ports::ActorRepository;

/// Upper bound on a configured token lifetime
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// An authenticated session handed to the client
#[derive(Debug, Clone)]
pub struct Session {
    pub actor: Actor,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Seconds the token is valid for, as actually issued
    pub fn lifetime_secs(&self) -> u64 {
        u64::try_from((self.expires_at - self.issued_at).num_seconds()).unwrap_or(0)
    }
}

/// Login input
#[derive(Debug, Clone)]
pub struct Credentials {
    pub portal: LoginPortal,
    pub email: String,
    pub password: String,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub department: Option<Department>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Session manager
pub struct SessionManager {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    actors: Arc<dyn ActorRepository>,
    /// Revoked token ids, mapped to the token's own expiry
    revoked: DashMap<String, i64>,
}

impl SessionManager {
    pub fn new(config: AuthConfig, actors: Arc<dyn ActorRepository>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
            actors,
            revoked: DashMap::new(),
        }
    }

    /// Verify email and password and open a session.
    ///
    /// Unknown email, wrong password and a portal that does not match the
    /// account's role all fail the same way.
    pub async fn authenticate(&self, credentials: &Credentials) -> CoreResult<Session> {
        let email = Email::new(credentials.email.as_str()).map_err(|_| CoreError::InvalidCredentials)?;

        let account = self
            .actors
            .find_by_email(&email)
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        let Some(account) = account.filter(|a| a.verify_password(&credentials.password)) else {
            tracing::warn!(email = %email, "login rejected: bad credentials");
            return Err(CoreError::InvalidCredentials);
        };

        let portal_matches = match credentials.portal {
            LoginPortal::Citizen => !account.actor().is_admin(),
            LoginPortal::Admin => account.actor().is_admin(),
        };
        if !portal_matches {
            tracing::warn!(actor_id = %account.id(), portal = ?credentials.portal, "login rejected: wrong portal");
            return Err(CoreError::InvalidCredentials);
        }

        let session = self.issue(*account.actor(), Utc::now())?;
        tracing::info!(actor_id = %account.id(), role = %account.actor().role(), "session opened");
        Ok(session)
    }

    /// Resolve a bearer token to the actor it was issued for
    pub async fn validate(&self, token: &str) -> CoreResult<Actor> {
        let claims = self.decode_claims(token)?;

        if self.revoked.contains_key(&claims.jti) {
            tracing::debug!(jti = %claims.jti, "revoked token presented");
            return Err(CoreError::Unauthenticated);
        }

        let claimed = claims
            .sub
            .parse::<ActorId>()
            .ok()
            .and_then(|id| Actor::from_parts(id, claims.role, claims.department))
            .ok_or(CoreError::Unauthenticated)?;

        let account = self
            .actors
            .find_by_id(&claimed.id())
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?
            .ok_or(CoreError::Unauthenticated)?;

        if *account.actor() != claimed {
            tracing::warn!(actor_id = %claimed.id(), "token claims disagree with account");
            return Err(CoreError::Unauthenticated);
        }

        Ok(claimed)
    }

    /// Log out. Unknown, expired and already revoked tokens are ignored.
    pub fn invalidate(&self, token: &str) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp >= now);

        if let Ok(claims) = self.decode_claims(token) {
            if self.revoked.insert(claims.jti, claims.exp).is_none() {
                tracing::info!(actor_id = %claims.sub, "session closed");
            }
        }
    }

    pub(crate) fn issue(&self, actor: Actor, issued_at: DateTime<Utc>) -> CoreResult<Session> {
        let ttl = i64::try_from(self.config.token_ttl_secs)
            .unwrap_or(MAX_TOKEN_TTL_SECS)
            .min(MAX_TOKEN_TTL_SECS);
        let expires_at = issued_at + Duration::seconds(ttl);

        let claims = Claims {
            sub: actor.id().to_string(),
            role: actor.role(),
            department: actor.department(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.jwt_issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        Ok(Session {
            actor,
            token,
            issued_at,
            expires_at,
        })
    }

    fn decode_claims(&self, token: &str) -> CoreResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                CoreError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, PasswordHash};
    use crate::infrastructure::InMemoryActorRepository;

    async fn setup() -> (SessionManager, Arc<InMemoryActorRepository>, Actor, Actor) {
        let repo = Arc::new(InMemoryActorRepository::new());
        let citizen = Actor::Citizen { id: ActorId::new() };
        let admin = Actor::DepartmentAdmin { id: ActorId::new(), department: Department::Roads };

        for (actor, email) in [(citizen, "c1@example.com"), (admin, "roads@city.gov")] {
            let account = Account::create(
                actor,
                "Test",
                Email::new(email).unwrap(),
                "000",
                PasswordHash::create("password123").unwrap(),
            );
            repo.insert(&account).await.unwrap();
        }

        let manager = SessionManager::new(AuthConfig::default(), repo.clone());
        (manager, repo, citizen, admin)
    }

    fn creds(portal: LoginPortal, email: &str, password: &str) -> Credentials {
        Credentials {
            portal,
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_and_validate() {
        let (manager, _, citizen, _) = setup().await;
        let session = manager
            .authenticate(&creds(LoginPortal::Citizen, "C1@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(session.actor, citizen);
        assert_eq!(manager.validate(&session.token).await.unwrap(), citizen);
        assert_eq!((session.expires_at - session.issued_at).num_hours(), 8);
        assert_eq!(session.lifetime_secs(), 8 * 60 * 60);
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_clamped() {
        let (_, repo, citizen, _) = setup().await;
        let manager = SessionManager::new(AuthConfig { token_ttl_secs: u64::MAX, ..AuthConfig::default() }, repo);

        let session = manager.issue(citizen, Utc::now()).unwrap();
        assert_eq!(session.lifetime_secs(), MAX_TOKEN_TTL_SECS as u64);
        assert_eq!(manager.validate(&session.token).await.unwrap(), citizen);
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_uniformly() {
        let (manager, _, _, _) = setup().await;
        for attempt in [
            creds(LoginPortal::Citizen, "c1@example.com", "wrong"),
            creds(LoginPortal::Citizen, "nobody@example.com", "password123"),
            creds(LoginPortal::Citizen, "not-an-email", "password123"),
            creds(LoginPortal::Admin, "c1@example.com", "password123"),
            creds(LoginPortal::Citizen, "roads@city.gov", "password123"),
        ] {
            assert_eq!(manager.authenticate(&attempt).await.unwrap_err(), CoreError::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn test_admin_session_carries_department() {
        let (manager, _, _, admin) = setup().await;
        let session = manager
            .authenticate(&creds(LoginPortal::Admin, "roads@city.gov", "password123"))
            .await
            .unwrap();
        let actor = manager.validate(&session.token).await.unwrap();
        assert_eq!(actor, admin);
        assert_eq!(actor.department(), Some(Department::Roads));
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let (manager, _, citizen, _) = setup().await;
        let session = manager.issue(citizen, Utc::now()).unwrap();

        manager.invalidate(&session.token);
        manager.invalidate(&session.token);
        manager.invalidate("garbage");

        assert_eq!(manager.validate(&session.token).await.unwrap_err(), CoreError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_leaves_other_sessions_alone() {
        let (manager, _, citizen, _) = setup().await;
        let first = manager.issue(citizen, Utc::now()).unwrap();
        let second = manager.issue(citizen, Utc::now()).unwrap();

        manager.invalidate(&first.token);
        assert!(manager.validate(&first.token).await.is_err());
        assert_eq!(manager.validate(&second.token).await.unwrap(), citizen);
    }

    #[tokio::test]
    async fn test_expired_and_malformed_tokens_rejected() {
        let (manager, _, citizen, _) = setup().await;
        let stale = manager.issue(citizen, Utc::now() - Duration::hours(9)).unwrap();

        assert_eq!(manager.validate(&stale.token).await.unwrap_err(), CoreError::Unauthenticated);
        assert_eq!(manager.validate("").await.unwrap_err(), CoreError::Unauthenticated);
        assert_eq!(manager.validate("a.b.c").await.unwrap_err(), CoreError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_rejected() {
        let (manager, repo, citizen, _) = setup().await;
        let other = SessionManager::new(
            AuthConfig { jwt_secret: "another-secret".into(), ..AuthConfig::default() },
            repo,
        );
        let forged = other.issue(citizen, Utc::now()).unwrap();
        assert_eq!(manager.validate(&forged.token).await.unwrap_err(), CoreError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_claims_must_match_account() {
        let (manager, _, citizen, _) = setup().await;
        // same id, escalated role
        let escalated = Actor::SuperAdmin { id: citizen.id() };
        let session = manager.issue(escalated, Utc::now()).unwrap();
        assert_eq!(manager.validate(&session.token).await.unwrap_err(), CoreError::Unauthenticated);

        let ghost = manager.issue(Actor::Citizen { id: ActorId::new() }, Utc::now()).unwrap();
        assert_eq!(manager.validate(&ghost.token).await.unwrap_err(), CoreError::Unauthenticated);
    }
}
