//! Service configuration
//!
//! Loaded from an optional `civicdesk.toml` and then from `CIVICDESK__*`
//! environment variables, e.g. `CIVICDESK__AUTH__JWT_SECRET`.

use serde::{Deserialize, Serialize};

/// Secret used when none is configured. Only fit for local development.
pub const DEV_JWT_SECRET: &str = "civicdesk-dev-secret-change-in-production";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub auth: AuthConfig,
    pub classifier: ClassifierConfig,
    pub seed: SeedConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            auth: AuthConfig::default(),
            classifier: ClassifierConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("civicdesk").required(false))
            .add_source(config::Environment::with_prefix("CIVICDESK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_ttl_secs: u64,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_issuer: "civicdesk".to_string(),
            token_ttl_secs: 8 * 60 * 60,
            min_password_len: 8,
        }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fail filing instead of routing unmatched text to `unassigned`
    pub reject_unmatched: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub super_admin: Option<SuperAdminSeed>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuperAdminSeed {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}
