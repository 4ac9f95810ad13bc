//! Layered application configuration (expansion, §1's ambient stack).
//!
//! Mirrors the teacher's `figment`-backed `Config` struct: a TOML file
//! provides the base, environment variables (prefixed `APP_`, nested with
//! `__`) override it. There is no hand-rolled env-var parsing anywhere else
//! in the crate — this is the single place configuration is assembled.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub auth: AuthConfig,
    pub solver: SolverConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: i64,
}

/// SMT solver tuning. `timeout_ms` is the per-query budget described in §5;
/// exceeding it anywhere during a symbolic run aborts with `SymbolicTimeout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_solver_timeout_ms")]
    pub timeout_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_rate_limit_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_rate_limit_per_second(),
            burst: default_rate_limit_burst(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, overlaying `APP_`-prefixed
    /// environment variables (e.g. `APP_DATABASE__URL`).
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()
    }
}
