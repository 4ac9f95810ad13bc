//! Default values for optional configuration fields.

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_token_ttl_seconds() -> i64 {
    3600
}

pub fn default_solver_timeout_ms() -> u32 {
    5000
}

pub fn default_rate_limit_per_second() -> u32 {
    20
}

pub fn default_rate_limit_burst() -> u32 {
    40
}
