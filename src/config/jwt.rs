use std::env;

/// Token lifetimes are part of the authentication contract: access tokens
/// live 24 hours, refresh tokens 7 days. They are not environment-tunable.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 86_400;
pub const REFRESH_TOKEN_EXPIRY_SECS: i64 = 604_800;

/// JWT signing configuration.
///
/// Access and refresh tokens are signed with distinct secrets so a leaked
/// token from one domain can never be replayed in the other.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            access_secret: env::var("JWT_ACCESS_SECRET")
                .unwrap_or_else(|_| "insecure-dev-access-secret-change-me".to_string()),
            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .unwrap_or_else(|_| "insecure-dev-refresh-secret-change-me".to_string()),
            access_token_expiry: ACCESS_TOKEN_EXPIRY_SECS,
            refresh_token_expiry: REFRESH_TOKEN_EXPIRY_SECS,
        }
    }
}
