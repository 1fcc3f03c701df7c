use governor::Quota;
use std::num::NonZeroU32;
use std::time::Duration;

/// Rate limit configuration.
///
/// The general quota bounds all `/api` traffic per client; the auth quota is
/// a stricter window applied on top of it for credential endpoints (login,
/// registration, token refresh).
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Sustained requests per second for general endpoints
    pub general_per_second: u32,
    /// Burst size for general endpoints
    pub general_burst_size: u32,
    /// Requests allowed per window on auth endpoints
    pub auth_max_attempts: u32,
    /// Window length in seconds for auth endpoints
    pub auth_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 50,
            general_burst_size: 100,
            auth_max_attempts: 10,
            auth_window_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: std::env::var("RATE_LIMIT_GENERAL_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_per_second),
            general_burst_size: std::env::var("RATE_LIMIT_GENERAL_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_burst_size),
            auth_max_attempts: std::env::var("RATE_LIMIT_AUTH_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_max_attempts),
            auth_window_seconds: std::env::var("RATE_LIMIT_AUTH_WINDOW_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_window_seconds),
        }
    }

    /// Quota for general API endpoints.
    pub fn general_quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.general_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.general_burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(per_second).allow_burst(burst)
    }

    /// Quota for auth endpoints: `auth_max_attempts` requests per
    /// `auth_window_seconds` window.
    pub fn auth_quota(&self) -> Quota {
        let attempts = NonZeroU32::new(self.auth_max_attempts).unwrap_or(NonZeroU32::MIN);
        let replenish = Duration::from_secs(
            (self.auth_window_seconds / u64::from(attempts.get())).max(1),
        );
        Quota::with_period(replenish)
            .expect("auth rate limit replenish period must be non-zero")
            .allow_burst(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_auth_quota_allows_ten_per_minute() {
        let config = RateLimitConfig::default();
        let quota = config.auth_quota();
        assert_eq!(quota.burst_size().get(), 10);
        assert_eq!(quota.replenish_interval(), Duration::from_secs(6));
    }

    #[test]
    fn zero_values_fall_back_to_minimum_rather_than_panicking() {
        let config = RateLimitConfig {
            general_per_second: 0,
            general_burst_size: 0,
            auth_max_attempts: 0,
            auth_window_seconds: 0,
        };
        assert_eq!(config.general_quota().burst_size().get(), 1);
        assert_eq!(config.auth_quota().burst_size().get(), 1);
    }
}
