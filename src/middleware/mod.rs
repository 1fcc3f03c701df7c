pub mod auth;
pub mod rate_limit;
pub mod role;
pub mod sanitize;
