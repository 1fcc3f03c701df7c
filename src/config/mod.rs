//! Configuration for the Peoplecore API.
//!
//! Each submodule owns one configuration concern, loaded from environment
//! variables once at startup and carried by value in the application state.
//! There are no module-level configuration singletons.
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token signing secrets and fixed lifetimes
//! - [`rate_limit`]: general and auth rate limit quotas

pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
