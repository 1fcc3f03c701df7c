//! HR/administration backend: CRUD APIs for employees, departments, leave,
//! attendance, billing, and AI agent management behind a shared
//! authorization and tenant-isolation layer.
//!
//! Every `/api` request passes through the same gate sequence: rate limit,
//! input sanitization, token authentication, and role authorization. Domain
//! queries then run inside row-level-security-scoped transactions bound to
//! the caller's identity, with privileged mutations recorded on an
//! append-only audit trail.

pub mod audit;
pub mod config;
pub mod db;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
