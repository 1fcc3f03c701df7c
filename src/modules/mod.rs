pub mod agents;
pub mod attendance;
pub mod auth;
pub mod billing;
pub mod departments;
pub mod employees;
pub mod leave;
