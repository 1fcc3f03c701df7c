//! Fire-and-forget audit trail.
//!
//! [`AuditLogger::record`] returns before anything is persisted: the insert
//! runs on a detached task, and a failed insert is logged and counted but
//! never surfaced to the triggering request. Audit completeness is a
//! secondary property relative to request success; callers must not assume
//! an entry is durable by the time their response is sent.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};
use serde::Serialize;
use sqlx::PgPool;
use std::convert::Infallible;
use std::net::SocketAddr;
use uuid::Uuid;

/// One append-only audit record. Entries are created once per privileged
/// action attempt and never mutated or deleted by this layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Acting user, or `None` for system actions.
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditEntry {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            actor_id: None,
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            details: None,
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn client(mut self, meta: &ClientMeta) -> Self {
        self.ip_address = meta.ip_address.clone();
        self.user_agent = meta.user_agent.clone();
        self
    }
}

/// Records audit entries without blocking the request pipeline.
#[derive(Clone)]
pub struct AuditLogger {
    db: PgPool,
}

impl AuditLogger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Queues `entry` for persistence and returns immediately.
    ///
    /// Persistence failures are swallowed: they increment the
    /// `audit_records_dropped_total` counter and emit a warning, nothing
    /// more. A dropped entry is an accepted loss, not a request failure.
    pub fn record(&self, entry: AuditEntry) {
        let db = self.db.clone();
        tokio::spawn(async move {
            if let Err(e) = persist(&db, &entry).await {
                metrics::counter!("audit_records_dropped_total").increment(1);
                tracing::warn!(
                    action = %entry.action,
                    resource = %entry.resource,
                    error = %e,
                    "audit record dropped"
                );
            }
        });
    }
}

async fn persist(db: &PgPool, entry: &AuditEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO audit_logs
               (actor_id, action, resource, resource_id, details, ip_address, user_agent)
           VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(entry.actor_id)
    .bind(&entry.action)
    .bind(&entry.resource)
    .bind(&entry.resource_id)
    .bind(&entry.details)
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .execute(db)
    .await?;
    Ok(())
}

/// Request metadata attached to audit entries: forwarded client address and
/// user agent. Extraction never fails; absent headers become `None`.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            });

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ClientMeta {
            ip_address,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_builder_fills_optional_fields() {
        let actor = Uuid::new_v4();
        let meta = ClientMeta {
            ip_address: Some("203.0.113.9".to_string()),
            user_agent: Some("curl/8.0".to_string()),
        };

        let entry = AuditEntry::new("employee.create", "employees")
            .actor(actor)
            .resource_id("42")
            .details(json!({ "department": "engineering" }))
            .client(&meta);

        assert_eq!(entry.actor_id, Some(actor));
        assert_eq!(entry.action, "employee.create");
        assert_eq!(entry.resource, "employees");
        assert_eq!(entry.resource_id.as_deref(), Some("42"));
        assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn system_entries_carry_no_actor() {
        let entry = AuditEntry::new("system.migrate", "schema");
        assert!(entry.actor_id.is_none());
        assert!(entry.resource_id.is_none());
    }
}
