use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::{Agent, CreateAgentDto, UpdateAgentDto};

const AGENT_COLUMNS: &str = "id, name, description, model, enabled, created_at";

pub struct AgentService;

impl AgentService {
    #[instrument(skip(db, principal))]
    pub async fn list(db: &PgPool, principal: &Principal) -> Result<Vec<Agent>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let agents = sqlx::query_as::<_, Agent>(&format!(
                    "SELECT {AGENT_COLUMNS} FROM agents ORDER BY name"
                ))
                .fetch_all(&mut *conn)
                .await?;
                Ok(agents)
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn get(db: &PgPool, principal: &Principal, id: Uuid) -> Result<Agent, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Agent>(&format!(
                    "SELECT {AGENT_COLUMNS} FROM agents WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Agent not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn create(
        db: &PgPool,
        principal: &Principal,
        dto: CreateAgentDto,
    ) -> Result<Agent, AppError> {
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                let agent = sqlx::query_as::<_, Agent>(&format!(
                    r#"INSERT INTO agents (name, description, model)
                       VALUES ($1, $2, $3)
                       RETURNING {AGENT_COLUMNS}"#
                ))
                .bind(&dto.name)
                .bind(&dto.description)
                .bind(&dto.model)
                .fetch_one(&mut *conn)
                .await?;
                Ok(agent)
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn update(
        db: &PgPool,
        principal: &Principal,
        id: Uuid,
        dto: UpdateAgentDto,
    ) -> Result<Agent, AppError> {
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Agent>(&format!(
                    r#"UPDATE agents SET
                           name        = COALESCE($2, name),
                           description = COALESCE($3, description),
                           model       = COALESCE($4, model),
                           enabled     = COALESCE($5, enabled)
                       WHERE id = $1
                       RETURNING {AGENT_COLUMNS}"#
                ))
                .bind(id)
                .bind(dto.name)
                .bind(dto.description)
                .bind(dto.model)
                .bind(dto.enabled)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Agent not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn delete(db: &PgPool, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM agents WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("Agent not found"));
                }
                Ok(())
            })
        })
        .await
    }
}
