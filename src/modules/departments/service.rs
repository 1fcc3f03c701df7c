use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db, principal))]
    pub async fn list(db: &PgPool, principal: &Principal) -> Result<Vec<Department>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let departments = sqlx::query_as::<_, Department>(
                    "SELECT id, name, description, created_at FROM departments ORDER BY name",
                )
                .fetch_all(&mut *conn)
                .await?;
                Ok(departments)
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn get(db: &PgPool, principal: &Principal, id: Uuid) -> Result<Department, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Department>(
                    "SELECT id, name, description, created_at FROM departments WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Department not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn create(
        db: &PgPool,
        principal: &Principal,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let existing: Option<(Uuid,)> =
                    sqlx::query_as("SELECT id FROM departments WHERE name = $1")
                        .bind(&dto.name)
                        .fetch_optional(&mut *conn)
                        .await?;
                if existing.is_some() {
                    return Err(AppError::conflict("Department name already in use"));
                }

                let department = sqlx::query_as::<_, Department>(
                    r#"INSERT INTO departments (name, description)
                       VALUES ($1, $2)
                       RETURNING id, name, description, created_at"#,
                )
                .bind(&dto.name)
                .bind(&dto.description)
                .fetch_one(&mut *conn)
                .await?;
                Ok(department)
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn update(
        db: &PgPool,
        principal: &Principal,
        id: Uuid,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Department>(
                    r#"UPDATE departments SET
                           name        = COALESCE($2, name),
                           description = COALESCE($3, description)
                       WHERE id = $1
                       RETURNING id, name, description, created_at"#,
                )
                .bind(id)
                .bind(dto.name)
                .bind(dto.description)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Department not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn delete(db: &PgPool, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM departments WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("Department not found"));
                }
                Ok(())
            })
        })
        .await
    }
}
