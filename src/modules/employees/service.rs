use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::{CreateEmployeeDto, Employee, UpdateEmployeeDto};

const EMPLOYEE_COLUMNS: &str = "id, user_id, first_name, last_name, email, job_title, \
                                department_id, manager_id, hired_on, created_at";

pub struct EmployeeService;

impl EmployeeService {
    /// Lists the employees visible to `principal` under the row policies.
    #[instrument(skip(db, principal))]
    pub async fn list(db: &PgPool, principal: &Principal) -> Result<Vec<Employee>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let employees = sqlx::query_as::<_, Employee>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY last_name, first_name"
                ))
                .fetch_all(&mut *conn)
                .await?;
                Ok(employees)
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn get(db: &PgPool, principal: &Principal, id: Uuid) -> Result<Employee, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Employee>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Employee not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn create(
        db: &PgPool,
        principal: &Principal,
        dto: CreateEmployeeDto,
    ) -> Result<Employee, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let employee = sqlx::query_as::<_, Employee>(&format!(
                    r#"INSERT INTO employees
                           (user_id, first_name, last_name, email, job_title,
                            department_id, manager_id, hired_on)
                       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                       RETURNING {EMPLOYEE_COLUMNS}"#
                ))
                .bind(dto.user_id)
                .bind(&dto.first_name)
                .bind(&dto.last_name)
                .bind(&dto.email)
                .bind(&dto.job_title)
                .bind(dto.department_id)
                .bind(dto.manager_id)
                .bind(dto.hired_on)
                .fetch_one(&mut *conn)
                .await?;
                Ok(employee)
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn update(
        db: &PgPool,
        principal: &Principal,
        id: Uuid,
        dto: UpdateEmployeeDto,
    ) -> Result<Employee, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, Employee>(&format!(
                    r#"UPDATE employees SET
                           first_name    = COALESCE($2, first_name),
                           last_name     = COALESCE($3, last_name),
                           email         = COALESCE($4, email),
                           job_title     = COALESCE($5, job_title),
                           department_id = COALESCE($6, department_id),
                           manager_id    = COALESCE($7, manager_id),
                           hired_on      = COALESCE($8, hired_on)
                       WHERE id = $1
                       RETURNING {EMPLOYEE_COLUMNS}"#
                ))
                .bind(id)
                .bind(dto.first_name)
                .bind(dto.last_name)
                .bind(dto.email)
                .bind(dto.job_title)
                .bind(dto.department_id)
                .bind(dto.manager_id)
                .bind(dto.hired_on)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Employee not found"))
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn delete(db: &PgPool, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM employees WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("Employee not found"));
                }
                Ok(())
            })
        })
        .await
    }
}
