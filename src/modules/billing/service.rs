use sqlx::PgPool;
use tracing::instrument;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::{BillingRecord, CreateBillingRecordDto};

const BILLING_COLUMNS: &str = "id, department_id, description, amount_cents, billed_on, created_at";

pub struct BillingService;

impl BillingService {
    #[instrument(skip(db, principal))]
    pub async fn list(db: &PgPool, principal: &Principal) -> Result<Vec<BillingRecord>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let records = sqlx::query_as::<_, BillingRecord>(&format!(
                    "SELECT {BILLING_COLUMNS} FROM billing_records ORDER BY billed_on DESC"
                ))
                .fetch_all(&mut *conn)
                .await?;
                Ok(records)
            })
        })
        .await
    }

    #[instrument(skip(db, principal, dto))]
    pub async fn create(
        db: &PgPool,
        principal: &Principal,
        dto: CreateBillingRecordDto,
    ) -> Result<BillingRecord, AppError> {
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                let record = sqlx::query_as::<_, BillingRecord>(&format!(
                    r#"INSERT INTO billing_records
                           (department_id, description, amount_cents, billed_on)
                       VALUES ($1, $2, $3, $4)
                       RETURNING {BILLING_COLUMNS}"#
                ))
                .bind(dto.department_id)
                .bind(&dto.description)
                .bind(dto.amount_cents)
                .bind(dto.billed_on)
                .fetch_one(&mut *conn)
                .await?;
                Ok(record)
            })
        })
        .await
    }
}
