use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A billing line item. Amounts are stored in minor units; any cost
/// arithmetic happens upstream of this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingRecord {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub description: String,
    pub amount_cents: i64,
    pub billed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBillingRecordDto {
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0))]
    pub amount_cents: i64,
    pub billed_on: NaiveDate,
}
