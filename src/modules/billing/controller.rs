use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::audit::{AuditEntry, ClientMeta};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{BillingRecord, CreateBillingRecordDto};
use super::service::BillingService;

pub async fn list_billing_records(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<BillingRecord>>, AppError> {
    let records = BillingService::list(&state.db, &principal).await?;
    Ok(Json(records))
}

pub async fn create_billing_record(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<CreateBillingRecordDto>,
) -> Result<(StatusCode, Json<BillingRecord>), AppError> {
    let record = BillingService::create(&state.db, &principal, dto).await?;

    state.audit.record(
        AuditEntry::new("billing.create", "billing_records")
            .actor(principal.user_id)
            .resource_id(record.id.to_string())
            .details(json!({ "amount_cents": record.amount_cents }))
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(record)))
}
