//! Append-only audit trail. Writes here are best effort: a failed insert is
//! logged and the request that caused it still succeeds.

use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

pub async fn record(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    let inserted = sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, resource, metadata) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await;

    match inserted {
        Ok(_) => tracing::debug!(action, resource, ?user_id, "audit"),
        Err(err) => tracing::warn!(error = %err, action, resource, "audit log failed"),
    }
}
