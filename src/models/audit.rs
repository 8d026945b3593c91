use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: String,
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    pub summary: String,
    pub details: String,
    pub visibility: String,
    pub created_at: String,
}

/// SQL for audit entry display: entity + properties.
const SELECT_AUDIT: &str = "\
    SELECT e.id, \
           COALESCE(p_user_id.value, '0') AS user_id, \
           COALESCE(p_action.value, '') AS action, \
           COALESCE(p_target_type.value, '') AS target_type, \
           COALESCE(p_target_id.value, '0') AS target_id, \
           COALESCE(p_summary.value, '') AS summary, \
           COALESCE(p_details.value, '{}') AS details, \
           COALESCE(p_visibility.value, 'all') AS visibility, \
           e.created_at::TEXT AS created_at \
    FROM entities e \
    LEFT JOIN entity_properties p_user_id ON e.id = p_user_id.entity_id AND p_user_id.key = 'user_id' \
    LEFT JOIN entity_properties p_action ON e.id = p_action.entity_id AND p_action.key = 'action' \
    LEFT JOIN entity_properties p_target_type ON e.id = p_target_type.entity_id AND p_target_type.key = 'target_type' \
    LEFT JOIN entity_properties p_target_id ON e.id = p_target_id.entity_id AND p_target_id.key = 'target_id' \
    LEFT JOIN entity_properties p_summary ON e.id = p_summary.entity_id AND p_summary.key = 'summary' \
    LEFT JOIN entity_properties p_details ON e.id = p_details.entity_id AND p_details.key = 'details' \
    LEFT JOIN entity_properties p_visibility ON e.id = p_visibility.entity_id AND p_visibility.key = 'visibility' \
    WHERE e.entity_type = 'audit_entry'";

/// Audit entries written for one target, oldest first.
pub async fn find_for_target(
    pool: &PgPool,
    target_type: &str,
    target_id: i64,
) -> Result<Vec<AuditEntry>, sqlx::Error> {
    let sql = format!(
        "{SELECT_AUDIT} AND p_target_type.value = $1 AND p_target_id.value = $2 ORDER BY e.id ASC"
    );
    sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(target_type)
        .bind(target_id.to_string())
        .fetch_all(pool)
        .await
}

/// Total number of audit entries.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    crate::models::entity::count_by_type(pool, "audit_entry").await
}
