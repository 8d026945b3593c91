use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgConnection;

use crate::commands::ports::{AuditLog, StoreError};
use crate::models::entity;
use crate::models::meeting::PgMeetingTx;

/// Who may see an audit entry in the admin log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditVisibility {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "admin-only")]
    AdminOnly,
    #[serde(rename = "public-only")]
    PublicOnly,
}

impl AuditVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::AdminOnly => "admin-only",
            Self::PublicOnly => "public-only",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [Self::All, Self::AdminOnly, Self::PublicOnly]
            .into_iter()
            .find(|v| v.as_str() == value)
    }
}

/// One entry to append to the audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub user_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: Value,
    pub visibility: AuditVisibility,
}

/// Write an audit entry on the given connection (usually an open transaction).
pub async fn log(conn: &mut PgConnection, record: &AuditRecord) -> Result<i64, sqlx::Error> {
    let summary = record
        .details
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {} #{}", record.action, record.target_type, record.target_id));

    let row = entity::insert(conn, "audit_entry", &record.action, &summary).await?;

    let props = [
        ("user_id", record.user_id.to_string()),
        ("action", record.action.clone()),
        ("target_type", record.target_type.clone()),
        ("target_id", record.target_id.to_string()),
        ("summary", summary),
        ("details", record.details.to_string()),
        ("visibility", record.visibility.as_str().to_string()),
    ];
    for (key, value) in props {
        entity::set_property(conn, row.id, key, &value).await?;
    }

    Ok(row.id)
}

/// Audit adapter that writes into the create command's sqlx transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgAuditLog;

impl AuditLog<PgMeetingTx> for PgAuditLog {
    async fn record(&self, tx: &mut PgMeetingTx, record: &AuditRecord) -> Result<i64, StoreError> {
        Ok(log(tx.conn(), record).await?)
    }
}
