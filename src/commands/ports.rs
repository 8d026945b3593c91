//! Capabilities the create command depends on.
//!
//! The command never touches a pool or a session directly. Production wires in
//! [`crate::models::meeting::PgMeetingStore`], [`crate::audit::PgAuditLog`] and
//! [`crate::forms::MeetingFormValidator`]; tests supply in-memory adapters.

use std::fmt;

use crate::audit::AuditRecord;
use crate::forms::{FormErrors, MeetingForm};
use crate::models::meeting::{
    Meeting, MeetingDraft, MeetingReference, NewMeeting, Service, ServiceEntry,
};
use crate::models::questionnaire::Questionnaire;

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    Adapter(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "Database error: {e}"),
            StoreError::Adapter(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Db(e)
    }
}

/// Turns a raw submitted form into a normalized draft, or rejects it.
pub trait Validator {
    fn validate(&self, form: &MeetingForm) -> Result<MeetingDraft, FormErrors>;
}

/// Opens transactions for the create command.
#[allow(async_fn_in_trait)]
pub trait MeetingStore {
    type Tx: MeetingTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One unit of work. Dropping it without `commit` discards every write.
#[allow(async_fn_in_trait)]
pub trait MeetingTx {
    /// Whether `id` names an existing scope or category.
    async fn reference_exists(&mut self, reference: MeetingReference, id: i64) -> Result<bool, StoreError>;

    async fn insert_meeting(&mut self, new: &NewMeeting<'_>) -> Result<Meeting, StoreError>;

    async fn insert_questionnaire(&mut self, meeting_id: i64) -> Result<Questionnaire, StoreError>;

    async fn insert_service(
        &mut self,
        meeting_id: i64,
        position: i64,
        entry: &ServiceEntry,
    ) -> Result<Service, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}

/// Append-only trace of who did what. Writes go through the caller's transaction.
#[allow(async_fn_in_trait)]
pub trait AuditLog<Tx> {
    async fn record(&self, tx: &mut Tx, record: &AuditRecord) -> Result<i64, StoreError>;
}
