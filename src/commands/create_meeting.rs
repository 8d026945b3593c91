use std::fmt;

use serde_json::{json, Value};

use crate::audit::{AuditRecord, AuditVisibility};
use crate::forms::{FormErrors, MeetingForm};
use crate::models::meeting::{Meeting, MeetingDraft, MeetingReference, NewMeeting};

use super::ports::{AuditLog, MeetingStore, MeetingTx, StoreError, Validator};

/// Who is creating the meeting, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    /// Acting user, recorded in the audit trail.
    pub user_id: i64,
    /// Organization recorded as the meeting's author.
    pub organization_id: i64,
    pub component_id: i64,
}

#[derive(Debug)]
pub enum CreateMeetingError {
    /// The form did not validate. Nothing was written.
    ValidationRejected(FormErrors),
    /// A write failed. The transaction was rolled back.
    PersistenceFailed(StoreError),
}

impl fmt::Display for CreateMeetingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateMeetingError::ValidationRejected(errors) => {
                write!(f, "Invalid meeting form: {}", errors.messages().join("; "))
            }
            CreateMeetingError::PersistenceFailed(e) => write!(f, "Meeting not created: {e}"),
        }
    }
}

impl std::error::Error for CreateMeetingError {}

impl From<StoreError> for CreateMeetingError {
    fn from(e: StoreError) -> Self {
        CreateMeetingError::PersistenceFailed(e)
    }
}

/// Creates an unpublished meeting with its services, its registration
/// questionnaire and an audit entry, all in one transaction.
pub struct CreateMeeting<'a, V, S, A> {
    validator: &'a V,
    store: &'a S,
    audit: &'a A,
}

impl<'a, V, S, A> CreateMeeting<'a, V, S, A>
where
    V: Validator,
    S: MeetingStore,
    A: AuditLog<S::Tx>,
{
    pub fn new(validator: &'a V, store: &'a S, audit: &'a A) -> Self {
        Self {
            validator,
            store,
            audit,
        }
    }

    pub async fn call(
        &self,
        form: &MeetingForm,
        ctx: &CommandContext,
    ) -> Result<Meeting, CreateMeetingError> {
        let draft = match self.validator.validate(form) {
            Ok(draft) => draft,
            Err(errors) => {
                log::debug!(
                    "Meeting form rejected for component {}: {} error(s)",
                    ctx.component_id,
                    errors.0.len()
                );
                return Err(CreateMeetingError::ValidationRejected(errors));
            }
        };

        let meeting = match self.persist(&draft, ctx).await {
            Ok(meeting) => meeting,
            Err(CreateMeetingError::PersistenceFailed(e)) => {
                log::error!(
                    "Failed to create meeting in component {}: {e}",
                    ctx.component_id
                );
                return Err(CreateMeetingError::PersistenceFailed(e));
            }
            Err(rejected) => {
                log::debug!(
                    "Meeting references rejected for component {}: {rejected}",
                    ctx.component_id
                );
                return Err(rejected);
            }
        };

        log::info!(
            "Meeting {} created in component {} by user {} ({} service(s))",
            meeting.id,
            ctx.component_id,
            ctx.user_id,
            meeting.services.len()
        );
        Ok(meeting)
    }

    async fn persist(
        &self,
        draft: &MeetingDraft,
        ctx: &CommandContext,
    ) -> Result<Meeting, CreateMeetingError> {
        // An early return drops `tx`, which rolls every write back.
        let mut tx = self.store.begin().await?;

        let mut errors = FormErrors::default();
        for reference in MeetingReference::ALL {
            let Some(id) = reference.id_in(&draft.attributes) else {
                continue;
            };
            if !tx.reference_exists(reference, id).await? {
                errors.add(
                    reference.field(),
                    format!("No {} with id {id}", reference.entity_type()),
                );
            }
        }
        if !errors.is_empty() {
            return Err(CreateMeetingError::ValidationRejected(errors));
        }

        let mut meeting = tx
            .insert_meeting(&NewMeeting {
                attributes: &draft.attributes,
                author_id: ctx.organization_id,
                component_id: ctx.component_id,
            })
            .await?;

        meeting.questionnaire = Some(tx.insert_questionnaire(meeting.id).await?);

        for (position, entry) in draft.services.iter().enumerate() {
            let service = tx.insert_service(meeting.id, position as i64, entry).await?;
            meeting.services.push(service);
        }

        let details = audit_details(&meeting)?;
        self.audit
            .record(
                &mut tx,
                &AuditRecord {
                    user_id: ctx.user_id,
                    action: "create".to_string(),
                    target_type: "meeting".to_string(),
                    target_id: meeting.id,
                    details,
                    visibility: AuditVisibility::All,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(meeting)
    }
}

/// Audit snapshot of a created meeting, with a one-line `summary`.
pub fn audit_details(meeting: &Meeting) -> Result<Value, StoreError> {
    let mut details = serde_json::to_value(meeting)
        .map_err(|e| StoreError::Adapter(format!("meeting snapshot: {e}")))?;
    let Some(obj) = details.as_object_mut() else {
        return Err(StoreError::Adapter("meeting snapshot is not an object".to_string()));
    };
    obj.insert(
        "summary".to_string(),
        json!(format!("Meeting \"{}\" created", meeting.display_title(""))),
    );
    Ok(details)
}
