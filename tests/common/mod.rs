//! Shared test infrastructure.
//!
//! # In-memory adapters
//! - `MemoryStore` / `MemoryTx` - staged writes, applied only on commit
//! - `MemoryAuditLog` - writes audit records through the open `MemoryTx`
//! - `FailPoint` - makes one step of the unit of work fail
//! - `MemoryStore::with_reference` - scopes and categories that resolve
//!
//! # Form builders
//! - `valid_pairs()` - a minimal in-person meeting that passes validation
//! - `with()` - override or append a submitted field

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use civic_meetings::audit::AuditRecord;
use civic_meetings::commands::{AuditLog, MeetingStore, MeetingTx, StoreError};
use civic_meetings::forms::{MeetingForm, MeetingFormValidator};
use civic_meetings::models::meeting::{
    Meeting, MeetingReference, NewMeeting, Service, ServiceEntry,
};
use civic_meetings::models::questionnaire::{Questionnaire, QuestionnaireKind};

// ============================================================================
// FAILURE INJECTION
// ============================================================================

/// The step of the unit of work that should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    Meeting,
    Questionnaire,
    /// The n-th service insert (0-based).
    Service(i64),
    Audit,
    Commit,
}

fn injected(point: FailPoint) -> StoreError {
    StoreError::Adapter(format!("injected failure at {point:?}"))
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Everything committed so far.
#[derive(Debug, Default, Clone)]
pub struct Committed {
    pub meetings: Vec<Meeting>,
    pub questionnaires: Vec<Questionnaire>,
    pub services: Vec<(i64, Service)>,
    pub audit: Vec<AuditRecord>,
}

#[derive(Debug, Default)]
struct Shared {
    committed: Committed,
    next_id: i64,
    begun: usize,
}

impl Shared {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<Shared>>,
    fail_at: Option<FailPoint>,
    references: Vec<(MeetingReference, i64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(point: FailPoint) -> Self {
        Self {
            fail_at: Some(point),
            ..Self::default()
        }
    }

    /// Make a scope or category with this id resolvable.
    pub fn with_reference(mut self, reference: MeetingReference, id: i64) -> Self {
        self.references.push((reference, id));
        self
    }

    pub fn committed(&self) -> Committed {
        self.shared.lock().expect("store lock").committed.clone()
    }

    pub fn meeting_count(&self) -> usize {
        self.committed().meetings.len()
    }

    /// Number of transactions opened, committed or not.
    pub fn transactions_begun(&self) -> usize {
        self.shared.lock().expect("store lock").begun
    }

    pub fn services_of(&self, meeting_id: i64) -> Vec<Service> {
        let mut services: Vec<Service> = self
            .committed()
            .services
            .into_iter()
            .filter(|(mid, _)| *mid == meeting_id)
            .map(|(_, s)| s)
            .collect();
        services.sort_by_key(|s| s.position);
        services
    }
}

/// Writes staged by one transaction.
#[derive(Debug)]
pub struct MemoryTx {
    shared: Arc<Mutex<Shared>>,
    fail_at: Option<FailPoint>,
    references: Vec<(MeetingReference, i64)>,
    staged: Committed,
}

impl MemoryTx {
    fn check(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.fail_at == Some(point) {
            return Err(injected(point));
        }
        Ok(())
    }

    fn next_id(&self) -> i64 {
        self.shared.lock().expect("store lock").next_id()
    }
}

impl MeetingStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        if self.fail_at == Some(FailPoint::Begin) {
            return Err(injected(FailPoint::Begin));
        }
        self.shared.lock().expect("store lock").begun += 1;
        Ok(MemoryTx {
            shared: Arc::clone(&self.shared),
            fail_at: self.fail_at,
            references: self.references.clone(),
            staged: Committed::default(),
        })
    }
}

impl MeetingTx for MemoryTx {
    async fn reference_exists(&mut self, reference: MeetingReference, id: i64) -> Result<bool, StoreError> {
        Ok(self.references.contains(&(reference, id)))
    }

    async fn insert_meeting(&mut self, new: &NewMeeting<'_>) -> Result<Meeting, StoreError> {
        self.check(FailPoint::Meeting)?;
        let meeting = Meeting {
            id: self.next_id(),
            author_id: new.author_id,
            component_id: new.component_id,
            published: false,
            created_at: "2026-01-01T00:00:00".to_string(),
            attributes: new.attributes.clone(),
            services: Vec::new(),
            questionnaire: None,
        };
        self.staged.meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn insert_questionnaire(&mut self, meeting_id: i64) -> Result<Questionnaire, StoreError> {
        self.check(FailPoint::Questionnaire)?;
        let questionnaire = Questionnaire {
            id: self.next_id(),
            meeting_id,
            kind: QuestionnaireKind::Registration,
        };
        self.staged.questionnaires.push(questionnaire.clone());
        Ok(questionnaire)
    }

    async fn insert_service(
        &mut self,
        meeting_id: i64,
        position: i64,
        entry: &ServiceEntry,
    ) -> Result<Service, StoreError> {
        self.check(FailPoint::Service(position))?;
        let service = Service {
            id: self.next_id(),
            position,
            title: entry.title.clone(),
            description: entry.description.clone(),
        };
        self.staged.services.push((meeting_id, service.clone()));
        Ok(service)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.check(FailPoint::Commit)?;
        let mut shared = self.shared.lock().expect("store lock");
        let staged = self.staged;
        shared.committed.meetings.extend(staged.meetings);
        shared.committed.questionnaires.extend(staged.questionnaires);
        shared.committed.services.extend(staged.services);
        shared.committed.audit.extend(staged.audit);
        Ok(())
    }
}

/// Audit adapter that stages records in the caller's `MemoryTx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAuditLog;

impl AuditLog<MemoryTx> for MemoryAuditLog {
    async fn record(&self, tx: &mut MemoryTx, record: &AuditRecord) -> Result<i64, StoreError> {
        tx.check(FailPoint::Audit)?;
        tx.staged.audit.push(record.clone());
        Ok(tx.next_id())
    }
}

// ============================================================================
// FORM BUILDERS
// ============================================================================

pub fn validator() -> MeetingFormValidator {
    MeetingFormValidator::new(vec!["en".to_string(), "ca".to_string()], "en")
}

/// A minimal in-person meeting with registration disabled.
pub fn valid_pairs() -> Vec<(String, String)> {
    [
        ("meeting[title][en]", "Neighbourhood assembly"),
        ("meeting[title][ca]", "Assemblea de barri"),
        ("meeting[description][en]", "Open discussion about the square"),
        ("meeting[start_time]", "2026-11-03T18:00"),
        ("meeting[end_time]", "2026-11-03T20:00"),
        ("meeting[type_of_meeting]", "in_person"),
        ("meeting[address]", "Plaça Major 1, Barcelona"),
        ("meeting[registration_type]", "registration_disabled"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Replace every pair with this key, or append it when absent.
pub fn with(mut pairs: Vec<(String, String)>, key: &str, value: &str) -> Vec<(String, String)> {
    pairs.retain(|(k, _)| k != key);
    pairs.push((key.to_string(), value.to_string()));
    pairs
}

/// Remove every pair with this key.
pub fn without(mut pairs: Vec<(String, String)>, key: &str) -> Vec<(String, String)> {
    pairs.retain(|(k, _)| k != key);
    pairs
}

pub fn form(pairs: &[(String, String)]) -> MeetingForm {
    MeetingForm::from_pairs(pairs)
}
