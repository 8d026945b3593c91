use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::commands::ports::{MeetingStore, MeetingTx, StoreError};
use crate::models::entity;
use crate::models::questionnaire::{self, Questionnaire};

use super::queries;
use super::types::{Meeting, MeetingReference, NewMeeting, Service, ServiceEntry};

/// PostgreSQL-backed store for the create command.
#[derive(Clone)]
pub struct PgMeetingStore {
    pool: PgPool,
}

impl PgMeetingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// An open sqlx transaction. sqlx rolls it back on drop unless committed.
pub struct PgMeetingTx {
    tx: Transaction<'static, Postgres>,
}

impl PgMeetingTx {
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

impl MeetingStore for PgMeetingStore {
    type Tx = PgMeetingTx;

    async fn begin(&self) -> Result<PgMeetingTx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgMeetingTx { tx })
    }
}

impl MeetingTx for PgMeetingTx {
    async fn reference_exists(&mut self, reference: MeetingReference, id: i64) -> Result<bool, StoreError> {
        Ok(entity::exists_with_type(self.conn(), id, reference.entity_type()).await?)
    }

    async fn insert_meeting(&mut self, new: &NewMeeting<'_>) -> Result<Meeting, StoreError> {
        Ok(queries::create(self.conn(), new).await?)
    }

    async fn insert_questionnaire(&mut self, meeting_id: i64) -> Result<Questionnaire, StoreError> {
        Ok(questionnaire::create_for_meeting(self.conn(), meeting_id).await?)
    }

    async fn insert_service(
        &mut self,
        meeting_id: i64,
        position: i64,
        entry: &ServiceEntry,
    ) -> Result<Service, StoreError> {
        Ok(queries::create_service(self.conn(), meeting_id, position, entry).await?)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
