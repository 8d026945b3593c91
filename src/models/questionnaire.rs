use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::models::{entity, relation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireKind {
    Registration,
}

impl QuestionnaireKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
        }
    }
}

/// Registration form attached 1:1 to a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: i64,
    pub meeting_id: i64,
    pub kind: QuestionnaireKind,
}

/// Create the registration questionnaire for a meeting.
///
/// Inserts an entity with `entity_type='questionnaire'` and a
/// `questionnaire_for` relation pointing at the meeting.
pub async fn create_for_meeting(
    conn: &mut PgConnection,
    meeting_id: i64,
) -> Result<Questionnaire, sqlx::Error> {
    let kind = QuestionnaireKind::Registration;
    let row = entity::insert(
        conn,
        "questionnaire",
        &format!("meeting-{meeting_id}-registration"),
        "Registration form",
    )
    .await?;
    entity::set_property(conn, row.id, "kind", kind.as_str()).await?;
    relation::create(conn, "questionnaire_for", row.id, meeting_id).await?;

    Ok(Questionnaire {
        id: row.id,
        meeting_id,
        kind,
    })
}

/// Find the questionnaire linked to a meeting, if any.
pub async fn find_for_meeting(
    pool: &PgPool,
    meeting_id: i64,
) -> Result<Option<Questionnaire>, sqlx::Error> {
    let ids = relation::find_source_ids(pool, meeting_id, "questionnaire_for").await?;
    Ok(ids.first().map(|&id| Questionnaire {
        id,
        meeting_id,
        kind: QuestionnaireKind::Registration,
    }))
}
