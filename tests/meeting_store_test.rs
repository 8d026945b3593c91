//! PostgreSQL round trips for the create command.
//!
//! Needs a database: `DATABASE_URL=postgres://... cargo test -- --ignored`.
//! `#[sqlx::test]` creates a fresh database per test and applies `migrations/`.

mod common;

use sqlx::PgPool;

use civic_meetings::audit::{AuditRecord, PgAuditLog};
use civic_meetings::commands::{AuditLog, CommandContext, CreateMeeting, CreateMeetingError, StoreError};
use civic_meetings::models::meeting::{self, PgMeetingStore, PgMeetingTx, TypeOfMeeting};
use civic_meetings::models::{audit, entity};

use common::*;

/// Entities a meeting relates to.
struct Fixture {
    ctx: CommandContext,
    scope_id: i64,
    category_id: i64,
}

async fn insert_entity(pool: &PgPool, entity_type: &str, name: &str) -> i64 {
    let mut conn = pool.acquire().await.expect("connection");
    entity::insert(&mut conn, entity_type, name, name)
        .await
        .expect("fixture entity")
        .id
}

async fn setup_fixture(pool: &PgPool) -> Fixture {
    let component_id = insert_entity(pool, "component", "meetings").await;
    let organization_id = insert_entity(pool, "organization", "city").await;
    let user_id = insert_entity(pool, "user", "admin").await;
    let scope_id = insert_entity(pool, "scope", "district-1").await;
    let category_id = insert_entity(pool, "category", "urbanism").await;
    Fixture {
        ctx: CommandContext {
            user_id,
            organization_id,
            component_id,
        },
        scope_id,
        category_id,
    }
}

/// Audit adapter that always fails, after the other writes are done.
struct BrokenAuditLog;

impl AuditLog<PgMeetingTx> for BrokenAuditLog {
    async fn record(&self, _tx: &mut PgMeetingTx, _record: &AuditRecord) -> Result<i64, StoreError> {
        Err(StoreError::Adapter("audit unavailable".to_string()))
    }
}

fn full_pairs() -> Vec<(String, String)> {
    let pairs = with(valid_pairs(), "meeting[type_of_meeting]", "hybrid");
    let pairs = with(pairs, "meeting[online_meeting_url]", "https://meet.example.org/a");
    let pairs = with(pairs, "meeting[latitude]", "41.3850639");
    let pairs = with(pairs, "meeting[longitude]", "2.1734035");
    let pairs = with(pairs, "meeting[published]", "true");
    let pairs = with(pairs, "meeting[services][0][title][en]", "Childcare");
    with(pairs, "meeting[services][1][title][en]", "Interpreting")
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn created_meeting_reads_back(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;
    let ctx = fixture.ctx;
    let validator = validator();
    let store = PgMeetingStore::new(pool.clone());
    let command = CreateMeeting::new(&validator, &store, &PgAuditLog);
    let before = meeting::count(&pool).await.expect("count");

    let pairs = with(full_pairs(), "meeting[scope_id]", &fixture.scope_id.to_string());
    let pairs = with(pairs, "meeting[category_id]", &fixture.category_id.to_string());
    let pairs = with(pairs, "meeting[customize_registration_email]", "1");
    let pairs = with(pairs, "meeting[registration_email_custom_content][en]", "See you there");
    let pairs = with(pairs, "meeting[show_iframe]", "1");
    let created = command.call(&form(&pairs), &ctx).await.expect("meeting created");

    assert_eq!(meeting::count(&pool).await.expect("count"), before + 1);
    let stored = meeting::find_by_id(&pool, created.id)
        .await
        .expect("query")
        .expect("meeting exists");
    assert!(!stored.published);
    assert_eq!(stored.component_id, ctx.component_id);
    assert_eq!(stored.author_id, ctx.organization_id);
    assert_eq!(stored.attributes, created.attributes);
    assert_eq!(stored.attributes.type_of_meeting, TypeOfMeeting::Hybrid);
    assert_eq!(stored.attributes.scope_id, Some(fixture.scope_id));
    assert_eq!(stored.attributes.category_id, Some(fixture.category_id));
    assert!(stored.attributes.customize_registration_email);
    assert_eq!(
        stored.attributes.registration_email_custom_content.get("en"),
        Some("See you there")
    );
    assert!(stored.attributes.show_iframe);

    let coordinates = stored.attributes.coordinates.expect("coordinates");
    assert_eq!(coordinates.latitude, 41.3850639);
    assert_eq!(coordinates.longitude, 2.1734035);

    let titles: Vec<_> = stored.services.iter().map(|s| s.title.pick("en")).collect();
    assert_eq!(titles, vec!["Childcare", "Interpreting"]);
    assert_eq!(stored.questionnaire.map(|q| q.meeting_id), Some(created.id));

    let entries = audit::find_for_target(&pool, "meeting", created.id)
        .await
        .expect("audit query");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "create");
    assert_eq!(entries[0].visibility, "all");
    assert_eq!(entries[0].user_id, ctx.user_id.to_string());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn failed_audit_write_rolls_back_the_meeting(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;
    let ctx = fixture.ctx;
    let validator = validator();
    let store = PgMeetingStore::new(pool.clone());
    let command = CreateMeeting::new(&validator, &store, &BrokenAuditLog);
    let meetings_before = meeting::count(&pool).await.expect("count");
    let entities_before = entity::count_by_type(&pool, "meeting_service").await.expect("count");

    let result = command.call(&form(&full_pairs()), &ctx).await;

    assert!(matches!(result, Err(CreateMeetingError::PersistenceFailed(_))));
    assert_eq!(meeting::count(&pool).await.expect("count"), meetings_before);
    assert_eq!(
        entity::count_by_type(&pool, "meeting_service").await.expect("count"),
        entities_before
    );
    assert_eq!(entity::count_by_type(&pool, "questionnaire").await.expect("count"), 0);
    assert_eq!(audit::count(&pool).await.expect("count"), 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn references_must_name_a_scope_and_a_category(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;
    let validator = validator();
    let store = PgMeetingStore::new(pool.clone());
    let command = CreateMeeting::new(&validator, &store, &PgAuditLog);

    let missing = with(valid_pairs(), "meeting[scope_id]", "999999");
    let result = command.call(&form(&missing), &fixture.ctx).await;
    assert!(matches!(
        result,
        Err(CreateMeetingError::ValidationRejected(ref e)) if e.has("scope_id")
    ));

    // A component is an entity, but not a scope.
    let wrong_kind = with(
        valid_pairs(),
        "meeting[scope_id]",
        &fixture.ctx.component_id.to_string(),
    );
    let wrong_kind = with(
        wrong_kind,
        "meeting[category_id]",
        &fixture.scope_id.to_string(),
    );
    let Err(CreateMeetingError::ValidationRejected(errors)) =
        command.call(&form(&wrong_kind), &fixture.ctx).await
    else {
        panic!("entities of another type must be rejected");
    };
    assert!(errors.has("scope_id"));
    assert!(errors.has("category_id"));

    assert_eq!(meeting::count(&pool).await.expect("count"), 0);
    assert_eq!(audit::count(&pool).await.expect("count"), 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn meeting_without_component_fails_to_decode(pool: PgPool) {
    let orphan_id = insert_entity(&pool, "meeting", "orphan").await;

    let result = meeting::find_by_id(&pool, orphan_id).await;
    assert!(matches!(result, Err(sqlx::Error::Decode(_))));
}
