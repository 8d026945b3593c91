use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Entity {
    pub id: i64,
    pub entity_type: String,
    pub name: String,
    pub label: String,
    pub created_at: String,
}

/// Find a single entity by id.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Entity>, sqlx::Error> {
    sqlx::query_as::<_, Entity>(
        "SELECT id, entity_type, name, label, created_at::TEXT AS created_at \
         FROM entities WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert an entity, returning it with its generated id and timestamp.
pub async fn insert(
    conn: &mut PgConnection,
    entity_type: &str,
    name: &str,
    label: &str,
) -> Result<Entity, sqlx::Error> {
    sqlx::query_as::<_, Entity>(
        "INSERT INTO entities (entity_type, name, label) VALUES ($1, $2, $3) \
         RETURNING id, entity_type, name, label, created_at::TEXT AS created_at",
    )
    .bind(entity_type)
    .bind(name)
    .bind(label)
    .fetch_one(conn)
    .await
}

/// True when an entity with this id and type exists.
pub async fn exists_with_type(
    conn: &mut PgConnection,
    id: i64,
    entity_type: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM entities WHERE id = $1 AND entity_type = $2)")
        .bind(id)
        .bind(entity_type)
        .fetch_one(conn)
        .await
}

/// Upsert a single property.
pub async fn set_property(
    conn: &mut PgConnection,
    entity_id: i64,
    key: &str,
    value: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, $2, $3) \
         ON CONFLICT (entity_id, key) DO UPDATE SET value = excluded.value",
    )
    .bind(entity_id)
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;
    Ok(())
}

/// Load every property of an entity as a key/value map.
pub async fn find_properties(
    pool: &PgPool,
    entity_id: i64,
) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT key, value FROM entity_properties WHERE entity_id = $1")
            .bind(entity_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

/// Count entities of one type.
pub async fn count_by_type(pool: &PgPool, entity_type: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM entities WHERE entity_type = $1")
        .bind(entity_type)
        .fetch_one(pool)
        .await
}
