use sqlx::{PgConnection, PgPool};

/// Create a relation between two entities.
pub async fn create(
    conn: &mut PgConnection,
    relation_type_name: &str,
    source_id: i64,
    target_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO relations (relation_type_id, source_id, target_id) \
         VALUES ((SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = $1), $2, $3) \
         ON CONFLICT DO NOTHING",
    )
    .bind(relation_type_name)
    .bind(source_id)
    .bind(target_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Target id of the first relation of the given type leaving `source_id`.
pub async fn find_target_id(
    pool: &PgPool,
    source_id: i64,
    relation_type_name: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT r.target_id FROM relations r \
         WHERE r.source_id = $1 \
           AND r.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = $2) \
         ORDER BY r.id LIMIT 1",
    )
    .bind(source_id)
    .bind(relation_type_name)
    .fetch_optional(pool)
    .await
}

/// Source ids of every relation of the given type pointing at `target_id`.
pub async fn find_source_ids(
    pool: &PgPool,
    target_id: i64,
    relation_type_name: &str,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT r.source_id FROM relations r \
         WHERE r.target_id = $1 \
           AND r.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = $2) \
         ORDER BY r.id",
    )
    .bind(target_id)
    .bind(relation_type_name)
    .fetch_all(pool)
    .await
}
