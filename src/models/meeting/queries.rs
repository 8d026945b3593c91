use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

use crate::models::translated::TranslatedText;
use crate::models::{entity, questionnaire, relation};

use super::types::*;

pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn encode_error(e: serde_json::Error) -> sqlx::Error {
    sqlx::Error::Encode(Box::new(e))
}

fn json(text: &TranslatedText) -> Result<String, sqlx::Error> {
    text.to_json().map_err(encode_error)
}

/// Property rows for a meeting's attributes. Absent optionals are skipped.
fn attribute_properties(attrs: &MeetingAttributes) -> Result<Vec<(&'static str, String)>, sqlx::Error> {
    let mut props = vec![
        ("title", json(&attrs.title)?),
        ("description", json(&attrs.description)?),
        ("location", json(&attrs.location)?),
        ("location_hints", json(&attrs.location_hints)?),
        ("start_time", attrs.start_time.format(TIME_FORMAT).to_string()),
        ("end_time", attrs.end_time.format(TIME_FORMAT).to_string()),
        ("address", attrs.address.clone()),
        ("private_meeting", attrs.private_meeting.to_string()),
        ("transparent", attrs.transparent.to_string()),
        ("type_of_meeting", attrs.type_of_meeting.as_str().to_string()),
        (
            "registration_type",
            attrs.registration.registration_type.as_str().to_string(),
        ),
        (
            "available_slots",
            attrs.registration.available_slots.to_string(),
        ),
        (
            "registration_terms",
            json(&attrs.registration.registration_terms)?,
        ),
        (
            "customize_registration_email",
            attrs.customize_registration_email.to_string(),
        ),
        (
            "registration_email_custom_content",
            json(&attrs.registration_email_custom_content)?,
        ),
        ("show_iframe", attrs.show_iframe.to_string()),
        ("published", "false".to_string()),
    ];
    if let Some(c) = attrs.coordinates {
        // f64 Display is the shortest string that parses back to the same value.
        props.push(("latitude", c.latitude.to_string()));
        props.push(("longitude", c.longitude.to_string()));
    }
    if let Some(url) = &attrs.registration.registration_url {
        props.push(("registration_url", url.clone()));
    }
    if let Some(url) = &attrs.online_meeting_url {
        props.push(("online_meeting_url", url.clone()));
    }
    Ok(props)
}

fn slugify(s: &str) -> String {
    let slug: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    slug.split('-')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Insert the meeting entity, its properties and its ownership relations.
///
/// The meeting is always stored unpublished. Services and the questionnaire
/// are written separately by the caller inside the same transaction.
pub async fn create(conn: &mut PgConnection, new: &NewMeeting<'_>) -> Result<Meeting, sqlx::Error> {
    let attrs = new.attributes;
    let label = attrs
        .title
        .0
        .values()
        .find(|t| !t.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| "Untitled meeting".to_string());
    let name = format!("{}-{}", slugify(&label), attrs.start_time.format("%Y-%m-%d"));

    let row = entity::insert(conn, "meeting", &name, &label).await?;

    for (key, value) in attribute_properties(attrs)? {
        entity::set_property(conn, row.id, key, &value).await?;
    }

    relation::create(conn, "belongs_to_component", row.id, new.component_id).await?;
    relation::create(conn, "authored_by", row.id, new.author_id).await?;
    if let Some(scope_id) = attrs.scope_id {
        relation::create(conn, "in_scope", row.id, scope_id).await?;
    }
    if let Some(category_id) = attrs.category_id {
        relation::create(conn, "in_category", row.id, category_id).await?;
    }

    Ok(Meeting {
        id: row.id,
        author_id: new.author_id,
        component_id: new.component_id,
        published: false,
        created_at: row.created_at,
        attributes: attrs.clone(),
        services: Vec::new(),
        questionnaire: None,
    })
}

/// Insert one service of a meeting at the given position.
pub async fn create_service(
    conn: &mut PgConnection,
    meeting_id: i64,
    position: i64,
    entry: &ServiceEntry,
) -> Result<Service, sqlx::Error> {
    let label = entry.title.0.values().next().cloned().unwrap_or_default();
    let row = entity::insert(
        conn,
        "meeting_service",
        &format!("meeting-{meeting_id}-service-{position}"),
        &label,
    )
    .await?;
    entity::set_property(conn, row.id, "title", &json(&entry.title)?).await?;
    entity::set_property(conn, row.id, "description", &json(&entry.description)?).await?;
    entity::set_property(conn, row.id, "position", &position.to_string()).await?;
    relation::create(conn, "service_of", row.id, meeting_id).await?;

    Ok(Service {
        id: row.id,
        position,
        title: entry.title.clone(),
        description: entry.description.clone(),
    })
}

/// Services of a meeting in position order.
pub async fn find_services(pool: &PgPool, meeting_id: i64) -> Result<Vec<Service>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        title: String,
        description: String,
        position: String,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT e.id, \
                COALESCE(p_title.value, '{}') AS title, \
                COALESCE(p_desc.value, '{}') AS description, \
                COALESCE(p_pos.value, '0') AS position \
         FROM entities e \
         JOIN relations r ON r.source_id = e.id \
             AND r.relation_type_id = (SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'service_of') \
             AND r.target_id = $1 \
         LEFT JOIN entity_properties p_title ON e.id = p_title.entity_id AND p_title.key = 'title' \
         LEFT JOIN entity_properties p_desc ON e.id = p_desc.entity_id AND p_desc.key = 'description' \
         LEFT JOIN entity_properties p_pos ON e.id = p_pos.entity_id AND p_pos.key = 'position' \
         WHERE e.entity_type = 'meeting_service'",
    )
    .bind(meeting_id)
    .fetch_all(pool)
    .await?;

    let mut services: Vec<Service> = rows
        .into_iter()
        .map(|row| Service {
            id: row.id,
            position: row.position.parse().unwrap_or(0),
            title: TranslatedText::from_json(&row.title),
            description: TranslatedText::from_json(&row.description),
        })
        .collect();
    services.sort_by_key(|s| (s.position, s.id));
    Ok(services)
}

fn decode_error(msg: String) -> sqlx::Error {
    sqlx::Error::Decode(msg.into())
}

fn prop<'a>(props: &'a HashMap<String, String>, key: &str) -> &'a str {
    props.get(key).map(String::as_str).unwrap_or("")
}

fn translated(props: &HashMap<String, String>, key: &str) -> TranslatedText {
    TranslatedText::from_json(props.get(key).map(String::as_str).unwrap_or("{}"))
}

fn flag(props: &HashMap<String, String>, key: &str) -> bool {
    prop(props, key) == "true"
}

fn time(props: &HashMap<String, String>, key: &str) -> Result<NaiveDateTime, sqlx::Error> {
    NaiveDateTime::parse_from_str(prop(props, key), TIME_FORMAT)
        .map_err(|e| decode_error(format!("meeting {key}: {e}")))
}

fn decode_attributes(
    props: &HashMap<String, String>,
    scope_id: Option<i64>,
    category_id: Option<i64>,
) -> Result<MeetingAttributes, sqlx::Error> {
    let coordinates = match (props.get("latitude"), props.get("longitude")) {
        (Some(lat), Some(lng)) => Some(Coordinates {
            latitude: lat
                .parse()
                .map_err(|_| decode_error(format!("meeting latitude: {lat}")))?,
            longitude: lng
                .parse()
                .map_err(|_| decode_error(format!("meeting longitude: {lng}")))?,
        }),
        _ => None,
    };

    let type_of_meeting = TypeOfMeeting::parse(prop(props, "type_of_meeting"))
        .ok_or_else(|| decode_error("meeting type_of_meeting".to_string()))?;
    let registration_type = RegistrationType::parse(prop(props, "registration_type"))
        .ok_or_else(|| decode_error("meeting registration_type".to_string()))?;

    Ok(MeetingAttributes {
        title: translated(props, "title"),
        description: translated(props, "description"),
        location: translated(props, "location"),
        location_hints: translated(props, "location_hints"),
        start_time: time(props, "start_time")?,
        end_time: time(props, "end_time")?,
        address: prop(props, "address").to_string(),
        coordinates,
        scope_id,
        category_id,
        private_meeting: flag(props, "private_meeting"),
        transparent: flag(props, "transparent"),
        type_of_meeting,
        registration: RegistrationSettings {
            registration_type,
            available_slots: prop(props, "available_slots").parse().unwrap_or(0),
            registration_url: props.get("registration_url").cloned(),
            registration_terms: translated(props, "registration_terms"),
        },
        online_meeting_url: props.get("online_meeting_url").cloned(),
        customize_registration_email: flag(props, "customize_registration_email"),
        registration_email_custom_content: translated(props, "registration_email_custom_content"),
        show_iframe: flag(props, "show_iframe"),
    })
}

/// Find a meeting by its entity id, with its services and questionnaire.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Meeting>, sqlx::Error> {
    let row = match entity::find_by_id(pool, id).await? {
        Some(e) if e.entity_type == "meeting" => e,
        _ => return Ok(None),
    };

    let props = entity::find_properties(pool, id).await?;
    let component_id = relation::find_target_id(pool, id, "belongs_to_component")
        .await?
        .ok_or_else(|| decode_error(format!("meeting {id} has no component")))?;
    let author_id = relation::find_target_id(pool, id, "authored_by")
        .await?
        .ok_or_else(|| decode_error(format!("meeting {id} has no author")))?;
    let scope_id = relation::find_target_id(pool, id, "in_scope").await?;
    let category_id = relation::find_target_id(pool, id, "in_category").await?;

    Ok(Some(Meeting {
        id,
        author_id,
        component_id,
        published: flag(&props, "published"),
        created_at: row.created_at,
        attributes: decode_attributes(&props, scope_id, category_id)?,
        services: find_services(pool, id).await?,
        questionnaire: questionnaire::find_for_meeting(pool, id).await?,
    }))
}

/// Total number of meetings.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    entity::count_by_type(pool, "meeting").await
}
