/// Meeting detail read operations.

use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::LocaleSettings;
use crate::errors::{render, AppError};
use crate::models::meeting;
use crate::templates_structs::{MeetingDetailTemplate, PageContext};

use super::helpers::validate_meeting_component;

/// GET /components/{component_id}/meetings/{id}: meeting detail page.
pub async fn detail(
    pool: web::Data<PgPool>,
    locales: web::Data<LocaleSettings>,
    session: Session,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (component_id, id) = path.into_inner();

    let meeting = meeting::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    validate_meeting_component(&meeting, component_id)?;

    let tmpl = MeetingDetailTemplate {
        ctx: PageContext::build(&session, &locales.default),
        meeting,
    };
    render(&tmpl)
}
