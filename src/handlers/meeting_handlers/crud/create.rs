/// Meeting creation.
///
/// Handles the POST of the admin create form: CSRF check, then the
/// create command with the Postgres store and audit adapters.

use actix_session::Session;
use actix_web::{web, HttpResponse};
use askama::Template;
use sqlx::PgPool;

use crate::audit::PgAuditLog;
use crate::auth::csrf;
use crate::auth::session::require_actor;
use crate::commands::{CommandContext, CreateMeeting, CreateMeetingError};
use crate::config::{GeocodingSettings, LocaleSettings};
use crate::errors::AppError;
use crate::models::meeting::PgMeetingStore;
use crate::templates_structs::{MeetingFormTemplate, PageContext};

use super::forms::MeetingSubmission;
use super::helpers::validator_for;

/// POST /components/{component_id}/meetings: create a meeting.
///
/// On success redirects to the detail page. An invalid form is rendered
/// again with its errors and a 422 status; nothing is written.
pub async fn create(
    pool: web::Data<PgPool>,
    locales: web::Data<LocaleSettings>,
    geocoding: web::Data<GeocodingSettings>,
    session: Session,
    path: web::Path<i64>,
    body: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let submission = MeetingSubmission::from_pairs(&body);
    csrf::verify(&session, &submission.csrf_token)?;

    let component_id = path.into_inner();
    let (user_id, organization_id) = require_actor(&session)?;

    let validator = validator_for(&locales);
    let store = PgMeetingStore::new(pool.get_ref().clone());
    let command = CreateMeeting::new(&validator, &store, &PgAuditLog);
    let ctx = CommandContext {
        user_id,
        organization_id,
        component_id,
    };

    match command.call(&submission.form, &ctx).await {
        Ok(meeting) => {
            let _ = session.insert("flash", "Meeting created successfully");
            Ok(HttpResponse::SeeOther()
                .insert_header((
                    "Location",
                    format!("/components/{}/meetings/{}", component_id, meeting.id),
                ))
                .finish())
        }
        Err(CreateMeetingError::ValidationRejected(errors)) => {
            let tmpl = MeetingFormTemplate::new(
                PageContext::build(&session, &locales.default),
                component_id,
                submission.form,
                errors,
                locales.available.clone(),
                &geocoding,
            );
            Ok(HttpResponse::UnprocessableEntity()
                .content_type("text/html; charset=utf-8")
                .body(tmpl.render()?))
        }
        Err(CreateMeetingError::PersistenceFailed(e)) => Err(AppError::Persistence(e)),
    }
}
