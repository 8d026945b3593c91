/// New-meeting form.
///
/// Handles GET requests that render the empty create form.

use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::config::{GeocodingSettings, LocaleSettings};
use crate::errors::{render, AppError};
use crate::forms::{FormErrors, MeetingForm};
use crate::models::meeting::{RegistrationType, TypeOfMeeting};
use crate::templates_structs::{MeetingFormTemplate, PageContext};

use super::forms::NewMeetingQuery;

/// GET /components/{component_id}/meetings/new: render the create form.
///
/// Selector values may be pre-selected through the query string; the field
/// groups are rendered visible or hidden to match them.
pub async fn new_form(
    session: Session,
    locales: web::Data<LocaleSettings>,
    geocoding: web::Data<GeocodingSettings>,
    path: web::Path<i64>,
    query: web::Query<NewMeetingQuery>,
) -> Result<HttpResponse, AppError> {
    let component_id = path.into_inner();
    let query = query.into_inner();

    let type_of_meeting = query
        .type_of_meeting
        .filter(|v| TypeOfMeeting::parse(v).is_some())
        .unwrap_or_else(|| TypeOfMeeting::InPerson.as_str().to_string());
    let registration_type = query
        .registration_type
        .filter(|v| RegistrationType::parse(v).is_some())
        .unwrap_or_else(|| RegistrationType::RegistrationDisabled.as_str().to_string());

    let form = MeetingForm {
        type_of_meeting,
        registration_type,
        transparent: true,
        ..MeetingForm::default()
    };

    let tmpl = MeetingFormTemplate::new(
        PageContext::build(&session, &locales.default),
        component_id,
        form,
        FormErrors::default(),
        locales.available.clone(),
        &geocoding,
    );
    render(&tmpl)
}
