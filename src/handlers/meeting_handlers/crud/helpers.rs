/// Shared helpers for meeting handlers.
///
/// - Component boundary check
/// - Validator construction from the configured locales

use crate::config::LocaleSettings;
use crate::errors::AppError;
use crate::forms::MeetingFormValidator;
use crate::models::meeting::Meeting;

/// Validates that a meeting belongs to the requested component.
///
/// Prevents reading meetings of component A through the URL of component B.
///
/// # Errors
/// - `AppError::NotFound` if the meeting belongs to another component
pub fn validate_meeting_component(meeting: &Meeting, component_id: i64) -> Result<(), AppError> {
    if meeting.component_id != component_id {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub fn validator_for(locales: &LocaleSettings) -> MeetingFormValidator {
    MeetingFormValidator::new(locales.available.clone(), &locales.default)
}
