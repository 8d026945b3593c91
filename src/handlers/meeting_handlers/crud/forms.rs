/// Form structures for meeting CRUD operations.
///
/// The create form posts nested `meeting[...]` keys, so it arrives as raw
/// url-encoded pairs rather than a flat `Deserialize` struct.

use crate::forms::MeetingForm;

/// Query string accepted by the new-meeting page to pre-select the selectors.
#[derive(Debug, Default, serde::Deserialize)]
pub struct NewMeetingQuery {
    pub type_of_meeting: Option<String>,
    pub registration_type: Option<String>,
}

/// A posted create form: the CSRF token plus the meeting fields.
#[derive(Debug, Clone, Default)]
pub struct MeetingSubmission {
    pub csrf_token: String,
    pub form: MeetingForm,
}

impl MeetingSubmission {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let csrf_token = pairs
            .iter()
            .rev()
            .find(|(k, _)| k == "csrf_token")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        Self {
            csrf_token,
            form: MeetingForm::from_pairs(pairs),
        }
    }
}
