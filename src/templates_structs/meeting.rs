use askama::Template;

use crate::config::GeocodingSettings;
use crate::forms::{FieldGroup, FieldVisibility, FormErrors, MeetingForm};
use crate::models::meeting::{Meeting, RegistrationType, TypeOfMeeting};
use super::PageContext;

/// Rendering data for one show/hide group of the meeting form.
pub struct GroupAttrs {
    pub selector_id: &'static str,
    pub data_attribute: &'static str,
    pub group_type: &'static str,
    pub visible_when: String,
    pub visible: bool,
}

impl GroupAttrs {
    fn new(group: FieldGroup, visibility: &FieldVisibility) -> Self {
        Self {
            selector_id: group.selector().field_id(),
            data_attribute: group.data_attribute(),
            group_type: group.group_type(),
            visible_when: group.visible_values().join(" "),
            visible: visibility.is_visible(group),
        }
    }
}

#[derive(Template)]
#[template(path = "meetings/new.html")]
pub struct MeetingFormTemplate {
    pub ctx: PageContext,
    pub component_id: i64,
    pub form: MeetingForm,
    pub errors: FormErrors,
    pub locales: Vec<String>,
    /// Address lookup endpoint for the geocoding hook; empty when disabled.
    pub geocoding_url: String,
    pub type_options: Vec<&'static str>,
    pub registration_options: Vec<&'static str>,
    pub online: GroupAttrs,
    pub in_person: GroupAttrs,
    pub available_slots: GroupAttrs,
    pub registration_terms: GroupAttrs,
    pub registration_url: GroupAttrs,
}

impl MeetingFormTemplate {
    /// Build the form page. Group visibility starts from the form's current
    /// selector values, so re-rendered and edit forms open in the right state.
    pub fn new(
        ctx: PageContext,
        component_id: i64,
        form: MeetingForm,
        errors: FormErrors,
        locales: Vec<String>,
        geocoding: &GeocodingSettings,
    ) -> Self {
        let visibility = FieldVisibility::derive(&form.type_of_meeting, &form.registration_type);
        Self {
            ctx,
            component_id,
            errors,
            locales,
            geocoding_url: geocoding.endpoint.clone().unwrap_or_default(),
            type_options: TypeOfMeeting::ALL.iter().map(|t| t.as_str()).collect(),
            registration_options: RegistrationType::ALL.iter().map(|t| t.as_str()).collect(),
            online: GroupAttrs::new(FieldGroup::Online, &visibility),
            in_person: GroupAttrs::new(FieldGroup::InPerson, &visibility),
            available_slots: GroupAttrs::new(FieldGroup::AvailableSlots, &visibility),
            registration_terms: GroupAttrs::new(FieldGroup::RegistrationTerms, &visibility),
            registration_url: GroupAttrs::new(FieldGroup::RegistrationUrl, &visibility),
            form,
        }
    }

    pub fn type_selected(&self, value: impl AsRef<str>) -> bool {
        self.form.type_of_meeting == value.as_ref()
    }

    pub fn registration_selected(&self, value: impl AsRef<str>) -> bool {
        self.form.registration_type == value.as_ref()
    }

    /// Human label for a selector option value.
    pub fn option_label(&self, value: impl AsRef<str>) -> String {
        let value = value.as_ref().replace('_', " ");
        let mut chars = value.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "meetings/detail.html")]
pub struct MeetingDetailTemplate {
    pub ctx: PageContext,
    pub meeting: Meeting,
}

impl MeetingDetailTemplate {
    pub fn title(&self) -> String {
        self.meeting.display_title(&self.ctx.locale)
    }

    pub fn coordinates(&self) -> String {
        match self.meeting.attributes.coordinates {
            Some(c) => format!("{}, {}", c.latitude, c.longitude),
            None => String::new(),
        }
    }
}
