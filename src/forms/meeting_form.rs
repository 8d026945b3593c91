//! Raw admin form for creating a meeting.
//!
//! Field names follow the `meeting[...]` bracket convention of the rendered
//! form, e.g. `meeting[title][en]` or `meeting[services][0][description][ca]`.
//! Values are kept as submitted; normalization is the validator's job.

use std::collections::BTreeMap;

use crate::models::translated::TranslatedText;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
    pub title: TranslatedText,
    pub description: TranslatedText,
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingForm {
    pub title: TranslatedText,
    pub description: TranslatedText,
    pub location: TranslatedText,
    pub location_hints: TranslatedText,
    pub start_time: String,
    pub end_time: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub scope_id: String,
    pub category_id: String,
    pub private_meeting: bool,
    pub transparent: bool,
    pub type_of_meeting: String,
    pub registration_type: String,
    pub available_slots: String,
    pub registration_url: String,
    pub registration_terms: TranslatedText,
    pub online_meeting_url: String,
    pub customize_registration_email: bool,
    pub registration_email_custom_content: TranslatedText,
    pub show_iframe: bool,
    pub services: Vec<ServiceForm>,
}

/// Split `[a][b][c]` into `["a", "b", "c"]`.
fn bracket_segments(mut rest: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    Some(segments)
}

/// Checkbox semantics: a hidden "0" precedes the checkbox, the last value wins.
fn checked(value: &str) -> bool {
    matches!(value, "1" | "true" | "on")
}

impl MeetingForm {
    /// Build a form from url-encoded pairs. Unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = MeetingForm::default();
        let mut services: BTreeMap<usize, ServiceForm> = BTreeMap::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(segments) = key.strip_prefix("meeting").and_then(bracket_segments) else {
                continue;
            };

            match segments.as_slice() {
                ["title", locale] => form.title.insert(locale, value),
                ["description", locale] => form.description.insert(locale, value),
                ["location", locale] => form.location.insert(locale, value),
                ["location_hints", locale] => form.location_hints.insert(locale, value),
                ["registration_terms", locale] => form.registration_terms.insert(locale, value),
                ["registration_email_custom_content", locale] => {
                    form.registration_email_custom_content.insert(locale, value)
                }
                ["services", index, rest @ ..] => {
                    let Ok(index) = index.parse::<usize>() else {
                        continue;
                    };
                    let service = services.entry(index).or_default();
                    match rest {
                        ["title", locale] => service.title.insert(locale, value),
                        ["description", locale] => service.description.insert(locale, value),
                        ["deleted"] => service.deleted = checked(value),
                        _ => {}
                    }
                }
                [field] => form.set_scalar(field, value),
                _ => {}
            }
        }

        form.services = services.into_values().collect();
        form
    }

    fn set_scalar(&mut self, field: &str, value: &str) {
        let value_owned = value.to_string();
        match field {
            "start_time" => self.start_time = value_owned,
            "end_time" => self.end_time = value_owned,
            "address" => self.address = value_owned,
            "latitude" => self.latitude = value_owned,
            "longitude" => self.longitude = value_owned,
            "scope_id" => self.scope_id = value_owned,
            "category_id" => self.category_id = value_owned,
            "private_meeting" => self.private_meeting = checked(value),
            "transparent" => self.transparent = checked(value),
            "type_of_meeting" => self.type_of_meeting = value_owned,
            "registration_type" => self.registration_type = value_owned,
            "available_slots" => self.available_slots = value_owned,
            "registration_url" => self.registration_url = value_owned,
            "online_meeting_url" => self.online_meeting_url = value_owned,
            "customize_registration_email" => self.customize_registration_email = checked(value),
            "show_iframe" => self.show_iframe = checked(value),
            _ => {}
        }
    }

    /// Services the user did not mark for removal, in submitted order.
    pub fn services_to_persist(&self) -> impl Iterator<Item = &ServiceForm> {
        self.services.iter().filter(|s| !s.deleted)
    }

    /// Translated field value for re-rendering the form, by field name.
    pub fn translated(&self, field: impl AsRef<str>, locale: impl AsRef<str>) -> String {
        let text = match field.as_ref() {
            "title" => &self.title,
            "description" => &self.description,
            "location" => &self.location,
            "location_hints" => &self.location_hints,
            "registration_terms" => &self.registration_terms,
            "registration_email_custom_content" => &self.registration_email_custom_content,
            _ => return String::new(),
        };
        text.get(locale.as_ref()).unwrap_or_default().to_string()
    }
}

impl ServiceForm {
    /// Title or description of the service for re-rendering the form.
    pub fn text(&self, field: impl AsRef<str>, locale: impl AsRef<str>) -> String {
        let text = match field.as_ref() {
            "title" => &self.title,
            "description" => &self.description,
            _ => return String::new(),
        };
        text.get(locale.as_ref()).unwrap_or_default().to_string()
    }
}
