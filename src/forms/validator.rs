use chrono::NaiveDateTime;

use crate::commands::ports::Validator;
use crate::models::meeting::{
    Coordinates, MeetingAttributes, MeetingDraft, RegistrationSettings, RegistrationType,
    ServiceEntry, TypeOfMeeting,
};
use crate::models::translated::TranslatedText;

use super::meeting_form::MeetingForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failures keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn add_opt(&mut self, field: &str, message: Option<String>) {
        if let Some(message) = message {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect()
    }
}

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a `datetime-local` value, with or without seconds.
fn parse_time(value: &str) -> Option<NaiveDateTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
}

/// Validate a translated field: present in the default locale.
fn validate_translated(text: &TranslatedText, field_name: &str, default_locale: &str) -> Option<String> {
    if !text.is_present_in(default_locale) {
        return Some(format!("{field_name} is required in \"{default_locale}\""));
    }
    None
}

/// Validate an http(s) URL.
fn validate_url(value: &str, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    match url::Url::parse(trimmed) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => None,
        _ => Some(format!("{field_name} must be a valid http(s) URL")),
    }
}

/// Parse an optional entity reference; empty means none.
fn parse_reference(value: &str) -> Result<Option<i64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(format!("\"{trimmed}\" is not a valid reference")),
    }
}

/// Both coordinates numeric and in range, or both empty.
fn parse_coordinates(latitude: &str, longitude: &str) -> Result<Option<Coordinates>, String> {
    match (latitude.trim(), longitude.trim()) {
        ("", "") => Ok(None),
        ("", _) | (_, "") => Err("latitude and longitude must be given together".to_string()),
        (lat, lng) => {
            let latitude: f64 = lat.parse().map_err(|_| format!("\"{lat}\" is not a number"))?;
            let longitude: f64 = lng.parse().map_err(|_| format!("\"{lng}\" is not a number"))?;
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err("coordinates are out of range".to_string());
            }
            Ok(Some(Coordinates { latitude, longitude }))
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Admin meeting form rules.
#[derive(Debug, Clone)]
pub struct MeetingFormValidator {
    pub available_locales: Vec<String>,
    pub default_locale: String,
}

impl MeetingFormValidator {
    pub fn new(available_locales: Vec<String>, default_locale: &str) -> Self {
        Self {
            available_locales,
            default_locale: default_locale.to_string(),
        }
    }

    fn localized(&self, text: &TranslatedText) -> TranslatedText {
        text.restricted_to(&self.available_locales)
    }
}

impl Validator for MeetingFormValidator {
    fn validate(&self, form: &MeetingForm) -> Result<MeetingDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let locale = self.default_locale.as_str();

        errors.add_opt("title", validate_translated(&form.title, "Title", locale));
        errors.add_opt(
            "description",
            validate_translated(&form.description, "Description", locale),
        );

        let start_time = parse_time(&form.start_time);
        let end_time = parse_time(&form.end_time);
        if start_time.is_none() {
            errors.add("start_time", "Start time is required (YYYY-MM-DDTHH:MM)");
        }
        if end_time.is_none() {
            errors.add("end_time", "End time is required (YYYY-MM-DDTHH:MM)");
        }
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end < start {
                errors.add("end_time", "End time must be at or after the start time");
            }
        }

        let type_of_meeting = TypeOfMeeting::parse(form.type_of_meeting.trim());
        match type_of_meeting {
            None => errors.add("type_of_meeting", "Type of meeting is not valid"),
            Some(t) => {
                if t.needs_address() && form.address.trim().is_empty() {
                    errors.add("address", "Address is required for in-person meetings");
                }
                if t.needs_online_url() {
                    errors.add_opt(
                        "online_meeting_url",
                        validate_url(&form.online_meeting_url, "Online meeting URL"),
                    );
                }
            }
        }

        let registration_type = RegistrationType::parse(form.registration_type.trim());
        let mut available_slots = 0;
        match registration_type {
            None => errors.add("registration_type", "Registration type is not valid"),
            Some(RegistrationType::OnThisPlatform) => {
                let raw = form.available_slots.trim();
                match raw.parse::<i64>() {
                    Ok(n) if n >= 0 => available_slots = n,
                    _ if raw.is_empty() => {}
                    _ => errors.add(
                        "available_slots",
                        "Available slots must be a whole number, 0 or greater",
                    ),
                }
                errors.add_opt(
                    "registration_terms",
                    validate_translated(&form.registration_terms, "Registration terms", locale),
                );
            }
            Some(RegistrationType::OnDifferentPlatform) => {
                errors.add_opt(
                    "registration_url",
                    validate_url(&form.registration_url, "Registration URL"),
                );
            }
            Some(RegistrationType::RegistrationDisabled) => {}
        }
        if registration_type != Some(RegistrationType::OnThisPlatform) {
            available_slots = form.available_slots.trim().parse::<i64>().unwrap_or(0).max(0);
        }

        let coordinates = parse_coordinates(&form.latitude, &form.longitude)
            .unwrap_or_else(|e| {
                errors.add("latitude", e);
                None
            });
        let scope_id = parse_reference(&form.scope_id).unwrap_or_else(|e| {
            errors.add("scope_id", e);
            None
        });
        let category_id = parse_reference(&form.category_id).unwrap_or_else(|e| {
            errors.add("category_id", e);
            None
        });

        if form.customize_registration_email {
            errors.add_opt(
                "registration_email_custom_content",
                validate_translated(
                    &form.registration_email_custom_content,
                    "Registration email content",
                    locale,
                ),
            );
        }

        for (index, service) in form.services_to_persist().enumerate() {
            if !service.title.is_present_in(locale) {
                errors.add(
                    &format!("services[{index}][title]"),
                    format!("Service title is required in \"{locale}\""),
                );
            }
        }

        let (Some(start_time), Some(end_time), Some(type_of_meeting), Some(registration_type)) =
            (start_time, end_time, type_of_meeting, registration_type)
        else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let attributes = MeetingAttributes {
            title: self.localized(&form.title),
            description: self.localized(&form.description),
            location: self.localized(&form.location),
            location_hints: self.localized(&form.location_hints),
            start_time,
            end_time,
            address: form.address.trim().to_string(),
            coordinates,
            scope_id,
            category_id,
            private_meeting: form.private_meeting,
            transparent: form.transparent,
            type_of_meeting,
            registration: RegistrationSettings {
                registration_type,
                available_slots,
                registration_url: non_empty(&form.registration_url),
                registration_terms: self.localized(&form.registration_terms),
            },
            online_meeting_url: non_empty(&form.online_meeting_url),
            customize_registration_email: form.customize_registration_email,
            registration_email_custom_content: self
                .localized(&form.registration_email_custom_content),
            show_iframe: form.show_iframe,
        };
        let services = form
            .services_to_persist()
            .map(|s| ServiceEntry {
                title: self.localized(&s.title),
                description: self.localized(&s.description),
            })
            .collect();

        Ok(MeetingDraft {
            attributes,
            services,
        })
    }
}
