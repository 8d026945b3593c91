use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::questionnaire::Questionnaire;
use crate::models::translated::TranslatedText;

/// Where a meeting takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOfMeeting {
    InPerson,
    Online,
    Hybrid,
}

impl TypeOfMeeting {
    pub const ALL: [TypeOfMeeting; 3] = [Self::InPerson, Self::Online, Self::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InPerson => "in_person",
            Self::Online => "online",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn needs_address(&self) -> bool {
        matches!(self, Self::InPerson | Self::Hybrid)
    }

    pub fn needs_online_url(&self) -> bool {
        matches!(self, Self::Online | Self::Hybrid)
    }
}

/// How attendees register for a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationType {
    RegistrationDisabled,
    OnThisPlatform,
    OnDifferentPlatform,
}

impl RegistrationType {
    pub const ALL: [RegistrationType; 3] = [
        Self::RegistrationDisabled,
        Self::OnThisPlatform,
        Self::OnDifferentPlatform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrationDisabled => "registration_disabled",
            Self::OnThisPlatform => "on_this_platform",
            Self::OnDifferentPlatform => "on_different_platform",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Geocoded position. Latitude and longitude only ever travel together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Entities a meeting may be filed under. Each must exist with its own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingReference {
    Scope,
    Category,
}

impl MeetingReference {
    pub const ALL: [MeetingReference; 2] = [Self::Scope, Self::Category];

    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Scope => "scope",
            Self::Category => "category",
        }
    }

    /// Form field carrying the id.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Scope => "scope_id",
            Self::Category => "category_id",
        }
    }

    pub fn id_in(&self, attrs: &MeetingAttributes) -> Option<i64> {
        match self {
            Self::Scope => attrs.scope_id,
            Self::Category => attrs.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSettings {
    pub registration_type: RegistrationType,
    pub available_slots: i64,
    pub registration_url: Option<String>,
    pub registration_terms: TranslatedText,
}

/// Scalar and translated attributes shared by a draft and a persisted meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingAttributes {
    pub title: TranslatedText,
    pub description: TranslatedText,
    pub location: TranslatedText,
    pub location_hints: TranslatedText,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub scope_id: Option<i64>,
    pub category_id: Option<i64>,
    pub private_meeting: bool,
    pub transparent: bool,
    pub type_of_meeting: TypeOfMeeting,
    pub registration: RegistrationSettings,
    pub online_meeting_url: Option<String>,
    pub customize_registration_email: bool,
    pub registration_email_custom_content: TranslatedText,
    pub show_iframe: bool,
}

/// A named sub-offering of a meeting (childcare, translation, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub title: TranslatedText,
    pub description: TranslatedText,
}

/// Validated input to the create command.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingDraft {
    pub attributes: MeetingAttributes,
    pub services: Vec<ServiceEntry>,
}

/// Everything the store needs to write the meeting row itself.
#[derive(Debug, Clone, Copy)]
pub struct NewMeeting<'a> {
    pub attributes: &'a MeetingAttributes,
    pub author_id: i64,
    pub component_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub position: i64,
    pub title: TranslatedText,
    pub description: TranslatedText,
}

/// A persisted meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub author_id: i64,
    pub component_id: i64,
    pub published: bool,
    pub created_at: String,
    #[serde(flatten)]
    pub attributes: MeetingAttributes,
    pub services: Vec<Service>,
    pub questionnaire: Option<Questionnaire>,
}

impl Meeting {
    /// Title in the given locale, or the first non-empty translation.
    pub fn display_title(&self, locale: &str) -> String {
        self.attributes.title.pick(locale)
    }
}
