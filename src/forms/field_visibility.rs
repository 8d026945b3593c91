//! Show/hide rules for the meeting form.
//!
//! Two selectors drive five field groups. A group is visible when the
//! selector's value equals the group's type, or when the selector has a dual
//! value (`hybrid` for the meeting type) and that value is selected. The state
//! is always recomputed from the current selector values, never transitioned.

use serde::Serialize;

use crate::models::meeting::{RegistrationType, TypeOfMeeting};

/// Meeting-type value under which both online and in-person groups apply.
pub const HYBRID: &str = "hybrid";

/// Core rule: `selector_value` shows a group tagged `group_type`.
pub fn is_visible(selector_value: &str, group_type: &str, dual_value: Option<&str>) -> bool {
    selector_value == group_type || dual_value.is_some_and(|dual| selector_value == dual)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    TypeOfMeeting,
    RegistrationType,
}

impl Selector {
    pub const ALL: [Selector; 2] = [Self::TypeOfMeeting, Self::RegistrationType];

    /// DOM id of the `<select>` element.
    pub fn field_id(&self) -> &'static str {
        match self {
            Self::TypeOfMeeting => "meeting_type_of_meeting",
            Self::RegistrationType => "meeting_registration_type",
        }
    }

    /// Value that shows every group of this selector at once, if any.
    pub fn dual_value(&self) -> Option<&'static str> {
        match self {
            Self::TypeOfMeeting => Some(HYBRID),
            Self::RegistrationType => None,
        }
    }

    pub fn known_values(&self) -> Vec<&'static str> {
        match self {
            Self::TypeOfMeeting => TypeOfMeeting::ALL.iter().map(|t| t.as_str()).collect(),
            Self::RegistrationType => RegistrationType::ALL.iter().map(|t| t.as_str()).collect(),
        }
    }

    pub fn groups(&self) -> &'static [FieldGroup] {
        match self {
            Self::TypeOfMeeting => &[FieldGroup::Online, FieldGroup::InPerson],
            Self::RegistrationType => &[
                FieldGroup::AvailableSlots,
                FieldGroup::RegistrationTerms,
                FieldGroup::RegistrationUrl,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Online,
    InPerson,
    AvailableSlots,
    RegistrationTerms,
    RegistrationUrl,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        Self::Online,
        Self::InPerson,
        Self::AvailableSlots,
        Self::RegistrationTerms,
        Self::RegistrationUrl,
    ];

    pub fn selector(&self) -> Selector {
        match self {
            Self::Online | Self::InPerson => Selector::TypeOfMeeting,
            Self::AvailableSlots | Self::RegistrationTerms | Self::RegistrationUrl => {
                Selector::RegistrationType
            }
        }
    }

    /// The type label the group is tagged with.
    pub fn group_type(&self) -> &'static str {
        match self {
            Self::Online => TypeOfMeeting::Online.as_str(),
            Self::InPerson => TypeOfMeeting::InPerson.as_str(),
            Self::AvailableSlots | Self::RegistrationTerms => {
                RegistrationType::OnThisPlatform.as_str()
            }
            Self::RegistrationUrl => RegistrationType::OnDifferentPlatform.as_str(),
        }
    }

    /// Data attribute carrying `group_type` in the rendered form.
    pub fn data_attribute(&self) -> &'static str {
        match self.selector() {
            Selector::TypeOfMeeting => "data-meeting-type",
            Selector::RegistrationType => "data-registration-type",
        }
    }

    pub fn is_visible_for(&self, selector_value: &str) -> bool {
        is_visible(selector_value, self.group_type(), self.selector().dual_value())
    }

    /// Every known selector value that shows this group.
    ///
    /// Rendered into `data-visible-when` so the browser toggles groups from the
    /// same table the server uses.
    pub fn visible_values(&self) -> Vec<&'static str> {
        self.selector()
            .known_values()
            .into_iter()
            .filter(|v| self.is_visible_for(v))
            .collect()
    }
}

/// Visibility of every group for one pair of selector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldVisibility {
    pub online: bool,
    pub in_person: bool,
    pub available_slots: bool,
    pub registration_terms: bool,
    pub registration_url: bool,
}

impl FieldVisibility {
    pub fn derive(type_of_meeting: &str, registration_type: &str) -> Self {
        Self {
            online: FieldGroup::Online.is_visible_for(type_of_meeting),
            in_person: FieldGroup::InPerson.is_visible_for(type_of_meeting),
            available_slots: FieldGroup::AvailableSlots.is_visible_for(registration_type),
            registration_terms: FieldGroup::RegistrationTerms.is_visible_for(registration_type),
            registration_url: FieldGroup::RegistrationUrl.is_visible_for(registration_type),
        }
    }

    pub fn is_visible(&self, group: FieldGroup) -> bool {
        match group {
            FieldGroup::Online => self.online,
            FieldGroup::InPerson => self.in_person,
            FieldGroup::AvailableSlots => self.available_slots,
            FieldGroup::RegistrationTerms => self.registration_terms,
            FieldGroup::RegistrationUrl => self.registration_url,
        }
    }
}

/// The UI surface the controller drives.
///
/// Hiding a group only changes its presentation. Field values are never
/// cleared, so they survive toggling back and forth.
pub trait FormView {
    /// Current value of a selector, or `None` if it is not on the page.
    fn selector_value(&self, selector: Selector) -> Option<String>;

    fn has_group(&self, group: FieldGroup) -> bool;

    fn set_group_visible(&mut self, group: FieldGroup, visible: bool);
}

/// Applies the visibility rules to a [`FormView`].
pub struct VisibilityController;

impl VisibilityController {
    /// Apply the rules for the values present when the form is first shown.
    pub fn initialize<V: FormView>(view: &mut V) {
        for selector in Selector::ALL {
            Self::on_change(view, selector);
        }
    }

    /// Re-apply the rules for one selector after its value changed.
    ///
    /// Groups missing from the view are skipped. A missing selector leaves its
    /// groups untouched.
    pub fn on_change<V: FormView>(view: &mut V, selector: Selector) {
        let Some(value) = view.selector_value(selector) else {
            return;
        };
        for &group in selector.groups() {
            if view.has_group(group) {
                view.set_group_visible(group, group.is_visible_for(&value));
            }
        }
    }
}
