pub mod field_visibility;
pub mod meeting_form;
pub mod validator;

pub use field_visibility::{FieldGroup, FieldVisibility, FormView, Selector, VisibilityController};
pub use meeting_form::{MeetingForm, ServiceForm};
pub use validator::{FieldError, FormErrors, MeetingFormValidator};
