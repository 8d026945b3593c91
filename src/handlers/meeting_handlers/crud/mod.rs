/// Meeting CRUD handlers.
///
/// - `new.rs`: GET create form
/// - `create.rs`: POST create
/// - `read.rs`: GET detail view
/// - `forms.rs`: raw submission and query structures
/// - `helpers.rs`: component boundary check, validator construction

pub mod create;
pub mod forms;
pub mod helpers;
pub mod new;
pub mod read;

pub use create::create;
pub use forms::{MeetingSubmission, NewMeetingQuery};
pub use new::new_form;
pub use read::detail;
