pub mod create_meeting;
pub mod ports;

pub use create_meeting::{CommandContext, CreateMeeting, CreateMeetingError};
pub use ports::{AuditLog, MeetingStore, MeetingTx, StoreError, Validator};
