use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_organization_id(session: &Session) -> Option<i64> {
    session.get::<i64>("organization_id").unwrap_or(None)
}

/// Acting user and organization, as set by the sign-in flow.
pub fn require_actor(session: &Session) -> Result<(i64, i64), AppError> {
    let user_id = get_user_id(session)
        .ok_or_else(|| AppError::Session("No user_id in session".to_string()))?;
    let organization_id = get_organization_id(session)
        .ok_or_else(|| AppError::Session("No organization_id in session".to_string()))?;
    Ok((user_id, organization_id))
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}
