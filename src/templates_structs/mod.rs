// Template context structures for Askama templates, organized by domain.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::take_flash;

pub mod meeting;

pub use meeting::*;

/// Common context shared by all admin pages.
/// Templates access these as `ctx.csrf_token`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub locale: String,
}

impl PageContext {
    pub fn build(session: &Session, locale: &str) -> Self {
        Self {
            app_name: "Meetings".to_string(),
            csrf_token: csrf::session_token(session).into_string(),
            flash: take_flash(session),
            locale: locale.to_string(),
        }
    }
}
