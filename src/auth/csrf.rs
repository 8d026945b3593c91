//! Per-session CSRF tokens for admin form posts.

use actix_session::Session;
use rand::Rng;

use crate::errors::AppError;

const TOKEN_KEY: &str = "csrf_token";
const TOKEN_BYTES: usize = 32;

/// A random hex token bound to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    fn generate() -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Comparison time does not depend on where the first mismatch is.
    pub fn matches(&self, submitted: &str) -> bool {
        let (ours, theirs) = (self.0.as_bytes(), submitted.as_bytes());
        let diff = ours
            .iter()
            .zip(theirs)
            .fold(ours.len() ^ theirs.len(), |acc, (x, y)| acc | usize::from(x ^ y));
        diff == 0
    }
}

/// Token of the current session, created and stored on first use.
pub fn session_token(session: &Session) -> CsrfToken {
    match session.get::<String>(TOKEN_KEY) {
        Ok(Some(token)) if !token.is_empty() => CsrfToken(token),
        _ => {
            let token = CsrfToken::generate();
            let _ = session.insert(TOKEN_KEY, token.as_str());
            token
        }
    }
}

/// Reject a post whose token is not the session's.
pub fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = session
        .get::<String>(TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
        .map(CsrfToken);
    match stored {
        Some(token) if token.matches(submitted) => Ok(()),
        Some(_) => {
            log::warn!("CSRF token mismatch");
            Err(AppError::Csrf)
        }
        None => {
            log::warn!("CSRF check without a session token");
            Err(AppError::Csrf)
        }
    }
}
