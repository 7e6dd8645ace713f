use thiserror::Error;

/// Failures surfaced by the client. Transport errors pass through untouched;
/// they are never reinterpreted as auth failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in; no local session for this account")]
    Unauthenticated,
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("secure store failure: {0}")]
    Store(String),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::Unauthenticated | Error::Api { status: 401, .. }
        )
    }
}
