use thiserror::Error;

/// An error that can occur while loading or interpreting a realtime feed.
#[derive(Error, Debug)]
pub enum Error {
    /// A scalar field failed validation while building the feed model.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("could not decode feed payload")]
    Decode(#[from] prost::DecodeError),
    #[error("feed request failed")]
    Transport(#[from] reqwest::Error),
    #[error("feed endpoint {url} returned status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("'{0}' is not a known route, feed id or feed url")]
    UnknownFeed(String),
    #[error("'{0}' is not a valid url")]
    InvalidUrl(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
