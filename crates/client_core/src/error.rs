use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load daily puzzle: {0}")]
    Load(#[source] ServiceError),
    #[error("session expired: {0}")]
    Expired(String),
}

impl From<ServiceError> for SessionError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Expired(detail) => SessionError::Expired(detail),
            other => SessionError::Load(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShareLinkError {
    #[error("invalid share base url '{url}': {source}")]
    InvalidBase {
        url: String,
        source: url::ParseError,
    },
}
