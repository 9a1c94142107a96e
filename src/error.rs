use thiserror::Error;

/// Failures in the recording post-processing pipeline.  Handlers never
/// surface these to Twilio; they are logged at the task boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned {status}")]
    UpstreamStatus {
        service: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("bad email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build email: {0}")]
    Email(#[from] lettre::error::Error),
}
