use thiserror::Error;

/// The resolver absorbs every tier failure into an outcome; the only
/// error it surfaces is caller-initiated cancellation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Resolution cancelled by caller")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ResolverError>;
