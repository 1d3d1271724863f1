use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

/// Classified failure of one remote tier.
///
/// Never escapes the resolver; its only job is to drive movement to
/// the next tier and leave a useful trace in the logs.
#[derive(Error, Debug)]
pub enum TierFailure {
    #[error("Source reports the caller is not authenticated {location}")]
    AuthExpired { location: ErrorLocation },

    #[error("Transport failure: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server answered HTTP {status} {location}")]
    Server { status: u16, location: ErrorLocation },

    #[error("Malformed payload: {message} {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },
}

impl TierFailure {
    /// Creates AuthExpired failure at caller location.
    #[track_caller]
    pub fn auth_expired() -> Self {
        Self::AuthExpired {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Transport failure at caller location.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Server failure at caller location.
    #[track_caller]
    pub fn server(status: u16) -> Self {
        Self::Server {
            status,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates Parse failure at caller location.
    #[track_caller]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transport failure for a tier that exceeded its deadline.
    #[track_caller]
    pub fn timeout(after: Duration) -> Self {
        Self::transport(format!("no answer within {}s", after.as_secs()))
    }
}

impl From<reqwest::Error> for TierFailure {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
