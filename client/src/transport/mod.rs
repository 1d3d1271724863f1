pub(crate) mod failure;
pub(crate) mod http;

pub use failure::TierFailure;
pub use http::{HttpLoader, HttpTransport};

use crate::profile::{SessionInfo, UserProfile};

use async_trait::async_trait;

/// Seam between the resolver and the remote service.
///
/// The resolver only ever sees classified tier failures, never raw
/// transport errors.
#[async_trait]
pub trait ProfileTransport: Send + Sync {
    /// Fetch the full profile from the primary source.
    async fn fetch_profile(&self) -> Result<UserProfile, TierFailure>;

    /// Fetch minimal session identity from the secondary source.
    async fn fetch_session_info(&self) -> Result<SessionInfo, TierFailure>;
}
