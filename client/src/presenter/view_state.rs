use crate::profile::{BackupRecord, SessionInfo, UserProfile};

use serde::Serialize;

/// Frontend-facing dashboard state for one page load.
///
/// `Idle → Resolving → {Full | Degraded | Recovered | Unauthenticated}`;
/// all four resolved states are terminal for that load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Resolving,
    /// Dashboard fully populated from the primary profile.
    Full { profile: UserProfile },
    /// Identity fields only; holdings marked unavailable.
    Degraded {
        session: SessionInfo,
        holdings_available: bool,
        notice: String,
    },
    /// Served from the local backup with a stale-data banner.
    Recovered {
        record: BackupRecord,
        banner_visible: bool,
    },
    /// Blocking re-authentication prompt over a full-screen overlay.
    Unauthenticated {
        modal_visible: bool,
        overlay_visible: bool,
    },
}
