use crate::profile::{BackupRecord, SessionInfo, UserProfile};

use serde::Serialize;

/// Terminal result of one resolution attempt.
///
/// Exactly one of these is produced per `resolve()` call and it is the
/// only channel through which identity state reaches presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Primary source answered; full dashboard data available.
    Resolved(UserProfile),
    /// Secondary source answered; identity fields only.
    PartiallyResolved(SessionInfo),
    /// Both remote sources failed; served from the local backup slot.
    RecoveredFromBackup(BackupRecord),
    /// Both remote sources failed and no backup exists.
    Unauthenticated,
}

impl ResolutionOutcome {
    /// Wallet address carried by this outcome, if any.
    pub fn wallet(&self) -> Option<&str> {
        match self {
            Self::Resolved(profile) => Some(&profile.wallet),
            Self::PartiallyResolved(session) => Some(&session.wallet_address),
            Self::RecoveredFromBackup(record) => Some(&record.wallet),
            Self::Unauthenticated => None,
        }
    }
}
