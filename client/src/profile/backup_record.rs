use crate::profile::{SessionInfo, UserProfile};

use serde::{Deserialize, Serialize};

/// Last known-good identity snapshot, persisted locally.
///
/// Holds minimal identity only. Balances and holdings are never written
/// to the backup store; a recovered record can identify the user but
/// not populate the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub wallet: String,
    /// Absent when the info blob was never written or is unreadable.
    pub info: Option<BackupInfo>,
}

/// Supplementary identity fields available at write time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

impl From<&UserProfile> for BackupRecord {
    fn from(profile: &UserProfile) -> Self {
        Self {
            wallet: profile.wallet.clone(),
            info: Some(BackupInfo {
                name: profile.nickname.clone(),
                email: profile.email.clone(),
                user_id: None,
            }),
        }
    }
}

impl From<&SessionInfo> for BackupRecord {
    fn from(session: &SessionInfo) -> Self {
        Self {
            wallet: session.wallet_address.clone(),
            info: Some(BackupInfo {
                name: session.name.clone(),
                email: session.email.clone(),
                user_id: session.user_id.clone(),
            }),
        }
    }
}
