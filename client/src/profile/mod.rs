pub(crate) mod backup_record;
pub(crate) mod outcome;
pub(crate) mod session_info;
pub(crate) mod user_profile;

pub use backup_record::{BackupInfo, BackupRecord};
pub use outcome::ResolutionOutcome;
pub use session_info::SessionInfo;
pub use user_profile::{EscrowAccount, UserProfile};
