pub(crate) mod error;

pub use error::{BackupError, Result as BackupResult};

use crate::profile::{BackupInfo, BackupRecord};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

const WALLET_SLOT: &str = "backup_wallet";
const INFO_SLOT: &str = "backup_info.json";

/// Durable, single-slot store of the last known-good identity.
///
/// Two independently readable files in the data directory form the
/// record: a plain-text wallet address and a JSON info blob. The wallet
/// slot is written last, so a record never becomes visible with a newer
/// wallet and stale-or-missing info only in the narrow window between
/// the two renames.
///
/// Not encrypted. This is a low-assurance recovery aid, not a security
/// boundary.
pub struct BackupCache {
    dir: PathBuf,
}

impl BackupCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_path_buf(),
        }
    }

    /// Overwrites the persisted record. Partial records (address only)
    /// are accepted and stored as-is.
    pub fn put(&self, record: &BackupRecord) -> BackupResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| BackupError::dir_creation(self.dir.clone(), e))?;

        let info_json = serde_json::to_string_pretty(&record.info)?;
        self.write_slot(INFO_SLOT, &info_json)?;
        self.write_slot(WALLET_SLOT, &record.wallet)?;

        info!("Backed up identity for wallet {}", record.wallet);
        Ok(())
    }

    /// Returns the last written record, or `None` if nothing was ever
    /// stored. An unparsable info blob degrades to an address-only
    /// record rather than an error.
    pub fn get(&self) -> BackupResult<Option<BackupRecord>> {
        let wallet_path = self.dir.join(WALLET_SLOT);

        if !wallet_path.exists() {
            return Ok(None);
        }

        let wallet = fs::read_to_string(&wallet_path)
            .map_err(|e| BackupError::slot_read(wallet_path, e))?
            .trim()
            .to_string();

        if wallet.is_empty() {
            return Ok(None);
        }

        Ok(Some(BackupRecord {
            wallet,
            info: self.read_info(),
        }))
    }

    /// Best-effort read of the info slot. Missing or corrupted blobs
    /// count as "info missing", never as a failed record.
    fn read_info(&self) -> Option<BackupInfo> {
        let info_path = self.dir.join(INFO_SLOT);

        let contents = match fs::read_to_string(&info_path) {
            Ok(c) => c,
            Err(e) => {
                if info_path.exists() {
                    warn!("Backup info slot unreadable at {info_path:?}: {e}");
                }
                return None;
            }
        };

        match serde_json::from_str::<Option<BackupInfo>>(&contents) {
            Ok(info) => info,
            Err(e) => {
                warn!("Backup info slot corrupted at {info_path:?}: {e}");
                None
            }
        }
    }

    /// Writes one slot atomically: temp file, fsync, rename.
    fn write_slot(&self, name: &str, contents: &str) -> BackupResult<()> {
        let final_path = self.dir.join(name);
        let temp_path = self.dir.join(format!("{name}.tmp.{}", std::process::id()));

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| BackupError::slot_write(temp_path.clone(), e))?;

            file.write_all(contents.as_bytes())
                .map_err(|e| BackupError::slot_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| BackupError::slot_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &final_path).map_err(|e| {
            // Clean up temp file on failure
            let _ = fs::remove_file(&temp_path);
            BackupError::atomic_rename(temp_path, final_path.clone(), e)
        })?;

        Ok(())
    }
}
