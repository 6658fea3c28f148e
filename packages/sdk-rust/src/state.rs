//! On-disk pool state.
//!
//! One JSON document holds the pool's config and accounting state, the books
//! of its three ledgers and the event history. Saves write a sibling
//! `*.tmp` file and rename it over the target, so readers never see a
//! half-written document.

use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use reward_swap::{LedgerBook, PoolConfig, PoolEvent, PoolState};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Ledger addresses used by pools the SDK creates.
pub const TOKEN_A_ADDRESS: &str = "token-a";
pub const TOKEN_B_ADDRESS: &str = "token-b";
pub const REWARD_TOKEN_ADDRESS: &str = "reward";

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// Everything needed to rebuild a pool and its ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub version: u32,
    pub config:  PoolConfig,
    pub state:   PoolState,
    pub token_a: LedgerBook,
    pub token_b: LedgerBook,
    pub reward:  LedgerBook,
    /// Committed operations, oldest first.
    #[serde(default)]
    pub events:  Vec<PoolEvent>,
}

impl PoolSnapshot {
    /// Read a snapshot written by [`PoolSnapshot::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::StateNotFound(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: Self = serde_json::from_slice(&data)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::InvalidArgument(format!(
                "state file version {} is not supported (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        tracing::debug!(path = %path.display(), "pool state loaded");
        Ok(snapshot)
    }

    /// Write the snapshot atomically: temp file, fsync, rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, self)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "pool state saved");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reward_swap::Address;

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot {
            version: SNAPSHOT_VERSION,
            config:  PoolConfig::new(Address::from("owner"), Address::from("pool")),
            state:   PoolState::default(),
            token_a: LedgerBook { address: Address::from(TOKEN_A_ADDRESS), ..LedgerBook::default() },
            token_b: LedgerBook { address: Address::from(TOKEN_B_ADDRESS), ..LedgerBook::default() },
            reward:  LedgerBook { address: Address::from(REWARD_TOKEN_ADDRESS), ..LedgerBook::default() },
            events:  Vec::new(),
        }
    }

    #[test]
    fn save_then_load_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");

        let original = snapshot();
        original.save(&path).unwrap();

        assert_eq!(PoolSnapshot::load(&path).unwrap(), original);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PoolSnapshot::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::StateNotFound(_)));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        let mut future = snapshot();
        future.version = SNAPSHOT_VERSION + 1;
        future.save(&path).unwrap();

        assert!(matches!(PoolSnapshot::load(&path), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(PoolSnapshot::load(&path), Err(Error::Json(_))));
    }
}
