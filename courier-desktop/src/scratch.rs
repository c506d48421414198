//! Per-process private scratch area under the OS temp root.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::{debug, warn};
use std::io;
use std::path::PathBuf;

use crate::Result;
use crate::constants::{entropy, paths};
use crate::utils::{create_private_dir, random_bytes};

/// A process-lifetime private temporary directory.
///
/// Every version and instance of the application shares one family
/// directory under the OS temp root; each process owns one randomly named
/// subdirectory of it, created with owner-only permissions. The random name
/// is derived once, at construction, from 16 bytes of cryptographically
/// strong randomness and never changes for the life of the process, so the
/// path is not guessable from outside.
///
/// A scratch area is not removed by its own process. Stale siblings left
/// behind by previous runs are swept by a later instance's
/// [`ScratchArea::purge_stale`].
pub struct ScratchArea {
    family_root: PathBuf,
    name: String,
}

impl ScratchArea {
    /// Scratch area rooted at the OS temp directory.
    pub fn new() -> Result<Self> {
        Self::at(std::env::temp_dir())
    }

    /// Scratch area rooted at an explicit temp root.
    pub fn at(temp_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            family_root: temp_root.into().join(paths::APP_FAMILY),
            name: URL_SAFE_NO_PAD.encode(random_bytes(entropy::SCRATCH_NAME_BYTES)?),
        })
    }

    /// The random subdirectory name owned by this process.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this process's private scratch directory, creating it on
    /// the first call.
    ///
    /// Idempotent: every call within one process returns the same path.
    pub async fn dir(&self) -> Result<PathBuf> {
        let dir = self.family_root.join(&self.name);
        create_private_dir(&dir).await?;
        Ok(dir)
    }

    /// Removes scratch areas left behind by previous runs.
    ///
    /// Call once during startup, before the scratch directory is first
    /// used. Entries that vanish or turn inaccessible mid-sweep belong to a
    /// concurrently running or exiting instance and are skipped; any other
    /// failure aborts the sweep. A missing family directory means there is
    /// nothing to clean.
    pub async fn purge_stale(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.family_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "No scratch family directory at {:?}, nothing to purge",
                    self.family_root
                );
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => debug!("Purged stale scratch area {path:?}"),
                Err(e) if is_benign_sweep_error(&e) => {
                    warn!("Skipping scratch entry {path:?}: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Removal errors caused by a sibling vanishing or being held by another
/// instance; the sweep skips these and keeps going. Anything else aborts
/// it.
fn is_benign_sweep_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_skips_vanished_and_held_entries_only() {
        assert!(is_benign_sweep_error(&io::Error::from(
            io::ErrorKind::NotFound
        )));
        assert!(is_benign_sweep_error(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_benign_sweep_error(&io::Error::from(
            io::ErrorKind::NotADirectory
        )));
        assert!(!is_benign_sweep_error(&io::Error::other("disk error")));
    }
}
