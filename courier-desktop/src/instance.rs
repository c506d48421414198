//! Single-instance arbitration across application versions.
//!
//! Two mechanisms work together here. The OS-native single-instance
//! primitive is strictly first-come-first-served and decides the common
//! case. On top of it sits a shared version hand-off file that lets a newer
//! installation ask an already-running older one to step aside: the second
//! instance writes its version, waits a fixed grace period, and re-reads
//! the file to see whether a differently-versioned actor touched it.
//!
//! The file is read and then overwritten without any locking. That race
//! window is part of the protocol: it is best-effort and tolerant of
//! filesystem errors, not linearizable. Two instances of the *same*
//! version racing simultaneously can both read-then-write unsynchronized;
//! the primitive's first-come semantics bound the damage.

use fs2::FileExt;
use futures_timer::Delay;
use log::{debug, info, warn};
use std::fs::File;
use std::path::PathBuf;

use crate::constants::{paths, timeouts};

/// OS-native single-instance primitive.
///
/// An exclusive, OS-enforced, first-come lock granting at most one process
/// in the application family primary-instance status. It is unrelated to
/// the version hand-off file.
pub trait InstancePrimitive {
    /// Attempts to claim primary-instance status without blocking.
    /// Returns `true` when this process now holds the primitive.
    fn try_claim(&mut self) -> bool;
}

/// Production [`InstancePrimitive`] backed by an exclusive file lock.
///
/// The lock is taken on a dedicated file under the OS temp root and held
/// for the rest of the process lifetime; the OS releases it when the
/// process exits. Errors creating or locking the file count as "not
/// granted".
pub struct FileLockPrimitive {
    path: PathBuf,
    handle: Option<File>,
}

impl FileLockPrimitive {
    /// Primitive over the default instance file under the OS temp root.
    pub fn new() -> Self {
        Self::at(std::env::temp_dir().join(paths::INSTANCE_FILE_NAME))
    }

    /// Primitive over an explicit lock path.
    pub fn at(path: PathBuf) -> Self {
        Self { path, handle: None }
    }
}

impl Default for FileLockPrimitive {
    fn default() -> Self {
        Self::new()
    }
}

impl InstancePrimitive for FileLockPrimitive {
    fn try_claim(&mut self) -> bool {
        if self.handle.is_some() {
            return true;
        }
        let file = match File::create(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to create instance lock file {:?}: {e}", self.path);
                return false;
            }
        };
        match file.try_lock_exclusive() {
            Ok(()) => {
                // Keep the handle so the lock lives as long as the process.
                self.handle = Some(file);
                true
            }
            Err(_) => {
                debug!("Instance lock already held by another process");
                false
            }
        }
    }
}

/// Arbitrates which process owns the application identity when several
/// copies, possibly of different versions, launch concurrently.
///
/// # Counterpart contract
///
/// The already-running instance's half of the hand-off lives in the
/// surrounding application, not here: on being notified of a second launch
/// attempt it compares its own version against the hand-off file and, if
/// they differ, rewrites the file with its own version, releases the
/// primitive, and terminates. This coordinator only implements the
/// launching side.
pub struct LockCoordinator<P> {
    lock_path: PathBuf,
    version: String,
    primitive: P,
}

impl LockCoordinator<FileLockPrimitive> {
    /// Coordinator over the default lock-file location under the OS temp
    /// root, using the file-lock primitive.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_primitive(
            std::env::temp_dir().join(paths::LOCK_FILE_NAME),
            version,
            FileLockPrimitive::new(),
        )
    }
}

impl<P: InstancePrimitive> LockCoordinator<P> {
    /// Coordinator over an explicit lock path and primitive.
    pub fn with_primitive(lock_path: PathBuf, version: impl Into<String>, primitive: P) -> Self {
        Self {
            lock_path,
            version: version.into(),
            primitive,
        }
    }

    /// Claims the application identity, or concludes this process must
    /// yield.
    ///
    /// Returns `true` when this process may keep running; on `false` the
    /// caller is expected to exit. Lock-file I/O failures never propagate:
    /// an unreadable or unwritable hand-off file degrades the protocol to
    /// the primitive's own first-come-first-served semantics.
    pub async fn acquire_or_yield(&mut self) -> bool {
        self.write_version();

        if self.primitive.try_claim() {
            debug!("Acquired single-instance lock on first attempt");
            return true;
        }

        // Another instance is running. Give it the grace period to notice
        // the version change and step aside.
        info!(
            "Another instance is running, re-checking in {:?}",
            timeouts::lock_grace()
        );
        Delay::new(timeouts::lock_grace()).await;

        let observed = self.read_version();
        self.write_version();

        match observed {
            Some(observed) if observed != self.version => {
                info!(
                    "Lock file now reads version {observed}, own version is {}; staying",
                    self.version
                );
                // At most one re-claim. The other instance may not have
                // released the primitive yet; that does not change the
                // decision to stay.
                let claimed = self.primitive.try_claim();
                debug!("Re-claim of single-instance primitive: granted={claimed}");
                true
            }
            _ => {
                info!("No version hand-off observed; yielding to the running instance");
                false
            }
        }
    }

    fn write_version(&self) {
        if let Err(e) = std::fs::write(&self.lock_path, &self.version) {
            warn!("Failed to write version lock file {:?}: {e}", self.lock_path);
        }
    }

    /// Reads the hand-off file. A read failure is reported as `None` and
    /// treated by the caller as "no override happened".
    fn read_version(&self) -> Option<String> {
        match std::fs::read_to_string(&self.lock_path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) => {
                warn!("Failed to read version lock file {:?}: {e}", self.lock_path);
                None
            }
        }
    }
}
