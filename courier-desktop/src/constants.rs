//! Fixed names, sizes, and timings for the desktop integration layer.
//!
//! Every path component here is shared across application versions; the
//! per-process parts of a path are generated at runtime from the OS random
//! source.

/// Filesystem name components under the OS temp root.
pub mod paths {
    /// Family directory holding one scratch area per running process.
    pub const APP_FAMILY: &str = "courier";

    /// The version hand-off file used by the lock protocol.
    pub const LOCK_FILE_NAME: &str = "courier_desktop_lockfile";

    /// File backing the OS-native single-instance lock.
    pub const INSTANCE_FILE_NAME: &str = "courier_desktop.instance";

    /// Scratch subdirectory where registry scripts are staged.
    pub const REG_SCRIPT_DIR: &str = "reg";
}

/// Identity of the application as seen by the OS.
pub mod app {
    /// URI scheme routed to Courier.
    pub const SCHEME: &str = "courier";

    /// Brand directory name used inside the user profile placeholders.
    pub const BRAND_DIR: &str = "Courier";

    /// The mailto helper module shipped next to the main executable.
    pub const HELPER_MODULE_NAME: &str = "courier-mailto.exe";

    /// Default Windows registry-import utility.
    pub const REG_IMPORTER: &str = "regedit.exe";
}

/// Timing constants for the cross-process hand-off protocol.
pub mod timeouts {
    use std::time::Duration;

    /// Grace a second instance grants the running one to react to a
    /// version change before re-checking the lock file (1500 ms).
    const LOCK_GRACE_MS: u64 = 1500;

    /// Returns the lock hand-off grace period.
    pub fn lock_grace() -> Duration {
        Duration::from_millis(LOCK_GRACE_MS)
    }
}

/// Entropy sizes for randomly named scratch paths.
pub mod entropy {
    /// Bytes of randomness in the per-process scratch subdirectory name.
    pub const SCRATCH_NAME_BYTES: usize = 16;

    /// Bytes of randomness in a staged registry-script filename.
    pub const REG_SCRIPT_NAME_BYTES: usize = 12;
}
