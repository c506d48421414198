use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Operating systems the integration layer dispatches on.
///
/// This is a closed set: adding support for a new OS means adding a variant
/// here and handling it in every match, so new platforms are brought up
/// deliberately rather than falling into a default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Windows; scheme registration needs privileged registry edits.
    Windows,
    /// macOS; scheme registration is a single OS API call.
    Macos,
    /// Linux; scheme registration is architecturally unsupported.
    Linux,
    /// Any other `target_os` value, carried verbatim for error reporting.
    Other(String),
}

impl Platform {
    /// Detects the platform this process is running on.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Macos => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Errors surfaced by the desktop integration layer.
///
/// Lock-file I/O failures and the settings-page convenience step never
/// appear here; they are swallowed where they occur (see the module docs of
/// [`crate::instance`] and [`crate::protocol`]).
#[derive(Debug, Error)]
pub enum DesktopError {
    /// A filesystem or process-spawn error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The privileged registry-import helper exited unsuccessfully or was
    /// killed by a signal.
    #[error("registry script execution failed")]
    RegistryImportFailed,

    /// The OS refused to set this application as the scheme handler.
    #[error("could not register as handler for scheme {0}")]
    RegisterFailed(String),

    /// The OS refused to clear this application as the scheme handler.
    #[error("could not unregister as handler for scheme {0}")]
    UnregisterFailed(String),

    /// Scheme registration is architecturally unsupported on this platform.
    #[error("scheme registration is not supported on {0}")]
    Unsupported(Platform),

    /// The running platform is not one the registrar knows about.
    #[error("unrecognized platform: {0}")]
    UnrecognizedPlatform(String),

    /// A Windows-only operation was invoked on another platform. This is a
    /// contract violation, never expected in normal operation.
    #[error("invalid usage: {0}")]
    InvalidUsage(&'static str),
}
