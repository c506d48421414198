//! Desktop OS integration for the Courier mail client.
//!
//! This crate makes a single installed copy of Courier behave as a proper
//! OS citizen. It covers three concerns:
//!
//! - Arbitrating which running process owns the application identity when
//!   several copies (possibly of different versions) launch concurrently
//! - Managing a private, unpredictable, permission-restricted scratch-file
//!   area for the lifetime of the process
//! - Registering and unregistering the application as the OS default
//!   handler for the `courier:` URI scheme, including the privileged
//!   Windows registry edits that requires
//!
//! # Example
//!
//! ```no_run
//! use courier_desktop::{LockCoordinator, ScratchArea};
//!
//! # async fn startup() -> courier_desktop::Result<()> {
//! let mut lock = LockCoordinator::new(env!("CARGO_PKG_VERSION"));
//! if !lock.acquire_or_yield().await {
//!     // Another instance keeps the identity; this process must exit.
//!     std::process::exit(0);
//! }
//!
//! let scratch = ScratchArea::new()?;
//! scratch.purge_stale().await?;
//! let dir = scratch.dir().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, DesktopError>`. Lock-file I/O
//! failures and the settings-page convenience step are deliberately
//! swallowed (logged only); everything else fails fast and surfaces a
//! descriptive error to the caller, who decides whether to inform the
//! user, abort startup, or continue degraded.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To
//! see log output, add a logging implementation like `env_logger` in the
//! application binary.

// Internal implementation modules
mod constants;
mod utils;

// Public API modules
pub mod instance;
pub mod models;
pub mod protocol;
pub mod scratch;

// Re-exported public API
pub use instance::{FileLockPrimitive, InstancePrimitive, LockCoordinator};
pub use models::{DesktopError, Platform};
pub use protocol::{ProtocolRegistrar, RegScriptParams, SchemeApi, ScriptBuilder};
pub use scratch::ScratchArea;

// Re-exported types
pub type Result<T> = std::result::Result<T, DesktopError>;
