//! OS-level registration of the `courier:` URI scheme handler.
//!
//! The true handler state is owned by the OS; this layer only issues
//! registration and unregistration requests and observes nothing beyond the
//! boolean outcome of each call. On Windows the request additionally needs
//! privileged registry edits: a script is generated, staged under the
//! scratch area with owner-read-only permission, imported by an external
//! privileged helper process, and deleted again whether or not the import
//! succeeded.

use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;
use std::process::Stdio;

use crate::Result;
use crate::constants::{app, entropy, paths};
use crate::models::{DesktopError, Platform};
use crate::scratch::ScratchArea;
use crate::utils::{random_bytes, write_private_file};

/// OS facade for default-handler state and the settings page.
///
/// Supplied by the surrounding application; the production implementation
/// wraps the platform's own shell APIs.
#[async_trait]
pub trait SchemeApi: Send + Sync {
    /// Asks the OS to route `scheme:` URIs to this application.
    async fn set_default_handler(&self, scheme: &str) -> bool;

    /// Asks the OS to drop this application as the handler for `scheme:`.
    async fn remove_default_handler(&self, scheme: &str) -> bool;

    /// Opens the system "default applications" settings page so the user
    /// can confirm a change.
    async fn open_default_apps_settings(&self) -> std::io::Result<()>;
}

/// Builds the registry-edit scripts consumed by the privileged import
/// helper.
///
/// The script text format is the builder's concern; this layer treats the
/// output as an opaque string.
pub trait ScriptBuilder: Send + Sync {
    /// Script that installs the scheme association.
    fn install_script(&self, params: &RegScriptParams) -> String;

    /// Script that removes the scheme association.
    fn uninstall_script(&self, params: &RegScriptParams) -> String;
}

/// Values interpolated into a Windows registry script.
///
/// The log and attachment directories are expressed with environment
/// variable placeholders rather than resolved paths, so the generated
/// script stays valid for whichever user account later imports it, not
/// just the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegScriptParams {
    /// Absolute path of the running executable.
    pub exe_path: PathBuf,
    /// The mailto helper module shipped in the same directory as the
    /// executable.
    pub helper_path: PathBuf,
    /// Per-user log directory, under the roaming profile.
    pub log_dir: String,
    /// Per-user attachment scratch directory, under the local profile.
    pub attachment_dir: String,
}

impl RegScriptParams {
    /// Derives the parameter set for the currently running executable.
    pub fn for_current_exe() -> Result<Self> {
        Ok(Self::for_exe(std::env::current_exe()?))
    }

    /// Derives the parameter set for an explicit executable path. The
    /// helper module path keeps the executable's directory and swaps the
    /// filename.
    pub fn for_exe(exe_path: PathBuf) -> Self {
        let helper_path = exe_path.with_file_name(app::HELPER_MODULE_NAME);
        Self {
            exe_path,
            helper_path,
            log_dir: format!(r"%APPDATA%\{}\logs", app::BRAND_DIR),
            attachment_dir: format!(r"%LOCALAPPDATA%\{}\attachments", app::BRAND_DIR),
        }
    }
}

/// Installs and removes the OS association routing `courier:` URIs to this
/// application.
///
/// Dispatch is over the closed [`Platform`] set: Windows runs the registry
/// flow, macOS is a single OS API call, Linux is architecturally
/// unsupported, and anything else fails naming the platform.
pub struct ProtocolRegistrar<'a> {
    platform: Platform,
    scheme: String,
    scratch: &'a ScratchArea,
    api: Box<dyn SchemeApi>,
    builder: Box<dyn ScriptBuilder>,
    importer: PathBuf,
}

impl<'a> ProtocolRegistrar<'a> {
    /// Registrar for the current platform using the default registry
    /// import helper.
    pub fn new(
        scratch: &'a ScratchArea,
        api: Box<dyn SchemeApi>,
        builder: Box<dyn ScriptBuilder>,
    ) -> Self {
        Self::with_platform(Platform::current(), scratch, api, builder)
    }

    /// Registrar for an explicit platform.
    pub fn with_platform(
        platform: Platform,
        scratch: &'a ScratchArea,
        api: Box<dyn SchemeApi>,
        builder: Box<dyn ScriptBuilder>,
    ) -> Self {
        Self {
            platform,
            scheme: app::SCHEME.to_string(),
            scratch,
            api,
            builder,
            importer: PathBuf::from(app::REG_IMPORTER),
        }
    }

    /// Overrides the registry-import helper program.
    pub fn with_importer(mut self, importer: impl Into<PathBuf>) -> Self {
        self.importer = importer.into();
        self
    }

    /// Registers this application as the OS default handler for the
    /// scheme.
    pub async fn register(&self) -> Result<()> {
        match &self.platform {
            Platform::Windows => self.register_windows().await,
            Platform::Macos => {
                if self.api.set_default_handler(&self.scheme).await {
                    Ok(())
                } else {
                    Err(DesktopError::RegisterFailed(self.scheme.clone()))
                }
            }
            Platform::Linux => Err(DesktopError::Unsupported(Platform::Linux)),
            Platform::Other(name) => Err(DesktopError::UnrecognizedPlatform(name.clone())),
        }
    }

    /// Removes this application as the OS default handler for the scheme.
    pub async fn unregister(&self) -> Result<()> {
        match &self.platform {
            Platform::Windows => self.unregister_windows().await,
            Platform::Macos => {
                if self.api.remove_default_handler(&self.scheme).await {
                    Ok(())
                } else {
                    Err(DesktopError::UnregisterFailed(self.scheme.clone()))
                }
            }
            Platform::Linux => Err(DesktopError::Unsupported(Platform::Linux)),
            Platform::Other(name) => Err(DesktopError::UnrecognizedPlatform(name.clone())),
        }
    }

    async fn register_windows(&self) -> Result<()> {
        let params = RegScriptParams::for_current_exe()?;
        self.import_script(self.builder.install_script(&params))
            .await?;
        if !self.api.set_default_handler(&self.scheme).await {
            return Err(DesktopError::RegisterFailed(self.scheme.clone()));
        }
        self.open_settings_page().await;
        Ok(())
    }

    async fn unregister_windows(&self) -> Result<()> {
        if !self.api.remove_default_handler(&self.scheme).await {
            return Err(DesktopError::UnregisterFailed(self.scheme.clone()));
        }
        let params = RegScriptParams::for_current_exe()?;
        self.import_script(self.builder.uninstall_script(&params))
            .await?;
        self.open_settings_page().await;
        Ok(())
    }

    /// Stages a registry script in the scratch area, runs the privileged
    /// import helper on it, and deletes it again on every outcome.
    pub(crate) async fn import_script(&self, script: String) -> Result<()> {
        if self.platform != Platform::Windows {
            return Err(DesktopError::InvalidUsage(
                "registry script import is a Windows-only operation",
            ));
        }

        let staged = self.stage_script(&script).await?;
        debug!("Staged registry script at {staged:?}");

        // Inherit stdio so a failing import is visible to the user.
        let outcome = tokio::process::Command::new(&self.importer)
            .arg(&staged)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        // The script may encode filesystem paths; it must not outlive this
        // one use, whether or not the import worked.
        if let Err(e) = tokio::fs::remove_file(&staged).await {
            warn!("Failed to remove staged registry script {staged:?}: {e}");
        }

        match outcome {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                warn!("Registry import helper exited with {status}");
                Err(DesktopError::RegistryImportFailed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the script to a randomly named, owner-read-only file under
    /// `<scratch>/reg/`.
    async fn stage_script(&self, script: &str) -> Result<PathBuf> {
        let dir = self.scratch.dir().await?.join(paths::REG_SCRIPT_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let name = hex::encode(random_bytes(entropy::REG_SCRIPT_NAME_BYTES)?);
        let path = dir.join(name);
        write_private_file(&path, script.as_bytes()).await?;
        Ok(path)
    }

    /// Best-effort convenience step; a failure here never fails the
    /// surrounding registration.
    async fn open_settings_page(&self) {
        if let Err(e) = self.api.open_default_apps_settings().await {
            warn!("Could not open the default-apps settings page: {e}");
        }
    }
}
