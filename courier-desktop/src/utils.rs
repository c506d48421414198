use std::io;
use std::path::Path;

use crate::Result;

/// Draws `len` bytes from the OS's cryptographically strong random source.
pub(crate) fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).map_err(|e| io::Error::other(e.to_string()))?;
    Ok(bytes)
}

/// Creates a directory, and any missing parents, readable only by its
/// owner. The mode is applied at creation time, so the directory is never
/// observable with wider permissions.
///
/// No-op mode on platforms without Unix permission bits; Windows scratch
/// directories inherit the per-user ACL of the temp root instead.
#[cfg(unix)]
pub(crate) async fn create_private_dir(path: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true).mode(0o700);
    builder.create(path).await?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) async fn create_private_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Writes a new file that is owner-read-only from the moment it exists.
///
/// The creating handle itself stays writable; the mode only governs later
/// opens.
#[cfg(unix)]
pub(crate) async fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o400)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) async fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    tokio::fs::write(path, contents).await?;
    Ok(())
}
