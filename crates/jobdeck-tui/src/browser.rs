//! Browser-open collaborator: hand a URL to the platform's opener.

use std::process::{Command, Stdio};

use url::Url;

/// Open a URL in the default browser. One invocation per entry; failures
/// are per-URL and reported by the caller, never fatal.
pub fn open_url(url: &Url) -> std::io::Result<()> {
    let mut cmd = opener_command(url.as_str());
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if !status.success() {
        return Err(std::io::Error::other(format!(
            "opener exited with {status}"
        )));
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
