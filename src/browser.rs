use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Open `url` in the desktop browser after `delay`.
///
/// Runs once in the background; failure is only logged.
pub fn open_later(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::info!(%url, "opening browser");
        if let Err(e) = opener(&url).spawn() {
            tracing::warn!(%url, error = %e, "failed to open browser");
        }
    })
}

fn opener(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}
