//! Screenshot action fired on a recognized swipe.

use crate::error::{Error, Result};
use tracing::info;
use zbus::blocking::{Connection, Proxy};

/// Side effect invoked when a gesture is recognized.
///
/// Fire-and-forget from the dispatch loop's perspective: failures are logged
/// by the caller and never stop recognition.
pub trait ActionTrigger {
    fn fire(&mut self) -> Result<()>;
}

/// Takes a full-screen screenshot through the GNOME Shell D-Bus interface.
pub struct GnomeScreenshot {
    connection: Connection,
}

impl GnomeScreenshot {
    /// Connect to the session bus. Fatal at startup if no bus is available.
    pub fn connect() -> Result<Self> {
        let connection = Connection::session().map_err(|e| {
            Error::ScreenshotFailed(format!("session bus connection failed: {}", e))
        })?;
        Ok(Self { connection })
    }

    /// Capture a screenshot with a timestamped filename. Returns the path
    /// the compositor reports having saved to.
    pub fn capture(&self) -> Result<String> {
        let filename = chrono::Local::now()
            .format("screenshot-%Y%m%d-%H%M%S.png")
            .to_string();

        let proxy = Proxy::new(
            &self.connection,
            "org.gnome.Shell.Screenshot",
            "/org/gnome/Shell/Screenshot",
            "org.gnome.Shell.Screenshot",
        )
        .map_err(|e| {
            Error::ScreenshotFailed(format!("GNOME Shell screenshot interface not found: {}", e))
        })?;

        // (include_cursor, flash, filename) -> (success, saved filename)
        let reply = proxy
            .call_method("Screenshot", &(false, true, filename.as_str()))
            .map_err(|e| Error::ScreenshotFailed(format!("Screenshot call failed: {}", e)))?;

        let (success, saved): (bool, String) = reply
            .body()
            .deserialize()
            .map_err(|e| Error::ScreenshotFailed(format!("invalid response format: {}", e)))?;

        if !success {
            return Err(Error::ScreenshotFailed(
                "compositor reported failure".to_string(),
            ));
        }
        Ok(saved)
    }
}

impl ActionTrigger for GnomeScreenshot {
    fn fire(&mut self) -> Result<()> {
        let saved = self.capture()?;
        info!(path = %saved, "screenshot saved");
        Ok(())
    }
}
