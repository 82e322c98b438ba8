use std::time::Duration;

use arboard::Clipboard;

use crate::error::ClientError;

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClientError>;
}

/// Platform clipboard. A fresh handle is opened per write since some
/// backends do not tolerate long-lived handles across threads.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    hold: Option<Duration>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// On Linux the selection is served by the process that set it, so a
    /// short-lived process must keep serving it for a while after writing.
    /// The write blocks for up to `hold` or until another owner takes over.
    pub fn holding(hold: Duration) -> Self {
        Self { hold: Some(hold) }
    }

    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClientError> {
        let mut clipboard =
            Clipboard::new().map_err(|err| ClientError::Clipboard(err.to_string()))?;

        #[cfg(target_os = "linux")]
        if let Some(hold) = self.hold {
            use arboard::SetExtLinux;
            return clipboard
                .set()
                .wait_until(std::time::Instant::now() + hold)
                .text(text.to_owned())
                .map_err(|err| ClientError::Clipboard(err.to_string()));
        }

        clipboard
            .set_text(text.to_owned())
            .map_err(|err| ClientError::Clipboard(err.to_string()))
    }
}
