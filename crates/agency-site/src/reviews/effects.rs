use std::process::{Command, Stdio};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SideEffectError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("unable to open {url}: {reason}")]
    Navigation { url: String, reason: String },
}

/// Places text on the system clipboard.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), SideEffectError>;
}

/// Opens a URL in a new browsing context.
pub trait ExternalNavigator: Send + Sync {
    fn open(&self, url: &str) -> Result<(), SideEffectError>;
}

/// Clipboard access through `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), SideEffectError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| SideEffectError::Clipboard(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| SideEffectError::Clipboard(err.to_string()))
    }
}

/// Hands http(s) URLs to the platform's default browser opener.
///
/// The opener is awaited; `Completed` means it exited successfully, not that a page rendered.
#[derive(Debug, Default, Clone)]
pub struct SystemBrowser {
    opener: Option<String>,
}

impl SystemBrowser {
    /// Uses `program <url>` instead of the platform opener.
    pub fn with_opener(program: impl Into<String>) -> Self {
        Self {
            opener: Some(program.into()),
        }
    }

    fn command(&self, url: &str) -> Command {
        if let Some(program) = &self.opener {
            let mut command = Command::new(program);
            command.arg(url);
            return command;
        }

        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(url);
            command
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

impl ExternalNavigator for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), SideEffectError> {
        let navigation_error = |reason: String| SideEffectError::Navigation {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|err| navigation_error(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(navigation_error(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let status = self
            .command(parsed.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| navigation_error(err.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(navigation_error(format!("browser opener exited with {status}")))
        }
    }
}

/// Result of one side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum EffectStatus {
    Completed,
    Failed(String),
    Skipped,
}

impl EffectStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, EffectStatus::Completed)
    }
}

impl From<Result<(), SideEffectError>> for EffectStatus {
    fn from(value: Result<(), SideEffectError>) -> Self {
        match value {
            Ok(()) => EffectStatus::Completed,
            Err(err) => EffectStatus::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideEffectReport {
    pub clipboard: EffectStatus,
    pub navigation: EffectStatus,
    pub destination: String,
}

/// Copies the review and opens the destination, each best effort and independent.
#[derive(Clone, Default)]
pub struct SideEffectExecutor {
    clipboard: Option<Arc<dyn ClipboardWriter>>,
    navigator: Option<Arc<dyn ExternalNavigator>>,
}

impl SideEffectExecutor {
    pub fn new(clipboard: Arc<dyn ClipboardWriter>, navigator: Arc<dyn ExternalNavigator>) -> Self {
        Self {
            clipboard: Some(clipboard),
            navigator: Some(navigator),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClipboard), Arc::new(SystemBrowser::default()))
    }

    pub fn without_clipboard(mut self) -> Self {
        self.clipboard = None;
        self
    }

    pub fn without_navigation(mut self) -> Self {
        self.navigator = None;
        self
    }

    /// Never fails; the report carries the real outcome of each effect.
    pub fn execute(&self, text: &str, destination: &str) -> SideEffectReport {
        let clipboard = match &self.clipboard {
            Some(writer) => writer.write_text(text).into(),
            None => EffectStatus::Skipped,
        };
        match &clipboard {
            EffectStatus::Completed => info!("review copied to clipboard"),
            EffectStatus::Failed(reason) => warn!(%reason, "clipboard write failed"),
            EffectStatus::Skipped => {}
        }

        let navigation = match &self.navigator {
            Some(navigator) => navigator.open(destination).into(),
            None => EffectStatus::Skipped,
        };
        match &navigation {
            EffectStatus::Completed => info!(%destination, "opened review destination"),
            EffectStatus::Failed(reason) => warn!(%destination, %reason, "navigation failed"),
            EffectStatus::Skipped => {}
        }

        SideEffectReport {
            clipboard,
            navigation,
            destination: destination.to_string(),
        }
    }
}

impl std::fmt::Debug for SideEffectExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffectExecutor")
            .field("clipboard", &self.clipboard.is_some())
            .field("navigator", &self.navigator.is_some())
            .finish()
    }
}
