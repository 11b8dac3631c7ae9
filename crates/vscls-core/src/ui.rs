//! User interaction seam.
//!
//! Command handlers talk to the user only through [`Prompter`]. Every prompt
//! returns `None` when the user cancels, which aborts the running command.

use async_trait::async_trait;

/// One entry of a pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: String,
}

/// Severity of a notification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Asks for a line of text, pre-filled with `default`.
    async fn input(&self, prompt: &str, default: Option<&str>) -> Option<String>;

    /// Asks for a secret without echoing it.
    async fn password(&self, prompt: &str) -> Option<String>;

    /// Lets the user pick one item; returns its index.
    async fn pick(&self, title: &str, items: &[PickItem]) -> Option<usize>;

    /// Shows a one-line message.
    fn notify(&self, level: NotificationLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}
