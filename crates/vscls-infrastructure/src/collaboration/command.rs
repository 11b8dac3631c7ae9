//! Process-based collaboration and clipboard adapters.
//!
//! Each operation runs a configured argv (see `[collaboration]` in
//! `config.toml`). Nothing goes through a shell unless the user configures
//! one explicitly.

use async_trait::async_trait;
use tokio::process::Command;
use vscls_core::collaboration::{Clipboard, CollaborationApi};
use vscls_core::config::CollaborationSettings;
use vscls_core::{Result, VsclsError};

const URL_PLACEHOLDER: &str = "{url}";

/// Drives the collaboration tool through user-configured commands.
#[derive(Debug, Clone, Default)]
pub struct CommandCollaboration {
    settings: CollaborationSettings,
}

impl CommandCollaboration {
    pub fn new(settings: CollaborationSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl CollaborationApi for CommandCollaboration {
    async fn end(&self) -> Result<()> {
        match &self.settings.end_command {
            Some(argv) => run(argv).await.map(|_| ()),
            None => {
                tracing::debug!("[Collaboration] No end_command configured, nothing to end");
                Ok(())
            }
        }
    }

    async fn share(&self) -> Result<Option<String>> {
        let Some(argv) = &self.settings.share_command else {
            tracing::debug!("[Collaboration] No share_command configured");
            return Ok(None);
        };
        let stdout = run(argv).await?;
        Ok(first_line(&stdout))
    }

    async fn join(&self, url: &str) -> Result<()> {
        let argv = match &self.settings.join_command {
            Some(template) => expand_join_args(template, url),
            None => default_opener(url),
        };
        run(&argv).await.map(|_| ())
    }
}

/// Reads the clipboard by running a command that prints it.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    argv: Vec<String>,
}

impl CommandClipboard {
    /// Uses `argv`, or the platform's clipboard reader when `None`.
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv: argv.unwrap_or_else(default_clipboard_command),
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn read_text(&self) -> Result<String> {
        let text = run(&self.argv).await?;
        Ok(text.trim().to_string())
    }
}

/// Substitutes `{url}` in every argument, or appends the URL when the
/// template has no placeholder.
pub(crate) fn expand_join_args(template: &[String], url: &str) -> Vec<String> {
    if template.iter().any(|arg| arg.contains(URL_PLACEHOLDER)) {
        template
            .iter()
            .map(|arg| arg.replace(URL_PLACEHOLDER, url))
            .collect()
    } else {
        let mut argv = template.to_vec();
        argv.push(url.to_string());
        argv
    }
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn default_opener(url: &str) -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(windows) {
        &["cmd", "/C", "start", ""]
    } else {
        &["xdg-open"]
    };
    let mut argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    argv.push(url.to_string());
    argv
}

fn default_clipboard_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "macos") {
        &["pbpaste"]
    } else if cfg!(windows) {
        &["powershell", "-NoProfile", "-Command", "Get-Clipboard"]
    } else {
        &["xclip", "-selection", "clipboard", "-o"]
    };
    argv.iter().map(|s| s.to_string()).collect()
}

async fn run(argv: &[String]) -> Result<String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| VsclsError::config("Collaboration command is empty"))?;

    tracing::debug!("[Collaboration] Running {}", program);
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| VsclsError::collaboration(format!("Failed to run '{}': {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VsclsError::collaboration(format!(
            "'{}' exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
