//! `create-session`: start sharing and publish the link.

use super::{CommandOutcome, SessionCommands};
use vscls_core::Result;
use vscls_core::session::{PublishOutcome, SessionDraft, publish};

/// Values given up front, skipping the matching prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSessionOptions {
    pub device_name: Option<String>,
    pub project_name: Option<String>,
}

impl SessionCommands {
    pub async fn create_session(&self, options: CreateSessionOptions) -> CommandOutcome {
        let Some(_guard) = self.gates.create.try_enter() else {
            return self.busy("create-session");
        };
        let result = self.run_create_session(options).await;
        self.finish("create-session", result)
    }

    async fn run_create_session(&self, options: CreateSessionOptions) -> Result<CommandOutcome> {
        if !self.sign_in().await? {
            return Ok(CommandOutcome::Cancelled);
        }

        let Some(device_name) = self.device_name(options.device_name).await else {
            return Ok(CommandOutcome::Cancelled);
        };
        let Some(project_name) = self.project_name(options.project_name).await else {
            return Ok(CommandOutcome::Cancelled);
        };

        self.end_local_session().await;

        let Some(session_url) = self.share_url().await else {
            self.prompter.warn(
                "No session link was produced. Start sharing and copy the link, then run create-session again.",
            );
            return Ok(CommandOutcome::Cancelled);
        };

        let draft = SessionDraft::new(
            self.host.machine_id.clone(),
            device_name,
            project_name,
            session_url,
        );
        let outcome = publish(
            self.backend.as_ref(),
            &draft,
            self.settings.overwrite_existing_project,
        )
        .await?;

        let verb = match &outcome {
            PublishOutcome::Created(_) => "Published",
            PublishOutcome::Updated(_) => "Updated",
        };
        self.prompter.info(&format!("{} {}.", verb, outcome.record().label()));
        Ok(CommandOutcome::Completed)
    }

    /// Option, then the configured name, then a prompt defaulting to the
    /// machine id.
    async fn device_name(&self, given: Option<String>) -> Option<String> {
        if let Some(name) = given.filter(|n| !n.trim().is_empty()) {
            return Some(name.trim().to_string());
        }
        if let Some(name) = self.settings.device_name_override() {
            return Some(name.to_string());
        }
        let answer = self
            .prompter
            .input("Device name", Some(&self.host.machine_id))
            .await?;
        Some(or_default(answer, &self.host.machine_id))
    }

    /// Option, then a prompt defaulting to the workspace name.
    async fn project_name(&self, given: Option<String>) -> Option<String> {
        if let Some(name) = given.filter(|n| !n.trim().is_empty()) {
            return Some(name.trim().to_string());
        }
        let answer = self
            .prompter
            .input("Project name", Some(&self.host.workspace_name))
            .await?;
        Some(or_default(answer, &self.host.workspace_name))
    }

    /// The link from `share()`, falling back to the clipboard when sharing
    /// fails or hands nothing back.
    async fn share_url(&self) -> Option<String> {
        match self.collaboration.share().await {
            Ok(Some(url)) if !url.trim().is_empty() => return Some(url.trim().to_string()),
            Ok(_) => {
                tracing::debug!("[Commands] share() returned no link, reading the clipboard");
            }
            Err(err) => {
                tracing::warn!("[Commands] share() failed: {}", err);
                self.prompter.warn(&format!(
                    "Sharing failed ({}); using the link from the clipboard.",
                    err
                ));
            }
        }

        match self.clipboard.read_text().await {
            Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) => {
                tracing::warn!("[Commands] Reading the clipboard failed: {}", err);
                None
            }
        }
    }
}

fn or_default(answer: String, default: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}
