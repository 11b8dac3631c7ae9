//! `list-sessions`: pick another device's session and join it.

use super::{CommandOutcome, SessionCommands, pick_items};
use vscls_core::Result;
use vscls_core::session::SessionRecord;

impl SessionCommands {
    pub async fn list_sessions(&self) -> CommandOutcome {
        let Some(_guard) = self.gates.list.try_enter() else {
            return self.busy("list-sessions");
        };
        let result = self.run_list_sessions().await;
        self.finish("list-sessions", result)
    }

    async fn run_list_sessions(&self) -> Result<CommandOutcome> {
        if !self.sign_in().await? {
            return Ok(CommandOutcome::Cancelled);
        }

        let records: Vec<SessionRecord> = self
            .backend
            .list_all()
            .await?
            .into_iter()
            .filter(|record| record.machine_id != self.host.machine_id)
            .collect();
        tracing::debug!("[Commands] {} sessions from other devices", records.len());

        if records.is_empty() {
            self.prompter.info("No sessions from other devices.");
            return Ok(CommandOutcome::Cancelled);
        }

        let Some(index) = self
            .prompter
            .pick("Join a session", &pick_items(&records))
            .await
        else {
            return Ok(CommandOutcome::Cancelled);
        };
        let Some(record) = records.get(index) else {
            return Ok(CommandOutcome::Cancelled);
        };

        self.end_local_session().await;

        if !record.has_url() {
            self.prompter.warn(&format!("'{}' has no session link to join.", record.project_name));
            return Ok(CommandOutcome::Cancelled);
        }

        self.collaboration.join(&record.session_url).await?;
        tracing::info!("[Commands] Joined session {}", record.id);
        self.prompter.info(&format!("Joining {}.", record.label()));
        Ok(CommandOutcome::Completed)
    }
}
