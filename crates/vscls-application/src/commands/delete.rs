//! `delete-session`

use super::{CommandOutcome, SessionCommands, pick_items};
use vscls_core::Result;

impl SessionCommands {
    pub async fn delete_session(&self) -> CommandOutcome {
        let Some(_guard) = self.gates.delete.try_enter() else {
            return self.busy("delete-session");
        };
        let result = self.run_delete_session().await;
        self.finish("delete-session", result)
    }

    async fn run_delete_session(&self) -> Result<CommandOutcome> {
        if !self.sign_in().await? {
            return Ok(CommandOutcome::Cancelled);
        }

        let records = self.backend.list_all().await?;
        if records.is_empty() {
            self.prompter.info("There are no published sessions.");
            return Ok(CommandOutcome::Cancelled);
        }

        let Some(index) = self
            .prompter
            .pick("Delete a session", &pick_items(&records))
            .await
        else {
            return Ok(CommandOutcome::Cancelled);
        };
        let Some(record) = records.get(index) else {
            return Ok(CommandOutcome::Cancelled);
        };

        self.end_local_session().await;

        self.backend.delete(&record.id).await?;
        tracing::info!("[Commands] Deleted session {}", record.id);
        self.prompter.info(&format!("Deleted {}.", record.label()));
        Ok(CommandOutcome::Completed)
    }
}
