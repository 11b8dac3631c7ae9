//! `clear-credentials`

use super::{CommandOutcome, SessionCommands};
use vscls_core::Result;

impl SessionCommands {
    pub async fn clear_credentials(&self) -> CommandOutcome {
        let Some(_guard) = self.gates.clear.try_enter() else {
            return self.busy("clear-credentials");
        };
        let result = self.run_clear_credentials().await;
        self.finish("clear-credentials", result)
    }

    async fn run_clear_credentials(&self) -> Result<CommandOutcome> {
        self.credentials.clear().await?;
        self.prompter.info("Stored credentials cleared.");
        Ok(CommandOutcome::Completed)
    }
}
