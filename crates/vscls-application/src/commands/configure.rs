//! `configure-server`: store the backend login and verify it.

use super::{CommandOutcome, SessionCommands};
use vscls_core::Result;

impl SessionCommands {
    pub async fn configure_server(&self) -> CommandOutcome {
        let Some(_guard) = self.gates.configure.try_enter() else {
            return self.busy("configure-server");
        };
        let result = self.run_configure_server().await;
        self.finish("configure-server", result)
    }

    async fn run_configure_server(&self) -> Result<CommandOutcome> {
        let Some(credentials) = self
            .credentials
            .prompt_and_store(self.prompter.as_ref())
            .await?
        else {
            return Ok(CommandOutcome::Cancelled);
        };
        self.prompter.info("Credentials saved.");

        self.backend
            .authenticate(&credentials.identifier, &credentials.secret)
            .await?;
        tracing::info!("[Commands] Verified login for {}", credentials.identifier);
        self.prompter.info(&format!(
            "Signed in to {} as {}.",
            self.backend_url, credentials.identifier
        ));
        Ok(CommandOutcome::Completed)
    }
}
