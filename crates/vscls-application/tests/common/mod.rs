#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vscls_application::{CommandContext, CredentialService, HostInfo, SessionCommands};
use vscls_core::collaboration::{Clipboard, CollaborationApi};
use vscls_core::config::SessionSettings;
use vscls_core::secret::SecretKey;
use vscls_core::session::{SessionBackend, SessionDraft, SessionRecord};
use vscls_core::ui::{NotificationLevel, PickItem, Prompter};
use vscls_core::{Result, VsclsError};
use vscls_infrastructure::MemorySecretStore;

pub const MACHINE_ID: &str = "machine-local";
pub const IDENTIFIER: &str = "admin@example.com";
pub const SECRET: &str = "hunter2";

/// In-memory backend accepting one login.
#[derive(Default)]
pub struct FakeBackend {
    pub records: Mutex<Vec<SessionRecord>>,
    pub authenticated: Mutex<bool>,
    pub auth_attempts: Mutex<u32>,
    next_id: Mutex<u32>,
}

impl FakeBackend {
    pub fn with_records(records: Vec<SessionRecord>) -> Self {
        let backend = Self::default();
        *backend.records.lock().unwrap() = records;
        backend
    }

    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.lock().unwrap().clone()
    }

    fn require_auth(&self) -> Result<()> {
        if *self.authenticated.lock().unwrap() {
            Ok(())
        } else {
            Err(VsclsError::auth("not authenticated"))
        }
    }
}

pub fn record(id: &str, machine: &str, device: &str, project: &str, url: &str) -> SessionRecord {
    SessionRecord {
        id: id.to_string(),
        machine_id: machine.to_string(),
        device_name: device.to_string(),
        project_name: project.to_string(),
        session_url: url.to_string(),
        created: String::new(),
        updated: String::new(),
        collection_id: None,
        collection_name: None,
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<()> {
        *self.auth_attempts.lock().unwrap() += 1;
        let ok = identifier == IDENTIFIER && secret == SECRET;
        *self.authenticated.lock().unwrap() = ok;
        if ok {
            Ok(())
        } else {
            Err(VsclsError::auth("Failed to authenticate."))
        }
    }

    async fn list_all(&self) -> Result<Vec<SessionRecord>> {
        self.require_auth()?;
        Ok(self.records())
    }

    async fn find_by_identity(
        &self,
        machine_id: &str,
        project_name: &str,
        device_name: &str,
    ) -> Result<Vec<SessionRecord>> {
        self.require_auth()?;
        Ok(self
            .records()
            .into_iter()
            .filter(|r| {
                r.machine_id == machine_id
                    && r.project_name == project_name
                    && r.device_name == device_name
            })
            .collect())
    }

    async fn create(&self, draft: &SessionDraft) -> Result<SessionRecord> {
        self.require_auth()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = record(
            &format!("new{}", *next_id),
            &draft.machine_id,
            &draft.device_name,
            &draft.project_name,
            &draft.session_url,
        );
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, draft: &SessionDraft) -> Result<SessionRecord> {
        self.require_auth()?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| VsclsError::not_found("session", id))?;
        *slot = record(
            id,
            &draft.machine_id,
            &draft.device_name,
            &draft.project_name,
            &draft.session_url,
        );
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.require_auth()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(VsclsError::not_found("session", id));
        }
        Ok(())
    }
}

/// One scripted answer per prompt, in order. Running out cancels.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<String>>,
    pub picked_from: Mutex<Vec<Vec<PickItem>>>,
    pub notifications: Mutex<Vec<(NotificationLevel, String)>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            ..Self::default()
        }
    }

    fn answer(&self, prompt: &str) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().flatten()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn input(&self, prompt: &str, _default: Option<&str>) -> Option<String> {
        self.answer(prompt)
    }

    async fn password(&self, prompt: &str) -> Option<String> {
        self.answer(prompt)
    }

    async fn pick(&self, title: &str, items: &[PickItem]) -> Option<usize> {
        self.picked_from.lock().unwrap().push(items.to_vec());
        self.answer(title).and_then(|a| a.parse().ok())
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Records calls; `share` hands back a preset result after an optional delay.
#[derive(Default)]
pub struct FakeCollaboration {
    pub share_result: Mutex<Option<Result<Option<String>>>>,
    pub share_delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCollaboration {
    pub fn sharing(url: Option<&str>) -> Self {
        Self {
            share_result: Mutex::new(Some(Ok(url.map(str::to_string)))),
            ..Self::default()
        }
    }

    pub fn failing_share(message: &str) -> Self {
        Self {
            share_result: Mutex::new(Some(Err(VsclsError::collaboration(message)))),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CollaborationApi for FakeCollaboration {
    async fn end(&self) -> Result<()> {
        self.calls.lock().unwrap().push("end".to_string());
        Err(VsclsError::collaboration("no session is running"))
    }

    async fn share(&self) -> Result<Option<String>> {
        self.calls.lock().unwrap().push("share".to_string());
        if let Some(delay) = self.share_delay {
            tokio::time::sleep(delay).await;
        }
        self.share_result.lock().unwrap().take().unwrap_or(Ok(None))
    }

    async fn join(&self, url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("join {}", url));
        Ok(())
    }
}

pub struct FakeClipboard(pub String);

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn read_text(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemorySecretStore>,
    pub prompter: Arc<ScriptedPrompter>,
    pub collaboration: Arc<FakeCollaboration>,
    pub commands: SessionCommands,
}

pub struct HarnessBuilder {
    backend: FakeBackend,
    store: MemorySecretStore,
    prompter: ScriptedPrompter,
    collaboration: FakeCollaboration,
    clipboard: String,
    settings: SessionSettings,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            backend: FakeBackend::default(),
            store: MemorySecretStore::new(),
            prompter: ScriptedPrompter::default(),
            collaboration: FakeCollaboration::default(),
            clipboard: String::new(),
            settings: SessionSettings::default(),
        }
    }

    pub fn backend(mut self, backend: FakeBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Pre-stores the accepted login.
    pub fn signed_in(mut self) -> Self {
        self.store = MemorySecretStore::with_secrets([
            (SecretKey::LoginIdentifier, IDENTIFIER.to_string()),
            (SecretKey::LoginSecret, SECRET.to_string()),
        ]);
        self
    }

    pub fn answers(mut self, answers: &[Option<&str>]) -> Self {
        self.prompter = ScriptedPrompter::new(answers);
        self
    }

    pub fn collaboration(mut self, collaboration: FakeCollaboration) -> Self {
        self.collaboration = collaboration;
        self
    }

    pub fn clipboard(mut self, text: &str) -> Self {
        self.clipboard = text.to_string();
        self
    }

    pub fn settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Harness {
        let backend = Arc::new(self.backend);
        let store = Arc::new(self.store);
        let prompter = Arc::new(self.prompter);
        let collaboration = Arc::new(self.collaboration);

        let commands = SessionCommands::new(CommandContext {
            backend: backend.clone(),
            credentials: Arc::new(CredentialService::without_legacy(store.clone())),
            collaboration: collaboration.clone(),
            clipboard: Arc::new(FakeClipboard(self.clipboard)),
            prompter: prompter.clone(),
            host: HostInfo {
                machine_id: MACHINE_ID.to_string(),
                workspace_name: "workspace".to_string(),
            },
            settings: self.settings,
            backend_url: "http://127.0.0.1:8090".to_string(),
        });

        Harness {
            backend,
            store,
            prompter,
            collaboration,
            commands,
        }
    }
}
