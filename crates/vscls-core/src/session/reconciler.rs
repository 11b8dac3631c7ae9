//! Create-vs-update decision for publishing a session.

use super::model::{SessionDraft, SessionRecord};
use super::repository::SessionBackend;
use crate::error::Result;

/// What [`publish`] did with the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new record was inserted.
    Created(SessionRecord),
    /// An existing record with the same identity was updated in place.
    Updated(SessionRecord),
}

impl PublishOutcome {
    pub fn record(&self) -> &SessionRecord {
        match self {
            PublishOutcome::Created(record) | PublishOutcome::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> SessionRecord {
        match self {
            PublishOutcome::Created(record) | PublishOutcome::Updated(record) => record,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, PublishOutcome::Updated(_))
    }
}

/// Publishes `draft`, reusing the record with the same identity when
/// `update_existing` is set.
///
/// An empty device name disables matching, so the draft is always appended.
/// When several records share the identity the first one in backend order is
/// updated; the others are left alone.
pub async fn publish(
    backend: &dyn SessionBackend,
    draft: &SessionDraft,
    update_existing: bool,
) -> Result<PublishOutcome> {
    if !update_existing || draft.device_name.is_empty() {
        tracing::debug!("[Reconciler] Appending new session record");
        return backend.create(draft).await.map(PublishOutcome::Created);
    }

    let identity = draft.identity();
    let matches = backend
        .find_by_identity(
            identity.machine_id,
            identity.project_name,
            identity.device_name,
        )
        .await?;

    match matches.into_iter().next() {
        Some(existing) => {
            tracing::info!(
                "[Reconciler] Updating existing session record {} for project '{}'",
                existing.id,
                draft.project_name
            );
            backend
                .update(&existing.id, draft)
                .await
                .map(PublishOutcome::Updated)
        }
        None => {
            tracing::debug!("[Reconciler] No record for identity, creating one");
            backend.create(draft).await.map(PublishOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VsclsError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock backend keeping records in insertion order
    struct MockSessionBackend {
        records: Mutex<Vec<SessionRecord>>,
        next_id: Mutex<u32>,
        lookups: Mutex<u32>,
    }

    impl MockSessionBackend {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                next_id: Mutex::new(1),
                lookups: Mutex::new(0),
            }
        }

        fn count(&self) -> usize {
            self.records.lock().unwrap().len()
        }

        fn lookups(&self) -> u32 {
            *self.lookups.lock().unwrap()
        }
    }

    fn to_record(id: String, draft: &SessionDraft) -> SessionRecord {
        SessionRecord {
            id,
            machine_id: draft.machine_id.clone(),
            device_name: draft.device_name.clone(),
            project_name: draft.project_name.clone(),
            session_url: draft.session_url.clone(),
            created: String::new(),
            updated: String::new(),
            collection_id: None,
            collection_name: None,
        }
    }

    #[async_trait]
    impl SessionBackend for MockSessionBackend {
        async fn authenticate(&self, _identifier: &str, _secret: &str) -> Result<()> {
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<SessionRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn find_by_identity(
            &self,
            machine_id: &str,
            project_name: &str,
            device_name: &str,
        ) -> Result<Vec<SessionRecord>> {
            *self.lookups.lock().unwrap() += 1;
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.machine_id == machine_id
                        && r.project_name == project_name
                        && r.device_name == device_name
                })
                .cloned()
                .collect())
        }

        async fn create(&self, draft: &SessionDraft) -> Result<SessionRecord> {
            let mut next_id = self.next_id.lock().unwrap();
            let record = to_record(format!("r{}", *next_id), draft);
            *next_id += 1;
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: &str, draft: &SessionDraft) -> Result<SessionRecord> {
            let mut records = self.records.lock().unwrap();
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| VsclsError::not_found("session", id))?;
            *slot = to_record(id.to_string(), draft);
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(VsclsError::not_found("session", id));
            }
            Ok(())
        }
    }

    fn draft(device: &str, url: &str) -> SessionDraft {
        SessionDraft::new("M1", device, "P1", url)
    }

    #[tokio::test]
    async fn test_append_only_always_creates() {
        let backend = MockSessionBackend::new();
        publish(&backend, &draft("D1", "u1"), false).await.unwrap();
        let outcome = publish(&backend, &draft("D1", "u2"), false).await.unwrap();

        assert!(!outcome.is_update());
        assert_eq!(backend.count(), 2);
        assert_eq!(backend.lookups(), 0);
    }

    #[tokio::test]
    async fn test_update_existing_creates_when_no_match() {
        let backend = MockSessionBackend::new();
        let outcome = publish(&backend, &draft("D1", "u1"), true).await.unwrap();

        assert!(matches!(outcome, PublishOutcome::Created(_)));
        assert_eq!(backend.count(), 1);
        assert_eq!(backend.lookups(), 1);
    }

    #[tokio::test]
    async fn test_update_existing_updates_match_in_place() {
        let backend = MockSessionBackend::new();
        let first = publish(&backend, &draft("D1", "u1"), true)
            .await
            .unwrap()
            .into_record();

        let outcome = publish(&backend, &draft("D1", "u2"), true).await.unwrap();

        assert!(outcome.is_update());
        assert_eq!(outcome.record().id, first.id);
        assert_eq!(outcome.record().session_url, "u2");
        assert_eq!(backend.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_targets_first_of_duplicates() {
        let backend = MockSessionBackend::new();
        backend.create(&draft("D1", "old-1")).await.unwrap();
        backend.create(&draft("D1", "old-2")).await.unwrap();

        let outcome = publish(&backend, &draft("D1", "new"), true).await.unwrap();

        assert_eq!(outcome.record().id, "r1");
        let records = backend.list_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].session_url, "old-2");
    }

    #[tokio::test]
    async fn test_empty_device_name_disables_matching() {
        let backend = MockSessionBackend::new();
        let a = publish(&backend, &draft("", "u1"), true).await.unwrap();
        let b = publish(&backend, &draft("", "u2"), true).await.unwrap();

        assert!(!a.is_update());
        assert!(!b.is_update());
        assert_ne!(a.record().id, b.record().id);
        assert_eq!(backend.count(), 2);
        assert_eq!(backend.lookups(), 0);
    }

    #[tokio::test]
    async fn test_different_device_is_a_different_identity() {
        let backend = MockSessionBackend::new();
        publish(&backend, &draft("D1", "u1"), true).await.unwrap();
        let outcome = publish(&backend, &draft("D2", "u2"), true).await.unwrap();

        assert!(!outcome.is_update());
        assert_eq!(backend.count(), 2);
    }
}
