//! Unit tests for agent store orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::registry::{
    adapters::InMemorySnapshotStore,
    domain::{AgentDetails, AgentId, AgentKind, AgentName, detail_keys},
    ports::{PersistedAgent, PersistedRegistry, SnapshotError, SnapshotResult, SnapshotStore},
    services::{AgentStore, RecordLoadError, StoreError},
};
use crate::vault::{adapters::InMemoryKeyStore, services::CredentialVault};

type Vault = CredentialVault<InMemoryKeyStore>;
type TestStore = AgentStore<InMemorySnapshotStore, Vault, DefaultClock>;

struct Harness {
    disk: InMemorySnapshotStore,
    store: TestStore,
}

fn store_over(disk: &InMemorySnapshotStore, keys: InMemoryKeyStore) -> TestStore {
    AgentStore::new(
        Arc::new(disk.clone()),
        Arc::new(CredentialVault::new(Arc::new(keys))),
        Arc::new(DefaultClock),
    )
}

#[fixture]
fn harness() -> Harness {
    let disk = InMemorySnapshotStore::new();
    let store = store_over(&disk, InMemoryKeyStore::new());
    Harness { disk, store }
}

fn name(value: &str) -> AgentName {
    AgentName::new(value).expect("valid name")
}

fn api_details() -> AgentDetails {
    AgentDetails::new()
        .with(detail_keys::DESCRIPTION, "weather forecasts")
        .with(detail_keys::CREDENTIAL, "sk-live-secret")
        .with(detail_keys::ENDPOINT, "https://api.example/v1")
}

fn shell_details() -> AgentDetails {
    AgentDetails::new()
        .with(detail_keys::DESCRIPTION, "echo service")
        .with(detail_keys::COMMAND, "echo")
}

fn persisted_document(disk: &InMemorySnapshotStore) -> PersistedRegistry {
    disk.document()
        .expect("lock should succeed")
        .expect("document should exist")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_store_loads_empty_snapshot(harness: Harness) {
    let snapshot = harness.store.load().await.expect("load should succeed");

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.revision(), 0);
    assert!(snapshot.failures().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_then_get_returns_plaintext_details(harness: Harness) {
    let created = harness
        .store
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");

    let fetched = harness
        .store
        .get(created.id())
        .await
        .expect("get should succeed")
        .expect("agent should exist");

    assert_eq!(fetched.name().as_str(), "Forecaster");
    assert_eq!(fetched.kind(), AgentKind::RemoteApi);
    assert_eq!(fetched.details(), &api_details());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn secrets_are_sealed_at_rest(harness: Harness) {
    harness
        .store
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");

    let document = persisted_document(&harness.disk);
    let stored = document.agents.first().expect("one agent");
    let credential = stored
        .details
        .get(detail_keys::CREDENTIAL)
        .expect("credential stored");

    assert_ne!(credential, "sk-live-secret");
    assert_eq!(
        stored.details.get(detail_keys::ENDPOINT).map(String::as_str),
        Some("https://api.example/v1")
    );
    let raw = serde_json::to_string(&document).expect("serialise");
    assert!(!raw.contains("sk-live-secret"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_save_bumps_the_revision(harness: Harness) {
    let created = harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");
    assert_eq!(persisted_document(&harness.disk).revision, 1);

    harness
        .store
        .update(created.id(), AgentDetails::new().with("extra", "1"))
        .await
        .expect("update should succeed");
    assert_eq!(persisted_document(&harness.disk).revision, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_merges_only_patched_keys(harness: Harness) {
    let created = harness
        .store
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");

    let updated = harness
        .store
        .update(
            created.id(),
            AgentDetails::new().with(detail_keys::ENDPOINT, "https://api.example/v2"),
        )
        .await
        .expect("update should succeed");
    assert!(updated);

    let fetched = harness
        .store
        .get(created.id())
        .await
        .expect("get should succeed")
        .expect("agent should exist");
    assert_eq!(
        fetched.details().get(detail_keys::ENDPOINT),
        Some("https://api.example/v2")
    );
    assert_eq!(
        fetched.details().get(detail_keys::CREDENTIAL),
        Some("sk-live-secret")
    );
    assert_eq!(fetched.description(), "weather forecasts");
    assert_eq!(fetched.kind(), AgentKind::RemoteApi);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_id_leaves_storage_unchanged(harness: Harness) {
    harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");
    let before = persisted_document(&harness.disk);

    let updated = harness
        .store
        .update(AgentId::new(), AgentDetails::new().with("k", "v"))
        .await
        .expect("update should succeed");

    assert!(!updated);
    assert_eq!(persisted_document(&harness.disk), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_is_idempotent(harness: Harness) {
    let created = harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");

    assert!(harness.store.remove(created.id()).await.expect("remove"));
    assert!(!harness.store.remove(created.id()).await.expect("remove"));
    assert!(
        harness
            .store
            .get(created.id())
            .await
            .expect("get should succeed")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_agents_in_registration_order(harness: Harness) {
    let first = harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");
    let second = harness
        .store
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");

    let ids: Vec<AgentId> = harness
        .store
        .list()
        .await
        .expect("list should succeed")
        .iter()
        .map(|record| record.id())
        .collect();

    assert_eq!(ids, vec![first.id(), second.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_key_entry_is_quarantined_and_preserved(harness: Harness) {
    let healthy = harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");

    let foreign_disk = InMemorySnapshotStore::new();
    let foreign = store_over(&foreign_disk, InMemoryKeyStore::new());
    let sealed = foreign
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");
    let sealed_entry = persisted_document(&foreign_disk)
        .agents
        .into_iter()
        .next()
        .expect("one agent");

    let mut document = persisted_document(&harness.disk);
    document.agents.push(sealed_entry.clone());
    harness.disk.replace(document).expect("replace should succeed");

    let snapshot = harness.store.load().await.expect("load should succeed");
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.get(healthy.id()).is_some());
    let failure = snapshot.failures().first().expect("one failure");
    assert_eq!(failure.id(), sealed.id().to_string());
    assert!(matches!(
        failure.reason(),
        RecordLoadError::Decryption { field, .. } if field == detail_keys::CREDENTIAL
    ));

    harness
        .store
        .update(healthy.id(), AgentDetails::new().with("extra", "1"))
        .await
        .expect("update should succeed");

    let rewritten = persisted_document(&harness.disk);
    assert!(rewritten.agents.contains(&sealed_entry));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_deletes_entry_sealed_under_another_key(harness: Harness) {
    let foreign_disk = InMemorySnapshotStore::new();
    let foreign = store_over(&foreign_disk, InMemoryKeyStore::new());
    let sealed = foreign
        .add(name("Forecaster"), AgentKind::RemoteApi, api_details())
        .await
        .expect("add should succeed");
    let mut document = persisted_document(&foreign_disk);
    for entry in &mut document.agents {
        entry.id = entry.id.to_uppercase();
    }
    harness.disk.replace(document).expect("replace should succeed");

    let before = harness.store.load().await.expect("load should succeed");
    assert!(before.is_empty());
    assert_eq!(before.failures().len(), 1);

    assert!(harness.store.remove(sealed.id()).await.expect("remove"));

    let after = harness.store.load().await.expect("load should succeed");
    assert!(after.failures().is_empty());
    assert!(persisted_document(&harness.disk).agents.is_empty());
    assert!(!harness.store.remove(sealed.id()).await.expect("remove"));
}

#[rstest]
#[case::bad_id("not-a-uuid", "shell_command", "Echo")]
#[case::unknown_kind("8d1f4c5e-0b7a-4a39-9a7e-6f7a2a0c9b11", "telepathy", "Echo")]
#[case::blank_name("8d1f4c5e-0b7a-4a39-9a7e-6f7a2a0c9b11", "shell_command", "  ")]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_entries_do_not_block_the_load(
    #[case] id: &str,
    #[case] kind: &str,
    #[case] raw_name: &str,
) {
    let broken = PersistedAgent {
        id: id.to_owned(),
        name: raw_name.to_owned(),
        kind: kind.to_owned(),
        details: BTreeMap::new(),
        created_at: None,
        updated_at: None,
    };
    let disk = InMemorySnapshotStore::with_document(PersistedRegistry::new(4, vec![broken]));
    let store = store_over(&disk, InMemoryKeyStore::new());

    let snapshot = store.load().await.expect("load should succeed");

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.failures().len(), 1);
    assert_eq!(snapshot.revision(), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_ids_keep_the_first_entry(harness: Harness) {
    let created = harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");
    let mut document = persisted_document(&harness.disk);
    let mut copy = document.agents[0].clone();
    copy.name = "Impostor".to_owned();
    document.agents.push(copy);
    harness.disk.replace(document).expect("replace should succeed");

    let snapshot = harness.store.load().await.expect("load should succeed");

    let loaded = snapshot.get(created.id()).expect("agent should exist");
    assert_eq!(loaded.name().as_str(), "Echo");
    assert!(matches!(
        snapshot.failures().first().map(|failure| failure.reason()),
        Some(RecordLoadError::DuplicateId)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_snapshot_is_rejected(harness: Harness) {
    let stale = harness.store.load().await.expect("load should succeed");
    harness
        .store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await
        .expect("add should succeed");

    let result = harness.store.save(&stale).await;

    assert!(matches!(
        result,
        Err(StoreError::Conflict {
            expected: 0,
            found: 1
        })
    ));
    assert_eq!(harness.store.list().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_adds_are_serialised(harness: Harness) {
    let store = Arc::new(harness.store);
    let mut tasks = Vec::new();
    for index in 0..8 {
        let worker = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            worker
                .add(
                    name(&format!("agent-{index}")),
                    AgentKind::ShellCommand,
                    shell_details(),
                )
                .await
        }));
    }
    for task in tasks {
        task.await
            .expect("task should join")
            .expect("add should succeed");
    }

    assert_eq!(store.list().await.expect("list").len(), 8);
    assert_eq!(persisted_document(&harness.disk).revision, 8);
}

mockall::mock! {
    Snapshots {}

    #[async_trait]
    impl SnapshotStore for Snapshots {
        async fn read(&self) -> SnapshotResult<Option<PersistedRegistry>>;
        async fn write(&self, registry: &PersistedRegistry) -> SnapshotResult<()>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn write_failure_surfaces_as_snapshot_error() {
    let mut snapshots = MockSnapshots::new();
    snapshots.expect_read().returning(|| Ok(None));
    snapshots.expect_write().returning(|_| {
        Err(SnapshotError::persistence(std::io::Error::other(
            "disk full",
        )))
    });
    let store = AgentStore::new(
        Arc::new(snapshots),
        Arc::new(CredentialVault::new(Arc::new(InMemoryKeyStore::new()))),
        Arc::new(DefaultClock),
    );

    let result = store
        .add(name("Echo"), AgentKind::ShellCommand, shell_details())
        .await;

    assert!(matches!(
        result,
        Err(StoreError::Snapshot(SnapshotError::Persistence(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_failure_surfaces_from_list() {
    let mut snapshots = MockSnapshots::new();
    snapshots.expect_read().returning(|| {
        Err(SnapshotError::corrupt(std::io::Error::other(
            "unexpected token",
        )))
    });
    snapshots.expect_write().never();
    let store = AgentStore::new(
        Arc::new(snapshots),
        Arc::new(CredentialVault::new(Arc::new(InMemoryKeyStore::new()))),
        Arc::new(DefaultClock),
    );

    assert!(matches!(
        store.list().await,
        Err(StoreError::Snapshot(SnapshotError::Corrupt(_)))
    ));
}
