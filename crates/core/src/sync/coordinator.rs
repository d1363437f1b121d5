//! Dual-write persistence coordinator
//!
//! Every mutation goes to the remote store first, bounded by a timeout, and
//! is then mirrored locally regardless of the remote outcome. Reads prefer
//! the remote store and fall back to the mirror on any remote error.
//!
//! A document missing remotely is only served from the mirror while its last
//! write never reached the remote store; otherwise the mirror copy is stale
//! and gets dropped.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use huddle_domain::types::group::normalize_group_code;
use huddle_domain::types::slot::validate_date;
use huddle_domain::{
    AvailabilityData, AvailabilityRecord, ChatMessage, Group, GroupSummary, HuddleError, Result,
    SyncConfig, SyncNotice, SyncPhase, WriteOutcome,
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::notify::NotificationChannel;
use crate::storage::{DocumentStore, StorageKey};

enum Mutation {
    Set(Value),
    Remove,
}

/// Remote error that forced a write to stay local, if any.
type Fallback = Option<HuddleError>;

/// Coordinates the remote store and its on-device mirror.
pub struct DualWriteCoordinator {
    remote: Arc<dyn DocumentStore>,
    local: Arc<dyn DocumentStore>,
    remote_timeout: Duration,
    notices: NotificationChannel,
    /// Keys whose latest write only reached the local mirror
    unsynced: Mutex<HashSet<String>>,
}

impl DualWriteCoordinator {
    /// Coordinator over `remote` and its `local` mirror.
    pub fn new(
        remote: Arc<dyn DocumentStore>,
        local: Arc<dyn DocumentStore>,
        config: &SyncConfig,
        notices: NotificationChannel,
    ) -> Self {
        Self {
            remote,
            local,
            remote_timeout: config.remote_timeout(),
            notices,
            unsynced: Mutex::new(HashSet::new()),
        }
    }

    /// Channel carrying save and fallback notices.
    pub fn notices(&self) -> &NotificationChannel {
        &self.notices
    }

    // ---------------------------------------------------------------------
    // Availability
    // ---------------------------------------------------------------------

    /// Persist a user's availability for one group.
    #[instrument(
        skip(self, record),
        fields(
            group_id = %record.group_id(),
            user_id = %record.user_id(),
            slots = record.slot_count()
        )
    )]
    pub async fn save_availability(&self, record: &AvailabilityRecord) -> Result<WriteOutcome> {
        const OP: &str = "save_availability";

        let key = StorageKey::availability(record.group_id(), record.user_id());
        let value = serde_json::to_value(record.to_data())?;
        let fallback = self.mutate(OP, &key, Mutation::Set(value)).await?;
        Ok(self.settle(OP, fallback))
    }

    /// One member's availability, with invalid slots dropped.
    #[instrument(skip(self))]
    pub async fn load_availability(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Option<AvailabilityRecord>> {
        let key = StorageKey::availability(group_id, user_id);
        let data: Option<AvailabilityData> = self.read_document("load_availability", &key).await?;
        Ok(data.map(normalize_record))
    }

    /// Records for every member of `group` that has one stored.
    #[instrument(skip(self, group), fields(group_id = %group.id, members = group.member_ids.len()))]
    pub async fn load_group_availabilities(
        &self,
        group: &Group,
    ) -> Result<Vec<AvailabilityRecord>> {
        let mut records = Vec::with_capacity(group.member_ids.len());
        for member in &group.member_ids {
            match self.load_availability(&group.id, member).await? {
                Some(record) => records.push(record),
                None => debug!(user_id = %member, "member has no stored availability"),
            }
        }
        Ok(records)
    }

    /// Remove a member's availability from both stores.
    #[instrument(skip(self))]
    pub async fn delete_availability(&self, group_id: &str, user_id: &str) -> Result<WriteOutcome> {
        const OP: &str = "delete_availability";

        let key = StorageKey::availability(group_id, user_id);
        let fallback = self.mutate(OP, &key, Mutation::Remove).await?;
        Ok(self.settle(OP, fallback))
    }

    // ---------------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------------

    /// Create a group owned by `creator`.
    ///
    /// A name already reserved on the remote store fails with
    /// [`HuddleError::DuplicateGroupName`] before anything is written, whether
    /// the lookup or the reservation write reports the conflict. When
    /// the remote store cannot be reached the group is created on this
    /// device only.
    #[instrument(skip(self))]
    pub async fn create_group(&self, name: &str, creator: &str) -> Result<Group> {
        const OP: &str = "create_group";

        let group = Group::new(name, creator)?;
        let name_key = StorageKey::GroupName(group.name_key());

        let unreachable = match self.remote_call(self.remote.get(&name_key.to_string())).await {
            Ok(Some(_)) => {
                info!(name = %group.name, "group name already taken");
                return Err(HuddleError::DuplicateGroupName(group.name));
            }
            Ok(None) => None,
            Err(err) if err.is_business_rule() => return Err(err),
            Err(err) => {
                warn!(error = %err, "name check failed; creating group on this device only");
                Some(err)
            }
        };
        let local_only = unreachable.is_some();

        // The name reservation goes first: a remote conflict on it must leave
        // nothing behind.
        let mut fallback = unreachable;
        let reserved = Value::String(group.id.clone());
        fallback = fallback.or(self.put(OP, &name_key, reserved, local_only).await?);

        let record = AvailabilityRecord::new(creator, group.id.as_str());
        let documents = [
            (StorageKey::Group(group.id.clone()), serde_json::to_value(&group)?),
            (StorageKey::GroupCode(group.code.clone()), Value::String(group.id.clone())),
            (StorageKey::availability(&group.id, creator), serde_json::to_value(record.to_data())?),
        ];

        for (key, value) in documents {
            fallback = fallback.or(self.put(OP, &key, value, local_only).await?);
        }

        let summary = group.summary();
        let indexed = self
            .update_user_groups(OP, creator, local_only, |groups| add_summary(groups, summary))
            .await?;
        fallback = fallback.or(indexed);

        let outcome = self.settle(OP, fallback);
        info!(group_id = %group.id, code = %group.code, %outcome, "group created");
        Ok(group)
    }

    /// Group document by id.
    #[instrument(skip(self))]
    pub async fn load_group(&self, group_id: &str) -> Result<Option<Group>> {
        self.read_document("load_group", &StorageKey::Group(group_id.to_string())).await
    }

    /// Overwrite the group document.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn save_group(&self, group: &Group) -> Result<WriteOutcome> {
        const OP: &str = "save_group";

        let key = StorageKey::Group(group.id.clone());
        let fallback = self.mutate(OP, &key, Mutation::Set(serde_json::to_value(group)?)).await?;
        Ok(self.settle(OP, fallback))
    }

    /// Join the group behind an invite code.
    ///
    /// Joining twice is harmless; an existing availability record is kept.
    #[instrument(skip(self))]
    pub async fn join_group(&self, code: &str, user_id: &str) -> Result<Group> {
        const OP: &str = "join_group";

        let code = normalize_group_code(code)?;
        let group_id: String = self
            .read_document(OP, &StorageKey::GroupCode(code.clone()))
            .await?
            .ok_or_else(|| HuddleError::NotFound(format!("no group with code {code}")))?;
        let mut group: Group = self
            .read_document(OP, &StorageKey::Group(group_id.clone()))
            .await?
            .ok_or_else(|| HuddleError::NotFound(format!("group {group_id}")))?;

        let mut fallback: Fallback = None;
        if group.add_member(user_id) {
            let key = StorageKey::Group(group.id.clone());
            let value = serde_json::to_value(&group)?;
            fallback = fallback.or(self.put(OP, &key, value, false).await?);
        }

        let record_key = StorageKey::availability(&group.id, user_id);
        if self.read_document::<Value>(OP, &record_key).await?.is_none() {
            let record = AvailabilityRecord::new(user_id, group.id.as_str());
            let value = serde_json::to_value(record.to_data())?;
            fallback = fallback.or(self.put(OP, &record_key, value, false).await?);
        }

        let summary = group.summary();
        let indexed = self
            .update_user_groups(OP, user_id, false, |groups| add_summary(groups, summary))
            .await?;
        fallback = fallback.or(indexed);

        let outcome = self.settle(OP, fallback);
        info!(group_id = %group.id, %outcome, "joined group");
        Ok(group)
    }

    /// Leave a group and drop the user's availability for it.
    #[instrument(skip(self))]
    pub async fn leave_group(&self, group_id: &str, user_id: &str) -> Result<WriteOutcome> {
        const OP: &str = "leave_group";

        let mut group = self
            .load_group(group_id)
            .await?
            .ok_or_else(|| HuddleError::NotFound(format!("group {group_id}")))?;

        let mut fallback: Fallback = None;
        if group.remove_member(user_id) {
            let key = StorageKey::Group(group.id.clone());
            let value = serde_json::to_value(&group)?;
            fallback = fallback.or(self.put(OP, &key, value, false).await?);
        }

        let record_key = StorageKey::availability(group_id, user_id);
        fallback = fallback.or(self.mutate(OP, &record_key, Mutation::Remove).await?);

        let indexed = self
            .update_user_groups(OP, user_id, false, |groups| remove_summary(groups, group_id))
            .await?;
        fallback = fallback.or(indexed);

        Ok(self.settle(OP, fallback))
    }

    /// Groups the user belongs to.
    #[instrument(skip(self))]
    pub async fn load_user_groups(&self, user_id: &str) -> Result<Vec<GroupSummary>> {
        let key = StorageKey::UserGroups(user_id.to_string());
        Ok(self.read_document("load_user_groups", &key).await?.unwrap_or_default())
    }

    // ---------------------------------------------------------------------
    // Chat
    // ---------------------------------------------------------------------

    /// Append a message to the group's thread for `date`.
    #[instrument(skip(self, body), fields(len = body.len()))]
    pub async fn send_chat_message(
        &self,
        group_id: &str,
        date: &str,
        user_id: &str,
        body: &str,
    ) -> Result<ChatMessage> {
        const OP: &str = "send_chat_message";

        let message = ChatMessage::new(group_id, date, user_id, body)?;
        let key = StorageKey::chat(group_id, date);

        let mut thread: Vec<ChatMessage> = self.read_document(OP, &key).await?.unwrap_or_default();
        thread.push(message.clone());

        let fallback = self.mutate(OP, &key, Mutation::Set(serde_json::to_value(&thread)?)).await?;
        self.settle(OP, fallback);
        Ok(message)
    }

    /// Messages for one date, oldest first.
    #[instrument(skip(self))]
    pub async fn load_chat_messages(&self, group_id: &str, date: &str) -> Result<Vec<ChatMessage>> {
        validate_date(date)?;
        let key = StorageKey::chat(group_id, date);
        let mut thread: Vec<ChatMessage> =
            self.read_document("load_chat_messages", &key).await?.unwrap_or_default();
        thread.sort_by_key(|message| message.sent_at);
        Ok(thread)
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    async fn remote_call<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.remote_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(HuddleError::Timeout(format!(
                "remote store did not answer within {} ms",
                self.remote_timeout.as_millis()
            ))),
        }
    }

    /// Remote then local. Fails only when the local mirror fails after the
    /// remote did too.
    async fn mutate(
        &self,
        operation: &'static str,
        key: &StorageKey,
        mutation: Mutation,
    ) -> Result<Fallback> {
        let key = key.to_string();

        trace_phase(operation, &key, SyncPhase::RemoteAttempt);
        let remote = match &mutation {
            Mutation::Set(value) => self.remote_call(self.remote.set(&key, value.clone())).await,
            Mutation::Remove => self.remote_call(self.remote.remove(&key)).await,
        };
        let fallback = match remote {
            Ok(()) => {
                trace_phase(operation, &key, SyncPhase::RemoteSucceeded);
                None
            }
            Err(err) if err.is_business_rule() => return Err(err),
            Err(err) => {
                warn!(
                    operation,
                    key = %key,
                    error = %err,
                    transient = err.is_transient(),
                    "remote write failed; keeping local copy"
                );
                trace_phase(operation, &key, SyncPhase::RemoteFailed);
                Some(err)
            }
        };

        trace_phase(operation, &key, SyncPhase::LocalMirror);
        let is_set = matches!(mutation, Mutation::Set(_));
        let local = match mutation {
            Mutation::Set(value) => self.local.set(&key, value).await,
            Mutation::Remove => self.local.remove(&key).await,
        };
        trace_phase(operation, &key, SyncPhase::Done);

        if is_set && fallback.is_some() && local.is_ok() {
            self.unsynced.lock().insert(key.clone());
        } else {
            self.unsynced.lock().remove(&key);
        }

        match (fallback, local) {
            (fallback, Ok(())) => Ok(fallback),
            (None, Err(err)) => {
                error!(
                    operation,
                    key = %key,
                    error = %err,
                    "local mirror out of date after remote write"
                );
                Ok(None)
            }
            (Some(_), Err(err)) => Err(err),
        }
    }

    async fn put(
        &self,
        operation: &'static str,
        key: &StorageKey,
        value: Value,
        local_only: bool,
    ) -> Result<Fallback> {
        if !local_only {
            return self.mutate(operation, key, Mutation::Set(value)).await;
        }
        let key = key.to_string();
        trace_phase(operation, &key, SyncPhase::LocalMirror);
        self.local.set(&key, value).await?;
        self.unsynced.lock().insert(key.clone());
        trace_phase(operation, &key, SyncPhase::Done);
        Ok(None)
    }

    /// Remote first. A remote error or an undecodable remote document falls
    /// back to the local mirror and announces a stale read.
    async fn read_document<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        key: &StorageKey,
    ) -> Result<Option<T>> {
        let key = key.to_string();

        trace_phase(operation, &key, SyncPhase::RemoteAttempt);
        let failure = match self.remote_call(self.remote.get(&key)).await {
            Ok(Some(value)) => match serde_json::from_value::<T>(value.clone()) {
                Ok(document) => {
                    trace_phase(operation, &key, SyncPhase::RemoteSucceeded);
                    trace_phase(operation, &key, SyncPhase::LocalMirror);
                    if let Err(err) = self.local.set(&key, value).await {
                        warn!(
                            operation,
                            key = %key,
                            error = %err,
                            "failed to refresh local mirror"
                        );
                    }
                    self.unsynced.lock().remove(&key);
                    trace_phase(operation, &key, SyncPhase::Done);
                    return Ok(Some(document));
                }
                Err(err) => HuddleError::from(err),
            },
            Ok(None) => {
                trace_phase(operation, &key, SyncPhase::RemoteSucceeded);
                trace_phase(operation, &key, SyncPhase::LocalMirror);
                let pending = self.unsynced.lock().contains(&key);
                let document = if pending {
                    debug!(operation, key = %key, "serving document known only to this device");
                    self.read_local_document(&key).await?
                } else {
                    if let Err(err) = self.local.remove(&key).await {
                        warn!(operation, key = %key, error = %err, "failed to drop stale mirror");
                    }
                    None
                };
                trace_phase(operation, &key, SyncPhase::Done);
                return Ok(document);
            }
            Err(err) => err,
        };

        warn!(
            operation,
            key = %key,
            error = %failure,
            "remote read failed; serving local mirror"
        );
        trace_phase(operation, &key, SyncPhase::RemoteFailed);
        self.notices.publish(SyncNotice::StaleRead {
            operation: operation.to_string(),
            reason: failure.to_string(),
        });
        trace_phase(operation, &key, SyncPhase::LocalMirror);
        let document = self.read_local_document(&key).await?;
        trace_phase(operation, &key, SyncPhase::Done);
        Ok(document)
    }

    async fn read_local_document<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value = self.local.get(key).await?;
        Ok(value.map(serde_json::from_value).transpose()?)
    }

    async fn update_user_groups(
        &self,
        operation: &'static str,
        user_id: &str,
        local_only: bool,
        change: impl FnOnce(&mut Vec<GroupSummary>) -> bool,
    ) -> Result<Fallback> {
        let key = StorageKey::UserGroups(user_id.to_string());
        let current = if local_only {
            self.read_local_document(&key.to_string()).await?
        } else {
            self.read_document(operation, &key).await?
        };

        let mut groups: Vec<GroupSummary> = current.unwrap_or_default();
        if !change(&mut groups) {
            return Ok(None);
        }
        self.put(operation, &key, serde_json::to_value(&groups)?, local_only).await
    }

    /// Announce the outcome of a finished operation.
    fn settle(&self, operation: &'static str, fallback: Fallback) -> WriteOutcome {
        match fallback {
            None => {
                self.notices.publish(SyncNotice::Saved { operation: operation.to_string() });
                WriteOutcome::Synced
            }
            Some(err) => {
                self.notices.publish(SyncNotice::OfflineFallback {
                    operation: operation.to_string(),
                    reason: err.to_string(),
                });
                WriteOutcome::LocalOnly
            }
        }
    }
}

fn trace_phase(operation: &str, key: &str, phase: SyncPhase) {
    debug!(operation, key, %phase, "sync phase");
}

fn normalize_record(data: AvailabilityData) -> AvailabilityRecord {
    let stored = data.slots.len();
    let record = AvailabilityRecord::from_data(data);
    let dropped = stored.saturating_sub(record.slot_count());
    if dropped > 0 {
        warn!(
            group_id = %record.group_id(),
            user_id = %record.user_id(),
            dropped,
            "dropped invalid or duplicate slots from stored availability"
        );
    }
    record
}

fn add_summary(groups: &mut Vec<GroupSummary>, summary: GroupSummary) -> bool {
    if groups.iter().any(|existing| existing.id == summary.id) {
        return false;
    }
    groups.push(summary);
    true
}

fn remove_summary(groups: &mut Vec<GroupSummary>, group_id: &str) -> bool {
    let before = groups.len();
    groups.retain(|existing| existing.id != group_id);
    before != groups.len()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::storage::InMemoryDocumentStore;

    struct Offline;

    #[async_trait]
    impl DocumentStore for Offline {
        async fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(HuddleError::Network("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<()> {
            Err(HuddleError::Network("connection refused".into()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(HuddleError::Network("connection refused".into()))
        }
    }

    struct Hanging;

    #[async_trait]
    impl DocumentStore for Hanging {
        async fn get(&self, _key: &str) -> Result<Option<Value>> {
            std::future::pending().await
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<()> {
            std::future::pending().await
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            std::future::pending().await
        }
    }

    fn coordinator(
        remote: Arc<dyn DocumentStore>,
        local: InMemoryDocumentStore,
    ) -> DualWriteCoordinator {
        DualWriteCoordinator::new(
            remote,
            Arc::new(local),
            &SyncConfig::default(),
            NotificationChannel::default(),
        )
    }

    #[tokio::test]
    async fn offline_save_is_mirrored_and_announced() {
        let local = InMemoryDocumentStore::new();
        let coordinator = coordinator(Arc::new(Offline), local.clone());
        let mut notices = coordinator.notices().subscribe();

        let mut record = AvailabilityRecord::new("alice", "g1");
        record.set_slot("2024-03-04", 9, true).unwrap();

        let outcome = coordinator.save_availability(&record).await.unwrap();
        assert_eq!(outcome, WriteOutcome::LocalOnly);
        assert!(local.contains_key("availability/g1/alice"));
        assert!(matches!(notices.recv().await.unwrap(), SyncNotice::OfflineFallback { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_remote_times_out_into_local_write() {
        let local = InMemoryDocumentStore::new();
        let coordinator = coordinator(Arc::new(Hanging), local.clone());

        let group = Group::new("Hikers", "alice").unwrap();
        let outcome = coordinator.save_group(&group).await.unwrap();

        assert_eq!(outcome, WriteOutcome::LocalOnly);
        assert!(local.contains_key(&format!("groups/{}", group.id)));
    }

    #[tokio::test]
    async fn normalises_stored_availability_on_read() {
        let remote = InMemoryDocumentStore::new();
        remote
            .set(
                "availability/g1/bob",
                serde_json::json!({
                    "userId": "bob",
                    "groupId": "g1",
                    "updatedAt": "2024-03-01T12:00:00Z",
                    "slots": [
                        { "date": "2024-03-04", "hour": 9, "available": true },
                        { "date": "2024-03-04", "hour": 9, "available": false },
                        { "date": "2024-03-04", "hour": 24, "available": true },
                    ],
                }),
            )
            .await
            .unwrap();
        let coordinator = coordinator(Arc::new(remote), InMemoryDocumentStore::new());

        let record = coordinator.load_availability("g1", "bob").await.unwrap().unwrap();
        assert_eq!(record.slot_count(), 1);
        assert!(!record.get_slot("2024-03-04", 9));
    }

    #[tokio::test]
    async fn undecodable_remote_document_falls_back_to_mirror() {
        let remote = InMemoryDocumentStore::new();
        let local = InMemoryDocumentStore::new();
        let mut record = AvailabilityRecord::new("bob", "g1");
        record.set_slot("2024-03-04", 9, true).unwrap();
        local
            .set("availability/g1/bob", serde_json::to_value(record.to_data()).unwrap())
            .await
            .unwrap();
        remote
            .set(
                "availability/g1/bob",
                serde_json::json!({ "userId": "bob", "groupId": "g1", "slots": [] }),
            )
            .await
            .unwrap();

        let coordinator = coordinator(Arc::new(remote), local.clone());
        let mut notices = coordinator.notices().subscribe();

        let loaded = coordinator.load_availability("g1", "bob").await.unwrap().unwrap();
        assert!(loaded.get_slot("2024-03-04", 9));
        assert!(matches!(notices.recv().await.unwrap(), SyncNotice::StaleRead { .. }));

        let mut group = Group::new("Hikers", "bob").unwrap();
        group.id = "g1".into();
        let records = coordinator.load_group_availabilities(&group).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn summaries_are_unique_per_group() {
        let summary =
            GroupSummary { id: "g1".into(), name: "Hikers".into(), code: "ABC234".into() };
        let mut groups = Vec::new();

        assert!(add_summary(&mut groups, summary.clone()));
        assert!(!add_summary(&mut groups, summary));
        assert!(remove_summary(&mut groups, "g1"));
        assert!(!remove_summary(&mut groups, "g1"));
    }
}
