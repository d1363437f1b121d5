//! Dual-write coordinator behaviour against scripted remote/local stores.

mod support;

use huddle_core::DocumentStore;
use huddle_domain::{AvailabilityRecord, HuddleError, SyncNotice, WriteOutcome};
use serde_json::json;
use support::Harness;

const MON: &str = "2024-03-04";

fn alice_record() -> AvailabilityRecord {
    let mut record = AvailabilityRecord::new("alice", "g1");
    record.set_slot(MON, 9, true).unwrap();
    record.set_slot(MON, 10, true).unwrap();
    record
}

#[tokio::test]
async fn online_save_writes_both_stores() {
    let harness = Harness::new();
    let mut notices = harness.coordinator.notices().subscribe();

    let outcome = harness.coordinator.save_availability(&alice_record()).await.unwrap();

    assert_eq!(outcome, WriteOutcome::Synced);
    assert!(harness.remote.documents().contains_key("availability/g1/alice"));
    assert!(harness.local.documents().contains_key("availability/g1/alice"));
    assert_eq!(
        notices.recv().await.unwrap(),
        SyncNotice::Saved { operation: "save_availability".into() }
    );
}

#[tokio::test]
async fn read_falls_back_to_local_mirror_when_remote_fails() {
    let harness = Harness::new();
    let record = alice_record();
    harness.coordinator.save_availability(&record).await.unwrap();

    harness.remote.fail_with(HuddleError::Network("offline".into()));
    let mut notices = harness.coordinator.notices().subscribe();

    let loaded = harness.coordinator.load_availability("g1", "alice").await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert!(matches!(notices.recv().await.unwrap(), SyncNotice::StaleRead { .. }));
}

#[tokio::test]
async fn remote_read_refreshes_local_mirror() {
    let harness = Harness::new();
    let record = alice_record();
    harness
        .remote
        .documents()
        .set("availability/g1/alice", serde_json::to_value(record.to_data()).unwrap())
        .await
        .unwrap();

    harness.coordinator.load_availability("g1", "alice").await.unwrap();

    assert!(harness.local.documents().contains_key("availability/g1/alice"));
}

#[tokio::test]
async fn local_failure_after_remote_failure_is_reported() {
    let harness = Harness::new();
    harness.remote.fail_with(HuddleError::Timeout("slow".into()));
    harness.local.fail_with(HuddleError::Storage("disk full".into()));

    let err = harness.coordinator.save_availability(&alice_record()).await.unwrap_err();
    assert_eq!(err, HuddleError::Storage("disk full".into()));
}

#[tokio::test]
async fn local_failure_after_remote_success_still_counts_as_synced() {
    let harness = Harness::new();
    harness.local.fail_with(HuddleError::Storage("disk full".into()));

    let outcome = harness.coordinator.save_availability(&alice_record()).await.unwrap();
    assert_eq!(outcome, WriteOutcome::Synced);
}

#[tokio::test]
async fn resaving_same_record_converges() {
    let harness = Harness::new();
    let record = alice_record();

    harness.coordinator.save_availability(&record).await.unwrap();
    let first = harness.remote.documents().get("availability/g1/alice").await.unwrap();
    harness.coordinator.save_availability(&record).await.unwrap();
    let second = harness.remote.documents().get("availability/g1/alice").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.remote.documents().len(), 1);
    assert_eq!(harness.local.documents().len(), 1);
}

#[tokio::test]
async fn duplicate_group_name_creates_nothing_locally() {
    let harness = Harness::new();
    harness
        .remote
        .documents()
        .set("group_names/book club", json!("existing-group"))
        .await
        .unwrap();

    let err = harness.coordinator.create_group("  Book   Club ", "alice").await.unwrap_err();

    assert_eq!(err, HuddleError::DuplicateGroupName("Book   Club".into()));
    assert!(harness.local.documents().is_empty());
    assert_eq!(harness.remote.writes(), 0);
    assert_eq!(harness.remote.documents().len(), 1);
}

#[tokio::test]
async fn name_conflict_on_reservation_write_creates_nothing() {
    let harness = Harness::new();
    harness.remote.reject_writes_under(
        "group_names/",
        HuddleError::DuplicateGroupName("Book Club".into()),
    );

    let err = harness.coordinator.create_group("Book Club", "alice").await.unwrap_err();

    assert!(matches!(err, HuddleError::DuplicateGroupName(_)));
    assert!(harness.local.documents().is_empty());
    assert!(harness.remote.documents().is_empty());
}

#[tokio::test]
async fn unreachable_remote_creates_group_on_device_only() {
    let harness = Harness::new();
    harness.remote.fail_with(HuddleError::Network("offline".into()));
    let mut notices = harness.coordinator.notices().subscribe();

    let group = harness.coordinator.create_group("Climbing", "alice").await.unwrap();

    let local = harness.local.documents();
    assert!(local.contains_key(&format!("groups/{}", group.id)));
    assert!(local.contains_key(&format!("group_codes/{}", group.code)));
    assert!(local.contains_key("group_names/climbing"));
    assert!(local.contains_key(&format!("availability/{}/alice", group.id)));
    assert!(local.contains_key("user_groups/alice"));
    assert_eq!(harness.remote.writes(), 0);
    assert!(matches!(
        notices.recv().await.unwrap(),
        SyncNotice::OfflineFallback { operation, .. } if operation == "create_group"
    ));
}

#[tokio::test]
async fn local_only_documents_stay_visible_after_remote_recovers() {
    let harness = Harness::new();
    harness.remote.fail_with(HuddleError::Network("offline".into()));
    let group = harness.coordinator.create_group("Climbing", "alice").await.unwrap();

    harness.remote.recover();

    let loaded = harness.coordinator.load_group(&group.id).await.unwrap();
    assert_eq!(loaded, Some(group.clone()));
    let groups = harness.coordinator.load_user_groups("alice").await.unwrap();
    assert_eq!(groups, vec![group.summary()]);
}

#[tokio::test]
async fn join_and_leave_maintain_membership_and_indexes() {
    let harness = Harness::new();
    let created = harness.coordinator.create_group("Climbing", "alice").await.unwrap();

    let joined = harness
        .coordinator
        .join_group(&created.code.to_lowercase(), "bob")
        .await
        .unwrap();
    assert_eq!(joined.member_ids, vec!["alice", "bob"]);
    assert_eq!(
        harness.coordinator.load_user_groups("bob").await.unwrap(),
        vec![created.summary()]
    );
    assert!(harness
        .coordinator
        .load_availability(&created.id, "bob")
        .await
        .unwrap()
        .is_some());

    let outcome = harness.coordinator.leave_group(&created.id, "bob").await.unwrap();
    assert_eq!(outcome, WriteOutcome::Synced);

    let group = harness.coordinator.load_group(&created.id).await.unwrap().unwrap();
    assert_eq!(group.member_ids, vec!["alice"]);
    assert!(harness.coordinator.load_user_groups("bob").await.unwrap().is_empty());
    let bob_key = format!("availability/{}/bob", created.id);
    assert!(!harness.remote.documents().contains_key(&bob_key));
}

#[tokio::test]
async fn joining_twice_keeps_existing_availability() {
    let harness = Harness::new();
    let created = harness.coordinator.create_group("Climbing", "alice").await.unwrap();
    harness.coordinator.join_group(&created.code, "bob").await.unwrap();

    let mut record = AvailabilityRecord::new("bob", created.id.as_str());
    record.set_slot(MON, 18, true).unwrap();
    harness.coordinator.save_availability(&record).await.unwrap();

    let again = harness.coordinator.join_group(&created.code, "bob").await.unwrap();
    assert_eq!(again.member_ids.len(), 2);
    let stored = harness.coordinator.load_availability(&created.id, "bob").await.unwrap().unwrap();
    assert!(stored.get_slot(MON, 18));
}

#[tokio::test]
async fn unknown_invite_code_is_not_found() {
    let harness = Harness::new();

    let err = harness.coordinator.join_group("ZZZZZZ", "bob").await.unwrap_err();
    assert!(matches!(err, HuddleError::NotFound(_)));

    let err = harness.coordinator.join_group("bad", "bob").await.unwrap_err();
    assert!(matches!(err, HuddleError::InvalidInput(_)));
}

#[tokio::test]
async fn group_availabilities_skip_members_without_records() {
    let harness = Harness::new();
    let mut group = harness.coordinator.create_group("Climbing", "alice").await.unwrap();
    group.add_member("carol");

    let records = harness.coordinator.load_group_availabilities(&group).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id(), "alice");
}

#[tokio::test]
async fn chat_messages_accumulate_per_date() {
    let harness = Harness::new();

    let first = harness.coordinator.send_chat_message("g1", MON, "alice", "pizza?").await.unwrap();
    let second = harness.coordinator.send_chat_message("g1", MON, "bob", " sure ").await.unwrap();
    assert_eq!(second.body, "sure");

    let thread = harness.coordinator.load_chat_messages("g1", MON).await.unwrap();
    assert_eq!(thread, vec![first, second]);
    assert!(harness.coordinator.load_chat_messages("g1", "2024-03-05").await.unwrap().is_empty());

    let err = harness.coordinator.send_chat_message("g1", MON, "bob", "   ").await.unwrap_err();
    assert!(matches!(err, HuddleError::InvalidInput(_)));
}

#[tokio::test]
async fn delete_availability_removes_both_copies() {
    let harness = Harness::new();
    harness.coordinator.save_availability(&alice_record()).await.unwrap();

    let outcome = harness.coordinator.delete_availability("g1", "alice").await.unwrap();

    assert_eq!(outcome, WriteOutcome::Synced);
    assert!(harness.remote.documents().is_empty());
    assert!(harness.local.documents().is_empty());
}

#[tokio::test]
async fn record_deleted_remotely_is_dropped_from_mirror() {
    let harness = Harness::new();
    harness.coordinator.save_availability(&alice_record()).await.unwrap();
    harness.remote.documents().remove("availability/g1/alice").await.unwrap();

    let loaded = harness.coordinator.load_availability("g1", "alice").await.unwrap();

    assert_eq!(loaded, None);
    assert!(!harness.local.documents().contains_key("availability/g1/alice"));
}

#[tokio::test]
async fn rejoining_after_leaving_elsewhere_starts_fresh() {
    let harness = Harness::new();
    let created = harness.coordinator.create_group("Climbing", "alice").await.unwrap();
    harness.coordinator.join_group(&created.code, "bob").await.unwrap();
    let mut record = AvailabilityRecord::new("bob", created.id.as_str());
    record.set_slot(MON, 18, true).unwrap();
    harness.coordinator.save_availability(&record).await.unwrap();

    harness.other_device().leave_group(&created.id, "bob").await.unwrap();
    let bob_key = format!("availability/{}/bob", created.id);
    assert!(harness.local.documents().contains_key(&bob_key));

    let rejoined = harness.coordinator.join_group(&created.code, "bob").await.unwrap();

    assert_eq!(rejoined.member_ids, vec!["alice", "bob"]);
    assert!(harness.remote.documents().contains_key(&bob_key));
    let stored = harness.coordinator.load_availability(&created.id, "bob").await.unwrap().unwrap();
    assert!(stored.is_empty());
}
