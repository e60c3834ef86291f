//! Coordinator behavior end to end, over the in-memory backend.

use liftsync_core::{EntityType, SyncScope, Timestamp};
use liftsync_engine::{
    InjectedFailure, ManualClock, MemoryRemoteStore, RemoteStore, SessionIdentity, SkipReason,
    SyncConfig, SyncCoordinator, SyncError, SyncRegistry, SyncState,
};
use liftsync_convert::WorkoutConverter;
use liftsync_store::{
    FileKeyValueStore, FileMetadataStore, LocalCollection, MemoryDatabase, MetadataKey,
    SyncMetadataStore,
};
use liftsync_testkit::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const LATENCY: Duration = Duration::from_millis(40);

fn catalog() -> Vec<liftsync_core::records::ExerciseRecord> {
    vec![
        catalog_exercise("squat", "Back Squat", WORLD_START),
        catalog_exercise("bench", "Bench Press", WORLD_START),
    ]
}

async fn bookmark(device: &Device, entity_type: EntityType, scope: &SyncScope) -> Option<Timestamp> {
    let key = MetadataKey::new(
        device.coordinator.installation_id().unwrap(),
        entity_type,
        scope.scope_id(),
    );
    device
        .metadata
        .get(&key)
        .await
        .unwrap()
        .map(|metadata| metadata.last_sync)
}

#[tokio::test]
async fn cooldown_gates_full_syncs() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    let device = world.device();

    assert!(device.coordinator.sync_all("alice").await.outcome.is_success());
    assert_eq!(device.coordinator.last_sync_time().unwrap(), WORLD_START);

    let run = device.coordinator.sync_all("alice").await;
    assert_eq!(
        run.outcome.skip_reason(),
        Some(SkipReason::Cooldown {
            remaining: Duration::from_secs(300)
        })
    );

    world.advance(Duration::from_secs(2 * 60));
    let run = device.coordinator.sync_all("alice").await;
    assert_eq!(
        run.outcome.skip_reason(),
        Some(SkipReason::Cooldown {
            remaining: Duration::from_secs(180)
        })
    );

    world.advance(Duration::from_secs(4 * 60));
    let run = device.coordinator.sync_all("alice").await;
    assert!(run.outcome.is_success());
    assert_eq!(
        device.coordinator.last_sync_time().unwrap(),
        WORLD_START.saturating_add(Duration::from_secs(6 * 60))
    );
}

#[tokio::test]
async fn concurrent_full_syncs_run_once() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    world.remote.set_collection_latency("exercises", LATENCY);
    let device = world.device();

    let (first, second) = tokio::join!(
        device.coordinator.sync_all("alice"),
        device.coordinator.sync_all("alice")
    );

    assert!(first.outcome.is_success());
    assert_eq!(second.outcome.skip_reason(), Some(SkipReason::InProgress));
    assert_eq!(device.coordinator.state(), SyncState::Success);
    assert_eq!(device.local.exercises.len().await.unwrap(), 2);

    let stats = device.coordinator.stats();
    assert_eq!(stats.runs_succeeded, 1);
    assert_eq!(stats.runs_skipped, 1);
}

#[tokio::test]
async fn system_and_user_syncs_run_side_by_side() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    world.remote.set_collection_latency("exercises", LATENCY);
    world.remote.set_collection_latency("workouts", LATENCY);
    let device = world.device();

    let (system, user) = tokio::join!(
        device.coordinator.sync_system_exercises(),
        device.coordinator.sync_user_data("alice")
    );
    assert!(system.outcome.is_success());
    assert!(user.outcome.is_success());

    let (first, second) = tokio::join!(
        device.coordinator.sync_system_exercises(),
        device.coordinator.sync_system_exercises()
    );
    assert!(first.outcome.is_success());
    assert_eq!(second.outcome.skip_reason(), Some(SkipReason::InProgress));
}

#[tokio::test]
async fn full_sync_excludes_user_sync() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    world.remote.set_collection_latency("exercises", LATENCY);
    let device = world.device();

    let (full, user) = tokio::join!(
        device.coordinator.sync_all("alice"),
        device.coordinator.sync_user_data("alice")
    );
    assert!(full.outcome.is_success());
    assert_eq!(user.outcome.skip_reason(), Some(SkipReason::InProgress));
}

#[tokio::test]
async fn failed_run_keeps_completed_bookmarks() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    world.remote.fail_collection("set_logs", InjectedFailure::unavailable());
    let device = world.device();
    let alice = SyncScope::user("alice");

    device.local.exercises.upsert(catalog()).await.unwrap();
    device.local.workouts.upsert(vec![workout("w1", world.now())]).await.unwrap();
    device
        .local
        .exercise_logs
        .upsert(vec![exercise_log("l1", "w1", "squat", world.now())])
        .await
        .unwrap();
    device
        .local
        .set_logs
        .upsert(vec![set_log("s1", "l1", 1, world.now())])
        .await
        .unwrap();

    let run = device.coordinator.sync_all("alice").await;
    let Some(err) = run.outcome.error() else {
        panic!("expected a failure, got {:?}", run.outcome);
    };
    assert!(err.is_retryable());
    assert_eq!(device.coordinator.state(), SyncState::Failed);
    assert_eq!(device.coordinator.last_sync_time().unwrap(), Timestamp::EPOCH);

    assert!(bookmark(&device, EntityType::Exercise, &SyncScope::System).await.is_some());
    assert_eq!(bookmark(&device, EntityType::Workout, &alice).await, Some(world.now()));
    assert!(bookmark(&device, EntityType::ExerciseLog, &alice).await.is_some());
    assert_eq!(bookmark(&device, EntityType::SetLog, &alice).await, None);
    assert_eq!(bookmark(&device, EntityType::PersonalRecord, &alice).await, None);
    assert_eq!(world.remote.count("workouts", &alice), 1);

    world.remote.clear_failures();
    world.advance(Duration::from_secs(1));
    let run = device.coordinator.sync_all("alice").await;
    assert!(run.outcome.is_success(), "{:?}", run.outcome);
    assert_eq!(run.uploaded(), 1);
    assert_eq!(world.remote.count("set_logs", &alice), 1);
}

#[tokio::test]
async fn bookmarks_never_move_backwards() {
    let world = SyncWorld::new();
    let device = world.device();
    let alice = SyncScope::user("alice");

    assert!(device.coordinator.sync_user_data("alice").await.outcome.is_success());
    assert_eq!(bookmark(&device, EntityType::Workout, &alice).await, Some(WORLD_START));

    world.clock.set(Timestamp::from_millis(WORLD_START.as_millis() - 3_600_000));
    assert!(device.coordinator.sync_user_data("alice").await.outcome.is_success());
    assert_eq!(bookmark(&device, EntityType::Workout, &alice).await, Some(WORLD_START));

    let later = WORLD_START.saturating_add(Duration::from_secs(10));
    world.remote.insert(
        "workouts",
        &alice,
        remote_record(&WorkoutConverter, &workout("remote-w", later)),
    );
    let run = device.coordinator.sync_user_data("alice").await;
    assert_eq!(run.downloaded(), 1);
    assert_eq!(bookmark(&device, EntityType::Workout, &alice).await, Some(later));
}

#[tokio::test]
async fn first_catalog_sync_downloads_everything() {
    let world = SyncWorld::new();
    seed_catalog(
        &world.remote,
        &[catalog_exercise("deadlift", "Deadlift", Timestamp::EPOCH)],
    );
    let device = world.device();

    let run = device.coordinator.sync_system_exercises().await;
    assert!(run.outcome.is_success());
    assert!(run.reports[0].first_sync);
    assert!(device.db.contains("exercises", "deadlift"));

    seed_catalog(&world.remote, &[catalog_exercise("row", "Barbell Row", Timestamp::EPOCH)]);
    let run = device.coordinator.sync_system_exercises().await;
    assert!(!run.reports[0].first_sync);
    assert_eq!(run.downloaded(), 0);
    assert_eq!(device.coordinator.last_sync_time().unwrap(), Timestamp::EPOCH);
}

#[tokio::test]
async fn uploads_are_batched() {
    let world = SyncWorld::new().with_config(SyncConfig::new().with_upload_batch_size(2));
    let device = world.device();
    let workouts = (0..5)
        .map(|n| workout(&format!("w{n}"), world.now()))
        .collect();
    device.local.workouts.upsert(workouts).await.unwrap();

    let run = device.coordinator.sync_user_data("alice").await;
    assert!(run.outcome.is_success());
    assert_eq!(run.uploaded(), 5);
    assert_eq!(world.remote.upload_calls(), 3);
    assert_eq!(world.remote.count("workouts", &SyncScope::user("alice")), 5);
}

#[tokio::test]
async fn dependents_download_after_their_parents() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    let source = world.device();
    source.coordinator.sync_system_exercises().await;
    source.local.workouts.upsert(vec![workout("w1", world.now())]).await.unwrap();
    source
        .local
        .exercise_logs
        .upsert(vec![exercise_log("l1", "w1", "bench", world.now())])
        .await
        .unwrap();
    source
        .local
        .set_logs
        .upsert(vec![set_log("s1", "l1", 1, world.now())])
        .await
        .unwrap();
    assert!(source.coordinator.sync_user_data("alice").await.outcome.is_success());

    let target = world.device();
    let run = target.coordinator.sync_all("alice").await;
    assert!(run.outcome.is_success(), "{:?}", run.outcome);

    let order: Vec<EntityType> = run.reports.iter().map(|report| report.entity_type).collect();
    let position = |entity_type| order.iter().position(|t| *t == entity_type).unwrap();
    assert!(position(EntityType::Exercise) < position(EntityType::ExerciseLog));
    assert!(position(EntityType::Workout) < position(EntityType::ExerciseLog));
    assert!(position(EntityType::ExerciseLog) < position(EntityType::SetLog));
    assert!(target.db.contains("set_logs", "s1"));
}

#[tokio::test]
async fn slow_remote_calls_time_out() {
    let world =
        SyncWorld::new().with_config(SyncConfig::new().with_request_timeout(Duration::from_millis(20)));
    world.remote.set_collection_latency("workouts", Duration::from_millis(500));
    let device = world.device();

    let run = device.coordinator.sync_user_data("alice").await;
    assert!(matches!(run.outcome.error(), Some(SyncError::Timeout)));
    assert!(run.outcome.error().is_some_and(SyncError::is_retryable));
    assert_eq!(device.coordinator.last_sync_time().unwrap(), Timestamp::EPOCH);
}

#[tokio::test]
async fn fatal_remote_errors_are_not_retryable() {
    let world = SyncWorld::new();
    world
        .remote
        .fail_collection("user_profiles", InjectedFailure::permission_denied());
    let device = world.device();

    let run = device.coordinator.sync_user_data("alice").await;
    let err = run.outcome.error().unwrap();
    assert!(!err.is_retryable());
    assert_eq!(
        device.coordinator.stats().last_error.as_deref(),
        Some("transport error: permission denied")
    );
}

#[tokio::test]
async fn file_backed_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("prefs.json");
    let metadata_path = dir.path().join("sync_metadata.json");
    let clock = Arc::new(ManualClock::new(WORLD_START));
    let remote = Arc::new(MemoryRemoteStore::with_clock(clock.clone()));
    seed_catalog(&remote, &catalog());

    let open = || {
        let db = MemoryDatabase::new();
        let store: Arc<dyn RemoteStore> = remote.clone();
        let registry = SyncRegistry::standard(store, &db.collections()).unwrap();
        let coordinator = SyncCoordinator::new(
            registry,
            Arc::new(FileKeyValueStore::open(&prefs_path).unwrap()),
            Arc::new(FileMetadataStore::open(&metadata_path).unwrap()),
            Arc::new(SessionIdentity::new()),
        )
        .with_clock(clock.clone());
        (db, coordinator)
    };

    let (_db, first) = open();
    assert!(first.sync_all("alice").await.outcome.is_success());
    let installation_id = first.installation_id().unwrap();
    drop(first);

    let (_db, second) = open();
    assert_eq!(second.installation_id().unwrap(), installation_id);
    assert_eq!(second.last_sync_time().unwrap(), WORLD_START);
    assert!(second.sync_all("alice").await.outcome.skip_reason().is_some());

    let run = second.sync_system_exercises().await;
    assert!(run.outcome.is_success());
    assert!(!run.reports[0].first_sync);
}

#[tokio::test]
async fn signed_out_sync_only_touches_the_catalog() {
    let world = SyncWorld::new();
    seed_catalog(&world.remote, &catalog());
    let device = world.device();

    let run = device.coordinator.sync_current_user().await;
    assert!(run.outcome.is_success());
    assert_eq!(run.reports.len(), 1);

    device.identity.sign_in("alice");
    let run = device.coordinator.sync_current_user().await;
    assert!(run.outcome.is_success());
    assert_eq!(run.reports.len(), EntityType::ALL.len());
}
