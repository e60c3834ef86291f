//! The sync coordinator: cooldown gate, scope locks and run bookkeeping.

use crate::clock::{Clock, SystemClock};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::installation::InstallationIdProvider;
use crate::pipeline::{EntitySync, PipelineContext, PipelineReport};
use crate::registry::SyncRegistry;
use liftsync_core::{SyncScope, Timestamp};
use liftsync_store::{KeyValueStore, SyncBookkeeping, SyncMetadataStore};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Source of the signed-in user.
pub trait UserIdentity: Send + Sync {
    /// Returns the signed-in user's id, or `None` when signed out.
    fn current_user_id(&self) -> Option<String>;
}

/// A [`UserIdentity`] the host updates on sign-in and sign-out.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user_id: RwLock<Option<String>>,
}

impl SessionIdentity {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sign-in.
    pub fn sign_in(&self, user_id: impl Into<String>) {
        *self.user_id.write() = Some(user_id.into());
    }

    /// Records a sign-out.
    pub fn sign_out(&self) {
        *self.user_id.write() = None;
    }
}

impl UserIdentity for SessionIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id
            .read()
            .as_ref()
            .filter(|id| !id.is_empty())
            .cloned()
    }
}

/// Which operation started a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// [`SyncCoordinator::sync_system_exercises`].
    System,
    /// [`SyncCoordinator::sync_user_data`].
    User,
    /// [`SyncCoordinator::sync_all`].
    All,
}

/// Why a run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The last full sync finished less than the cooldown ago.
    Cooldown {
        /// Time left until the next full sync is allowed.
        remaining: Duration,
    },
    /// A run holding one of the required locks is still going.
    InProgress,
}

/// How a run ended.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Every pipeline completed.
    Success,
    /// The run did not start.
    Skipped(SkipReason),
    /// A pipeline or the bookkeeping failed. Pipelines that completed
    /// earlier in the run keep their advanced bookmarks.
    Failed(SyncError),
}

impl SyncOutcome {
    /// Returns true for [`SyncOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success)
    }

    /// Returns the skip reason, if the run was skipped.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            SyncOutcome::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns the failure, if the run failed.
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// State of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No run has finished yet.
    Idle,
    /// At least one run is in progress.
    Running,
    /// The last run to finish succeeded.
    Success,
    /// The last run to finish was skipped.
    Skipped,
    /// The last run to finish failed.
    Failed,
}

/// Record of one coordinator run.
#[derive(Debug)]
pub struct SyncRun {
    /// Operation that started the run.
    pub trigger: SyncTrigger,
    /// Clock reading when the run started.
    pub started_at: Timestamp,
    /// Wall time spent.
    pub duration: Duration,
    /// Result.
    pub outcome: SyncOutcome,
    /// Reports of the pipelines that completed, in run order.
    pub reports: Vec<PipelineReport>,
}

impl SyncRun {
    /// The coordinator state this run ends in.
    pub fn state(&self) -> SyncState {
        match self.outcome {
            SyncOutcome::Success => SyncState::Success,
            SyncOutcome::Skipped(_) => SyncState::Skipped,
            SyncOutcome::Failed(_) => SyncState::Failed,
        }
    }

    /// Documents downloaded across all completed pipelines.
    pub fn downloaded(&self) -> usize {
        self.reports.iter().map(|report| report.downloaded).sum()
    }

    /// Records uploaded across all completed pipelines.
    pub fn uploaded(&self) -> usize {
        self.reports.iter().map(|report| report.uploaded).sum()
    }
}

/// Running totals over the coordinator's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Runs that succeeded.
    pub runs_succeeded: u64,
    /// Runs that were skipped.
    pub runs_skipped: u64,
    /// Runs that failed.
    pub runs_failed: u64,
    /// Documents downloaded.
    pub documents_downloaded: u64,
    /// Records uploaded.
    pub documents_uploaded: u64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
    /// Start time of the most recent successful run.
    pub last_success: Option<Timestamp>,
}

/// Runs the registered pipelines for the system and user scopes.
///
/// Top-level operations never return an error: every call yields a
/// [`SyncRun`] whose outcome is a success, a skip or a failure.
///
/// The system lock guards catalog pipelines and the user lock guards user
/// pipelines. Both are taken with `try_lock`, so a run that would have to
/// wait is skipped instead.
pub struct SyncCoordinator {
    registry: SyncRegistry,
    bookkeeping: SyncBookkeeping,
    installation: InstallationIdProvider,
    metadata: Arc<dyn SyncMetadataStore>,
    identity: Arc<dyn UserIdentity>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    system_lock: Mutex<()>,
    user_lock: Mutex<()>,
    state: RwLock<SyncState>,
    active: RwLock<usize>,
    stats: RwLock<SyncStats>,
}

impl SyncCoordinator {
    /// Creates a coordinator with the default configuration and the system
    /// clock.
    ///
    /// `prefs` holds the installation id and the last sync time.
    pub fn new(
        registry: SyncRegistry,
        prefs: Arc<dyn KeyValueStore>,
        metadata: Arc<dyn SyncMetadataStore>,
        identity: Arc<dyn UserIdentity>,
    ) -> Self {
        Self {
            registry,
            bookkeeping: SyncBookkeeping::new(prefs.clone()),
            installation: InstallationIdProvider::new(prefs),
            metadata,
            identity,
            clock: Arc::new(SystemClock),
            config: SyncConfig::default(),
            system_lock: Mutex::new(()),
            user_lock: Mutex::new(()),
            state: RwLock::new(SyncState::Idle),
            active: RwLock::new(0),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the pipeline registry.
    pub fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    /// Returns the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Returns a snapshot of the run counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns the time of the last successful full sync, or the epoch if
    /// there has been none.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the stored value cannot be read.
    pub fn last_sync_time(&self) -> SyncResult<Timestamp> {
        Ok(self.bookkeeping.last_sync_time()?)
    }

    /// Returns this installation's id.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the id cannot be read or persisted.
    pub fn installation_id(&self) -> SyncResult<String> {
        Ok(self.installation.get_id()?)
    }

    /// Synchronizes the catalog and then the user's data.
    ///
    /// Skipped if the last full sync finished within the cooldown window,
    /// or if either scope is already being synchronized. On success the
    /// current time becomes the new last sync time.
    pub async fn sync_all(&self, user_id: &str) -> SyncRun {
        let started_at = self.clock.now();
        let timer = Instant::now();

        if user_id.is_empty() {
            return self.skip_or_fail(
                SyncTrigger::All,
                started_at,
                timer,
                SyncOutcome::Failed(SyncError::NotSignedIn),
            );
        }

        match self.cooldown_remaining(started_at) {
            Ok(Some(remaining)) => {
                return self.skip_or_fail(
                    SyncTrigger::All,
                    started_at,
                    timer,
                    SyncOutcome::Skipped(SkipReason::Cooldown { remaining }),
                );
            }
            Ok(None) => {}
            Err(err) => {
                return self.skip_or_fail(SyncTrigger::All, started_at, timer, SyncOutcome::Failed(err));
            }
        }

        let (Ok(_system), Ok(_user)) = (self.system_lock.try_lock(), self.user_lock.try_lock())
        else {
            return self.skip_or_fail(
                SyncTrigger::All,
                started_at,
                timer,
                SyncOutcome::Skipped(SkipReason::InProgress),
            );
        };

        self.begin(SyncTrigger::All);
        let mut reports = Vec::new();
        let result = self
            .run_scopes(true, Some(&SyncScope::user(user_id)), &mut reports)
            .await;

        self.finish(SyncTrigger::All, started_at, timer, result, reports)
    }

    /// Synchronizes the catalog only.
    ///
    /// Holds the system lock. Does not consult or update the last sync
    /// time.
    pub async fn sync_system_exercises(&self) -> SyncRun {
        let started_at = self.clock.now();
        let timer = Instant::now();

        let Ok(_system) = self.system_lock.try_lock() else {
            return self.skip_or_fail(
                SyncTrigger::System,
                started_at,
                timer,
                SyncOutcome::Skipped(SkipReason::InProgress),
            );
        };

        self.begin(SyncTrigger::System);
        let mut reports = Vec::new();
        let result = self.run_scopes(true, None, &mut reports).await;

        self.finish(SyncTrigger::System, started_at, timer, result, reports)
    }

    /// Synchronizes the user's data only.
    ///
    /// Holds the user lock and ignores the cooldown. On success the current
    /// time becomes the new last sync time.
    pub async fn sync_user_data(&self, user_id: &str) -> SyncRun {
        let started_at = self.clock.now();
        let timer = Instant::now();

        if user_id.is_empty() {
            return self.skip_or_fail(
                SyncTrigger::User,
                started_at,
                timer,
                SyncOutcome::Failed(SyncError::NotSignedIn),
            );
        }

        let Ok(_user) = self.user_lock.try_lock() else {
            return self.skip_or_fail(
                SyncTrigger::User,
                started_at,
                timer,
                SyncOutcome::Skipped(SkipReason::InProgress),
            );
        };

        self.begin(SyncTrigger::User);
        let mut reports = Vec::new();
        let result = self
            .run_scopes(false, Some(&SyncScope::user(user_id)), &mut reports)
            .await;

        self.finish(SyncTrigger::User, started_at, timer, result, reports)
    }

    /// Runs [`sync_all`](Self::sync_all) for the signed-in user, or
    /// [`sync_system_exercises`](Self::sync_system_exercises) when signed
    /// out.
    pub async fn sync_current_user(&self) -> SyncRun {
        match self.identity.current_user_id() {
            Some(user_id) => self.sync_all(&user_id).await,
            None => {
                debug!("no signed-in user, syncing catalog only");
                self.sync_system_exercises().await
            }
        }
    }

    fn cooldown_remaining(&self, now: Timestamp) -> SyncResult<Option<Duration>> {
        let last = self.bookkeeping.last_sync_time()?;
        if last.is_epoch() {
            return Ok(None);
        }
        let elapsed = now.duration_since(last);
        if elapsed < self.config.cooldown {
            Ok(Some(self.config.cooldown - elapsed))
        } else {
            Ok(None)
        }
    }

    /// Runs the catalog pipelines if `system` is set, then the user
    /// pipelines for `user`. A completed user pass records the last sync
    /// time.
    async fn run_scopes(
        &self,
        system: bool,
        user: Option<&SyncScope>,
        reports: &mut Vec<PipelineReport>,
    ) -> SyncResult<()> {
        let installation_id = self.installation.get_id()?;
        if system {
            self.run_scope(&installation_id, &SyncScope::System, self.registry.system(), reports)
                .await?;
        }
        if let Some(scope) = user {
            self.run_scope(&installation_id, scope, self.registry.user(), reports)
                .await?;
            self.bookkeeping.set_last_sync_time(self.clock.now())?;
        }
        Ok(())
    }

    async fn run_scope(
        &self,
        installation_id: &str,
        scope: &SyncScope,
        pipelines: &[Arc<dyn EntitySync>],
        reports: &mut Vec<PipelineReport>,
    ) -> SyncResult<()> {
        let ctx = PipelineContext {
            installation_id,
            scope,
            metadata: self.metadata.as_ref(),
            request_timeout: self.config.request_timeout,
            upload_batch_size: self.config.upload_batch_size,
        };
        for pipeline in pipelines {
            match pipeline.run(&ctx).await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!(
                        entity = %pipeline.entity_type(),
                        scope = %scope,
                        error = %err,
                        retryable = err.is_retryable(),
                        "pipeline failed"
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn begin(&self, trigger: SyncTrigger) {
        *self.active.write() += 1;
        *self.state.write() = SyncState::Running;
        debug!(?trigger, "sync started");
    }

    fn finish(
        &self,
        trigger: SyncTrigger,
        started_at: Timestamp,
        timer: Instant,
        result: SyncResult<()>,
        reports: Vec<PipelineReport>,
    ) -> SyncRun {
        let outcome = match result {
            Ok(()) => SyncOutcome::Success,
            Err(err) => SyncOutcome::Failed(err),
        };
        let run = SyncRun {
            trigger,
            started_at,
            duration: timer.elapsed(),
            outcome,
            reports,
        };

        {
            let mut active = self.active.write();
            *active = active.saturating_sub(1);
            if *active == 0 {
                *self.state.write() = run.state();
            }
        }
        self.record(&run);
        run
    }

    /// Ends a run that never took a lock.
    fn skip_or_fail(
        &self,
        trigger: SyncTrigger,
        started_at: Timestamp,
        timer: Instant,
        outcome: SyncOutcome,
    ) -> SyncRun {
        let run = SyncRun {
            trigger,
            started_at,
            duration: timer.elapsed(),
            outcome,
            reports: Vec::new(),
        };
        {
            let active = self.active.read();
            if *active == 0 {
                *self.state.write() = run.state();
            }
        }
        self.record(&run);
        run
    }

    fn record(&self, run: &SyncRun) {
        let mut stats = self.stats.write();
        stats.documents_downloaded += run.downloaded() as u64;
        stats.documents_uploaded += run.uploaded() as u64;
        match &run.outcome {
            SyncOutcome::Success => {
                stats.runs_succeeded += 1;
                stats.last_success = Some(run.started_at);
                info!(
                    trigger = ?run.trigger,
                    downloaded = run.downloaded(),
                    uploaded = run.uploaded(),
                    duration_ms = run.duration.as_millis() as u64,
                    "sync succeeded"
                );
            }
            SyncOutcome::Skipped(reason) => {
                stats.runs_skipped += 1;
                info!(trigger = ?run.trigger, ?reason, "sync skipped");
            }
            SyncOutcome::Failed(err) => {
                stats.runs_failed += 1;
                stats.last_error = Some(err.to_string());
                warn!(trigger = ?run.trigger, error = %err, "sync failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::pipeline::PipelineReport;
    use async_trait::async_trait;
    use liftsync_core::EntityType;
    use liftsync_store::{MemoryKeyValueStore, MemoryMetadataStore, MetadataKey};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Bumps its bookmark to the clock and optionally fails.
    struct Probe {
        entity_type: EntityType,
        clock: Arc<ManualClock>,
        runs: AtomicUsize,
        fail: bool,
    }

    impl Probe {
        fn new(entity_type: EntityType, clock: &Arc<ManualClock>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                entity_type,
                clock: clock.clone(),
                runs: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl EntitySync for Probe {
        fn entity_type(&self) -> EntityType {
            self.entity_type
        }

        fn dependencies(&self) -> Vec<EntityType> {
            Vec::new()
        }

        async fn run(&self, ctx: &PipelineContext<'_>) -> SyncResult<PipelineReport> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SyncError::transport_retryable("unavailable"));
            }
            let key = MetadataKey::new(ctx.installation_id, self.entity_type, ctx.scope.scope_id());
            let stored = ctx.metadata.advance(&key, self.clock.now()).await?;
            Ok(PipelineReport {
                entity_type: self.entity_type,
                first_sync: false,
                downloaded: 1,
                uploaded: 0,
                bookmark: stored.last_sync,
            })
        }
    }

    struct Fixture {
        coordinator: SyncCoordinator,
        clock: Arc<ManualClock>,
        catalog: Arc<Probe>,
        workouts: Arc<Probe>,
        identity: Arc<SessionIdentity>,
    }

    fn fixture(fail_workouts: bool) -> Fixture {
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(1_000_000)));
        let catalog = Probe::new(EntityType::Exercise, &clock, false);
        let workouts = Probe::new(EntityType::Workout, &clock, fail_workouts);
        let registry = SyncRegistry::builder()
            .register_arc(catalog.clone())
            .register_arc(workouts.clone())
            .build()
            .unwrap();
        let identity = Arc::new(SessionIdentity::new());
        let coordinator = SyncCoordinator::new(
            registry,
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryMetadataStore::new()),
            identity.clone(),
        )
        .with_clock(clock.clone());
        Fixture {
            coordinator,
            clock,
            catalog,
            workouts,
            identity,
        }
    }

    #[tokio::test]
    async fn full_sync_records_last_sync_time() {
        let f = fixture(false);
        assert_eq!(f.coordinator.state(), SyncState::Idle);
        assert_eq!(f.coordinator.last_sync_time().unwrap(), Timestamp::EPOCH);

        let run = f.coordinator.sync_all("user-1").await;
        assert!(run.outcome.is_success());
        assert_eq!(run.reports.len(), 2);
        assert_eq!(f.coordinator.state(), SyncState::Success);
        assert_eq!(
            f.coordinator.last_sync_time().unwrap(),
            Timestamp::from_millis(1_000_000)
        );
    }

    #[tokio::test]
    async fn cooldown_reports_remaining_time() {
        let f = fixture(false);
        assert!(f.coordinator.sync_all("user-1").await.outcome.is_success());

        f.clock.advance(Duration::from_secs(60));
        let run = f.coordinator.sync_all("user-1").await;
        assert_eq!(
            run.outcome.skip_reason(),
            Some(SkipReason::Cooldown {
                remaining: Duration::from_secs(240)
            })
        );
        assert_eq!(f.coordinator.state(), SyncState::Skipped);
        assert_eq!(f.catalog.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_keeps_last_sync_time() {
        let f = fixture(true);
        let run = f.coordinator.sync_all("user-1").await;

        assert!(matches!(
            run.outcome.error(),
            Some(SyncError::Transport { retryable: true, .. })
        ));
        assert_eq!(run.reports.len(), 1);
        assert_eq!(run.reports[0].entity_type, EntityType::Exercise);
        assert_eq!(f.coordinator.state(), SyncState::Failed);
        assert_eq!(f.coordinator.last_sync_time().unwrap(), Timestamp::EPOCH);

        let stats = f.coordinator.stats();
        assert_eq!(stats.runs_failed, 1);
        assert_eq!(stats.documents_downloaded, 1);
        assert!(stats.last_error.is_some());
    }

    #[tokio::test]
    async fn system_sync_ignores_cooldown_and_last_sync_time() {
        let f = fixture(false);
        assert!(f.coordinator.sync_all("user-1").await.outcome.is_success());
        let last = f.coordinator.last_sync_time().unwrap();

        f.clock.advance(Duration::from_secs(1));
        let run = f.coordinator.sync_system_exercises().await;
        assert!(run.outcome.is_success());
        assert_eq!(run.trigger, SyncTrigger::System);
        assert_eq!(f.coordinator.last_sync_time().unwrap(), last);
        assert_eq!(f.catalog.runs.load(Ordering::SeqCst), 2);
        assert_eq!(f.workouts.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn user_sync_ignores_cooldown() {
        let f = fixture(false);
        assert!(f.coordinator.sync_all("user-1").await.outcome.is_success());

        f.clock.advance(Duration::from_secs(10));
        let run = f.coordinator.sync_user_data("user-1").await;
        assert!(run.outcome.is_success());
        assert_eq!(
            f.coordinator.last_sync_time().unwrap(),
            Timestamp::from_millis(1_010_000)
        );
        assert_eq!(f.catalog.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_user_id_is_not_signed_in() {
        let f = fixture(false);
        let run = f.coordinator.sync_all("").await;
        assert!(matches!(run.outcome.error(), Some(SyncError::NotSignedIn)));
        assert_eq!(f.catalog.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn current_user_selects_operation() {
        let f = fixture(false);
        let run = f.coordinator.sync_current_user().await;
        assert_eq!(run.trigger, SyncTrigger::System);
        assert_eq!(f.workouts.runs.load(Ordering::SeqCst), 0);

        f.identity.sign_in("user-1");
        let run = f.coordinator.sync_current_user().await;
        assert_eq!(run.trigger, SyncTrigger::All);
        assert_eq!(f.workouts.runs.load(Ordering::SeqCst), 1);

        f.identity.sign_out();
        assert_eq!(f.identity.current_user_id(), None);
    }

    #[tokio::test]
    async fn stats_count_outcomes() {
        let f = fixture(false);
        f.coordinator.sync_all("user-1").await;
        f.coordinator.sync_all("user-1").await;

        let stats = f.coordinator.stats();
        assert_eq!(stats.runs_succeeded, 1);
        assert_eq!(stats.runs_skipped, 1);
        assert_eq!(stats.runs_failed, 0);
        assert_eq!(stats.documents_downloaded, 2);
        assert_eq!(stats.last_success, Some(Timestamp::from_millis(1_000_000)));
    }
}
