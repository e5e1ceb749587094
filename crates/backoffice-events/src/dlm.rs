//! Date-last-modified polling.
//!
//! Some entity types are not covered by the subscription feed. For those,
//! a [`DateLastModifiedService`] asks which entities changed since the last
//! poll and replays each one through the dispatcher as an `UPDATED` event.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

use backoffice_models::{EntityType, SubscriptionEvent};
use backoffice_persistence::ModifiedEntitySource;

use crate::dispatcher::EventDispatcher;
use crate::error::{Result, WorkflowError};

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSummary {
    pub entity: EntityType,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub dispatched: usize,
    pub failed: usize,
}

/// Polls one entity type for modifications after a watermark.
pub struct DateLastModifiedService {
    entity: EntityType,
    source: Arc<dyn ModifiedEntitySource>,
    dispatcher: Arc<EventDispatcher>,
    watermark: Mutex<DateTime<Utc>>,
}

impl DateLastModifiedService {
    /// Creates a service whose first poll covers changes after `since`.
    pub fn new(
        entity: EntityType,
        source: Arc<dyn ModifiedEntitySource>,
        dispatcher: Arc<EventDispatcher>,
        since: DateTime<Utc>,
    ) -> Self {
        Self {
            entity,
            source,
            dispatcher,
            watermark: Mutex::new(since),
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn watermark(&self) -> Result<DateTime<Utc>> {
        self.watermark
            .lock()
            .map(|w| *w)
            .map_err(|e| WorkflowError::LockPoisoned(e.to_string()))
    }

    pub fn poll(&self) -> Result<PollSummary> {
        self.poll_at(Utc::now())
    }

    /// Dispatches an `UPDATED` event for every entity modified in
    /// `(watermark, now]`.
    ///
    /// The watermark moves to `now` once the modification query succeeds.
    /// Pipeline failures for single entities are counted, not retried.
    pub fn poll_at(&self, now: DateTime<Utc>) -> Result<PollSummary> {
        let mut watermark = self
            .watermark
            .lock()
            .map_err(|e| WorkflowError::LockPoisoned(e.to_string()))?;
        let window_start = *watermark;

        let ids = self.source.modified_between(self.entity, window_start, now)?;
        *watermark = now;
        drop(watermark);

        let mut failed = 0;
        for id in &ids {
            let event = SubscriptionEvent::builder(self.entity, *id, "UPDATED")
                .at(now)
                .build();
            if let Err(e) = self.dispatcher.dispatch(event) {
                warn!(entity = %self.entity, id, error = %e, "modified entity dispatch failed");
                failed += 1;
            }
        }

        if !ids.is_empty() {
            info!(entity = %self.entity, modified = ids.len(), failed, "date-last-modified poll");
        }

        Ok(PollSummary {
            entity: self.entity,
            window_start,
            window_end: now,
            dispatched: ids.len(),
            failed,
        })
    }
}

/// Runs date-last-modified services on a fixed interval.
pub struct DateLastModifiedPoller {
    services: Vec<Arc<DateLastModifiedService>>,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl DateLastModifiedPoller {
    pub fn new(
        services: Vec<Arc<DateLastModifiedService>>,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            services,
            poll_interval,
            shutdown,
        }
    }

    /// Run the polling loop until shutdown signal.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.poll_interval);

        debug!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            services = self.services.len(),
            "starting date-last-modified poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_all().await;
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("date-last-modified poller stopped");
    }

    async fn poll_all(&self) {
        for service in &self.services {
            let service = Arc::clone(service);
            let entity = service.entity();
            match tokio::task::spawn_blocking(move || service.poll()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(entity = %entity, error = %e, "poll failed"),
                Err(e) => warn!(entity = %entity, error = %e, "poll task panicked"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use backoffice_models::FieldCatalog;
    use backoffice_persistence::{Database, EntityLookup, PersistenceError, SqliteEntityStore};
    use chrono::{Duration as ChronoDuration, TimeZone};
    use serde_json::{json, Value};

    use crate::error::TaskResult;
    use crate::pipeline::EventPipeline;
    use crate::report::TaskOutcome;
    use crate::task::EventTask;
    use crate::tasks::LoadEntityTask;
    use crate::traverser::EventTraverser;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn store() -> Arc<SqliteEntityStore> {
        let store = SqliteEntityStore::new(Database::open_in_memory().unwrap()).unwrap();
        for (id, minutes) in [(1, 5), (2, 15), (3, 25)] {
            store
                .upsert(
                    EntityType::BillMaster,
                    id,
                    &json!({"id": id, "transactionStatus": "Ready"}),
                    base() + ChronoDuration::minutes(minutes),
                )
                .unwrap();
        }
        Arc::new(store)
    }

    fn dispatcher(store: Arc<SqliteEntityStore>) -> Arc<EventDispatcher> {
        Arc::new(
            EventDispatcher::builder(Arc::new(FieldCatalog::builtin()), store)
                .pipeline(
                    EventPipeline::builder(EntityType::BillMaster)
                        .task(LoadEntityTask)
                        .build(),
                )
                .build(),
        )
    }

    #[test]
    fn test_poll_dispatches_window_and_advances() {
        let store = store();
        let dispatcher = dispatcher(store.clone());
        let service = DateLastModifiedService::new(EntityType::BillMaster, store, dispatcher.clone(), base());

        let summary = service.poll_at(base() + ChronoDuration::minutes(20)).unwrap();
        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(service.watermark().unwrap(), base() + ChronoDuration::minutes(20));

        let reports = dispatcher.recent(10).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.tasks[0].outcome == TaskOutcome::Completed));
        assert_eq!(reports[0].entity_id, 2);

        let summary = service.poll_at(base() + ChronoDuration::minutes(30)).unwrap();
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.window_start, base() + ChronoDuration::minutes(20));
    }

    struct FailingSource {
        fail: AtomicBool,
    }

    impl ModifiedEntitySource for FailingSource {
        fn modified_between(
            &self,
            _entity: EntityType,
            _after: DateTime<Utc>,
            _until: DateTime<Utc>,
        ) -> backoffice_persistence::Result<Vec<i64>> {
            if self.fail.load(Ordering::SeqCst) {
                Err(PersistenceError::InvalidData("feed unavailable".into()))
            } else {
                Ok(vec![1])
            }
        }
    }

    #[test]
    fn test_watermark_kept_when_query_fails() {
        let source = Arc::new(FailingSource {
            fail: AtomicBool::new(true),
        });
        let service = DateLastModifiedService::new(
            EntityType::BillMaster,
            source.clone(),
            dispatcher(store()),
            base(),
        );

        assert!(service.poll_at(base() + ChronoDuration::minutes(10)).is_err());
        assert_eq!(service.watermark().unwrap(), base());

        source.fail.store(false, Ordering::SeqCst);
        let summary = service.poll_at(base() + ChronoDuration::minutes(10)).unwrap();
        assert_eq!(summary.window_start, base());
        assert_eq!(summary.dispatched, 1);
    }

    #[test]
    fn test_aborted_dispatch_counts_as_failed() {
        struct Ids;

        impl ModifiedEntitySource for Ids {
            fn modified_between(
                &self,
                _entity: EntityType,
                _after: DateTime<Utc>,
                _until: DateTime<Utc>,
            ) -> backoffice_persistence::Result<Vec<i64>> {
                Ok(vec![1, 404])
            }
        }

        let service = DateLastModifiedService::new(EntityType::BillMaster, Arc::new(Ids), dispatcher(store()), base());
        let summary = service.poll().unwrap();
        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.failed, 1);
    }

    /// Counts how many times it ran.
    struct Counter(Arc<AtomicUsize>);

    impl EventTask for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn run(&self, _traverser: &mut EventTraverser) -> TaskResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct NullLookup;

    impl EntityLookup for NullLookup {
        fn fetch(
            &self,
            _entity: EntityType,
            id: i64,
            _fields: &BTreeSet<String>,
        ) -> backoffice_persistence::Result<Value> {
            Ok(json!({"id": id}))
        }
    }

    #[tokio::test]
    async fn test_poller_runs_and_shuts_down() {
        let runs = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(
            EventDispatcher::builder(Arc::new(FieldCatalog::new()), Arc::new(NullLookup))
                .pipeline(
                    EventPipeline::builder(EntityType::BillMaster)
                        .task(Counter(Arc::clone(&runs)))
                        .build(),
                )
                .build(),
        );
        let source = Arc::new(FailingSource {
            fail: AtomicBool::new(false),
        });
        let service = Arc::new(DateLastModifiedService::new(
            EntityType::BillMaster,
            source,
            dispatcher,
            Utc::now() - ChronoDuration::minutes(1),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut poller = DateLastModifiedPoller::new(vec![service], Duration::from_millis(10), shutdown_rx);
        let handle = tokio::spawn(async move {
            poller.run().await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.is_ok(), "poller should stop after shutdown");
        assert!(runs.load(Ordering::SeqCst) >= 1);
    }
}
