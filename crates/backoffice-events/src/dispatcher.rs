//! Routes events to the pipeline of their entity type.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info};

use backoffice_models::{EntityType, FieldCatalog, SubscriptionEvent, TraversalId};
use backoffice_persistence::EntityLookup;

use crate::error::{Result, WorkflowError};
use crate::pipeline::EventPipeline;
use crate::report::PipelineReport;
use crate::traverser::{classify, TraverserSpec};

/// Number of reports kept when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

struct Route {
    spec: TraverserSpec,
    pipeline: EventPipeline,
}

/// Entity type → traverser setup and pipeline.
///
/// Routes are fixed once built. Only the report history is shared mutable
/// state, kept behind an `RwLock` and capped at a fixed length.
pub struct EventDispatcher {
    routes: HashMap<EntityType, Route>,
    lookup: Arc<dyn EntityLookup>,
    history: RwLock<VecDeque<PipelineReport>>,
    history_limit: usize,
}

/// Collects pipelines for an [`EventDispatcher`].
pub struct EventDispatcherBuilder {
    catalog: Arc<FieldCatalog>,
    lookup: Arc<dyn EntityLookup>,
    pipelines: Vec<EventPipeline>,
    history_limit: usize,
}

impl EventDispatcherBuilder {
    /// Adds a pipeline; a later pipeline for the same entity type replaces
    /// an earlier one.
    pub fn pipeline(mut self, pipeline: EventPipeline) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn build(self) -> EventDispatcher {
        let routes = self
            .pipelines
            .into_iter()
            .map(|pipeline| {
                let entity = pipeline.entity_type();
                let spec = TraverserSpec::from_catalog(&self.catalog, entity);
                (entity, Route { spec, pipeline })
            })
            .collect();

        EventDispatcher {
            routes,
            lookup: self.lookup,
            history: RwLock::new(VecDeque::new()),
            history_limit: self.history_limit,
        }
    }
}

impl EventDispatcher {
    pub fn builder(catalog: Arc<FieldCatalog>, lookup: Arc<dyn EntityLookup>) -> EventDispatcherBuilder {
        EventDispatcherBuilder {
            catalog,
            lookup,
            pipelines: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Entity types that have a pipeline.
    pub fn routes(&self) -> Vec<EntityType> {
        let mut entities: Vec<_> = self.routes.keys().copied().collect();
        entities.sort();
        entities
    }

    /// Task names of an entity type's pipeline, in run order.
    pub fn pipeline_tasks(&self, entity: EntityType) -> Option<Vec<&str>> {
        self.routes.get(&entity).map(|r| r.pipeline.task_names())
    }

    /// Runs an event through its entity type's pipeline.
    ///
    /// Events for entity types without a pipeline yield an empty report.
    /// A pipeline stopped by a critical task returns
    /// [`WorkflowError::Aborted`] carrying the report.
    pub fn dispatch(&self, event: SubscriptionEvent) -> Result<PipelineReport> {
        let report = match self.routes.get(&event.entity_name) {
            Some(route) => {
                let mut traverser = route.spec.traverser(&event, Arc::clone(&self.lookup));
                route.pipeline.run(&mut traverser)
            }
            None => {
                debug!(entity = %event.entity_name, "no pipeline for entity");
                let now = Utc::now();
                PipelineReport {
                    traversal_id: TraversalId::new(),
                    event_id: event.event_id.clone(),
                    entity: event.entity_name,
                    entity_id: event.entity_id,
                    event_type: classify(&event),
                    tasks: Vec::new(),
                    aborted_by: None,
                    started_at: now,
                    finished_at: now,
                }
            }
        };

        info!(
            traversal = %report.traversal_id,
            entity = %report.entity,
            entity_id = report.entity_id,
            event_type = report.event_type.code(),
            tasks = report.tasks.len(),
            failures = report.failures(),
            "event dispatched"
        );

        self.remember(report.clone())?;

        match &report.aborted_by {
            Some(task) => Err(WorkflowError::Aborted {
                task: task.clone(),
                report: Box::new(report),
            }),
            None => Ok(report),
        }
    }

    /// Most recent reports, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<PipelineReport>> {
        let history = self
            .history
            .read()
            .map_err(|e| WorkflowError::LockPoisoned(e.to_string()))?;
        Ok(history.iter().take(limit).cloned().collect())
    }

    fn remember(&self, report: PipelineReport) -> Result<()> {
        if self.history_limit == 0 {
            return Ok(());
        }
        let mut history = self
            .history
            .write()
            .map_err(|e| WorkflowError::LockPoisoned(e.to_string()))?;
        history.push_front(report);
        history.truncate(self.history_limit);
        Ok(())
    }
}
