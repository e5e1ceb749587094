//! Ordered task pipelines.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use backoffice_models::EntityType;

use crate::report::{PipelineReport, TaskOutcome, TaskRecord};
use crate::task::EventTask;
use crate::traverser::EventTraverser;

/// Tasks for one entity type, sorted once at build time.
///
/// Tasks run in ascending [`EventTask::order`]; equal orders keep the order
/// in which they were added.
pub struct EventPipeline {
    entity_type: EntityType,
    tasks: Vec<Arc<dyn EventTask>>,
}

/// Collects tasks for an [`EventPipeline`].
pub struct EventPipelineBuilder {
    entity_type: EntityType,
    tasks: Vec<Arc<dyn EventTask>>,
}

impl EventPipelineBuilder {
    pub fn task(mut self, task: impl EventTask + 'static) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    /// Adds a task instance that other pipelines also hold.
    pub fn shared_task(mut self, task: Arc<dyn EventTask>) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn build(mut self) -> EventPipeline {
        // stable: ties keep registration order
        self.tasks.sort_by_key(|t| t.order());
        EventPipeline {
            entity_type: self.entity_type,
            tasks: self.tasks,
        }
    }
}

impl EventPipeline {
    pub fn builder(entity_type: EntityType) -> EventPipelineBuilder {
        EventPipelineBuilder {
            entity_type,
            tasks: Vec::new(),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs every task against the traverser.
    ///
    /// Failures are logged and recorded, and the next task runs. A failing
    /// critical task stops the run; the tasks after it are marked
    /// [`TaskOutcome::NotRun`] and the report names the aborting task.
    pub fn run(&self, traverser: &mut EventTraverser) -> PipelineReport {
        let started_at = Utc::now();
        let event_type = traverser.event_type();
        let mut records = Vec::with_capacity(self.tasks.len());
        let mut aborted_by = None;

        for task in &self.tasks {
            let outcome = if aborted_by.is_some() {
                TaskOutcome::NotRun
            } else if !task.handles(event_type) {
                debug!(task = task.name(), event_type = ?event_type, "task skipped");
                TaskOutcome::Skipped
            } else {
                match task.run(traverser) {
                    Ok(()) => TaskOutcome::Completed,
                    Err(e) if task.is_critical() => {
                        error!(
                            traversal = %traverser.id(),
                            task = task.name(),
                            error = %e,
                            "critical task failed, aborting pipeline"
                        );
                        aborted_by = Some(task.name().to_string());
                        TaskOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                    Err(e) => {
                        warn!(
                            traversal = %traverser.id(),
                            task = task.name(),
                            error = %e,
                            "task failed"
                        );
                        TaskOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };

            records.push(TaskRecord {
                name: task.name().to_string(),
                order: task.order(),
                outcome,
            });
        }

        let event = traverser.event();
        PipelineReport {
            traversal_id: traverser.id().clone(),
            event_id: event.event_id.clone(),
            entity: event.entity_name,
            entity_id: event.entity_id,
            event_type,
            tasks: records,
            aborted_by,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
