//! Audit record of one pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_models::{EntityType, EventId, EventType, TraversalId};

/// What happened to one task during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    /// The task does not handle this event type.
    Skipped,
    Failed { error: String },
    /// A critical task failed earlier in the pipeline.
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub name: String,
    pub order: i32,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Outcome of running one event through its pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub traversal_id: TraversalId,
    pub event_id: EventId,
    pub entity: EntityType,
    pub entity_id: i64,
    pub event_type: EventType,
    pub tasks: Vec<TaskRecord>,
    /// Name of the critical task that stopped the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted_by: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn is_aborted(&self) -> bool {
        self.aborted_by.is_some()
    }

    /// Number of tasks that failed, critical or not.
    pub fn failures(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::Failed { .. }))
            .count()
    }

    pub fn task(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_record_wire_shape() {
        let record = TaskRecord {
            name: "notify".into(),
            order: 500,
            outcome: TaskOutcome::Failed {
                error: "connection refused".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"name": "notify", "order": 500, "status": "failed", "error": "connection refused"})
        );

        let record = TaskRecord {
            name: "audit".into(),
            order: 1000,
            outcome: TaskOutcome::NotRun,
        };
        assert_eq!(serde_json::to_value(&record).unwrap()["status"], "not_run");
    }
}
