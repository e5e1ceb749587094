//! The unit of work in a pipeline.

use backoffice_models::EventType;

use crate::error::TaskResult;
use crate::traverser::EventTraverser;

/// Order given to tasks that do not choose one.
pub const DEFAULT_TASK_ORDER: i32 = 100;

/// One ordered step of reactive logic for an entity event.
pub trait EventTask: Send + Sync {
    fn name(&self) -> &str;

    /// Position in the pipeline; lower runs first.
    fn order(&self) -> i32 {
        DEFAULT_TASK_ORDER
    }

    /// Whether the task runs for `event_type`. Unknown events are skipped
    /// unless a task opts in.
    fn handles(&self, event_type: EventType) -> bool {
        event_type.is_known()
    }

    /// A failing critical task stops the rest of the pipeline.
    fn is_critical(&self) -> bool {
        false
    }

    fn run(&self, traverser: &mut EventTraverser) -> TaskResult<()>;
}
