//! Entity event workflows for the staffing back-office.
//!
//! An incoming [`SubscriptionEvent`](backoffice_models::SubscriptionEvent)
//! is classified, wrapped in an [`EventTraverser`] carrying the related-entity
//! fields for its entity type, and run through that type's [`EventPipeline`]:
//! - tasks run in ascending order, ties in registration order
//! - tasks whose guard rejects the event type are skipped
//! - failures are recorded and the pipeline continues, unless the failing
//!   task is critical
//!
//! The [`EventDispatcher`] owns the pipelines and keeps recent
//! [`PipelineReport`]s. Entity types outside the subscription feed are
//! covered by the [`DateLastModifiedPoller`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use backoffice_events::{AuditTask, EventDispatcher, EventPipeline, LoadEntityTask};
//! use backoffice_models::{EntityType, FieldCatalog, SubscriptionEvent};
//! use backoffice_persistence::{Database, SqliteEntityStore};
//!
//! let store = Arc::new(SqliteEntityStore::new(Database::open_in_memory().unwrap()).unwrap());
//! let dispatcher = EventDispatcher::builder(Arc::new(FieldCatalog::builtin()), store)
//!     .pipeline(
//!         EventPipeline::builder(EntityType::Placement)
//!             .task(LoadEntityTask)
//!             .task(AuditTask)
//!             .build(),
//!     )
//!     .build();
//!
//! let report = dispatcher
//!     .dispatch(SubscriptionEvent::inserted(EntityType::Placement, 42))
//!     .unwrap();
//! ```

pub mod dispatcher;
pub mod dlm;
pub mod error;
pub mod helper;
pub mod pipeline;
pub mod report;
pub mod task;
pub mod tasks;
pub mod traverser;

pub use dispatcher::{EventDispatcher, EventDispatcherBuilder, DEFAULT_HISTORY_LIMIT};
pub use dlm::{DateLastModifiedPoller, DateLastModifiedService, PollSummary};
pub use error::{Result, TaskError, TaskResult, WorkflowError};
pub use helper::TaskHelper;
pub use pipeline::{EventPipeline, EventPipelineBuilder};
pub use report::{PipelineReport, TaskOutcome, TaskRecord};
pub use task::{EventTask, DEFAULT_TASK_ORDER};
pub use tasks::{AuditTask, LoadEntityTask, WebhookNotifyTask, AUDIT_RESULT, ENTITY_RESULT};
pub use traverser::{classify, helper_for, EventTraverser, TraverserSpec};
