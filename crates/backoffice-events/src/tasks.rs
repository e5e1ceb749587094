//! Tasks shipped with the back-office.

use std::time::Duration;

use serde_json::json;
use tracing::info;
use url::Url;

use backoffice_models::EventType;

use crate::error::{TaskError, TaskResult};
use crate::task::EventTask;
use crate::traverser::EventTraverser;

/// Result key holding the fetched root entity.
pub const ENTITY_RESULT: &str = "entity";
/// Result key holding the audit summary.
pub const AUDIT_RESULT: &str = "audit";

/// Fetches the entity an insert or update is about.
///
/// Later tasks read it from the [`ENTITY_RESULT`] key. Without it they have
/// nothing to work on, so a failed fetch stops the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadEntityTask;

impl EventTask for LoadEntityTask {
    fn name(&self) -> &str {
        "load-entity"
    }

    fn order(&self) -> i32 {
        10
    }

    fn handles(&self, event_type: EventType) -> bool {
        matches!(event_type, EventType::Inserted | EventType::Updated)
    }

    fn is_critical(&self) -> bool {
        true
    }

    fn run(&self, traverser: &mut EventTraverser) -> TaskResult<()> {
        let entity = traverser.helper_mut().entity()?;
        traverser.record(ENTITY_RESULT, entity);
        Ok(())
    }
}

/// Writes one structured log line per event, including unknown ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditTask;

impl EventTask for AuditTask {
    fn name(&self) -> &str {
        "audit"
    }

    fn order(&self) -> i32 {
        1000
    }

    fn handles(&self, _event_type: EventType) -> bool {
        true
    }

    fn run(&self, traverser: &mut EventTraverser) -> TaskResult<()> {
        let event = traverser.event();
        info!(
            traversal = %traverser.id(),
            entity = %event.entity_name,
            entity_id = event.entity_id,
            code = %event.entity_event_type,
            updated = ?event.updated_properties,
            "entity event"
        );
        let summary = json!({
            "entity": event.entity_name,
            "entityId": event.entity_id,
            "code": event.entity_event_type,
            "updatedProperties": event.updated_properties,
            "loaded": traverser.result(ENTITY_RESULT).is_some(),
        });
        traverser.record(AUDIT_RESULT, summary);
        Ok(())
    }
}

/// POSTs a JSON summary of the traversal to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifyTask {
    url: Url,
    timeout: Duration,
}

impl WebhookNotifyTask {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl EventTask for WebhookNotifyTask {
    fn name(&self) -> &str {
        "webhook-notify"
    }

    fn order(&self) -> i32 {
        500
    }

    fn run(&self, traverser: &mut EventTraverser) -> TaskResult<()> {
        let event = traverser.event();
        let body = json!({
            "traversalId": traverser.id(),
            "eventId": event.event_id,
            "entity": event.entity_name,
            "entityId": event.entity_id,
            "eventType": traverser.event_type(),
            "results": traverser.results(),
        });

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TaskError::Notify(e.to_string()))?;

        let response = client
            .post(self.url.clone())
            .json(&body)
            .send()
            .map_err(|e| TaskError::Notify(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::Notify(format!("{} returned {status}", self.url)));
        }
        traverser.record("notified", json!(status.as_u16()));
        Ok(())
    }
}
