//! Event workflow handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use backoffice_events::PipelineReport;
use backoffice_models::SubscriptionEvent;

use crate::error::Result;
use crate::handlers::blocking;
use crate::state::AppState;
use crate::types::{ReportListQuery, ReportListResponse};

/// Reports returned when no limit is given.
const DEFAULT_REPORT_LIMIT: usize = 50;

/// POST /api/events - Subscription webhook; runs the event's pipeline.
pub async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<SubscriptionEvent>,
) -> Result<Json<PipelineReport>> {
    let dispatcher = Arc::clone(&state.dispatcher);
    let report = blocking(move || Ok(dispatcher.dispatch(event)?)).await?;
    Ok(Json(report))
}

/// GET /api/events/reports - Recent pipeline reports, newest first.
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ReportListResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_REPORT_LIMIT);
    let reports = state.dispatcher.recent(limit)?;
    let total = reports.len();
    Ok(Json(ReportListResponse { reports, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::state::test_support::make_test_state;
    use backoffice_events::TaskOutcome;
    use backoffice_models::EntityType;

    #[tokio::test]
    async fn test_receive_event_runs_pipeline() {
        let state = make_test_state();
        let event = SubscriptionEvent::updated(EntityType::Placement, 7, &["status"]);

        let report = receive_event(State(state.clone()), Json(event)).await.unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert!(report.tasks.iter().all(|t| t.outcome == TaskOutcome::Completed));

        let listed = list_reports(State(state), Query(ReportListQuery::default()))
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn test_receive_event_aborts_on_missing_entity() {
        let state = make_test_state();
        let event = SubscriptionEvent::inserted(EntityType::Placement, 404);

        let result = receive_event(State(state), Json(event)).await;
        match result {
            Err(ApiError::PipelineAborted { task, report }) => {
                assert_eq!(task, "load-entity");
                assert_eq!(report.task("audit").unwrap().outcome, TaskOutcome::NotRun);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_reports_limit() {
        let state = make_test_state();
        for id in 1..=3 {
            let event = SubscriptionEvent::deleted(EntityType::Candidate, id);
            receive_event(State(state.clone()), Json(event)).await.unwrap();
        }
        let query = ReportListQuery { limit: Some(2) };
        let listed = list_reports(State(state), Query(query)).await.unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.reports[0].entity_id, 3);
    }
}
