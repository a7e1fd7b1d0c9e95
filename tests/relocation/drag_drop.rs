//! Drag and Drop Tests
//!
//! Pointer-driven staging through `RelocationSession`: hover feedback,
//! subsection resolution, multi-select drops, commit highlight, workflow.

use crate::common::*;
use relocate::{RejectReason, StageResponse};
use std::time::{Duration, Instant};

#[test]
fn hover_never_stages() {
    let mut session = laid_out_session();
    assert!(session.begin_drag(&id("F")));

    for point in [OFFICE_CENTER, NOWHERE, WAREHOUSE_CENTER, POOL_CENTER] {
        session.drag_moved(point);
    }
    assert_eq!(session.active_target(), Some(&Location::Unassigned));
    assert!(session.ledger().is_empty());
}

#[test]
fn drop_on_subsection_targets_parent_container() {
    let mut session = laid_out_session();
    session.begin_drag(&id("F"));
    let outcome = session.drop_at(Point::new(25.0, 25.0));
    assert!(outcome.is_accepted());
    assert_eq!(session.ledger().get(&id("F")).unwrap().to, at("office"));
}

#[test]
fn drop_near_container_edge_uses_tolerance() {
    let mut session = laid_out_session();
    session.begin_drag(&id("F"));
    // 15px right of the office border, inside the default 20px margin
    session.drop_at(Point::new(115.0, 50.0));
    assert_eq!(session.ledger().get(&id("F")).unwrap().to, at("office"));

    session.begin_drag(&id("G"));
    assert_eq!(session.drop_at(Point::new(150.0, 50.0)), DropOutcome::NoTarget);
    assert!(session.ledger().get(&id("G")).is_none());
}

#[test]
fn drop_on_full_container_is_refused() {
    let mut session = laid_out_session();
    for item in ["F", "G"] {
        session.begin_drag(&id(item));
        assert!(session.drop_at(OFFICE_CENTER).is_accepted());
    }

    session.begin_drag(&id("H"));
    match session.drop_at(OFFICE_CENTER) {
        DropOutcome::Single { item, result } => {
            assert_eq!(item, id("H"));
            assert!(result.unwrap_err().is_capacity());
        }
        other => panic!("expected single drop, got {:?}", other),
    }
    assert_eq!(session.pending_summary().count, 2);
}

#[test]
fn multi_select_drop_moves_selection_from_mixed_origins() {
    let mut session = laid_out_session();
    session.select_all(&[id("A"), id("F"), id("B")]);

    session.begin_drag(&id("B"));
    let report = match session.drop_at(OFFICE_CENTER) {
        DropOutcome::Batch(report) => report,
        other => panic!("expected batch drop, got {:?}", other),
    };
    assert_eq!(report.accepted_ids(), vec![id("A"), id("F")]);
    assert_eq!(report.rejected_ids(), vec![id("B")]);

    assert_eq!(
        ids(&session.effective_view(&cid("office"))),
        vec!["A", "F"]
    );
    assert_eq!(
        ids(&session.effective_view(&cid("warehouse"))),
        vec!["B", "C", "D", "E"]
    );
    // Selection survives staging; only commit clears it
    assert_eq!(session.selection().len(), 3);
}

#[test]
fn drag_home_cancels_pending_move() {
    let mut session = laid_out_session();
    session.begin_drag(&id("A"));
    session.drop_at(OFFICE_CENTER);
    assert_eq!(session.pending_summary().count, 1);

    session.begin_drag(&id("A"));
    match session.drop_at(WAREHOUSE_CENTER) {
        DropOutcome::Single { result, .. } => assert_eq!(result, Ok(StageOutcome::Cancelled)),
        other => panic!("expected single drop, got {:?}", other),
    }
    assert_eq!(session.pending_summary().count, 0);
}

#[test]
fn stage_responses_for_ui() {
    let mut session = laid_out_session();
    assert_eq!(
        session.stage(&id("F"), &at("office")),
        StageResponse {
            accepted: true,
            reason: None,
            outcome: Some(StageOutcome::Staged),
        }
    );
    let refused = session.stage(&id("A"), &at("attic"));
    assert!(!refused.accepted);
    assert_eq!(refused.reason, Some(RejectReason::UnknownContainer));

    let json = serde_json::to_value(session.stage(&id("F"), &at("office"))).unwrap();
    assert_eq!(json["accepted"], true);
    assert_eq!(json["outcome"]["outcome"], "refreshed");
}

#[test]
fn commit_highlights_moved_items_then_expires() {
    let mut session = laid_out_session();
    session.toggle_selection(&id("F"));
    session.begin_drag(&id("F"));
    session.drop_at(OFFICE_CENTER);

    let report = session.commit().unwrap();
    assert_eq!(report.version, 1);
    assert_eq!(session.highlighted(), &[id("F")]);
    assert!(session.selection().is_empty());
    assert_eq!(session.registry().location_of(&id("F")), Some(&at("office")));

    let expired = Instant::now() + session.config().highlight_duration() + Duration::from_millis(1);
    assert!(session.highlighted_at(expired).is_empty());
}

#[test]
fn empty_commit_does_not_highlight() {
    let mut session = laid_out_session();
    let report = session.commit().unwrap();
    assert!(report.is_empty());
    assert!(session.highlighted().is_empty());
}

#[test]
fn teardown_discards_uncommitted_moves() {
    let mut session = laid_out_session();
    session.stage(&id("F"), &at("office"));
    session.commit().unwrap();
    session.stage(&id("G"), &at("office"));

    let registry = session.teardown();
    assert_eq!(registry.version(), 1);
    assert_eq!(registry.location_of(&id("F")), Some(&at("office")));
    assert_eq!(registry.location_of(&id("G")), Some(&Location::Unassigned));
}

#[test]
fn workflow_runs_alongside_staging() {
    let mut session = laid_out_session();
    for event in [
        WorkflowEvent::AnalysisRequested,
        WorkflowEvent::AnalysisCompleted,
        WorkflowEvent::Approve,
    ] {
        session.dispatch(event).unwrap();
    }
    session.stage(&id("F"), &at("office"));
    assert_eq!(session.workflow(), WorkflowState::Approved);

    let err = session.dispatch(WorkflowEvent::Approve).unwrap_err();
    assert_eq!(err.to_string(), "Cannot apply Approve while Approved");
    assert_eq!(session.dispatch(WorkflowEvent::PlaceOrder), Ok(WorkflowState::Ordered));
}
