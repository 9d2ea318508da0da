#![forbid(unsafe_code)]

//! Timeline rows: one per action, marked done, current, or upcoming.

use simplay_core::{ActionKind, ActionSequence, SimulationState, SimulationStatus};

use crate::icon::CursorIcon;

/// Where a row stands relative to the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RowStatus {
    Done,
    Current,
    Upcoming,
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TimelineRow {
    pub index: usize,
    pub kind: ActionKind,
    pub icon: CursorIcon,
    pub description: String,
    pub agent_thought: Option<String>,
    pub status: RowStatus,
    pub start_ms: f64,
}

/// Build rows for the whole sequence at sequence time `elapsed_ms`.
///
/// A row is `Done` once its action has ended or a later action is current;
/// after completion every row that started is `Done`.
pub fn timeline_rows(
    state: &SimulationState,
    sequence: &ActionSequence,
    elapsed_ms: f64,
) -> Vec<TimelineRow> {
    let current = state.current_action_index;
    let completed = state.status == SimulationStatus::Completed;
    sequence
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let status = if current == Some(index) {
                RowStatus::Current
            } else if current.is_some_and(|c| index < c)
                || action.end_ms() <= elapsed_ms
                || (completed && action.start_ms < elapsed_ms)
            {
                RowStatus::Done
            } else {
                RowStatus::Upcoming
            };
            TimelineRow {
                index,
                kind: action.kind,
                icon: CursorIcon::from(action.kind),
                description: action.description.clone(),
                agent_thought: action.agent_thought.clone(),
                status,
                start_ms: action.start_ms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplay_core::{CursorState, SequenceBuilder};

    fn seq() -> ActionSequence {
        SequenceBuilder::new()
            .push(ActionKind::Navigate, 500.0, "open")
            .gap(500.0)
            .push(ActionKind::Type, 500.0, "type")
            .thinking("fill the search box")
            .gap(500.0)
            .push(ActionKind::Click, 500.0, "submit")
            .build()
            .unwrap()
    }

    fn state_at(index: Option<usize>, status: SimulationStatus) -> SimulationState {
        let mut state = SimulationState::idle(CursorState::default(), 1.0);
        state.status = status;
        state.current_action_index = index;
        state
    }

    fn statuses(rows: &[TimelineRow]) -> Vec<RowStatus> {
        rows.iter().map(|r| r.status).collect()
    }

    #[test]
    fn rows_before_current_are_done() {
        let rows = timeline_rows(&state_at(Some(1), SimulationStatus::Running), &seq(), 1200.0);
        assert_eq!(
            statuses(&rows),
            vec![RowStatus::Done, RowStatus::Current, RowStatus::Upcoming]
        );
        assert_eq!(rows[1].icon, CursorIcon::IBeam);
        assert_eq!(rows[1].agent_thought.as_deref(), Some("fill the search box"));
    }

    #[test]
    fn gap_marks_finished_rows_done() {
        let rows = timeline_rows(&state_at(None, SimulationStatus::Running), &seq(), 1700.0);
        assert_eq!(
            statuses(&rows),
            vec![RowStatus::Done, RowStatus::Done, RowStatus::Upcoming]
        );
    }

    #[test]
    fn idle_marks_everything_upcoming() {
        let rows = timeline_rows(&state_at(None, SimulationStatus::Idle), &seq(), 0.0);
        assert!(rows.iter().all(|r| r.status == RowStatus::Upcoming));
    }

    #[test]
    fn completion_marks_everything_done() {
        let rows = timeline_rows(&state_at(None, SimulationStatus::Completed), &seq(), 2500.0);
        assert!(rows.iter().all(|r| r.status == RowStatus::Done));
    }
}
