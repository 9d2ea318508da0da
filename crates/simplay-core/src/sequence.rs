#![forbid(unsafe_code)]

//! Validated, immutable action sequences.
//!
//! An [`ActionSequence`] is the read-only input of a playback run. It is
//! checked once at construction and never changes afterwards; callers that
//! want different actions stop playback and build a new sequence.
//!
//! # Invariants
//!
//! 1. Actions are sorted by `start_ms` (non-decreasing).
//! 2. Every start and duration is finite and non-negative.
//! 3. Action ids are unique.
//! 4. `total_duration_ms()` is finite and strictly positive.
//!
//! # Lookup
//!
//! Active-action lookup is a binary search on start time followed by a short
//! backward scan over actions that may still be running. The scan stops as
//! soon as the running maximum of end times drops below the query time, so
//! it only visits actions that overlap `t`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::action::{ActionId, ActionKind, SimulationAction};
use crate::geometry::{Bounds, Point};

/// Reasons a sequence is rejected at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
    #[error("action sequence is empty")]
    Empty,
    #[error("action `{id}` has a non-finite start time or duration")]
    NonFiniteTime { id: ActionId },
    #[error("action `{id}` starts at negative time {start_ms}ms")]
    NegativeStart { id: ActionId, start_ms: f64 },
    #[error("action `{id}` has negative duration {duration_ms}ms")]
    NegativeDuration { id: ActionId, duration_ms: f64 },
    #[error("duplicate action id `{id}`")]
    DuplicateId { id: ActionId },
    #[error("action `{id}` starts at {start_ms}ms, before the previous action at {previous_ms}ms")]
    Unsorted {
        id: ActionId,
        start_ms: f64,
        previous_ms: f64,
    },
    #[error("total duration must be finite and positive, got {total_ms}ms")]
    InvalidTotalDuration { total_ms: f64 },
    #[error("sequence has zero total duration")]
    ZeroDuration,
}

/// An ordered, immutable list of actions plus the total playback length.
///
/// Cloning is cheap: the action list is shared.
#[derive(Debug, Clone)]
pub struct ActionSequence {
    actions: Arc<[SimulationAction]>,
    /// Running maximum of `end_ms` over `actions[..=i]`.
    max_end_prefix: Arc<[f64]>,
    /// Position of the nearest action before `i` that has one.
    prev_position: Arc<[Option<Point>]>,
    total_duration_ms: f64,
    duration_explicit: bool,
}

impl PartialEq for ActionSequence {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions && self.total_duration_ms == other.total_duration_ms
    }
}

impl ActionSequence {
    /// Validate `actions` and compute `total = max(start + duration)`.
    pub fn new(actions: Vec<SimulationAction>) -> Result<Self, SequenceError> {
        Self::build(actions, None)
    }

    /// Validate `actions` with an explicit total duration.
    ///
    /// An override shorter than the last action's end truncates playback.
    pub fn with_total_duration(
        actions: Vec<SimulationAction>,
        total_ms: f64,
    ) -> Result<Self, SequenceError> {
        Self::build(actions, Some(total_ms))
    }

    fn build(
        actions: Vec<SimulationAction>,
        explicit_total: Option<f64>,
    ) -> Result<Self, SequenceError> {
        if actions.is_empty() {
            return Err(SequenceError::Empty);
        }

        validate_actions(&actions)?;

        let mut max_end_prefix = Vec::with_capacity(actions.len());
        let mut prev_position = Vec::with_capacity(actions.len());
        let mut max_end = 0.0_f64;
        let mut last_position = None;
        for action in &actions {
            max_end = max_end.max(action.end_ms());
            max_end_prefix.push(max_end);
            prev_position.push(last_position);
            if action.position.is_some() {
                last_position = action.position;
            }
        }

        let total_duration_ms = match explicit_total {
            Some(total) if !total.is_finite() || total <= 0.0 => {
                return Err(SequenceError::InvalidTotalDuration { total_ms: total });
            }
            Some(total) => total,
            None if max_end <= 0.0 => return Err(SequenceError::ZeroDuration),
            None => max_end,
        };

        Ok(Self {
            actions: actions.into(),
            max_end_prefix: max_end_prefix.into(),
            prev_position: prev_position.into(),
            total_duration_ms,
            duration_explicit: explicit_total.is_some(),
        })
    }

    /// All actions, sorted by start time.
    #[inline]
    pub fn actions(&self) -> &[SimulationAction] {
        &self.actions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false for a validated sequence; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SimulationAction> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationAction> {
        self.actions.iter()
    }

    /// Total playback length in milliseconds.
    #[inline]
    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration_ms
    }

    /// Whether the total duration was set explicitly.
    #[inline]
    pub fn has_explicit_duration(&self) -> bool {
        self.duration_explicit
    }

    /// Start time of the first action.
    #[inline]
    pub fn first_start_ms(&self) -> f64 {
        self.actions.first().map_or(0.0, |a| a.start_ms)
    }

    /// Number of actions whose start is at or before `t`.
    #[inline]
    pub fn started_count_at(&self, t: f64) -> usize {
        self.actions.partition_point(|a| a.start_ms <= t)
    }

    /// Index of the action whose `[start, end)` interval contains `t`.
    ///
    /// When several overlap, the latest-starting one wins.
    pub fn active_index_at(&self, t: f64) -> Option<usize> {
        let started = self.started_count_at(t);
        (0..started)
            .rev()
            .take_while(|&i| self.max_end_prefix[i] >= t)
            .find(|&i| self.actions[i].contains(t))
    }

    /// Index of the first action that has not started yet at `t`.
    #[inline]
    pub fn pending_index_at(&self, t: f64) -> Option<usize> {
        let idx = self.started_count_at(t);
        (idx < self.actions.len()).then_some(idx)
    }

    /// Position of the nearest action before `index` that carries one.
    #[inline]
    pub fn previous_position(&self, index: usize) -> Option<Point> {
        self.prev_position.get(index).copied().flatten()
    }

    /// Index of an action by id.
    pub fn index_of(&self, id: &ActionId) -> Option<usize> {
        self.actions.iter().position(|a| &a.id == id)
    }
}

fn validate_actions(actions: &[SimulationAction]) -> Result<(), SequenceError> {
    let mut seen = HashSet::with_capacity(actions.len());
    let mut previous_ms = 0.0_f64;
    for action in actions {
        if !action.start_ms.is_finite() || !action.duration_ms.is_finite() {
            return Err(SequenceError::NonFiniteTime {
                id: action.id.clone(),
            });
        }
        if action.start_ms < 0.0 {
            return Err(SequenceError::NegativeStart {
                id: action.id.clone(),
                start_ms: action.start_ms,
            });
        }
        if action.duration_ms < 0.0 {
            return Err(SequenceError::NegativeDuration {
                id: action.id.clone(),
                duration_ms: action.duration_ms,
            });
        }
        if action.start_ms < previous_ms {
            return Err(SequenceError::Unsorted {
                id: action.id.clone(),
                start_ms: action.start_ms,
                previous_ms,
            });
        }
        if !seen.insert(&action.id) {
            return Err(SequenceError::DuplicateId {
                id: action.id.clone(),
            });
        }
        previous_ms = action.start_ms;
    }
    Ok(())
}

impl<'a> IntoIterator for &'a ActionSequence {
    type Item = &'a SimulationAction;
    type IntoIter = std::slice::Iter<'a, SimulationAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl TryFrom<Vec<SimulationAction>> for ActionSequence {
    type Error = SequenceError;

    fn try_from(actions: Vec<SimulationAction>) -> Result<Self, Self::Error> {
        Self::new(actions)
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Serialize};

    use super::ActionSequence;
    use crate::action::SimulationAction;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SequenceWire {
        actions: Vec<SimulationAction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_duration: Option<f64>,
    }

    impl Serialize for ActionSequence {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SequenceWire {
                actions: self.actions().to_vec(),
                total_duration: self
                    .has_explicit_duration()
                    .then_some(self.total_duration_ms()),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for ActionSequence {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let wire = SequenceWire::deserialize(deserializer)?;
            let built = match wire.total_duration {
                Some(total) => ActionSequence::with_total_duration(wire.actions, total),
                None => ActionSequence::new(wire.actions),
            };
            built.map_err(serde::de::Error::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Lays actions out back-to-back on a timeline.
///
/// Each [`push`](Self::push) starts where the previous action ended (plus any
/// [`gap`](Self::gap)). Decorators such as [`at`](Self::at) apply to the most
/// recently pushed action.
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    actions: Vec<SimulationAction>,
    cursor_ms: f64,
    total_ms: Option<f64>,
}

impl SequenceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action after the previous one, with a generated id.
    #[must_use]
    pub fn push(self, kind: ActionKind, duration_ms: f64, description: impl Into<String>) -> Self {
        let id = format!("action-{}", self.actions.len() + 1);
        self.push_with_id(id, kind, duration_ms, description)
    }

    /// Append an action after the previous one with an explicit id.
    #[must_use]
    pub fn push_with_id(
        mut self,
        id: impl Into<ActionId>,
        kind: ActionKind,
        duration_ms: f64,
        description: impl Into<String>,
    ) -> Self {
        let action = SimulationAction::new(id, kind, self.cursor_ms, duration_ms, description);
        self.cursor_ms += duration_ms.max(0.0);
        self.actions.push(action);
        self
    }

    /// Insert idle time before the next action.
    #[must_use]
    pub fn gap(mut self, ms: f64) -> Self {
        self.cursor_ms += ms.max(0.0);
        self
    }

    /// Set the cursor target of the last action.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        if let Some(last) = self.actions.last_mut() {
            last.position = Some(Point::new(x, y));
        }
        self
    }

    /// Set the element selector of the last action.
    #[must_use]
    pub fn on(mut self, selector: impl Into<String>) -> Self {
        if let Some(last) = self.actions.pop() {
            self.actions.push(last.on(selector));
        }
        self
    }

    /// Attach a highlight box to the last action.
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        if let Some(last) = self.actions.pop() {
            self.actions.push(last.with_bounds(bounds));
        }
        self
    }

    /// Set the agent thought of the last action.
    #[must_use]
    pub fn thinking(mut self, thought: impl Into<String>) -> Self {
        if let Some(last) = self.actions.last_mut() {
            last.agent_thought = Some(thought.into());
        }
        self
    }

    /// Override the total duration.
    #[must_use]
    pub fn total_duration(mut self, ms: f64) -> Self {
        self.total_ms = Some(ms);
        self
    }

    /// Validate and produce the sequence.
    pub fn build(self) -> Result<ActionSequence, SequenceError> {
        match self.total_ms {
            Some(total) => ActionSequence::with_total_duration(self.actions, total),
            None => ActionSequence::new(self.actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(id: &str, start: f64, dur: f64) -> SimulationAction {
        SimulationAction::new(id, ActionKind::Click, start, dur, id)
    }

    fn three_step() -> ActionSequence {
        ActionSequence::new(vec![
            act("a", 0.0, 500.0),
            act("b", 1000.0, 500.0),
            act("c", 2000.0, 500.0),
        ])
        .unwrap()
    }

    #[test]
    fn total_duration_is_max_end() {
        assert_eq!(three_step().total_duration_ms(), 2500.0);
    }

    #[test]
    fn total_duration_uses_longest_overlapping_action() {
        let seq = ActionSequence::new(vec![act("long", 0.0, 3000.0), act("short", 100.0, 50.0)])
            .unwrap();
        assert_eq!(seq.total_duration_ms(), 3000.0);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ActionSequence::new(vec![]), Err(SequenceError::Empty));
    }

    #[test]
    fn rejects_unsorted() {
        let err = ActionSequence::new(vec![act("a", 500.0, 10.0), act("b", 100.0, 10.0)])
            .unwrap_err();
        assert!(matches!(err, SequenceError::Unsorted { ref id, .. } if id.as_str() == "b"));
    }

    #[test]
    fn rejects_negative_duration_and_start() {
        assert!(matches!(
            ActionSequence::new(vec![act("a", 0.0, -1.0)]),
            Err(SequenceError::NegativeDuration { .. })
        ));
        assert!(matches!(
            ActionSequence::new(vec![act("a", -5.0, 1.0)]),
            Err(SequenceError::NegativeStart { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ActionSequence::new(vec![act("a", 0.0, 10.0), act("a", 20.0, 10.0)])
            .unwrap_err();
        assert_eq!(err, SequenceError::DuplicateId { id: "a".into() });
    }

    #[test]
    fn rejects_non_finite_times() {
        assert!(matches!(
            ActionSequence::new(vec![act("a", f64::NAN, 10.0)]),
            Err(SequenceError::NonFiniteTime { .. })
        ));
        assert!(matches!(
            ActionSequence::new(vec![act("a", 0.0, f64::INFINITY)]),
            Err(SequenceError::NonFiniteTime { .. })
        ));
    }

    #[test]
    fn rejects_zero_length_sequence() {
        assert_eq!(
            ActionSequence::new(vec![act("a", 0.0, 0.0)]),
            Err(SequenceError::ZeroDuration)
        );
    }

    #[test]
    fn explicit_total_duration_is_validated() {
        assert!(matches!(
            ActionSequence::with_total_duration(vec![act("a", 0.0, 10.0)], 0.0),
            Err(SequenceError::InvalidTotalDuration { .. })
        ));
        let seq = ActionSequence::with_total_duration(vec![act("a", 0.0, 10.0)], 40.0).unwrap();
        assert_eq!(seq.total_duration_ms(), 40.0);
        assert!(seq.has_explicit_duration());
    }

    #[test]
    fn active_index_finds_containing_action() {
        let seq = three_step();
        assert_eq!(seq.active_index_at(0.0), Some(0));
        assert_eq!(seq.active_index_at(499.0), Some(0));
        assert_eq!(seq.active_index_at(500.0), None);
        assert_eq!(seq.active_index_at(1200.0), Some(1));
        assert_eq!(seq.active_index_at(2000.0), Some(2));
        assert_eq!(seq.active_index_at(2500.0), None);
    }

    #[test]
    fn pending_index_in_gap() {
        let seq = three_step();
        assert_eq!(seq.pending_index_at(700.0), Some(1));
        assert_eq!(seq.pending_index_at(1700.0), Some(2));
        assert_eq!(seq.pending_index_at(2200.0), None);
    }

    #[test]
    fn overlapping_prefers_latest_start() {
        let seq = ActionSequence::new(vec![
            act("outer", 0.0, 1000.0),
            act("inner", 200.0, 100.0),
        ])
        .unwrap();
        assert_eq!(seq.active_index_at(250.0), Some(1));
        // Inner finished, outer still running.
        assert_eq!(seq.active_index_at(400.0), Some(0));
    }

    #[test]
    fn previous_position_skips_positionless_actions() {
        let seq = SequenceBuilder::new()
            .push(ActionKind::Click, 100.0, "first")
            .at(10.0, 10.0)
            .push(ActionKind::Wait, 100.0, "wait")
            .push(ActionKind::Click, 100.0, "second")
            .at(50.0, 50.0)
            .build()
            .unwrap();
        assert_eq!(seq.previous_position(0), None);
        assert_eq!(seq.previous_position(1), Some(Point::new(10.0, 10.0)));
        assert_eq!(seq.previous_position(2), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn builder_lays_out_back_to_back() {
        let seq = SequenceBuilder::new()
            .push(ActionKind::Navigate, 800.0, "Open page")
            .gap(200.0)
            .push_with_id("email", ActionKind::Type, 1200.0, "Type email")
            .on("#email")
            .thinking("Fill the form top to bottom")
            .build()
            .unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1).unwrap().start_ms, 1000.0);
        assert_eq!(seq.total_duration_ms(), 2200.0);
        assert_eq!(seq.index_of(&"email".into()), Some(1));
        assert_eq!(seq.get(0).unwrap().id.as_str(), "action-1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_revalidates() {
        let json = r#"{"actions":[
            {"id":"a","type":"click","startTime":100,"duration":10,"description":"a"},
            {"id":"b","type":"hover","startTime":50,"duration":10,"description":"b"}
        ]}"#;
        let err = serde_json::from_str::<ActionSequence>(json).unwrap_err();
        assert!(err.to_string().contains("before the previous action"));
    }
}
