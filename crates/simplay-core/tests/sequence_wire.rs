//! JSON wire shape of actions and sequences.
//!
//! Run:
//!   cargo test -p simplay-core --features serde --test sequence_wire

use simplay_core::{ActionKind, ActionSequence, Point, SequenceError};

const FIXTURE: &str = r##"{
  "actions": [
    {
      "id": "nav",
      "type": "navigate",
      "startTime": 0,
      "duration": 800,
      "description": "Open the landing page"
    },
    {
      "id": "cta",
      "type": "double-click",
      "startTime": 1000,
      "duration": 400,
      "position": { "x": 640, "y": 420 },
      "element": { "selector": "#get-started", "bounds": { "x": 600, "y": 400, "width": 80, "height": 40 } },
      "description": "Double-click the CTA",
      "agentThought": "Primary call to action should respond quickly"
    }
  ],
  "totalDuration": 1600
}"##;

#[test]
fn parses_camel_case_fixture() {
    let seq: ActionSequence = serde_json::from_str(FIXTURE).expect("fixture parses");
    assert_eq!(seq.len(), 2);
    assert_eq!(seq.total_duration_ms(), 1600.0);
    let cta = seq.get(1).expect("second action");
    assert_eq!(cta.kind, ActionKind::DoubleClick);
    assert_eq!(cta.position, Some(Point::new(640.0, 420.0)));
    assert_eq!(
        cta.element.as_ref().map(|e| e.selector.as_str()),
        Some("#get-started")
    );
    assert!(cta.agent_thought.is_some());
}

#[test]
fn serializes_back_to_the_same_shape() {
    let seq: ActionSequence = serde_json::from_str(FIXTURE).expect("fixture parses");
    let value = serde_json::to_value(&seq).expect("serializes");
    assert_eq!(value["totalDuration"], 1600.0);
    assert_eq!(value["actions"][1]["type"], "double-click");
    assert_eq!(value["actions"][1]["startTime"], 1000.0);
    assert!(value["actions"][0].get("position").is_none());
}

#[test]
fn unknown_action_type_is_rejected() {
    let json = r#"{"actions":[{"id":"a","type":"teleport","startTime":0,"duration":5,"description":"?"}]}"#;
    assert!(serde_json::from_str::<ActionSequence>(json).is_err());
}

#[test]
fn duplicate_ids_are_rejected_with_validation_message() {
    let json = r#"{"actions":[
        {"id":"a","type":"click","startTime":0,"duration":5,"description":"a"},
        {"id":"a","type":"click","startTime":10,"duration":5,"description":"a again"}
    ]}"#;
    let err = serde_json::from_str::<ActionSequence>(json).unwrap_err();
    assert!(
        err.to_string()
            .contains(&SequenceError::DuplicateId { id: "a".into() }.to_string())
    );
}
