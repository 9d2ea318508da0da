#![no_main]

use libfuzzer_sys::fuzz_target;
use simplay_core::ActionSequence;

fuzz_target!(|data: &[u8]| {
    let Ok(sequence) = serde_json::from_slice::<ActionSequence>(data) else {
        return;
    };

    // Anything that deserialized passed validation.
    assert!(!sequence.is_empty());
    let total = sequence.total_duration_ms();
    assert!(total.is_finite() && total >= 0.0);
    let mut prev = f64::NEG_INFINITY;
    for (i, action) in sequence.iter().enumerate() {
        assert!(action.start_ms >= prev, "unsorted at {i}");
        assert!(action.duration_ms >= 0.0, "negative duration at {i}");
        prev = action.start_ms;
    }

    // Lookups at arbitrary points stay in range.
    for t in [-1.0, 0.0, total / 2.0, total, total + 1.0, f64::NAN] {
        if let Some(index) = sequence.active_index_at(t) {
            assert!(index < sequence.len());
            assert!(sequence.actions()[index].contains(t));
        }
        if let Some(index) = sequence.pending_index_at(t) {
            assert!(index < sequence.len());
        }
        assert!(sequence.started_count_at(t) <= sequence.len());
    }
});
