// Property tests for the history invariants: dedup, capacity, prepend-only order
use std::collections::HashSet;

use proptest::prelude::*;
use utklippstavle::history::{HistoryStore, IngestOutcome};

#[derive(Debug, Clone)]
enum Op {
    Ingest(String),
    Resize(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[a-e]{0,2}".prop_map(Op::Ingest),
        1 => (0usize..8).prop_map(Op::Resize),
    ]
}

fn assert_invariants(store: &HistoryStore) -> Result<(), TestCaseError> {
    let view = store.current_view();
    prop_assert!(view.len() <= store.capacity());
    prop_assert!(store.capacity() >= 1);

    let mut seen = HashSet::new();
    for entry in view.iter() {
        prop_assert!(!entry.text().is_empty());
        prop_assert!(seen.insert(entry.text().to_string()), "duplicate text {:?}", entry.text());
    }
    Ok(())
}

proptest! {
    #[test]
    fn dedup_and_capacity_hold_after_every_ingest(
        capacity in 1usize..12,
        texts in prop::collection::vec("[a-d]{0,2}", 0..60),
    ) {
        let mut store = HistoryStore::with_capacity(capacity);
        for text in &texts {
            store.ingest(text.as_str());
            assert_invariants(&store)?;
        }
    }

    #[test]
    fn invariants_survive_interleaved_preference_changes(
        ops in prop::collection::vec(op_strategy(), 0..80),
    ) {
        let mut store = HistoryStore::with_capacity(5);
        for op in ops {
            match op {
                Op::Ingest(text) => { store.ingest(text); }
                Op::Resize(new_max) => store.apply_preference_change(new_max),
            }
            assert_invariants(&store)?;
        }
    }

    #[test]
    fn accepted_text_goes_to_head_and_older_order_is_kept(
        texts in prop::collection::vec("[a-f]{1,2}", 1..40),
    ) {
        let mut store = HistoryStore::with_capacity(8);
        for text in &texts {
            let before: Vec<String> = store.current_view().texts().iter().map(|t| t.to_string()).collect();
            let outcome = store.ingest(text.as_str());
            let after: Vec<String> = store.current_view().texts().iter().map(|t| t.to_string()).collect();

            match outcome {
                IngestOutcome::Added => {
                    prop_assert_eq!(&after[0], text);
                    let kept = after.len() - 1;
                    prop_assert_eq!(&after[1..], &before[..kept]);
                }
                IngestOutcome::Duplicate => {
                    prop_assert!(before.contains(text));
                    prop_assert_eq!(after, before);
                }
                IngestOutcome::Empty => prop_assert!(false, "generated text is never empty"),
            }
        }
    }
}

#[test]
fn scenario_ordering_dedup_and_eviction() {
    let mut store = HistoryStore::with_capacity(20);
    for text in ["A", "B", "C"] {
        store.ingest(text);
    }
    assert_eq!(store.current_view().texts(), vec!["C", "B", "A"]);

    store.ingest("B");
    assert_eq!(store.current_view().texts(), vec!["C", "B", "A"]);

    store.apply_preference_change(1);
    assert_eq!(store.current_view().texts(), vec!["C"]);

    let mut small = HistoryStore::with_capacity(2);
    for text in ["A", "B", "C"] {
        small.ingest(text);
    }
    assert_eq!(small.current_view().texts(), vec!["C", "B"]);
}
