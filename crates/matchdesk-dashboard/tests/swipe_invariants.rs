//! Property tests for the manual swipe dialog's target list

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use matchdesk_dashboard::{AddTargetOutcome, MAX_TARGET_USERS, SubmitOutcome, SwipeCreationForm};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    SetSource(Option<u8>),
    Add(Option<u8>),
    Remove(u8),
}

fn user_id(n: u8) -> String {
    format!("u{n}")
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => proptest::option::of(1u8..=8).prop_map(Op::SetSource),
        3 => proptest::option::of(1u8..=8).prop_map(Op::Add),
        1 => (1u8..=8).prop_map(Op::Remove),
    ]
}

proptest! {
    /// No sequence of picks leaves duplicates, the source, or more than five targets
    #[test]
    fn target_list_invariants_hold(ops in proptest::collection::vec(op(), 0..40)) {
        let mut form = SwipeCreationForm::new(backend_with_users(8));

        for op in ops {
            match op {
                Op::SetSource(source) => form.set_source(source.map(user_id)),
                Op::Add(candidate) => {
                    let before = form.targets().to_vec();
                    let candidate = candidate.map(user_id);
                    let outcome = form.add_target(candidate.as_ref());

                    if outcome == AddTargetOutcome::Added {
                        prop_assert_eq!(form.targets().len(), before.len() + 1);
                    } else {
                        prop_assert_eq!(form.targets(), before.as_slice());
                    }
                }
                Op::Remove(n) => form.remove_target(&user_id(n)),
            }

            let targets = form.targets();
            let unique: HashSet<&String> = targets.iter().collect();
            prop_assert_eq!(unique.len(), targets.len());
            prop_assert!(targets.len() <= MAX_TARGET_USERS);
            if let Some(source) = form.source() {
                prop_assert!(!targets.contains(source));
            }
        }
    }

    /// Adding the source as a target never changes the list
    #[test]
    fn adding_source_is_a_no_op(source in 1u8..=8, picks in proptest::collection::vec(1u8..=8, 0..6)) {
        let mut form = SwipeCreationForm::new(backend_with_users(8));
        form.set_source(Some(user_id(source)));
        for pick in picks {
            form.add_target(Some(&user_id(pick)));
        }
        let before = form.targets().to_vec();

        let outcome = form.add_target(Some(&user_id(source)));

        prop_assert_eq!(outcome, AddTargetOutcome::IsSource);
        prop_assert_eq!(form.targets(), before.as_slice());
    }
}

/// A full selection goes to the backend and clears the form
#[tokio::test]
async fn test_submit_full_selection() {
    let service = backend_with_users(8);
    let mut form = SwipeCreationForm::new(service.clone());
    form.load_users(100).await;
    assert_eq!(form.users().len(), 8);

    form.set_source(Some(user_id(1)));
    for n in 2..=8 {
        form.add_target(Some(&user_id(n)));
    }
    assert_eq!(form.targets().len(), MAX_TARGET_USERS);

    let outcome = form.submit(|| {}).await;

    assert_eq!(outcome, SubmitOutcome::Created { count: 5 });
    let targets: Vec<String> = service.swipes().into_iter().map(|(_, to)| to).collect();
    assert_eq!(targets, vec!["u2", "u3", "u4", "u5", "u6"]);
    assert!(form.targets().is_empty());
}
