//! Model-based property tests: random operation sequences are applied
//! to the tree and to a `BTreeSet`, with full invariant verification
//! and traversal comparison after every step.

use std::collections::BTreeSet;

use bumpalo::Bump;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::adapter::Adapter;
use crate::check;
use crate::testutil::{alloc_entry, collect_keys, find, insert, EntryAdapter};
use crate::tree::RbTree;

/// Operations to exercise. Keys are `u8` so sequences collide often
/// enough to hit erase and replace paths.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(u8),
    Erase(u8),
    Replace(u8),
}

fn apply(action: &Action, bump: &Bump, tree: &mut RbTree, model: &mut BTreeSet<u8>) {
    unsafe {
        match *action {
            Action::Insert(key) => {
                if model.insert(key) {
                    insert(tree, alloc_entry(bump, key as u64));
                }
            }
            Action::Erase(key) => {
                if model.remove(&key) {
                    let node = find(tree, key as u64).expect("model says key is present");
                    tree.erase(node);
                }
            }
            Action::Replace(key) => {
                if model.contains(&key) {
                    let victim = find(tree, key as u64).expect("model says key is present");
                    let stand_in = alloc_entry(bump, key as u64);
                    tree.replace(victim, EntryAdapter::link_of(stand_in));
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_ops_match_btreeset_model(actions in prop::collection::vec(any::<Action>(), 1..128)) {
        let bump = Bump::new();
        let mut tree = RbTree::new();
        let mut model = BTreeSet::new();

        for action in &actions {
            apply(action, &bump, &mut tree, &mut model);

            let stats = unsafe { check::verify(&tree) }.expect("invariants violated");
            prop_assert_eq!(stats.nodes, model.len());

            let keys = unsafe { collect_keys(&tree) };
            let expected: Vec<u64> = model.iter().map(|&k| k as u64).collect();
            prop_assert_eq!(keys, expected);
        }
    }

    #[test]
    fn insert_all_then_erase_all_returns_to_empty(mut keys in prop::collection::btree_set(any::<u16>(), 1..200)) {
        let bump = Bump::new();
        let mut tree = RbTree::new();

        unsafe {
            for &key in &keys {
                insert(&mut tree, alloc_entry(&bump, key as u64));
            }
            let stats = check::verify(&tree).expect("invariants violated");
            prop_assert_eq!(stats.nodes, keys.len());

            while let Some(key) = keys.pop_first() {
                let node = find(&tree, key as u64).expect("inserted key must be found");
                tree.erase(node);
                check::verify(&tree).expect("invariants violated");
            }
        }
        prop_assert!(tree.is_empty());
    }
}
