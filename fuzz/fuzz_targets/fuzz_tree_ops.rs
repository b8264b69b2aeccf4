//! Fuzzing for the tree linkage algorithms.
//!
//! Applies arbitrary operation sequences against a `BTreeSet` model
//! and verifies the full red-black invariants after every step.

#![no_main]

use std::collections::BTreeSet;
use std::ptr::NonNull;

use arbitrary::Arbitrary;
use bumpalo::Bump;
use libfuzzer_sys::fuzz_target;

use rblink::{check, intrusive_adapter, Adapter, RbNode, RbTree, Side};

#[derive(Debug, Arbitrary)]
enum TreeOp {
    Insert(u8),
    Erase(u8),
    Replace(u8),
    EraseFirst,
    EraseLast,
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<TreeOp>,
}

struct Entry {
    key: u64,
    link: RbNode,
}

intrusive_adapter!(EntryAdapter = Entry { link });

fn alloc(bump: &Bump, key: u64) -> NonNull<Entry> {
    NonNull::from(bump.alloc(Entry {
        key,
        link: RbNode::new(),
    }))
}

unsafe fn key_of(node: NonNull<RbNode>) -> u64 {
    EntryAdapter::container_of(node).as_ref().key
}

unsafe fn insert(tree: &mut RbTree, entry: NonNull<Entry>) {
    let key = entry.as_ref().key;
    let link = EntryAdapter::link_of(entry);
    let mut parent = None;
    let mut side = Side::Left;
    let mut cur = tree.root();
    while let Some(c) = cur {
        parent = Some(c);
        if key < key_of(c) {
            side = Side::Left;
            cur = c.as_ref().left();
        } else {
            side = Side::Right;
            cur = c.as_ref().right();
        }
    }
    tree.link_node(link, parent, side);
    tree.insert_fixup(link);
}

unsafe fn find(tree: &RbTree, key: u64) -> Option<NonNull<RbNode>> {
    let mut cur = tree.root();
    while let Some(c) = cur {
        let ck = key_of(c);
        if key == ck {
            return Some(c);
        }
        cur = if key < ck {
            c.as_ref().left()
        } else {
            c.as_ref().right()
        };
    }
    None
}

fuzz_target!(|input: Input| {
    let bump = Bump::new();
    let mut tree = RbTree::new();
    let mut model: BTreeSet<u8> = BTreeSet::new();

    for op in &input.ops {
        unsafe {
            match *op {
                TreeOp::Insert(key) => {
                    if model.insert(key) {
                        insert(&mut tree, alloc(&bump, key as u64));
                    }
                }
                TreeOp::Erase(key) => {
                    if model.remove(&key) {
                        let node = find(&tree, key as u64).expect("model key present");
                        tree.erase(node);
                    }
                }
                TreeOp::Replace(key) => {
                    if model.contains(&key) {
                        let victim = find(&tree, key as u64).expect("model key present");
                        tree.replace(victim, EntryAdapter::link_of(alloc(&bump, key as u64)));
                    }
                }
                TreeOp::EraseFirst => {
                    if let Some(key) = model.pop_first() {
                        let node = tree.first().expect("model is non-empty");
                        assert_eq!(key_of(node), key as u64);
                        tree.erase(node);
                    }
                }
                TreeOp::EraseLast => {
                    if let Some(key) = model.pop_last() {
                        let node = tree.last().expect("model is non-empty");
                        assert_eq!(key_of(node), key as u64);
                        tree.erase(node);
                    }
                }
            }

            let stats = check::verify(&tree).expect("red-black invariants violated");
            assert_eq!(stats.nodes, model.len());

            let keys: Vec<u64> = tree.iter().map(|n| key_of(n)).collect();
            let expected: Vec<u64> = model.iter().map(|&k| k as u64).collect();
            assert_eq!(keys, expected);
        }
    }
});
