//! Shared helpers for the in-crate test modules: an arena-allocated
//! keyed payload and the caller-side descent the library deliberately
//! leaves outside the tree.

use core::ptr::NonNull;

use bumpalo::Bump;

use crate::adapter::Adapter;
use crate::node::RbNode;
use crate::tree::{RbTree, Side};

pub(crate) struct Entry {
    pub key: u64,
    pub link: RbNode,
}

intrusive_adapter!(pub(crate) EntryAdapter = Entry { link });

pub(crate) fn alloc_entry(bump: &Bump, key: u64) -> NonNull<Entry> {
    NonNull::from(bump.alloc(Entry {
        key,
        link: RbNode::new(),
    }))
}

// BST descent by key, duplicates to the right, then link + fixup.
pub(crate) unsafe fn insert(tree: &mut RbTree, entry: NonNull<Entry>) {
    let key = entry.as_ref().key;
    let link = EntryAdapter::link_of(entry);
    let mut parent = None;
    let mut side = Side::Left;
    let mut cur = tree.root();
    while let Some(c) = cur {
        let ck = EntryAdapter::container_of(c).as_ref().key;
        parent = Some(c);
        if key < ck {
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

pub(crate) unsafe fn find(tree: &RbTree, key: u64) -> Option<NonNull<RbNode>> {
    let mut cur = tree.root();
    while let Some(c) = cur {
        let ck = EntryAdapter::container_of(c).as_ref().key;
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

pub(crate) unsafe fn collect_keys(tree: &RbTree) -> Vec<u64> {
    tree.iter()
        .map(|n| EntryAdapter::container_of(n).as_ref().key)
        .collect()
}
