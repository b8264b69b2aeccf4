//! # Leftmost-Cached Tree
//!
//! A tree plus one cached pointer to its leftmost node, for consumers
//! that take the minimum on every decision (run-queues, timer wheels,
//! deadline queues). `first()` becomes a safe O(1) read; the cache is
//! maintained on the same calls that could move the leftmost slot.
//!
//! The caller already descends the tree to pick the insertion point,
//! so it knows whether the descent went left the whole way; it passes
//! that bit to [`CachedRbTree::link_node`] instead of the wrapper
//! re-deriving it.

use core::ptr::NonNull;

use crate::node::RbNode;
use crate::tree::{self, RbTree, Side};

/// [`RbTree`] with an O(1) leftmost lookup.
#[derive(Debug, Default)]
pub struct CachedRbTree {
    tree: RbTree,
    leftmost: Option<NonNull<RbNode>>,
}

impl CachedRbTree {
    pub const fn new() -> Self {
        Self {
            tree: RbTree::new(),
            leftmost: None,
        }
    }

    /// Read-only view of the underlying tree.
    #[inline]
    pub fn tree(&self) -> &RbTree {
        &self.tree
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Leftmost node without walking the tree.
    #[inline]
    pub fn first(&self) -> Option<NonNull<RbNode>> {
        self.leftmost
    }

    /// As [`RbTree::link_node`]; `is_leftmost` reports whether the
    /// caller's descent took the left branch at every step (always
    /// true on an empty tree).
    ///
    /// # Safety
    ///
    /// Same contract as [`RbTree::link_node`]; additionally,
    /// `is_leftmost` must be accurate or `first()` goes stale.
    pub unsafe fn link_node(
        &mut self,
        node: NonNull<RbNode>,
        parent: Option<NonNull<RbNode>>,
        side: Side,
        is_leftmost: bool,
    ) {
        if is_leftmost {
            self.leftmost = Some(node);
        }
        self.tree.link_node(node, parent, side);
    }

    /// As [`RbTree::insert_fixup`]; rotations never change which node
    /// is leftmost, so the cache is untouched.
    ///
    /// # Safety
    ///
    /// Same contract as [`RbTree::insert_fixup`].
    pub unsafe fn insert_fixup(&mut self, node: NonNull<RbNode>) {
        self.tree.insert_fixup(node);
    }

    /// As [`RbTree::erase`]; the cache advances to the in-order
    /// successor when the leftmost node goes away.
    ///
    /// # Safety
    ///
    /// Same contract as [`RbTree::erase`].
    pub unsafe fn erase(&mut self, node: NonNull<RbNode>) {
        if self.leftmost == Some(node) {
            self.leftmost = tree::next(node);
        }
        self.tree.erase(node);
    }

    /// As [`RbTree::replace`], tracking the cache.
    ///
    /// # Safety
    ///
    /// Same contract as [`RbTree::replace`].
    pub unsafe fn replace(&mut self, victim: NonNull<RbNode>, new: NonNull<RbNode>) {
        if self.leftmost == Some(victim) {
            self.leftmost = Some(new);
        }
        self.tree.replace(victim, new);
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use super::*;
    use crate::adapter::Adapter;
    use crate::check;
    use crate::testutil::{alloc_entry, Entry, EntryAdapter};

    // Descent that also reports whether the new node is the minimum.
    unsafe fn insert_cached(tree: &mut CachedRbTree, entry: NonNull<Entry>) {
        let key = entry.as_ref().key;
        let link = EntryAdapter::link_of(entry);
        let mut parent = None;
        let mut side = Side::Left;
        let mut is_leftmost = true;
        let mut cur = tree.tree().root();
        while let Some(c) = cur {
            let ck = EntryAdapter::container_of(c).as_ref().key;
            parent = Some(c);
            if key < ck {
                side = Side::Left;
                cur = c.as_ref().left();
            } else {
                side = Side::Right;
                is_leftmost = false;
                cur = c.as_ref().right();
            }
        }
        tree.link_node(link, parent, side, is_leftmost);
        tree.insert_fixup(link);
    }

    unsafe fn key_of(node: NonNull<RbNode>) -> u64 {
        EntryAdapter::container_of(node).as_ref().key
    }

    #[test]
    fn cache_tracks_minimum_across_inserts() {
        let bump = Bump::new();
        let mut tree = CachedRbTree::new();

        unsafe {
            for key in [50, 30, 70, 10, 40] {
                insert_cached(&mut tree, alloc_entry(&bump, key));
                assert_eq!(tree.first(), tree.tree().first());
            }
            assert_eq!(key_of(tree.first().unwrap()), 10);
        }
    }

    #[test]
    fn erasing_leftmost_advances_cache() {
        let bump = Bump::new();
        let mut tree = CachedRbTree::new();

        unsafe {
            for key in [5, 3, 8, 1, 9] {
                insert_cached(&mut tree, alloc_entry(&bump, key));
            }

            for expected in [1u64, 3, 5, 8, 9] {
                let first = tree.first().unwrap();
                assert_eq!(key_of(first), expected);
                tree.erase(first);
                assert_eq!(tree.first(), tree.tree().first());
                check::verify(tree.tree()).unwrap();
            }
            assert!(tree.is_empty());
            assert!(tree.first().is_none());
        }
    }

    #[test]
    fn erasing_non_leftmost_keeps_cache() {
        let bump = Bump::new();
        let mut tree = CachedRbTree::new();

        unsafe {
            for key in [5, 3, 8] {
                insert_cached(&mut tree, alloc_entry(&bump, key));
            }
            let min = tree.first().unwrap();

            let eight = tree.tree().last().unwrap();
            tree.erase(eight);

            assert_eq!(tree.first(), Some(min));
            check::verify(tree.tree()).unwrap();
        }
    }

    #[test]
    fn replacing_leftmost_moves_cache_to_stand_in() {
        let bump = Bump::new();
        let mut tree = CachedRbTree::new();

        unsafe {
            for key in [4, 2, 6] {
                insert_cached(&mut tree, alloc_entry(&bump, key));
            }
            let victim = tree.first().unwrap();
            let stand_in = EntryAdapter::link_of(alloc_entry(&bump, 2));

            tree.replace(victim, stand_in);

            assert_eq!(tree.first(), Some(stand_in));
            assert_eq!(tree.first(), tree.tree().first());
        }
    }
}
