//! # Traversal
//!
//! Iterator adapters over the tree's stepping primitives. Both walk
//! parent pointers and carry no stack: O(1) amortized per step, zero
//! heap.
//!
//! [`Iter`] visits nodes in key order. [`PostorderIter`] visits
//! children before parents, which makes it the teardown order: the
//! successor of a node is computed before the node is yielded, so the
//! caller may free each yielded node immediately and still finish the
//! walk.

use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::node::RbNode;
use crate::tree::{self, RbTree};

/// Forward in-order iterator. Yields raw links; convert with an
/// [`Adapter`](crate::Adapter).
pub struct Iter<'a> {
    next: Option<NonNull<RbNode>>,
    _tree: PhantomData<&'a RbTree>,
}

/// Children-first iterator for bulk teardown.
pub struct PostorderIter<'a> {
    next: Option<NonNull<RbNode>>,
    _tree: PhantomData<&'a RbTree>,
}

impl RbTree {
    /// In-order iterator over the whole tree.
    ///
    /// # Safety
    ///
    /// Every node linked into the tree must stay alive and unmodified
    /// for the iterator's lifetime.
    pub unsafe fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.first(),
            _tree: PhantomData,
        }
    }

    /// Postorder iterator over the whole tree. A yielded node's
    /// linkage is no longer read afterwards, so the caller may reuse
    /// or free each node as it is produced.
    ///
    /// # Safety
    ///
    /// Every node linked into the tree must be alive when the
    /// iterator reaches it; the tree must not be otherwise modified
    /// during the walk.
    pub unsafe fn postorder(&self) -> PostorderIter<'_> {
        PostorderIter {
            next: self.root().map(|root| left_deepest(root)),
            _tree: PhantomData,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = NonNull<RbNode>;

    fn next(&mut self) -> Option<NonNull<RbNode>> {
        let node = self.next?;
        self.next = unsafe { tree::next(node) };
        Some(node)
    }
}

impl Iterator for PostorderIter<'_> {
    type Item = NonNull<RbNode>;

    fn next(&mut self) -> Option<NonNull<RbNode>> {
        let node = self.next?;
        self.next = unsafe { next_postorder(node) };
        Some(node)
    }
}

/// Postorder successor: the left-deepest node of the parent's right
/// subtree when arriving from a left child, otherwise the parent.
///
/// # Safety
///
/// `node` must be linked into a live, well-formed tree.
pub unsafe fn next_postorder(node: NonNull<RbNode>) -> Option<NonNull<RbNode>> {
    let parent = node.as_ref().parent()?;
    if parent.as_ref().left == Some(node) {
        if let Some(r) = parent.as_ref().right {
            return Some(left_deepest(r));
        }
    }
    Some(parent)
}

// Descends left when possible, right otherwise, until hitting a leaf.
unsafe fn left_deepest(mut node: NonNull<RbNode>) -> NonNull<RbNode> {
    loop {
        if let Some(l) = node.as_ref().left {
            node = l;
        } else if let Some(r) = node.as_ref().right {
            node = r;
        } else {
            return node;
        }
    }
}
