//! # Invariant Verification
//!
//! Whole-tree validation for test suites, fuzz targets, and debugging
//! sessions. [`verify`] walks every node and checks the structural
//! invariants; [`verify_ordered`] additionally checks the binary
//! search property under a caller-supplied comparator, since the tree
//! itself knows nothing about keys.
//!
//! These walks are O(n) and never run on the hot paths; the tree
//! operations guard their own assumptions with `debug_assert!` only.
//! Errors are reported through `eyre` with enough context to identify
//! the violated invariant.

use core::cmp::Ordering;
use core::ptr::NonNull;

use eyre::{ensure, Result};

use crate::node::RbNode;
use crate::tree::{self, RbTree};

/// Whole-tree measurements gathered by a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of nodes reachable from the root.
    pub nodes: usize,
    /// Black nodes on every root-to-nil path (nil excluded).
    pub black_height: usize,
}

/// Checks the structural invariants: black root, no red node with a
/// red child, equal black count on every root-to-nil path, and parent
/// pointers consistent with child pointers.
///
/// # Safety
///
/// Every node linked into the tree must still be alive.
pub unsafe fn verify(tree: &RbTree) -> Result<TreeStats> {
    let Some(root) = tree.root() else {
        return Ok(TreeStats {
            nodes: 0,
            black_height: 0,
        });
    };

    ensure!(root.as_ref().is_black(), "root is red");
    ensure!(root.as_ref().parent().is_none(), "root has a parent link");

    let mut nodes = 0;
    let black_height = verify_subtree(root, &mut nodes)?;
    Ok(TreeStats {
        nodes,
        black_height,
    })
}

/// [`verify`] plus the binary search property: in-order traversal must
/// be non-decreasing under `cmp`.
///
/// # Safety
///
/// Every node linked into the tree must still be alive.
pub unsafe fn verify_ordered<F>(tree: &RbTree, mut cmp: F) -> Result<TreeStats>
where
    F: FnMut(NonNull<RbNode>, NonNull<RbNode>) -> Ordering,
{
    let stats = verify(tree)?;

    let mut prev: Option<NonNull<RbNode>> = None;
    let mut cur = tree.first();
    while let Some(n) = cur {
        if let Some(p) = prev {
            ensure!(
                cmp(p, n) != Ordering::Greater,
                "in-order traversal is out of order"
            );
        }
        prev = Some(n);
        cur = tree::next(n);
    }
    Ok(stats)
}

/// Longest root-to-leaf path, counted in nodes. Zero for an empty
/// tree. The invariants bound this by 2·log2(n + 1).
///
/// # Safety
///
/// Every node linked into the tree must still be alive.
pub unsafe fn height(tree: &RbTree) -> usize {
    fn depth(node: Option<NonNull<RbNode>>) -> usize {
        match node {
            None => 0,
            Some(n) => unsafe {
                1 + depth(n.as_ref().left()).max(depth(n.as_ref().right()))
            },
        }
    }
    depth(tree.root())
}

// Returns the subtree's black height (nil excluded). Recursion depth
// is bounded by the tree height, itself logarithmic for any tree that
// passes the checks.
unsafe fn verify_subtree(node: NonNull<RbNode>, nodes: &mut usize) -> Result<usize> {
    *nodes += 1;
    let n = node.as_ref();

    for (child, side) in [(n.left(), "left"), (n.right(), "right")] {
        if let Some(c) = child {
            ensure!(
                c.as_ref().parent() == Some(node),
                "{side} child's parent link does not point back"
            );
            ensure!(
                !(n.is_red() && c.as_ref().is_red()),
                "red node has a red {side} child"
            );
        }
    }

    let left_bh = match n.left() {
        Some(c) => verify_subtree(c, nodes)?,
        None => 0,
    };
    let right_bh = match n.right() {
        Some(c) => verify_subtree(c, nodes)?,
        None => 0,
    };
    ensure!(
        left_bh == right_bh,
        "black height mismatch: left {left_bh} != right {right_bh}"
    );

    Ok(left_bh + usize::from(n.is_black()))
}
