//! # RbLink - Intrusive Red-Black Tree
//!
//! RbLink is an intrusive, ordered, balanced binary search tree with
//! red-black balancing. It is a foundational building block for systems
//! code that needs ordered membership without allocation: index
//! structures, scheduler run-queues, timer wheels, free-list managers,
//! in-memory metadata indices.
//!
//! - **Intrusive linkage**: the tree links (parent word, two child
//!   pointers, one color bit) live inside the caller's payload object.
//!   The tree stores no key/value cells of its own.
//! - **Zero allocation**: every operation is a bounded pointer walk.
//!   The tree holds exactly one word of state (the root).
//! - **Caller-driven placement**: the tree never compares keys. The
//!   caller performs the BST descent, picks the attachment point, and
//!   the tree restores balance. The same code therefore serves as a
//!   map, a multiset, an interval tree, or a virtual-time run-queue.
//!
//! ## Quick Start
//!
//! ```
//! use std::ptr::NonNull;
//! use rblink::{intrusive_adapter, Adapter, RbNode, RbTree, Side};
//!
//! struct Span {
//!     start: u64,
//!     link: RbNode,
//! }
//! intrusive_adapter!(SpanAdapter = Span { link });
//!
//! let mut a = Span { start: 10, link: RbNode::new() };
//! let mut b = Span { start: 20, link: RbNode::new() };
//! let mut tree = RbTree::new();
//!
//! unsafe {
//!     let root = NonNull::from(&mut a.link);
//!     tree.link_node(root, None, Side::Left);
//!     tree.insert_fixup(root);
//!
//!     let leaf = NonNull::from(&mut b.link);
//!     tree.link_node(leaf, Some(root), Side::Right);
//!     tree.insert_fixup(leaf);
//!
//!     let first = tree.first().unwrap();
//!     assert_eq!(SpanAdapter::container_of(first).as_ref().start, 10);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------+
//! |       Caller (payload + ordering)        |
//! +------------------------------------------+
//! |  Adapter glue (container_of / link_of)   |   adapter, macros
//! +------------------------------------------+
//! |  Tree operations (link, fixups, erase,   |   tree, cached, iter
//! |  replace, in-order / postorder walks)    |
//! +------------------------------------------+
//! |  Node linkage (packed parent+color word, |   node
//! |  left / right child pointers)            |
//! +------------------------------------------+
//! ```
//!
//! Data flow is one-way: the caller constructs a node inside its own
//! object, attaches it with [`RbTree::link_node`], and calls
//! [`RbTree::insert_fixup`]; or locates a node and calls
//! [`RbTree::erase`], which unlinks and rebalances. Nothing else
//! touches the tree.
//!
//! ## Invariants
//!
//! After every public operation returns:
//!
//! 1. The root, if present, is black.
//! 2. No red node has a red child.
//! 3. Every root-to-nil path carries the same number of black nodes.
//! 4. Parent pointers agree with child pointers; the root has none.
//! 5. If the caller respects its own ordering when choosing attachment
//!    points, in-order traversal visits keys in that order. The tree
//!    cannot check this.
//!
//! [`check::verify`] walks a tree and reports violations of 1-4;
//! [`check::verify_ordered`] adds 5 under a caller comparator. The hot
//! paths never call it.
//!
//! ## Safety Model
//!
//! Mutating and traversing operations are `unsafe fn`: the tree holds
//! raw references into caller-owned memory, and every precondition
//! (node detached for linking, node in this tree for erasure, nodes
//! alive while the tree is walked) is a caller obligation. The library
//! performs no validation and has no recoverable errors. Debug builds
//! carry `debug_assert!` guards at the points where the algorithms rely
//! on structural invariants; release builds compile them out.
//!
//! ## Thread Safety
//!
//! None is provided. A tree and its nodes form a single-threaded
//! structure; the raw linkage makes the types `!Send + !Sync`. Callers
//! that share a tree wrap it in their own mutual exclusion.
//!
//! ## Module Overview
//!
//! - [`node`]: the embedded link: packed parent/color word, accessors
//! - [`tree`]: root holder and the rebalancing algorithms
//! - [`cached`]: leftmost-cached tree for O(1) `first()`
//! - [`iter`]: in-order and teardown-safe postorder iteration
//! - [`adapter`]: link-to-container conversions for payload types
//! - [`check`]: whole-tree invariant verification for tests and debug

#[macro_use]
mod macros;

pub mod adapter;
pub mod cached;
pub mod check;
pub mod iter;
pub mod node;
pub mod tree;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(test)]
mod proptests;

pub use adapter::Adapter;
pub use cached::CachedRbTree;
pub use check::TreeStats;
pub use iter::{Iter, PostorderIter};
pub use node::{Color, RbNode};
pub use tree::{RbTree, Side};
