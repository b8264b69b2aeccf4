//! # Tree Operations
//!
//! The root holder and the red-black rebalancing algorithms: insertion
//! linkage and fixup, erasure with color fixup, node replacement, and
//! in-order stepping.
//!
//! ## Division of Labor
//!
//! The tree performs no key comparison. Insertion is a two-step
//! protocol: the caller descends the tree itself, finds the parent and
//! side where the new node belongs, and calls
//! [`RbTree::link_node`] + [`RbTree::insert_fixup`]. Erasure takes the
//! node directly; lookup is the caller's business. This keeps the
//! rebalancing machinery independent of key schemes, duplicate policy,
//! and augmentation.
//!
//! ## Insertion Fixup
//!
//! A freshly linked node is red, which can only violate "no red node
//! has a red child". Walking up from the new node:
//!
//! - red uncle: recolor parent/uncle black and grandparent red, then
//!   continue at the grandparent;
//! - black uncle, inside grandchild: rotate at the parent to turn the
//!   violation outward;
//! - black uncle, outside grandchild: rotate at the grandparent and
//!   swap its color with the parent's. Done.
//!
//! The left-leaning and right-leaning halves are exact mirrors.
//!
//! ## Erasure
//!
//! Standard BST unlink (splice out the node, or its in-order successor
//! when it has two children), then a color fixup only if the spliced
//! position lost a black node. The unlink phase reports that case by
//! returning the parent of the now-deficient slot; the fixup walks up
//! from there resolving the one-black deficit through the four sibling
//! cases, stopping as soon as a rotation or a red node absorbs it.
//!
//! ## Rotation-Color Fusion
//!
//! Every rotation that changes the subtree root goes through
//! `rotate_set_parents`, which moves the displaced node's parent link
//! *and* color to its replacement in one word store and gives the
//! displaced node its new color in a second. Both fixups depend on the
//! swap being atomic with the pointer updates; doing the two halves
//! separately would expose states the surrounding cases cannot repair.
//!
//! ## Costs
//!
//! No operation allocates, blocks, or suspends. Insertion and erasure
//! are O(log n) with at most two (insert) or three (erase) rotations;
//! stepping is O(1) amortized over a full traversal.

use core::ptr::NonNull;

use crate::node::{color_of_word, parent_of_word, Color, RbNode};

/// Attachment side for [`RbTree::link_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A red-black tree root. Holds one word; never owns the nodes.
#[derive(Debug, Default)]
pub struct RbTree {
    root: Option<NonNull<RbNode>>,
}

impl RbTree {
    pub const fn new() -> Self {
        Self { root: None }
    }

    #[inline]
    pub fn root(&self) -> Option<NonNull<RbNode>> {
        self.root
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Attaches a detached node as a red leaf under `parent` on the
    /// requested side, or as the root when `parent` is absent (`side`
    /// is ignored then). Call [`RbTree::insert_fixup`] afterwards.
    ///
    /// # Safety
    ///
    /// `node` must be detached and its memory valid for the lifetime
    /// of its membership. `parent` must be a node of this tree with a
    /// free child slot on `side`, or `None` only when the tree is
    /// empty. The caller is responsible for having chosen a position
    /// consistent with its own ordering.
    pub unsafe fn link_node(
        &mut self,
        mut node: NonNull<RbNode>,
        parent: Option<NonNull<RbNode>>,
        side: Side,
    ) {
        {
            let n = node.as_mut();
            n.left = None;
            n.right = None;
            n.set_parent_and_color(parent, Color::Red);
        }
        match parent {
            Some(mut p) => match side {
                Side::Left => p.as_mut().left = Some(node),
                Side::Right => p.as_mut().right = Some(node),
            },
            None => self.root = Some(node),
        }
    }

    /// Restores the red-black invariants after [`RbTree::link_node`].
    ///
    /// # Safety
    ///
    /// `node` must be the node just linked into this tree, still red,
    /// with the rest of the tree satisfying the invariants.
    pub unsafe fn insert_fixup(&mut self, mut node: NonNull<RbNode>) {
        // The node was linked red, so its parent word needs no mask.
        let mut parent = node.as_ref().red_parent();

        loop {
            // Loop invariant: `node` is red.
            let Some(mut p) = parent else {
                // `node` became the root: paint it black and stop.
                node.as_mut().set_parent_and_color(None, Color::Black);
                break;
            };
            if p.as_ref().is_black() {
                break;
            }
            // A red parent is never the root, so a grandparent exists.
            debug_assert!(p.as_ref().parent().is_some());
            let mut g = p.as_ref().red_parent().unwrap_unchecked();

            let mut tmp = g.as_ref().right;
            if Some(p) != tmp {
                // p == g.left
                if let Some(mut u) = tmp {
                    if u.as_ref().is_red() {
                        // Case 1: red uncle. Flip p and u black, g red,
                        // and continue at g, whose own parent may be
                        // red again.
                        //
                        //       G            g
                        //      / \          / \
                        //     p   u  -->   P   U
                        //    /            /
                        //   n            n
                        u.as_mut().set_parent_and_color(Some(g), Color::Black);
                        p.as_mut().set_parent_and_color(Some(g), Color::Black);
                        node = g;
                        parent = node.as_ref().parent();
                        node.as_mut().set_parent_and_color(parent, Color::Red);
                        continue;
                    }
                }

                tmp = p.as_ref().right;
                if Some(node) == tmp {
                    // Case 2: inside grandchild. Left rotate at p; the
                    // red-red pair moves outward and case 3 ends it.
                    //
                    //      G             G
                    //     / \           / \
                    //    p   U  -->    n   U
                    //     \           /
                    //      n         p
                    tmp = node.as_ref().left;
                    p.as_mut().right = tmp;
                    node.as_mut().left = Some(p);
                    if let Some(mut t) = tmp {
                        t.as_mut().set_parent_and_color(Some(p), Color::Black);
                    }
                    p.as_mut().set_parent_and_color(Some(node), Color::Red);
                    p = node;
                    tmp = p.as_ref().right;
                }

                // Case 3: outside grandchild. Right rotate at g; p
                // takes g's slot and color, g turns red below it.
                //
                //        G           P
                //       / \         / \
                //      p   U  -->  n   g
                //     /                 \
                //    n                   U
                g.as_mut().left = tmp; // == p.right
                p.as_mut().right = Some(g);
                if let Some(mut t) = tmp {
                    t.as_mut().set_parent_and_color(Some(g), Color::Black);
                }
                self.rotate_set_parents(g, p, Color::Red);
                break;
            } else {
                tmp = g.as_ref().left;
                if let Some(mut u) = tmp {
                    if u.as_ref().is_red() {
                        // Case 1: red uncle (mirror).
                        u.as_mut().set_parent_and_color(Some(g), Color::Black);
                        p.as_mut().set_parent_and_color(Some(g), Color::Black);
                        node = g;
                        parent = node.as_ref().parent();
                        node.as_mut().set_parent_and_color(parent, Color::Red);
                        continue;
                    }
                }

                tmp = p.as_ref().left;
                if Some(node) == tmp {
                    // Case 2: right rotate at p (mirror).
                    tmp = node.as_ref().right;
                    p.as_mut().left = tmp;
                    node.as_mut().right = Some(p);
                    if let Some(mut t) = tmp {
                        t.as_mut().set_parent_and_color(Some(p), Color::Black);
                    }
                    p.as_mut().set_parent_and_color(Some(node), Color::Red);
                    p = node;
                    tmp = p.as_ref().left;
                }

                // Case 3: left rotate at g (mirror).
                g.as_mut().right = tmp; // == p.left
                p.as_mut().left = Some(g);
                if let Some(mut t) = tmp {
                    t.as_mut().set_parent_and_color(Some(g), Color::Black);
                }
                self.rotate_set_parents(g, p, Color::Red);
                break;
            }
        }
    }

    /// Unlinks `node` from the tree and rebalances.
    ///
    /// The node's linkage is left stale; relink or drop it, but do not
    /// traverse from it.
    ///
    /// # Safety
    ///
    /// `node` must currently be linked into this tree.
    pub unsafe fn erase(&mut self, node: NonNull<RbNode>) {
        if let Some(parent) = self.unlink(node) {
            self.erase_fixup(parent);
        }
    }

    /// Splices `new` into `victim`'s slot, copying all three linkage
    /// fields verbatim. No rebalancing: the caller guarantees the
    /// substitution preserves its ordering.
    ///
    /// # Safety
    ///
    /// `victim` must be linked into this tree, `new` must be detached,
    /// and `new`'s key must order identically to `victim`'s.
    pub unsafe fn replace(&mut self, victim: NonNull<RbNode>, mut new: NonNull<RbNode>) {
        let parent = victim.as_ref().parent();

        // Point the surrounding nodes at the replacement.
        self.change_child(victim, Some(new), parent);
        if let Some(mut l) = victim.as_ref().left {
            l.as_mut().set_parent(Some(new));
        }
        if let Some(mut r) = victim.as_ref().right {
            r.as_mut().set_parent(Some(new));
        }

        // Copy the linkage from the victim to the replacement.
        let v = victim.as_ref();
        let n = new.as_mut();
        n.left = v.left;
        n.right = v.right;
        n.set_parent_color_word(v.parent_color_word());
    }

    /// Leftmost node, or `None` on an empty tree.
    ///
    /// # Safety
    ///
    /// Every node linked into this tree must still be alive.
    pub unsafe fn first(&self) -> Option<NonNull<RbNode>> {
        let mut n = self.root?;
        while let Some(l) = n.as_ref().left {
            n = l;
        }
        Some(n)
    }

    /// Rightmost node, or `None` on an empty tree.
    ///
    /// # Safety
    ///
    /// Every node linked into this tree must still be alive.
    pub unsafe fn last(&self) -> Option<NonNull<RbNode>> {
        let mut n = self.root?;
        while let Some(r) = n.as_ref().right {
            n = r;
        }
        Some(n)
    }

    // Rewrites the child slot of `parent` that held `old` (or the root
    // slot when `parent` is absent) to point at `new`.
    #[inline]
    unsafe fn change_child(
        &mut self,
        old: NonNull<RbNode>,
        new: Option<NonNull<RbNode>>,
        parent: Option<NonNull<RbNode>>,
    ) {
        match parent {
            Some(mut p) => {
                let p = p.as_mut();
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    p.right = new;
                }
            }
            None => self.root = new,
        }
    }

    // Rotation epilogue: `old`'s parent link and color move to `new`
    // in one store, `old` becomes `new`'s child with `color`, and the
    // slot above is rewired.
    #[inline]
    unsafe fn rotate_set_parents(
        &mut self,
        mut old: NonNull<RbNode>,
        mut new: NonNull<RbNode>,
        color: Color,
    ) {
        let parent = old.as_ref().parent();
        new.as_mut().set_parent_color_word(old.as_ref().parent_color_word());
        old.as_mut().set_parent_and_color(Some(new), color);
        self.change_child(old, Some(new), parent);
    }

    // BST unlink. Returns the parent of the slot that lost a black
    // node, or `None` when the colors worked out and no fixup is due.
    unsafe fn unlink(&mut self, node: NonNull<RbNode>) -> Option<NonNull<RbNode>> {
        let child = node.as_ref().right;

        let Some(mut left) = node.as_ref().left else {
            // No left child: splice the right child (possibly absent)
            // into node's slot. A lone child is red under a black
            // node, so handing it node's parent word also recolors it
            // black and no fixup is needed.
            let pc = node.as_ref().parent_color_word();
            let parent = parent_of_word(pc);
            self.change_child(node, child, parent);
            return match child {
                Some(mut c) => {
                    c.as_mut().set_parent_color_word(pc);
                    None
                }
                None if color_of_word(pc) == Color::Black => parent,
                None => None,
            };
        };

        let Some(mut right) = child else {
            // Only a left child: the same splice, mirrored.
            let pc = node.as_ref().parent_color_word();
            left.as_mut().set_parent_color_word(pc);
            self.change_child(node, Some(left), parent_of_word(pc));
            return None;
        };

        // Two children: splice the in-order successor into node's
        // slot; the successor's own right child takes its old place.
        let mut successor = right;
        let mut parent;
        let child2;
        match right.as_ref().left {
            None => {
                // The successor is node.right itself: it keeps its
                // right subtree and the vacated slot sits directly
                // below it.
                //
                //    (n)          (s)
                //    / \          / \
                //  (x) (s)  ->  (x) (c)
                //        \
                //        (c)
                parent = successor;
                child2 = successor.as_ref().right;
            }
            Some(first_left) => {
                // Leftmost node under node.right.
                //
                //    (n)          (s)
                //    / \          / \
                //  (x) (y)  ->  (x) (y)
                //      /            /
                //    (p)          (p)
                //    /            /
                //  (s)          (c)
                //    \
                //    (c)
                let mut p = right;
                let mut s = first_left;
                while let Some(l) = s.as_ref().left {
                    p = s;
                    s = l;
                }
                successor = s;
                parent = p;
                child2 = successor.as_ref().right;
                parent.as_mut().left = child2;
                successor.as_mut().right = Some(right);
                right.as_mut().set_parent(Some(successor));
            }
        }

        successor.as_mut().left = Some(left);
        left.as_mut().set_parent(Some(successor));

        let pc = node.as_ref().parent_color_word();
        self.change_child(node, Some(successor), parent_of_word(pc));

        match child2 {
            Some(mut c2) => {
                // The successor's old right child must be red: recolor
                // it black to cover the successor's departure.
                successor.as_mut().set_parent_color_word(pc);
                c2.as_mut().set_parent_and_color(Some(parent), Color::Black);
                None
            }
            None => {
                let pc2 = successor.as_ref().parent_color_word();
                successor.as_mut().set_parent_color_word(pc);
                if color_of_word(pc2) == Color::Black {
                    Some(parent)
                } else {
                    None
                }
            }
        }
    }

    // Restores the black count on the deficient side. `parent` is the
    // parent of the slot that lost a black node; the slot itself may
    // be empty on the first iteration.
    unsafe fn erase_fixup(&mut self, mut parent: NonNull<RbNode>) {
        let mut node: Option<NonNull<RbNode>> = None;

        loop {
            // Loop invariants:
            // - node is black (or None on the first iteration)
            // - node is not the root (parent exists)
            // - all paths through node's subtree carry one black fewer
            //   than every other root-to-nil path
            let mut sibling_slot = parent.as_ref().right;
            if node != sibling_slot {
                // node == parent.left. The sibling side carries the
                // black surplus, so the sibling exists.
                debug_assert!(sibling_slot.is_some());
                let mut sibling = sibling_slot.unwrap_unchecked();
                if sibling.as_ref().is_red() {
                    // Case 1: red sibling. Left rotate at parent so
                    // the deficient side faces a black sibling.
                    //
                    //     P               S
                    //    / \             / \
                    //   N   s    -->    p   Sr
                    //      / \         / \
                    //     Sl  Sr      N   Sl
                    let tmp1 = sibling.as_ref().left;
                    parent.as_mut().right = tmp1;
                    sibling.as_mut().left = Some(parent);
                    // A red sibling above a deficient path has two
                    // black, non-nil children.
                    debug_assert!(tmp1.is_some());
                    let mut t1 = tmp1.unwrap_unchecked();
                    t1.as_mut().set_parent_and_color(Some(parent), Color::Black);
                    self.rotate_set_parents(parent, sibling, Color::Red);
                    sibling = t1;
                }

                let mut outer = sibling.as_ref().right;
                if is_black_or_nil(outer) {
                    let inner = sibling.as_ref().left;
                    if is_black_or_nil(inner) {
                        // Case 2: both of the sibling's children are
                        // black. Recolor the sibling red, equalizing
                        // the two sides below parent, and move the
                        // deficit up. A red parent absorbs it.
                        //
                        //    (p)           (p)
                        //    / \           / \
                        //   N   S    -->  N   s
                        //      / \           / \
                        //     Sl  Sr        Sl  Sr
                        sibling.as_mut().set_parent_and_color(Some(parent), Color::Red);
                        if parent.as_ref().is_red() {
                            parent.as_mut().set_black();
                        } else {
                            node = Some(parent);
                            if let Some(gp) = parent.as_ref().parent() {
                                parent = gp;
                                continue;
                            }
                            // Reached the root: the whole tree's black
                            // height drops by one.
                        }
                        break;
                    }
                    // Case 3: red inner child, black outer child.
                    // Right rotate at the sibling to expose a red
                    // outer child for case 4.
                    //
                    //   (p)           (p)
                    //   / \           / \
                    //  N   S    -->  N   Sl
                    //     / \             \
                    //    sl  Sr            s
                    //                       \
                    //                        Sr
                    let mut inner = inner.unwrap_unchecked();
                    let tmp1 = inner.as_ref().right;
                    sibling.as_mut().left = tmp1;
                    inner.as_mut().right = Some(sibling);
                    parent.as_mut().right = Some(inner);
                    if let Some(mut t) = tmp1 {
                        t.as_mut().set_parent_and_color(Some(sibling), Color::Black);
                    }
                    outer = Some(sibling);
                    sibling = inner;
                }

                // Case 4: red outer child. Left rotate at parent; the
                // sibling inherits parent's color, parent and the
                // outer child turn black, and the deficient side gets
                // its black back.
                //
                //      (p)             (s)
                //      / \             / \
                //     N   S     -->   P   Sr
                //        / \         / \
                //      (sl) sr      N  (sl)
                let tmp2 = sibling.as_ref().left;
                parent.as_mut().right = tmp2;
                sibling.as_mut().left = Some(parent);
                debug_assert!(outer.is_some());
                let mut o = outer.unwrap_unchecked();
                o.as_mut().set_parent_and_color(Some(sibling), Color::Black);
                if let Some(mut t) = tmp2 {
                    t.as_mut().set_parent(Some(parent));
                }
                self.rotate_set_parents(parent, sibling, Color::Black);
                break;
            } else {
                // node == parent.right; exact mirror of the above.
                sibling_slot = parent.as_ref().left;
                debug_assert!(sibling_slot.is_some());
                let mut sibling = sibling_slot.unwrap_unchecked();
                if sibling.as_ref().is_red() {
                    // Case 1: right rotate at parent (mirror).
                    let tmp1 = sibling.as_ref().right;
                    parent.as_mut().left = tmp1;
                    sibling.as_mut().right = Some(parent);
                    debug_assert!(tmp1.is_some());
                    let mut t1 = tmp1.unwrap_unchecked();
                    t1.as_mut().set_parent_and_color(Some(parent), Color::Black);
                    self.rotate_set_parents(parent, sibling, Color::Red);
                    sibling = t1;
                }

                let mut outer = sibling.as_ref().left;
                if is_black_or_nil(outer) {
                    let inner = sibling.as_ref().right;
                    if is_black_or_nil(inner) {
                        // Case 2 (mirror).
                        sibling.as_mut().set_parent_and_color(Some(parent), Color::Red);
                        if parent.as_ref().is_red() {
                            parent.as_mut().set_black();
                        } else {
                            node = Some(parent);
                            if let Some(gp) = parent.as_ref().parent() {
                                parent = gp;
                                continue;
                            }
                        }
                        break;
                    }
                    // Case 3: left rotate at the sibling (mirror).
                    let mut inner = inner.unwrap_unchecked();
                    let tmp1 = inner.as_ref().left;
                    sibling.as_mut().right = tmp1;
                    inner.as_mut().left = Some(sibling);
                    parent.as_mut().left = Some(inner);
                    if let Some(mut t) = tmp1 {
                        t.as_mut().set_parent_and_color(Some(sibling), Color::Black);
                    }
                    outer = Some(sibling);
                    sibling = inner;
                }

                // Case 4: right rotate at parent (mirror).
                let tmp2 = sibling.as_ref().right;
                parent.as_mut().left = tmp2;
                sibling.as_mut().right = Some(parent);
                debug_assert!(outer.is_some());
                let mut o = outer.unwrap_unchecked();
                o.as_mut().set_parent_and_color(Some(sibling), Color::Black);
                if let Some(mut t) = tmp2 {
                    t.as_mut().set_parent(Some(parent));
                }
                self.rotate_set_parents(parent, sibling, Color::Black);
                break;
            }
        }
    }
}

/// In-order successor: leftmost of the right subtree if present, else
/// the nearest ancestor reached from a left child.
///
/// # Safety
///
/// `node` must be linked into a live, well-formed tree.
pub unsafe fn next(node: NonNull<RbNode>) -> Option<NonNull<RbNode>> {
    if let Some(mut n) = node.as_ref().right {
        while let Some(l) = n.as_ref().left {
            n = l;
        }
        return Some(n);
    }
    // Climb until arriving from a left child; climbing off the root
    // means `node` was the last.
    let mut n = node;
    loop {
        let parent = n.as_ref().parent()?;
        if parent.as_ref().right == Some(n) {
            n = parent;
        } else {
            return Some(parent);
        }
    }
}

/// In-order predecessor; mirror of [`next`].
///
/// # Safety
///
/// `node` must be linked into a live, well-formed tree.
pub unsafe fn prev(node: NonNull<RbNode>) -> Option<NonNull<RbNode>> {
    if let Some(mut n) = node.as_ref().left {
        while let Some(r) = n.as_ref().right {
            n = r;
        }
        return Some(n);
    }
    let mut n = node;
    loop {
        let parent = n.as_ref().parent()?;
        if parent.as_ref().left == Some(n) {
            n = parent;
        } else {
            return Some(parent);
        }
    }
}

#[inline]
unsafe fn is_black_or_nil(node: Option<NonNull<RbNode>>) -> bool {
    node.map_or(true, |n| n.as_ref().is_black())
}
