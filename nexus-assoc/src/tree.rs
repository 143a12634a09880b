//! Order index: an intrusive red-black tree over the element sequence.
//!
//! Tree links live in each node's `link` field, so the tree allocates
//! nothing of its own. Every insertion is placed in the sequence at the
//! spot its in-order position dictates:
//!
//! ```text
//! new node is the LEFT child of p   ──► insert before p
//! new node is the RIGHT child of p  ──► insert before successor(p)
//! ```
//!
//! which keeps sequence order equal to ascending key order at all times.
//! That in turn makes predecessor and successor O(1) sequence hops instead
//! of tree walks: the erase path takes its replacement node (the leftmost
//! node of the right subtree) straight from `seq.next`.
//!
//! # Invariants
//!
//! - the root is black
//! - a red node has no red child
//! - every root-to-nil path has the same number of black nodes
//!
//! Insert performs at most two rotations, erase at most three.

use crate::index::IndexStrategy;
use crate::node::NodeId;
use crate::policy::{Compare, KeyOf};
use crate::sequence::Sequence;

/// Red-black links of one node.
#[derive(Debug, Clone, Copy)]
pub struct TreeLink {
    parent: NodeId,
    left: NodeId,
    right: NodeId,
    red: bool,
}

impl Default for TreeLink {
    fn default() -> Self {
        Self {
            parent: NodeId::NONE,
            left: NodeId::NONE,
            right: NodeId::NONE,
            red: true,
        }
    }
}

/// Where a new node hangs off the tree.
#[derive(Debug, Clone, Copy)]
pub struct TreePlacement {
    parent: NodeId,
    left: bool,
}

/// Red-black order index keyed by a [`Compare`] policy.
#[derive(Debug, Clone)]
pub struct Tree<C> {
    root: NodeId,
    cmp: C,
}

impl<C: Default> Default for Tree<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

type Seq<T> = Sequence<T, TreeLink>;

#[inline]
fn parent<T>(seq: &Seq<T>, id: NodeId) -> NodeId {
    seq.link(id).parent
}

#[inline]
fn left<T>(seq: &Seq<T>, id: NodeId) -> NodeId {
    seq.link(id).left
}

#[inline]
fn right<T>(seq: &Seq<T>, id: NodeId) -> NodeId {
    seq.link(id).right
}

/// Nil children count as black.
#[inline]
fn is_red<T>(seq: &Seq<T>, id: NodeId) -> bool {
    id.is_some() && seq.link(id).red
}

#[inline]
fn set_red<T>(seq: &mut Seq<T>, id: NodeId, red: bool) {
    seq.link_mut(id).red = red;
}

#[inline]
fn set_parent<T>(seq: &mut Seq<T>, id: NodeId, parent: NodeId) {
    if id.is_some() {
        seq.link_mut(id).parent = parent;
    }
}

#[inline]
fn set_left<T>(seq: &mut Seq<T>, id: NodeId, child: NodeId) {
    seq.link_mut(id).left = child;
}

#[inline]
fn set_right<T>(seq: &mut Seq<T>, id: NodeId, child: NodeId) {
    seq.link_mut(id).right = child;
}

impl<C> Tree<C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        Self {
            root: NodeId::NONE,
            cmp,
        }
    }

    /// Returns the comparator.
    #[inline]
    pub fn compare(&self) -> &C {
        &self.cmp
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Points `parent`'s link that referred to `old` at `new`.
    fn replace_child<T>(&mut self, seq: &mut Seq<T>, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_none() {
            self.root = new;
        } else if left(seq, parent) == old {
            set_left(seq, parent, new);
        } else {
            set_right(seq, parent, new);
        }
    }

    fn rotate_left<T>(&mut self, seq: &mut Seq<T>, x: NodeId) {
        let y = right(seq, x);
        let inner = left(seq, y);

        set_right(seq, x, inner);
        set_parent(seq, inner, x);

        let xp = parent(seq, x);
        set_parent(seq, y, xp);
        self.replace_child(seq, xp, x, y);

        set_left(seq, y, x);
        set_parent(seq, x, y);
    }

    fn rotate_right<T>(&mut self, seq: &mut Seq<T>, x: NodeId) {
        let y = left(seq, x);
        let inner = right(seq, y);

        set_left(seq, x, inner);
        set_parent(seq, inner, x);

        let xp = parent(seq, x);
        set_parent(seq, y, xp);
        self.replace_child(seq, xp, x, y);

        set_right(seq, y, x);
        set_parent(seq, x, y);
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    fn transplant<T>(&mut self, seq: &mut Seq<T>, u: NodeId, v: NodeId) {
        let up = parent(seq, u);
        self.replace_child(seq, up, u, v);
        set_parent(seq, v, up);
    }

    fn insert_fixup<T>(&mut self, seq: &mut Seq<T>, mut z: NodeId) {
        // A red parent is never the root, so the grandparent exists.
        while is_red(seq, parent(seq, z)) {
            let mut p = parent(seq, z);
            let g = parent(seq, p);

            if p == left(seq, g) {
                let uncle = right(seq, g);
                if is_red(seq, uncle) {
                    set_red(seq, p, false);
                    set_red(seq, uncle, false);
                    set_red(seq, g, true);
                    z = g;
                    continue;
                }
                if z == right(seq, p) {
                    z = p;
                    self.rotate_left(seq, z);
                    p = parent(seq, z);
                }
                set_red(seq, p, false);
                set_red(seq, g, true);
                self.rotate_right(seq, g);
            } else {
                let uncle = left(seq, g);
                if is_red(seq, uncle) {
                    set_red(seq, p, false);
                    set_red(seq, uncle, false);
                    set_red(seq, g, true);
                    z = g;
                    continue;
                }
                if z == left(seq, p) {
                    z = p;
                    self.rotate_right(seq, z);
                    p = parent(seq, z);
                }
                set_red(seq, p, false);
                set_red(seq, g, true);
                self.rotate_left(seq, g);
            }
        }

        let root = self.root;
        set_red(seq, root, false);
    }

    /// Restores black height after removing a black node. `x` took its place
    /// (possibly nil) under `xp`.
    fn erase_fixup<T>(&mut self, seq: &mut Seq<T>, mut x: NodeId, mut xp: NodeId) {
        // While x carries an extra black its sibling is never nil.
        while x != self.root && !is_red(seq, x) {
            if x == left(seq, xp) {
                let mut w = right(seq, xp);
                if is_red(seq, w) {
                    set_red(seq, w, false);
                    set_red(seq, xp, true);
                    self.rotate_left(seq, xp);
                    w = right(seq, xp);
                }
                if !is_red(seq, left(seq, w)) && !is_red(seq, right(seq, w)) {
                    set_red(seq, w, true);
                    x = xp;
                    xp = parent(seq, x);
                } else {
                    if !is_red(seq, right(seq, w)) {
                        let wl = left(seq, w);
                        set_red(seq, wl, false);
                        set_red(seq, w, true);
                        self.rotate_right(seq, w);
                        w = right(seq, xp);
                    }
                    let xp_red = is_red(seq, xp);
                    set_red(seq, w, xp_red);
                    set_red(seq, xp, false);
                    let wr = right(seq, w);
                    set_red(seq, wr, false);
                    self.rotate_left(seq, xp);
                    x = self.root;
                    break;
                }
            } else {
                let mut w = left(seq, xp);
                if is_red(seq, w) {
                    set_red(seq, w, false);
                    set_red(seq, xp, true);
                    self.rotate_right(seq, xp);
                    w = left(seq, xp);
                }
                if !is_red(seq, left(seq, w)) && !is_red(seq, right(seq, w)) {
                    set_red(seq, w, true);
                    x = xp;
                    xp = parent(seq, x);
                } else {
                    if !is_red(seq, left(seq, w)) {
                        let wr = right(seq, w);
                        set_red(seq, wr, false);
                        set_red(seq, w, true);
                        self.rotate_left(seq, w);
                        w = left(seq, xp);
                    }
                    let xp_red = is_red(seq, xp);
                    set_red(seq, w, xp_red);
                    set_red(seq, xp, false);
                    let wl = left(seq, w);
                    set_red(seq, wl, false);
                    self.rotate_right(seq, xp);
                    x = self.root;
                    break;
                }
            }
        }

        if x.is_some() {
            set_red(seq, x, false);
        }
    }

    // ========================================================================
    // Searches
    // ========================================================================

    /// First node whose key is not less than `key`, or `NONE`.
    pub(crate) fn lower_bound<T, P>(&self, seq: &Seq<T>, key: &P::Key) -> NodeId
    where
        P: KeyOf<T>,
        C: Compare<P::Key>,
    {
        let mut x = self.root;
        let mut bound = NodeId::NONE;
        while x.is_some() {
            if !self.cmp.less(P::key(seq.value(x)), key) {
                bound = x;
                x = left(seq, x);
            } else {
                x = right(seq, x);
            }
        }
        bound
    }

    /// First node whose key is greater than `key`, or `NONE`.
    pub(crate) fn upper_bound<T, P>(&self, seq: &Seq<T>, key: &P::Key) -> NodeId
    where
        P: KeyOf<T>,
        C: Compare<P::Key>,
    {
        let mut x = self.root;
        let mut bound = NodeId::NONE;
        while x.is_some() {
            if self.cmp.less(key, P::key(seq.value(x))) {
                bound = x;
                x = left(seq, x);
            } else {
                x = right(seq, x);
            }
        }
        bound
    }

    #[inline]
    fn equivalent<T, P>(&self, seq: &Seq<T>, id: NodeId, key: &P::Key) -> bool
    where
        P: KeyOf<T>,
        C: Compare<P::Key>,
    {
        let other = P::key(seq.value(id));
        !self.cmp.less(other, key) && !self.cmp.less(key, other)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks every red-black and ordering invariant. Returns the black
    /// height of the tree.
    #[cfg(test)]
    pub(crate) fn validate<T, P>(&self, seq: &Seq<T>) -> usize
    where
        P: KeyOf<T>,
        C: Compare<P::Key>,
    {
        fn walk<T>(seq: &Seq<T>, x: NodeId, order: &mut Vec<NodeId>) -> usize {
            if x.is_none() {
                return 1;
            }
            let (l, r) = (left(seq, x), right(seq, x));
            for child in [l, r] {
                if child.is_some() {
                    assert_eq!(parent(seq, child), x, "broken parent link");
                    assert!(!(is_red(seq, x) && is_red(seq, child)), "red node with red child");
                }
            }
            let lh = walk(seq, l, order);
            order.push(x);
            let rh = walk(seq, r, order);
            assert_eq!(lh, rh, "unequal black height");
            lh + usize::from(!is_red(seq, x))
        }

        if self.root.is_none() {
            assert!(seq.is_empty(), "empty tree over non-empty sequence");
            return 0;
        }
        assert!(parent(seq, self.root).is_none(), "root has a parent");
        assert!(!is_red(seq, self.root), "red root");

        let mut order = Vec::with_capacity(seq.len());
        let height = walk(seq, self.root, &mut order);

        assert_eq!(order, seq.ids().collect::<Vec<_>>(), "sequence differs from in-order");
        for pair in order.windows(2) {
            let (a, b) = (P::key(seq.value(pair[0])), P::key(seq.value(pair[1])));
            assert!(!self.cmp.less(b, a), "sequence not sorted");
        }
        height
    }
}

impl<T, P, C> IndexStrategy<T, P> for Tree<C>
where
    P: KeyOf<T>,
    C: Compare<P::Key>,
{
    type Link = TreeLink;
    type Placement = TreePlacement;

    fn find(&self, seq: &Seq<T>, key: &P::Key) -> NodeId {
        // Descent yields the nearest candidate; re-compare for an exact hit.
        let candidate = self.lower_bound::<T, P>(seq, key);
        if candidate.is_some() && !self.cmp.less(key, P::key(seq.value(candidate))) {
            candidate
        } else {
            NodeId::NONE
        }
    }

    fn locate(&self, seq: &Seq<T>, key: &P::Key, unique: bool) -> Result<TreePlacement, NodeId> {
        let mut x = self.root;
        let mut parent = NodeId::NONE;
        let mut went_left = true;

        // Equivalent keys descend right, so a duplicate lands after its run.
        while x.is_some() {
            parent = x;
            went_left = self.cmp.less(key, P::key(seq.value(x)));
            x = if went_left { left(seq, x) } else { right(seq, x) };
        }

        if unique {
            // The only possible equivalent is the in-order predecessor.
            let pred = if !went_left {
                parent
            } else if parent.is_some() {
                seq.prev(parent)
            } else {
                NodeId::NONE
            };
            if pred.is_some() && !self.cmp.less(P::key(seq.value(pred)), key) {
                return Err(pred);
            }
        }

        Ok(TreePlacement {
            parent,
            left: went_left,
        })
    }

    fn locate_near(
        &self,
        seq: &Seq<T>,
        hint: NodeId,
        key: &P::Key,
        unique: bool,
    ) -> Option<TreePlacement> {
        let prev = seq.prev(hint);

        if prev.is_some() {
            let pk = P::key(seq.value(prev));
            let fits = if unique {
                self.cmp.less(pk, key)
            } else {
                !self.cmp.less(key, pk)
            };
            if !fits {
                return None;
            }
        }

        if hint.is_some() {
            let hk = P::key(seq.value(hint));
            let fits = if unique {
                self.cmp.less(key, hk)
            } else {
                !self.cmp.less(hk, key)
            };
            if !fits {
                return None;
            }
        }

        // Between prev and hint exactly one of these slots is free: hint's
        // left child, or prev's right child.
        let placement = if hint.is_some() && left(seq, hint).is_none() {
            TreePlacement {
                parent: hint,
                left: true,
            }
        } else if prev.is_some() {
            TreePlacement {
                parent: prev,
                left: false,
            }
        } else {
            TreePlacement {
                parent: NodeId::NONE,
                left: true,
            }
        };
        Some(placement)
    }

    fn position(&self, seq: &Seq<T>, placement: &TreePlacement) -> NodeId {
        if placement.parent.is_none() {
            NodeId::NONE
        } else if placement.left {
            placement.parent
        } else {
            seq.next(placement.parent)
        }
    }

    fn attach(&mut self, seq: &mut Seq<T>, id: NodeId, placement: TreePlacement) {
        *seq.link_mut(id) = TreeLink {
            parent: placement.parent,
            ..TreeLink::default()
        };

        if placement.parent.is_none() {
            self.root = id;
        } else if placement.left {
            set_left(seq, placement.parent, id);
        } else {
            set_right(seq, placement.parent, id);
        }

        self.insert_fixup(seq, id);
    }

    fn detach(&mut self, seq: &mut Seq<T>, z: NodeId) {
        let zl = left(seq, z);
        let zr = right(seq, z);

        let x;
        let xp;
        let removed_red;

        if zl.is_none() {
            x = zr;
            xp = parent(seq, z);
            removed_red = is_red(seq, z);
            self.transplant(seq, z, zr);
        } else if zr.is_none() {
            x = zl;
            xp = parent(seq, z);
            removed_red = is_red(seq, z);
            self.transplant(seq, z, zl);
        } else {
            // In-order successor: leftmost of the right subtree.
            let y = seq.next(z);
            removed_red = is_red(seq, y);
            x = right(seq, y);

            if parent(seq, y) == z {
                xp = y;
            } else {
                xp = parent(seq, y);
                self.transplant(seq, y, x);
                set_right(seq, y, zr);
                set_parent(seq, zr, y);
            }

            self.transplant(seq, z, y);
            set_left(seq, y, zl);
            set_parent(seq, zl, y);
            let z_red = is_red(seq, z);
            set_red(seq, y, z_red);
        }

        if !removed_red {
            self.erase_fixup(seq, x, xp);
        }

        *seq.link_mut(z) = TreeLink::default();
    }

    fn equal_range(&self, seq: &Seq<T>, key: &P::Key) -> (NodeId, NodeId) {
        let first = self.lower_bound::<T, P>(seq, key);
        if first.is_none() || !self.equivalent::<T, P>(seq, first, key) {
            return (first, first);
        }
        (first, self.upper_bound::<T, P>(seq, key))
    }

    fn clear(&mut self) {
        self.root = NodeId::NONE;
    }
}
