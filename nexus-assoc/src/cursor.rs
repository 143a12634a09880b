//! Position handles into a container.
//!
//! A [`Cursor`] is a small `Copy` value that names one element (or the end
//! position) of one container. It does not borrow the container: the
//! container resolves it on every use and rejects it with
//! [`Error::ForeignCursor`] or [`Error::StaleCursor`] when it no longer
//! applies. Cursors stay valid across unrelated inserts and erases.
//!
//! # Swap hazard
//!
//! A container's identity travels with its storage. After `a.swap(&mut b)`,
//! cursors taken from `a` address elements that now live in `b`; they are
//! accepted by `b` and rejected by `a`.

use crate::node::{NodeId, OwnerId};
use crate::Error;

/// Handle to an element or the end position of a container.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub(crate) owner: OwnerId,
    pub(crate) node: NodeId,
    pub(crate) stamp: u64,
}

impl Cursor {
    #[inline]
    pub(crate) fn new(owner: OwnerId, node: NodeId, stamp: u64) -> Self {
        Self { owner, node, stamp }
    }

    #[inline]
    pub(crate) fn end(owner: OwnerId) -> Self {
        Self::new(owner, NodeId::NONE, 0)
    }

    /// Returns `true` if this is the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Compares two positions of the same container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignCursor`] if the cursors come from different
    /// containers.
    pub fn equals(&self, other: &Cursor) -> Result<bool, Error> {
        if self.owner != other.owner {
            return Err(Error::ForeignCursor);
        }
        Ok(self.node == other.node && self.stamp == other.stamp)
    }
}

/// Reverse position: refers to the element one before its base.
///
/// `rbegin()` has `end()` as its base, `rend()` has `begin()`.
#[derive(Debug, Clone, Copy)]
pub struct RevCursor {
    base: Cursor,
}

impl RevCursor {
    /// Wraps a forward cursor.
    #[inline]
    pub fn new(base: Cursor) -> Self {
        Self { base }
    }

    /// Returns the forward cursor this reverse cursor is based on.
    #[inline]
    pub fn base(&self) -> Cursor {
        self.base
    }

    /// Compares two reverse positions of the same container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignCursor`] if the cursors come from different
    /// containers.
    pub fn equals(&self, other: &RevCursor) -> Result<bool, Error> {
        self.base.equals(&other.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_cursors_compare_equal() {
        let owner = OwnerId::next();
        assert!(Cursor::end(owner).equals(&Cursor::end(owner)).unwrap());
        assert!(Cursor::end(owner).is_end());
    }

    #[test]
    fn stamp_distinguishes_reused_slot() {
        let owner = OwnerId::next();
        let a = Cursor::new(owner, NodeId::from_slot(3), 1);
        let b = Cursor::new(owner, NodeId::from_slot(3), 2);
        assert!(!a.equals(&b).unwrap());
    }

    #[test]
    fn cross_container_comparison_is_rejected() {
        let a = Cursor::end(OwnerId::next());
        let b = Cursor::end(OwnerId::next());
        assert_eq!(a.equals(&b), Err(Error::ForeignCursor));
        assert_eq!(
            RevCursor::new(a).equals(&RevCursor::new(b)),
            Err(Error::ForeignCursor)
        );
    }
}
