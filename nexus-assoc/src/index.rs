//! The seam between a container and the index that orders or hashes it.
//!
//! An index never owns nodes. It keeps per-node state in `Node::link` and
//! answers two questions for the container: "where is key `k`?" and "where
//! does a new element with key `k` go?". The container then performs the
//! sequence mutation and tells the index about it.
//!
//! ```text
//! insert:  locate ──► sequence.insert_before(position) ──► attach ──► grow
//! erase:   detach (sequence still intact) ──► sequence.remove
//! ```

use crate::node::NodeId;
use crate::policy::KeyOf;
use crate::sequence::Sequence;

/// Index over an element sequence.
///
/// Implemented by [`Tree`](crate::Tree) and [`Hashed`](crate::Hashed).
pub trait IndexStrategy<T, P: KeyOf<T>> {
    /// Per-node state stored alongside every element.
    type Link: Default;

    /// Where a new element goes, as computed by `locate`.
    type Placement;

    /// Some element whose key is equivalent to `key`, or `NONE`.
    ///
    /// For ordered indexes this is the first such element.
    fn find(&self, seq: &Sequence<T, Self::Link>, key: &P::Key) -> NodeId;

    /// Computes the placement of a new element.
    ///
    /// With `unique`, an existing equivalent element is returned as `Err`
    /// and nothing should be inserted.
    fn locate(
        &self,
        seq: &Sequence<T, Self::Link>,
        key: &P::Key,
        unique: bool,
    ) -> Result<Self::Placement, NodeId>;

    /// Computes a placement directly before `hint` (`NONE` = end), or `None`
    /// if that spot is not consistent with the index.
    fn locate_near(
        &self,
        seq: &Sequence<T, Self::Link>,
        hint: NodeId,
        key: &P::Key,
        unique: bool,
    ) -> Option<Self::Placement>;

    /// The sequence node the new element must be inserted before.
    fn position(&self, seq: &Sequence<T, Self::Link>, placement: &Self::Placement) -> NodeId;

    /// Registers a node that was just inserted at `position(placement)`.
    fn attach(&mut self, seq: &mut Sequence<T, Self::Link>, id: NodeId, placement: Self::Placement);

    /// Deregisters a node. The sequence must still contain it.
    fn detach(&mut self, seq: &mut Sequence<T, Self::Link>, id: NodeId);

    /// Half-open run `[first, last)` of elements equivalent to `key`.
    /// Empty (`first == last`) when there is none.
    fn equal_range(&self, seq: &Sequence<T, Self::Link>, key: &P::Key) -> (NodeId, NodeId);

    /// Called once after an insert or a batch of inserts.
    fn grow(&mut self, _seq: &Sequence<T, Self::Link>) {}

    /// Forgets every node. The sequence is cleared separately.
    fn clear(&mut self);
}
