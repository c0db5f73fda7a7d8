//! Outcomes of the mutating [`Tree`][crate::Tree] operations.
//!
//! Only a failed node allocation is an error. A duplicate key or a missing key are ordinary
//! outcomes and are reported through [`Insertion`] and [`Removal`].

/// The ways a tree operation can fail. A failed operation never leaves the tree partially
/// restructured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The allocator could not provide memory for a new node.
    #[error("failed to allocate a tree node of {size} bytes")]
    AllocationFailure {
        /// Size in bytes of the node that could not be allocated.
        size: usize,
    },
}

/// What to do when an inserted payload compares `Equal` to one already in the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Drop the stored payload and keep the new one in its place.
    Replace,
    /// Leave the stored payload untouched and hand the new one back.
    Reject,
}

/// Result of a successful [`Tree::insert`][crate::Tree::insert].
#[derive(Debug, PartialEq, Eq)]
pub enum Insertion<T> {
    /// A new node was created for the payload.
    Inserted,
    /// An equal payload was already stored and has been replaced.
    Replaced,
    /// An equal payload was already stored and the tree is unchanged. The rejected payload is
    /// returned to the caller.
    Rejected(T),
}

impl<T> Insertion<T> {
    /// Whether the tree now stores the inserted payload.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Result of [`Tree::remove`][crate::Tree::remove].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Removal {
    /// A matching payload was detached and released.
    Removed,
    /// Nothing in the tree matched. The tree is unchanged.
    NotFound,
}
