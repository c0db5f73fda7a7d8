//! The owned node graph behind a [`Tree`][crate::Tree] and the recursive algorithms that keep it
//! balanced.
//!
//! Every subtree is a [`Link`], an exclusively owned, possibly empty, boxed [`Node`]. All
//! algorithms take `&mut Link<T>` so that they can replace the root of the subtree they were
//! handed (after a rotation or a splice) without the parent having to know what happened.

use std::alloc::{self, Layout};
use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

use crate::error::{Insertion, OnDuplicate, TreeError};

/// Height of an empty subtree. A leaf has height `0`.
pub(crate) const EMPTY_HEIGHT: isize = -1;

/// An owned, possibly empty, subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) payload: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    /// How many edges are on the longest path from this node down to a leaf.
    pub(crate) height: isize,
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("payload", &self.payload)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

/// The cached height of a subtree, [`EMPTY_HEIGHT`] when there is no subtree.
pub(crate) fn height<T>(link: &Link<T>) -> isize {
    link.as_ref().map_or(EMPTY_HEIGHT, |n| n.height)
}

impl<T> Node<T> {
    /// Allocates a leaf holding `payload`. The allocation is checked so that running out of
    /// memory surfaces as [`TreeError::AllocationFailure`] instead of aborting. Nothing in the
    /// tree has been touched when this fails, which is what lets `insert` bail out with `?`.
    fn try_new_boxed(payload: T) -> Result<Box<Self>, TreeError> {
        let layout = Layout::new::<Self>();

        // SAFETY: `Node` always contains its `height` so `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(ptr) = NonNull::new(ptr) else {
            tracing::debug!(size = layout.size(), "node allocation failed");
            return Err(TreeError::AllocationFailure {
                size: layout.size(),
            });
        };

        // SAFETY: `ptr` is non-null, was just allocated by the global allocator with the layout of
        // `Node<T>` and is uninitialized, so writing a whole `Node` into it is sound. After the
        // write it holds a valid `Node` allocated the way `Box` expects, so `Box` may own it.
        unsafe {
            ptr.as_ptr().write(Node {
                payload,
                left: None,
                right: None,
                height: 0,
            });
            Ok(Box::from_raw(ptr.as_ptr()))
        }
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The height of the left subtree minus the height of the right subtree. Positive means
    /// left-heavy. See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) - height(&self.right)
    }

    pub(crate) fn find<C>(&self, probe: &T, compare: &C) -> Option<&T>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        match compare(probe, &self.payload) {
            Ordering::Less => self.left.as_ref().and_then(|n| n.find(probe, compare)),
            Ordering::Equal => Some(&self.payload),
            Ordering::Greater => self.right.as_ref().and_then(|n| n.find(probe, compare)),
        }
    }

    pub(crate) fn find_mut<C>(&mut self, probe: &T, compare: &C) -> Option<&mut T>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        match compare(probe, &self.payload) {
            Ordering::Less => self.left.as_mut().and_then(|n| n.find_mut(probe, compare)),
            Ordering::Equal => Some(&mut self.payload),
            Ordering::Greater => self.right.as_mut().and_then(|n| n.find_mut(probe, compare)),
        }
    }
}

/// Inserts `payload` into the subtree at `link`, rebalancing on the way back up.
///
/// On allocation failure the error is propagated before any frame has reattached or rebalanced
/// anything, so the subtree is exactly as it was.
pub(crate) fn insert<T, C>(
    link: &mut Link<T>,
    payload: T,
    on_duplicate: OnDuplicate,
    compare: &C,
) -> Result<Insertion<T>, TreeError>
where
    C: Fn(&T, &T) -> Ordering,
{
    let Some(node) = link.as_mut() else {
        *link = Some(Node::try_new_boxed(payload)?);
        return Ok(Insertion::Inserted);
    };

    let insertion = match compare(&payload, &node.payload) {
        Ordering::Less => insert(&mut node.left, payload, on_duplicate, compare)?,
        Ordering::Greater => insert(&mut node.right, payload, on_duplicate, compare)?,
        Ordering::Equal => {
            return Ok(match on_duplicate {
                OnDuplicate::Replace => {
                    // The previous payload is dropped here, the release hook is not involved.
                    node.payload = payload;
                    Insertion::Replaced
                }
                OnDuplicate::Reject => Insertion::Rejected(payload),
            });
        }
    };

    if let Insertion::Inserted = insertion {
        balance(link);
    }
    Ok(insertion)
}

/// Detaches the node matching `probe` from the subtree at `link` and returns its payload. Returns
/// `None`, without touching the subtree, when nothing matches.
pub(crate) fn remove<T, C>(link: &mut Link<T>, probe: &T, compare: &C) -> Option<T>
where
    C: Fn(&T, &T) -> Ordering,
{
    let node = link.as_mut()?;

    let removed = match compare(probe, &node.payload) {
        Ordering::Less => remove(&mut node.left, probe, compare)?,
        Ordering::Greater => remove(&mut node.right, probe, compare)?,
        Ordering::Equal if node.left.is_some() && node.right.is_some() => {
            // Promote from the taller subtree, ties go to the right.
            let promoted = if height(&node.left) > height(&node.right) {
                tracing::trace!(from = "left", "promoting predecessor");
                take_max(&mut node.left)
            } else {
                tracing::trace!(from = "right", "promoting successor");
                take_min(&mut node.right)
            };
            std::mem::replace(&mut node.payload, promoted)
        }
        Ordering::Equal => splice(link),
    };

    balance(link);
    Some(removed)
}

/// Replaces a node that has at most one child with that child and returns the node's payload.
///
/// ## Panics
///
/// When `link` is empty.
fn splice<T>(link: &mut Link<T>) -> T {
    let detached = link.take().expect("Splicing requires a node");
    let Node {
        payload,
        left,
        right,
        ..
    } = *detached;

    debug_assert!(left.is_none() || right.is_none());
    *link = left.or(right);
    payload
}

/// Detaches the smallest node of a non-empty subtree, rebalancing every ancestor it had within
/// the subtree.
fn take_min<T>(link: &mut Link<T>) -> T {
    let node = link.as_mut().expect("Promotion source is never empty");
    if node.left.is_none() {
        return splice(link);
    }

    let min = take_min(&mut node.left);
    balance(link);
    min
}

/// Mirror of [`take_min`].
fn take_max<T>(link: &mut Link<T>) -> T {
    let node = link.as_mut().expect("Promotion source is never empty");
    if node.right.is_none() {
        return splice(link);
    }

    let max = take_max(&mut node.right);
    balance(link);
    max
}

/// Recomputes the height of the subtree root and, if it's more than one level out of balance,
/// rotates it back into shape. The subtree root may change.
///
/// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
pub(crate) fn balance<T>(link: &mut Link<T>) {
    let Some(node) = link.as_mut() else {
        return;
    };
    node.fix_height();

    let factor = node.balance_factor();
    if factor.abs() > 1 {
        tracing::trace!(factor = factor as i64, height = node.height as i64, "rebalancing");
    }
    if factor > 1 {
        if node.left.as_ref().map_or(0, |n| n.balance_factor()) < 0 {
            rotate_left(&mut node.left);
        }
        rotate_right(link);
    } else if factor < -1 {
        if node.right.as_ref().map_or(0, |n| n.balance_factor()) > 0 {
            rotate_right(&mut node.right);
        }
        rotate_left(link);
    }

    if cfg!(debug_assertions) {
        let Some(root) = link.as_ref() else {
            return;
        };
        let left_height = height(&root.left);
        let right_height = height(&root.right);
        assert_eq!(root.height, left_height.max(right_height) + 1);
        assert!((left_height - right_height).abs() <= 1);
    }
}

/// Rotate the subtree to the right. This moves the left child up vertically and the old root down
/// vertically. Used to rebalance the tree when the left child is too tall. As such, it must only
/// be called when there _is_ a left child.
///
/// ## Panics
///
/// When called on a subtree without a left child.
///
/// # Diagram
///
/// ```text
///        old_root              new_root
///         /     \               /    \
///    new_root    z   rotate ->  x   old_root
///     /  \                          /    \
///    x    y                        y      z
/// ```
pub(crate) fn rotate_right<T>(link: &mut Link<T>) {
    let mut old_root = link.take().expect("Cannot rotate an empty subtree");
    let mut new_root = old_root.left.take().expect("Rotate right => left child");

    // The old root is now the child so its height has to be settled first.
    old_root.left = new_root.right.take();
    old_root.fix_height();

    new_root.right = Some(old_root);
    new_root.fix_height();
    tracing::trace!(height = new_root.height, "rotated right");

    *link = Some(new_root);
}

/// Mirror of [`rotate_right`]: the right child becomes the subtree root.
///
/// ## Panics
///
/// When called on a subtree without a right child.
pub(crate) fn rotate_left<T>(link: &mut Link<T>) {
    let mut old_root = link.take().expect("Cannot rotate an empty subtree");
    let mut new_root = old_root.right.take().expect("Rotate left => right child");

    old_root.right = new_root.left.take();
    old_root.fix_height();

    new_root.left = Some(old_root);
    new_root.fix_height();
    tracing::trace!(height = new_root.height, "rotated left");

    *link = Some(new_root);
}

/// Frees every node of the subtree in post-order, handing each payload to `release` exactly once.
///
/// Uses an explicit stack rather than recursion so that teardown doesn't depend on how deep the
/// host stack is.
pub(crate) fn teardown<T>(root: Link<T>, mut release: impl FnMut(T)) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();

    while let Some(mut node) = stack.pop() {
        match (node.left.take(), node.right.take()) {
            (None, None) => release(node.payload),
            (left, right) => {
                // Revisit `node` once both of its (now detached) subtrees are gone.
                stack.push(node);
                stack.extend(right);
                stack.extend(left);
            }
        }
    }
}
