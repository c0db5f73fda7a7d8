//! The tree handle. A [`Tree`] owns the root of the node graph, the comparator that orders its
//! payloads and, optionally, a release hook that is called when the tree is asked to dispose of
//! a payload.
//!
//! # Examples
//!
//! ```
//! use avl::{Insertion, OnDuplicate, Order, Removal, Tree};
//!
//! let mut tree = Tree::new(i32::cmp);
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), None);
//!
//! assert_eq!(tree.insert(1, OnDuplicate::Reject), Ok(Insertion::Inserted));
//! assert_eq!(tree.find(&1), Some(&1));
//!
//! // An equal payload is handed back unless replacing is requested.
//! assert_eq!(tree.insert(1, OnDuplicate::Reject), Ok(Insertion::Rejected(1)));
//! assert_eq!(tree.insert(1, OnDuplicate::Replace), Ok(Insertion::Replaced));
//!
//! tree.insert(0, OnDuplicate::Reject).unwrap();
//! tree.insert(2, OnDuplicate::Reject).unwrap();
//!
//! let mut sorted = Vec::new();
//! tree.traverse(Order::InOrder, |n| sorted.push(*n));
//! assert_eq!(sorted, [0, 1, 2]);
//!
//! assert_eq!(tree.remove(&1), Removal::Removed);
//! assert_eq!(tree.remove(&1), Removal::NotFound);
//! ```

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::ops::ControlFlow;

use crate::error::{Insertion, OnDuplicate, Removal, TreeError};
use crate::node::{self, Link};
use crate::traverse::{self, Order};

/// A self-balancing Binary Search Tree (specifically, an AVL tree) of payloads ordered by a
/// comparator. Payloads play the role of both key and value: looking one up means handing the
/// tree a probe payload that compares `Equal` to the stored one.
///
/// `R` is the release hook, see [`Tree::with_release`]. Trees built with [`Tree::new`] have none.
pub struct Tree<T, C, R = fn(T)> {
    root: Link<T>,
    compare: C,
    release: Option<R>,
    len: usize,
}

impl<T, C, R> Drop for Tree<T, C, R> {
    fn drop(&mut self) {
        // Structural free only, the release hook is reserved for `destroy`.
        node::teardown(self.root.take(), drop);
    }
}

impl<T, C, R> fmt::Debug for Tree<T, C, R>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl<T, C> Tree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Generate a new, empty `Tree` ordered by `compare`.
    ///
    /// `compare(candidate, existing)` is asked where `candidate` (a payload being inserted or a
    /// probe being looked up) goes relative to a payload `existing` already in the tree:
    ///
    /// * `Less` sends it into `existing`'s left subtree,
    /// * `Greater` sends it into the right subtree,
    /// * `Equal` means `existing` is the match.
    ///
    /// So an in-order traversal lists payloads from the smallest to the largest under `compare`,
    /// and `Ord::cmp` gives an ascending tree. `compare` must be a strict total order, the shape
    /// of the tree is unspecified otherwise.
    ///
    /// Payloads released by the tree are simply dropped. See [`Tree::with_release`] to hook in.
    pub fn new(compare: C) -> Self {
        Self {
            root: None,
            compare,
            release: None,
            len: 0,
        }
    }
}

impl<T, C, R> Tree<T, C, R>
where
    C: Fn(&T, &T) -> Ordering,
    R: FnMut(T),
{
    /// Like [`Tree::new`] but `release` is called with every payload the tree disposes of through
    /// [`Tree::remove`] and [`Tree::destroy`]. The hook may borrow from its surroundings, the tree
    /// then can't outlive what it borrows.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut released = Vec::new();
    /// let mut tree = Tree::with_release(i32::cmp, |n: i32| released.push(n));
    ///
    /// tree.insert(1, OnDuplicate::Reject).unwrap();
    /// tree.insert(2, OnDuplicate::Reject).unwrap();
    /// tree.remove(&1);
    /// tree.destroy();
    ///
    /// assert_eq!(released, [1, 2]);
    /// ```
    pub fn with_release(compare: C, release: R) -> Self {
        Self {
            root: None,
            compare,
            release: Some(release),
            len: 0,
        }
    }

    /// Potentially finds the stored payload comparing `Equal` to `probe`. If nothing matches,
    /// `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// tree.insert(1, OnDuplicate::Reject).unwrap();
    ///
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, probe: &T) -> Option<&T> {
        self.root.as_ref().and_then(|n| n.find(probe, &self.compare))
    }

    /// Mutable access to the stored payload comparing `Equal` to `probe`.
    ///
    /// Only change parts of the payload that `compare` ignores. Changing its position in the
    /// ordering leaves the tree unable to find it (and others) again.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut tree = Tree::new(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
    /// tree.insert((28, 'o'), OnDuplicate::Reject).unwrap();
    ///
    /// tree.find_mut(&(28, '?')).unwrap().1 = 'n';
    /// assert_eq!(tree.find(&(28, '?')), Some(&(28, 'n')));
    /// ```
    pub fn find_mut(&mut self, probe: &T) -> Option<&mut T> {
        let compare = &self.compare;
        self.root.as_mut().and_then(|n| n.find_mut(probe, compare))
    }

    /// Inserts `payload`, taking ownership of it. What happens when an equal payload is already
    /// stored is decided by `on_duplicate`: a replaced payload is dropped (not released), a
    /// rejected one is handed back inside [`Insertion::Rejected`].
    ///
    /// # Errors
    ///
    /// [`TreeError::AllocationFailure`] when no memory could be had for a new node. The tree is
    /// left exactly as it was and `payload` is dropped.
    pub fn insert(
        &mut self,
        payload: T,
        on_duplicate: OnDuplicate,
    ) -> Result<Insertion<T>, TreeError> {
        let insertion = node::insert(&mut self.root, payload, on_duplicate, &self.compare)?;
        if let Insertion::Inserted = insertion {
            self.len += 1;
        }
        Ok(insertion)
    }

    /// Removes the payload comparing `Equal` to `probe` and releases it, through the release
    /// hook if the tree has one. If nothing matches, the tree is untouched and
    /// [`Removal::NotFound`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Removal, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// tree.insert(1, OnDuplicate::Reject).unwrap();
    ///
    /// assert_eq!(tree.remove(&1), Removal::Removed);
    /// assert_eq!(tree.find(&1), None);
    /// assert_eq!(tree.remove(&1), Removal::NotFound);
    /// ```
    pub fn remove(&mut self, probe: &T) -> Removal {
        match self.take(probe) {
            Some(payload) => {
                match self.release.as_mut() {
                    Some(release) => release(payload),
                    None => drop(payload),
                }
                Removal::Removed
            }
            None => Removal::NotFound,
        }
    }

    /// Removes the payload comparing `Equal` to `probe` and hands it back instead of releasing
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut tree = Tree::new(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
    /// tree.insert((1, 'a'), OnDuplicate::Reject).unwrap();
    ///
    /// assert_eq!(tree.take(&(1, '?')), Some((1, 'a')));
    /// assert_eq!(tree.take(&(1, '?')), None);
    /// ```
    pub fn take(&mut self, probe: &T) -> Option<T> {
        let removed = node::remove(&mut self.root, probe, &self.compare)?;
        self.len -= 1;
        Some(removed)
    }

    /// Tears the tree down in post-order, calling the release hook with every payload (or
    /// dropping them when there is no hook).
    pub fn destroy(mut self) {
        let root = self.root.take();
        tracing::trace!(len = self.len, "destroying tree");

        match self.release.as_mut() {
            Some(release) => node::teardown(root, release),
            None => node::teardown(root, drop),
        }
        self.len = 0;
    }
}

impl<T, C, R> Tree<T, C, R> {
    /// Number of payloads in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of edges on the longest path from the root to a leaf. A single payload has height
    /// `0`, an empty tree `-1`.
    pub fn height(&self) -> isize {
        node::height(&self.root)
    }

    /// Calls `visit` with every payload exactly once, in the given `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Order, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// for n in [30, 10, 28, 50, 29, 55] {
    ///     tree.insert(n, OnDuplicate::Reject).unwrap();
    /// }
    ///
    /// let mut pre_order = Vec::new();
    /// tree.traverse(Order::PreOrder, |n| pre_order.push(*n));
    /// assert_eq!(pre_order, [30, 28, 10, 29, 50, 55]);
    /// ```
    pub fn traverse(&self, order: Order, mut visit: impl FnMut(&T)) {
        let flow = self.traverse_until(order, |payload| -> ControlFlow<Infallible> {
            visit(payload);
            ControlFlow::Continue(())
        });
        match flow {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(never) => match never {},
        }
    }

    /// Like [`Tree::traverse`] but `visit` can stop the walk early by returning
    /// `ControlFlow::Break`, whose value is then returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    ///
    /// use avl::{OnDuplicate, Order, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// for n in 1..=9 {
    ///     tree.insert(n, OnDuplicate::Reject).unwrap();
    /// }
    ///
    /// let first_even = tree.traverse_until(Order::InOrder, |n| {
    ///     if n % 2 == 0 {
    ///         ControlFlow::Break(*n)
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(first_even, ControlFlow::Break(2));
    /// ```
    pub fn traverse_until<B>(
        &self,
        order: Order,
        mut visit: impl FnMut(&T) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        traverse::walk(&self.root, order, &mut visit)
    }

    /// Draws the shape of the tree sideways, one payload per line as formatted by `label`. The
    /// root is in the first column, the right subtree is above it and the left subtree below.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// for n in [2, 1, 3] {
    ///     tree.insert(n, OnDuplicate::Reject).unwrap();
    /// }
    ///
    /// let expected = format!("{:10}3\n2\n{:10}1\n", "", "");
    /// assert_eq!(tree.render(|n| *n), expected);
    /// ```
    pub fn render<D>(&self, mut label: impl FnMut(&T) -> D) -> String
    where
        D: fmt::Display,
    {
        let mut out = String::new();
        traverse::render(&self.root, 0, &mut label, &mut out);
        out
    }

    /// Tears the tree down in post-order and hands every payload back without releasing any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{OnDuplicate, Tree};
    ///
    /// let mut tree = Tree::new(i32::cmp);
    /// for n in [2, 1, 3] {
    ///     tree.insert(n, OnDuplicate::Reject).unwrap();
    /// }
    ///
    /// assert_eq!(tree.into_payloads(), [1, 3, 2]);
    /// ```
    pub fn into_payloads(mut self) -> Vec<T> {
        let mut payloads = Vec::with_capacity(self.len);
        node::teardown(self.root.take(), |payload| payloads.push(payload));
        self.len = 0;
        payloads
    }
}
