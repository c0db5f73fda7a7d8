//! An AVL tree of caller supplied payloads, ordered by a caller supplied comparator.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. Here a `Node` stores one payload
//! and owns up to two child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the payloads in its left subtree compare
//!    `Less` than its own payload.
//! 2. For every `Node` in a BST, all the payloads in its right subtree compare
//!    `Greater` than its own payload.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! No two `Node`s hold payloads that compare `Equal`: inserting a duplicate either
//! replaces the stored payload or is rejected, see [`OnDuplicate`].
//!
//! ## AVL trees
//!
//! Searching takes `O(height)` where `height` is the longest path from the root
//! to a leaf. An AVL tree keeps that at `O(lg N)` by caching the height of every
//! subtree and, after every insert or remove, rotating any `Node` whose subtrees'
//! heights differ by more than one. The heights are counted in edges: a leaf has
//! height `0` and an empty subtree `-1`.
//!
//! ## Payload ownership
//!
//! A [`Tree`] owns every payload inserted into it. Payloads leave the tree either
//! by being handed back ([`Tree::take`], [`Tree::into_payloads`], a rejected
//! insert) or by being released ([`Tree::remove`], [`Tree::destroy`]), which calls
//! the release hook given to [`Tree::with_release`].

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod node;
mod traverse;
mod tree;

pub use error::{Insertion, OnDuplicate, Removal, TreeError};
pub use traverse::Order;
pub use tree::Tree;
