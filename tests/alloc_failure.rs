//! A failed node allocation is reported and leaves the tree as it was.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::cmp::Ordering;
use std::ptr;

use avl::{Insertion, OnDuplicate, Order, Removal, Tree, TreeError};

/// The system allocator, except that it refuses every allocation made on a thread while that
/// thread has set `REFUSE`.
struct Refusing;

thread_local! {
    static REFUSE: Cell<bool> = const { Cell::new(false) };
}

unsafe impl GlobalAlloc for Refusing {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if REFUSE.with(Cell::get) {
            return ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOCATOR: Refusing = Refusing;

/// Runs `f` with every allocation on this thread failing.
fn refusing<R>(f: impl FnOnce() -> R) -> R {
    REFUSE.with(|refuse| refuse.set(true));
    let result = f();
    REFUSE.with(|refuse| refuse.set(false));
    result
}

type IntTree = Tree<i32, fn(&i32, &i32) -> Ordering>;

fn tree_of(keys: &[i32]) -> IntTree {
    let mut tree: IntTree = Tree::new(i32::cmp);
    for &key in keys {
        tree.insert(key, OnDuplicate::Reject).unwrap();
    }
    tree
}

fn pre_order(tree: &IntTree) -> Vec<i32> {
    let mut out = Vec::new();
    tree.traverse(Order::PreOrder, |n| out.push(*n));
    out
}

#[test]
fn failed_insert_leaves_tree_unchanged() {
    let mut tree = tree_of(&[30, 10, 28, 50, 29, 55]);
    let before = pre_order(&tree);

    // 5 would land under 10 without rotating, 56 would rotate the right subtree.
    for key in [5, 56] {
        let result = refusing(|| tree.insert(key, OnDuplicate::Reject));

        assert!(matches!(result, Err(TreeError::AllocationFailure { .. })));
        assert_eq!(pre_order(&tree), before);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.find(&key), None);
    }

    // The tree still works once memory is back.
    assert_eq!(tree.insert(5, OnDuplicate::Reject), Ok(Insertion::Inserted));
    assert_eq!(pre_order(&tree), [30, 28, 10, 5, 29, 50, 55]);
}

#[test]
fn failed_insert_into_empty_tree() {
    let mut tree = tree_of(&[]);

    let result = refusing(|| tree.insert(1, OnDuplicate::Reject));

    assert!(matches!(result, Err(TreeError::AllocationFailure { size }) if size > 0));
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
}

#[test]
fn duplicates_and_removal_need_no_allocation() {
    let mut tree = tree_of(&[30, 10, 28, 50, 29, 55]);

    let (rejected, replaced, removed) = refusing(|| {
        (
            tree.insert(28, OnDuplicate::Reject),
            tree.insert(28, OnDuplicate::Replace),
            tree.remove(&30),
        )
    });

    assert_eq!(rejected, Ok(Insertion::Rejected(28)));
    assert_eq!(replaced, Ok(Insertion::Replaced));
    assert_eq!(removed, Removal::Removed);
    assert_eq!(pre_order(&tree), [50, 28, 10, 29, 55]);
}

#[test]
fn allocation_failure_message_names_size() {
    let error = TreeError::AllocationFailure { size: 32 };

    assert_eq!(
        error.to_string(),
        "failed to allocate a tree node of 32 bytes"
    );
}
