use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

use avl::{Insertion, OnDuplicate, Order, Removal, Tree};

fn tree_of(xs: &[i16]) -> Tree<i16, fn(&i16, &i16) -> Ordering> {
    let mut tree = Tree::new(i16::cmp as fn(&i16, &i16) -> Ordering);
    for x in xs {
        tree.insert(*x, OnDuplicate::Reject).unwrap();
    }
    tree
}

fn collect<T: Copy, C>(tree: &Tree<T, C>, order: Order) -> Vec<T> {
    let mut out = Vec::new();
    tree.traverse(order, |x| out.push(*x));
    out
}

/// The classic AVL bound: a tree of `n` nodes is never taller than
/// `1.44 * lg(n + 2) - 0.328` levels.
fn within_avl_bound(height: isize, len: usize) -> bool {
    let levels = (height + 1) as f64;
    levels <= 1.4405 * ((len + 2) as f64).log2() - 0.3277
}

quickcheck::quickcheck! {
    fn in_order_is_strictly_ascending(xs: Vec<i16>) -> bool {
        let tree = tree_of(&xs);

        let expected: Vec<_> = xs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        collect(&tree, Order::InOrder) == expected && tree.len() == expected.len()
    }
}

quickcheck::quickcheck! {
    fn height_stays_logarithmic(xs: Vec<i16>, deletes: Vec<i16>) -> bool {
        let mut tree = tree_of(&xs);
        let mut present: BTreeSet<_> = xs.iter().copied().collect();
        if tree.len() != present.len() || !within_avl_bound(tree.height(), tree.len()) {
            return false;
        }

        for delete in &deletes {
            let len_before = tree.len();
            let expected = if present.remove(delete) {
                Removal::Removed
            } else {
                Removal::NotFound
            };
            let removal = tree.remove(delete);

            let len_after = match removal {
                Removal::Removed => len_before - 1,
                Removal::NotFound => len_before,
            };
            if removal != expected
                || tree.len() != len_after
                || !within_avl_bound(tree.height(), tree.len())
            {
                return false;
            }
        }
        true
    }
}

quickcheck::quickcheck! {
    fn insert_then_remove_round_trips(xs: Vec<i16>, x: i16) -> bool {
        let mut tree = tree_of(&xs);
        if tree.find(&x).is_some() {
            return true;
        }
        let before = collect(&tree, Order::InOrder);

        tree.insert(x, OnDuplicate::Reject) == Ok(Insertion::Inserted)
            && tree.remove(&x) == Removal::Removed
            && collect(&tree, Order::InOrder) == before
    }
}

quickcheck::quickcheck! {
    fn replace_keeps_shape_and_swaps_payload(xs: Vec<i16>, pick: usize) -> bool {
        if xs.is_empty() {
            return true;
        }
        let key = xs[pick % xs.len()];

        let mut tree = Tree::new(|a: &Rc<i16>, b: &Rc<i16>| a.cmp(b));
        for x in &xs {
            tree.insert(Rc::new(*x), OnDuplicate::Reject).unwrap();
        }
        let shape = |tree: &Tree<Rc<i16>, _>| {
            let mut keys = Vec::new();
            for order in [Order::PreOrder, Order::InOrder, Order::PostOrder] {
                tree.traverse(order, |x: &Rc<i16>| keys.push(**x));
            }
            keys
        };
        let before = shape(&tree);

        let replacement = Rc::new(key);
        let replaced = tree.insert(Rc::clone(&replacement), OnDuplicate::Replace);
        let found = tree.find(&Rc::new(key)).unwrap();

        replaced == Ok(Insertion::Replaced)
            && Rc::ptr_eq(found, &replacement)
            && shape(&tree) == before
    }
}

quickcheck::quickcheck! {
    fn teardown_hands_back_every_payload(xs: Vec<i16>) -> bool {
        let tree = tree_of(&xs);
        let post_order = collect(&tree, Order::PostOrder);

        tree.into_payloads() == post_order
    }
}
