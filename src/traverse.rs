//! Depth-first walks over the node graph.

use std::ops::ControlFlow;

use crate::node::Link;

/// Columns of indentation per level of depth in [`render`].
const RENDER_INDENT: usize = 10;

/// When a node's own payload is visited relative to its subtrees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree. Visits payloads in ascending order.
    InOrder,
    /// Node, left subtree, right subtree. Enough to rebuild the same shape by reinsertion.
    PreOrder,
    /// Left subtree, right subtree, node. The order in which a tree is torn down.
    PostOrder,
}

pub(crate) fn walk<T, B, F>(link: &Link<T>, order: Order, visit: &mut F) -> ControlFlow<B>
where
    F: FnMut(&T) -> ControlFlow<B>,
{
    let Some(node) = link else {
        return ControlFlow::Continue(());
    };

    if order == Order::PreOrder {
        visit(&node.payload)?;
    }
    walk(&node.left, order, visit)?;
    if order == Order::InOrder {
        visit(&node.payload)?;
    }
    walk(&node.right, order, visit)?;
    if order == Order::PostOrder {
        visit(&node.payload)?;
    }

    ControlFlow::Continue(())
}

/// Draws the subtree sideways: the right subtree above its parent, the left subtree below, each
/// level indented by [`RENDER_INDENT`] more columns than its parent. One line per node.
pub(crate) fn render<T, D, F>(link: &Link<T>, depth: usize, label: &mut F, out: &mut String)
where
    D: std::fmt::Display,
    F: FnMut(&T) -> D,
{
    let Some(node) = link else {
        return;
    };

    render(&node.right, depth + 1, label, out);
    out.push_str(&format!(
        "{:indent$}{}\n",
        "",
        label(&node.payload),
        indent = depth * RENDER_INDENT
    ));
    render(&node.left, depth + 1, label, out);
}
