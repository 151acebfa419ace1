//! Search and distance algorithms over name-keyed binary trees
//!
//! All functions are total: absence is `None`, or `NOT_FOUND` for the
//! sentinel variants. Walks use explicit stacks, so depth is bounded only
//! by memory.

use tracing::instrument;

use crate::domain::TreeNode;

/// Sentinel returned by the integer distance functions when a node is missing.
pub const NOT_FOUND: i32 = -1;

/// Depth-first pre-order search; returns the first node called `name`.
#[instrument(level = "trace", skip(root))]
pub fn find_node<'a>(root: Option<&'a TreeNode>, name: &str) -> Option<&'a TreeNode> {
    root?.preorder().find(|node| node.name == name)
}

enum LcaStep<'a> {
    Visit(Option<&'a TreeNode>),
    Combine(&'a TreeNode),
}

/// Lowest common ancestor of the nodes called `x` and `y`.
///
/// Both names are expected to exist below `root`. If only one exists, that
/// node itself is returned, so check with [`find_node`] first when the
/// distinction matters.
#[instrument(level = "trace", skip(root))]
pub fn find_lca<'a>(root: Option<&'a TreeNode>, x: &str, y: &str) -> Option<&'a TreeNode> {
    // post-order: each subtree leaves one partial answer on `found`
    let mut steps = vec![LcaStep::Visit(root)];
    let mut found: Vec<Option<&'a TreeNode>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            LcaStep::Visit(None) => found.push(None),
            LcaStep::Visit(Some(node)) if node.name == x || node.name == y => {
                found.push(Some(node))
            }
            LcaStep::Visit(Some(node)) => {
                steps.push(LcaStep::Combine(node));
                steps.push(LcaStep::Visit(node.right()));
                steps.push(LcaStep::Visit(node.left()));
            }
            LcaStep::Combine(node) => {
                let right = found.pop().flatten();
                let left = found.pop().flatten();
                found.push(match (left, right) {
                    (Some(_), Some(_)) => Some(node),
                    (left, right) => left.or(right),
                });
            }
        }
    }

    found.pop().flatten()
}

/// Number of edges from `root` down to the node called `target`.
pub fn depth_of(root: Option<&TreeNode>, target: &str) -> Option<usize> {
    let mut stack = vec![(root?, 0)];
    while let Some((node, depth)) = stack.pop() {
        if node.name == target {
            return Some(depth);
        }
        // right first so that left is searched first
        stack.extend(node.right().map(|child| (child, depth + 1)));
        stack.extend(node.left().map(|child| (child, depth + 1)));
    }
    None
}

/// Same as [`depth_of`], with `NOT_FOUND` for a missing target.
#[instrument(level = "trace", skip(root))]
pub fn distance(root: Option<&TreeNode>, target: &str) -> i32 {
    depth_of(root, target).map_or(NOT_FOUND, to_sentinel)
}

/// Number of edges on the path between `x` and `y`, measured through their LCA.
#[instrument(level = "trace", skip(root))]
pub fn edges_between(root: Option<&TreeNode>, x: &str, y: &str) -> Option<usize> {
    let lca = find_lca(root, x, y)?;
    let to_x = depth_of(Some(lca), x)?;
    let to_y = depth_of(Some(lca), y)?;
    Some(to_x + to_y)
}

pub(crate) fn to_sentinel(edges: usize) -> i32 {
    i32::try_from(edges).unwrap_or(i32::MAX)
}
