//! Binary tree node with exclusively owned children

use std::fmt;

/// A named, weighted node of a binary tree.
///
/// Each node owns its children; there is no parent back-reference, so the
/// structure is a tree by construction. Clone, equality and drop walk the
/// tree with explicit stacks, so arbitrarily deep chains are fine.
#[derive(Debug)]
pub struct TreeNode {
    /// Unique name within one tree
    pub name: String,
    pub weight: i32,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

/// Which child slot of a parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.weight)
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight,
            left: None,
            right: None,
        }
    }

    /// Attach `child` as the left subtree, replacing any previous one.
    pub fn with_left(mut self, child: TreeNode) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    /// Attach `child` as the right subtree, replacing any previous one.
    pub fn with_right(mut self, child: TreeNode) -> Self {
        self.right = Some(Box::new(child));
        self
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    /// Put `child` into the given slot, replacing any previous subtree.
    pub fn attach(&mut self, side: Side, child: TreeNode) {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = Some(Box::new(child));
    }

    /// Present children with their side, left first.
    pub fn children(&self) -> impl Iterator<Item = (Side, &TreeNode)> {
        [(Side::Left, self.left()), (Side::Right, self.right())]
            .into_iter()
            .filter_map(|(side, child)| child.map(|child| (side, child)))
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        self.preorder().count()
    }

    /// A node always holds at least itself.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels in this subtree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().map(|(_, child)| (child, level + 1)));
        }
        deepest
    }

    /// Names of all leaves, left to right.
    pub fn leaf_names(&self) -> Vec<String> {
        self.preorder()
            .filter(|node| node.is_leaf())
            .map(|node| node.name.clone())
            .collect()
    }

    /// Self, then left subtree, then right subtree.
    pub fn preorder(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }

    /// Left subtree, then self, then right subtree.
    pub fn inorder(&self) -> InOrderIter<'_> {
        let mut iter = InOrderIter { stack: Vec::new() };
        iter.push_left_spine(Some(self));
        iter
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        // descendants in pre-order with their parent (None = root) and side
        let mut copies: Vec<(TreeNode, Option<usize>, Side)> = Vec::new();
        let mut stack: Vec<(&TreeNode, Option<usize>, Side)> = self
            .children()
            .map(|(side, child)| (child, None, side))
            .collect();
        while let Some((node, parent, side)) = stack.pop() {
            let index = copies.len();
            copies.push((TreeNode::new(node.name.clone(), node.weight), parent, side));
            stack.extend(node.children().map(|(side, child)| (child, Some(index), side)));
        }

        // a parent always precedes its children, so attach back to front
        let mut root = TreeNode::new(self.name.clone(), self.weight);
        while let Some((node, parent, side)) = copies.pop() {
            let parent = match parent {
                Some(index) => &mut copies[index].0,
                None => &mut root,
            };
            parent.attach(side, node);
        }
        root
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.name != b.name || a.weight != b.weight {
                return false;
            }
            for (x, y) in [(a.left(), b.left()), (a.right(), b.right())] {
                match (x, y) {
                    (Some(x), Some(y)) => pending.push((x, y)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for TreeNode {}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // detach descendants so each box drops as a leaf
        let mut pending: Vec<Box<TreeNode>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // right first so that left is visited first
        if let Some(right) = current.right() {
            self.stack.push(right);
        }
        if let Some(left) = current.left() {
            self.stack.push(left);
        }
        Some(current)
    }
}

pub struct InOrderIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> InOrderIter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a TreeNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_left_spine(current.right());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //        A
    //       / \
    //      B   C
    //     /
    //    D
    fn sample() -> TreeNode {
        TreeNode::new("A", 10)
            .with_left(TreeNode::new("B", 20).with_left(TreeNode::new("D", 10)))
            .with_right(TreeNode::new("C", 5))
    }

    fn names<'a>(iter: impl Iterator<Item = &'a TreeNode>) -> Vec<&'a str> {
        iter.map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn given_sample_tree_when_preorder_then_visits_self_left_right() {
        let root = sample();
        assert_eq!(names(root.preorder()), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn given_sample_tree_when_inorder_then_visits_left_self_right() {
        let root = sample();
        assert_eq!(names(root.inorder()), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn given_sample_tree_when_measuring_then_reports_len_depth_and_leaves() {
        let root = sample();
        assert_eq!(root.len(), 4);
        assert_eq!(root.depth(), 3);
        assert_eq!(root.leaf_names(), vec!["D".to_string(), "C".to_string()]);
    }

    #[test]
    fn given_single_node_when_measuring_then_depth_is_one() {
        let leaf = TreeNode::new("X", 1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.depth(), 1);
        assert_eq!(leaf.len(), 1);
        assert_eq!(leaf.to_string(), "X(1)");
    }

    #[test]
    fn given_right_only_chain_when_measuring_depth_then_counts_right_side() {
        let root = TreeNode::new("A", 0)
            .with_right(TreeNode::new("B", 0).with_right(TreeNode::new("C", 0)));
        assert_eq!(root.depth(), 3);
        assert_eq!(names(root.inorder()), vec!["A", "B", "C"]);
    }

    fn left_chain(n: usize) -> TreeNode {
        left_chain_ending_in(n, 1)
    }

    fn left_chain_ending_in(n: usize, last_weight: i32) -> TreeNode {
        let mut node = TreeNode::new(format!("n{}", n - 1), last_weight);
        for i in (0..n - 1).rev() {
            node = TreeNode::new(format!("n{}", i), 1).with_left(node);
        }
        node
    }

    #[test]
    fn given_deep_chain_when_cloned_compared_and_dropped_then_no_overflow() {
        let chain = left_chain(100_000);
        let copy = chain.clone();

        assert!(copy == chain);
        assert_eq!(copy.depth(), 100_000);
        assert_eq!(copy.len(), 100_000);
        assert_eq!(copy.leaf_names(), vec!["n99999".to_string()]);
    }

    #[test]
    fn given_chains_differing_in_last_weight_when_compared_then_not_equal() {
        let chain = left_chain(50);
        let other = left_chain_ending_in(50, 2);

        assert!(other != chain);
        assert!(chain.clone() == chain);
    }

    #[test]
    fn given_sample_tree_when_cloned_then_sides_are_preserved() {
        let root = sample();
        let copy = root.clone();
        assert_eq!(names(copy.preorder()), vec!["A", "B", "D", "C"]);
        assert!(copy.left().and_then(TreeNode::right).is_none());
        assert_eq!(copy, root);
    }
}
