/*
Display conversion lives in a trait so the same call works on a bare node
and on an optional root such as `Tree::root()`.
Levels past MAX_RENDER_DEPTH are summarized in one line.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Side, TreeNode};

pub const MAX_RENDER_DEPTH: usize = 256;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "trace", skip(self), fields(node = %self.name))]
    fn to_tree_string(&self) -> Tree<String> {
        labelled(self, self.to_string(), 1)
    }
}

fn labelled(node: &TreeNode, label: String, level: usize) -> Tree<String> {
    let mut tree = Tree::new(label);
    if level >= MAX_RENDER_DEPTH {
        let hidden = node.len() - 1;
        if hidden > 0 {
            tree.push(Tree::new(format!("... {} more nodes", hidden)));
        }
        return tree;
    }
    for (side, child) in node.children() {
        let side = match side {
            Side::Left => "L",
            Side::Right => "R",
        };
        tree.push(labelled(child, format!("{}: {}", side, child), level + 1));
    }
    tree
}

impl TreeNodeConvert for Option<&TreeNode> {
    fn to_tree_string(&self) -> Tree<String> {
        match self {
            Some(root) => root.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
