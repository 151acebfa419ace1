//! Flat row representation of a tree and the two-pass mapping back to nodes
//!
//! A tree is stored as one row per node with its children referenced by name.
//! Assembly first materializes every row in an arena keyed by name, then
//! wires children by name lookup starting from the single unreferenced node.

use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{Side, TreeNode};

/// One persisted node with its children referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub node_name: String,
    pub weight: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_child: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_child: Option<String>,
}

impl NodeRow {
    pub fn from_node(node: &TreeNode) -> Self {
        Self {
            node_name: node.name.clone(),
            weight: node.weight,
            left_child: node.left().map(|child| child.name.clone()),
            right_child: node.right().map(|child| child.name.clone()),
        }
    }

    fn children(&self) -> impl Iterator<Item = &String> {
        self.left_child.iter().chain(self.right_child.iter())
    }
}

/// File format for importing and exporting a whole tree (`[[node]]` tables).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeRow>,
}

/// Flatten a tree into rows in pre-order (root first).
pub fn flatten(root: Option<&TreeNode>) -> Vec<NodeRow> {
    root.map(|node| node.preorder().map(NodeRow::from_node).collect())
        .unwrap_or_default()
}

/// Rebuild a tree from rows in any order.
///
/// The root is the unique node never named as a child. Child references to
/// names outside the row set are ignored. An empty row set is an empty tree.
#[instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
pub fn assemble(rows: Vec<NodeRow>) -> DomainResult<Option<TreeNode>> {
    if rows.is_empty() {
        return Ok(None);
    }

    // Pass 1: materialize every row, keyed by name
    let mut arena: Arena<NodeRow> = Arena::with_capacity(rows.len());
    let mut by_name: HashMap<String, Index> = HashMap::with_capacity(rows.len());
    let mut order: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        if by_name.contains_key(&row.node_name) {
            return Err(DomainError::DuplicateNode(row.node_name));
        }
        let name = row.node_name.clone();
        by_name.insert(name.clone(), arena.insert(row));
        order.push(name);
    }

    // Pass 2: select the root among unreferenced names, then wire children
    let mut referenced: HashSet<String> = HashSet::new();
    for (_, row) in arena.iter() {
        for child in row.children() {
            if by_name.contains_key(child) {
                referenced.insert(child.clone());
            } else {
                warn!(
                    "ignoring reference from {} to unknown node {}",
                    row.node_name, child
                );
            }
        }
    }

    let mut roots: Vec<String> = order
        .iter()
        .filter(|name| !referenced.contains(*name))
        .cloned()
        .collect();
    let root_name = match roots.len() {
        0 => return Err(DomainError::NoRoot),
        1 => roots.remove(0),
        _ => return Err(DomainError::MultipleRoots(roots)),
    };
    debug!("selected root {}", root_name);

    let root = build(&mut arena, &by_name, &root_name)?;

    if !arena.is_empty() {
        let orphans = order
            .into_iter()
            .filter(|name| by_name.get(name).is_some_and(|&index| arena.contains(index)))
            .collect();
        return Err(DomainError::Unreachable(orphans));
    }

    Ok(Some(root))
}

/// Remove the named row from the arena.
///
/// A row can be taken only once; meeting it again means two parents.
fn take(
    arena: &mut Arena<NodeRow>,
    by_name: &HashMap<String, Index>,
    name: &str,
) -> DomainResult<NodeRow> {
    by_name
        .get(name)
        .and_then(|&index| arena.remove(index))
        .ok_or_else(|| DomainError::SharedNode(name.to_string()))
}

/// Build the subtree below `root_name`, consuming its rows from the arena.
fn build(
    arena: &mut Arena<NodeRow>,
    by_name: &HashMap<String, Index>,
    root_name: &str,
) -> DomainResult<TreeNode> {
    // rows still to visit, with the parent they hang from (None = root)
    let mut pending: Vec<(String, Option<usize>, Side)> = Vec::new();
    // visited nodes in visit order; a parent always precedes its children
    let mut built: Vec<(TreeNode, Option<usize>, Side)> = Vec::new();

    let row = take(arena, by_name, root_name)?;
    let mut root = TreeNode::new(row.node_name, row.weight);
    push_children(&mut pending, by_name, row.left_child, row.right_child, None);

    while let Some((name, parent, side)) = pending.pop() {
        let row = take(arena, by_name, &name)?;
        let index = built.len();
        built.push((TreeNode::new(row.node_name, row.weight), parent, side));
        push_children(&mut pending, by_name, row.left_child, row.right_child, Some(index));
    }

    while let Some((node, parent, side)) = built.pop() {
        let parent = match parent {
            Some(index) => &mut built[index].0,
            None => &mut root,
        };
        parent.attach(side, node);
    }
    Ok(root)
}

fn push_children(
    pending: &mut Vec<(String, Option<usize>, Side)>,
    by_name: &HashMap<String, Index>,
    left: Option<String>,
    right: Option<String>,
    parent: Option<usize>,
) {
    for (side, child) in [(Side::Left, left), (Side::Right, right)] {
        if let Some(child) = child.filter(|child| by_name.contains_key(child)) {
            pending.push((child, parent, side));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, weight: i32, left: Option<&str>, right: Option<&str>) -> NodeRow {
        NodeRow {
            node_name: name.to_string(),
            weight,
            left_child: left.map(str::to_string),
            right_child: right.map(str::to_string),
        }
    }

    fn sample() -> TreeNode {
        TreeNode::new("A", 10)
            .with_left(TreeNode::new("B", 20).with_left(TreeNode::new("D", 10)))
            .with_right(TreeNode::new("C", 5))
    }

    #[test]
    fn given_tree_when_flatten_then_rows_are_preorder_with_child_names() {
        let rows = flatten(Some(&sample()));
        assert_eq!(
            rows,
            vec![
                row("A", 10, Some("B"), Some("C")),
                row("B", 20, Some("D"), None),
                row("D", 10, None, None),
                row("C", 5, None, None),
            ]
        );
    }

    #[test]
    fn given_empty_tree_when_flatten_then_no_rows() {
        assert!(flatten(None).is_empty());
    }

    #[test]
    fn given_no_rows_when_assemble_then_empty_tree() {
        assert_eq!(assemble(Vec::new()), Ok(None));
    }

    #[test]
    fn given_flattened_tree_when_assemble_then_structure_is_restored() {
        let tree = sample();
        let rebuilt = assemble(flatten(Some(&tree))).unwrap();
        assert_eq!(rebuilt, Some(tree));
    }

    #[test]
    fn given_rows_with_root_last_when_assemble_then_root_is_unreferenced_node() {
        let rows = vec![
            row("D", 10, None, None),
            row("C", 5, None, None),
            row("B", 20, Some("D"), None),
            row("A", 10, Some("B"), Some("C")),
        ];
        let rebuilt = assemble(rows).unwrap().expect("non-empty tree");
        assert_eq!(rebuilt, sample());
    }

    #[test]
    fn given_two_unreferenced_rows_when_assemble_then_multiple_roots() {
        let rows = vec![row("A", 1, None, None), row("B", 2, None, None)];
        assert_eq!(
            assemble(rows),
            Err(DomainError::MultipleRoots(vec!["A".into(), "B".into()]))
        );
    }

    #[test]
    fn given_every_row_referenced_when_assemble_then_no_root() {
        let rows = vec![row("A", 1, Some("B"), None), row("B", 2, Some("A"), None)];
        assert_eq!(assemble(rows), Err(DomainError::NoRoot));
    }

    #[test]
    fn given_duplicate_name_when_assemble_then_duplicate_node() {
        let rows = vec![row("A", 1, None, None), row("A", 2, None, None)];
        assert_eq!(
            assemble(rows),
            Err(DomainError::DuplicateNode("A".into()))
        );
    }

    #[test]
    fn given_node_with_two_parents_when_assemble_then_shared_node() {
        let rows = vec![
            row("R", 0, Some("A"), Some("B")),
            row("A", 1, Some("X"), None),
            row("B", 2, None, Some("X")),
            row("X", 3, None, None),
        ];
        assert_eq!(assemble(rows), Err(DomainError::SharedNode("X".into())));
    }

    #[test]
    fn given_detached_cycle_when_assemble_then_unreachable() {
        let rows = vec![
            row("R", 0, None, None),
            row("P", 1, Some("Q"), None),
            row("Q", 2, Some("P"), None),
        ];
        assert_eq!(
            assemble(rows),
            Err(DomainError::Unreachable(vec!["P".into(), "Q".into()]))
        );
    }

    #[test]
    fn given_dangling_child_reference_when_assemble_then_reference_is_ignored() {
        let rows = vec![row("A", 1, Some("ghost"), Some("B")), row("B", 2, None, None)];
        let rebuilt = assemble(rows).unwrap().expect("non-empty tree");
        assert!(rebuilt.left.is_none());
        assert_eq!(rebuilt.right().map(|n| n.name.as_str()), Some("B"));
    }

    #[test]
    fn given_deep_chain_rows_in_any_order_when_assemble_then_chain_is_rebuilt() {
        let n = 100_000;
        let mut rows: Vec<NodeRow> = (0..n)
            .map(|i| {
                let next = (i + 1 < n).then(|| format!("n{}", i + 1));
                row(&format!("n{}", i), i as i32, next.as_deref(), None)
            })
            .collect();
        rows.reverse();

        let rebuilt = assemble(rows).unwrap().expect("non-empty tree");

        assert_eq!(rebuilt.name, "n0");
        assert_eq!(rebuilt.depth(), n);
        assert_eq!(
            rebuilt.preorder().last().map(|node| node.weight),
            Some(n as i32 - 1)
        );
        let again = assemble(flatten(Some(&rebuilt))).unwrap();
        assert!(again.as_ref() == Some(&rebuilt));
    }

    #[test]
    fn given_row_set_toml_when_parsed_then_optional_children_default_to_none() {
        let text = r#"
[[node]]
node_name = "A"
weight = 10
left_child = "B"

[[node]]
node_name = "B"
weight = 20
"#;
        let set: RowSet = toml::from_str(text).unwrap();
        assert_eq!(
            set.nodes,
            vec![row("A", 10, Some("B"), None), row("B", 20, None, None)]
        );
    }
}
