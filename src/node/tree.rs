use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::base::{Node, NodeArena, NodeKind, LEFT, PARENT, RIGHT};

/// Padding stops doubling past this many levels above the bottom row.
const MAX_PADDING_SHIFT: usize = 6;

/// A node with `left`, `right` and `parent` links.
pub struct TreeNode<T>(Node<T>);

handle_impls!(TreeNode);

impl<T> From<TreeNode<T>> for Node<T> {
    fn from(node: TreeNode<T>) -> Self { node.0 }
}

impl<T> TreeNode<T> {
    pub fn new(arena: &mut NodeArena<T>, payload: T) -> Self {
        TreeNode(Node::new(arena, payload, NodeKind::Tree))
    }

    /// View an untyped node as a tree node, [`None`] if it is of another kind
    /// or stale.
    pub fn from_node(arena: &NodeArena<T>, node: Node<T>) -> Option<Self> {
        (node.try_kind(arena)? == NodeKind::Tree).then_some(TreeNode(node))
    }

    pub fn node(self) -> Node<T> { self.0 }

    pub fn payload(self, arena: &NodeArena<T>) -> &T { self.0.payload(arena) }

    pub fn left(self, arena: &NodeArena<T>) -> Option<Self> { self.0.link(arena, LEFT).map(TreeNode) }

    pub fn right(self, arena: &NodeArena<T>) -> Option<Self> {
        self.0.link(arena, RIGHT).map(TreeNode)
    }

    pub fn parent(self, arena: &NodeArena<T>) -> Option<Self> {
        self.0.link(arena, PARENT).map(TreeNode)
    }

    pub fn set_left(self, arena: &mut NodeArena<T>, left: Option<Self>) {
        self.0.store(arena, LEFT, left.map(|n| n.0))
    }

    pub fn set_right(self, arena: &mut NodeArena<T>, right: Option<Self>) {
        self.0.store(arena, RIGHT, right.map(|n| n.0))
    }

    pub fn set_parent(self, arena: &mut NodeArena<T>, parent: Option<Self>) {
        self.0.store(arena, PARENT, parent.map(|n| n.0))
    }

    /// The present children, left first.
    pub fn children(self, arena: &NodeArena<T>) -> impl Iterator<Item = Self> {
        [self.left(arena), self.right(arena)].into_iter().flatten()
    }

    /// The number of nodes on the longest downward path from this node.
    ///
    /// A leaf has height 1. A node reached a second time, through a cycle or a
    /// shared subtree, counts as empty.
    pub fn height(self, arena: &NodeArena<T>) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![(self, 1)];
        let mut height = 0;
        // depth first, left before right
        while let Some((node, depth)) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            height = height.max(depth);
            for child in [node.right(arena), node.left(arena)].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// Display the subtree level by level, one row per depth.
    pub fn display_levels(self, arena: &NodeArena<T>) -> DisplayLevels<'_, T> {
        DisplayLevels { arena, root: self }
    }
}

/// A breadth-first, row-per-depth layout of a subtree.
///
/// Each node is printed between two runs of spaces whose width halves with
/// every level down, so a complete tree comes out roughly centred.
pub struct DisplayLevels<'a, T> {
    arena: &'a NodeArena<T>,
    root: TreeNode<T>,
}

impl<T: fmt::Display> fmt::Display for DisplayLevels<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let height = self.root.height(self.arena);
        let padding =
            |depth: usize| " ".repeat(1 << height.saturating_sub(depth).min(MAX_PADDING_SHIFT));

        let mut queue = VecDeque::from([(self.root, 0usize)]);
        let mut seen = HashSet::new();
        let mut level = 0;
        let mut pad = padding(0);
        while let Some((node, depth)) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            if depth > level {
                writeln!(f)?;
                level = depth;
                pad = padding(depth);
            }
            write!(f, "{pad}{}{pad}", node.payload(self.arena))?;
            for child in node.children(self.arena) {
                queue.push_back((child, depth + 1));
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree(arena: &mut NodeArena<i32>) -> (TreeNode<i32>, TreeNode<i32>, TreeNode<i32>) {
        let root = TreeNode::new(arena, 2);
        let left = TreeNode::new(arena, 1);
        let right = TreeNode::new(arena, 3);
        root.set_left(arena, Some(left));
        root.set_right(arena, Some(right));
        left.set_parent(arena, Some(root));
        right.set_parent(arena, Some(root));
        (root, left, right)
    }

    #[test]
    fn test_tree_links() {
        let arena = &mut NodeArena::default();
        let (root, left, right) = small_tree(arena);
        assert_eq!(root.left(arena), Some(left));
        assert_eq!(root.right(arena), Some(right));
        assert_eq!(left.parent(arena), Some(root));
        assert_eq!(root.parent(arena), None);
        assert_eq!(root.children(arena).collect::<Vec<_>>(), vec![left, right]);
        assert_eq!(TreeNode::from_node(arena, root.node()), Some(root));
    }

    #[test]
    fn test_height() {
        let arena = &mut NodeArena::default();
        let (root, left, _) = small_tree(arena);
        assert_eq!(left.height(arena), 1);
        assert_eq!(root.height(arena), 2);

        let deep = TreeNode::new(arena, 0);
        left.set_left(arena, Some(deep));
        assert_eq!(root.height(arena), 3);
    }

    #[test]
    fn test_height_with_cycle() {
        let arena = &mut NodeArena::default();
        let (root, left, _) = small_tree(arena);
        left.set_right(arena, Some(root));
        assert_eq!(root.height(arena), 2);
    }

    #[test]
    fn test_height_of_degenerate_chain() {
        let arena = &mut NodeArena::default();
        let root = TreeNode::new(arena, 0);
        let mut last = root;
        for value in 1..30_000 {
            let node = TreeNode::new(arena, value);
            last.set_right(arena, Some(node));
            last = node;
        }
        assert_eq!(root.height(arena), 30_000);
        assert_eq!(last.height(arena), 1);
    }

    #[test]
    fn test_display_levels() {
        let arena = &mut NodeArena::default();
        let (root, _, _) = small_tree(arena);
        assert_eq!(
            root.display_levels(arena).to_string(),
            "    2    \n  1    3  \n"
        );
    }

    #[test]
    fn test_display_levels_with_cycle() {
        let arena = &mut NodeArena::default();
        let (root, _, right) = small_tree(arena);
        right.set_left(arena, Some(root));
        assert_eq!(
            root.display_levels(arena).to_string(),
            "    2    \n  1    3  \n"
        );
    }
}
