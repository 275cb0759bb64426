//! Binary Search Tree
//!
//! [`BinaryTree`] keeps the root and the size of a tree of [`TreeNode`]s and
//! orders insertions by comparing the new value against each node on the way
//! down, with the node's payload as the receiver of the comparison. A value
//! that is not less than a node goes to its right, so duplicates land right.
//!
//! Trees built by hand can be [`adopt`](BinaryTree::adopt)-ed. Nothing
//! guarantees they are acyclic, so the traversals skip nodes they have
//! already entered, and descents fail with [`Error::Cycle`] rather than
//! spinning forever.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::node::{NodeArena, TreeNode};
use crate::value::{CmpOp, Comparable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTree<T> {
    root: Option<TreeNode<T>>,
    size: usize,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }
}

impl<T> BinaryTree<T> {
    pub fn new() -> Self { Self::default() }

    /// Insert every value in order.
    ///
    /// Stops at the first failing comparison; values inserted before it stay
    /// in the arena and the tree is discarded.
    pub fn from_values<I>(arena: &mut NodeArena<T>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Comparable,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(arena, value)?;
        }
        Ok(tree)
    }

    /// Take over an existing tree rooted at `root`.
    ///
    /// Walks breadth-first and points the `parent` link of every child it
    /// meets at the node it was reached from, even when the child was visited
    /// before. Each distinct node is expanded and counted once.
    pub fn adopt(arena: &mut NodeArena<T>, root: Option<TreeNode<T>>) -> Self {
        let Some(root) = root else {
            return Self::new();
        };

        let mut queue = VecDeque::from([root]);
        let mut seen = HashSet::new();
        while let Some(node) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            let children = [node.left(arena), node.right(arena)];
            for child in children.into_iter().flatten() {
                child.set_parent(arena, Some(node));
                queue.push_back(child);
            }
        }

        debug!("adopted a tree of {} nodes", seen.len());
        Self {
            root: Some(root),
            size: seen.len(),
        }
    }

    pub fn root(&self) -> Option<TreeNode<T>> { self.root }

    pub fn len(&self) -> usize { self.size }

    pub fn is_empty(&self) -> bool { self.size == 0 }

    /// Insert a value as a new leaf.
    ///
    /// # Returns
    ///
    /// - `Ok(node)`: The new leaf.
    /// - [`Error::UnorderedComparison`] if a payload on the way down cannot be
    ///   ordered against `value`. Nothing is allocated or linked.
    /// - [`Error::Cycle`] if the descent comes back to a node it passed.
    pub fn insert(&mut self, arena: &mut NodeArena<T>, value: T) -> Result<TreeNode<T>>
    where
        T: Comparable,
    {
        let Some(root) = self.root else {
            let node = TreeNode::new(arena, value);
            self.root = Some(node);
            self.size = 1;
            return Ok(node);
        };

        let mut seen = HashSet::new();
        let mut curr = root;
        let (parent, go_left) = loop {
            if !seen.insert(curr) {
                return Err(Error::Cycle("tree"));
            }
            let go_left = curr.node().compare(arena, CmpOp::Gt, &value)?;
            let child = if go_left {
                curr.left(arena)
            } else {
                curr.right(arena)
            };
            match child {
                Some(child) => curr = child,
                None => break (curr, go_left),
            }
        };

        let node = TreeNode::new(arena, value);
        if go_left {
            parent.set_left(arena, Some(node));
        } else {
            parent.set_right(arena, Some(node));
        }
        node.set_parent(arena, Some(parent));
        self.size += 1;
        trace!("inserted at depth {}, size is now {}", seen.len(), self.size);
        Ok(node)
    }

    /// Find a node whose payload equals `value` by descending from the root.
    pub fn find(&self, arena: &NodeArena<T>, value: &T) -> Result<Option<TreeNode<T>>>
    where
        T: Comparable,
    {
        let mut seen = HashSet::new();
        let mut curr = self.root;
        while let Some(node) = curr {
            if !seen.insert(node) {
                return Err(Error::Cycle("tree"));
            }
            if node.node().compare(arena, CmpOp::Eq, value)? {
                return Ok(Some(node));
            }
            curr = if node.node().compare(arena, CmpOp::Gt, value)? {
                node.left(arena)
            } else {
                node.right(arena)
            };
        }
        Ok(None)
    }

    pub fn height(&self, arena: &NodeArena<T>) -> usize {
        self.root.map_or(0, |root| root.height(arena))
    }

    pub fn traverse<'a>(&self, arena: &'a NodeArena<T>, order: Order) -> Traversal<'a, T> {
        Traversal {
            arena,
            order,
            stack: self.root.map(Step::Enter).into_iter().collect(),
            seen: HashSet::new(),
        }
    }

    /// Left subtree, node, right subtree. Ascending for a search tree.
    pub fn inorder<'a>(&self, arena: &'a NodeArena<T>) -> Traversal<'a, T> {
        self.traverse(arena, Order::In)
    }

    pub fn preorder<'a>(&self, arena: &'a NodeArena<T>) -> Traversal<'a, T> {
        self.traverse(arena, Order::Pre)
    }

    pub fn postorder<'a>(&self, arena: &'a NodeArena<T>) -> Traversal<'a, T> {
        self.traverse(arena, Order::Post)
    }

    /// Display the inorder sequence, `Inorder: 1 -> 2 -> None`.
    pub fn display<'a>(&self, arena: &'a NodeArena<T>) -> DisplayTree<'a, T> {
        DisplayTree {
            arena,
            root: self.root,
            style: TreeStyle::Inorder,
        }
    }

    /// Display the tree one row per depth, or `<empty tree>`.
    pub fn display_levels<'a>(&self, arena: &'a NodeArena<T>) -> DisplayTree<'a, T> {
        DisplayTree {
            arena,
            root: self.root,
            style: TreeStyle::Levels,
        }
    }
}

/// The visiting order of a depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Pre,
    In,
    Post,
}

enum Step<T> {
    /// Expand the node into its children and itself.
    Enter(TreeNode<T>),
    /// Yield the node's payload.
    Emit(TreeNode<T>),
}

/// A depth-first traversal over payloads.
///
/// A node that was already entered once is skipped when reached again, so
/// the traversal ends on cyclic structures and yields shared subtrees once.
pub struct Traversal<'a, T> {
    arena: &'a NodeArena<T>,
    order: Order,
    stack: Vec<Step<T>>,
    seen: HashSet<TreeNode<T>>,
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(step) = self.stack.pop() {
            let node = match step {
                Step::Emit(node) => return Some(node.payload(self.arena)),
                Step::Enter(node) => node,
            };
            if !self.seen.insert(node) {
                trace!("traversal skipped {:?}, already entered", node);
                continue;
            }
            let left = node.left(self.arena).map(Step::Enter);
            let right = node.right(self.arena).map(Step::Enter);
            let emit = Some(Step::Emit(node));
            // pushed in reverse, the last one pops first
            let steps = match self.order {
                Order::Pre => [right, left, emit],
                Order::In => [right, emit, left],
                Order::Post => [emit, right, left],
            };
            self.stack.extend(steps.into_iter().flatten());
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStyle {
    Inorder,
    Levels,
}

pub struct DisplayTree<'a, T> {
    arena: &'a NodeArena<T>,
    root: Option<TreeNode<T>>,
    style: TreeStyle,
}

impl<T: fmt::Display> fmt::Display for DisplayTree<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.style, self.root) {
            (TreeStyle::Inorder, root) => {
                f.write_str("Inorder: ")?;
                let tree = BinaryTree { root, size: 0 };
                for payload in tree.inorder(self.arena) {
                    write!(f, "{} -> ", payload)?;
                }
                f.write_str("None")
            }
            (TreeStyle::Levels, Some(root)) => write!(f, "{}", root.display_levels(self.arena)),
            (TreeStyle::Levels, None) => f.write_str("<empty tree>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Value;

    fn inorder(tree: &BinaryTree<i32>, arena: &NodeArena<i32>) -> Vec<i32> {
        tree.inorder(arena).copied().collect()
    }

    #[test]
    fn test_insert_orders_values() {
        let arena = &mut NodeArena::default();
        let tree = BinaryTree::from_values(arena, [5, 3, 8, 1, 4, 8]).unwrap();

        assert_eq!(tree.len(), 6);
        assert_eq!(inorder(&tree, arena), vec![1, 3, 4, 5, 8, 8]);
        assert_eq!(
            tree.preorder(arena).copied().collect::<Vec<_>>(),
            vec![5, 3, 1, 4, 8, 8]
        );
        assert_eq!(
            tree.postorder(arena).copied().collect::<Vec<_>>(),
            vec![1, 4, 3, 8, 8, 5]
        );
        assert_eq!(tree.height(arena), 3);
    }

    #[test]
    fn test_insert_links_parent() {
        let arena = &mut NodeArena::default();
        let mut tree = BinaryTree::new();
        let root = tree.insert(arena, 2).unwrap();
        let left = tree.insert(arena, 1).unwrap();
        let right = tree.insert(arena, 2).unwrap();

        assert_eq!(root.left(arena), Some(left));
        assert_eq!(root.right(arena), Some(right));
        assert_eq!(left.parent(arena), Some(root));
        assert_eq!(right.parent(arena), Some(root));
        assert_eq!(tree.root(), Some(root));
    }

    #[test]
    fn test_find() {
        let arena = &mut NodeArena::default();
        let tree = BinaryTree::from_values(arena, [5, 3, 8, 4]).unwrap();
        let found = tree.find(arena, &4).unwrap().unwrap();
        assert_eq!(*found.payload(arena), 4);
        assert_eq!(found.parent(arena).map(|n| *n.payload(arena)), Some(3));
        assert_eq!(tree.find(arena, &7).unwrap(), None);
        assert_eq!(BinaryTree::new().find(arena, &1).unwrap(), None);
    }

    #[test]
    fn test_unordered_insert_leaves_tree_unchanged() {
        let arena = &mut NodeArena::default();
        let mut tree = BinaryTree::new();
        tree.insert(arena, Value::from("m")).unwrap();

        let err = tree.insert(arena, Value::from("a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(tree.len(), 1);
        assert_eq!(arena.len(), 1);
        assert_eq!(tree.root().unwrap().left(arena), None);

        // equality still works on textual payloads
        assert!(tree.find(arena, &Value::from("m")).unwrap().is_some());
    }

    #[test]
    fn test_traversals_on_cyclic_tree() {
        let arena = &mut NodeArena::default();
        let root = TreeNode::new(arena, 2);
        let left = TreeNode::new(arena, 1);
        let right = TreeNode::new(arena, 3);
        root.set_left(arena, Some(left));
        root.set_right(arena, Some(right));
        right.set_right(arena, Some(root));

        let tree = BinaryTree::adopt(arena, Some(root));
        assert_eq!(tree.len(), 3);
        // the back edge re-parents the root
        assert_eq!(root.parent(arena), Some(right));
        assert_eq!(left.parent(arena), Some(root));

        assert_eq!(inorder(&tree, arena), vec![1, 2, 3]);
        assert_eq!(
            tree.preorder(arena).copied().collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
        assert_eq!(
            tree.postorder(arena).copied().collect::<Vec<_>>(),
            vec![1, 3, 2]
        );
        assert_eq!(tree.height(arena), 2);

        // descending right from 3 leads back into the root
        let mut tree = tree;
        assert_eq!(tree.insert(arena, 9), Err(Error::Cycle("tree")));
        assert_eq!(tree.find(arena, &9), Err(Error::Cycle("tree")));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_display() {
        let arena = &mut NodeArena::default();
        let tree = BinaryTree::from_values(arena, [2, 1, 3]).unwrap();
        assert_eq!(tree.display(arena).to_string(), "Inorder: 1 -> 2 -> 3 -> None");
        assert_eq!(
            tree.display_levels(arena).to_string(),
            "    2    \n  1    3  \n"
        );

        let empty = BinaryTree::<i32>::new();
        assert_eq!(empty.display(arena).to_string(), "Inorder: None");
        assert_eq!(empty.display_levels(arena).to_string(), "<empty tree>");
        assert_eq!(empty.height(arena), 0);
    }

    #[test]
    fn test_adopt_empty() {
        let arena = &mut NodeArena::<i32>::default();
        let tree = BinaryTree::adopt(arena, None);
        assert!(tree.is_empty());
        assert_eq!(tree.inorder(arena).next(), None);
    }

    #[test]
    fn test_degenerate_tree() {
        let arena = &mut NodeArena::default();
        let root = TreeNode::new(arena, 0);
        let mut last = root;
        for value in 1..30_000 {
            let node = TreeNode::new(arena, value);
            last.set_right(arena, Some(node));
            last = node;
        }

        // the shape sorted inserts produce, one right child per level
        let mut tree = BinaryTree::adopt(arena, Some(root));
        tree.insert(arena, 30_000).unwrap();
        assert_eq!(tree.len(), 30_001);
        assert_eq!(tree.height(arena), 30_001);
        assert_eq!(tree.inorder(arena).count(), 30_001);
        assert_eq!(tree.postorder(arena).next(), Some(&30_000));
    }
}
