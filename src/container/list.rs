//! List Containers
//!
//! [`List`] keeps the head, the tail and the size of a chain of
//! [`ChainNode`]s. The same implementation serves singly and doubly linked
//! lists: every relinking goes through [`ChainNode::link`], which keeps the
//! backward links consistent when the node kind has them.
//!
//! A list may also [`adopt`](List::adopt) a chain that was built by hand,
//! including one that loops back into itself. From then on the list trusts its
//! recorded size: iteration, rendering and search visit at most `size` nodes.
//!
//! Deleting only unlinks a node. Lists may share nodes, so a node one list
//! drops can still be reachable from another; freeing it is up to the caller.

use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::node::{ChainNode, DoubleNode, NodeArena, SingleNode};

/// A list over chain nodes of type `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<N> {
    head: Option<N>,
    tail: Option<N>,
    size: usize,
}

/// A list of [`SingleNode`]s.
pub type LinkedList<T> = List<SingleNode<T>>;

/// A list of [`DoubleNode`]s.
pub type DoublyLinkedList<T> = List<DoubleNode<T>>;

impl<N> Default for List<N> {
    fn default() -> Self {
        Self {
            head: None,
            tail: None,
            size: 0,
        }
    }
}

impl<N: ChainNode> List<N> {
    pub fn new() -> Self { Self::default() }

    /// Build a list by inserting every value at the tail.
    pub fn from_values<I>(arena: &mut NodeArena<N::Payload>, values: I) -> Self
    where
        I: IntoIterator<Item = N::Payload>,
    {
        let mut list = Self::new();
        for value in values {
            list.insert_at_tail(arena, value);
        }
        list
    }

    /// Take over an existing chain starting at `head`.
    ///
    /// The chain is walked once, stopping at its end or before the first node
    /// that was already visited. The last distinct node becomes the tail and
    /// the number of distinct nodes the size. For doubly linked nodes, every
    /// `previous` link along the walk is rewritten to the node before it, and
    /// the head's is cleared.
    pub fn adopt(arena: &mut NodeArena<N::Payload>, head: Option<N>) -> Self {
        let Some(head) = head else {
            return Self::new();
        };

        let walk = head.walk(arena);
        N::link(arena, None, Some(head));
        for pair in walk.nodes.windows(2) {
            pair[1].set_back(arena, Some(pair[0]));
        }

        if let Some(index) = walk.loop_index {
            debug!(
                "adopted a chain of {} nodes that loops back to index {}",
                walk.len(),
                index
            );
        }

        Self {
            head: Some(head),
            tail: walk.last(),
            size: walk.len(),
        }
    }

    pub fn head(&self) -> Option<N> { self.head }

    pub fn tail(&self) -> Option<N> { self.tail }

    pub fn len(&self) -> usize { self.size }

    pub fn is_empty(&self) -> bool { self.size == 0 }

    /// Get the node at a 1-based position.
    pub fn get(&self, arena: &NodeArena<N::Payload>, index: usize) -> Option<N> {
        if index == 0 || index > self.size {
            return None;
        }
        self.nodes(arena).nth(index - 1)
    }

    /// Iterate over the nodes from the head, visiting at most `len()` nodes.
    ///
    /// Iteration ends early at a node that was freed.
    pub fn nodes<'a>(&self, arena: &'a NodeArena<N::Payload>) -> Nodes<'a, N> {
        Nodes {
            arena,
            curr: self.head,
            remaining: self.size,
        }
    }

    /// Iterate over the payloads from the head.
    pub fn iter<'a>(
        &self,
        arena: &'a NodeArena<N::Payload>,
    ) -> impl Iterator<Item = &'a N::Payload> + 'a
    where
        N: 'a,
    {
        self.nodes(arena).map(move |node| node.payload(arena))
    }

    pub fn insert_at_head(&mut self, arena: &mut NodeArena<N::Payload>, value: N::Payload) -> N {
        let node = N::create(arena, value);
        N::link(arena, Some(node), self.head);
        N::link(arena, None, Some(node));
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.size += 1;
        trace!("inserted at head, size is now {}", self.size);
        node
    }

    pub fn insert_at_tail(&mut self, arena: &mut NodeArena<N::Payload>, value: N::Payload) -> N {
        let node = N::create(arena, value);
        N::link(arena, self.tail, Some(node));
        N::link(arena, Some(node), None);
        if self.head.is_none() {
            self.head = Some(node);
        }
        self.tail = Some(node);
        self.size += 1;
        trace!("inserted at tail, size is now {}", self.size);
        node
    }

    /// Insert a value so that it ends up at the 1-based position `index`.
    ///
    /// # Returns
    ///
    /// - `Ok(node)`: The new node.
    /// - [`Error::IndexOutOfBounds`] unless `1 <= index <= len() + 1`. The
    ///   list is left untouched.
    pub fn insert_at(
        &mut self,
        arena: &mut NodeArena<N::Payload>,
        index: usize,
        value: N::Payload,
    ) -> Result<N> {
        if index == 0 || index > self.size + 1 {
            return Err(self.out_of_bounds(index));
        }
        if index == 1 {
            return Ok(self.insert_at_head(arena, value));
        }
        if index == self.size + 1 {
            return Ok(self.insert_at_tail(arena, value));
        }

        let prev = self.node_at(arena, index - 1)?;
        let next = prev.next(arena);
        let node = N::create(arena, value);
        N::link(arena, Some(prev), Some(node));
        N::link(arena, Some(node), next);
        self.size += 1;
        trace!("inserted at {}, size is now {}", index, self.size);
        Ok(node)
    }

    /// Unlink the head and return it.
    ///
    /// The removed node stays in the arena, so other lists that reach it keep
    /// working. Free it with [`NodeArena::remove`] once nothing needs it.
    ///
    /// # Returns
    ///
    /// - `Ok(node)`: The removed node.
    /// - [`Error::Empty`] if the list is empty.
    /// - [`Error::StaleNode`] if the head was freed elsewhere.
    pub fn delete_at_head(&mut self, arena: &mut NodeArena<N::Payload>) -> Result<N> {
        let head = self.head.ok_or(Error::Empty("list"))?;
        check_alive(arena, head)?;

        let next = if self.size > 1 { head.next(arena) } else { None };
        N::link(arena, None, next);
        self.head = next;
        self.size -= 1;
        if next.is_none() {
            self.tail = None;
            self.size = 0;
        }
        trace!("deleted at head, size is now {}", self.size);
        Ok(head)
    }

    /// Unlink the tail and return it.
    ///
    /// The node before the tail is found through the backward link when it
    /// is consistent, and by walking from the head otherwise.
    pub fn delete_at_tail(&mut self, arena: &mut NodeArena<N::Payload>) -> Result<N> {
        let tail = self.tail.ok_or(Error::Empty("list"))?;
        check_alive(arena, tail)?;
        if self.size == 1 {
            return self.delete_at_head(arena);
        }

        let prev = match tail.back(arena) {
            Some(prev) if prev.next(arena) == Some(tail) => prev,
            _ => self.node_at(arena, self.size - 1)?,
        };
        N::link(arena, Some(prev), None);
        self.tail = Some(prev);
        self.size -= 1;
        trace!("deleted at tail, size is now {}", self.size);
        Ok(tail)
    }

    /// Unlink the node at the 1-based position `index` and return it.
    ///
    /// # Returns
    ///
    /// - [`Error::IndexOutOfBounds`] unless `1 <= index <= len()`.
    pub fn delete_at(&mut self, arena: &mut NodeArena<N::Payload>, index: usize) -> Result<N> {
        if index == 0 || index > self.size {
            return Err(self.out_of_bounds(index));
        }
        if index == 1 {
            return self.delete_at_head(arena);
        }
        if index == self.size {
            return self.delete_at_tail(arena);
        }

        let prev = self.node_at(arena, index - 1)?;
        let target = prev.next(arena).ok_or_else(|| self.out_of_bounds(index))?;
        let next = target.next(arena);
        N::link(arena, Some(prev), next);
        self.size -= 1;
        trace!("deleted at {}, size is now {}", index, self.size);
        Ok(target)
    }

    /// Unlink the first node whose payload equals `value`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a node was removed, `Ok(false)` if none matched.
    /// - Any error of [`delete_at`](List::delete_at) on the matching node.
    pub fn delete_value(
        &mut self,
        arena: &mut NodeArena<N::Payload>,
        value: &N::Payload,
    ) -> Result<bool>
    where
        N::Payload: PartialEq,
    {
        let position = {
            let arena = &*arena;
            self.nodes(arena).position(|node| node.payload(arena) == value)
        };
        match position {
            Some(position) => self.delete_at(arena, position + 1).map(|_| true),
            None => Ok(false),
        }
    }

    /// Reverse the list in place.
    pub fn reverse(&mut self, arena: &mut NodeArena<N::Payload>) {
        if let Some(head) = self.head {
            let new_head = head.reverse(arena);
            *self = Self::adopt(arena, Some(new_head));
        }
    }

    /// Display the list as its head's chain, or `None` when empty.
    pub fn display<'a>(&self, arena: &'a NodeArena<N::Payload>) -> DisplayList<'a, N> {
        DisplayList {
            arena,
            list: self.clone(),
        }
    }

    fn node_at(&self, arena: &NodeArena<N::Payload>, index: usize) -> Result<N> {
        self.get(arena, index)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            index,
            len: self.size,
        }
    }
}

fn check_alive<N: ChainNode>(arena: &NodeArena<N::Payload>, node: N) -> Result<()> {
    if node.node().is_alive(arena) {
        Ok(())
    } else {
        Err(Error::StaleNode(format!("{:?}", node.node())))
    }
}

/// An iterator over the nodes of a [`List`].
pub struct Nodes<'a, N: ChainNode> {
    arena: &'a NodeArena<N::Payload>,
    curr: Option<N>,
    remaining: usize,
}

impl<'a, N: ChainNode> Iterator for Nodes<'a, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.curr.filter(|node| node.node().is_alive(self.arena))?;
        self.curr = node.next(self.arena);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (0, Some(self.remaining)) }
}

pub struct DisplayList<'a, N: ChainNode> {
    arena: &'a NodeArena<N::Payload>,
    list: List<N>,
}

impl<N> fmt::Display for DisplayList<'_, N>
where
    N: ChainNode,
    N::Payload: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let nodes: Vec<N> = self.list.nodes(self.arena).collect();
        let Some(&last) = nodes.last() else {
            return f.write_str("None");
        };
        for node in &nodes {
            write!(f, "{} -> ", node.payload(self.arena))?;
        }
        match last.next(self.arena) {
            None => f.write_str("None"),
            Some(next) => match nodes.iter().position(|&node| node == next) {
                Some(index) => write!(
                    f,
                    "(loop to index {}: {})",
                    index,
                    next.payload(self.arena)
                ),
                None => f.write_str("..."),
            },
        }
    }
}
