//! Chain Nodes
//!
//! A chain is a sequence of nodes connected through their `next` links. The
//! chain may end, or it may loop back into itself, chains built elsewhere are
//! not trusted to be well-formed. Every traversal here either tracks visited
//! node identities or, for [`reverse`](ChainNode::reverse), rewrites each
//! forward link before it could be followed a second time.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};

use super::base::{Node, NodeArena, NodeKind, NEXT, PREVIOUS};

/// The record of a cycle-aware walk along a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainWalk<N> {
    /// The distinct nodes, in the order they were reached.
    pub nodes: Vec<N>,
    /// If the chain loops, the position in [`nodes`](Self::nodes) that the
    /// last node links back to.
    pub loop_index: Option<usize>,
}

impl<N: Copy> ChainWalk<N> {
    /// The last distinct node before the chain ends or repeats.
    pub fn last(&self) -> Option<N> { self.nodes.last().copied() }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn is_cyclic(&self) -> bool { self.loop_index.is_some() }
}

/// The capability shared by singly and doubly linked node views.
///
/// Implementors provide the forward link, and the backward link if they keep
/// one. All chain algorithms are provided on top of those.
pub trait ChainNode: Copy + Eq + Hash {
    /// The payload type of the node.
    type Payload;

    /// Allocate a detached node.
    fn create(arena: &mut NodeArena<Self::Payload>, payload: Self::Payload) -> Self;

    /// View an untyped node as this kind of chain node.
    ///
    /// # Returns
    ///
    /// [`None`] if the node is of another kind or the handle is stale.
    fn from_node(arena: &NodeArena<Self::Payload>, node: Node<Self::Payload>) -> Option<Self>;

    /// The untyped handle.
    fn node(self) -> Node<Self::Payload>;

    /// Get the next node in the chain.
    fn next(self, arena: &NodeArena<Self::Payload>) -> Option<Self>;

    /// Set the next node in the chain, leaving the target untouched.
    fn set_next(self, arena: &mut NodeArena<Self::Payload>, next: Option<Self>);

    /// Get the backward link. Singly linked nodes have none.
    fn back(self, _arena: &NodeArena<Self::Payload>) -> Option<Self> { None }

    /// Set the backward link. Singly linked nodes ignore this.
    fn set_back(self, _arena: &mut NodeArena<Self::Payload>, _prev: Option<Self>) {}

    fn payload(self, arena: &NodeArena<Self::Payload>) -> &Self::Payload {
        self.node().payload(arena)
    }

    /// Connect `from -> to`, keeping the backward link of `to` consistent.
    ///
    /// Either side may be [`None`]: `link(None, Some(n))` clears the backward
    /// link of `n`, `link(Some(n), None)` terminates the chain at `n`.
    fn link(arena: &mut NodeArena<Self::Payload>, from: Option<Self>, to: Option<Self>) {
        if let Some(from) = from {
            from.set_next(arena, to);
        }
        if let Some(to) = to {
            to.set_back(arena, from);
        }
    }

    /// Build a chain from a sequence of payloads.
    ///
    /// # Returns
    ///
    /// The head of the chain, or [`None`] if the sequence is empty.
    fn from_sequence<I>(arena: &mut NodeArena<Self::Payload>, payloads: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self::Payload>,
    {
        let mut payloads = payloads.into_iter();
        let head = Self::create(arena, payloads.next()?);
        Self::link(arena, None, Some(head));
        let mut last = head;
        for payload in payloads {
            let node = Self::create(arena, payload);
            Self::link(arena, Some(last), Some(node));
            last = node;
        }
        Self::link(arena, Some(last), None);
        Some(head)
    }

    /// Reverse the chain starting at this node in place.
    ///
    /// Each node's forward link is pointed at its predecessor, and for doubly
    /// linked nodes the backward link at its old successor. The walk stops at
    /// the first absent forward link. A cyclic chain terminates as well: the
    /// forward link of every node is rewritten before the walk can come back
    /// to it.
    ///
    /// # Returns
    ///
    /// The new head, i.e. the last node reached.
    fn reverse(self, arena: &mut NodeArena<Self::Payload>) -> Self {
        let mut prev = None;
        let mut curr = Some(self);
        let mut steps = 0usize;
        while let Some(node) = curr {
            let next = node.next(arena);
            node.set_next(arena, prev);
            node.set_back(arena, next);
            prev = Some(node);
            curr = next;
            steps += 1;
        }
        trace!("reversed chain in {} steps", steps);
        prev.unwrap_or(self)
    }

    /// Walk the chain from this node, stopping at the end or before the first
    /// node that was already visited.
    fn walk(self, arena: &NodeArena<Self::Payload>) -> ChainWalk<Self> {
        let mut nodes = Vec::new();
        let mut seen = HashMap::new();
        let mut loop_index = None;
        let mut curr = Some(self);
        while let Some(node) = curr {
            if let Some(&index) = seen.get(&node) {
                debug!(
                    "chain of {} nodes loops back to index {}",
                    nodes.len(),
                    index
                );
                loop_index = Some(index);
                break;
            }
            seen.insert(node, nodes.len());
            nodes.push(node);
            curr = node.next(arena);
        }
        ChainWalk { nodes, loop_index }
    }

    /// Find a node by its offset from this node.
    ///
    /// - `0` is this node.
    /// - A positive index walks forward that many steps, going around a loop
    ///   if there is one.
    /// - A negative index counts back from the end of the whole chain, where
    ///   `-1` is the last distinct node.
    ///
    /// # Returns
    ///
    /// [`None`] if the chain ends first, or a negative index reaches before
    /// this node.
    fn find_by_index(self, arena: &NodeArena<Self::Payload>, index: isize) -> Option<Self> {
        if index >= 0 {
            let mut curr = self;
            for _ in 0..index {
                curr = curr.next(arena)?;
            }
            return Some(curr);
        }
        let walk = self.walk(arena);
        walk.len()
            .checked_sub(index.unsigned_abs())
            .map(|pos| walk.nodes[pos])
    }

    /// Display the chain starting at this node.
    ///
    /// An acyclic chain renders as `1 -> 2 -> 3 -> None`. A cyclic one stops
    /// before the first repeated node and names where the loop re-enters:
    /// `1 -> 2 -> 3 -> (loop to index 1: 2)`.
    fn display_chain(self, arena: &NodeArena<Self::Payload>) -> DisplayChain<'_, Self> {
        DisplayChain { arena, head: self }
    }

    /// Render the chain as a string, see [`display_chain`](Self::display_chain).
    fn render_chain(self, arena: &NodeArena<Self::Payload>) -> String
    where
        Self::Payload: fmt::Display,
    {
        self.display_chain(arena).to_string()
    }
}

pub struct DisplayChain<'a, N: ChainNode> {
    arena: &'a NodeArena<N::Payload>,
    head: N,
}

impl<N> fmt::Display for DisplayChain<'_, N>
where
    N: ChainNode,
    N::Payload: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let walk = self.head.walk(self.arena);
        for node in &walk.nodes {
            write!(f, "{} -> ", node.payload(self.arena))?;
        }
        match walk.loop_index {
            Some(index) => write!(
                f,
                "(loop to index {}: {})",
                index,
                walk.nodes[index].payload(self.arena)
            ),
            None => f.write_str("None"),
        }
    }
}

/// A node with a `next` link.
pub struct SingleNode<T>(Node<T>);

handle_impls!(SingleNode);

impl<T> SingleNode<T> {
    pub fn new(arena: &mut NodeArena<T>, payload: T) -> Self {
        SingleNode(Node::new(arena, payload, NodeKind::Single))
    }
}

impl<T> From<SingleNode<T>> for Node<T> {
    fn from(node: SingleNode<T>) -> Self { node.0 }
}

impl<T> ChainNode for SingleNode<T> {
    type Payload = T;

    fn create(arena: &mut NodeArena<T>, payload: T) -> Self { Self::new(arena, payload) }

    fn from_node(arena: &NodeArena<T>, node: Node<T>) -> Option<Self> {
        (node.try_kind(arena)? == NodeKind::Single).then_some(SingleNode(node))
    }

    fn node(self) -> Node<T> { self.0 }

    fn next(self, arena: &NodeArena<T>) -> Option<Self> { self.0.link(arena, NEXT).map(SingleNode) }

    fn set_next(self, arena: &mut NodeArena<T>, next: Option<Self>) {
        self.0.store(arena, NEXT, next.map(|n| n.0))
    }
}

/// A node with `next` and `previous` links.
pub struct DoubleNode<T>(Node<T>);

handle_impls!(DoubleNode);

impl<T> DoubleNode<T> {
    pub fn new(arena: &mut NodeArena<T>, payload: T) -> Self {
        DoubleNode(Node::new(arena, payload, NodeKind::Double))
    }

    pub fn previous(self, arena: &NodeArena<T>) -> Option<Self> {
        self.0.link(arena, PREVIOUS).map(DoubleNode)
    }

    pub fn set_previous(self, arena: &mut NodeArena<T>, previous: Option<Self>) {
        self.0.store(arena, PREVIOUS, previous.map(|n| n.0))
    }
}

impl<T> From<DoubleNode<T>> for Node<T> {
    fn from(node: DoubleNode<T>) -> Self { node.0 }
}

impl<T> ChainNode for DoubleNode<T> {
    type Payload = T;

    fn create(arena: &mut NodeArena<T>, payload: T) -> Self { Self::new(arena, payload) }

    fn from_node(arena: &NodeArena<T>, node: Node<T>) -> Option<Self> {
        (node.try_kind(arena)? == NodeKind::Double).then_some(DoubleNode(node))
    }

    fn node(self) -> Node<T> { self.0 }

    fn next(self, arena: &NodeArena<T>) -> Option<Self> { self.0.link(arena, NEXT).map(DoubleNode) }

    fn set_next(self, arena: &mut NodeArena<T>, next: Option<Self>) {
        self.0.store(arena, NEXT, next.map(|n| n.0))
    }

    fn back(self, arena: &NodeArena<T>) -> Option<Self> { self.previous(arena) }

    fn set_back(self, arena: &mut NodeArena<T>, prev: Option<Self>) { self.set_previous(arena, prev) }
}
