use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::infra::storage::{Arena, ArenaPtr, GenericArena, GenericPtr};
use crate::value::{CmpOp, Comparable};

pub const NEXT: &str = "next";
pub const PREVIOUS: &str = "previous";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const PARENT: &str = "parent";

/// The link layout of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `next` only.
    Single,
    /// `next` and `previous`.
    Double,
    /// `left`, `right` and `parent`.
    Tree,
    /// Any link name.
    Named,
}

impl NodeKind {
    /// The link names of this kind. Empty for [`NodeKind::Named`], which
    /// accepts any name.
    pub fn link_names(self) -> &'static [&'static str] {
        match self {
            NodeKind::Single => &[NEXT],
            NodeKind::Double => &[NEXT, PREVIOUS],
            NodeKind::Tree => &[LEFT, RIGHT, PARENT],
            NodeKind::Named => &[],
        }
    }

    /// Whether a link of a node of this kind may point to a node of `target`
    /// kind.
    ///
    /// Fixed layouts only link to their own kind, so a typed view can trust
    /// that every neighbour it reads has the same layout.
    pub fn can_link_to(self, target: NodeKind) -> bool {
        self == NodeKind::Named || self == target
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            NodeKind::Single => "singly linked",
            NodeKind::Double => "doubly linked",
            NodeKind::Tree => "tree",
            NodeKind::Named => "named",
        };
        f.write_str(s)
    }
}

/// A link slot.
///
/// A slot that was explicitly cleared is [`Slot::Set`] with [`None`], which is
/// observably different from a slot that was never written.
enum Slot<T> {
    Unset,
    Set(Option<Node<T>>),
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Slot<T> {}

impl<T> Slot<T> {
    fn target(self) -> Option<Node<T>> {
        match self {
            Slot::Set(target) => target,
            Slot::Unset => None,
        }
    }
}

enum Links<T> {
    Single {
        next: Slot<T>,
    },
    Double {
        next: Slot<T>,
        previous: Slot<T>,
    },
    Tree {
        left: Slot<T>,
        right: Slot<T>,
        parent: Slot<T>,
    },
    Named(BTreeMap<String, Slot<T>>),
}

impl<T> Links<T> {
    fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Single => Links::Single { next: Slot::Unset },
            NodeKind::Double => Links::Double {
                next: Slot::Unset,
                previous: Slot::Unset,
            },
            NodeKind::Tree => Links::Tree {
                left: Slot::Unset,
                right: Slot::Unset,
                parent: Slot::Unset,
            },
            NodeKind::Named => Links::Named(BTreeMap::new()),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Links::Single { .. } => NodeKind::Single,
            Links::Double { .. } => NodeKind::Double,
            Links::Tree { .. } => NodeKind::Tree,
            Links::Named(_) => NodeKind::Named,
        }
    }

    /// Read a slot, [`None`] if the name is not a link of this layout.
    fn slot(&self, name: &str) -> Option<Slot<T>> {
        match (self, name) {
            (Links::Single { next } | Links::Double { next, .. }, NEXT) => Some(*next),
            (Links::Double { previous, .. }, PREVIOUS) => Some(*previous),
            (Links::Tree { left, .. }, LEFT) => Some(*left),
            (Links::Tree { right, .. }, RIGHT) => Some(*right),
            (Links::Tree { parent, .. }, PARENT) => Some(*parent),
            (Links::Named(map), name) => Some(map.get(name).copied().unwrap_or(Slot::Unset)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot<T>> {
        match (self, name) {
            (Links::Single { next } | Links::Double { next, .. }, NEXT) => Some(next),
            (Links::Double { previous, .. }, PREVIOUS) => Some(previous),
            (Links::Tree { left, .. }, LEFT) => Some(left),
            (Links::Tree { right, .. }, RIGHT) => Some(right),
            (Links::Tree { parent, .. }, PARENT) => Some(parent),
            (Links::Named(map), name) => Some(map.entry(name.to_owned()).or_insert(Slot::Unset)),
            _ => None,
        }
    }
}

pub struct NodeData<T> {
    payload: T,
    links: Links<T>,
}

impl<T> NodeData<T> {
    /// Consume the data of a deallocated node, dropping its links.
    pub fn into_payload(self) -> T { self.payload }
}

/// A handle to a node in a [`NodeArena`].
///
/// Handles are compared and hashed by identity, never by payload. Every
/// cycle-aware traversal in this crate keys its visited set on them.
pub struct Node<T>(GenericPtr<NodeData<T>>);

handle_impls!(Node);

/// The storage of all nodes.
///
/// Containers do not own their nodes, the arena does. A container only holds
/// handles to the nodes it can reach, so several containers may share nodes,
/// and links may form cycles.
pub struct NodeArena<T> {
    nodes: GenericArena<NodeData<T>>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self {
            nodes: GenericArena::default(),
        }
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: GenericArena::with_capacity(capacity),
        }
    }

    /// The number of live nodes.
    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Iterate over all live nodes, in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<T>> + '_ {
        self.nodes.iter().map(|(ptr, _)| Node(ptr))
    }

    /// Free a node and return its payload, or [`None`] if it was already
    /// freed. Links that still point at it read as absent from then on.
    pub fn remove(&mut self, node: Node<T>) -> Option<T> {
        self.try_dealloc(node).map(NodeData::into_payload)
    }
}

impl<T> ArenaPtr for Node<T> {
    type Arena = NodeArena<T>;
    type Data = NodeData<T>;
}

impl<T> Arena<Node<T>> for NodeArena<T> {
    fn alloc_with<F>(&mut self, f: F) -> Node<T>
    where
        F: FnOnce(Node<T>) -> NodeData<T>,
    {
        Node(self.nodes.alloc_with(|ptr| f(Node(ptr))))
    }

    fn try_dealloc(&mut self, ptr: Node<T>) -> Option<NodeData<T>> { self.nodes.try_dealloc(ptr.0) }

    fn try_deref(&self, ptr: Node<T>) -> Option<&NodeData<T>> { self.nodes.try_deref(ptr.0) }

    fn try_deref_mut(&mut self, ptr: Node<T>) -> Option<&mut NodeData<T>> {
        self.nodes.try_deref_mut(ptr.0)
    }
}

impl<T> Node<T> {
    /// Allocate a node with all links unset.
    pub fn new(arena: &mut NodeArena<T>, payload: T, kind: NodeKind) -> Self {
        arena.alloc(NodeData {
            payload,
            links: Links::new(kind),
        })
    }

    pub fn kind(self, arena: &NodeArena<T>) -> NodeKind { self.deref(arena).links.kind() }

    /// The kind of the node, or [`None`] if the handle is stale.
    pub fn try_kind(self, arena: &NodeArena<T>) -> Option<NodeKind> {
        self.try_deref(arena).map(|data| data.links.kind())
    }

    pub fn is_alive(self, arena: &NodeArena<T>) -> bool { arena.contains(self) }

    pub fn payload(self, arena: &NodeArena<T>) -> &T { &self.deref(arena).payload }

    pub fn payload_mut(self, arena: &mut NodeArena<T>) -> &mut T {
        &mut self.deref_mut(arena).payload
    }

    /// Replace the payload, returning the old one.
    pub fn set_payload(self, arena: &mut NodeArena<T>, payload: T) -> T {
        mem::replace(self.payload_mut(arena), payload)
    }

    /// Get the node a link points to.
    ///
    /// A link that was never set, was cleared, or points to a node that has
    /// since been deallocated reads as [`None`].
    ///
    /// # Returns
    ///
    /// - [`Error::UnknownLink`] if `name` is not a link of this node's kind.
    /// - [`Error::StaleNode`] if this handle is stale.
    pub fn get_link(self, arena: &NodeArena<T>, name: &str) -> Result<Option<Node<T>>> {
        let slot = self.checked_slot(arena, name)?;
        Ok(slot.target().filter(|target| arena.contains(*target)))
    }

    /// Whether the link has ever been written, including being explicitly
    /// cleared.
    pub fn has_link(self, arena: &NodeArena<T>, name: &str) -> Result<bool> {
        Ok(matches!(self.checked_slot(arena, name)?, Slot::Set(_)))
    }

    /// Point a link at `value`, or clear it with [`None`].
    ///
    /// # Returns
    ///
    /// - [`Error::UnknownLink`] if `name` is not a link of this node's kind.
    /// - [`Error::StaleNode`] if this handle or the target is stale.
    /// - [`Error::IncompatibleLink`] if the target's kind cannot be linked
    ///   from this node's kind.
    pub fn set_link(
        self,
        arena: &mut NodeArena<T>,
        name: &str,
        value: Option<Node<T>>,
    ) -> Result<()> {
        let kind = self.checked_slot(arena, name).map(|_| self.kind(arena))?;
        if let Some(target) = value {
            let target_kind = target.try_kind(arena).ok_or_else(|| target.stale())?;
            if !kind.can_link_to(target_kind) {
                return Err(Error::IncompatibleLink {
                    name: name.to_owned(),
                    kind,
                    target: target_kind,
                });
            }
        }
        self.store(arena, name, value);
        Ok(())
    }

    /// Compare the payload with a raw value.
    pub fn compare(self, arena: &NodeArena<T>, op: CmpOp, other: &T) -> Result<bool>
    where
        T: Comparable,
    {
        self.payload(arena).compare(op, other)
    }

    /// Compare the payloads of two nodes.
    pub fn compare_node(self, arena: &NodeArena<T>, op: CmpOp, other: Node<T>) -> Result<bool>
    where
        T: Comparable,
    {
        self.payload(arena).compare(op, other.payload(arena))
    }

    fn checked_slot(self, arena: &NodeArena<T>, name: &str) -> Result<Slot<T>> {
        let data = self.try_deref(arena).ok_or_else(|| self.stale())?;
        data.links.slot(name).ok_or_else(|| Error::UnknownLink {
            name: name.to_owned(),
            kind: data.links.kind(),
        })
    }

    fn stale(self) -> Error { Error::StaleNode(format!("{:?}", self.0)) }

    /// Read a link whose name is known to be valid for this node.
    pub(crate) fn link(self, arena: &NodeArena<T>, name: &str) -> Option<Node<T>> {
        self.deref(arena)
            .links
            .slot(name)
            .and_then(Slot::target)
            .filter(|target| arena.contains(*target))
    }

    /// Write a link whose name and target are known to be valid.
    pub(crate) fn store(self, arena: &mut NodeArena<T>, name: &str, value: Option<Node<T>>) {
        match self.deref_mut(arena).links.slot_mut(name) {
            Some(slot) => *slot = Slot::Set(value),
            None => unreachable!("`{}` is not a link of this node", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Value;

    #[test]
    fn test_link_set_and_clear() {
        let arena = &mut NodeArena::default();
        let a = Node::new(arena, 1, NodeKind::Single);
        let b = Node::new(arena, 2, NodeKind::Single);

        assert_eq!(a.get_link(arena, NEXT).unwrap(), None);
        assert!(!a.has_link(arena, NEXT).unwrap());

        a.set_link(arena, NEXT, Some(b)).unwrap();
        assert_eq!(a.get_link(arena, NEXT).unwrap(), Some(b));

        // an explicit clear reads as absent, but is remembered as set
        a.set_link(arena, NEXT, None).unwrap();
        assert_eq!(a.get_link(arena, NEXT).unwrap(), None);
        assert!(a.has_link(arena, NEXT).unwrap());
    }

    #[test]
    fn test_unknown_link_name() {
        let arena = &mut NodeArena::default();
        let a = Node::new(arena, 1, NodeKind::Single);
        let err = a.get_link(arena, LEFT).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownLink {
                name: LEFT.to_owned(),
                kind: NodeKind::Single,
            }
        );
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(a.set_link(arena, PREVIOUS, None).is_err());
    }

    #[test]
    fn test_incompatible_link_target() {
        let arena = &mut NodeArena::default();
        let list = Node::new(arena, 1, NodeKind::Double);
        let tree = Node::new(arena, 2, NodeKind::Tree);
        assert_eq!(
            list.set_link(arena, NEXT, Some(tree)),
            Err(Error::IncompatibleLink {
                name: NEXT.to_owned(),
                kind: NodeKind::Double,
                target: NodeKind::Tree,
            })
        );
        assert_eq!(list.get_link(arena, NEXT).unwrap(), None);
    }

    #[test]
    fn test_named_links() {
        let arena = &mut NodeArena::default();
        let hub = Node::new(arena, "hub", NodeKind::Named);
        let leaf = Node::new(arena, "leaf", NodeKind::Tree);

        hub.set_link(arena, "anything", Some(leaf)).unwrap();
        hub.set_link(arena, "other", None).unwrap();

        assert_eq!(hub.get_link(arena, "anything").unwrap(), Some(leaf));
        assert_eq!(hub.get_link(arena, "missing").unwrap(), None);
        assert!(hub.has_link(arena, "other").unwrap());
        assert!(!hub.has_link(arena, "missing").unwrap());
    }

    #[test]
    fn test_stale_target() {
        let arena = &mut NodeArena::default();
        let a = Node::new(arena, 1, NodeKind::Single);
        let b = Node::new(arena, 2, NodeKind::Single);
        a.set_link(arena, NEXT, Some(b)).unwrap();
        arena.try_dealloc(b);

        // the dangling link reads as absent
        assert_eq!(a.get_link(arena, NEXT).unwrap(), None);
        assert!(matches!(
            a.set_link(arena, NEXT, Some(b)),
            Err(Error::StaleNode(_))
        ));
        assert!(matches!(b.get_link(arena, NEXT), Err(Error::StaleNode(_))));
        assert!(!b.is_alive(arena));
    }

    #[test]
    fn test_remove() {
        let arena = &mut NodeArena::default();
        let a = Node::new(arena, "a".to_string(), NodeKind::Single);
        let b = Node::new(arena, "b".to_string(), NodeKind::Single);
        a.set_link(arena, NEXT, Some(b)).unwrap();

        assert_eq!(arena.remove(b), Some("b".to_string()));
        assert_eq!(arena.remove(b), None);
        assert_eq!(a.get_link(arena, NEXT).unwrap(), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_node_comparison() {
        let arena = &mut NodeArena::default();
        let yes = Node::new(arena, Value::Bool(true), NodeKind::Single);
        let no = Node::new(arena, Value::Bool(false), NodeKind::Single);

        assert!(yes.compare_node(arena, CmpOp::Lt, no).is_err());
        assert!(yes.compare_node(arena, CmpOp::Ne, no).unwrap());
        assert!(!yes.compare_node(arena, CmpOp::Eq, no).unwrap());

        let five = Node::new(arena, Value::Int(5), NodeKind::Single);
        assert!(five.compare(arena, CmpOp::Gt, &Value::Float(4.5)).unwrap());
    }

    #[test]
    fn test_payload_access() {
        let arena = &mut NodeArena::default();
        let a = Node::new(arena, 1, NodeKind::Tree);
        assert_eq!(a.set_payload(arena, 2), 1);
        *a.payload_mut(arena) += 1;
        assert_eq!(*a.payload(arena), 3);
        assert_eq!(a.kind(arena), NodeKind::Tree);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.nodes().collect::<Vec<_>>(), vec![a]);
    }
}
