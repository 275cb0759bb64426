use thiserror::Error;

use crate::node::NodeKind;
use crate::value::CmpOp;

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A link name, link target, or payload comparison was of the wrong type.
    Type,
    /// An index was out of bounds, or the container was empty.
    Index,
    /// A structure that must be acyclic turned out not to be.
    Structure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The link name does not exist on this kind of node.
    #[error("`{name}` is not a link of a {kind} node")]
    UnknownLink { name: String, kind: NodeKind },

    /// The link target is of a kind this node cannot point to.
    #[error("link `{name}` of a {kind} node cannot point to a {target} node")]
    IncompatibleLink {
        name: String,
        kind: NodeKind,
        target: NodeKind,
    },

    /// The node handle refers to a node that has been deallocated.
    #[error("node handle {0} does not refer to a live node")]
    StaleNode(String),

    /// Ordering comparisons are refused for textual and boolean payloads, and
    /// for payloads that have no order relative to each other.
    #[error("`{op}` is not supported between {ty} and {against} payloads")]
    UnorderedComparison {
        op: CmpOp,
        ty: &'static str,
        against: &'static str,
    },

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("cannot delete from an empty {0}")]
    Empty(&'static str),

    /// A search descended into a node it had already passed through.
    #[error("the {0} contains a cycle")]
    Cycle(&'static str),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownLink { .. }
            | Error::IncompatibleLink { .. }
            | Error::StaleNode(_)
            | Error::UnorderedComparison { .. } => ErrorKind::Type,
            Error::IndexOutOfBounds { .. } | Error::Empty(_) => ErrorKind::Index,
            Error::Cycle(_) => ErrorKind::Structure,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
