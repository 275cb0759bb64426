//! Nodes and their links.
//!
//! A [`Node`] is a handle into a [`NodeArena`]: a payload plus a set of named,
//! non-owning links to other nodes. The link layout is fixed by the node's
//! [`NodeKind`]. Typed views ([`SingleNode`], [`DoubleNode`], [`TreeNode`])
//! wrap a node of a known kind and expose the links as plain accessors.

/// Implement the handle traits without putting bounds on the payload type.
macro_rules! handle_impls {
    ($name:ident) => {
        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self { *self }
        }

        impl<T> Copy for $name<T> {}

        impl<T> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
        }

        impl<T> Eq for $name<T> {}

        impl<T> std::hash::Hash for $name<T> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.0.hash(state) }
        }

        impl<T> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.0)
            }
        }
    };
}

mod base;
mod chain;
mod tree;

pub use base::*;
pub use chain::*;
pub use tree::*;
