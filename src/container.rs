//! Containers over linked nodes.
//!
//! A container records the entry points of a structure (head and tail, or
//! root) and its size. The nodes themselves live in a [`NodeArena`]; every
//! container operation takes the arena as an explicit context argument.
//!
//! [`NodeArena`]: crate::node::NodeArena

mod list;
mod tree;

pub use list::*;
pub use tree::*;
