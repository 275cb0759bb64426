//! Linked nodes and the containers built on them.
//!
//! All nodes live in a [`NodeArena`] and are referred to by copyable handles.
//! Links between nodes are non-owning, so chains and trees assembled by hand
//! may share nodes or loop back into themselves; every traversal in the crate
//! tracks node identities and terminates on such structures.
//!
//! - [`node`]: the generic node with named links, and the typed views
//!   [`SingleNode`], [`DoubleNode`] and [`TreeNode`].
//! - [`container`]: [`LinkedList`], [`DoublyLinkedList`] and [`BinaryTree`].
//! - [`heap`], [`graph`] and [`challenges`]: smaller utilities on the side.
//!
//! ```
//! use linkwork::{ChainNode, LinkedList, NodeArena};
//!
//! # fn main() -> linkwork::Result<()> {
//!
//! let mut arena = NodeArena::new();
//! let mut list = LinkedList::from_values(&mut arena, [1, 2, 3]);
//! list.insert_at_head(&mut arena, 0);
//! let last = list.delete_at_tail(&mut arena)?;
//! assert_eq!(arena.remove(last.node()), Some(3));
//! assert_eq!(list.display(&arena).to_string(), "0 -> 1 -> 2 -> None");
//! # Ok(())
//! # }
//! ```

pub mod challenges;
pub mod container;
pub mod error;
pub mod heap;
pub mod infra;
pub mod node;
pub mod value;

#[cfg(feature = "graph")]
pub mod graph;

pub use container::*;
pub use error::{Error, ErrorKind, Result};
pub use node::*;
pub use value::*;
