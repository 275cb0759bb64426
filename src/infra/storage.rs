//! Storage Infrastructure
//!
//! This module provides [`Arena`] and [`ArenaPtr`] as storage infrastructure,
//! with [`GenericArena`] and [`GenericPtr`] as the basic implementation that
//! the node arena is built on.
//!
//! Nodes are stored in an arena and refer to each other through lightweight
//! pointers. This sidesteps lifetime and ownership problems entirely: links
//! can form cycles, be shared between containers, or point back to a parent
//! without any reference counting.
//!
//! The arena is generational. Every slot carries a generation counter that is
//! bumped when the slot is freed, so a pointer that outlived its data can be
//! detected instead of silently aliasing whatever was allocated next.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::{fmt, mem};

/// A trait for indexing into an arena.
pub trait ArenaPtr: Copy + Eq + Hash {
    /// The arena type, which should support the pointer type.
    type Arena: Arena<Self>;

    /// The internal data.
    type Data;

    /// Try to dereference the pointer with an arena.
    ///
    /// # Returns
    ///
    /// - `Some(&Self::Data)`: A reference to the data in the arena.
    /// - `None`: The pointer is stale or invalid.
    fn try_deref(self, arena: &Self::Arena) -> Option<&Self::Data> { arena.try_deref(self) }

    /// Try to mutably dereference the pointer with an arena.
    ///
    /// # Returns
    ///
    /// - `Some(&mut Self::Data)`: A mutable reference to the data in the arena.
    /// - `None`: The pointer is stale or invalid.
    fn try_deref_mut(self, arena: &mut Self::Arena) -> Option<&mut Self::Data> {
        arena.try_deref_mut(self)
    }

    /// Convenient method to dereference the pointer.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is stale.
    fn deref(self, arena: &Self::Arena) -> &Self::Data {
        self.try_deref(arena).expect("stale pointer dereferenced")
    }

    /// Convenient method to mutably dereference the pointer.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is stale.
    fn deref_mut(self, arena: &mut Self::Arena) -> &mut Self::Data {
        self.try_deref_mut(arena)
            .expect("stale pointer dereferenced")
    }
}

/// A trait for an arena that can store data and allocate pointers.
///
/// # Type Parameters
///
/// - `Ptr`: The pointer type that is supported by the arena. The data type is
///   inferred from the pointer type by using [`ArenaPtr::Data`].
pub trait Arena<Ptr>
where
    Ptr: ArenaPtr<Arena = Self>,
{
    /// Construct data with the allocated pointer and store it into the arena.
    ///
    /// This allows the stored data to know its own pointer.
    fn alloc_with<F>(&mut self, f: F) -> Ptr
    where
        F: FnOnce(Ptr) -> Ptr::Data;

    /// Store data into the arena and return the allocated pointer.
    fn alloc(&mut self, data: Ptr::Data) -> Ptr { self.alloc_with(|_| data) }

    /// Deallocate the data of the pointer from the arena.
    ///
    /// # Returns
    ///
    /// - `Some(Ptr::Data)`: The data of the deallocated pointer.
    /// - `None`: The pointer is stale, nothing is deallocated.
    fn try_dealloc(&mut self, ptr: Ptr) -> Option<Ptr::Data>;

    /// Try to dereference a pointer.
    fn try_deref(&self, ptr: Ptr) -> Option<&Ptr::Data>;

    /// Try to mutably dereference a pointer.
    fn try_deref_mut(&mut self, ptr: Ptr) -> Option<&mut Ptr::Data>;

    /// Check if the pointer still refers to live data.
    fn contains(&self, ptr: Ptr) -> bool { self.try_deref(ptr).is_some() }
}

/// A generic arena pointer.
///
/// The pointer can only be allocated by [`GenericArena`]. One should not create
/// a pointer manually.
///
/// The pointer is a raw slot index plus the generation of the slot at the
/// time of allocation. Two pointers are equal only if both match, so a pointer
/// to a freed and re-used slot never compares equal to the new occupant.
///
/// # Type Parameters
///
/// - `Data`: The type of the stored data, which is the same as the data type in
///   the arena.
pub struct GenericPtr<Data> {
    /// The raw index of the slot.
    index: usize,
    /// The generation of the slot when this pointer was handed out.
    generation: u32,
    _phantom: PhantomData<Data>,
}

impl<Data> GenericPtr<Data> {
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index,
            generation,
            _phantom: PhantomData,
        }
    }

    /// Get the raw slot index.
    pub fn index(self) -> usize { self.index }

    /// Get the slot generation this pointer was allocated with.
    pub fn generation(self) -> u32 { self.generation }
}

impl<Data> Clone for GenericPtr<Data> {
    fn clone(&self) -> Self { *self }
}

impl<Data> Copy for GenericPtr<Data> {}

impl<Data> Hash for GenericPtr<Data> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<Data> PartialEq for GenericPtr<Data> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<Data> Eq for GenericPtr<Data> {}

impl<Data> PartialOrd for GenericPtr<Data> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<Data> Ord for GenericPtr<Data> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<Data> fmt::Debug for GenericPtr<Data> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "*{}v{}", self.index, self.generation)
    }
}

impl<Data> fmt::Display for GenericPtr<Data> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "*{}", self.index) }
}

/// An entry in a generic arena.
pub enum GenericEntry<Data> {
    /// The entry is vacant.
    ///
    /// The free list is ordered by de-allocation, the last deallocated entry
    /// will be the first one re-used.
    Vacant {
        /// The index of the next vacant entry.
        next: Option<usize>,
        /// The generation the next occupant of this slot will get.
        generation: u32,
    },
    /// The entry is occupied.
    Occupied {
        /// The generation of the current occupant.
        generation: u32,
        data: Data,
    },
}

/// A generational arena.
///
/// # Type Parameters
///
/// - `Data`: The type of the stored data. All allocated pointers will have this
///   as the data type.
///
/// # Examples
///
/// ```
/// use linkwork::infra::storage::{Arena, ArenaPtr, GenericArena};
///
/// let mut arena = GenericArena::default();
///
/// let one = arena.alloc(1);
/// let two = arena.alloc(2);
/// assert_ne!(one, two);
/// assert_eq!(one.try_deref(&arena), Some(&1));
///
/// // a freed slot is re-used, but the old pointer stays dead
/// assert_eq!(arena.try_dealloc(two), Some(2));
/// let three = arena.alloc(3);
/// assert_eq!(three.index(), two.index());
/// assert_eq!(two.try_deref(&arena), None);
/// assert_eq!(three.try_deref(&arena), Some(&3));
/// ```
pub struct GenericArena<Data> {
    /// The entries in the arena.
    entries: Vec<GenericEntry<Data>>,
    /// The head of the free list.
    free_head: Option<usize>,
    /// The number of occupied entries.
    len: usize,
}

impl<Data> Default for GenericArena<Data> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
        }
    }
}

impl<Data> GenericArena<Data> {
    /// Create a new arena with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// The number of live entries.
    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Iterate over the live pointers and their data.
    pub fn iter(&self) -> impl Iterator<Item = (GenericPtr<Data>, &Data)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                GenericEntry::Occupied { generation, data } => {
                    Some((GenericPtr::new(index, *generation), data))
                }
                GenericEntry::Vacant { .. } => None,
            })
    }
}

impl<Data> ArenaPtr for GenericPtr<Data> {
    type Arena = GenericArena<Data>;
    type Data = Data;
}

impl<Data> Arena<GenericPtr<Data>> for GenericArena<Data> {
    fn alloc_with<F>(&mut self, f: F) -> GenericPtr<Data>
    where
        F: FnOnce(GenericPtr<Data>) -> Data,
    {
        self.len += 1;
        match self.free_head.take() {
            Some(index) => {
                let entry = &mut self.entries[index];
                let generation = match entry {
                    GenericEntry::Vacant { next, generation } => {
                        self.free_head = *next;
                        *generation
                    }
                    // the free list only threads through vacant entries
                    GenericEntry::Occupied { .. } => unreachable!(),
                };
                let ptr = GenericPtr::new(index, generation);
                *entry = GenericEntry::Occupied {
                    generation,
                    data: f(ptr),
                };
                ptr
            }
            None => {
                let ptr = GenericPtr::new(self.entries.len(), 0);
                self.entries.push(GenericEntry::Occupied {
                    generation: 0,
                    data: f(ptr),
                });
                ptr
            }
        }
    }

    fn try_dealloc(&mut self, ptr: GenericPtr<Data>) -> Option<Data> {
        match self.entries.get(ptr.index)? {
            GenericEntry::Occupied { generation, .. } if *generation == ptr.generation => {}
            _ => return None,
        }
        let old_entry = mem::replace(
            &mut self.entries[ptr.index],
            GenericEntry::Vacant {
                next: self.free_head,
                generation: ptr.generation.wrapping_add(1),
            },
        );
        self.free_head = Some(ptr.index);
        self.len -= 1;
        match old_entry {
            GenericEntry::Occupied { data, .. } => Some(data),
            GenericEntry::Vacant { .. } => unreachable!(),
        }
    }

    fn try_deref(&self, ptr: GenericPtr<Data>) -> Option<&Data> {
        match self.entries.get(ptr.index)? {
            GenericEntry::Occupied { generation, data } if *generation == ptr.generation => {
                Some(data)
            }
            _ => None,
        }
    }

    fn try_deref_mut(&mut self, ptr: GenericPtr<Data>) -> Option<&mut Data> {
        match self.entries.get_mut(ptr.index)? {
            GenericEntry::Occupied { generation, data } if *generation == ptr.generation => {
                Some(data)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_arena() {
        let mut arena = GenericArena::default();
        let ptr1 = arena.alloc(1);
        let ptr2 = arena.alloc(2);
        let ptr3 = arena.alloc(3);
        assert_eq!(arena.len(), 3);
        assert_eq!(
            arena.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(arena.try_dealloc(ptr2), Some(2));
        assert_eq!(arena.len(), 2);
        assert_eq!(
            arena.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec![1, 3]
        );
        let ptr4 = arena.alloc(4);
        // same slot, new generation
        assert_eq!(ptr4.index(), ptr2.index());
        assert_ne!(ptr4, ptr2);
        assert_eq!(ptr4.generation(), ptr2.generation() + 1);
        assert_eq!(ptr4.try_deref(&arena), Some(&4));
        assert_eq!(ptr2.try_deref(&arena), None);
        assert_eq!(ptr1.try_deref(&arena), Some(&1));
        assert_eq!(ptr3.try_deref(&arena), Some(&3));
    }

    #[test]
    fn test_generic_arena_double_free() {
        let mut arena = GenericArena::default();
        let ptr1 = arena.alloc(1);
        assert_eq!(arena.try_dealloc(ptr1), Some(1));
        assert_eq!(arena.try_dealloc(ptr1), None);
        assert!(arena.is_empty());

        // the free list is still intact after the rejected free
        let ptr2 = arena.alloc(2);
        let ptr3 = arena.alloc(3);
        assert_ne!(ptr2.index(), ptr3.index());
    }

    #[test]
    fn test_generic_arena_stale_free_keeps_new_occupant() {
        let mut arena = GenericArena::default();
        let old = arena.alloc(1);
        arena.try_dealloc(old);
        let new = arena.alloc(2);
        assert_eq!(arena.try_dealloc(old), None);
        assert_eq!(new.try_deref(&arena), Some(&2));
    }

    #[test]
    fn test_generic_arena_deref_mut() {
        let mut arena = GenericArena::default();
        let ptr1 = arena.alloc(1);
        *ptr1.deref_mut(&mut arena) = 5;
        assert_eq!(ptr1.deref(&arena), &5);
        assert!(arena.contains(ptr1));
        arena.try_dealloc(ptr1);
        assert!(!arena.contains(ptr1));
        assert_eq!(ptr1.try_deref_mut(&mut arena), None);
    }

    #[test]
    #[should_panic(expected = "stale pointer dereferenced")]
    fn test_generic_arena_stale_deref_panics() {
        let mut arena = GenericArena::default();
        let ptr1 = arena.alloc(1);
        arena.try_dealloc(ptr1);
        ptr1.deref(&arena);
    }
}
