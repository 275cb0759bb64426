//! An array-backed binary heap that can be either a min-heap or a max-heap.

use std::cmp::Ordering;

use log::trace;

/// Which end of the order sits at the top of a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapOrder {
    #[default]
    Min,
    Max,
}

impl HeapOrder {
    /// Whether `a` belongs above `b`.
    fn above<T: Ord>(self, a: &T, b: &T) -> bool {
        matches!(
            (self, a.cmp(b)),
            (HeapOrder::Min, Ordering::Less) | (HeapOrder::Max, Ordering::Greater)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap<T> {
    data: Vec<T>,
    order: HeapOrder,
}

impl<T: Ord> Heap<T> {
    pub fn new(order: HeapOrder) -> Self {
        Self {
            data: Vec::new(),
            order,
        }
    }

    pub fn from_values<I>(order: HeapOrder, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut heap = Self::new(order);
        for value in values {
            heap.push(value);
        }
        heap
    }

    pub fn order(&self) -> HeapOrder { self.order }

    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// The top element, the smallest for a min-heap and the largest for a
    /// max-heap.
    pub fn peek(&self) -> Option<&T> { self.data.first() }

    pub fn push(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the top element.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let top = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.order.above(&self.data[index], &self.data[parent]) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let mut top = index;
            for child in [2 * index + 1, 2 * index + 2] {
                if child < len && self.order.above(&self.data[child], &self.data[top]) {
                    top = child;
                }
            }
            if top == index {
                break;
            }
            trace!("sift down {} -> {}", index, top);
            self.data.swap(index, top);
            index = top;
        }
    }
}
