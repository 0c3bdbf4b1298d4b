use std::{cmp::Ordering, fmt, mem};

use crate::error::{HeapError, Result};

/// Index of the parent of `index`. Must not be called on the root.
#[inline]
fn parent(index: usize) -> usize {
    (index + 1) / 2 - 1
}

#[inline]
fn left_child(index: usize) -> usize {
    2 * index + 1
}

#[inline]
fn right_child(index: usize) -> usize {
    2 * index + 2
}

/// Array-backed binary heap ordered by an injected comparator
///
/// The element that compares smallest under the comparator sits on top.
/// A max-heap is obtained by handing in an inverted comparator, such as [`crate::order::inverted`].
///
/// The elements live in a single contiguous [`Vec`], read as a complete binary tree:
/// the children of index `i` are at `2i + 1` and `2i + 2`, and its parent is at `(i + 1) / 2 - 1`.
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `add`          | O(log n)   |
/// | `remove_top`   | O(log n)   |
/// | `push_pop`     | O(log n)   |
/// | `peek_top`     | O(1)       |
/// | `size`         | O(1)       |
#[derive(Clone)]
pub struct Heap<T, C> {
    /// Backing storage, in tree order
    data: Vec<T>,
    /// Total order over `T`
    ///
    /// Must stay the same for the whole life of the heap
    compare: C,
}

impl<T, C> Heap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Constructs an empty heap ordered by `compare`
    pub fn new(compare: C) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    /// Constructs an empty heap ordered by `compare`, with room for `capacity` elements before reallocating
    pub fn with_capacity(compare: C, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Number of elements currently in the heap
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inserts `value`, sifting it up towards the root
    ///
    /// The value moves past its parent only while it compares strictly less,
    /// so equal elements never swap.
    pub fn add(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Returns the top element without removing it
    ///
    /// Fails with [`HeapError::Empty`] if there is nothing in the heap.
    pub fn peek_top(&self) -> Result<&T> {
        self.data.first().ok_or(HeapError::Empty)
    }

    /// Removes and returns the top element
    ///
    /// The last element is moved into the root slot and sifted down.
    /// Fails with [`HeapError::Empty`] if there is nothing in the heap.
    pub fn remove_top(&mut self) -> Result<T> {
        let last = self.data.pop().ok_or(HeapError::Empty)?;

        match self.data.first_mut() {
            Some(root) => {
                let top = mem::replace(root, last);
                self.sift_down(0);
                Ok(top)
            }
            // `last` was the only element, so it is the top
            None => Ok(last),
        }
    }

    /// Inserts `value`, then removes and returns the top element
    ///
    /// Gives the same result, and leaves the same elements behind, as [`Self::add`] followed by [`Self::remove_top`].
    /// Unlike that pair it cannot fail, and it sifts at most once.
    ///
    /// If the heap is empty, or `value` compares strictly less than the current top,
    /// `value` is handed straight back and the heap is untouched.
    /// On a tie the current top is returned, and `value` takes its place.
    pub fn push_pop(&mut self, value: T) -> T {
        let displaces_top = match self.data.first() {
            Some(top) => (self.compare)(top, &value) != Ordering::Greater,
            None => false,
        };

        if !displaces_top {
            return value;
        }

        let top = mem::replace(&mut self.data[0], value);
        self.sift_down(0);
        top
    }

    /// Consumes the heap, returning its elements in comparator order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Ok(top) = self.remove_top() {
            sorted.push(top);
        }

        sorted
    }

    /// Checks the heap property between every node and each of its children
    ///
    /// This is a validation helper: it scans the whole heap in O(n),
    /// and is meant for tests and debug assertions rather than normal control flow.
    pub fn is_consistent(&self) -> bool {
        (1..self.data.len()).all(|child| {
            (self.compare)(&self.data[parent(child)], &self.data[child]) != Ordering::Greater
        })
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);

            if (self.compare)(&self.data[index], &self.data[parent]) == Ordering::Less {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();

        loop {
            let left = left_child(index);
            let right = right_child(index);

            // Pick the child that should replace us, if any
            // On a tie between the children the right one is taken
            let child = if right < len {
                if (self.compare)(&self.data[left], &self.data[right]) == Ordering::Less {
                    left
                } else {
                    right
                }
            } else if left < len {
                left
            } else {
                break;
            };

            // Only move down when strictly greater: ties stay put
            if (self.compare)(&self.data[index], &self.data[child]) == Ordering::Greater {
                self.data.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Heap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap").field("data", &self.data).finish()
    }
}
