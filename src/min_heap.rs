use thiserror::Error;

/// Array-backed binary min-heap.
///
/// Positions are 0-indexed: the parent of `i` is `(i - 1) / 2` and its
/// children are `2i + 1` and `2i + 2`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![] }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Only defined for `i > 0`; the root has no parent.
    fn parent(i: usize) -> usize {
        debug_assert!(i > 0);
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapErr {
    #[error("cannot extract from an empty heap")]
    HeapUnderflow,
}

impl<T: PartialOrd> MinHeap<T> {
    /// Checks that no element is smaller than its parent.
    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn min_heapify(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 && self.elements[Self::parent(i)] > self.elements[i] {
            let p = Self::parent(i);
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let result = self.elements.swap_remove(0);
        self.min_heapify(0);
        Ok(result)
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A payload keyed by weight. Ordering looks at the weight only, so equal
/// weights come out in whatever order the heap holds them.
#[derive(Debug, Clone, Copy)]
pub struct Element<T> {
    pub weight: u64,
    pub data: T,
}

impl<T> Element<T> {
    pub fn new(weight: u64, data: T) -> Self {
        Element { weight, data }
    }
}

impl<T> PartialEq for Element<T> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl<T> PartialOrd for Element<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.weight.cmp(&other.weight))
    }
}
