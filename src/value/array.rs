//! Ordered sequence of owned values.
//!
//! The array is a doubly linked list addressed by slot index. Slot 0 is the
//! head sentinel and slot 1 the tail sentinel; neither ever holds a value and
//! both exist for the whole life of the array, including when it is empty.
//! Slots freed by `delete` are recycled by later inserts.

use std::fmt;

use tracing::debug;

use super::Value;
use crate::error::{ErrorCode, SimjsonResult};

const HEAD: usize = 0;
const TAIL: usize = 1;
const NIL: usize = usize::MAX;

#[derive(Clone)]
struct Node {
    prev: usize,
    next: usize,
    value: Option<Value>,
}

/// A JSON array owning its elements.
#[derive(Clone)]
pub struct Array {
    nodes: Vec<Node>,
    free: Vec<usize>,
    len: usize,
}

impl Array {
    /// Create an empty array (just the two sentinels).
    pub fn new() -> Self {
        Self {
            nodes: vec![
                Node {
                    prev: NIL,
                    next: TAIL,
                    value: None,
                },
                Node {
                    prev: HEAD,
                    next: NIL,
                    value: None,
                },
            ],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of elements (sentinels excluded).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value` so that it ends up at `index`.
    ///
    /// Valid for `index <= len`; `index == len` appends. On an out-of-range
    /// index the array is left untouched and the value is dropped.
    pub fn insert(&mut self, value: Value, index: usize) -> SimjsonResult<()> {
        if index > self.len {
            debug!(index, size = self.len, "array insert index out of range");
            return Err(ErrorCode::E200_IndexOutOfRange(index as u64, self.len as u64));
        }

        let prev = if index == self.len {
            self.nodes[TAIL].prev
        } else {
            self.nodes[self.slot_at(index)].prev
        };
        let next = self.nodes[prev].next;

        let slot = self.alloc(Node {
            prev,
            next,
            value: Some(value),
        });
        self.nodes[prev].next = slot;
        self.nodes[next].prev = slot;
        self.len += 1;

        Ok(())
    }

    /// Append `value` after the last element.
    pub fn push(&mut self, value: Value) {
        let prev = self.nodes[TAIL].prev;
        let slot = self.alloc(Node {
            prev,
            next: TAIL,
            value: Some(value),
        });
        self.nodes[prev].next = slot;
        self.nodes[TAIL].prev = slot;
        self.len += 1;
    }

    /// Element at `index`, or `None` if `index >= len`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        if index >= self.len {
            debug!(index, size = self.len, "array get index out of range");
            return None;
        }
        self.nodes[self.slot_at(index)].value.as_ref()
    }

    /// Mutable element at `index`, or `None` if `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        if index >= self.len {
            debug!(index, size = self.len, "array get index out of range");
            return None;
        }
        let slot = self.slot_at(index);
        self.nodes[slot].value.as_mut()
    }

    /// Remove and drop the element at `index`.
    ///
    /// Elements after `index` shift down by one.
    pub fn delete(&mut self, index: usize) -> SimjsonResult<()> {
        if index >= self.len {
            debug!(index, size = self.len, "array delete index out of range");
            return Err(ErrorCode::E200_IndexOutOfRange(index as u64, self.len as u64));
        }

        let slot = self.slot_at(index);
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let node = &mut self.nodes[slot];
        node.value = None;
        node.prev = NIL;
        node.next = NIL;
        self.free.push(slot);
        self.len -= 1;

        Ok(())
    }

    /// Iterate over every element from index 0. Valid on an empty array.
    pub fn iter(&self) -> ArrayIter<'_> {
        ArrayIter {
            array: self,
            cursor: self.nodes[HEAD].next,
            index: 0,
        }
    }

    /// Iterate starting at an existing element.
    ///
    /// `start` must name a concrete element (`start < len`), so creating an
    /// iterator over an empty array always fails.
    pub fn iter_from(&self, start: usize) -> SimjsonResult<ArrayIter<'_>> {
        if start >= self.len {
            debug!(start, size = self.len, "array iterator start out of range");
            return Err(ErrorCode::E206_IteratorStartOutOfRange(start as u64, self.len as u64));
        }
        Ok(ArrayIter {
            array: self,
            cursor: self.slot_at(start),
            index: start,
        })
    }

    /// Slot of the element at `index`, walking from the nearer sentinel.
    ///
    /// Caller guarantees `index < len`.
    fn slot_at(&self, index: usize) -> usize {
        let last = self.len - 1;
        if index == last {
            return self.nodes[TAIL].prev;
        }

        if index <= last / 2 {
            let mut slot = self.nodes[HEAD].next;
            for _ in 0..index {
                slot = self.nodes[slot].next;
            }
            slot
        } else {
            let mut slot = self.nodes[TAIL].prev;
            for _ in index..last {
                slot = self.nodes[slot].prev;
            }
            slot
        }
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
}

impl Array {
    /// Move nested containers into `pending`, leaving scalars in place.
    pub(super) fn detach_nested(&mut self, pending: &mut Vec<Value>) {
        for node in self.nodes.iter_mut() {
            if node.value.as_ref().is_some_and(super::is_container) {
                pending.extend(node.value.take());
            }
        }
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_nested(&mut pending);
        super::release(pending);
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|((_, a), (_, b))| a == b)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(_, value)| value))
            .finish()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut array = Array::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = (usize, &'a Value);
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over an [`Array`], yielding `(index, value)` pairs.
///
/// Holds a shared borrow of the array, so the array cannot be mutated while
/// the iterator is alive.
pub struct ArrayIter<'a> {
    array: &'a Array,
    cursor: usize,
    index: usize,
}

impl<'a> ArrayIter<'a> {
    /// Returns true while elements remain.
    pub fn has_next(&self) -> bool {
        self.index < self.array.len
    }

    /// Index of the element the next call to `next` returns.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = (usize, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let node = &self.array.nodes[self.cursor];
        let value = node.value.as_ref()?;
        let index = self.index;
        self.cursor = node.next;
        self.index += 1;
        Some((index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArrayIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(array: &Array) -> Vec<i64> {
        array
            .iter()
            .map(|(_, v)| v.as_i64().unwrap())
            .collect()
    }

    fn numbered(n: i64) -> Array {
        (0..n).map(Value::from).collect()
    }

    #[test]
    fn new_array_is_empty() {
        let array = Array::new();
        assert_eq!(array.len(), 0);
        assert!(array.is_empty());
        assert!(array.get(0).is_none());
    }

    #[test]
    fn insert_front_middle_back() {
        let mut array = Array::new();
        array.insert(Value::from(2), 0).unwrap();
        array.insert(Value::from(0), 0).unwrap();
        array.insert(Value::from(3), 2).unwrap();
        array.insert(Value::from(1), 1).unwrap();
        assert_eq!(ints(&array), vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_past_end_fails_without_mutation() {
        let mut array = numbered(3);
        let result = array.insert(Value::Null, 4);
        assert_eq!(result, Err(ErrorCode::E200_IndexOutOfRange(4, 3)));
        assert_eq!(ints(&array), vec![0, 1, 2]);
    }

    #[test]
    fn get_walks_from_both_ends() {
        let array = numbered(9);
        for i in 0..9 {
            assert_eq!(array.get(i).and_then(Value::as_i64), Some(i as i64));
        }
        assert!(array.get(9).is_none());
    }

    #[test]
    fn delete_shifts_following_elements() {
        let mut array = numbered(5);
        array.delete(1).unwrap();
        assert_eq!(ints(&array), vec![0, 2, 3, 4]);
        array.delete(3).unwrap();
        assert_eq!(ints(&array), vec![0, 2, 3]);
        array.delete(0).unwrap();
        assert_eq!(ints(&array), vec![2, 3]);
        assert_eq!(
            array.delete(2),
            Err(ErrorCode::E200_IndexOutOfRange(2, 2))
        );
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut array = numbered(4);
        array.delete(2).unwrap();
        array.delete(0).unwrap();
        array.push(Value::from(10));
        array.insert(Value::from(11), 0).unwrap();
        assert_eq!(ints(&array), vec![11, 1, 3, 10]);
        assert_eq!(array.nodes.len(), 6);
    }

    #[test]
    fn iter_from_requires_existing_element() {
        let empty = Array::new();
        assert_eq!(
            empty.iter_from(0).err(),
            Some(ErrorCode::E206_IteratorStartOutOfRange(0, 0))
        );

        let array = numbered(4);
        assert_eq!(
            array.iter_from(4).err(),
            Some(ErrorCode::E206_IteratorStartOutOfRange(4, 4))
        );

        let mut it = array.iter_from(2).unwrap();
        assert!(it.has_next());
        assert_eq!(it.next().map(|(i, v)| (i, v.as_i64())), Some((2, Some(2))));
        assert_eq!(it.next().map(|(i, v)| (i, v.as_i64())), Some((3, Some(3))));
        assert!(!it.has_next());
        assert!(it.next().is_none());
    }

    #[test]
    fn iter_on_empty_array_yields_nothing() {
        let array = Array::new();
        let mut it = array.iter();
        assert!(!it.has_next());
        assert!(it.next().is_none());
    }

    #[test]
    fn get_mut_replaces_in_place() {
        let mut array = numbered(3);
        if let Some(slot) = array.get_mut(1) {
            *slot = Value::from("one");
        }
        assert_eq!(array.get(1).and_then(Value::as_str), Some("one"));
    }

    #[test]
    fn equality_is_positional() {
        assert_eq!(numbered(3), numbered(3));
        let mut reversed = Array::new();
        for i in 0..3 {
            reversed.insert(Value::from(i), 0).unwrap();
        }
        assert_ne!(numbered(3), reversed);
    }
}
