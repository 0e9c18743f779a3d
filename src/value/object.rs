//! Unique-key mapping from byte-string keys to owned values.
//!
//! Backed by a hash table whose bucket count is chosen at creation and never
//! changes: there is no resize and no rehash. Each bucket holds a singly linked
//! chain with the newest entry at its head. Keys are hashed with djb2 and
//! placed in bucket `hash % (bucket_count - 1)`, so the last bucket is never
//! used; iteration order (and therefore encoder output) depends on this.

use std::fmt;

use tracing::debug;

use super::Value;
use crate::error::{key_for_display, ErrorCode, SimjsonResult};

struct Entry {
    key: Box<[u8]>,
    value: Value,
    next: Option<Box<Entry>>,
}

/// A JSON object owning its keys and values.
pub struct Object {
    buckets: Box<[Option<Box<Entry>>]>,
    len: usize,
}

/// djb2 over the raw key bytes (seed 5381, `hash * 33 + byte`).
///
/// Works on the full slice, so keys may contain zero bytes.
pub fn djb2(key: &[u8]) -> u64 {
    key.iter().fold(5381u64, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
    })
}

impl Object {
    /// Bucket count used when the caller passes 0.
    pub const DEFAULT_BUCKET_COUNT: usize = 64;

    /// Create an empty object with the default bucket count.
    pub fn new() -> Self {
        Self::with_buckets(Self::DEFAULT_BUCKET_COUNT)
    }

    /// Create an empty object with `bucket_count` buckets (0 means default).
    ///
    /// Size this up front for large objects; it is fixed for the object's
    /// lifetime.
    pub fn with_buckets(bucket_count: usize) -> Self {
        let bucket_count = if bucket_count == 0 {
            Self::DEFAULT_BUCKET_COUNT
        } else {
            bucket_count
        };
        Self {
            buckets: (0..bucket_count).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets in the table.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket a key hashes to.
    ///
    /// A one-bucket table sends every key to bucket 0.
    pub fn bucket_index(&self, key: &[u8]) -> usize {
        let divisor = self.buckets.len() as u64 - 1;
        if divisor == 0 {
            return 0;
        }
        (djb2(key) % divisor) as usize
    }

    /// Add `key -> value`, copying the key.
    ///
    /// Fails on an empty key or when the key already exists; in both cases the
    /// table is unchanged and `value` is dropped.
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: Value) -> SimjsonResult<()> {
        let key = key.as_ref();
        if key.is_empty() {
            debug!("object key is empty");
            return Err(ErrorCode::E201_EmptyKey);
        }
        if self.get(key).is_some() {
            debug!(key = %key_for_display(key), "object key already exists");
            return Err(ErrorCode::E202_DuplicateKey(key_for_display(key)));
        }

        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        let entry = Box::new(Entry {
            key: key.into(),
            value,
            next: bucket.take(),
        });
        *bucket = Some(entry);
        self.len += 1;

        Ok(())
    }

    /// Value stored under `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        let key = key.as_ref();
        if key.is_empty() {
            return None;
        }
        let mut item = self.buckets[self.bucket_index(key)].as_deref();
        while let Some(entry) = item {
            if entry.key.len() == key.len() && *entry.key == *key {
                return Some(&entry.value);
            }
            item = entry.next.as_deref();
        }
        None
    }

    /// Mutable value stored under `key`.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Value> {
        let key = key.as_ref();
        if key.is_empty() {
            return None;
        }
        let index = self.bucket_index(key);
        let mut item = self.buckets[index].as_deref_mut();
        while let Some(entry) = item {
            if entry.key.len() == key.len() && *entry.key == *key {
                return Some(&mut entry.value);
            }
            item = entry.next.as_deref_mut();
        }
        None
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Unlink and drop the entry stored under `key`.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> SimjsonResult<()> {
        let key = key.as_ref();
        if key.is_empty() {
            debug!("object key is empty");
            return Err(ErrorCode::E201_EmptyKey);
        }

        let index = self.bucket_index(key);
        let position = {
            let mut item = self.buckets[index].as_deref();
            let mut position = 0usize;
            loop {
                match item {
                    Some(entry) if entry.key.len() == key.len() && *entry.key == *key => {
                        break Some(position)
                    }
                    Some(entry) => {
                        item = entry.next.as_deref();
                        position += 1;
                    }
                    None => break None,
                }
            }
        };
        let Some(position) = position else {
            debug!(key = %key_for_display(key), "object key does not exist");
            return Err(ErrorCode::E203_KeyNotFound(key_for_display(key)));
        };

        // Walk to the link that owns the match; for the chain head this is
        // the bucket slot itself.
        let mut link = &mut self.buckets[index];
        for _ in 0..position {
            match link {
                Some(entry) => link = &mut entry.next,
                None => return Err(ErrorCode::E203_KeyNotFound(key_for_display(key))),
            }
        }
        if let Some(mut removed) = link.take() {
            *link = removed.next.take();
            self.len -= 1;
        }

        Ok(())
    }

    /// Iterate over every entry in bucket order, newest first within a bucket.
    pub fn iter(&self) -> ObjectIter<'_> {
        ObjectIter {
            object: self,
            next_bucket: 0,
            entry: None,
            visited: 0,
        }
    }
}

impl Object {
    /// Empty the table, moving nested containers into `pending`.
    ///
    /// Chains are unlinked one entry at a time instead of recursing through
    /// nested boxes.
    pub(super) fn detach_nested(&mut self, pending: &mut Vec<Value>) {
        for bucket in self.buckets.iter_mut() {
            let mut link = bucket.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
                if super::is_container(&entry.value) {
                    pending.push(std::mem::replace(&mut entry.value, Value::Null));
                }
            }
        }
        self.len = 0;
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_nested(&mut pending);
        super::release(pending);
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        let mut buckets: Box<[Option<Box<Entry>>]> =
            (0..self.buckets.len()).map(|_| None).collect();
        for (index, bucket) in self.buckets.iter().enumerate() {
            let mut chain = Vec::new();
            let mut item = bucket.as_deref();
            while let Some(entry) = item {
                chain.push(entry);
                item = entry.next.as_deref();
            }
            // Rebuild tail-first so the head stays the newest entry.
            let mut head = None;
            for entry in chain.into_iter().rev() {
                head = Some(Box::new(Entry {
                    key: entry.key.clone(),
                    value: entry.value.clone(),
                    next: head,
                }));
            }
            buckets[index] = head;
        }
        Self {
            buckets,
            len: self.len,
        }
    }
}

impl PartialEq for Object {
    /// Same key set with equal values; bucket layout and order are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key_for_display(key), value)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a [u8], &'a Value);
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`Object`], yielding `(key, value)` pairs.
///
/// Buckets are visited in increasing order and each chain head to tail;
/// iteration stops after exactly `len` entries.
pub struct ObjectIter<'a> {
    object: &'a Object,
    next_bucket: usize,
    entry: Option<&'a Entry>,
    visited: usize,
}

impl<'a> ObjectIter<'a> {
    /// Returns true while entries remain.
    pub fn has_next(&self) -> bool {
        self.visited < self.object.len
    }
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (&'a [u8], &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        while self.entry.is_none() {
            let bucket = self.object.buckets.get(self.next_bucket)?;
            self.entry = bucket.as_deref();
            self.next_bucket += 1;
        }
        let entry = self.entry?;
        self.entry = entry.next.as_deref();
        self.visited += 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.object.len - self.visited;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ObjectIter<'_> {}
