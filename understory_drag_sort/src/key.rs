// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable identity for list values.
//!
//! Hosts render one element per value and need a key for it that survives
//! reordering. [`KeyRegistry`] assigns a compact [`SortKey`] to each distinct
//! value the first time it is seen and hands back the same key for equal values
//! afterwards.
//!
//! Identity is decided by `Eq`/`Hash`. Two independently created values that
//! compare equal alias onto one key, so values are expected to carry something
//! that makes them unique (an id field, a handle). [`DuplicateHandling`]
//! controls what happens when an input list violates that.
//!
//! ```rust
//! use understory_drag_sort::KeyRegistry;
//!
//! let mut keys = KeyRegistry::new();
//! let a = keys.key_for(&"alice");
//! let b = keys.key_for(&"bob");
//! assert_ne!(a, b);
//! assert_eq!(keys.key_for(&"alice"), a);
//! assert_eq!(keys.get(b), Some(&"bob"));
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::DefaultHashBuilder;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry as MapEntry;

/// Stable identity of one value in a sortable list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct SortKey(u32);

impl SortKey {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns this key as a `usize` index.
    #[inline]
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric key.
    #[inline]
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// How to treat equal values appearing more than once in one input list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DuplicateHandling {
    /// Panic in debug builds, behave like [`Alias`](Self::Alias) in release builds.
    #[default]
    DebugAssert,
    /// Reject the input with a [`DuplicateValue`] error.
    Error,
    /// Keep the first occurrence and drop later equal values.
    Alias,
}

/// An input list contained two equal values.
#[derive(Clone, PartialEq, Eq)]
pub struct DuplicateValue<T> {
    /// The repeated value.
    pub value: T,
    /// Index of its first occurrence in the input.
    pub first: usize,
    /// Index of the repeat.
    pub repeat: usize,
}

impl<T: fmt::Debug> fmt::Debug for DuplicateValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DuplicateValue {{ value: {:?}, first: {}, repeat: {} }}",
            self.value, self.first, self.repeat
        )
    }
}

impl<T: fmt::Debug> fmt::Display for DuplicateValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {:?} at index {} repeats index {}; sortable values must be unique",
            self.value, self.repeat, self.first
        )
    }
}

impl<T: fmt::Debug> core::error::Error for DuplicateValue<T> {}

/// Assigns stable [`SortKey`]s to values.
///
/// Values are stored once. Lookups go through a hash-bucket index
/// (hash -> small list of candidate keys). Keys are never reused, so a key
/// handed out for a value that was later [forgotten](Self::forget) cannot
/// start naming a different value.
#[derive(Debug, Clone)]
pub struct KeyRegistry<T> {
    slots: Vec<Option<T>>,
    buckets: HashMap<u64, Vec<SortKey>>,
    live: usize,
    build_hasher: DefaultHashBuilder,
}

impl<T> Default for KeyRegistry<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyRegistry<T>
where
    T: Eq + Hash,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            buckets: HashMap::new(),
            live: 0,
            build_hasher: DefaultHashBuilder::default(),
        }
    }

    /// Returns the number of values currently holding a key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no value holds a key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the value a key was assigned to, if it is still registered.
    #[must_use]
    pub fn get(&self, key: SortKey) -> Option<&T> {
        self.slots.get(key.as_usize())?.as_ref()
    }

    /// Returns the key already assigned to `value`, without assigning one.
    #[must_use]
    pub fn lookup(&self, value: &T) -> Option<SortKey> {
        let hash = self.hash(value);
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|key| self.get(*key) == Some(value))
    }

    /// Removes `value` from the registry, returning the key it held.
    pub fn forget(&mut self, value: &T) -> Option<SortKey> {
        let hash = self.hash(value);
        let bucket = self.buckets.get_mut(&hash)?;
        let at = bucket
            .iter()
            .position(|key| self.slots[key.as_usize()].as_ref() == Some(value))?;
        let key = bucket.swap_remove(at);
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
        self.slots[key.as_usize()] = None;
        self.live -= 1;
        Some(key)
    }

    /// Drops every registered value. Previously handed out keys stay retired.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.buckets.clear();
        self.live = 0;
    }

    fn hash<Q>(&self, value: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.build_hasher.hash_one(value)
    }
}

impl<T> KeyRegistry<T>
where
    T: Eq + Hash + Clone,
{
    /// Returns the key for `value`, assigning the next free key on first sight.
    pub fn key_for(&mut self, value: &T) -> SortKey {
        if let Some(key) = self.lookup(value) {
            return key;
        }

        let key = SortKey::from_raw(
            u32::try_from(self.slots.len()).expect("too many sortable values for SortKey (u32)"),
        );
        let hash = self.hash(value);
        self.slots.push(Some(value.clone()));
        self.buckets.entry(hash).or_default().push(key);
        self.live += 1;
        key
    }
}

/// Applies `handling` to repeated values in `values`.
///
/// Returns the input with every repeat removed (first occurrences win), or the
/// first repeat found under [`DuplicateHandling::Error`].
pub(crate) fn dedup_values<T>(
    values: Vec<T>,
    handling: DuplicateHandling,
) -> Result<Vec<T>, DuplicateValue<T>>
where
    T: Eq + Hash + Clone,
{
    let repeats = find_repeats(&values);
    if let Some(&(first, repeat)) = repeats.first() {
        match handling {
            DuplicateHandling::DebugAssert => {
                debug_assert!(false, "sortable values must be unique");
            }
            DuplicateHandling::Error => {
                return Err(DuplicateValue {
                    value: values[repeat].clone(),
                    first,
                    repeat,
                });
            }
            DuplicateHandling::Alias => {}
        }
    }
    Ok(drop_repeats(values, &repeats))
}

/// [`dedup_values`] under [`DuplicateHandling::DebugAssert`], which never rejects.
pub(crate) fn unique_values<T>(values: Vec<T>) -> Vec<T>
where
    T: Eq + Hash,
{
    let repeats = find_repeats(&values);
    debug_assert!(repeats.is_empty(), "sortable values must be unique");
    drop_repeats(values, &repeats)
}

/// `(first, repeat)` index pairs, ordered by `repeat`.
fn find_repeats<T>(values: &[T]) -> Vec<(usize, usize)>
where
    T: Eq + Hash,
{
    let mut first_seen: HashMap<&T, usize> = HashMap::with_capacity(values.len());
    let mut repeats = Vec::new();
    for (index, value) in values.iter().enumerate() {
        match first_seen.entry(value) {
            MapEntry::Vacant(slot) => {
                slot.insert(index);
            }
            MapEntry::Occupied(first) => repeats.push((*first.get(), index)),
        }
    }
    repeats
}

fn drop_repeats<T>(values: Vec<T>, repeats: &[(usize, usize)]) -> Vec<T> {
    if repeats.is_empty() {
        return values;
    }
    values
        .into_iter()
        .enumerate()
        .filter(|(index, _)| {
            repeats
                .binary_search_by_key(index, |&(_, repeat)| repeat)
                .is_err()
        })
        .map(|(_, value)| value)
        .collect()
}
