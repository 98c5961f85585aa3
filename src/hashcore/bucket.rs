//! A chain of entries sharing the same bucket.

use std::fmt;

//  The actual element stored in the map.
pub struct Entry<K, V> {
    //  The key.
    pub key: K,
    //  The value.
    pub value: V,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} => {:?}", self.key, self.value)
    }
}

//  Bucket.
//
//  An unordered chain of entries, at most one per key.
pub struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    //  Creates an empty bucket, without allocating.
    pub fn new() -> Self { Self { entries: Vec::new() } }

    //  Creates an empty bucket with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    //  Returns the number of entries in the chain.
    pub fn len(&self) -> usize { self.entries.len() }

    //  Returns the entries of the chain, in no particular order.
    pub fn entries(&self) -> &[Entry<K, V>] { &self.entries }

    //  Consumes the bucket, returning its entries.
    pub fn into_entries(self) -> Vec<Entry<K, V>> { self.entries }

    //  Appends an entry, without checking for duplicates.
    //
    //  Used when relocating entries whose keys are already known distinct.
    pub fn push(&mut self, entry: Entry<K, V>) { self.entries.push(entry); }
}

impl<K: Eq, V> Bucket<K, V> {
    //  Returns the entry matching `key`, if any.
    pub fn get(&self, key: &K) -> Option<&Entry<K, V>> {
        self.entries.iter().find(|e| e.key == *key)
    }

    //  Inserts the entry, unless its key is already present.
    //
    //  Returns the rejected entry if its key is already present.
    pub fn insert(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        if self.get(&entry.key).is_some() {
            return Some(entry);
        }

        self.entries.push(entry);
        None
    }

    //  Removes the entry matching `key`, if any.
    //
    //  The order of the remaining entries is not preserved.
    pub fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        let index = self.entries.iter().position(|e| e.key == *key)?;

        Some(self.entries.swap_remove(index))
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {

use super::*;

use crate::utils::tester::*;

fn entry(key: i32, value: &'static str) -> Entry<i32, &'static str> {
    Entry { key, value }
}

#[test]
fn bucket_insert_unique() {
    let mut bucket = Bucket::new();

    assert!(bucket.insert(entry(1, "one")).is_none());
    assert!(bucket.insert(entry(2, "two")).is_none());

    let rejected = bucket.insert(entry(1, "uno")).unwrap();
    assert_eq!("uno", rejected.value);

    assert_eq!(2, bucket.len());
    assert_eq!(Some("one"), bucket.get(&1).map(|e| e.value));
}

#[test]
fn bucket_remove() {
    let mut bucket = Bucket::new();
    bucket.insert(entry(1, "one"));
    bucket.insert(entry(2, "two"));
    bucket.insert(entry(3, "three"));

    assert_eq!(Some("one"), bucket.remove(&1).map(|e| e.value));
    assert!(bucket.remove(&1).is_none());
    assert!(bucket.remove(&4).is_none());

    assert_eq!(2, bucket.len());
    assert!(bucket.get(&2).is_some());
    assert!(bucket.get(&3).is_some());
}

#[test]
fn bucket_drops() {
    let count = SpyCount::zero();

    let mut bucket = Bucket::with_capacity(3);
    bucket.insert(Entry { key: 1, value: SpyElement::new(&count) });
    bucket.insert(Entry { key: 2, value: SpyElement::new(&count) });

    //  Rejected entries are dropped right away.
    drop(bucket.insert(Entry { key: 2, value: SpyElement::new(&count) }));
    assert_eq!(2, count.get());

    drop(bucket.remove(&1));
    assert_eq!(1, count.get());

    drop(bucket);
    assert_eq!(0, count.get());
}

#[test]
fn bucket_debug() {
    let mut bucket = Bucket::new();
    bucket.insert(entry(1, "one"));

    assert_eq!("[1 => \"one\"]", format!("{:?}", bucket));
}

}   //  mod tests
