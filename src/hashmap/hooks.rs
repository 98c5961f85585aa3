//! Hooks of the StripedHashMap.

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// HashHooks
///
/// The hash function of a `StripedHashMap`, mapping a key to a 64 bits value.
///
/// The same hash is used both to select the stripe locking the key and the
/// bucket holding it, hence the function must be:
///
/// -   Total: defined for every key.
/// -   Deterministic: the same key always hashes to the same value for the
///     lifetime of the map.
///
/// It should also spread keys evenly; a poor distribution results in long
/// chains, and contended stripes, whatever the number of buckets.
///
/// Also see `DefaultHashHooks` and `FnHashHooks`.
pub trait HashHooks<K: ?Sized> {
    /// Returns the hash of `key`.
    fn hash(&self, key: &K) -> u64;
}

/// DefaultHashHooks
///
/// Hashes keys with a `BuildHasher`, `RandomState` by default.
///
/// #   Example
///
/// ```
/// #   use std::collections::hash_map::RandomState;
/// #   use stripemap::hashmap::{DefaultHashHooks, HashHooks};
/// let hooks = DefaultHashHooks::new(RandomState::new());
///
/// assert_eq!(hooks.hash("Hello"), hooks.hash("Hello"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DefaultHashHooks<S = RandomState>(S);

impl<S> DefaultHashHooks<S> {
    /// Creates an instance hashing with `builder`.
    pub fn new(builder: S) -> Self { Self(builder) }
}

impl<K: ?Sized + Hash, S: BuildHasher> HashHooks<K> for DefaultHashHooks<S> {
    fn hash(&self, key: &K) -> u64 { self.0.hash_one(key) }
}

/// FnHashHooks
///
/// Hashes keys with an arbitrary function.
///
/// #   Example
///
/// ```
/// #   use stripemap::hashmap::{FnHashHooks, HashHooks};
/// let hooks = FnHashHooks::new(|key: &u32| u64::from(*key));
///
/// assert_eq!(42, hooks.hash(&42));
/// ```
#[derive(Clone, Copy)]
pub struct FnHashHooks<F>(F);

impl<F> FnHashHooks<F> {
    /// Creates an instance hashing with `function`.
    pub fn new(function: F) -> Self { Self(function) }
}

impl<K: ?Sized, F: Fn(&K) -> u64> HashHooks<K> for FnHashHooks<F> {
    fn hash(&self, key: &K) -> u64 { (self.0)(key) }
}

impl<F> fmt::Debug for FnHashHooks<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FnHashHooks")
    }
}

#[cfg(test)]
mod tests {

use std::hash::BuildHasherDefault;
use std::collections::hash_map::DefaultHasher;

use super::*;

#[test]
fn default_hash_hooks_deterministic() {
    let hooks = DefaultHashHooks::<RandomState>::default();

    assert_eq!(hooks.hash(&17u32), hooks.hash(&17u32));
    assert_eq!(hooks.hash("a"), hooks.hash(&*String::from("a")));
}

#[test]
fn default_hash_hooks_builder() {
    let left = DefaultHashHooks::new(BuildHasherDefault::<DefaultHasher>::default());
    let right = DefaultHashHooks::new(BuildHasherDefault::<DefaultHasher>::default());

    //  No random state: two instances agree.
    assert_eq!(left.hash(&3u8), right.hash(&3u8));
}

#[test]
fn fn_hash_hooks() {
    let hooks = FnHashHooks::new(|key: &str| key.len() as u64);

    assert_eq!(5, hooks.hash("Hello"));
    assert_eq!("FnHashHooks", format!("{:?}", hooks));
}

}   //  mod tests
