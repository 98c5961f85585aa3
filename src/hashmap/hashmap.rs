//! The StripedHashMap

use std::{fmt, iter};

use log::{debug, trace};

use super::atomic::RelaxedUsize;
use super::failure::{self, Failure, Result};
use super::hashcore::bucket::Entry;
use super::hashcore::capacity::{Capacity, LOAD_FACTOR, MIN_STRIPES, NumberBuckets, Size};
use super::hashcore::stripes::Stripes;
use super::{DefaultHashHooks, HashHooks};

//
//  Public Interface
//

/// `StripedHashMap`
///
/// A hash map which may be shared across threads, guarded by a fixed set of
/// locks rather than a single one.
pub struct StripedHashMap<K, V, H = DefaultHashHooks> {
    //  Hooks of the map.
    hooks: H,
    //  The buckets, and the locks guarding them.
    stripes: Stripes<K, V>,
    //  The number of elements in the map.
    //
    //  Only modified under the lock of the stripe the element belongs to, read
    //  without any lock.
    size: RelaxedUsize,
    //  The number of buckets of the map.
    //
    //  Only modified under the locks of all stripes, read without any lock.
    buckets: RelaxedUsize,
}

impl<K, V, H: Default> StripedHashMap<K, V, H> {
    /// Creates a new instance of the `StripedHashMap`, with `MIN_STRIPES`
    /// stripes and as many buckets.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<i32, i32> = StripedHashMap::new();
    ///
    /// assert_eq!(0, map.len());
    /// assert_eq!(8, map.stripe_count());
    /// assert_eq!(8, map.bucket_count());
    /// ```
    pub fn new() -> Self { Self::with_hooks(H::default()) }

    /// Creates a new instance of the `StripedHashMap`, with enough buckets to
    /// hold `expected` elements without resizing.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<i32, i32> = StripedHashMap::with_expected_size(100);
    ///
    /// //  100 elements, 3 per bucket, rounded up to a multiple of 8 stripes.
    /// assert_eq!(40, map.bucket_count());
    /// ```
    pub fn with_expected_size(expected: usize) -> Self {
        Self::with_capacity_and_hooks(Some(expected), MIN_STRIPES, H::default())
    }

    /// Creates a new instance of the `StripedHashMap`, with enough buckets to
    /// hold `expected` elements without resizing, and one stripe per expected
    /// thread.
    ///
    /// The number of stripes is never less than `MIN_STRIPES`.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<i32, i32> =
    ///     StripedHashMap::with_expected_size_and_concurrency(100, 16);
    ///
    /// assert_eq!(16, map.stripe_count());
    /// assert_eq!(48, map.bucket_count());
    ///
    /// let map: StripedHashMap<i32, i32> =
    ///     StripedHashMap::with_expected_size_and_concurrency(100, 2);
    ///
    /// assert_eq!(8, map.stripe_count());
    /// ```
    pub fn with_expected_size_and_concurrency(expected: usize, concurrency: usize) -> Self {
        Self::with_capacity_and_hooks(Some(expected), concurrency, H::default())
    }

    /// Creates a new instance of the `StripedHashMap`, with one stripe per
    /// expected thread and as many buckets.
    ///
    /// The number of stripes is never less than `MIN_STRIPES`.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<i32, i32> = StripedHashMap::with_concurrency(16);
    ///
    /// assert_eq!(16, map.stripe_count());
    /// assert_eq!(16, map.bucket_count());
    /// ```
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self::with_capacity_and_hooks(None, concurrency, H::default())
    }
}

impl<K, V, H> StripedHashMap<K, V, H> {
    /// Creates a new instance of the `StripedHashMap`, with `MIN_STRIPES`
    /// stripes and as many buckets.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::{FnHashHooks, StripedHashMap};
    /// let hooks = FnHashHooks::new(|key: &u64| *key);
    /// let map = StripedHashMap::with_hooks(hooks);
    ///
    /// assert!(map.insert(1u64, "one"));
    /// assert_eq!(Some("one"), map.get(&1));
    /// ```
    pub fn with_hooks(hooks: H) -> Self {
        Self::with_capacity_and_hooks(None, MIN_STRIPES, hooks)
    }

    /// Creates a new instance of the `StripedHashMap`.
    ///
    /// -   `expected` is the number of elements expected, if known, used to
    ///     size the table and spare early resizes.
    /// -   `concurrency` is the number of threads expected to access the map
    ///     concurrently, which determines the number of stripes. It is never
    ///     less than `MIN_STRIPES`, and never changes afterwards.
    ///
    /// #   Panics
    ///
    /// Panics if the number of buckets overflows `usize`.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::{DefaultHashHooks, StripedHashMap};
    /// let hooks = DefaultHashHooks::default();
    /// let map: StripedHashMap<i32, i32> =
    ///     StripedHashMap::with_capacity_and_hooks(Some(1_000), 12, hooks);
    ///
    /// assert_eq!(12, map.stripe_count());
    /// assert_eq!(336, map.bucket_count());
    /// ```
    pub fn with_capacity_and_hooks(expected: Option<usize>, concurrency: usize, hooks: H)
        -> Self
    {
        let capacity = Capacity::new(concurrency);
        let buckets = capacity.initial_buckets(expected.map(Size))
            .unwrap_or_else(failure::panic_from_failure);

        //  With a hint, the buckets are expected to fill up to the load factor.
        let reserve = if expected.is_some() { LOAD_FACTOR } else { 0 };

        Self {
            hooks,
            stripes: Stripes::new(capacity, buckets, reserve),
            size: RelaxedUsize::new(0),
            buckets: RelaxedUsize::new(buckets.0),
        }
    }

    /// Returns the number of elements contained in the instance.
    ///
    /// The count is read without locking: under concurrent modifications it
    /// held at some point, but may already be stale.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// assert_eq!(0, map.len());
    ///
    /// map.insert(1, 2);
    /// assert_eq!(1, map.len());
    /// ```
    pub fn len(&self) -> usize { self.size.load() }

    /// Returns whether the instance contains any element, or not.
    ///
    /// As `len`, this is only a snapshot under concurrent modifications.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(1, 1);
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the number of stripes, fixed at construction.
    pub fn stripe_count(&self) -> usize { self.stripes.capacity().number_stripes().0 }

    /// Returns the number of buckets.
    ///
    /// The number of buckets is always a multiple of the number of stripes. It
    /// is read without locking, and may be stale under concurrent insertions.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// assert_eq!(8, map.bucket_count());
    ///
    /// map.extend((0..25).map(|i| (i, i)));
    /// assert_eq!(32, map.bucket_count());
    /// ```
    pub fn bucket_count(&self) -> usize { self.buckets.load() }

    /// Clears the instance.
    ///
    /// All stripes are locked for the duration, blocking all other operations.
    /// The number of buckets is retained; the elements are dropped once the
    /// stripes are unlocked.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.extend((0..30).map(|i| (i, i)));
    ///
    /// map.clear();
    /// assert_eq!(0, map.len());
    /// assert_eq!(None, map.get(&3));
    /// assert_eq!(32, map.bucket_count());
    /// ```
    pub fn clear(&self) {
        let garbage = {
            let mut all = self.stripes.lock_all();

            trace!("clearing {} entries from {} buckets", self.size.load(), all.number_buckets().0);

            self.size.store(0);
            all.take()
        };

        //  A panicking Drop leaves the map empty, and unlocked.
        drop(garbage);
    }
}

impl<K: Eq, V, H: HashHooks<K>> StripedHashMap<K, V, H> {
    /// Inserts a key-value pair into the map, if the key is not present.
    ///
    /// Returns `true` if the pair was inserted, and `false` if the key was
    /// already present, in which case `key` and `value` are dropped and the
    /// existing value is left untouched.
    ///
    /// Inserting may trigger a resize of the table, locking all stripes.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    ///
    /// assert!(map.insert("a", 1));
    /// assert!(!map.insert("a", 2));
    ///
    /// assert_eq!((true, 1), map.find(&"a"));
    /// ```
    pub fn insert(&self, key: K, value: V) -> bool {
        let hash = self.hooks.hash(&key);
        let capacity = self.stripes.capacity();

        let rejected = {
            let mut stripe = self.stripes.lock(capacity.stripe_of_hash(hash));
            let slot = stripe.slot_of(hash, capacity);

            let rejected = stripe.bucket_mut(slot).insert(Entry { key, value });

            if rejected.is_none() {
                self.size.increment();
            }

            rejected
        };

        if rejected.is_some() {
            return false;
        }

        //  Optimistic check: the counters may be stale, `grow` re-checks.
        let size = Size(self.size.load());
        let buckets = NumberBuckets(self.buckets.load());

        if Capacity::is_overloaded(size, buckets) {
            self.grow();
        }

        true
    }

    /// Inserts multiple key-value pairs in the map.
    ///
    /// Returns the number of pairs inserted; a pair whose key is already
    /// present is dropped.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    ///
    /// assert_eq!(3, map.extend([(1, 1), (2, 2), (3, 3)]));
    /// assert_eq!(1, map.extend([(3, 0), (4, 4)]));
    /// assert_eq!(4, map.len());
    /// ```
    pub fn extend<C>(&self, collection: C) -> usize
    where
        C: IntoIterator<Item = (K, V)>,
    {
        collection.into_iter()
            .map(|(key, value)| self.insert(key, value))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Removes the key from the map.
    ///
    /// Returns `true` if the key was present, and `false` otherwise. The table
    /// is never shrunk.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert(1, "one");
    ///
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// assert_eq!(0, map.len());
    /// ```
    pub fn remove(&self, key: &K) -> bool {
        let hash = self.hooks.hash(key);
        let capacity = self.stripes.capacity();

        let mut stripe = self.stripes.lock(capacity.stripe_of_hash(hash));
        let slot = stripe.slot_of(hash, capacity);

        let Some(entry) = stripe.bucket_mut(slot).remove(key) else {
            return false;
        };

        self.size.decrement();

        //  The entry, and any Drop it may run, is released outside the lock.
        drop(stripe);
        drop(entry);

        true
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert(1, false);
    ///
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&0));
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.with_entry(key, |entry| entry.is_some())
    }

    /// Returns a copy of the value corresponding to the key, if any.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert(1, "one");
    ///
    /// assert_eq!(Some("one"), map.get(&1));
    /// assert_eq!(None, map.get(&0));
    /// ```
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.with_entry(key, |entry| entry.map(|e| e.value.clone()))
    }

    /// Looks up the key, returning whether it was found alongside a copy of
    /// its value.
    ///
    /// If the key is absent, the value returned is `V::default()`: check the
    /// flag, not the value, to test for presence.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert("a", 0);
    ///
    /// assert_eq!((true, 0), map.find(&"a"));
    /// assert_eq!((false, 0), map.find(&"b"));
    /// ```
    pub fn find(&self, key: &K) -> (bool, V)
    where
        V: Clone + Default,
    {
        match self.get(key) {
            Some(value) => (true, value),
            None => (false, V::default()),
        }
    }

    /// Returns a copy of the value corresponding to the key.
    ///
    /// #   Errors
    ///
    /// Returns `Failure::KeyNotFound` if the key is absent.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::failure::Failure;
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert(1, "one");
    ///
    /// assert_eq!(Ok("one"), map.try_at(&1));
    /// assert_eq!(Err(Failure::KeyNotFound), map.try_at(&2));
    /// ```
    pub fn try_at(&self, key: &K) -> Result<V>
    where
        V: Clone,
    {
        self.get(key).ok_or(Failure::KeyNotFound)
    }

    /// Returns a copy of the value corresponding to the key.
    ///
    /// Calling this method is equivalent to calling `try_at` and panicking on
    /// error; it is meant for keys known to be present.
    ///
    /// #   Panics
    ///
    /// Panics if the key is absent.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use stripemap::hashmap::StripedHashMap;
    /// let map: StripedHashMap<_, _> = StripedHashMap::new();
    /// map.insert(1, "one");
    ///
    /// assert_eq!("one", map.at(&1));
    /// ```
    pub fn at(&self, key: &K) -> V
    where
        V: Clone,
    {
        self.try_at(key).unwrap_or_else(failure::panic_from_failure)
    }

    //  Invokes `fun` with the entry of `key`, if any, under the stripe lock.
    fn with_entry<R, F>(&self, key: &K, fun: F) -> R
    where
        F: FnOnce(Option<&Entry<K, V>>) -> R,
    {
        let hash = self.hooks.hash(key);
        let capacity = self.stripes.capacity();

        let stripe = self.stripes.lock(capacity.stripe_of_hash(hash));
        let slot = stripe.slot_of(hash, capacity);

        fun(stripe.bucket(slot).get(key))
    }

    //  Grows the table, if still necessary once all stripes are locked.
    #[cold]
    fn grow(&self) {
        let mut all = self.stripes.lock_all();

        //  All modifications are excluded: both counters are exact.
        let size = Size(self.size.load());
        let buckets = NumberBuckets(self.buckets.load());

        debug_assert_eq!(size.0, all.len());
        debug_assert_eq!(buckets, all.number_buckets());

        if !Capacity::is_overloaded(size, buckets) {
            trace!("resize of {} buckets for {} entries already handled", buckets.0, size.0);
            return;
        }

        let target = self.stripes.capacity().rehashed_buckets(size)
            .unwrap_or_else(failure::panic_from_failure);

        debug!("resizing from {} to {} buckets for {} entries", buckets.0, target.0, size.0);

        all.rehash(target, |key| self.hooks.hash(key));

        self.buckets.store(target.0);
    }
}

impl<K, V, H: Default> Default for StripedHashMap<K, V, H> {
    fn default() -> Self { Self::new() }
}

impl<K, V, H> fmt::Debug for StripedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StripedHashMap")
            .field("stripes", &self.stripe_count())
            .field("buckets", &self.bucket_count())
            .field("length", &self.len())
            .finish()
    }
}

impl<K, V, H> iter::FromIterator<(K, V)> for StripedHashMap<K, V, H>
where
    K: Eq,
    H: HashHooks<K> + Default,
{
    fn from_iter<C>(collection: C) -> Self
    where
        C: IntoIterator<Item = (K, V)>
    {
        let result = StripedHashMap::with_hooks(H::default());
        result.extend(collection);
        result
    }
}

//  mod tests
