//! The stripes of the table, and their locks.
//!
//! The table is an ordered sequence of buckets, split across a fixed number of
//! stripes: bucket `b` is held by stripe `b % stripes`, at slot `b / stripes`.
//!
//! Since the number of buckets is always a multiple of the number of stripes,
//! each stripe holds exactly `buckets / stripes` buckets, and the lock of a
//! stripe owns the very buckets it guards. The table itself is only ever
//! reshaped while holding every lock.
//!
//! #   Locking protocol
//!
//! -   Point operations lock the single stripe of their key.
//! -   Global operations lock every stripe, always in ascending index order,
//!     and may release them in any order.
//!
//! The fixed acquisition order is what prevents two global operations racing
//! against each other, say a clear and a resize, from deadlocking.

use std::mem;

use crossbeam_utils::CachePadded;
use parking_lot::{Mutex, MutexGuard};

use super::bucket::Bucket;
use super::capacity::{Capacity, NumberBuckets, SlotIndex, StripeIndex};

//  Stripe.
//
//  The buckets guarded by a single lock.
pub struct Stripe<K, V> {
    buckets: Vec<Bucket<K, V>>,
}

impl<K, V> Stripe<K, V> {
    //  Creates a stripe of `number` buckets, each with room for `reserve`
    //  entries.
    fn new(number: usize, reserve: usize) -> Self {
        let buckets = (0..number).map(|_| Bucket::with_capacity(reserve)).collect();
        Self { buckets }
    }

    //  Returns the slot of the bucket `hash` maps to.
    //
    //  The number of buckets is derived from the stripe itself, which is
    //  exact as long as the stripe is locked.
    pub fn slot_of(&self, hash: u64, capacity: Capacity) -> SlotIndex {
        let buckets = NumberBuckets(self.buckets.len() * capacity.number_stripes().0);

        debug_assert_eq!(
            capacity.stripe_of_hash(hash),
            capacity.stripe_of(Capacity::bucket_of_hash(hash, buckets))
        );

        capacity.slot_of(Capacity::bucket_of_hash(hash, buckets))
    }

    //  Returns the bucket at `slot`.
    pub fn bucket(&self, slot: SlotIndex) -> &Bucket<K, V> { &self.buckets[slot.0] }

    //  Returns the bucket at `slot`.
    pub fn bucket_mut(&mut self, slot: SlotIndex) -> &mut Bucket<K, V> {
        &mut self.buckets[slot.0]
    }

    //  Returns the number of entries in the stripe.
    pub fn len(&self) -> usize { self.buckets.iter().map(Bucket::len).sum() }
}

//  Stripes.
//
//  The fixed set of stripes, each padded to its own cache line so that
//  neighbouring locks do not contend.
pub struct Stripes<K, V> {
    capacity: Capacity,
    stripes: Box<[CachePadded<Mutex<Stripe<K, V>>>]>,
}

impl<K, V> Stripes<K, V> {
    //  Creates the stripes of a table of `buckets` buckets, each with room for
    //  `reserve` entries.
    pub fn new(capacity: Capacity, buckets: NumberBuckets, reserve: usize) -> Self {
        let per_stripe = capacity.buckets_per_stripe(buckets);

        let stripes = (0..capacity.number_stripes().0)
            .map(|_| CachePadded::new(Mutex::new(Stripe::new(per_stripe, reserve))))
            .collect();

        Self { capacity, stripes }
    }

    //  Returns the capacity.
    pub fn capacity(&self) -> Capacity { self.capacity }

    //  Locks the stripe at `index`.
    pub fn lock(&self, index: StripeIndex) -> MutexGuard<'_, Stripe<K, V>> {
        self.stripes[index.0].lock()
    }

    //  Locks every stripe, in ascending index order.
    pub fn lock_all(&self) -> StripesGuard<'_, K, V> {
        let guards = self.stripes.iter().map(|stripe| stripe.lock()).collect();

        StripesGuard { capacity: self.capacity, guards }
    }
}

//  StripesGuard.
//
//  Exclusive access to the whole table; the locks are released on drop.
pub struct StripesGuard<'a, K, V> {
    capacity: Capacity,
    guards: Vec<MutexGuard<'a, Stripe<K, V>>>,
}

impl<K, V> StripesGuard<'_, K, V> {
    //  Returns the exact number of buckets.
    pub fn number_buckets(&self) -> NumberBuckets {
        NumberBuckets(self.guards[0].buckets.len() * self.guards.len())
    }

    //  Returns the exact number of entries.
    pub fn len(&self) -> usize { self.guards.iter().map(|stripe| stripe.len()).sum() }

    //  Empties every bucket, retaining the number of buckets.
    //
    //  Returns the former content of the buckets, for the caller to drop.
    pub fn take(&mut self) -> Vec<Bucket<K, V>> {
        self.guards.iter_mut()
            .flat_map(|stripe| stripe.buckets.iter_mut().map(mem::take))
            .collect()
    }

    //  Redistributes every entry across `buckets` buckets.
    //
    //  All hashes are computed before the first entry moves: should `hash`
    //  panic, the table is left as it was.
    pub fn rehash<F>(&mut self, buckets: NumberBuckets, mut hash: F)
    where
        F: FnMut(&K) -> u64,
    {
        let capacity = self.capacity;
        let per_stripe = capacity.buckets_per_stripe(buckets);

        let targets: Vec<_> = self.guards.iter()
            .flat_map(|stripe| stripe.buckets.iter())
            .flat_map(|bucket| bucket.entries().iter())
            .map(|entry| Capacity::bucket_of_hash(hash(&entry.key), buckets))
            .collect();

        let mut fresh: Vec<Vec<Bucket<K, V>>> = (0..self.guards.len())
            .map(|_| (0..per_stripe).map(|_| Bucket::new()).collect())
            .collect();

        let old: Vec<Vec<Bucket<K, V>>> = self.guards.iter_mut()
            .map(|stripe| mem::take(&mut stripe.buckets))
            .collect();

        let entries = old.into_iter().flatten().flat_map(Bucket::into_entries);

        for (entry, bucket) in entries.zip(targets) {
            let stripe = capacity.stripe_of(bucket);
            let slot = capacity.slot_of(bucket);

            fresh[stripe.0][slot.0].push(entry);
        }

        for (stripe, buckets) in self.guards.iter_mut().zip(fresh) {
            stripe.buckets = buckets;
        }
    }
}

//  mod tests
