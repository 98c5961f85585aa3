//! The StripedHashMap capacity.
//!
//! Gathers the arithmetic tying the number of stripes to the number of
//! buckets.
//!
//! The number of buckets is always a positive multiple of the number of
//! stripes. As a result, for any hash `h`:
//!
//! ```text
//! (h % buckets) % stripes == h % stripes
//! ```
//!
//! That is, the stripe guarding a key never changes when the table grows, even
//! though the bucket of the key does.

use std::cmp;

use super::failure::{Failure, Result};

/// The maximum average length of a bucket chain before the table is resized.
pub const LOAD_FACTOR: usize = 3;

/// The minimum number of stripes, whatever the concurrency requested.
pub const MIN_STRIPES: usize = 8;

/// The number of stripes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NumberStripes(pub usize);

/// The number of buckets, in total.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NumberBuckets(pub usize);

/// The number of elements in all buckets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Size(pub usize);

/// The index of a bucket in the whole table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BucketIndex(pub usize);

/// The index of a stripe.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StripeIndex(pub usize);

/// The index of a bucket within its stripe.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlotIndex(pub usize);

//  Capacity.
//
//  A building block for computations related to the number of stripes and
//  buckets.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Capacity {
    stripes: NumberStripes,
}

impl Capacity {
    //  Creates an instance, with at least `MIN_STRIPES` stripes.
    pub fn new(concurrency: usize) -> Self {
        Self { stripes: NumberStripes(cmp::max(MIN_STRIPES, concurrency)) }
    }

    //  Returns the number of stripes.
    pub fn number_stripes(self) -> NumberStripes { self.stripes }

    //  Returns the number of buckets to start with.
    //
    //  Without hint, one bucket per stripe. With a hint, enough buckets to
    //  hold `expected` elements at `LOAD_FACTOR`.
    pub fn initial_buckets(self, expected: Option<Size>) -> Result<NumberBuckets> {
        match expected {
            None => Ok(NumberBuckets(self.stripes.0)),
            Some(size) => self.round_up(size.0.div_ceil(LOAD_FACTOR)),
        }
    }

    //  Returns the number of buckets to rehash `size` elements into.
    //
    //  The resulting load is close to 1.
    pub fn rehashed_buckets(self, size: Size) -> Result<NumberBuckets> {
        self.round_up(size.0)
    }

    //  Returns whether the average chain length, rounded up, exceeds
    //  `LOAD_FACTOR`.
    pub fn is_overloaded(size: Size, buckets: NumberBuckets) -> bool {
        debug_assert!(buckets.0 > 0);

        size.0.div_ceil(buckets.0) > LOAD_FACTOR
    }

    //  Returns the number of buckets held by each stripe.
    pub fn buckets_per_stripe(self, buckets: NumberBuckets) -> usize {
        debug_assert_eq!(0, buckets.0 % self.stripes.0);

        buckets.0 / self.stripes.0
    }

    //  Returns the stripe guarding `hash`, whatever the number of buckets.
    pub fn stripe_of_hash(self, hash: u64) -> StripeIndex {
        StripeIndex((hash % self.stripes.0 as u64) as usize)
    }

    //  Returns the bucket of `hash`.
    pub fn bucket_of_hash(hash: u64, buckets: NumberBuckets) -> BucketIndex {
        BucketIndex((hash % buckets.0 as u64) as usize)
    }

    //  Returns the stripe holding `bucket`.
    pub fn stripe_of(self, bucket: BucketIndex) -> StripeIndex {
        StripeIndex(bucket.0 % self.stripes.0)
    }

    //  Returns the position of `bucket` within its stripe.
    pub fn slot_of(self, bucket: BucketIndex) -> SlotIndex {
        SlotIndex(bucket.0 / self.stripes.0)
    }

    //  Rounds `n` up to a positive multiple of the number of stripes.
    fn round_up(self, n: usize) -> Result<NumberBuckets> {
        let n = cmp::max(n, self.stripes.0);

        n.checked_next_multiple_of(self.stripes.0)
            .map(NumberBuckets)
            .ok_or(Failure::CapacityOverflow)
    }
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn capacity_number_stripes() {
    fn number_stripes(n: usize) -> usize { Capacity::new(n).number_stripes().0 }

    assert_eq!(8, number_stripes(0));
    assert_eq!(8, number_stripes(1));
    assert_eq!(8, number_stripes(8));
    assert_eq!(9, number_stripes(9));
    assert_eq!(64, number_stripes(64));
}

#[test]
fn capacity_initial_buckets_without_hint() {
    assert_eq!(Ok(NumberBuckets(8)), Capacity::new(1).initial_buckets(None));
    assert_eq!(Ok(NumberBuckets(12)), Capacity::new(12).initial_buckets(None));
}

#[test]
fn capacity_initial_buckets_with_hint() {
    fn initial_buckets(concurrency: usize, expected: usize) -> usize {
        let capacity = Capacity::new(concurrency);
        capacity.initial_buckets(Some(Size(expected))).unwrap().0
    }

    //  Never less than one bucket per stripe.
    assert_eq!(8, initial_buckets(8, 0));
    assert_eq!(8, initial_buckets(8, 1));
    assert_eq!(8, initial_buckets(8, 24));

    //  ceil(25 / 3) = 9, rounded up to 16.
    assert_eq!(16, initial_buckets(8, 25));
    assert_eq!(16, initial_buckets(8, 48));
    assert_eq!(24, initial_buckets(8, 49));

    //  ceil(100 / 3) = 34, rounded up to 36.
    assert_eq!(36, initial_buckets(12, 100));
}

#[test]
fn capacity_rehashed_buckets_overflow() {
    let capacity = Capacity::new(usize::MAX / 2 + 1);

    assert_eq!(Err(Failure::CapacityOverflow), capacity.rehashed_buckets(Size(usize::MAX / 2 + 2)));
    assert_eq!(Ok(NumberBuckets(usize::MAX / 2 + 1)), capacity.rehashed_buckets(Size(3)));
}

#[test]
fn capacity_rehashed_buckets() {
    fn rehashed_buckets(concurrency: usize, size: usize) -> usize {
        Capacity::new(concurrency).rehashed_buckets(Size(size)).unwrap().0
    }

    assert_eq!(8, rehashed_buckets(8, 0));
    assert_eq!(8, rehashed_buckets(8, 8));
    assert_eq!(32, rehashed_buckets(8, 25));
    assert_eq!(32, rehashed_buckets(8, 32));
    assert_eq!(40, rehashed_buckets(10, 33));
}

#[test]
fn capacity_is_overloaded() {
    fn is_overloaded(size: usize, buckets: usize) -> bool {
        Capacity::is_overloaded(Size(size), NumberBuckets(buckets))
    }

    assert!(!is_overloaded(0, 8));
    assert!(!is_overloaded(24, 8));
    assert!(is_overloaded(25, 8));
    assert!(!is_overloaded(48, 16));
    assert!(is_overloaded(49, 16));
}

#[test]
fn capacity_stripe_is_stable() {
    let capacity = Capacity::new(8);

    for hash in [0u64, 1, 7, 8, 13, 1_000_003, u64::MAX - 1, u64::MAX] {
        let stripe = capacity.stripe_of_hash(hash);

        for buckets in [8, 16, 24, 800, 8 * 1_021] {
            let bucket = Capacity::bucket_of_hash(hash, NumberBuckets(buckets));

            assert_eq!(stripe, capacity.stripe_of(bucket), "{} in {}", hash, buckets);
        }
    }
}

#[test]
fn capacity_slot_of() {
    let capacity = Capacity::new(8);

    //  Stripe 3 holds buckets 3, 11, 19, ...
    assert_eq!((StripeIndex(3), SlotIndex(0)), (capacity.stripe_of(BucketIndex(3)), capacity.slot_of(BucketIndex(3))));
    assert_eq!((StripeIndex(3), SlotIndex(1)), (capacity.stripe_of(BucketIndex(11)), capacity.slot_of(BucketIndex(11))));
    assert_eq!((StripeIndex(3), SlotIndex(2)), (capacity.stripe_of(BucketIndex(19)), capacity.slot_of(BucketIndex(19))));

    assert_eq!(3, capacity.buckets_per_stripe(NumberBuckets(24)));
}

}   //  mod tests
