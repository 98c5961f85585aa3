//! Internal testing utilities

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::hashmap::HashHooks;

//  Hashes every key to the same value, chaining all of them in one bucket.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantHashHooks;

impl<K: ?Sized> HashHooks<K> for ConstantHashHooks {
    fn hash(&self, _: &K) -> u64 { 0 }
}

//  Hashes integers to themselves, for predictable bucket placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHashHooks;

impl HashHooks<u64> for IdentityHashHooks {
    fn hash(&self, key: &u64) -> u64 { *key }
}

//  SpyCount
//
//  A counter of the number of instances of elements.
pub struct SpyCount(AtomicUsize);

impl SpyCount {
    pub fn zero() -> Self { SpyCount(AtomicUsize::new(0)) }

    pub fn get(&self) -> usize { self.0.load(Ordering::Relaxed) }

    fn decrement(&self) { self.0.fetch_sub(1, Ordering::Relaxed); }

    fn increment(&self) { self.0.fetch_add(1, Ordering::Relaxed); }
}

//  Spy Element
//
//  An element tracking the number of instances, helpful to ensure proper drop.
pub struct SpyElement<'a> {
    count: &'a SpyCount,
}

impl<'a> SpyElement<'a> {
    pub fn new(count: &'a SpyCount) -> Self {
        count.increment();
        SpyElement { count }
    }
}

impl<'a> Drop for SpyElement<'a> {
    fn drop(&mut self) {
        self.count.decrement();
    }
}

//  A value which may panic on drop.
#[derive(Debug, Eq, Hash, PartialEq)]
pub struct PanickyDrop<T>(T, bool);

impl<T> PanickyDrop<T> {
    //  Creates a normal instance.
    pub fn new(value: T) -> Self { Self(value, false) }

    //  Creates a panicky instance.
    pub fn panicky(value: T) -> Self { Self(value, true) }
}

impl<T> Drop for PanickyDrop<T> {
    fn drop(&mut self) { if self.1 { panic!("Oh No!") } }
}
