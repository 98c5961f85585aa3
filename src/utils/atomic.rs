//! A collection of specialized atomics.
//!
//! In theory, it is perfectly possible to use a mixed of Ordering on the same
//! instance of an Atomic, depending on the situation.
//!
//! In practice, it is the author's experience that this is a rarely needed
//! capability which only makes auditing/reviewing harder.
//!
//! Thus, these little types come with pre-established memory ordering.

use std::sync::atomic::{AtomicUsize, Ordering};

macro_rules! atomic {
    ($name:ident, $underlying:ident, $raw:ident, $load_ordering:expr, $store_ordering:expr, $rmw_ordering:expr) => {
        #[derive(Default)]
        pub struct $name($underlying);

        impl $name {
            pub fn new(v: $raw) -> Self { Self($underlying::new(v)) }
            pub fn load(&self) -> $raw { self.0.load($load_ordering) }
            pub fn store(&self, v: $raw) { self.0.store(v, $store_ordering); }
            pub fn increment(&self) { self.0.fetch_add(1, $rmw_ordering); }
            pub fn decrement(&self) { self.0.fetch_sub(1, $rmw_ordering); }
        }
    }
}

//  Counters of the map.
//
//  Every write happens under a stripe lock, which provides the actual
//  synchronization; lock-free reads are advisory and may be stale.
atomic!{ RelaxedUsize, AtomicUsize, usize, Ordering::Relaxed, Ordering::Relaxed, Ordering::Relaxed }

//  mod tests
