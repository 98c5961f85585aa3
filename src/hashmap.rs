//! #   The StripedHashMap.
//!
//! The `StripedHashMap` is a hash map which may be shared across threads, and
//! written to from all of them at once.
//!
//! ##  Under the covers.
//!
//! Under the covers the `StripedHashMap` is a table of buckets, each bucket a
//! chain of key-value pairs, guarded by a fixed set of locks: the stripes.
//!
//! The number of buckets is always a multiple of the number of stripes, so
//! that the stripe of a key never changes, even as the table grows.
//!
//! The main consequences are:
//!
//! -   Looking up, inserting or removing a key only locks the stripe of that
//!     key. Keys of different stripes are accessed in parallel.
//! -   Keys of the same stripe contend, even when in different buckets; more
//!     stripes mean less contention.
//! -   Clearing and resizing lock all stripes, blocking every other operation
//!     for their duration.
//!
//! When constructing a new `StripedHashMap`, pay attention to the expected
//! number of threads, as the number of stripes is set in stone!
//!
//! #   Example: basic
//!
//! General usage of `StripedHashMap` involves inserting key-value pairs, which
//! never overwrites an existing value, and looking them up.
//!
//! ```
//! use stripemap::hashmap::StripedHashMap;
//!
//! let map: StripedHashMap<_, _> = StripedHashMap::new();
//! assert!(map.insert(1, false));
//! assert!(map.insert(2, true));
//! assert!(!map.insert(2, false));
//!
//! assert_eq!(2, map.len());
//! assert_eq!(Some(true), map.get(&2));
//!
//! assert!(map.remove(&1));
//! assert_eq!(1, map.len());
//! ```
//!
//! #   Example: accessing elements
//!
//! As elements may be removed at any time by another thread, accessors return
//! a copy of the value:
//!
//! -   The `get` method returns an `Option`.
//! -   The `find` method returns a flag, and the value or its default.
//! -   The `try_at` method fails with `KeyNotFound`, and `at` panics, when the
//!     key is absent.
//!
//! ```
//! use stripemap::failure::Failure;
//! use stripemap::hashmap::StripedHashMap;
//!
//! let map: StripedHashMap<_, _> = StripedHashMap::new();
//! map.extend([(1, 2), (2, 3), (3, 4)]);
//!
//! assert_eq!(Some(2), map.get(&1));
//! assert_eq!((true, 3), map.find(&2));
//! assert_eq!(4, map.at(&3));
//!
//! assert_eq!(None, map.get(&4));
//! assert_eq!((false, 0), map.find(&4));
//! assert_eq!(Err(Failure::KeyNotFound), map.try_at(&4));
//! ```
//!
//! #   Example: sharing is caring
//!
//! The core property of `StripedHashMap` is its ability to be written to from
//! many threads at once.
//!
//! ```
//! use stripemap::hashmap::StripedHashMap;
//!
//! let map: StripedHashMap<_, _> = StripedHashMap::with_expected_size_and_concurrency(400, 4);
//!
//! std::thread::scope(|scope| {
//!     for worker in 0..4 {
//!         let map = &map;
//!         scope.spawn(move || {
//!             for i in 0..100 {
//!                 map.insert(worker * 100 + i, worker);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(400, map.len());
//! assert_eq!(Some(3), map.get(&399));
//! ```

mod hashmap;
mod hooks;

pub use self::hashmap::StripedHashMap;
pub use self::hooks::{DefaultHashHooks, FnHashHooks, HashHooks};

pub use super::hashcore::capacity::{LOAD_FACTOR, MIN_STRIPES};

use super::atomic;
use super::failure;
use super::hashcore;
