//  Lints
#![allow(clippy::module_inception)]

//! #   The Stripemap Library
//!
//! A concurrent hash map guarded by lock striping.
//! -   The `StripedHashMap`: a `HashMap` shareable across threads, whose
//!     buckets are guarded by a fixed set of locks rather than a single one.
//!
//! Point operations lock a single stripe, and proceed in parallel with
//! operations on other stripes. The set of operations is limited, in exchange:
//! there is no iteration, and no in-place update.

pub mod failure;
pub mod hashmap;

mod hashcore;
mod utils;

use self::utils::atomic;
