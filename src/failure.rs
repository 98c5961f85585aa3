//! The Failure and Result types of this library.
//!
//! Most operations of the map report their outcome through their return value: `insert` tells whether the key was
//! new, `remove` whether it was present, `find` whether it was found. A `Failure` is reserved for the few situations
//! where the caller asserted something which turned out false.
//!
//! All faillible methods come in two versions:
//!
//! -   A faillible `try_xxx` version, which returns a `Result` with `Failure` as the error type.
//! -   A convenience `xxx` version, which invokes the `try_xxx` version and panics in case of error.

use std::result;

/// Universal Failure type of this library.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, thiserror::Error)]
pub enum Failure {
    /// The number of buckets cannot be calculated due to overflowing.
    #[error("CapacityOverflow")]
    CapacityOverflow,
    /// The key looked up is not present in the map.
    #[error("KeyNotFound")]
    KeyNotFound,
}

/// Universal Result type of this library.
pub type Result<T> = result::Result<T, Failure>;

//  Panics with the given failure.
#[cold]
#[inline(never)]
pub(crate) fn panic_from_failure<T>(failure: Failure) -> T {
    panic!("{}", failure);
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn failure_display() {
        assert_eq!("KeyNotFound", format!("{}", Failure::KeyNotFound));
        assert_eq!("CapacityOverflow", format!("{}", Failure::CapacityOverflow));
    }

    #[test]
    fn failure_is_error() {
        fn as_error(failure: Failure) -> Box<dyn std::error::Error> { Box::new(failure) }

        assert_eq!("KeyNotFound", as_error(Failure::KeyNotFound).to_string());
    }

    #[test]
    #[should_panic(expected = "KeyNotFound")]
    fn panic_from_failure_panics() {
        panic_from_failure::<()>(Failure::KeyNotFound);
    }
}
