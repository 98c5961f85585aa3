//! Internal definition of the StripedHashMap table.

pub mod bucket;
pub mod capacity;
pub mod stripes;

use super::failure;
