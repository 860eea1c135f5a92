//! Hash map and hasher selection.
//!
//! Defaults to `hashbrown`/`ahash`; the `std-hash` feature swaps in the
//! standard library implementations for hosts that need them.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::{HashMap, HashSet};
}

pub mod hash {
    #[cfg(feature = "std-hash")]
    pub use std::collections::hash_map::DefaultHasher;

    #[cfg(not(feature = "std-hash"))]
    pub use ahash::AHasher as DefaultHasher;

    use core::hash::{Hash, Hasher};

    /// Hash a single value with whichever default hasher is active.
    #[inline]
    pub fn hash_one<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::default();
        value.hash(&mut hasher);
        hasher.finish()
    }
}
