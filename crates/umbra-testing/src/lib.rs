//! Testing utilities and harness for the Umbra renderer core.

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
