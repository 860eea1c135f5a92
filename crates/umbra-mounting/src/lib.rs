//! Shadow tree revisions and the mounting pipeline.
//!
//! A [`ShadowTree`] owns the sequence of committed revisions for one surface.
//! Producers commit new sealed roots; the [`MountingCoordinator`] turns the
//! gap between the last-mounted and the newest revision into an ordered list
//! of mutation instructions, pulled at most once by the platform side through
//! the [`TelemetryController`].

pub mod coordinator;
pub mod differ;
pub mod shadow_tree;
pub mod shadow_view;
pub mod telemetry;
pub mod transaction;

pub use coordinator::MountingCoordinator;
pub use differ::calculate_mutations;
pub use shadow_tree::{CommitStatus, ShadowTree, TreeRevision};
pub use shadow_view::{Mutation, ShadowView};
pub use telemetry::{CompoundTelemetry, TelemetryController, TransactionTelemetry};
pub use transaction::MountingTransaction;
