use std::sync::{Arc, Mutex};

use umbra_core::{ShadowNodeFamily, SharedShadowNode, SurfaceId};
use umbra_events::TreeNavigator;

use crate::coordinator::MountingCoordinator;
use crate::telemetry::TransactionTelemetry;

/// One committed, sealed revision of a surface's tree.
#[derive(Clone, Debug)]
pub struct TreeRevision {
    pub root: SharedShadowNode,
    pub number: u64,
    pub(crate) telemetry: TransactionTelemetry,
}

/// Outcome of a commit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStatus {
    Succeeded,
    /// The commit function declined to produce a new root.
    Cancelled,
}

/// The sequence of committed revisions for one surface.
///
/// The current-revision pointer swaps atomically under a short lock; a reader
/// that captured a revision before a swap keeps a fully consistent, immutable
/// tree. Commits are serialized here, and a root is always sealed before it
/// is published: an unsealed node never reaches the shared tree.
pub struct ShadowTree {
    surface_id: SurfaceId,
    current: Mutex<TreeRevision>,
    coordinator: Arc<MountingCoordinator>,
}

impl ShadowTree {
    /// Publishes `root` as revision zero and queues it for the first mount.
    pub fn new(surface_id: SurfaceId, root: SharedShadowNode) -> Self {
        root.seal_recursive();
        let revision = TreeRevision {
            root,
            number: 0,
            telemetry: TransactionTelemetry::default(),
        };
        let coordinator = MountingCoordinator::new(surface_id);
        coordinator.push(revision.clone());
        Self {
            surface_id,
            current: Mutex::new(revision),
            coordinator,
        }
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn mounting_coordinator(&self) -> &Arc<MountingCoordinator> {
        &self.coordinator
    }

    /// Snapshot of the published revision.
    pub fn current_revision(&self) -> TreeRevision {
        self.current.lock().unwrap().clone()
    }

    /// Builds and publishes the next revision. `commit_fn` receives the
    /// current root and returns the next one, or `None` to cancel with no
    /// side effects. The new root is sealed before publication and the
    /// revision is handed to the mounting coordinator.
    pub fn commit(
        &self,
        commit_fn: impl FnOnce(&SharedShadowNode) -> Option<SharedShadowNode>,
    ) -> CommitStatus {
        let mut telemetry = TransactionTelemetry::default();
        telemetry.will_commit();

        let mut current = self.current.lock().unwrap();
        let Some(new_root) = commit_fn(&current.root) else {
            return CommitStatus::Cancelled;
        };
        new_root.seal_recursive();
        telemetry.did_commit();

        let revision = TreeRevision {
            root: new_root,
            number: current.number + 1,
            telemetry,
        };
        *current = revision.clone();
        drop(current);

        log::debug!(
            "committed revision {} on surface {}",
            revision.number,
            self.surface_id
        );
        self.coordinator.push(revision);
        CommitStatus::Succeeded
    }
}

/// The pointer pipeline resolves targets against the newest committed
/// revision through this view.
impl TreeNavigator for ShadowTree {
    fn newest_node_for_family(&self, family: &ShadowNodeFamily) -> Option<SharedShadowNode> {
        let root = self.current.lock().unwrap().root.clone();
        root.find_by_family(family)
    }

    fn ancestor_chain(&self, node: &SharedShadowNode) -> Vec<SharedShadowNode> {
        let root = self.current.lock().unwrap().root.clone();
        root.ancestor_path(node.family()).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
