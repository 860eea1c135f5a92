use std::sync::{Arc, Mutex};

use umbra_core::SurfaceId;

use crate::differ::calculate_mutations;
use crate::shadow_tree::TreeRevision;
use crate::transaction::MountingTransaction;

#[derive(Default)]
struct CoordinatorInner {
    /// Last revision handed to the platform; `None` until the first pull.
    base: Option<TreeRevision>,
    /// Newest committed revision not yet pulled. Intermediate revisions
    /// collapse here; only the gap from base to newest ever mounts.
    pending: Option<TreeRevision>,
}

/// Hands committed revisions to the mounting side, at most once each.
///
/// Commits push; the platform pulls on its own schedule. Pulling computes
/// the diff against the last-pulled revision and advances the base, so two
/// consecutive pulls with no commit in between yield `Some` then `None`.
pub struct MountingCoordinator {
    surface_id: SurfaceId,
    inner: Mutex<CoordinatorInner>,
}

impl MountingCoordinator {
    pub(crate) fn new(surface_id: SurfaceId) -> Arc<Self> {
        Arc::new(Self {
            surface_id,
            inner: Mutex::new(CoordinatorInner::default()),
        })
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub(crate) fn push(&self, revision: TreeRevision) {
        let mut inner = self.inner.lock().unwrap();
        inner.pending = Some(revision);
    }

    pub fn has_pending_transaction(&self) -> bool {
        self.inner.lock().unwrap().pending.is_some()
    }

    /// Atomically takes the pending revision and diffs it against the base.
    /// `None` when nothing is pending, which is a valid outcome, not an
    /// error.
    pub fn pull_transaction(&self) -> Option<MountingTransaction> {
        let mut inner = self.inner.lock().unwrap();
        let pending = inner.pending.take()?;

        let mut telemetry = pending.telemetry;
        telemetry.will_diff();
        let mutations = calculate_mutations(
            inner.base.as_ref().map(|revision| &revision.root),
            &pending.root,
        );
        telemetry.did_diff();

        let number = pending.number;
        inner.base = Some(pending);
        drop(inner);

        log::debug!(
            "pulled transaction: surface {} revision {} ({} mutations)",
            self.surface_id,
            number,
            mutations.len()
        );
        Some(MountingTransaction::new(
            self.surface_id,
            number,
            mutations,
            telemetry,
        ))
    }
}
