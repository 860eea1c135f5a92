use umbra_core::SurfaceId;

use crate::shadow_view::Mutation;
use crate::telemetry::TransactionTelemetry;

/// The diff between two committed revisions of one surface, consumed exactly
/// once by the platform mounting layer.
#[derive(Debug)]
pub struct MountingTransaction {
    surface_id: SurfaceId,
    number: u64,
    mutations: Vec<Mutation>,
    telemetry: TransactionTelemetry,
}

impl MountingTransaction {
    pub(crate) fn new(
        surface_id: SurfaceId,
        number: u64,
        mutations: Vec<Mutation>,
        telemetry: TransactionTelemetry,
    ) -> Self {
        Self {
            surface_id,
            number,
            mutations,
            telemetry,
        }
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// Revision number this transaction mounts up to.
    #[inline]
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn telemetry(&self) -> &TransactionTelemetry {
        &self.telemetry
    }

    pub(crate) fn telemetry_mut(&mut self) -> &mut TransactionTelemetry {
        &mut self.telemetry
    }
}
