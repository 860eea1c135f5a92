use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// Seal bit carried by every object that becomes immutable on publication.
///
/// Sealing is what makes "safe to read from another thread without further
/// synchronization" true; a sealed object must never be written again.
#[derive(Debug, Default)]
pub struct SealFlag(AtomicBool);

impl SealFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Idempotent.
    pub fn seal(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Panics when the object is already sealed. Mutating published data is a
    /// caller bug that would risk publishing an inconsistent tree, so it is
    /// never reported as a recoverable error.
    pub fn ensure_unsealed(&self, what: &str) {
        assert!(!self.is_sealed(), "attempt to mutate a sealed {what}");
    }
}

/// Opaque props payload of a shadow node.
///
/// Props are immutable once sealed; the tree seals them together with their
/// node in [`crate::ShadowNode::seal_recursive`].
pub trait Props: Any + Send + Sync {
    fn seal(&self);

    fn is_sealed(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}
