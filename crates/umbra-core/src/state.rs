use std::any::Any;
use std::sync::Arc;

/// Opaque state payload associated with a node family.
///
/// State objects are versioned by allocation: two nodes share state only when
/// they hold the same `Arc`. A state write always installs a fresh object;
/// nothing ever mutates a published one.
pub trait StateData: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Identity comparison for optional state handles.
pub fn state_eq(a: Option<&Arc<dyn StateData>>, b: Option<&Arc<dyn StateData>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
