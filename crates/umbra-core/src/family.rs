use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use crate::descriptor::ComponentHandle;
use crate::state::StateData;
use crate::{SurfaceId, Tag};

/// Opaque handle to whatever host object owns an element (a scripting-side
/// instance, a test fixture). Families only ever borrow it weakly; the host
/// controls its lifetime.
pub trait InstanceHandle: Any + Send + Sync {}

/// Inputs for creating a family, supplied by the host at element creation.
pub struct FamilyFragment {
    pub tag: Tag,
    pub surface_id: SurfaceId,
    pub instance_handle: Option<Weak<dyn InstanceHandle>>,
}

/// Cross-revision identity of one conceptual UI element.
///
/// Every [`crate::ShadowNode`] revision cloned from the same lineage shares
/// one family; the family outlives any single revision and is dropped when
/// the last revision referencing it goes away.
///
/// The most-recent-state slot is jointly owned: the family and whichever node
/// last wrote it both hold the `Arc`, so the payload lives as long as the
/// longest holder. Nodes materialized before a write keep their prior `Arc`.
pub struct ShadowNodeFamily {
    tag: Tag,
    surface_id: SurfaceId,
    component_handle: ComponentHandle,
    component_name: &'static str,
    instance_handle: Option<Weak<dyn InstanceHandle>>,
    most_recent_state: Mutex<Option<Arc<dyn StateData>>>,
}

impl ShadowNodeFamily {
    pub fn new(
        fragment: FamilyFragment,
        component_handle: ComponentHandle,
        component_name: &'static str,
    ) -> Self {
        Self {
            tag: fragment.tag,
            surface_id: fragment.surface_id,
            component_handle,
            component_name,
            instance_handle: fragment.instance_handle,
            most_recent_state: Mutex::new(None),
        }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    #[inline]
    pub fn component_handle(&self) -> ComponentHandle {
        self.component_handle
    }

    #[inline]
    pub fn component_name(&self) -> &'static str {
        self.component_name
    }

    /// Upgrades the host-instance back-reference; `None` when the host has
    /// already dropped the instance.
    pub fn instance_handle(&self) -> Option<Arc<dyn InstanceHandle>> {
        self.instance_handle.as_ref().and_then(Weak::upgrade)
    }

    /// Latest committed state for this lineage.
    pub fn most_recent_state(&self) -> Option<Arc<dyn StateData>> {
        self.most_recent_state.lock().unwrap().clone()
    }

    pub(crate) fn set_most_recent_state(&self, state: Arc<dyn StateData>) {
        *self.most_recent_state.lock().unwrap() = Some(state);
    }
}

impl fmt::Debug for ShadowNodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowNodeFamily")
            .field("tag", &self.tag)
            .field("surface_id", &self.surface_id)
            .field("component_name", &self.component_name)
            .finish()
    }
}
