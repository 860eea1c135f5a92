use std::fmt;
use std::sync::Arc;

use crate::collections::hash;
use crate::collections::map::HashMap;
use crate::family::{FamilyFragment, ShadowNodeFamily};
use crate::node::{NodeFragment, ShadowNode, SharedShadowNode};
use crate::state::StateData;
use crate::traits::NodeTraits;

/// Stable identity of a component type, derived from its name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ComponentHandle(u64);

impl ComponentHandle {
    pub fn from_name(name: &str) -> Self {
        Self(hash::hash_one(&name))
    }
}

/// Per-component-type behavior: family and node creation plus initial state.
///
/// Polymorphic node behavior is dispatched through a registry keyed by
/// [`ComponentHandle`] rather than through an inheritance chain; the node
/// struct itself stays concrete and opaque payloads carry the variation.
pub trait ComponentDescriptor: Send + Sync {
    fn component_name(&self) -> &'static str;

    fn component_handle(&self) -> ComponentHandle {
        ComponentHandle::from_name(self.component_name())
    }

    /// Traits every node of this component starts with.
    fn base_traits(&self) -> NodeTraits {
        NodeTraits::empty()
    }

    fn create_family(&self, fragment: FamilyFragment) -> Arc<ShadowNodeFamily> {
        Arc::new(ShadowNodeFamily::new(
            fragment,
            self.component_handle(),
            self.component_name(),
        ))
    }

    /// Builds an unsealed node. State resolution order: an explicit fragment
    /// state wins, then the family's most recently committed state, then
    /// [`ComponentDescriptor::initial_state`] for a brand-new lineage.
    fn create_node(
        &self,
        mut fragment: NodeFragment,
        family: &Arc<ShadowNodeFamily>,
    ) -> SharedShadowNode {
        if fragment.state.is_none() && family.most_recent_state().is_none() {
            fragment.state = self.initial_state(family);
        }
        Arc::new(ShadowNode::new(
            fragment,
            Arc::clone(family),
            self.base_traits(),
        ))
    }

    /// Initial state for a freshly created family; `None` for stateless
    /// components.
    fn initial_state(&self, family: &Arc<ShadowNodeFamily>) -> Option<Arc<dyn StateData>> {
        let _ = family;
        None
    }
}

impl fmt::Debug for dyn ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.component_name())
            .finish()
    }
}

/// Failure to resolve a component descriptor on the creation path.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    UnknownComponent { name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownComponent { name } => {
                write!(f, "component {name} is not registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Descriptor lookup by handle or by name.
#[derive(Default)]
pub struct ComponentDescriptorRegistry {
    by_handle: HashMap<ComponentHandle, Arc<dyn ComponentDescriptor>>,
    by_name: HashMap<&'static str, ComponentHandle>,
}

impl ComponentDescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: Arc<dyn ComponentDescriptor>) {
        let handle = descriptor.component_handle();
        self.by_name.insert(descriptor.component_name(), handle);
        self.by_handle.insert(handle, descriptor);
    }

    pub fn descriptor_for_handle(
        &self,
        handle: ComponentHandle,
    ) -> Option<Arc<dyn ComponentDescriptor>> {
        self.by_handle.get(&handle).map(Arc::clone)
    }

    pub fn descriptor_for_name(&self, name: &str) -> Option<Arc<dyn ComponentDescriptor>> {
        self.by_name
            .get(name)
            .and_then(|handle| self.by_handle.get(handle))
            .map(Arc::clone)
    }

    /// Creation-path lookup: a missing component here is a host wiring
    /// mistake the caller must handle, not a fatal condition.
    pub fn require_by_name(
        &self,
        name: &str,
    ) -> Result<Arc<dyn ComponentDescriptor>, RegistryError> {
        self.descriptor_for_name(name)
            .ok_or_else(|| RegistryError::UnknownComponent {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
#[path = "tests/descriptor_tests.rs"]
mod tests;
