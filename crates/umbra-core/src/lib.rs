//! Immutable shadow-node tree core for the Umbra renderer.
//!
//! A shadow tree is the host-independent representation of a UI hierarchy.
//! Nodes are copy-on-write: a committed revision is sealed and never mutated,
//! so a reader that captured a revision keeps a fully consistent tree while a
//! producer builds the next one.

pub mod collections;
pub mod descriptor;
pub mod family;
pub mod node;
pub mod props;
pub mod state;
pub mod traits;

pub use descriptor::{
    ComponentDescriptor, ComponentDescriptorRegistry, ComponentHandle, RegistryError,
};
pub use family::{FamilyFragment, InstanceHandle, ShadowNodeFamily};
pub use node::{empty_children, ChildList, NodeFragment, ShadowNode, SharedShadowNode};
pub use props::{Props, SealFlag};
pub use state::{state_eq, StateData};
pub use traits::NodeTraits;

/// Unique integer identity of one conceptual UI element, assigned by the host.
pub type Tag = i32;

/// Identity of the surface (window, screen) a tree belongs to.
pub type SurfaceId = i32;
