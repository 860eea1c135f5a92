use bitflags::bitflags;

bitflags! {
    /// Inherent behavioral traits of a shadow node.
    ///
    /// Traits are fixed when a node is constructed or cloned; changing them
    /// on a live node goes through [`crate::ShadowNode::clone_with`] like any
    /// other field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeTraits: u32 {
        /// The node is the root of its surface's tree.
        const ROOT_NODE = 1 << 0;
        /// The node materializes as a host view when mounted.
        const VIEW_KIND = 1 << 1;
        /// The node never has children.
        const LEAF_KIND = 1 << 2;
        /// The node is skipped by mounting; its children attach to the
        /// nearest view-kind ancestor.
        const DISPLAY_CONTENTS = 1 << 3;
        /// Reserved for host experiments; carried verbatim through clones.
        const RESERVED = 1 << 4;
    }
}
