use std::fmt;
use std::sync::Arc;

use umbra_core::{state_eq, Props, ShadowNode, StateData, Tag};

/// Mount-facing projection of one node: just enough for the platform layer
/// to create, update, or delete the corresponding host view.
#[derive(Clone)]
pub struct ShadowView {
    pub tag: Tag,
    pub component_name: &'static str,
    pub props: Arc<dyn Props>,
    pub state: Option<Arc<dyn StateData>>,
}

impl ShadowView {
    pub fn for_node(node: &ShadowNode) -> Self {
        Self {
            tag: node.tag(),
            component_name: node.component_name(),
            props: node.props(),
            state: node.state(),
        }
    }
}

/// Views are equal when they would mount identically: same element, same
/// props object, same state object. Payloads compare by identity because
/// they are immutable once published.
impl PartialEq for ShadowView {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.component_name == other.component_name
            && Arc::ptr_eq(&self.props, &other.props)
            && state_eq(self.state.as_ref(), other.state.as_ref())
    }
}

impl fmt::Debug for ShadowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowView")
            .field("tag", &self.tag)
            .field("component_name", &self.component_name)
            .finish()
    }
}

/// One ordered mutation instruction, keyed by family tag.
#[derive(Clone, Debug)]
pub enum Mutation {
    Create {
        view: ShadowView,
    },
    Delete {
        view: ShadowView,
    },
    Insert {
        parent_tag: Tag,
        view: ShadowView,
        index: usize,
    },
    Remove {
        parent_tag: Tag,
        view: ShadowView,
        index: usize,
    },
    Update {
        parent_tag: Tag,
        old_view: ShadowView,
        new_view: ShadowView,
    },
}
