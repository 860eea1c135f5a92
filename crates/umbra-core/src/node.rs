use std::fmt;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::family::ShadowNodeFamily;
use crate::props::Props;
use crate::state::StateData;
use crate::traits::NodeTraits;
use crate::{SurfaceId, Tag};

pub type SharedShadowNode = Arc<ShadowNode>;
pub type ChildList = Vec<SharedShadowNode>;

static EMPTY_CHILDREN: Lazy<Arc<ChildList>> = Lazy::new(|| Arc::new(Vec::new()));

/// The canonical empty child list, shared by every childless node.
pub fn empty_children() -> Arc<ChildList> {
    Arc::clone(&EMPTY_CHILDREN)
}

/// Per-field overrides for node construction and cloning. `None` inherits
/// the source value (or the default, on first construction).
#[derive(Default, Clone)]
pub struct NodeFragment {
    pub props: Option<Arc<dyn Props>>,
    pub children: Option<Arc<ChildList>>,
    pub state: Option<Arc<dyn StateData>>,
    pub traits: Option<NodeTraits>,
}

impl NodeFragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_props(mut self, props: Arc<dyn Props>) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_children(mut self, children: Arc<ChildList>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_state(mut self, state: Arc<dyn StateData>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_traits(mut self, traits: NodeTraits) -> Self {
        self.traits = Some(traits);
        self
    }
}

/// One immutable revision of one element.
///
/// A node is mutable only between construction and sealing; once sealed it is
/// safe to share across threads without further synchronization. Child lists
/// are `Arc`-shared and copy-on-write: in-place edits replace the whole list,
/// and revisions produced by [`ShadowNode::clone_with`] alias the source's
/// list until a new one is assigned.
pub struct ShadowNode {
    family: Arc<ShadowNodeFamily>,
    props: RwLock<Arc<dyn Props>>,
    children: RwLock<Arc<ChildList>>,
    state: RwLock<Option<Arc<dyn StateData>>>,
    traits: NodeTraits,
    sealed: AtomicBool,
}

impl ShadowNode {
    /// Creates an unsealed node. `fragment.props` is mandatory; a missing
    /// state adopts the family's most recently committed state so that new
    /// revisions observe earlier state writes.
    pub fn new(fragment: NodeFragment, family: Arc<ShadowNodeFamily>, traits: NodeTraits) -> Self {
        let props = fragment.props.unwrap_or_else(|| {
            panic!("shadow node creation requires props (tag {})", family.tag())
        });
        let state = fragment.state.or_else(|| family.most_recent_state());
        Self {
            family,
            props: RwLock::new(props),
            children: RwLock::new(fragment.children.unwrap_or_else(empty_children)),
            state: RwLock::new(state),
            traits: fragment.traits.unwrap_or(traits),
            sealed: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn family(&self) -> &Arc<ShadowNodeFamily> {
        &self.family
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.family.tag()
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.family.surface_id()
    }

    #[inline]
    pub fn component_name(&self) -> &'static str {
        self.family.component_name()
    }

    #[inline]
    pub fn traits(&self) -> NodeTraits {
        self.traits
    }

    pub fn props(&self) -> Arc<dyn Props> {
        self.props.read().unwrap().clone()
    }

    pub fn children(&self) -> Arc<ChildList> {
        self.children.read().unwrap().clone()
    }

    pub fn state(&self) -> Option<Arc<dyn StateData>> {
        self.state.read().unwrap().clone()
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Structural equivalence for diffing: family identity, not node identity.
    pub fn family_eq(a: &ShadowNode, b: &ShadowNode) -> bool {
        ptr::eq(a.family.as_ref(), b.family.as_ref())
    }

    fn ensure_unsealed(&self) {
        assert!(
            !self.is_sealed(),
            "attempt to mutate a sealed node (tag {})",
            self.tag()
        );
    }

    /// Produces a new unsealed node copying every field from `self` except
    /// the ones present in `fragment`. The source is untouched and remains
    /// valid.
    pub fn clone_with(&self, fragment: NodeFragment) -> ShadowNode {
        ShadowNode {
            family: Arc::clone(&self.family),
            props: RwLock::new(fragment.props.unwrap_or_else(|| self.props())),
            children: RwLock::new(fragment.children.unwrap_or_else(|| self.children())),
            state: RwLock::new(match fragment.state {
                Some(state) => Some(state),
                None => self.state(),
            }),
            traits: fragment.traits.unwrap_or(self.traits),
            sealed: AtomicBool::new(false),
        }
    }

    /// Appends a child, copy-on-write. Unsealed nodes only.
    pub fn append_child(&self, child: SharedShadowNode) {
        self.ensure_unsealed();
        let mut guard = self.children.write().unwrap();
        let mut next: ChildList = guard.as_ref().clone();
        next.push(child);
        *guard = Arc::new(next);
    }

    /// Replaces a single child, preserving order. Unsealed nodes only.
    ///
    /// `old_child` is located by identity. A missing child is a caller bug:
    /// the edit the caller is propagating no longer corresponds to this tree,
    /// so this panics rather than silently producing a stale revision.
    pub fn replace_child(&self, old_child: &ShadowNode, new_child: SharedShadowNode) {
        self.ensure_unsealed();
        let mut guard = self.children.write().unwrap();
        let index = guard
            .iter()
            .position(|child| ptr::eq(child.as_ref(), old_child))
            .unwrap_or_else(|| {
                panic!(
                    "replace_child: node {} is not a child of node {}",
                    old_child.tag(),
                    self.tag()
                )
            });
        let mut next: ChildList = guard.as_ref().clone();
        next[index] = new_child;
        *guard = Arc::new(next);
    }

    /// Installs a new state object on this node and on the family's
    /// most-recent-state slot. Later readers of the family observe the new
    /// state immediately; node instances materialized earlier keep the `Arc`
    /// they were built with. Unsealed nodes only.
    pub fn set_state_data(&self, data: Arc<dyn StateData>) {
        self.ensure_unsealed();
        self.family.set_most_recent_state(Arc::clone(&data));
        *self.state.write().unwrap() = Some(data);
    }

    /// Seals this node, its props, and transitively all descendants.
    /// Idempotent; called by the tree right before a revision is published.
    pub fn seal_recursive(&self) {
        self.sealed.store(true, Ordering::Release);
        self.props.read().unwrap().seal();
        for child in self.children.read().unwrap().iter() {
            child.seal_recursive();
        }
    }

    /// Finds the node whose family carries `tag`.
    pub fn find_by_tag(self: &Arc<Self>, tag: Tag) -> Option<SharedShadowNode> {
        if self.tag() == tag {
            return Some(Arc::clone(self));
        }
        for child in self.children().iter() {
            if let Some(found) = child.find_by_tag(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Finds the newest node for `family` in this subtree.
    pub fn find_by_family(self: &Arc<Self>, family: &ShadowNodeFamily) -> Option<SharedShadowNode> {
        if ptr::eq(self.family.as_ref(), family) {
            return Some(Arc::clone(self));
        }
        for child in self.children().iter() {
            if let Some(found) = child.find_by_family(family) {
                return Some(found);
            }
        }
        None
    }

    /// Root→node chain, inclusive on both ends. `None` when the family is
    /// not in this tree, which is a valid outcome, not an error.
    pub fn ancestor_path(
        self: &Arc<Self>,
        family: &ShadowNodeFamily,
    ) -> Option<Vec<SharedShadowNode>> {
        let mut path = Vec::new();
        if self.collect_path(family, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn collect_path(
        self: &Arc<Self>,
        family: &ShadowNodeFamily,
        path: &mut Vec<SharedShadowNode>,
    ) -> bool {
        path.push(Arc::clone(self));
        if ptr::eq(self.family.as_ref(), family) {
            return true;
        }
        for child in self.children().iter() {
            if child.collect_path(family, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Rebuilds the root→`target_family` path, applying `transform` to every
    /// node on the path (inclusive) and reusing every off-path node by
    /// reference. Returns the new root, or `None` when the family is not in
    /// this tree.
    ///
    /// `transform` must return an unsealed clone that still aliases the
    /// source's child list (any [`ShadowNode::clone_with`] without a children
    /// override does); this routine then swaps in the rebuilt child.
    pub fn clone_tree(
        self: &Arc<Self>,
        target_family: &ShadowNodeFamily,
        transform: impl Fn(&ShadowNode) -> ShadowNode,
    ) -> Option<SharedShadowNode> {
        let path = self.ancestor_path(target_family)?;
        let (target, ancestors) = path.split_last().expect("ancestor path is never empty");
        let mut rebuilt: SharedShadowNode = Arc::new(transform(target));
        for depth in (0..ancestors.len()).rev() {
            let parent = transform(&path[depth]);
            parent.replace_child(&path[depth + 1], rebuilt);
            rebuilt = Arc::new(parent);
        }
        Some(rebuilt)
    }
}

impl fmt::Debug for ShadowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowNode")
            .field("tag", &self.tag())
            .field("component_name", &self.component_name())
            .field("children", &self.children().len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod tests;
