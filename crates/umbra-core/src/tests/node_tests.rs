use std::any::Any;
use std::sync::{Arc, Mutex};

use crate::descriptor::ComponentDescriptor;
use crate::family::{FamilyFragment, ShadowNodeFamily};
use crate::node::{empty_children, ChildList, NodeFragment, ShadowNode, SharedShadowNode};
use crate::props::{Props, SealFlag};
use crate::state::{state_eq, StateData};
use crate::traits::NodeTraits;
use crate::{SurfaceId, Tag};

struct TestProps {
    value: Mutex<i32>,
    seal_flag: SealFlag,
}

impl TestProps {
    fn new(value: i32) -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(value),
            seal_flag: SealFlag::new(),
        })
    }

    fn set_value(&self, value: i32) {
        self.seal_flag.ensure_unsealed("props object");
        *self.value.lock().unwrap() = value;
    }

    fn value(&self) -> i32 {
        *self.value.lock().unwrap()
    }
}

impl Props for TestProps {
    fn seal(&self) {
        self.seal_flag.seal();
    }

    fn is_sealed(&self) -> bool {
        self.seal_flag.is_sealed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct TestState;

impl StateData for TestState {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct TestDescriptor;

impl ComponentDescriptor for TestDescriptor {
    fn component_name(&self) -> &'static str {
        "Test"
    }
}

const SURFACE_ID: SurfaceId = 1;

fn make_family(descriptor: &TestDescriptor, tag: Tag) -> Arc<ShadowNodeFamily> {
    descriptor.create_family(FamilyFragment {
        tag,
        surface_id: SURFACE_ID,
        instance_handle: None,
    })
}

fn make_node(
    descriptor: &TestDescriptor,
    tag: Tag,
    props: Arc<dyn Props>,
    children: Arc<ChildList>,
) -> SharedShadowNode {
    let family = make_family(descriptor, tag);
    descriptor.create_node(
        NodeFragment::empty()
            .with_props(props)
            .with_children(children),
        &family,
    )
}

/// The canonical fixture:
///
/// ```text
/// <A>
///   <AA/>
///   <AB>
///     <ABA/>
///     <ABB/>
///   </AB>
///   <AC/>
/// </A>
/// ```
struct Fixture {
    descriptor: TestDescriptor,
    props: Arc<TestProps>,
    node_a: SharedShadowNode,
    node_aa: SharedShadowNode,
    node_ab: SharedShadowNode,
    node_aba: SharedShadowNode,
    node_abb: SharedShadowNode,
    node_ac: SharedShadowNode,
}

fn fixture() -> Fixture {
    let descriptor = TestDescriptor;
    let props = TestProps::new(0);
    let shared: Arc<dyn Props> = props.clone();

    let node_aa = make_node(&descriptor, 11, shared.clone(), empty_children());
    let node_aba = make_node(&descriptor, 12, shared.clone(), empty_children());
    let node_abb = make_node(&descriptor, 13, shared.clone(), empty_children());
    let node_ab = make_node(
        &descriptor,
        15,
        shared.clone(),
        Arc::new(vec![node_aba.clone(), node_abb.clone()]),
    );
    let node_ac = make_node(&descriptor, 16, shared.clone(), empty_children());
    let node_a = make_node(
        &descriptor,
        17,
        shared.clone(),
        Arc::new(vec![node_aa.clone(), node_ab.clone(), node_ac.clone()]),
    );

    Fixture {
        descriptor,
        props,
        node_a,
        node_aa,
        node_ab,
        node_aba,
        node_abb,
        node_ac,
    }
}

#[test]
fn node_creation_populates_identity_and_defaults() {
    let f = fixture();
    assert!(!f.node_a.is_sealed());
    assert_eq!(f.node_a.component_name(), "Test");
    assert_eq!(f.node_a.tag(), 17);
    assert_eq!(f.node_a.surface_id(), SURFACE_ID);
    assert_eq!(f.node_aa.children().len(), 0);
    assert_eq!(f.node_a.children().len(), 3);
}

#[test]
fn seal_recursive_seals_node_props_and_descendants() {
    let f = fixture();
    f.node_a.seal_recursive();
    assert!(f.node_a.is_sealed());
    assert!(f.node_a.props().is_sealed());
    assert!(f.node_ab.is_sealed());
    assert!(f.node_aba.is_sealed());
    assert!(f.node_ac.is_sealed());

    // Idempotent.
    f.node_a.seal_recursive();
    assert!(f.node_a.is_sealed());
}

#[test]
fn replace_child_preserves_order_and_siblings() {
    let f = fixture();
    let children = f.node_ab.children();
    assert_eq!(children.len(), 2);
    assert!(Arc::ptr_eq(&children[0], &f.node_aba));
    assert!(Arc::ptr_eq(&children[1], &f.node_abb));

    let aba_revision2 = Arc::new(f.node_aba.clone_with(NodeFragment::empty()));
    f.node_ab
        .replace_child(&f.node_aba, aba_revision2.clone());

    let children = f.node_ab.children();
    assert_eq!(children.len(), 2);
    assert!(Arc::ptr_eq(&children[0], &aba_revision2));
    assert!(Arc::ptr_eq(&children[1], &f.node_abb));
}

#[test]
#[should_panic(expected = "is not a child of")]
fn replace_child_with_absent_child_is_fatal() {
    let f = fixture();
    let stranger = Arc::new(f.node_ac.clone_with(NodeFragment::empty()));
    f.node_ab.replace_child(&f.node_aa, stranger);
}

#[test]
#[should_panic(expected = "attempt to mutate a sealed node")]
fn replace_child_on_sealed_node_is_fatal() {
    let f = fixture();
    f.node_ab.seal_recursive();
    let aba_revision2 = Arc::new(f.node_aba.clone_with(NodeFragment::empty()));
    f.node_ab.replace_child(&f.node_aba, aba_revision2);
}

#[test]
#[should_panic(expected = "attempt to mutate a sealed props object")]
fn props_write_after_seal_is_fatal() {
    let f = fixture();
    f.node_a.seal_recursive();
    f.props.set_value(7);
}

#[test]
fn props_write_before_seal_is_allowed() {
    let f = fixture();
    f.props.set_value(42);
    assert_eq!(f.props.value(), 42);
}

#[test]
fn clone_copies_content_but_not_identity() {
    let f = fixture();
    let clone = f.node_ab.clone_with(NodeFragment::empty());

    assert_eq!(f.node_ab.tag(), clone.tag());
    assert_eq!(f.node_ab.surface_id(), clone.surface_id());
    assert!(Arc::ptr_eq(&f.node_ab.props(), &clone.props()));
    assert!(Arc::ptr_eq(&f.node_ab.children(), &clone.children()));
    assert!(Arc::ptr_eq(f.node_ab.family(), clone.family()));
    assert!(!clone.is_sealed());
    assert!(!std::ptr::eq(f.node_ab.as_ref(), &clone));
}

#[test]
fn clone_with_traits_overrides_only_traits() {
    let f = fixture();
    let plain = f.node_ab.clone_with(NodeFragment::empty());
    assert!(!plain.traits().contains(NodeTraits::RESERVED));

    let reserved = plain.clone_with(NodeFragment::empty().with_traits(NodeTraits::RESERVED));
    assert!(reserved.traits().contains(NodeTraits::RESERVED));
    assert!(Arc::ptr_eq(&plain.props(), &reserved.props()));
}

#[test]
fn clone_tree_rebuilds_exactly_the_target_path() {
    let f = fixture();
    let root = f
        .node_a
        .clone_tree(f.node_aba.family(), |node| {
            node.clone_with(NodeFragment::empty().with_traits(NodeTraits::RESERVED))
        })
        .expect("target family is in the tree");

    // Path nodes carry the transform.
    assert!(root.traits().contains(NodeTraits::RESERVED));
    let new_ab = root.children()[1].clone();
    assert!(new_ab.traits().contains(NodeTraits::RESERVED));
    assert!(new_ab.children()[0].traits().contains(NodeTraits::RESERVED));

    // Off-path nodes are reference-identical to the originals.
    assert!(Arc::ptr_eq(&root.children()[0], &f.node_aa));
    assert!(Arc::ptr_eq(&root.children()[2], &f.node_ac));
    assert!(Arc::ptr_eq(&new_ab.children()[1], &f.node_abb));

    // The rebuilt path has fresh identities.
    assert!(!Arc::ptr_eq(&root, &f.node_a));
    assert!(!Arc::ptr_eq(&new_ab, &f.node_ab));

    // The original tree is untouched.
    assert!(Arc::ptr_eq(&f.node_a.children()[1], &f.node_ab));
    assert!(!f.node_a.traits().contains(NodeTraits::RESERVED));
}

#[test]
fn clone_tree_with_unknown_family_returns_none() {
    let f = fixture();
    let detached = make_family(&f.descriptor, 99);
    assert!(f
        .node_a
        .clone_tree(&detached, |node| node.clone_with(NodeFragment::empty()))
        .is_none());
}

#[test]
fn ancestor_path_walks_root_to_target() {
    let f = fixture();
    let path = f
        .node_a
        .ancestor_path(f.node_abb.family())
        .expect("family is in the tree");
    let tags: Vec<_> = path.iter().map(|node| node.tag()).collect();
    assert_eq!(tags, vec![17, 15, 13]);
}

#[test]
fn state_is_compared_by_identity_and_shared_through_the_family() {
    let descriptor = TestDescriptor;
    let family = make_family(&descriptor, 9);
    let props: Arc<dyn Props> = TestProps::new(0);
    let initial: Arc<dyn StateData> = Arc::new(TestState);

    let fragment = NodeFragment::empty()
        .with_props(props.clone())
        .with_state(initial.clone());
    let first = descriptor.create_node(fragment.clone(), &family);
    let second = descriptor.create_node(fragment.clone(), &family);
    let third = descriptor.create_node(fragment, &family);

    assert!(state_eq(first.state().as_ref(), second.state().as_ref()));

    third.set_state_data(Arc::new(TestState));
    assert!(!state_eq(first.state().as_ref(), third.state().as_ref()));

    // The family slot now carries the newest state, and a node created
    // without explicit state adopts it.
    assert!(state_eq(
        family.most_recent_state().as_ref(),
        third.state().as_ref()
    ));
    let fourth = descriptor.create_node(NodeFragment::empty().with_props(props), &family);
    assert!(state_eq(fourth.state().as_ref(), third.state().as_ref()));

    second.set_state_data(Arc::new(TestState));
    assert!(!state_eq(first.state().as_ref(), second.state().as_ref()));
}

#[test]
#[should_panic(expected = "attempt to mutate a sealed node")]
fn state_write_after_seal_is_fatal() {
    let descriptor = TestDescriptor;
    let family = make_family(&descriptor, 9);
    let props: Arc<dyn Props> = TestProps::new(0);
    let node = descriptor.create_node(NodeFragment::empty().with_props(props), &family);
    node.seal_recursive();
    node.set_state_data(Arc::new(TestState));
}

#[test]
fn family_identity_defines_structural_equivalence() {
    let f = fixture();
    let revision = f.node_ab.clone_with(NodeFragment::empty());
    assert!(ShadowNode::family_eq(&f.node_ab, &revision));
    assert!(!ShadowNode::family_eq(&f.node_ab, &f.node_ac));
}

#[test]
fn append_child_is_copy_on_write() {
    let f = fixture();
    let before = f.node_ab.children();
    let extra = make_node(&f.descriptor, 14, f.props.clone(), empty_children());
    f.node_ab.append_child(extra.clone());

    assert_eq!(before.len(), 2);
    let after = f.node_ab.children();
    assert_eq!(after.len(), 3);
    assert!(Arc::ptr_eq(&after[2], &extra));
}
