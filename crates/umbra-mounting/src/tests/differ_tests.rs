use std::any::Any;
use std::sync::Arc;

use umbra_core::{
    ComponentDescriptor, FamilyFragment, NodeFragment, Props, SealFlag, SharedShadowNode,
    StateData, Tag,
};

use super::calculate_mutations;
use crate::shadow_view::Mutation;

struct TestProps {
    seal_flag: SealFlag,
}

impl TestProps {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seal_flag: SealFlag::new(),
        })
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

fn make_node(tag: Tag, children: Vec<SharedShadowNode>) -> SharedShadowNode {
    let descriptor = TestDescriptor;
    let family = descriptor.create_family(FamilyFragment {
        tag,
        surface_id: 1,
        instance_handle: None,
    });
    descriptor.create_node(
        NodeFragment::empty()
            .with_props(TestProps::new())
            .with_children(Arc::new(children)),
        &family,
    )
}

/// Compact rendering of a mutation list for order-sensitive assertions.
fn render(mutations: &[Mutation]) -> Vec<String> {
    mutations
        .iter()
        .map(|mutation| match mutation {
            Mutation::Create { view } => format!("create {}", view.tag),
            Mutation::Delete { view } => format!("delete {}", view.tag),
            Mutation::Insert {
                parent_tag,
                view,
                index,
            } => format!("insert {} -> {} @ {}", view.tag, parent_tag, index),
            Mutation::Remove {
                parent_tag,
                view,
                index,
            } => format!("remove {} <- {} @ {}", view.tag, parent_tag, index),
            Mutation::Update { new_view, .. } => format!("update {}", new_view.tag),
        })
        .collect()
}

/// `A(1) → [AA(2), AB(3) → [ABA(4), ABB(5)], AC(6)]`
fn fixture() -> SharedShadowNode {
    let node_aba = make_node(4, Vec::new());
    let node_abb = make_node(5, Vec::new());
    let node_ab = make_node(3, vec![node_aba, node_abb]);
    let node_aa = make_node(2, Vec::new());
    let node_ac = make_node(6, Vec::new());
    make_node(1, vec![node_aa, node_ab, node_ac])
}

#[test]
fn first_revision_creates_parents_before_children_attach() {
    let aba = make_node(4, Vec::new());
    let ab = make_node(3, vec![aba]);
    let aa = make_node(2, Vec::new());
    let root = make_node(1, vec![aa, ab]);

    let mutations = calculate_mutations(None, &root);
    assert_eq!(
        render(&mutations),
        vec![
            "create 1",
            "create 2",
            "insert 2 -> 1 @ 0",
            "create 3",
            "create 4",
            "insert 4 -> 3 @ 0",
            "insert 3 -> 1 @ 1",
        ]
    );
}

#[test]
fn identical_revision_produces_no_mutations() {
    let root = fixture();
    assert!(calculate_mutations(Some(&root), &root).is_empty());
}

#[test]
fn leaf_props_edit_yields_exactly_one_update() {
    let root = fixture();
    let target_family = root.children()[1].children()[0].family().clone();
    let next = root
        .clone_tree(&target_family, |node| {
            if node.tag() == 4 {
                node.clone_with(NodeFragment::empty().with_props(TestProps::new()))
            } else {
                node.clone_with(NodeFragment::empty())
            }
        })
        .expect("family is in the tree");

    // Every untouched subtree is reference-shared, so the whole diff is the
    // single leaf update.
    assert_eq!(render(&calculate_mutations(Some(&root), &next)), vec![
        "update 4"
    ]);
}

#[test]
fn state_edit_yields_an_update() {
    let root = fixture();
    let target_family = root.children()[2].family().clone();
    let next = root
        .clone_tree(&target_family, |node| {
            let clone = node.clone_with(NodeFragment::empty());
            if clone.tag() == 6 {
                clone.set_state_data(Arc::new(TestState));
            }
            clone
        })
        .expect("family is in the tree");

    assert_eq!(render(&calculate_mutations(Some(&root), &next)), vec![
        "update 6"
    ]);
}

#[test]
fn removed_subtree_is_removed_then_deleted() {
    let root = fixture();
    let node_ab = root.children()[1].clone();
    let node_abb = node_ab.children()[1].clone();

    // Drop ABA: AB's children become [ABB].
    let next_ab = node_ab.clone_with(
        NodeFragment::empty().with_children(Arc::new(vec![node_abb.clone()])),
    );
    let next_root = root.clone_with(NodeFragment::empty());
    next_root.replace_child(&node_ab, Arc::new(next_ab));
    let next_root = Arc::new(next_root);

    assert_eq!(
        render(&calculate_mutations(Some(&root), &next_root)),
        vec![
            "remove 4 <- 3 @ 0",
            "delete 4",
            "remove 5 <- 3 @ 1",
            "insert 5 -> 3 @ 0",
        ]
    );
}

#[test]
fn removed_subtree_tears_down_descendants_deepest_last() {
    let root = fixture();

    // Drop the whole AB subtree.
    let remaining = vec![root.children()[0].clone(), root.children()[2].clone()];
    let next_root = Arc::new(
        root.clone_with(NodeFragment::empty().with_children(Arc::new(remaining))),
    );

    assert_eq!(
        render(&calculate_mutations(Some(&root), &next_root)),
        vec![
            "remove 3 <- 1 @ 1",
            "remove 5 <- 3 @ 1",
            "delete 5",
            "remove 4 <- 3 @ 0",
            "delete 4",
            "delete 3",
            "remove 6 <- 1 @ 2",
            "insert 6 -> 1 @ 1",
        ]
    );
}

#[test]
fn appended_child_is_created_then_inserted() {
    let root = fixture();
    let node_ab = root.children()[1].clone();
    let extra = make_node(7, Vec::new());

    let mut next_children: Vec<_> = node_ab.children().as_ref().clone();
    next_children.push(extra);
    let next_ab = Arc::new(
        node_ab.clone_with(NodeFragment::empty().with_children(Arc::new(next_children))),
    );
    let next_root = root.clone_with(NodeFragment::empty());
    next_root.replace_child(&node_ab, next_ab);
    let next_root = Arc::new(next_root);

    assert_eq!(
        render(&calculate_mutations(Some(&root), &next_root)),
        vec!["create 7", "insert 7 -> 3 @ 2"]
    );
}

#[test]
fn swapped_siblings_move_without_updates() {
    let x = make_node(11, Vec::new());
    let y = make_node(12, Vec::new());
    let root = make_node(10, vec![x.clone(), y.clone()]);
    let next_root = Arc::new(
        root.clone_with(NodeFragment::empty().with_children(Arc::new(vec![y, x]))),
    );

    assert_eq!(
        render(&calculate_mutations(Some(&root), &next_root)),
        vec![
            "remove 11 <- 10 @ 0",
            "insert 11 -> 10 @ 1",
            "remove 12 <- 10 @ 1",
            "insert 12 -> 10 @ 0",
        ]
    );
}
