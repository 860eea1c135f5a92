//! Shared fixtures: a test component, sealable props, identity-compared
//! state, the canonical tree, and a full dispatch→commit→mount harness.

use std::any::Any;
use std::sync::{Arc, Mutex};

use umbra_core::{
    ComponentDescriptor, FamilyFragment, InstanceHandle, NodeFragment, Props, SealFlag,
    ShadowNodeFamily, SharedShadowNode, StateData, SurfaceId, Tag,
};
use umbra_events::{
    DispatcherOptions, EventDispatcher, EventPipe, RawEvent, StatePipe, StateUpdate,
};
use umbra_mounting::{CommitStatus, ShadowTree, TelemetryController};
use umbra_runtime_std::immediate_beat_factory;

/// Sealable props carrying a marker value, so revisions are tellable apart.
pub struct TestProps {
    value: Mutex<i32>,
    seal_flag: SealFlag,
}

impl TestProps {
    pub fn new(value: i32) -> Arc<Self> {
        Arc::new(Self {
            value: Mutex::new(value),
            seal_flag: SealFlag::new(),
        })
    }

    pub fn value(&self) -> i32 {
        *self.value.lock().unwrap()
    }

    /// Valid only before sealing; fatal afterwards.
    pub fn set_value(&self, value: i32) {
        self.seal_flag.ensure_unsealed("props object");
        *self.value.lock().unwrap() = value;
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

/// Identity-compared state payload.
pub struct TestState {
    pub value: i32,
}

impl TestState {
    pub fn new(value: i32) -> Arc<Self> {
        Arc::new(Self { value })
    }
}

impl StateData for TestState {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stand-in for a host-side instance object.
#[derive(Debug, Default)]
pub struct TestInstanceHandle;

impl InstanceHandle for TestInstanceHandle {}

/// Descriptor of the `"Test"` component used across the workspace's tests.
pub struct TestComponentDescriptor;

impl ComponentDescriptor for TestComponentDescriptor {
    fn component_name(&self) -> &'static str {
        "Test"
    }
}

pub const TEST_SURFACE_ID: SurfaceId = 1;

pub fn make_test_family(tag: Tag) -> Arc<ShadowNodeFamily> {
    TestComponentDescriptor.create_family(FamilyFragment {
        tag,
        surface_id: TEST_SURFACE_ID,
        instance_handle: None,
    })
}

pub fn make_test_node(tag: Tag, children: Vec<SharedShadowNode>) -> SharedShadowNode {
    let family = make_test_family(tag);
    TestComponentDescriptor.create_node(
        NodeFragment::empty()
            .with_props(TestProps::new(0))
            .with_children(Arc::new(children)),
        &family,
    )
}

/// The canonical fixture:
///
/// ```text
/// <A 17>
///   <AA 11/>
///   <AB 15>
///     <ABA 12/>
///     <ABB 13/>
///   </AB>
///   <AC 16/>
/// </A>
/// ```
pub struct TestTree {
    pub root: SharedShadowNode,
    pub node_aa: SharedShadowNode,
    pub node_ab: SharedShadowNode,
    pub node_aba: SharedShadowNode,
    pub node_abb: SharedShadowNode,
    pub node_ac: SharedShadowNode,
}

pub fn test_tree() -> TestTree {
    let node_aa = make_test_node(11, Vec::new());
    let node_aba = make_test_node(12, Vec::new());
    let node_abb = make_test_node(13, Vec::new());
    let node_ab = make_test_node(15, vec![node_aba.clone(), node_abb.clone()]);
    let node_ac = make_test_node(16, Vec::new());
    let root = make_test_node(17, vec![node_aa.clone(), node_ab.clone(), node_ac.clone()]);
    TestTree {
        root,
        node_aa,
        node_ab,
        node_aba,
        node_abb,
        node_ac,
    }
}

/// End-to-end wiring: dispatcher → state pipe → shadow tree commit →
/// mounting coordinator, with recording sinks on both ends. Beats are
/// immediate, so every dispatch drains inline.
pub struct PipelineHarness {
    pub tree: Arc<ShadowTree>,
    pub dispatcher: EventDispatcher,
    pub controller: Arc<TelemetryController>,
    pub delivered_events: Arc<Mutex<Vec<String>>>,
}

impl PipelineHarness {
    pub fn new(root: SharedShadowNode) -> Self {
        let tree = Arc::new(ShadowTree::new(TEST_SURFACE_ID, root));
        let controller = Arc::new(TelemetryController::new(tree.mounting_coordinator().clone()));
        let delivered_events = Arc::new(Mutex::new(Vec::new()));

        let sink = delivered_events.clone();
        let event_pipe: EventPipe = Arc::new(move |event: RawEvent| {
            sink.lock().unwrap().push(event.name);
        });

        let commit_tree = tree.clone();
        let state_pipe: StatePipe = Arc::new(move |update: StateUpdate| {
            let status = commit_tree.commit(|root| {
                root.clone_tree(&update.family, |node| {
                    let clone = node.clone_with(NodeFragment::empty());
                    if Arc::ptr_eq(node.family(), &update.family) {
                        clone.set_state_data(update.data.clone());
                    }
                    clone
                })
            });
            if status == CommitStatus::Cancelled {
                // The element left the tree before its update drained; a
                // valid outcome, not an error.
                log::debug!("state update for family {} skipped", update.family.tag());
            }
        });

        let dispatcher = EventDispatcher::new(
            event_pipe,
            state_pipe,
            immediate_beat_factory(),
            immediate_beat_factory(),
            DispatcherOptions::default(),
        );

        Self {
            tree,
            dispatcher,
            controller,
            delivered_events,
        }
    }

    pub fn delivered_events(&self) -> Vec<String> {
        self.delivered_events.lock().unwrap().clone()
    }
}
