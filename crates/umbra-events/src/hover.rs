use umbra_core::{ShadowNode, SharedShadowNode};

/// Hover transition derived from one pointer movement: nodes the pointer
/// left (innermost first) and nodes it entered (outermost first). Common
/// ancestors appear in neither list.
#[derive(Default)]
pub(crate) struct HoverTransition {
    pub leaves: Vec<SharedShadowNode>,
    pub enters: Vec<SharedShadowNode>,
}

/// Tracks where one pointer was so enter/leave transitions can be derived by
/// diffing target chains across events. A pointer's presence is dictated by
/// many underlying event kinds (down, move, up); they all feed the same
/// tracker, so the comparison is stateful across calls and there must be
/// exactly one tracker per pointer id.
#[derive(Default)]
pub(crate) struct PointerHoverTracker {
    /// Root→target chain from the previous event; empty when the pointer was
    /// over nothing.
    previous_chain: Vec<SharedShadowNode>,
}

impl PointerHoverTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Diffs the stored chain against `next_chain` (root→target; empty when
    /// the pointer is over nothing) and replaces it.
    pub(crate) fn transition(&mut self, next_chain: Vec<SharedShadowNode>) -> HoverTransition {
        let common = self
            .previous_chain
            .iter()
            .zip(next_chain.iter())
            .take_while(|(old, new)| ShadowNode::family_eq(old, new))
            .count();

        let leaves = self.previous_chain[common..]
            .iter()
            .rev()
            .cloned()
            .collect();
        let enters = next_chain[common..].to_vec();
        self.previous_chain = next_chain;
        HoverTransition { leaves, enters }
    }
}

#[cfg(test)]
#[path = "tests/hover_tests.rs"]
mod tests;
