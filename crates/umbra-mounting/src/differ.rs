use std::sync::Arc;

use umbra_core::collections::map::HashMap;
use umbra_core::{ShadowNode, SharedShadowNode};

use crate::shadow_view::{Mutation, ShadowView};

/// Computes the ordered mutation list that turns `old` into `new`.
///
/// Nodes pair up by family identity. Subtrees whose root is
/// reference-identical across revisions are skipped wholesale, which is the
/// payoff of copy-on-write cloning. Within one parent the order is fixed:
/// removals (descending index), then insertions (ascending), then in-place
/// pairs.
pub fn calculate_mutations(
    old: Option<&SharedShadowNode>,
    new: &SharedShadowNode,
) -> Vec<Mutation> {
    let mut mutations = Vec::new();
    match old {
        None => create_subtree(new, &mut mutations),
        Some(old) => {
            if Arc::ptr_eq(old, new) {
                return mutations;
            }
            let old_view = ShadowView::for_node(old);
            let new_view = ShadowView::for_node(new);
            if old_view != new_view {
                mutations.push(Mutation::Update {
                    parent_tag: new.tag(),
                    old_view,
                    new_view,
                });
            }
            diff_children(old, new, &mut mutations);
        }
    }
    mutations
}

fn family_key(node: &ShadowNode) -> usize {
    Arc::as_ptr(node.family()) as usize
}

/// Emits `Create` for every node in the subtree (parents first) and `Insert`
/// for every child edge. The subtree root's own insertion is the caller's
/// responsibility; the host attaches surface roots itself.
fn create_subtree(node: &SharedShadowNode, out: &mut Vec<Mutation>) {
    out.push(Mutation::Create {
        view: ShadowView::for_node(node),
    });
    for (index, child) in node.children().iter().enumerate() {
        create_subtree(child, out);
        out.push(Mutation::Insert {
            parent_tag: node.tag(),
            view: ShadowView::for_node(child),
            index,
        });
    }
}

/// Emits `Remove` for every child edge (deepest last, reverse index order)
/// and `Delete` for every node. The subtree root's own removal is the
/// caller's responsibility.
fn delete_subtree(node: &SharedShadowNode, out: &mut Vec<Mutation>) {
    for (index, child) in node.children().iter().enumerate().rev() {
        out.push(Mutation::Remove {
            parent_tag: node.tag(),
            view: ShadowView::for_node(child),
            index,
        });
        delete_subtree(child, out);
    }
    out.push(Mutation::Delete {
        view: ShadowView::for_node(node),
    });
}

fn diff_children(
    old_parent: &SharedShadowNode,
    new_parent: &SharedShadowNode,
    out: &mut Vec<Mutation>,
) {
    let old_children = old_parent.children();
    let new_children = new_parent.children();
    if Arc::ptr_eq(&old_children, &new_children) {
        return;
    }
    let parent_tag = new_parent.tag();

    let old_by_family: HashMap<usize, usize> = old_children
        .iter()
        .enumerate()
        .map(|(index, child)| (family_key(child), index))
        .collect();
    let new_by_family: HashMap<usize, usize> = new_children
        .iter()
        .enumerate()
        .map(|(index, child)| (family_key(child), index))
        .collect();

    // Removals first, in descending index order so indices stay valid for
    // the host applying them one by one.
    for (index, old_child) in old_children.iter().enumerate().rev() {
        if !new_by_family.contains_key(&family_key(old_child)) {
            out.push(Mutation::Remove {
                parent_tag,
                view: ShadowView::for_node(old_child),
                index,
            });
            delete_subtree(old_child, out);
        }
    }

    // Then insertions, ascending.
    for (index, new_child) in new_children.iter().enumerate() {
        if !old_by_family.contains_key(&family_key(new_child)) {
            create_subtree(new_child, out);
            out.push(Mutation::Insert {
                parent_tag,
                view: ShadowView::for_node(new_child),
                index,
            });
        }
    }

    // Finally surviving pairs: moves, content updates, and recursion.
    for (old_index, old_child) in old_children.iter().enumerate() {
        let Some(&new_index) = new_by_family.get(&family_key(old_child)) else {
            continue;
        };
        let new_child = &new_children[new_index];

        if Arc::ptr_eq(old_child, new_child) && old_index == new_index {
            continue;
        }

        if old_index != new_index {
            out.push(Mutation::Remove {
                parent_tag,
                view: ShadowView::for_node(old_child),
                index: old_index,
            });
            out.push(Mutation::Insert {
                parent_tag,
                view: ShadowView::for_node(new_child),
                index: new_index,
            });
        }

        if !Arc::ptr_eq(old_child, new_child) {
            let old_view = ShadowView::for_node(old_child);
            let new_view = ShadowView::for_node(new_child);
            if old_view != new_view {
                out.push(Mutation::Update {
                    parent_tag,
                    old_view,
                    new_view,
                });
            }
            diff_children(old_child, new_child, out);
        }
    }
}

#[cfg(test)]
#[path = "tests/differ_tests.rs"]
mod tests;
