//! Depth-first CPT traversal with pre/post hooks.
//!
//! Implement [`CptVisitor`] and override the hooks you need; both default to
//! no-ops. [`visit_nodes`] drives the walk: `enter_node` fires before a
//! node's children, `exit_node` after all of them, siblings in source order.

use crate::cpt::CptNode;

pub trait CptVisitor {
    fn enter_node(&mut self, _node: &CptNode<'_>) {}
    fn exit_node(&mut self, _node: &CptNode<'_>) {}
}

pub fn visit_nodes<V: CptVisitor>(root: &CptNode<'_>, visitor: &mut V) {
    visitor.enter_node(root);
    for child in root.children() {
        visit_nodes(child, visitor);
    }
    visitor.exit_node(root);
}
