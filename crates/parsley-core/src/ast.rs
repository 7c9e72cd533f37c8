//! AST building: a stack machine driven by the CPT walk.
//!
//! The builder visits the CPT depth-first. Entering a node pushes a
//! placeholder marker; exiting pops everything above the most recent
//! placeholder (the child user-nodes, in CPT order) and dispatches on the
//! node's action tag. Tagged nodes run the registered callback, which
//! consumes the children and pushes at most one new node; untagged nodes
//! flatten their children into the parent's scope. After the root exits, the
//! stack must hold at most one node: the AST root (none at all means the
//! whole tree was pruned).

use crate::arena::{GrammarArena, ParserId};
use crate::cpt::CptNode;
use crate::error::{AstError, BuildError};

type ActionFn<'h, T> =
    Box<dyn FnMut(&mut BuildStack<T>, &CptNode<'_>, Vec<T>) -> Result<(), AstError> + 'h>;
type EnterFn<'h> = Box<dyn FnMut(&CptNode<'_>) -> Result<(), AstError> + 'h>;

/// Maps action tags to user callbacks.
///
/// Created with an action-count bound; tags at or above the bound are
/// rejected during the build. A tag inside the bound with no registered
/// callback behaves like an untagged node (children flatten upward).
pub struct HookRegistry<'h, T> {
    actions: Vec<Option<ActionFn<'h, T>>>,
    enter: Option<EnterFn<'h>>,
}

impl<'h, T> HookRegistry<'h, T> {
    pub fn new(action_count: usize) -> Self {
        let mut actions = Vec::with_capacity(action_count);
        actions.resize_with(action_count, || None);
        Self {
            actions,
            enter: None,
        }
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Register the callback for one action tag.
    ///
    /// The callback receives the build stack, the CPT node, and the child
    /// AST nodes in source order; it owns the children and may push at most
    /// one node back.
    pub fn set_action(
        &mut self,
        tag: usize,
        callback: impl FnMut(&mut BuildStack<T>, &CptNode<'_>, Vec<T>) -> Result<(), AstError> + 'h,
    ) {
        self.actions[tag] = Some(Box::new(callback));
    }

    /// Register the pre-order hook, called for every CPT node on entry
    /// (scoped context management, symbol tables and the like).
    pub fn set_enter(&mut self, hook: impl FnMut(&CptNode<'_>) -> Result<(), AstError> + 'h) {
        self.enter = Some(Box::new(hook));
    }
}

enum Item<T> {
    Placeholder,
    Node(T),
}

/// The builder's stack of user nodes, exposed to action callbacks.
pub struct BuildStack<T> {
    items: Vec<Item<T>>,
}

impl<T> BuildStack<T> {
    /// Push one user node into the current scope.
    pub fn push(&mut self, node: T) {
        self.items.push(Item::Node(node));
    }
}

/// Lower a CPT to a user AST via the registry's callbacks.
///
/// Returns `Ok(None)` when every node was pruned, `Ok(Some(root))` for a
/// single remaining node, and an error when more than one node remains or
/// any callback signals failure.
pub fn ast_build<T>(
    root: &CptNode<'_>,
    registry: &mut HookRegistry<'_, T>,
) -> Result<Option<T>, AstError> {
    let mut stack = BuildStack { items: Vec::new() };
    build_node(root, registry, &mut stack)?;

    let mut roots = Vec::new();
    for item in stack.items {
        if let Item::Node(node) = item {
            roots.push(node);
        }
    }
    match roots.len() {
        0 => Ok(None),
        1 => Ok(roots.pop()),
        n => Err(AstError::MultipleRoots(n)),
    }
}

fn build_node<T>(
    node: &CptNode<'_>,
    registry: &mut HookRegistry<'_, T>,
    stack: &mut BuildStack<T>,
) -> Result<(), AstError> {
    stack.items.push(Item::Placeholder);
    if let Some(enter) = registry.enter.as_mut() {
        enter(node)?;
    }

    for child in node.children() {
        build_node(child, registry, stack)?;
    }

    // Pop this node's scope: everything above the placeholder, restored to
    // CPT order.
    let mut children = Vec::new();
    loop {
        match stack.items.pop() {
            Some(Item::Node(n)) => children.push(n),
            Some(Item::Placeholder) => break,
            None => return Err(AstError::StackUnderflow),
        }
    }
    children.reverse();

    match node.action() {
        Some(tag) if tag >= registry.actions.len() => Err(AstError::InvalidAction(tag)),
        Some(tag) if registry.actions[tag].is_some() => {
            let mut callback = registry.actions[tag].take().expect("checked above");
            let result = callback(stack, node, children);
            registry.actions[tag] = Some(callback);
            result
        }
        _ => {
            // No action: flatten the children into the parent's scope.
            for child in children {
                stack.push(child);
            }
            Ok(())
        }
    }
}

/// Parse `input` with `top` and immediately lower the CPT to a user AST.
pub fn parse_and_build<T>(
    arena: &GrammarArena,
    top: ParserId,
    input: &str,
    registry: &mut HookRegistry<'_, T>,
) -> Result<Option<T>, BuildError> {
    let cpt = arena.parse(top, input).map_err(BuildError::Parse)?;
    Ok(ast_build(&cpt, registry)?)
}

