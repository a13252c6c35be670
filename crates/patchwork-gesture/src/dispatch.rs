//! Tree-aware gesture listener registry.
//!
//! The dispatcher is owned by the UI root. It mirrors the element tree
//! (`attach` / `detach`) and keeps listeners in a single list where every
//! listener comes after the listeners of its node's ancestors. Dispatch
//! visits the target's ancestor chain deepest first, so the innermost
//! interested element can consume an event before its ancestors see it.

use std::collections::HashMap;

use patchwork_types::input::GestureEvent;

/// Identity of an element in the host's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle returned by [`GestureDispatcher::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Returns `true` when the event was consumed.
pub type GestureHandler = Box<dyn FnMut(&GestureEvent) -> bool>;

struct Listener {
    id: ListenerId,
    node: NodeId,
    handler: GestureHandler,
}

/// Routes gestures through a node tree to the listeners attached along it.
#[derive(Default)]
pub struct GestureDispatcher {
    parents: HashMap<NodeId, Option<NodeId>>,
    listeners: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for GestureDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDispatcher")
            .field("nodes", &self.parents.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GestureDispatcher {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` to the tree under `parent` (`None` for a root). Attaching
    /// an existing node re-parents it.
    pub fn attach(&mut self, node: NodeId, parent: Option<NodeId>) {
        if parent == Some(node) || parent.is_some_and(|p| self.is_ancestor(node, p)) {
            log::warn!("Refusing to attach {node:?} under its own descendant {parent:?}");
            return;
        }
        let reparented = self.parents.insert(node, parent).is_some();
        if reparented {
            self.reorder();
        }
    }

    /// Remove `node` and its subtree, dropping every listener on them.
    pub fn detach(&mut self, node: NodeId) {
        if !self.parents.contains_key(&node) {
            return;
        }
        let doomed: Vec<NodeId> = self
            .parents
            .keys()
            .copied()
            .filter(|&n| n == node || self.is_ancestor(node, n))
            .collect();
        let before = self.listeners.len();
        self.listeners.retain(|l| !doomed.contains(&l.node));
        for n in &doomed {
            self.parents.remove(n);
        }
        log::trace!(
            "Detached {node:?}: {} nodes, {} listeners dropped",
            doomed.len(),
            before - self.listeners.len()
        );
    }

    /// True if `node` has a parent.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.parents.contains_key(&node)
    }

    /// Register `handler` for gestures on `node`.
    ///
    /// The listener is placed right after the last listener whose node is
    /// `node` or one of its ancestors, or at the front when there is none.
    pub fn listen(&mut self, node: NodeId, handler: GestureHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let at = self.insert_position(node);
        self.listeners.insert(at, Listener { id, node, handler });
        log::trace!("Listener {id:?} on {node:?} at position {at}");
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Deliver `event` to the listeners on `target` and its ancestors,
    /// deepest first. Stops at the first handler that consumes it and
    /// returns that listener.
    pub fn dispatch(&mut self, target: NodeId, event: &GestureEvent) -> Option<ListenerId> {
        let chain = self.chain(target);
        let mut order: Vec<usize> = (0..self.listeners.len())
            .filter(|&i| chain.contains(&self.listeners[i].node))
            .collect();
        // Deepest node first; within a node, most recent listener first.
        order.sort_by_key(|&i| {
            let depth = chain
                .iter()
                .position(|&n| n == self.listeners[i].node)
                .unwrap_or(usize::MAX);
            (depth, std::cmp::Reverse(i))
        });
        for i in order {
            let listener = &mut self.listeners[i];
            if (listener.handler)(event) {
                log::trace!("{event:?} on {target:?} consumed by {:?}", listener.id);
                return Some(listener.id);
            }
        }
        None
    }

    /// Listeners in dispatch-list order (ancestors before descendants).
    pub fn listener_order(&self) -> Vec<(ListenerId, NodeId)> {
        self.listeners.iter().map(|l| (l.id, l.node)).collect()
    }

    /// Listeners registered on `node` itself, in registration order.
    pub fn listeners_for(&self, node: NodeId) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|l| l.node == node)
            .map(|l| l.id)
            .collect()
    }

    /// `node`, its parent, grandparent, ... up to the root.
    fn chain(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut cur = node;
        while let Some(Some(parent)) = self.parents.get(&cur) {
            if chain.contains(parent) {
                break;
            }
            chain.push(*parent);
            cur = *parent;
        }
        chain
    }

    /// True when `ancestor` is a strict ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.chain(node).iter().skip(1).any(|&n| n == ancestor)
    }

    fn insert_position(&self, node: NodeId) -> usize {
        let chain = self.chain(node);
        self.listeners
            .iter()
            .rposition(|l| chain.contains(&l.node))
            .map_or(0, |i| i + 1)
    }

    /// Re-establish ancestor ordering after the tree changed shape.
    fn reorder(&mut self) {
        let old = std::mem::take(&mut self.listeners);
        for listener in old {
            let at = self.insert_position(listener.node);
            self.listeners.insert(at, listener);
        }
    }
}
