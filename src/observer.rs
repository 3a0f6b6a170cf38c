use std::ops::{Deref, DerefMut};

use libxml::tree::Node;

use crate::page::Page;

/// Handle of an observer. Handles of released observers stay invalid even
/// when their slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId {
    index: usize,
    generation: usize,
}

/// Identity of a node within its document.
///
/// Records and observations keep keys instead of `Node` handles, libxml
/// refuses to mutate nodes with too many live handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn of(node: &Node) -> Self {
        Self(node.node_ptr() as usize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// Children of the target were added, removed or replaced.
    ChildList,
    /// The value of the target text node changed.
    CharacterData,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeKey,
}

impl MutationRecord {
    pub fn targets(&self, node: &Node) -> bool {
        self.target == NodeKey::of(node)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub subtree: bool,
}

impl ObserveOptions {
    pub fn subtree_children() -> Self {
        Self {
            child_list: true,
            character_data: false,
            subtree: true,
        }
    }

    fn accepts(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

struct Observation {
    root: NodeKey,
    options: ObserveOptions,
}

#[derive(Default)]
struct Observer {
    generation: usize,
    released: bool,
    observations: Vec<Observation>,
    queue: Vec<MutationRecord>,
}

impl Observer {
    fn is_interested(&self, kind: MutationKind, target: NodeKey, ancestors: &[NodeKey]) -> bool {
        self.observations.iter().any(|observation| {
            if !observation.options.accepts(kind) {
                return false;
            }

            if target == observation.root {
                return true;
            }

            observation.options.subtree && ancestors.contains(&observation.root)
        })
    }
}

fn ancestor_keys(node: &Node) -> Vec<NodeKey> {
    let mut keys = Vec::new();
    let mut parent = node.get_parent();
    while let Some(node) = parent {
        keys.push(NodeKey::of(&node));
        parent = node.get_parent();
    }
    keys
}

/// Change subscriptions of one document.
///
/// Records are queued at mutation time, and only for the observers that are
/// connected at that moment. Delivery is up to the caller.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Observer>,
}

impl ObserverRegistry {
    /// Hands out a new observer, reusing the slot of a released one.
    pub fn create(&mut self) -> ObserverId {
        if let Some(index) = self.observers.iter().position(|observer| observer.released) {
            let observer = &mut self.observers[index];
            observer.generation += 1;
            observer.released = false;
            return ObserverId {
                index,
                generation: observer.generation,
            };
        }

        self.observers.push(Observer::default());
        ObserverId {
            index: self.observers.len() - 1,
            generation: 0,
        }
    }

    /// Disconnects `id` and makes its slot available to `create`.
    pub fn release(&mut self, id: ObserverId) {
        if let Some(observer) = self.get_mut(id) {
            observer.observations.clear();
            observer.queue.clear();
            observer.released = true;
        }
    }

    pub fn observe(&mut self, id: ObserverId, root: &Node, options: ObserveOptions) -> bool {
        let root = NodeKey::of(root);
        match self.get_mut(id) {
            Some(observer) => {
                match observer
                    .observations
                    .iter_mut()
                    .find(|observation| observation.root == root)
                {
                    Some(observation) => observation.options = options,
                    None => observer.observations.push(Observation { root, options }),
                }
                true
            }
            None => false,
        }
    }

    /// Stops all observations of `id` and drops the records not yet delivered.
    pub fn disconnect(&mut self, id: ObserverId) {
        if let Some(observer) = self.get_mut(id) {
            observer.observations.clear();
            observer.queue.clear();
        }
    }

    pub fn is_connected(&self, id: ObserverId) -> bool {
        self.get(id)
            .map(|observer| !observer.observations.is_empty())
            .unwrap_or(false)
    }

    pub fn notify(&mut self, kind: MutationKind, target: &Node) {
        if self.observers.iter().all(|observer| observer.observations.is_empty()) {
            return;
        }

        let key = NodeKey::of(target);
        let ancestors = ancestor_keys(target);
        for observer in self.observers.iter_mut() {
            if observer.is_interested(kind, key, &ancestors) {
                observer.queue.push(MutationRecord { kind, target: key });
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.observers.iter().any(|observer| !observer.queue.is_empty())
    }

    pub fn has_pending_for(&self, id: ObserverId) -> bool {
        self.get(id)
            .map(|observer| !observer.queue.is_empty())
            .unwrap_or(false)
    }

    pub fn take_pending(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        self.observers
            .iter_mut()
            .enumerate()
            .filter(|(_, observer)| !observer.queue.is_empty())
            .map(|(index, observer)| {
                let id = ObserverId {
                    index,
                    generation: observer.generation,
                };
                (id, std::mem::take(&mut observer.queue))
            })
            .collect()
    }

    /// Drains the queue of `id` only.
    pub fn take_pending_for(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.get_mut(id)
            .map(|observer| std::mem::take(&mut observer.queue))
            .unwrap_or_default()
    }

    /// Number of slots, released ones included.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn get(&self, id: ObserverId) -> Option<&Observer> {
        self.observers
            .get(id.index)
            .filter(|observer| !observer.released && observer.generation == id.generation)
    }

    fn get_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers
            .get_mut(id.index)
            .filter(|observer| !observer.released && observer.generation == id.generation)
    }
}

/// Keeps an observer disconnected while the page is written to.
///
/// The observer is reconnected to all of its roots when the guard goes out
/// of scope, on every exit path.
pub struct PausedObserver<'a> {
    page: &'a mut Page,
    id: ObserverId,
    roots: &'a [Node],
    options: ObserveOptions,
}

impl<'a> PausedObserver<'a> {
    pub(crate) fn new(
        page: &'a mut Page,
        id: ObserverId,
        roots: &'a [Node],
        options: ObserveOptions,
    ) -> Self {
        page.observers_mut().disconnect(id);
        Self {
            page,
            id,
            roots,
            options,
        }
    }
}

impl Deref for PausedObserver<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}

impl DerefMut for PausedObserver<'_> {
    fn deref_mut(&mut self) -> &mut Page {
        self.page
    }
}

impl Drop for PausedObserver<'_> {
    fn drop(&mut self) {
        for root in self.roots {
            self.page.observers_mut().observe(self.id, root, self.options);
        }
    }
}
