use super::search_nodes::{ArenaFull, FrontierKey, NodeArena, NodeId};

/// Binary min-heap of nodes keyed by `FrontierKey`.
///
/// Each node stores its position in the heap, so membership tests are O(1) and
/// keys can be updated in place in O(log n).
#[derive(Default)]
pub struct PriorityFrontier {
    heap: Vec<(FrontierKey, NodeId)>,
}

impl PriorityFrontier {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns whether the node is in the frontier.
    #[inline]
    pub fn contains<P, O>(&self, arena: &NodeArena<P, O>, id: NodeId) -> bool {
        arena
            .heap_index(id)
            .is_some_and(|i| self.heap.get(i).is_some_and(|(_, other)| *other == id))
    }

    /// Returns the node with the smallest key.
    pub fn peek(&self) -> Option<NodeId> {
        self.heap.first().map(|(_, id)| *id)
    }

    /// Inserts a node, failing if the heap cannot grow.
    pub fn push<P, O>(
        &mut self,
        arena: &mut NodeArena<P, O>,
        id: NodeId,
        key: FrontierKey,
    ) -> Result<(), ArenaFull> {
        self.heap.try_reserve(1)?;
        let index = self.heap.len();
        self.heap.push((key, id));
        arena.set_heap_index(id, Some(index));
        self.sift_up(arena, index);

        Ok(())
    }

    /// Removes and returns the node with the smallest key.
    pub fn pop<P, O>(&mut self, arena: &mut NodeArena<P, O>) -> Option<NodeId> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(arena, 0, last);
        let (_, id) = self.heap.pop()?;
        arena.set_heap_index(id, None);

        if !self.heap.is_empty() {
            self.sift_down(arena, 0);
        }

        Some(id)
    }

    /// Changes the key of a node in the frontier.
    ///
    /// Returns `false` if the node is not in the frontier.
    pub fn update<P, O>(&mut self, arena: &mut NodeArena<P, O>, id: NodeId, key: FrontierKey) -> bool {
        if !self.contains(arena, id) {
            return false;
        }

        if let Some(index) = arena.heap_index(id) {
            let old = self.heap[index].0;
            self.heap[index].0 = key;

            if key < old {
                self.sift_up(arena, index);
            } else {
                self.sift_down(arena, index);
            }
        }

        true
    }

    /// Recomputes every key and restores the heap order in O(n).
    pub fn rebuild<P, O>(
        &mut self,
        arena: &mut NodeArena<P, O>,
        mut key_of: impl FnMut(&NodeArena<P, O>, NodeId) -> FrontierKey,
    ) {
        for entry in self.heap.iter_mut() {
            entry.0 = key_of(arena, entry.1);
        }

        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(arena, i);
        }

        for (i, (_, id)) in self.heap.iter().enumerate() {
            arena.set_heap_index(*id, Some(i));
        }
    }

    /// Iterates over the nodes in the frontier in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.heap.iter().map(|(_, id)| *id)
    }

    /// Removes every node.
    pub fn clear<P, O>(&mut self, arena: &mut NodeArena<P, O>) {
        for (_, id) in self.heap.drain(..) {
            arena.set_heap_index(id, None);
        }
    }

    fn swap<P, O>(&mut self, arena: &mut NodeArena<P, O>, i: usize, j: usize) {
        self.heap.swap(i, j);
        arena.set_heap_index(self.heap[i].1, Some(i));
        arena.set_heap_index(self.heap[j].1, Some(j));
    }

    fn sift_up<P, O>(&mut self, arena: &mut NodeArena<P, O>, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;

            if self.heap[index].0 >= self.heap[parent].0 {
                break;
            }

            self.swap(arena, index, parent);
            index = parent;
        }
    }

    fn sift_down<P, O>(&mut self, arena: &mut NodeArena<P, O>, mut index: usize) {
        let n = self.heap.len();

        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < n && self.heap[left].0 < self.heap[smallest].0 {
                smallest = left;
            }

            if right < n && self.heap[right].0 < self.heap[smallest].0 {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.swap(arena, index, smallest);
            index = smallest;
        }
    }
}
