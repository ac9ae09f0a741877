use std::ops::{Index, IndexMut};

use crate::moves::{Move, Moves};
use crate::state::BoardState;

/// Index of a state inside a `SearchTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena owning every state generated from one root.
///
/// Children point to their parent by index so the whole tree
/// is released at once when the search is done.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<BoardState>,
}

impl SearchTree {
    pub fn new(root: BoardState) -> Self {
        debug!("New search tree, {0}x{0} root", root.side());
        SearchTree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of states allocated so far, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false - there is at least the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&BoardState> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut BoardState> {
        self.nodes.get_mut(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &BoardState)> + '_ {
        self.nodes.iter().enumerate().map(|(i, state)| (NodeId(i), state))
    }

    /// Children of `id`, generated on the first call and cached afterwards.
    ///
    /// Children are produced by moving up, down, left and right (in that
    /// order, reversed if the node says so), one step deeper and one unit
    /// more expensive than `id`.
    pub fn neighbors(&mut self, id: NodeId) -> &[NodeId] {
        let children = match self.nodes[id.0].neighbors.take() {
            Some(children) => children,
            None => self.expand(id),
        };
        self.nodes[id.0].neighbors.insert(children)
    }

    fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        let parent = &self.nodes[id.0];

        let mut children = Vec::with_capacity(Move::ALL.len());
        for &mov in &Move::ALL {
            if let Some(mut child) = parent.apply(mov) {
                child.link(id, parent, mov);
                children.push(child);
            }
        }
        if parent.reverse_neighbors() {
            children.reverse();
        }
        trace!(
            "Expanding node {} at depth {}: {} neighbors",
            id.0,
            parent.depth(),
            children.len()
        );

        let first = self.nodes.len();
        let ids = (first..first + children.len()).map(NodeId).collect();
        self.nodes.extend(children);
        ids
    }

    /// Every state from the root down to the parent of `id`, root first.
    ///
    /// `id` itself is not included so the length equals its depth.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ret = Vec::new();
        let mut cur = self[id].parent;
        while let Some(parent) = cur {
            ret.push(parent);
            cur = self[parent].parent;
        }
        ret.reverse();
        ret
    }

    /// Moves leading from the root to `id`.
    pub fn moves(&self, id: NodeId) -> Moves {
        let mut moves = Vec::new();
        let mut cur = id;
        while let Some(parent) = self[cur].parent {
            moves.push(self[cur].mov);
            cur = parent;
        }
        moves.reverse();
        Moves::new(moves)
    }
}

impl Index<NodeId> for SearchTree {
    type Output = BoardState;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeId> for SearchTree {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}
