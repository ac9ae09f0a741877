use std::cell::OnceCell;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::NeighborOrder;
use crate::data::{Pos, MAX_SIDE};
use crate::moves::Move;
use crate::tree::NodeId;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardErr {
    #[error("Board has no rows")]
    Empty,
    #[error("Board larger than 15 rows/columns: {0}")]
    TooLarge(usize),
    #[error("Row {row} has {len} cells, board is not square")]
    NotSquare { row: usize, len: usize },
    #[error("Tile {value} at pos: [{r}, {c}] is out of range")]
    OutOfRange { value: u8, r: usize, c: usize },
    #[error("Tile {0} appears more than once")]
    Duplicate(u8),
}

/// One configuration of the puzzle together with the bookkeeping a search needs.
///
/// The grid is treated as immutable once any of the lazy caches
/// (empty position, key, neighbors) has been filled.
pub struct BoardState {
    tiles: Vec2d<u8>,
    empty_pos: OnceCell<Pos>,
    key: OnceCell<String>,
    depth: u32,
    cost: f64,
    order: NeighborOrder,
    /// Owned by the search, never read here.
    pub heuristic: f64,
    /// Owned by the search, never read here.
    pub explored: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) mov: Move,
    pub(crate) neighbors: Option<Vec<NodeId>>,
}

impl BoardState {
    /// Builds a root state without validating the tiles.
    ///
    /// Panics if the grid is empty or not square. A grid without `0`
    /// only fails once the empty position is needed.
    pub fn new(rows: &[Vec<u8>]) -> Self {
        Self::from_grid(Vec2d::new(rows))
    }

    /// Builds a root state, checking the tiles are a permutation of `0..n*n`.
    pub fn try_new(rows: &[Vec<u8>]) -> Result<Self, BoardErr> {
        let side = rows.len();
        if side == 0 {
            return Err(BoardErr::Empty);
        }
        if side > MAX_SIDE {
            return Err(BoardErr::TooLarge(side));
        }

        let mut seen = vec![false; side * side];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != side {
                return Err(BoardErr::NotSquare { row: r, len: row.len() });
            }
            for (c, &value) in row.iter().enumerate() {
                let index = usize::from(value);
                if index >= seen.len() {
                    return Err(BoardErr::OutOfRange { value, r, c });
                }
                if seen[index] {
                    return Err(BoardErr::Duplicate(value));
                }
                seen[index] = true;
            }
        }

        Ok(Self::new(rows))
    }

    /// The solved board: `1..n*n` in row-major order with the empty cell last.
    pub fn goal(side: u8) -> Self {
        assert!(side > 0 && usize::from(side) <= MAX_SIDE);

        let cells = u16::from(side) * u16::from(side);
        let rows: Vec<Vec<u8>> = (0..side)
            .map(|r| {
                (0..side)
                    .map(|c| ((u16::from(r) * u16::from(side) + u16::from(c) + 1) % cells) as u8)
                    .collect()
            })
            .collect();
        Self::new(&rows)
    }

    fn from_grid(tiles: Vec2d<u8>) -> Self {
        BoardState {
            tiles,
            empty_pos: OnceCell::new(),
            key: OnceCell::new(),
            depth: 0,
            cost: 0.0,
            order: NeighborOrder::default(),
            heuristic: 0.0,
            explored: false,
            parent: None,
            mov: Move::None,
            neighbors: None,
        }
    }

    pub fn with_order(mut self, order: NeighborOrder) -> Self {
        self.order = order;
        self
    }

    pub fn tiles(&self) -> &Vec2d<u8> {
        &self.tiles
    }

    pub fn side(&self) -> u8 {
        self.tiles.side()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn order(&self) -> NeighborOrder {
        self.order
    }

    pub fn reverse_neighbors(&self) -> bool {
        self.order.is_reversed()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move which produced this state from its parent, `Move::None` for roots.
    pub fn producing_move(&self) -> Move {
        self.mov
    }

    /// Cached neighbors, `None` until the search tree expands this node.
    pub fn neighbors(&self) -> Option<&[NodeId]> {
        self.neighbors.as_deref()
    }

    /// Overwrites one cell and drops the cached empty position and key.
    ///
    /// Must not be used on nodes already expanded by a `SearchTree`.
    pub fn set_tile(&mut self, pos: Pos, value: u8) {
        self.tiles[pos] = value;
        self.empty_pos.take();
        self.key.take();
    }

    /// Decimal digits of all tiles in row-major order, without separators.
    ///
    /// Boards with two-digit tiles can share a key (`1`,`15` and `11`,`5`).
    pub fn key(&self) -> &str {
        self.key.get_or_init(|| {
            let mut key = String::with_capacity(self.tiles.as_slice().len() * 2);
            for tile in self.tiles.iter() {
                key.push_str(&tile.to_string());
            }
            key
        })
    }

    pub fn has_key(&self) -> bool {
        self.key.get().is_some()
    }

    /// Compares keys when both are cached, otherwise scans the cells and
    /// returns true if *any* of them is smaller than its counterpart.
    ///
    /// This is not a total order - two boards can each be less than the other.
    pub fn less(&self, other: &BoardState) -> bool {
        if let (Some(a), Some(b)) = (self.key.get(), other.key.get()) {
            return a < b;
        }
        self.tiles
            .iter()
            .zip(other.tiles.iter())
            .any(|(a, b)| a < b)
    }

    /// Position of the empty cell, scanned for once and cached.
    ///
    /// Panics if the board has no empty cell.
    pub fn empty_pos(&self) -> Pos {
        *self.empty_pos.get_or_init(|| {
            match self.tiles.positions().find(|&(_, &tile)| tile == 0) {
                Some((pos, _)) => pos,
                None => panic!("No empty cell on board:\n{}", self.tiles),
            }
        })
    }

    /// A fresh copy of the grid with depth, cost, order and the empty position carried over.
    ///
    /// Key, neighbors, parent, move and the search-owned fields start unset.
    pub fn copy(&self) -> BoardState {
        let mut copy = Self::from_grid(self.tiles.copy());
        copy.empty_pos = self.empty_pos.clone();
        copy.depth = self.depth;
        copy.cost = self.cost;
        copy.order = self.order;
        copy
    }

    /// Slides the empty cell one step, `None` if that would leave the board.
    ///
    /// Depth and cost stay at this state's values, linking the result into
    /// the tree is left to the caller.
    pub fn apply(&self, mov: Move) -> Option<BoardState> {
        let empty = self.empty_pos();
        let target = mov.shift(empty, self.side())?;

        let mut next = self.copy();
        next.tiles.swap(empty, target);
        next.empty_pos = OnceCell::from(target);
        Some(next)
    }

    pub fn move_up(&self) -> Option<BoardState> {
        self.apply(Move::Up)
    }

    pub fn move_down(&self) -> Option<BoardState> {
        self.apply(Move::Down)
    }

    pub fn move_left(&self) -> Option<BoardState> {
        self.apply(Move::Left)
    }

    pub fn move_right(&self) -> Option<BoardState> {
        self.apply(Move::Right)
    }

    /// Moves which stay on the board, in expansion order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let empty = self.empty_pos();
        let side = self.side();
        Move::ALL
            .iter()
            .cloned()
            .filter(|mov| mov.shift(empty, side).is_some())
            .collect()
    }

    /// Pairs of non-empty tiles where the earlier one (row-major) is larger.
    pub fn inversions(&self) -> usize {
        let cells = self.tiles.as_slice();
        let mut count = 0;
        for i in 0..cells.len() {
            for j in i + 1..cells.len() {
                let (earlier, later) = (cells[i], cells[j]);
                if earlier != 0 && later != 0 && earlier > later {
                    count += 1;
                }
            }
        }
        count
    }

    /// Inversion parity only - the blank row is not taken into account
    /// so boards with an even side can be misreported.
    pub fn is_solvable(&self) -> bool {
        self.inversions() % 2 == 0
    }

    pub(crate) fn link(&mut self, parent: NodeId, parent_state: &BoardState, mov: Move) {
        self.parent = Some(parent);
        self.depth = parent_state.depth + 1;
        self.cost = parent_state.cost + 1.0;
        self.mov = mov;
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.key.get(), other.key.get()) {
            return a == b;
        }
        self.tiles == other.tiles
    }
}

impl Eq for BoardState {}

impl Hash for BoardState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for BoardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tiles)
    }
}

impl Debug for BoardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "depth: {}, cost: {}, move: {:?}", self.depth, self.cost, self.mov)?;
        write!(f, "{}", self.tiles)
    }
}

/// Only the grid and the producing move are exported.
#[derive(Serialize)]
struct Exported<'a> {
    #[serde(rename = "Matrix")]
    matrix: &'a Vec2d<u8>,
    #[serde(rename = "Move")]
    mov: Move,
}

impl Serialize for BoardState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Exported {
            matrix: &self.tiles,
            mov: self.mov,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use fnv::FnvHashSet;

    use super::*;

    fn board(rows: &[&[u8]]) -> BoardState {
        let rows: Vec<Vec<u8>> = rows.iter().map(|row| row.to_vec()).collect();
        BoardState::new(&rows)
    }

    fn interior() -> BoardState {
        board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]])
    }

    fn solved() -> BoardState {
        board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]])
    }

    #[test]
    fn finding_empty() {
        for r in 0..3 {
            for c in 0..3 {
                let mut state = solved();
                let pos = Pos::new(r, c);
                let tile = state.tiles()[pos];
                state.set_tile(Pos::new(2, 2), tile);
                state.set_tile(pos, 0);

                assert_eq!(state.empty_pos(), pos);
                assert_eq!(state.empty_pos(), pos);
            }
        }
    }

    #[test]
    #[should_panic(expected = "No empty cell")]
    fn no_empty_cell() {
        board(&[&[1, 2], &[3, 4]]).empty_pos();
    }

    #[test]
    fn moving_up() {
        let state = interior();
        let up = state.move_up().unwrap();

        assert_eq!(up.tiles().to_rows(), vec![vec![1, 0, 3], vec![4, 2, 5], vec![7, 8, 6]]);
        assert_eq!(up.empty_pos(), Pos::new(0, 1));
        assert_eq!(up.depth(), 0);
        assert_eq!(up.cost(), 0.0);
        assert_eq!(up.parent(), None);
        assert_eq!(up.producing_move(), Move::None);
        assert!(!up.has_key());
        assert_eq!(up.neighbors(), None);

        // the source is untouched
        assert_eq!(state.tiles().to_rows(), vec![vec![1, 2, 3], vec![4, 0, 5], vec![7, 8, 6]]);
    }

    #[test]
    fn moving_in_every_direction() {
        let state = interior();
        let down = state.move_down().unwrap();
        let left = state.move_left().unwrap();
        let right = state.move_right().unwrap();
        assert_eq!(down.tiles().to_rows(), vec![vec![1, 2, 3], vec![4, 8, 5], vec![7, 0, 6]]);
        assert_eq!(left.tiles().to_rows(), vec![vec![1, 2, 3], vec![0, 4, 5], vec![7, 8, 6]]);
        assert_eq!(right.tiles().to_rows(), vec![vec![1, 2, 3], vec![4, 5, 0], vec![7, 8, 6]]);
        assert_eq!(state.apply(Move::None), None);
        assert_eq!(state.legal_moves(), Move::ALL.to_vec());
    }

    #[test]
    fn moving_off_the_board() {
        let state = solved();
        assert!(state.move_right().is_none());
        assert!(state.move_down().is_none());
        assert!(state.move_up().is_some());
        assert!(state.move_left().is_some());
        assert_eq!(state.legal_moves(), vec![Move::Up, Move::Left]);

        let top_edge = board(&[&[1, 0, 2], &[3, 4, 5], &[6, 7, 8]]);
        assert_eq!(top_edge.legal_moves(), vec![Move::Down, Move::Left, Move::Right]);
    }

    #[test]
    fn moves_are_invertible() {
        let state = interior();
        let back = state.move_up().unwrap().move_down().unwrap();
        assert_eq!(back, state);
        assert_eq!(back.empty_pos(), state.empty_pos());

        let back = state.move_left().unwrap().move_right().unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn copying() {
        let state = interior().with_order(NeighborOrder::Reversed);
        state.key();
        state.empty_pos();

        let mut copy = state.copy();
        assert_eq!(copy, state);
        assert!(!copy.has_key());
        assert!(copy.reverse_neighbors());
        assert_eq!(copy.empty_pos(), Pos::new(1, 1));

        copy.set_tile(Pos::new(0, 0), 9);
        assert_ne!(copy, state);
        assert_eq!(state.tiles()[Pos::new(0, 0)], 1);
        assert_eq!(state.key(), "123405786");
    }

    #[test]
    fn keys() {
        let state = interior();
        assert!(!state.has_key());
        assert_eq!(state.key(), "123405786");
        assert!(state.has_key());
        assert_eq!(state.key(), "123405786");
        assert_eq!(interior().key(), state.key());
    }

    #[test]
    fn two_digit_keys_collide() {
        let a = board(&[&[1, 15, 11, 5], &[0, 2, 3, 4], &[6, 7, 8, 9], &[10, 12, 13, 14]]);
        let b = board(&[&[11, 5, 1, 15], &[0, 2, 3, 4], &[6, 7, 8, 9], &[10, 12, 13, 14]]);

        // no keys yet - cells are compared
        assert_ne!(a, b);

        assert_eq!(a.key(), b.key());
        assert_eq!(a, b);
    }

    #[test]
    fn equality_with_one_key() {
        let a = interior();
        let b = interior();
        a.key();
        assert_eq!(a, b);
        assert_ne!(a, solved());
        assert_ne!(a, BoardState::goal(2));
    }

    #[test]
    fn less_is_not_lexicographic() {
        let a = board(&[&[0, 3], &[2, 1]]);
        let b = board(&[&[1, 2], &[3, 0]]);
        assert!(a.less(&b));
        assert!(b.less(&a));
        assert!(!a.less(&a));

        // with keys it's a plain string comparison
        a.key();
        b.key();
        assert!(a.less(&b));
        assert!(!b.less(&a));
    }

    #[test]
    fn hashing_follows_keys() {
        let mut set = FnvHashSet::default();
        assert!(set.insert(interior()));
        assert!(!set.insert(interior()));
        assert!(set.insert(solved()));
        assert!(set.contains(&interior().move_up().unwrap().move_down().unwrap()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn solvability() {
        assert_eq!(solved().inversions(), 0);
        assert!(solved().is_solvable());

        let swapped = board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]);
        assert_eq!(swapped.inversions(), 1);
        assert!(!swapped.is_solvable());

        assert!(interior().is_solvable());
        assert!(BoardState::goal(4).is_solvable());
    }

    #[test]
    fn solvability_ignores_bookkeeping() {
        let state = interior();
        let moved = state.move_up().unwrap().move_down().unwrap();
        moved.key();
        let mut deep = moved.copy();
        deep.depth = 7;
        deep.cost = 7.0;
        assert_eq!(state.is_solvable(), deep.is_solvable());
        assert_eq!(state.inversions(), deep.inversions());
    }

    #[test]
    fn goal_boards() {
        assert_eq!(BoardState::goal(3), solved());
        assert_eq!(BoardState::goal(1).tiles().to_rows(), vec![vec![0]]);
        assert_eq!(BoardState::goal(2).key(), "1230");
        assert_eq!(BoardState::goal(3).empty_pos(), Pos::new(2, 2));
    }

    #[test]
    fn validating() {
        assert_eq!(BoardState::try_new(&[]).unwrap_err(), BoardErr::Empty);
        assert_eq!(
            BoardState::try_new(&[vec![1, 0], vec![2]]).unwrap_err(),
            BoardErr::NotSquare { row: 1, len: 1 }
        );
        assert_eq!(
            BoardState::try_new(&[vec![1, 0], vec![2, 4]]).unwrap_err(),
            BoardErr::OutOfRange { value: 4, r: 1, c: 1 }
        );
        assert_eq!(
            BoardState::try_new(&[vec![1, 0], vec![1, 2]]).unwrap_err(),
            BoardErr::Duplicate(1)
        );
        let huge = vec![vec![0u8; 16]; 16];
        assert_eq!(BoardState::try_new(&huge).unwrap_err(), BoardErr::TooLarge(16));
        assert_eq!(
            BoardErr::OutOfRange { value: 4, r: 1, c: 1 }.to_string(),
            "Tile 4 at pos: [1, 1] is out of range"
        );

        let state = BoardState::try_new(&[vec![1, 2], vec![0, 3]]).unwrap();
        assert_eq!(state.empty_pos(), Pos::new(1, 0));
    }

    #[test]
    fn exporting() {
        let json = serde_json::to_string(&interior()).unwrap();
        assert_eq!(json, r#"{"Matrix":[[1,2,3],[4,0,5],[7,8,6]],"Move":0}"#);

        let mut up = interior().move_up().unwrap();
        up.mov = Move::Up;
        up.depth = 1;
        let json = serde_json::to_string(&up).unwrap();
        assert_eq!(json, r#"{"Matrix":[[1,0,3],[4,2,5],[7,8,6]],"Move":1}"#);
    }

    #[test]
    fn formatting() {
        assert_eq!(interior().to_string(), "1 2 3\n4 0 5\n7 8 6\n");
        assert_eq!(
            format!("{:?}", interior()),
            "depth: 0, cost: 0, move: None\n1 2 3\n4 0 5\n7 8 6\n"
        );
    }
}
