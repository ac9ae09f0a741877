use std::fmt::{self, Debug, Display, Formatter};

use serde::{Serialize, Serializer};

use crate::data::Pos;

/// Direction the empty cell travelled to produce a state.
///
/// `None` marks the root which wasn't produced by any move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order - neighbors are always generated in this order before any reversing.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Numeric code used in the exported representation.
    pub fn code(self) -> u8 {
        match self {
            Move::None => 0,
            Move::Up => 1,
            Move::Down => 2,
            Move::Left => 3,
            Move::Right => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Move> {
        match code {
            0 => Some(Move::None),
            1 => Some(Move::Up),
            2 => Some(Move::Down),
            3 => Some(Move::Left),
            4 => Some(Move::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Move {
        match self {
            Move::None => Move::None,
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Where the empty cell ends up on a square board with the given side,
    /// `None` if it would leave the board.
    pub(crate) fn shift(self, pos: Pos, side: u8) -> Option<Pos> {
        match self {
            Move::None => None,
            Move::Up if pos.r > 0 => Some(Pos::new(pos.r - 1, pos.c)),
            Move::Down if pos.r + 1 < side => Some(Pos::new(pos.r + 1, pos.c)),
            Move::Left if pos.c > 0 => Some(Pos::new(pos.r, pos.c - 1)),
            Move::Right if pos.c + 1 < side => Some(Pos::new(pos.r, pos.c + 1)),
            _ => None,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Move::None => Ok(()),
            Move::Up => write!(f, "u"),
            Move::Down => write!(f, "d"),
            Move::Left => write!(f, "l"),
            Move::Right => write!(f, "r"),
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Move::None => write!(f, "None"),
            _ => write!(f, "{}", self),
        }
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::None
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub(crate) fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Move> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.0
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = ::std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = ::std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
