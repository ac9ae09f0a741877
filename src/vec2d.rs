use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use serde::{Serialize, Serializer};

use crate::data::Pos;

/// Square grid stored row-major in a single vector.
#[derive(PartialEq, Eq, Hash)]
pub struct Vec2d<T> {
    data: Vec<T>,
    side: u8,
}

impl<T> Vec2d<T> {
    pub fn side(&self) -> u8 {
        self.side
    }

    pub fn rows(&self) -> u8 {
        self.side
    }

    pub fn cols(&self) -> u8 {
        self.side
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> ::std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn rows_iter(&self) -> ::std::slice::Chunks<'_, T> {
        self.data.chunks(usize::from(self.side))
    }

    /// Row-major cells together with their position.
    pub fn positions(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        let side = usize::from(self.side);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new((i / side) as u8, (i % side) as u8), cell))
    }

    pub fn swap(&mut self, a: Pos, b: Pos) {
        let a = self.flat(a);
        let b = self.flat(b);
        self.data.swap(a, b);
    }

    fn flat(&self, pos: Pos) -> usize {
        usize::from(pos.r) * usize::from(self.side) + usize::from(pos.c)
    }
}

impl<T: Copy> Vec2d<T> {
    /// Panics unless the grid is square with at least one row.
    pub fn new(grid: &[Vec<T>]) -> Self {
        assert!(!grid.is_empty(), "grid must have at least one row");
        assert!(grid.len() <= usize::from(u8::MAX));

        let side = grid.len();
        let mut data = Vec::with_capacity(side * side);
        for row in grid {
            assert_eq!(row.len(), side, "grid must be square");
            data.extend_from_slice(row);
        }
        Vec2d {
            data,
            side: side as u8,
        }
    }

    /// Allocates a new grid of the same size and copies every cell over.
    pub fn copy(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                data.push(self[Pos::new(r, c)]);
            }
        }
        Vec2d {
            data,
            side: self.side,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows_iter().map(|row| row.to_vec()).collect()
    }
}

impl<T: Display> Display for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: Display> Debug for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        &self.data[self.flat(index)]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let index = self.flat(index);
        &mut self.data[index]
    }
}

/// Serialized as a list of rows.
impl<T: Serialize> Serialize for Vec2d<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows_iter())
    }
}
