use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable placement of mines over a board; `true` marks a mine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineLayout")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

/// Serialized form, recounted before it becomes a [`MineLayout`].
#[derive(Deserialize)]
struct RawMineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<RawMineLayout> for MineLayout {
    type Error = GameError;

    fn try_from(raw: RawMineLayout) -> Result<Self> {
        let layout = Self::from_mine_mask(raw.mine_mask)?;
        if layout.mine_count != raw.mine_count {
            return Err(GameError::MineCountMismatch {
                declared: raw.mine_count,
                actual: layout.mine_count,
            });
        }
        Ok(layout)
    }
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        if rows > usize::from(Coord::MAX) || cols > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Ok(Self {
            mine_mask,
            // bounded by rows * cols <= 255 * 255
            mine_count: mine_count as CellCount,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds(coords));
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// Parses rows of `*` (mine) and `.` (safe), one line per row. Whitespace around lines is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let lines = || text.lines().map(str::trim).filter(|line| !line.is_empty());
        let rows = lines().count();
        let cols = lines().next().map_or(0, |line| line.chars().count());
        let mut mine_mask: Array2<bool> = Array2::default([rows, cols]);

        for (row, line) in lines().enumerate() {
            if line.chars().count() != cols {
                return Err(GameError::InvalidBoardShape);
            }
            for (col, ch) in line.chars().enumerate() {
                mine_mask[[row, col]] = match ch {
                    '*' => true,
                    '.' => false,
                    _ => return Err(GameError::InvalidBoardShape),
                };
            }
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.mine_mask)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn mine_mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}
