use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Stored at mine cells, outside the `0..=8` hint range.
pub const MINE_HINT: u8 = 9;

/// Adjacent-mine counts for every cell of a layout, computed once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintGrid {
    hints: Array2<u8>,
}

impl HintGrid {
    pub fn size(&self) -> Coord2 {
        grid_size(&self.hints)
    }

    /// Hint at a safe cell, `None` at a mine.
    pub fn get(&self, coords: Coord2) -> Result<Option<u8>> {
        let (rows, cols) = self.size();
        if coords.0 >= rows || coords.1 >= cols {
            return Err(GameError::OutOfBounds(coords));
        }
        Ok(self.hint(coords))
    }

    /// Unchecked variant of [`Self::get`] for coordinates already validated by the caller.
    pub(crate) fn hint(&self, coords: Coord2) -> Option<u8> {
        match self.hints[coords.to_nd_index()] {
            MINE_HINT => None,
            hint => Some(hint),
        }
    }
}

/// Counts the mines in the clipped Moore neighbourhood of every safe cell.
pub fn compute_hints(layout: &MineLayout) -> HintGrid {
    let mine_mask = layout.mine_mask();
    let hints = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
        let coords = (row as Coord, col as Coord);
        if layout[coords] {
            MINE_HINT
        } else {
            // at most 8 neighbours
            mine_mask
                .iter_neighbor_cells(coords)
                .filter(|&is_mine| is_mine)
                .count() as u8
        }
    });
    HintGrid { hints }
}

impl fmt::Display for HintGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.hints.rows().into_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for &hint in line {
                match hint {
                    MINE_HINT => write!(f, "*")?,
                    hint => write!(f, "{hint}")?,
                }
            }
        }
        Ok(())
    }
}
