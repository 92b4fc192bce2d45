use serde::{Deserialize, Serialize};

use crate::*;

/// Bounds a [`GameConfig`] must fall within.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub min_size: Coord,
    pub max_size: Coord,
    pub min_mines: CellCount,
}

impl Limits {
    /// Policy for regular play: 9 to 30 cells per side, at least 10 mines.
    pub const STANDARD: Self = Self {
        min_size: 9,
        max_size: 30,
        min_mines: 10,
    };

    /// Any non-empty board with any mine count that fits, for scripted boards and tests.
    pub const UNRESTRICTED: Self = Self {
        min_size: 1,
        max_size: Coord::MAX,
        min_mines: 0,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validated against [`Limits::STANDARD`]. Out of range values are rejected, never clamped.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        Self::with_limits(rows, cols, mines, &Limits::STANDARD)
    }

    pub fn with_limits(rows: Coord, cols: Coord, mines: CellCount, limits: &Limits) -> Result<Self> {
        let config = Self::new_unchecked((rows, cols), mines);
        config.validate(limits)?;
        Ok(config)
    }

    /// Clamps rows and cols to `9..=30` and mines to `10..=rows*cols`.
    ///
    /// This is the policy a host applies to user input (a custom difficulty dialog for instance)
    /// before constructing a game. The engine itself never clamps.
    pub fn clamped(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        let Limits {
            min_size,
            max_size,
            min_mines,
        } = Limits::STANDARD;
        let rows = rows.clamp(min_size, max_size);
        let cols = cols.clamp(min_size, max_size);
        let mines = mines.clamp(min_mines, mult(rows, cols));
        Self::new_unchecked((rows, cols), mines)
    }

    pub fn validate(&self, limits: &Limits) -> Result<()> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyBoard.into());
        }
        let size_range = limits.min_size.max(1)..=limits.max_size;
        if !size_range.contains(&rows) {
            return Err(ConfigError::RowsOutOfRange(rows).into());
        }
        if !size_range.contains(&cols) {
            return Err(ConfigError::ColsOutOfRange(cols).into());
        }
        if self.mines < limits.min_mines {
            return Err(ConfigError::TooFewMines {
                mines: self.mines,
                min: limits.min_mines,
            }
            .into());
        }
        let cells = self.total_cells();
        if self.mines > cells {
            return Err(ConfigError::TooManyMines {
                mines: self.mines,
                cells,
            }
            .into());
        }
        Ok(())
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Classic presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Beginner => GameConfig::new_unchecked((9, 9), 10),
            Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Expert => GameConfig::new_unchecked((16, 30), 99),
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}
