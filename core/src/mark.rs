use serde::{Deserialize, Serialize};

/// Player annotation of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMark {
    Unrevealed,
    Flagged,
    Questioned,
    Revealed,
}

impl CellMark {
    pub const fn is_unrevealed(self) -> bool {
        !matches!(self, Self::Revealed)
    }

    /// Next mark on the `Unrevealed -> Flagged -> Questioned -> Unrevealed` ring, `None` once revealed.
    pub const fn cycled(self) -> Option<Self> {
        use CellMark::*;
        match self {
            Unrevealed => Some(Flagged),
            Flagged => Some(Questioned),
            Questioned => Some(Unrevealed),
            Revealed => None,
        }
    }

    /// Like [`Self::cycled`] but skipping question marks.
    pub const fn toggled(self) -> Option<Self> {
        use CellMark::*;
        match self {
            Unrevealed => Some(Flagged),
            Flagged | Questioned => Some(Unrevealed),
            Revealed => None,
        }
    }
}

impl Default for CellMark {
    fn default() -> Self {
        Self::Unrevealed
    }
}
