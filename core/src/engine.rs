use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::num::Saturating;
use core::ops::{BitOr, BitOrAssign};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InGame -> Win
/// - InGame -> Lose
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InGame,
    Win,
    Lose,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InGame
    }
}

/// Cells opened by a single call and the state the game ended up in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub revealed: BTreeSet<Coord2>,
    pub state: GameState,
}

impl RevealOutcome {
    pub const fn unchanged(state: GameState) -> Self {
        Self {
            revealed: BTreeSet::new(),
            state,
        }
    }

    /// Whether this outcome could have caused an update to the game
    pub fn has_update(&self) -> bool {
        !self.revealed.is_empty()
    }
}

/// Used to merge outcomes of consecutive reveals
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl BitOrAssign for RevealOutcome {
    fn bitor_assign(&mut self, mut rhs: Self) {
        use GameState::*;
        self.revealed.append(&mut rhs.revealed);
        self.state = match (self.state, rhs.state) {
            (Lose, _) | (_, Lose) => Lose,
            (Win, _) | (_, Win) => Win,
            (InGame, InGame) => InGame,
        };
    }
}

/// One game from the first reveal to a win or a loss.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    mine_layout: MineLayout,
    hints: HintGrid,
    marks: Array2<CellMark>,
    revealed_safe_count: Saturating<CellCount>,
    flag_count: Saturating<CellCount>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// Generates a fresh layout from `rng`, the config must satisfy [`Limits::STANDARD`].
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        config.validate(&Limits::STANDARD)?;
        let mine_layout = generate(config, rng)?;
        log::debug!(
            "New game {}x{} with {} mines",
            config.rows(),
            config.cols(),
            config.mines
        );
        Ok(Self::from_layout(mine_layout))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        log::debug!("Seeding board generation with {seed}");
        Self::new(config, &mut SmallRng::seed_from_u64(seed))
    }

    /// Starts a game on an existing layout, no policy limits apply.
    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        let hints = compute_hints(&mine_layout);
        Self {
            mine_layout,
            hints,
            marks: Array2::default(size.to_nd_index()),
            revealed_safe_count: Saturating(0),
            flag_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn hints(&self) -> &HintGrid {
        &self.hints
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.mine_layout.safe_cell_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count.0
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count.0
    }

    /// Mines minus flags, negative when the player placed more flags than there are mines.
    pub fn remaining_mine_estimate(&self) -> isize {
        (self.mine_layout.mine_count() as isize) - (self.flag_count.0 as isize)
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_layout.mine_coords()
    }

    pub fn mine_at(&self, coords: Coord2) -> Result<bool> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.mine_layout[coords])
    }

    /// Adjacent mine count, `None` for a mine cell.
    pub fn hint_at(&self, coords: Coord2) -> Result<Option<u8>> {
        self.hints.get(coords)
    }

    pub fn mark_at(&self, coords: Coord2) -> Result<CellMark> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.marks[coords.to_nd_index()])
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() || self.mine_layout.validate_coords(coords).is_err() {
            return false;
        }

        match self.marks[coords.to_nd_index()] {
            CellMark::Revealed => self.hints.hint(coords) == Some(self.count_flagged_neighbors(coords)),
            _ => false,
        }
    }

    /// Cycles `Unrevealed -> Flagged -> Questioned -> Unrevealed`, returning the new mark.
    pub fn cycle_mark(&mut self, coords: Coord2) -> Result<CellMark> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_game()?;

        let next = self.marks[coords.to_nd_index()]
            .cycled()
            .ok_or(GameError::CellRevealed)?;
        self.set_mark(coords, next);
        Ok(next)
    }

    /// Flags an unmarked cell, or clears a flag or question mark.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<CellMark> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_game()?;

        let next = self.marks[coords.to_nd_index()]
            .toggled()
            .ok_or(GameError::CellRevealed)?;
        self.set_mark(coords, next);
        Ok(next)
    }

    /// Reveals a cell, flood-filling through zero hints. Revealing a revealed cell changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_game()?;

        let mut revealed = BTreeSet::new();
        self.flood_reveal(coords, &mut revealed);
        log::trace!("Reveal at {:?} opened {} cells", coords, revealed.len());
        Ok(RevealOutcome {
            revealed,
            state: self.state,
        })
    }

    /// Reveals every unflagged neighbour of a revealed cell whose hint matches its flagged neighbours.
    ///
    /// On a cell that is not revealed yet this is a plain [`Self::reveal`]. A mismatched flag count reveals nothing.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_game()?;

        if self.marks[coords.to_nd_index()] != CellMark::Revealed {
            return self.reveal(coords);
        }

        let flagged = self.count_flagged_neighbors(coords);
        if self.hints.hint(coords) != Some(flagged) {
            log::trace!("Chord at {:?} rejected, {} flags around it", coords, flagged);
            return Ok(RevealOutcome::unchanged(self.state));
        }

        let targets: Vec<_> = self
            .mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| {
                !matches!(
                    self.marks[pos.to_nd_index()],
                    CellMark::Flagged | CellMark::Revealed
                )
            })
            .collect();

        let mut revealed = BTreeSet::new();
        for pos in targets {
            if self.state.is_finished() {
                break;
            }
            self.flood_reveal(pos, &mut revealed);
        }
        log::trace!("Chord at {:?} opened {} cells", coords, revealed.len());
        Ok(RevealOutcome {
            revealed,
            state: self.state,
        })
    }

    /// Worklist flood fill from `start`, recording every cell it reveals.
    fn flood_reveal(&mut self, start: Coord2, revealed: &mut BTreeSet<Coord2>) {
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            if self.state.is_finished() {
                break;
            }
            if !self.reveal_single_cell(coords) {
                continue;
            }
            revealed.insert(coords);

            // mines have no hint, so they never expand
            if self.hints.hint(coords) == Some(0) {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(coords)
                        .filter(|&pos| self.marks[pos.to_nd_index()].is_unrevealed()),
                );
            }
        }
    }

    /// Returns `false` when the cell was already revealed.
    fn reveal_single_cell(&mut self, coords: Coord2) -> bool {
        let mark = &mut self.marks[coords.to_nd_index()];
        match *mark {
            CellMark::Revealed => return false,
            CellMark::Flagged => self.flag_count -= 1,
            CellMark::Unrevealed | CellMark::Questioned => {}
        }
        *mark = CellMark::Revealed;

        if self.mine_layout[coords] {
            self.triggered_mine = Some(coords);
            self.end_game(GameState::Lose);
        } else {
            self.revealed_safe_count += 1;
            if self.revealed_safe_count.0 == self.mine_layout.safe_cell_count() {
                self.end_game(GameState::Win);
            }
        }
        true
    }

    fn set_mark(&mut self, coords: Coord2, next: CellMark) {
        let mark = &mut self.marks[coords.to_nd_index()];
        if *mark == CellMark::Flagged {
            self.flag_count -= 1;
        }
        if next == CellMark::Flagged {
            self.flag_count += 1;
        }
        *mark = next;
    }

    fn end_game(&mut self, state: GameState) {
        if self.state.is_finished() {
            return;
        }

        match state {
            GameState::Lose => log::debug!("Game lost on mine at {:?}", self.triggered_mine),
            _ => log::debug!("Game ended: {:?}", state),
        }
        self.state = state;
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        // at most 8 neighbours
        self.marks
            .iter_neighbor_cells(coords)
            .filter(|&mark| mark == CellMark::Flagged)
            .count() as u8
    }

    fn check_in_game(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Player view, one line per row: `#` unrevealed, `F` flag, `?` question, `.` zero, digits for hints, `*` mine.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.marks.rows().into_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, &mark) in line.iter().enumerate() {
                let coords = (row as Coord, col as Coord);
                match (mark, self.hints.hint(coords)) {
                    (CellMark::Unrevealed, _) => write!(f, "#")?,
                    (CellMark::Flagged, _) => write!(f, "F")?,
                    (CellMark::Questioned, _) => write!(f, "?")?,
                    (CellMark::Revealed, None) => write!(f, "*")?,
                    (CellMark::Revealed, Some(0)) => write!(f, ".")?,
                    (CellMark::Revealed, Some(hint)) => write!(f, "{hint}")?,
                }
            }
        }
        Ok(())
    }
}
