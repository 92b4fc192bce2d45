use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Uniformly random placement by rejection sampling over linear cell indices.
///
/// Every one of the `size choose mines` placements is equally likely. The random source is owned by the generator
/// so a seeded one reproduces the same boards.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator<R> {
    rng: R,
}

impl RandomLayoutGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomLayoutGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> LayoutGenerator for RandomLayoutGenerator<R> {
    fn generate(&mut self, config: GameConfig) -> Result<MineLayout> {
        generate(config, &mut self.rng)
    }
}

/// Places `config.mines` mines uniformly at random, drawing from `rng`.
///
/// Only checks that the mines fit on a non-empty board, policy limits are up to the caller.
pub fn generate<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<MineLayout> {
    config.validate(&Limits::UNRESTRICTED)?;

    let total_cells = config.total_cells();
    let shape = config.size.to_nd_index();

    // optimize for full boards
    if config.mines == total_cells {
        log::warn!("Minefield is full, every one of {} cells is a mine", total_cells);
        return MineLayout::from_mine_mask(Array2::from_elem(shape, true));
    }

    // past half density it is cheaper to scatter the safe cells instead
    let (fill, target, count) = if config.mines > total_cells / 2 {
        log::warn!(
            "Dense minefield ({} of {} cells), placing safe cells instead",
            config.mines,
            total_cells
        );
        (true, false, total_cells - config.mines)
    } else {
        (false, true, config.mines)
    };

    let mut mines: Array2<bool> = Array2::from_elem(shape, fill);
    {
        let cells = mines.as_slice_mut().expect("layout should be standard");
        let mut remaining = count;
        while remaining > 0 {
            let place = rng.random_range(0..cells.len());
            if cells[place] != target {
                cells[place] = target;
                remaining -= 1;
            }
        }
    }

    let layout = MineLayout::from_mine_mask(mines)?;
    // double check mine count
    if layout.mine_count() != config.mines {
        log::warn!(
            "Generated minefield count mismatch, actual: {}, requested: {}",
            layout.mine_count(),
            config.mines
        );
    }
    Ok(layout)
}
