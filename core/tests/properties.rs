use std::collections::{BTreeSet, VecDeque};

use gridsweep_core::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn all_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
    (0..size.0).flat_map(move |row| (0..size.1).map(move |col| (row, col)))
}

fn random_config(rng: &mut SmallRng) -> GameConfig {
    let rows = rng.random_range(9..=30);
    let cols = rng.random_range(9..=30);
    let mines = rng.random_range(10..=mult(rows, cols) / 3);
    GameConfig::new(rows, cols, mines).unwrap()
}

fn brute_force_hint(game: &Game, (row, col): Coord2) -> u8 {
    let (rows, cols) = game.size();
    let mut count = 0;
    for d_row in -1i16..=1 {
        for d_col in -1i16..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let r = i16::from(row) + d_row;
            let c = i16::from(col) + d_col;
            if r < 0 || c < 0 || r >= i16::from(rows) || c >= i16::from(cols) {
                continue;
            }
            if game.mine_at((r as Coord, c as Coord)).unwrap() {
                count += 1;
            }
        }
    }
    count
}

/// Zero-connected region around `start` plus its numbered border.
fn expected_closure(game: &Game, start: Coord2) -> BTreeSet<Coord2> {
    let mut closure = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(coords) = queue.pop_front() {
        if game.hint_at(coords).unwrap() != Some(0) {
            continue;
        }
        for neighbor in NeighborIter::new(coords, game.size()) {
            if closure.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    closure
}

#[test]
fn generated_boards_have_exact_mine_counts_and_valid_hints() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let config = random_config(&mut rng);
        let game = Game::new(config, &mut rng).unwrap();

        let mines = all_coords(game.size())
            .filter(|&coords| game.mine_at(coords).unwrap())
            .count();
        assert_eq!(mines, usize::from(config.mines));

        for coords in all_coords(game.size()) {
            match game.hint_at(coords).unwrap() {
                None => assert!(game.mine_at(coords).unwrap()),
                Some(hint) => {
                    assert!(hint <= 8);
                    assert_eq!(hint, brute_force_hint(&game, coords), "at {coords:?}");
                }
            }
        }
    }
}

/// Pearson statistic over per-cell mine occupancy, scaled by `1 - p` so it follows chi-square at any density.
fn occupancy_chi_square(config: GameConfig, seed: u64, trials: usize) -> f64 {
    let mut generator = RandomLayoutGenerator::from_seed(seed);
    let (rows, cols) = config.size;
    let mut occupancy = vec![0usize; usize::from(rows) * usize::from(cols)];

    for _ in 0..trials {
        let layout = generator.generate(config).unwrap();
        assert_eq!(layout.mine_count(), config.mines);
        for (row, col) in layout.mine_coords() {
            occupancy[usize::from(row) * usize::from(cols) + usize::from(col)] += 1;
        }
    }

    let density = f64::from(config.mines) / f64::from(config.total_cells());
    let expected = trials as f64 * density;
    occupancy
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / (expected * (1.0 - density))
        })
        .sum()
}

#[test]
fn mine_positions_are_uniform() {
    let chi_square = occupancy_chi_square(Difficulty::Beginner.config(), 2024, 4000);
    // 80 degrees of freedom, mean ~80 and standard deviation ~12.6
    assert!(chi_square < 140.0, "chi-square {chi_square} too large");
}

#[test]
fn dense_mine_positions_are_uniform() {
    // more than half the cells are mines, so the generator scatters safe cells instead
    let config = GameConfig::new(9, 9, 60).unwrap();
    let chi_square = occupancy_chi_square(config, 2025, 4000);
    assert!(chi_square < 140.0, "chi-square {chi_square} too large");
    assert!(chi_square > 35.0, "chi-square {chi_square} suspiciously small");
}

#[test]
fn flood_fill_reveals_exactly_the_closure() {
    let mut rng = SmallRng::seed_from_u64(99);
    for _ in 0..200 {
        let config = random_config(&mut rng);
        let mut game = Game::new(config, &mut rng).unwrap();
        let safe: Vec<_> = all_coords(game.size())
            .filter(|&coords| !game.mine_at(coords).unwrap())
            .collect();
        let start = safe[rng.random_range(0..safe.len())];
        let expected = expected_closure(&game, start);

        let outcome = game.reveal(start).unwrap();

        assert_eq!(outcome.revealed, expected);
        assert!(outcome.revealed.iter().all(|&coords| !game.mine_at(coords).unwrap()));
        assert_eq!(usize::from(game.revealed_safe_count()), expected.len());
        for coords in all_coords(game.size()) {
            let revealed = game.mark_at(coords).unwrap() == CellMark::Revealed;
            assert_eq!(revealed, expected.contains(&coords));
        }
    }
}

#[test]
fn revealing_every_safe_cell_wins_only_at_the_end() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..50 {
        let config = random_config(&mut rng);
        let mut game = Game::new(config, &mut rng).unwrap();
        let mut safe: Vec<_> = all_coords(game.size())
            .filter(|&coords| !game.mine_at(coords).unwrap())
            .collect();
        safe.shuffle(&mut rng);

        for coords in safe {
            if game.mark_at(coords).unwrap() == CellMark::Revealed {
                continue;
            }
            assert_eq!(game.state(), GameState::InGame);
            assert!(game.reveal(coords).unwrap().has_update());
        }

        assert_eq!(game.state(), GameState::Win);
        assert_eq!(game.revealed_safe_count(), game.safe_cell_count());
        assert_eq!(game.reveal((0, 0)), Err(GameError::AlreadyEnded));
    }
}

#[test]
fn flagging_every_mine_then_chording_wins() {
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..50 {
        let config = random_config(&mut rng);
        let mut game = Game::new(config, &mut rng).unwrap();
        let mines: Vec<_> = game.mine_coords().collect();
        for &coords in &mines {
            assert_eq!(game.cycle_mark(coords), Ok(CellMark::Flagged));
        }
        assert_eq!(game.remaining_mine_estimate(), 0);

        // with every mine flagged, each revealed cell accepts a chord and no reveal can hit a mine
        for coords in all_coords(game.size()) {
            if game.is_finished() {
                break;
            }
            if game.mark_at(coords).unwrap() == CellMark::Flagged {
                continue;
            }
            let outcome = game.chord_reveal(coords).unwrap();
            assert_ne!(outcome.state, GameState::Lose);
            assert!(game.is_finished() || game.can_chord_reveal_at(coords));
        }

        assert_eq!(game.state(), GameState::Win);
        assert_eq!(usize::from(game.flag_count()), mines.len());
    }
}

#[test]
fn same_seed_plays_out_identically() {
    let config = Difficulty::Expert.config();
    let mut first = Game::with_seed(config, 1234).unwrap();
    let mut second = Game::with_seed(config, 1234).unwrap();

    for coords in [(0, 0), (8, 15), (15, 29)] {
        if first.is_finished() {
            break;
        }
        assert_eq!(first.reveal(coords), second.reveal(coords));
    }
    assert_eq!(first.to_string(), second.to_string());
}
