// src/board.rs
//! Полный цикл генерации: поле, гавани, отчёт о справедливости
//!
//! Пакетная генерация строит независимые поля, каждое из своего `ChaCha8Rng`
//! с сидом `base_seed + index`. С фичей `parallel` поля строятся в пуле `rayon`;
//! результат от этого не меняется.

use crate::config::{BoardGenerationParams, BoardSize};
use crate::fairness::{FairnessMetrics, FairnessScorer};
use crate::harbor::{Harbor, HarborPlacer};
use crate::search::{BoardSearch, SearchOutcome};
use crate::terrain::TilePlacement;
use crate::topology::BoardTopology;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Готовое поле со всеми производными данными
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBoard {
    /// Сид, из которого построено поле (если был)
    pub seed: Option<u64>,
    pub board_size: BoardSize,
    pub tiles: Vec<TilePlacement>,
    pub harbors: Vec<Harbor>,
    pub metrics: FairnessMetrics,
    pub outcome: SearchOutcome,
    /// Оценка с учётом параметров (только для `SearchOutcome::Scored`)
    pub score: Option<u32>,
}

/// Строит поле по параметрам; при `params.seed == None` берёт генератор потока.
#[must_use]
pub fn generate_board(params: &BoardGenerationParams) -> GeneratedBoard {
    match params.seed {
        Some(seed) => generate_seeded_board(params, seed),
        None => build_board(&mut rand::thread_rng(), params, None),
    }
}

/// Строит поле из `ChaCha8Rng` с заданным сидом (сид из `params` игнорируется).
#[must_use]
pub fn generate_seeded_board(params: &BoardGenerationParams, seed: u64) -> GeneratedBoard {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    build_board(&mut rng, params, Some(seed))
}

/// Строит `count` независимых полей с сидами `base_seed`, `base_seed + 1`, …
#[must_use]
pub fn generate_boards(
    params: &BoardGenerationParams,
    base_seed: u64,
    count: usize,
) -> Vec<GeneratedBoard> {
    let seeds: Vec<u64> = (0..count as u64)
        .map(|i| base_seed.wrapping_add(i))
        .collect();

    #[cfg(feature = "parallel")]
    let boards = seeds
        .par_iter()
        .map(|&seed| generate_seeded_board(params, seed))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let boards = seeds
        .iter()
        .map(|&seed| generate_seeded_board(params, seed))
        .collect();

    boards
}

fn build_board<R>(rng: &mut R, params: &BoardGenerationParams, seed: Option<u64>) -> GeneratedBoard
where
    R: Rng + ?Sized,
{
    let topology = BoardTopology::new(params.board_size);
    let result =
        BoardSearch::new(&topology, params.options.clone(), params.candidate_count).run(rng);

    let harbors = if params.place_harbors {
        HarborPlacer::new(&topology).place(rng)
    } else {
        Vec::new()
    };
    let metrics = FairnessScorer::new(&topology).metrics(&result.tiles);

    if result.outcome == SearchOutcome::Unconstrained {
        tracing::warn!(?seed, "board may contain adjacent 6/8 tiles");
    }

    GeneratedBoard {
        seed,
        board_size: params.board_size,
        tiles: result.tiles,
        harbors,
        metrics,
        outcome: result.outcome,
        score: result.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_board, validate_harbors};

    fn params(size: BoardSize) -> BoardGenerationParams {
        BoardGenerationParams {
            board_size: size,
            candidate_count: 100,
            ..BoardGenerationParams::default()
        }
    }

    #[test]
    fn seeded_board_is_complete_and_valid() {
        for size in [BoardSize::Standard, BoardSize::Extended] {
            let board = generate_seeded_board(&params(size), 5);
            assert_eq!(board.seed, Some(5));
            assert!(validate_board(&board.tiles, size).is_empty());
            assert!(validate_harbors(&board.harbors, size).is_empty());
            assert_eq!(board.harbors.len(), 9);
            if board.outcome != SearchOutcome::Unconstrained {
                assert!(!board.metrics.has_adjacent_six_eight);
            }
        }
    }

    #[test]
    fn batch_matches_individual_boards() {
        let params = params(BoardSize::Standard);
        let batch = generate_boards(&params, 100, 4);
        assert_eq!(batch.len(), 4);
        for (i, board) in batch.iter().enumerate() {
            assert_eq!(board, &generate_seeded_board(&params, 100 + i as u64));
        }
    }

    #[test]
    fn harbors_can_be_skipped() {
        let params = BoardGenerationParams {
            place_harbors: false,
            seed: Some(1),
            ..params(BoardSize::Standard)
        };
        let board = generate_board(&params);
        assert!(board.harbors.is_empty());
        assert_eq!(board.seed, Some(1));
    }

    #[test]
    fn board_serializes_to_json() {
        let board = generate_seeded_board(&params(BoardSize::Standard), 9);
        let json = serde_json::to_string(&board).unwrap();
        let back: GeneratedBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tiles, board.tiles);
        assert_eq!(back.harbors, board.harbors);
    }
}
