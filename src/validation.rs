// src/validation.rs
//! Проверка инвариантов готового поля
//!
//! Генератор сам по себе всегда строит корректные поля; проверка нужна для полей,
//! пришедших извне (загруженных, собранных вручную), и для тестов.

use crate::config::BoardSize;
use crate::harbor::{Harbor, HarborKind};
use crate::terrain::{
    NUMBER_TOKENS, Terrain, TilePlacement, number_distribution, terrain_distribution,
};
use crate::topology::BoardTopology;
use std::collections::HashMap;
use thiserror::Error;

/// Нарушение инварианта поля
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardViolation {
    #[error("expected {expected} tiles, got {actual}")]
    TileCount { expected: usize, actual: usize },

    #[error("tile {0} is not part of the layout")]
    UnknownTile(usize),

    #[error("tile {0} is assigned more than once")]
    DuplicateTile(usize),

    #[error("tile {0} is not assigned")]
    MissingTile(usize),

    #[error("desert tile {0} carries a number")]
    DesertWithNumber(usize),

    #[error("resource tile {0} has no number")]
    MissingNumber(usize),

    #[error("tile {tile_id} has invalid number {number}")]
    InvalidNumber { tile_id: usize, number: u8 },

    #[error("expected {expected} {terrain} tiles, got {actual}")]
    TerrainCensus {
        terrain: Terrain,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} tokens numbered {number}, got {actual}")]
    NumberCensus {
        number: u8,
        expected: usize,
        actual: usize,
    },

    #[error("harbor {0} sits on an inner edge")]
    HarborOnInnerEdge(String),

    #[error("harbor {0} has a resource that does not match its kind")]
    HarborResourceMismatch(String),
}

/// Проверяет поле на все инварианты; пустой список — поле корректно.
#[must_use]
pub fn validate_board(tiles: &[TilePlacement], board_size: BoardSize) -> Vec<BoardViolation> {
    let topology = BoardTopology::new(board_size);
    let mut violations = Vec::new();

    if tiles.len() != topology.len() {
        violations.push(BoardViolation::TileCount {
            expected: topology.len(),
            actual: tiles.len(),
        });
    }

    let mut seen = vec![false; topology.len()];
    for tile in tiles {
        match seen.get_mut(tile.tile_id) {
            None => violations.push(BoardViolation::UnknownTile(tile.tile_id)),
            Some(true) => violations.push(BoardViolation::DuplicateTile(tile.tile_id)),
            Some(flag) => *flag = true,
        }

        match (tile.terrain.is_desert(), tile.number) {
            (true, Some(_)) => violations.push(BoardViolation::DesertWithNumber(tile.tile_id)),
            (false, None) => violations.push(BoardViolation::MissingNumber(tile.tile_id)),
            (false, Some(number)) if !NUMBER_TOKENS.contains(&number) => {
                violations.push(BoardViolation::InvalidNumber {
                    tile_id: tile.tile_id,
                    number,
                });
            }
            _ => {}
        }
    }
    for (tile_id, _) in seen.iter().enumerate().filter(|&(_, &s)| !s) {
        violations.push(BoardViolation::MissingTile(tile_id));
    }

    let mut terrains: HashMap<Terrain, usize> = HashMap::new();
    let mut numbers: HashMap<u8, usize> = HashMap::new();
    for tile in tiles {
        *terrains.entry(tile.terrain).or_insert(0) += 1;
        if let Some(number) = tile.number {
            *numbers.entry(number).or_insert(0) += 1;
        }
    }
    for (terrain, expected) in terrain_distribution(board_size) {
        let actual = terrains.get(&terrain).copied().unwrap_or(0);
        if actual != expected {
            violations.push(BoardViolation::TerrainCensus {
                terrain,
                expected,
                actual,
            });
        }
    }
    for (number, expected) in number_distribution(board_size) {
        let actual = numbers.get(&number).copied().unwrap_or(0);
        if actual != expected {
            violations.push(BoardViolation::NumberCensus {
                number,
                expected,
                actual,
            });
        }
    }

    violations
}

/// Проверяет, что гавани стоят на внешних сторонах и ресурс соответствует типу.
#[must_use]
pub fn validate_harbors(harbors: &[Harbor], board_size: BoardSize) -> Vec<BoardViolation> {
    let topology = BoardTopology::new(board_size);
    let mut violations = Vec::new();

    for harbor in harbors {
        if topology.slot(harbor.tile_id).is_none() {
            violations.push(BoardViolation::UnknownTile(harbor.tile_id));
            continue;
        }
        if harbor.edge >= 6 || topology.neighbor_across(harbor.tile_id, harbor.edge).is_some() {
            violations.push(BoardViolation::HarborOnInnerEdge(harbor.id.clone()));
        }
        let consistent = match harbor.kind {
            HarborKind::ThreeToOne => harbor.resource.is_none(),
            HarborKind::TwoToOne => harbor.resource.is_some_and(|r| !r.is_desert()),
        };
        if !consistent {
            violations.push(BoardViolation::HarborResourceMismatch(harbor.id.clone()));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateGenerator;
    use crate::config::GenerationOptions;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample(size: BoardSize) -> Vec<TilePlacement> {
        let topology = BoardTopology::new(size);
        CandidateGenerator::new(&topology, &GenerationOptions::default())
            .generate(&mut ChaCha8Rng::seed_from_u64(10))
    }

    #[test]
    fn generated_candidates_are_valid() {
        for size in [BoardSize::Standard, BoardSize::Extended] {
            assert!(validate_board(&sample(size), size).is_empty());
        }
    }

    #[test]
    fn desert_number_and_duplicates_are_reported() {
        let mut tiles = sample(BoardSize::Standard);
        let desert = tiles.iter().position(|t| t.terrain.is_desert()).unwrap();
        tiles[desert].number = Some(7);
        let other = (desert + 1) % tiles.len();
        tiles[other].tile_id = tiles[(other + 1) % tiles.len()].tile_id;

        let violations = validate_board(&tiles, BoardSize::Standard);
        assert!(violations.contains(&BoardViolation::DesertWithNumber(desert)));
        assert!(violations.contains(&BoardViolation::MissingTile(other)));
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, BoardViolation::DuplicateTile(_)))
        );
    }

    #[test]
    fn wrong_size_is_reported() {
        let tiles = sample(BoardSize::Standard);
        let violations = validate_board(&tiles, BoardSize::Extended);
        assert!(violations.contains(&BoardViolation::TileCount {
            expected: 30,
            actual: 19
        }));
    }

    #[test]
    fn inner_edge_harbor_is_reported() {
        let harbor = Harbor {
            id: "H-9-E0-3to1-any-0".to_string(),
            kind: HarborKind::ThreeToOne,
            resource: None,
            tile_id: 9,
            edge: 0,
        };
        let violations = validate_harbors(&[harbor], BoardSize::Standard);
        assert_eq!(
            violations,
            vec![BoardViolation::HarborOnInnerEdge("H-9-E0-3to1-any-0".to_string())]
        );
    }
}
