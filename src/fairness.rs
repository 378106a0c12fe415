// src/fairness.rs
//! Оценка справедливости поля
//!
//! Из полного назначения вычисляются структурные метрики:
//! - соседство «горячих» чисел 6 и 8 (жёсткое ограничение для поиска)
//! - суммы «точек» по каждому ресурсу
//! - сила перекрёстков (тройки попарно смежных гексов)
//! - кластеры одинаковых ресурсов (опционально)
//!
//! и сводятся в одно число `score`: меньше — лучше, 0 — идеал.
//!
//! ## Формула
//!
//! ```text
//! score = 10000 · [есть соседние 6/8]
//!       + 10 · (max − min) сумм точек по ресурсам с ненулевой суммой
//!       + 50 · max(0, сильнейший перекрёсток − 11)
//!       + 20 · штраф кластеров                          (limit_same_resource_adjacency)
//!       + 100 · max(0, сильнейший перекрёсток − порог)   (max_intersection_value_cap)
//! ```
//!
//! Первые три слагаемых входят в `FairnessMetrics::score`, последние два добавляет
//! `FairnessScorer::score` в зависимости от `GenerationOptions`.

use crate::config::{BoardSize, GenerationOptions};
use crate::terrain::{Terrain, TilePlacement};
use crate::topology::{BoardTopology, Triangle};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Штраф за соседние 6/8: ставит такие поля позади любых других
pub const ADJACENT_SIX_EIGHT_PENALTY: u32 = 10_000;
/// Вес разброса сумм точек между ресурсами
pub const PIP_SPREAD_WEIGHT: u32 = 10;
/// Сила перекрёстка, выше которой начинается штраф
pub const INTERSECTION_SOFT_LIMIT: u32 = 11;
/// Вес превышения `INTERSECTION_SOFT_LIMIT`
pub const INTERSECTION_OVERLOAD_WEIGHT: u32 = 50;
/// Вес штрафа кластеров одинаковых ресурсов
pub const CLUSTER_PENALTY_WEIGHT: u32 = 20;
/// Вес превышения пользовательского порога перекрёстка
pub const INTERSECTION_CAP_WEIGHT: u32 = 100;
/// Сколько сильнейших перекрёстков попадает в отчёт
pub const TOP_INTERSECTIONS: usize = 5;

/// Перекрёсток: три попарно смежных гекса и их суммарный вес в точках
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    pub tiles: Triangle,
    pub value: u32,
}

/// Отчёт о справедливости поля
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessMetrics {
    /// Сумма точек по каждому типу местности (у пустыни всегда 0)
    pub pip_totals_by_resource: BTreeMap<Terrain, u32>,
    pub strongest_intersection: u32,
    /// До пяти сильнейших перекрёстков, по убыванию силы
    pub top_intersections: Vec<Intersection>,
    pub has_adjacent_six_eight: bool,
    pub average_intersection_value: f64,
    /// Базовая оценка без штрафов, зависящих от параметров
    pub score: u32,
}

/// Оценщик, привязанный к одной топологии
#[derive(Debug, Clone, Copy)]
pub struct FairnessScorer<'a> {
    topology: &'a BoardTopology,
}

impl<'a> FairnessScorer<'a> {
    #[must_use]
    pub fn new(topology: &'a BoardTopology) -> Self {
        Self { topology }
    }

    #[must_use]
    pub fn topology(&self) -> &'a BoardTopology {
        self.topology
    }

    /// Поле проходит жёсткое ограничение: нет соседних 6/8.
    #[must_use]
    pub fn satisfies_hard_constraint(&self, tiles: &[TilePlacement]) -> bool {
        !self.has_adjacent_six_eight(tiles)
    }

    #[must_use]
    pub fn has_adjacent_six_eight(&self, tiles: &[TilePlacement]) -> bool {
        let lookup = self.lookup(tiles);
        tiles.iter().filter(|t| t.is_hot()).any(|tile| {
            self.topology
                .neighbors(tile.tile_id)
                .iter()
                .any(|&n| lookup.get(n).copied().flatten().is_some_and(TilePlacement::is_hot))
        })
    }

    /// Штраф кластеров: для каждой связной группы одинаковой местности
    /// размером больше двух добавляется `размер − 2`.
    #[must_use]
    pub fn same_resource_cluster_penalty(&self, tiles: &[TilePlacement]) -> u32 {
        let lookup = self.lookup(tiles);
        let graph = self.topology.graph();
        let mut visited = vec![false; lookup.len()];
        let mut penalty = 0;

        for start in tiles {
            if start.tile_id >= lookup.len() || visited[start.tile_id] {
                continue;
            }
            let mut size = 0;
            let mut stack = vec![start.tile_id];
            while let Some(tile_id) = stack.pop() {
                if visited[tile_id] {
                    continue;
                }
                visited[tile_id] = true;
                size += 1;

                for neighbor in graph.neighbors(NodeIndex::new(tile_id)) {
                    let n = neighbor.index();
                    if !visited[n] && lookup[n].is_some_and(|p| p.terrain == start.terrain) {
                        stack.push(n);
                    }
                }
            }
            if size > 2 {
                penalty += size - 2;
            }
        }

        penalty
    }

    /// Все перекрёстки поля со значениями.
    #[must_use]
    pub fn intersections(&self, tiles: &[TilePlacement]) -> Vec<Intersection> {
        let lookup = self.lookup(tiles);
        self.topology
            .triangles()
            .iter()
            .map(|&triple| Intersection {
                tiles: triple,
                value: triple
                    .iter()
                    .map(|&id| lookup[id].map_or(0, TilePlacement::pips))
                    .sum(),
            })
            .collect()
    }

    /// Полный отчёт с базовой оценкой.
    #[must_use]
    pub fn metrics(&self, tiles: &[TilePlacement]) -> FairnessMetrics {
        let intersections = self.intersections(tiles);

        let mut pip_totals_by_resource: BTreeMap<Terrain, u32> =
            Terrain::ALL.iter().map(|&t| (t, 0)).collect();
        for tile in tiles.iter().filter(|t| !t.terrain.is_desert()) {
            *pip_totals_by_resource.entry(tile.terrain).or_insert(0) += tile.pips();
        }

        let strongest_intersection = intersections.iter().map(|i| i.value).max().unwrap_or(0);
        let average_intersection_value = if intersections.is_empty() {
            0.0
        } else {
            f64::from(intersections.iter().map(|i| i.value).sum::<u32>())
                / intersections.len() as f64
        };

        let mut top_intersections = intersections;
        top_intersections.sort_by(|a, b| b.value.cmp(&a.value));
        top_intersections.truncate(TOP_INTERSECTIONS);

        let has_adjacent_six_eight = self.has_adjacent_six_eight(tiles);

        let mut score = 0;
        if has_adjacent_six_eight {
            score += ADJACENT_SIX_EIGHT_PENALTY;
        }
        let nonzero = pip_totals_by_resource.values().copied().filter(|&v| v > 0);
        if let (Some(max), Some(min)) = (nonzero.clone().max(), nonzero.min()) {
            score += (max - min) * PIP_SPREAD_WEIGHT;
        }
        score += strongest_intersection.saturating_sub(INTERSECTION_SOFT_LIMIT)
            * INTERSECTION_OVERLOAD_WEIGHT;

        FairnessMetrics {
            pip_totals_by_resource,
            strongest_intersection,
            top_intersections,
            has_adjacent_six_eight,
            average_intersection_value,
            score,
        }
    }

    /// Оценка кандидата с учётом штрафов из `GenerationOptions`.
    #[must_use]
    pub fn score(&self, tiles: &[TilePlacement], options: &GenerationOptions) -> u32 {
        let metrics = self.metrics(tiles);
        let mut score = metrics.score;
        if options.limit_same_resource_adjacency {
            score += self.same_resource_cluster_penalty(tiles) * CLUSTER_PENALTY_WEIGHT;
        }
        if options.max_intersection_value_cap {
            score += metrics
                .strongest_intersection
                .saturating_sub(options.intersection_cap_value)
                * INTERSECTION_CAP_WEIGHT;
        }
        score
    }

    /// Таблица «`tile_id` → назначение»; неизвестные номера отбрасываются.
    fn lookup<'t>(&self, tiles: &'t [TilePlacement]) -> Vec<Option<&'t TilePlacement>> {
        let mut lookup = vec![None; self.topology.len()];
        for tile in tiles {
            if let Some(slot) = lookup.get_mut(tile.tile_id) {
                *slot = Some(tile);
            }
        }
        lookup
    }
}

/// Отчёт о справедливости для готового поля.
///
/// Чистая функция: повторный вызов на тех же данных даёт тот же результат.
#[must_use]
pub fn calculate_fairness_metrics(
    tiles: &[TilePlacement],
    board_size: BoardSize,
) -> FairnessMetrics {
    let topology = BoardTopology::new(board_size);
    FairnessScorer::new(&topology).metrics(tiles)
}

/// Оценка поля с учётом штрафов из `GenerationOptions` (та же, что использует поиск).
#[must_use]
pub fn score_candidate(
    tiles: &[TilePlacement],
    options: &GenerationOptions,
    board_size: BoardSize,
) -> u32 {
    let topology = BoardTopology::new(board_size);
    FairnessScorer::new(&topology).score(tiles, options)
}
