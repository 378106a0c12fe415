// src/terrain.rs
//! Типы местности, жетоны чисел и таблицы распределения
//!
//! Стандартные таблицы описывают классическое поле на 19 гексов. Для расширенного поля
//! базовые количества масштабируются коэффициентом 30/19 и подгоняются до ровно
//! 29 ресурсных гексов (плюс одна пустыня) методом наибольшего остатка.

use crate::config::BoardSize;
use serde::{Deserialize, Serialize};

/// Тип местности гекса
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Wood,
    Wool,
    Grain,
    Brick,
    Ore,
    Desert,
}

impl Terrain {
    /// Все типы местности в порядке таблицы распределения
    pub const ALL: [Terrain; 6] = [
        Terrain::Wood,
        Terrain::Wool,
        Terrain::Grain,
        Terrain::Brick,
        Terrain::Ore,
        Terrain::Desert,
    ];

    /// Пять производящих ресурсов (всё, кроме пустыни)
    pub const RESOURCES: [Terrain; 5] = [
        Terrain::Wood,
        Terrain::Wool,
        Terrain::Grain,
        Terrain::Brick,
        Terrain::Ore,
    ];

    #[must_use]
    pub fn is_desert(self) -> bool {
        self == Terrain::Desert
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Terrain::Wood => "Wood",
            Terrain::Wool => "Wool",
            Terrain::Grain => "Grain",
            Terrain::Brick => "Brick",
            Terrain::Ore => "Ore",
            Terrain::Desert => "Desert",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Назначение местности и числа одной позиции поля
///
/// `number` отсутствует ровно тогда, когда `terrain` — пустыня.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    pub tile_id: usize,
    pub terrain: Terrain,
    pub number: Option<u8>,
}

impl TilePlacement {
    #[must_use]
    pub fn new(tile_id: usize, terrain: Terrain, number: Option<u8>) -> Self {
        Self {
            tile_id,
            terrain,
            number,
        }
    }

    /// Вес числа жетона этого гекса (0 для пустыни)
    #[must_use]
    pub fn pips(&self) -> u32 {
        self.number.map_or(0, pip_weight)
    }

    /// Стоит ли на гексе «горячее» число 6 или 8
    #[must_use]
    pub fn is_hot(&self) -> bool {
        matches!(self.number, Some(6 | 8))
    }
}

/// Числа, допустимые на жетонах (семёрки нет)
pub const NUMBER_TOKENS: [u8; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

/// Стандартная таблица местности: (тип, количество), всего 19
pub const STANDARD_TERRAIN_DISTRIBUTION: [(Terrain, usize); 6] = [
    (Terrain::Wood, 4),
    (Terrain::Wool, 4),
    (Terrain::Grain, 4),
    (Terrain::Brick, 3),
    (Terrain::Ore, 3),
    (Terrain::Desert, 1),
];

/// Стандартная таблица жетонов: (число, количество), всего 18
pub const STANDARD_NUMBER_DISTRIBUTION: [(u8, usize); 10] = [
    (2, 1),
    (3, 2),
    (4, 2),
    (5, 2),
    (6, 2),
    (8, 2),
    (9, 2),
    (10, 2),
    (11, 2),
    (12, 1),
];

/// Коэффициент масштабирования для расширенного поля
const EXTENDED_SCALE: f64 = 30.0 / 19.0;

/// Число ресурсных гексов (и жетонов) на расширенном поле
const EXTENDED_RESOURCE_TILES: usize = 29;

/// Вес числа в «точках»: 2/12→1, 3/11→2, 4/10→3, 5/9→4, 6/8→5.
///
/// # Примеры
/// ```
/// use hexboard::terrain::pip_weight;
/// assert_eq!(pip_weight(6), 5);
/// assert_eq!(pip_weight(12), 1);
/// assert_eq!(pip_weight(7), 0);
/// ```
#[must_use]
pub fn pip_weight(number: u8) -> u32 {
    match number {
        2 | 12 => 1,
        3 | 11 => 2,
        4 | 10 => 3,
        5 | 9 => 4,
        6 | 8 => 5,
        _ => 0,
    }
}

/// Таблица местности для размера поля, включая ровно одну пустыню.
#[must_use]
pub fn terrain_distribution(size: BoardSize) -> Vec<(Terrain, usize)> {
    match size {
        BoardSize::Standard => STANDARD_TERRAIN_DISTRIBUTION.to_vec(),
        BoardSize::Extended => {
            let resources: Vec<(Terrain, usize)> = STANDARD_TERRAIN_DISTRIBUTION
                .iter()
                .copied()
                .filter(|(terrain, _)| !terrain.is_desert())
                .collect();
            let mut scaled = scale_counts(&resources, EXTENDED_RESOURCE_TILES);
            scaled.push((Terrain::Desert, 1));
            scaled
        }
    }
}

/// Таблица жетонов для размера поля.
#[must_use]
pub fn number_distribution(size: BoardSize) -> Vec<(u8, usize)> {
    match size {
        BoardSize::Standard => STANDARD_NUMBER_DISTRIBUTION.to_vec(),
        BoardSize::Extended => {
            scale_counts(&STANDARD_NUMBER_DISTRIBUTION, EXTENDED_RESOURCE_TILES)
        }
    }
}

/// Раскрывает таблицу в неперемешанный список значений.
#[must_use]
pub fn expand_distribution<T: Copy>(table: &[(T, usize)]) -> Vec<T> {
    table
        .iter()
        .flat_map(|&(value, count)| std::iter::repeat_n(value, count))
        .collect()
}

/// Масштабирует количества на 30/19, округляет и подгоняет сумму до `target`.
///
/// Недостача добавляется туда, где округление потеряло больше всего, излишек снимается
/// там, где округление добавило больше всего. При равенстве выигрывает порядок таблицы.
fn scale_counts<T: Copy>(base: &[(T, usize)], target: usize) -> Vec<(T, usize)> {
    let exact: Vec<f64> = base
        .iter()
        .map(|&(_, count)| count as f64 * EXTENDED_SCALE)
        .collect();
    let mut counts: Vec<usize> = exact.iter().map(|v| v.round() as usize).collect();

    let mut total: usize = counts.iter().sum();
    while total < target {
        let mut best = 0;
        for i in 1..counts.len() {
            if exact[i] - counts[i] as f64 > exact[best] - counts[best] as f64 {
                best = i;
            }
        }
        counts[best] += 1;
        total += 1;
    }
    while total > target {
        let mut worst: Option<usize> = None;
        for i in 0..counts.len() {
            if counts[i] == 0 {
                continue;
            }
            let loss = exact[i] - counts[i] as f64;
            if worst.is_none_or(|w| loss < exact[w] - counts[w] as f64) {
                worst = Some(i);
            }
        }
        let Some(worst) = worst else { break };
        counts[worst] -= 1;
        total -= 1;
    }

    base.iter()
        .zip(counts)
        .map(|(&(value, _), count)| (value, count))
        .collect()
}
