// src/candidate.rs
//! Генерация одного случайного кандидата поля
//!
//! Кандидат — полное назначение местности и чисел всем позициям топологии:
//! 1. Списки местности и жетонов строятся из таблиц распределения и независимо перемешиваются
//! 2. Пустыня ставится на случайную позицию, разрешённую политикой `DesertPlacement`
//! 3. Остальная местность раскладывается по оставшимся позициям в порядке `tile_id`
//! 4. Жетоны раскладываются по всем непустынным гексам в том же порядке
//!
//! Никаких ограничений здесь не проверяется: отбор делает `BoardSearch`.

use crate::config::{DesertPlacement, GenerationOptions};
use crate::terrain::{
    Terrain, TilePlacement, expand_distribution, number_distribution, terrain_distribution,
};
use crate::topology::BoardTopology;
use rand::Rng;
use rand::seq::SliceRandom;

/// Генератор кандидатов для одной топологии и набора параметров
///
/// Таблицы и допустимые позиции пустыни вычисляются один раз при создании.
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    topology: &'a BoardTopology,
    terrains: Vec<Terrain>,
    numbers: Vec<u8>,
    desert_slots: Vec<usize>,
}

impl<'a> CandidateGenerator<'a> {
    /// # Panics
    /// Паникует, если таблицы распределения не покрывают топологию ровно:
    /// это ошибка в таблицах, а не во входных данных.
    #[must_use]
    pub fn new(topology: &'a BoardTopology, options: &GenerationOptions) -> Self {
        let size = topology.size();
        let terrains = expand_distribution(&terrain_distribution(size));
        let numbers = expand_distribution(&number_distribution(size));

        let deserts = terrains.iter().filter(|t| t.is_desert()).count();
        assert_eq!(deserts, 1, "в таблице {size:?} должна быть ровно одна пустыня");
        assert_eq!(
            terrains.len(),
            topology.len(),
            "таблица местности {size:?} не совпадает с числом позиций"
        );
        assert_eq!(
            numbers.len(),
            topology.len() - deserts,
            "таблица жетонов {size:?} не совпадает с числом ресурсных гексов"
        );

        Self {
            topology,
            terrains,
            numbers,
            desert_slots: desert_slots(topology, options.desert_placement),
        }
    }

    /// Позиции, на которые может попасть пустыня.
    #[must_use]
    pub fn desert_slots(&self) -> &[usize] {
        &self.desert_slots
    }

    /// Строит одного кандидата, упорядоченного по `tile_id`.
    pub fn generate<R>(&self, rng: &mut R) -> Vec<TilePlacement>
    where
        R: Rng + ?Sized,
    {
        let mut terrains = self.terrains.clone();
        terrains.shuffle(rng);
        let mut numbers = self.numbers.clone();
        numbers.shuffle(rng);

        let desert_tile = self.desert_slots[rng.gen_range(0..self.desert_slots.len())];
        if let Some(pos) = terrains.iter().position(|t| t.is_desert()) {
            terrains.remove(pos);
        }

        let mut remaining_terrains = terrains.into_iter();
        let mut remaining_numbers = numbers.into_iter();
        self.topology
            .tile_ids()
            .map(|tile_id| {
                if tile_id == desert_tile {
                    return TilePlacement::new(tile_id, Terrain::Desert, None);
                }
                let terrain = remaining_terrains.next().unwrap_or(Terrain::Desert);
                let number = if terrain.is_desert() {
                    None
                } else {
                    remaining_numbers.next()
                };
                TilePlacement::new(tile_id, terrain, number)
            })
            .collect()
    }
}

/// Допустимые позиции пустыни; пустой результат политики откатывается ко всем позициям.
fn desert_slots(topology: &BoardTopology, placement: DesertPlacement) -> Vec<usize> {
    let slots: Vec<usize> = match placement {
        DesertPlacement::Any => topology.tile_ids().collect(),
        DesertPlacement::Center => topology.center_tiles(),
        DesertPlacement::NoCorners => {
            let corners = topology.corner_tiles();
            topology
                .tile_ids()
                .filter(|id| !corners.contains(id))
                .collect()
        }
    };

    if slots.is_empty() {
        topology.tile_ids().collect()
    } else {
        slots
    }
}
