// src/harbor.rs
//! Автоматическая расстановка гаваней
//!
//! ## Алгоритм
//!
//! 1. Собираются все граничные стороны: пары (гекс, сторона), за которыми нет соседа
//! 2. Для каждой стороны считается опорная точка (центр гекса плюс единичный шаг
//!    в направлении стороны) и её угол относительно центра масс поля, в [0, 360)
//! 3. Ко всем углам прибавляется один случайный поворот, стороны сортируются по
//!    повёрнутому углу
//! 4. Берутся `HARBOR_COUNT` сторон с примерно равным шагом по индексу — это даёт
//!    почти равномерный разброс по периметру при любой форме поля
//! 5. Выбранным сторонам назначается перемешанный набор из 4 гаваней 3:1 и 5 гаваней
//!    2:1; ресурсы для 2:1 берутся из перемешанного списка по кругу
//!
//! Идентификатор гавани кодирует гекс, сторону, тип и ресурс, чтобы интерфейс мог
//! стабильно выделять гавань.

use crate::config::BoardSize;
use crate::terrain::{Terrain, TilePlacement};
use crate::topology::{AXIAL_DIRECTIONS, BoardTopology, axial_to_pixel};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Число гаваней на поле
pub const HARBOR_COUNT: usize = 9;
/// Из них универсальных (3:1)
pub const THREE_TO_ONE_COUNT: usize = 4;
/// Из них специализированных (2:1)
pub const TWO_TO_ONE_COUNT: usize = 5;

/// Тип гавани
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarborKind {
    /// Обмен 3:1 любого ресурса
    #[serde(rename = "3to1")]
    ThreeToOne,
    /// Обмен 2:1 конкретного ресурса
    #[serde(rename = "2to1")]
    TwoToOne,
}

impl HarborKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HarborKind::ThreeToOne => "3to1",
            HarborKind::TwoToOne => "2to1",
        }
    }
}

/// Гавань на внешней стороне граничного гекса
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harbor {
    pub id: String,
    pub kind: HarborKind,
    /// Только для `HarborKind::TwoToOne`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Terrain>,
    pub tile_id: usize,
    /// Номер стороны 0–5 в порядке `AXIAL_DIRECTIONS`
    pub edge: u8,
}

impl Harbor {
    /// Сколько ресурсов отдаётся за один.
    #[must_use]
    pub fn trade_ratio(&self) -> u32 {
        match self.kind {
            HarborKind::ThreeToOne => 3,
            HarborKind::TwoToOne => 2,
        }
    }
}

/// Граничная сторона с углом относительно центра поля
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCandidate {
    pub tile_id: usize,
    pub edge: u8,
    pub angle_deg: f64,
}

/// Расстановщик гаваней для одной топологии
#[derive(Debug, Clone)]
pub struct HarborPlacer {
    candidates: Vec<EdgeCandidate>,
}

impl HarborPlacer {
    #[must_use]
    pub fn new(topology: &BoardTopology) -> Self {
        let (cq, cr) = topology.centroid();
        let (cx, cy) = axial_to_pixel(cq, cr);

        let mut candidates: Vec<EdgeCandidate> = topology
            .boundary_edges()
            .into_iter()
            .filter_map(|(tile_id, edge)| {
                let slot = topology.slot(tile_id)?;
                let (tx, ty) = axial_to_pixel(f64::from(slot.q), f64::from(slot.r));
                let (dq, dr) = AXIAL_DIRECTIONS[usize::from(edge)];
                let (dx, dy) = axial_to_pixel(f64::from(dq), f64::from(dr));
                let len = dx.hypot(dy);
                let (ux, uy) = if len > 0.0 { (dx / len, dy / len) } else { (0.0, 0.0) };

                let angle = (ty + uy - cy).atan2(tx + ux - cx).to_degrees();
                Some(EdgeCandidate {
                    tile_id,
                    edge,
                    angle_deg: if angle < 0.0 { angle + 360.0 } else { angle },
                })
            })
            .collect();
        candidates.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));

        Self { candidates }
    }

    /// Граничные стороны, отсортированные по углу.
    #[must_use]
    pub fn candidates(&self) -> &[EdgeCandidate] {
        &self.candidates
    }

    /// Выбирает до `HARBOR_COUNT` сторон после поворота на `offset_deg`.
    #[must_use]
    pub fn select_edges(&self, offset_deg: f64) -> Vec<EdgeCandidate> {
        let mut rotated: Vec<EdgeCandidate> = self
            .candidates
            .iter()
            .map(|c| EdgeCandidate {
                angle_deg: (c.angle_deg + offset_deg).rem_euclid(360.0),
                ..*c
            })
            .collect();
        rotated.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));

        let step = rotated.len() as f64 / HARBOR_COUNT as f64;
        (0..HARBOR_COUNT)
            .map(|i| (i as f64 * step).round() as usize)
            .filter_map(|index| rotated.get(index).copied())
            .collect()
    }

    pub fn place<R>(&self, rng: &mut R) -> Vec<Harbor>
    where
        R: Rng + ?Sized,
    {
        let offset = rng.gen_range(0.0..360.0);
        let selected = self.select_edges(offset);

        let mut resources = Terrain::RESOURCES.to_vec();
        resources.shuffle(rng);

        let mut kinds: Vec<HarborKind> =
            std::iter::repeat_n(HarborKind::ThreeToOne, THREE_TO_ONE_COUNT)
                .chain(std::iter::repeat_n(HarborKind::TwoToOne, TWO_TO_ONE_COUNT))
                .collect();
        kinds.shuffle(rng);

        tracing::trace!(offset, selected = selected.len(), "placing harbors");

        let mut next_resource = resources.iter().cycle();
        selected
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(i, (edge, kind))| {
                let resource = match kind {
                    HarborKind::ThreeToOne => None,
                    HarborKind::TwoToOne => next_resource.next().copied(),
                };
                let label = resource.map_or("any", Terrain::name);
                Harbor {
                    id: format!(
                        "H-{}-E{}-{}-{}-{}",
                        edge.tile_id,
                        edge.edge,
                        kind.as_str(),
                        label,
                        i
                    ),
                    kind,
                    resource,
                    tile_id: edge.tile_id,
                    edge: edge.edge,
                }
            })
            .collect()
    }
}

/// Расставляет гавани для поля из общего генератора случайных чисел потока.
#[must_use]
pub fn auto_place_harbors(board_size: BoardSize, tiles: &[TilePlacement]) -> Vec<Harbor> {
    auto_place_harbors_with_rng(&mut rand::thread_rng(), board_size, tiles)
}

/// То же, что `auto_place_harbors`, но с явным генератором.
///
/// Расстановка зависит только от геометрии поля; назначение гексов не читается
/// и не изменяется.
pub fn auto_place_harbors_with_rng<R>(
    rng: &mut R,
    board_size: BoardSize,
    tiles: &[TilePlacement],
) -> Vec<Harbor>
where
    R: Rng + ?Sized,
{
    let topology = BoardTopology::new(board_size);
    tracing::trace!(tiles = tiles.len(), size = ?board_size, "auto-placing harbors");
    HarborPlacer::new(&topology).place(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn every_boundary_edge_is_a_candidate() {
        for (size, edges) in [(BoardSize::Standard, 30), (BoardSize::Extended, 38)] {
            let topology = BoardTopology::new(size);
            let placer = HarborPlacer::new(&topology);
            assert_eq!(placer.candidates().len(), edges);
            for pair in placer.candidates().windows(2) {
                assert!(pair[0].angle_deg <= pair[1].angle_deg);
            }
            assert!(
                placer
                    .candidates()
                    .iter()
                    .all(|c| (0.0..360.0).contains(&c.angle_deg))
            );
        }
    }

    #[test]
    fn selection_spreads_nine_distinct_edges() {
        let topology = BoardTopology::new(BoardSize::Standard);
        let placer = HarborPlacer::new(&topology);
        for offset in [0.0, 45.5, 180.0, 359.9] {
            let selected = placer.select_edges(offset);
            assert_eq!(selected.len(), HARBOR_COUNT);
            let unique: HashSet<_> = selected.iter().map(|c| (c.tile_id, c.edge)).collect();
            assert_eq!(unique.len(), HARBOR_COUNT);
        }
    }

    #[test]
    fn harbor_mix_is_four_generic_five_specific() {
        for size in [BoardSize::Standard, BoardSize::Extended] {
            let topology = BoardTopology::new(size);
            let placer = HarborPlacer::new(&topology);
            let mut rng = ChaCha8Rng::seed_from_u64(77);

            for _ in 0..50 {
                let harbors = placer.place(&mut rng);
                assert_eq!(harbors.len(), HARBOR_COUNT);

                let generic: Vec<_> = harbors
                    .iter()
                    .filter(|h| h.kind == HarborKind::ThreeToOne)
                    .collect();
                assert_eq!(generic.len(), THREE_TO_ONE_COUNT);
                assert!(generic.iter().all(|h| h.resource.is_none()));

                let mut resources: Vec<Terrain> =
                    harbors.iter().filter_map(|h| h.resource).collect();
                resources.sort();
                assert_eq!(resources, Terrain::RESOURCES.to_vec());
            }
        }
    }

    #[test]
    fn harbors_face_outward_with_unique_ids() {
        let topology = BoardTopology::new(BoardSize::Extended);
        let placer = HarborPlacer::new(&topology);
        let harbors = placer.place(&mut ChaCha8Rng::seed_from_u64(3));

        let ids: HashSet<_> = harbors.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids.len(), harbors.len());
        for harbor in &harbors {
            assert!(harbor.edge < 6);
            assert!(topology.neighbor_across(harbor.tile_id, harbor.edge).is_none());
            assert!(harbor.id.starts_with(&format!("H-{}-E{}-", harbor.tile_id, harbor.edge)));
            match harbor.kind {
                HarborKind::ThreeToOne => assert!(harbor.id.contains("-3to1-any-")),
                HarborKind::TwoToOne => {
                    let resource = harbor.resource.unwrap();
                    assert!(harbor.id.contains(&format!("-2to1-{resource}-")));
                }
            }
        }
    }

    #[test]
    fn harbor_json_shape() {
        let harbor = Harbor {
            id: "H-0-E2-3to1-any-0".to_string(),
            kind: HarborKind::ThreeToOne,
            resource: None,
            tile_id: 0,
            edge: 2,
        };
        let json = serde_json::to_value(&harbor).unwrap();
        assert_eq!(json["kind"], "3to1");
        assert!(json.get("resource").is_none());
        assert_eq!(harbor.trade_ratio(), 3);
    }

    #[test]
    fn free_function_ignores_tiles() {
        let harbors = auto_place_harbors(BoardSize::Standard, &[]);
        assert_eq!(harbors.len(), HARBOR_COUNT);
    }
}
