// src/topology.rs
//! Геометрия игрового поля
//!
//! Поле — набор гексов в осевых координатах `(q, r)`. Позиции строятся по рядам
//! сверху вниз, каждый ряд центрируется под предыдущим. Номер гекса (`tile_id`)
//! назначается построчно слева направо начиная с нуля; этот порядок — контракт,
//! на который опираются генератор, оценка, гавани и любое сохранённое поле.
//!
//! Смежность хранится в неориентированном графе `petgraph`, где индекс узла
//! совпадает с `tile_id`.

use crate::config::BoardSize;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Шесть осевых направлений; индекс направления — номер стороны гекса (0–5).
pub const AXIAL_DIRECTIONS: [(i32, i32); 6] =
    [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Максимальное число соседей у углового гекса
pub const CORNER_MAX_NEIGHBORS: usize = 3;

/// Неизменяемая позиция гекса на поле
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSlot {
    pub tile_id: usize,
    pub q: i32,
    pub r: i32,
}

/// Тройка попарно смежных гексов (общая вершина трёх гексов)
pub type Triangle = [usize; 3];

/// Проекция осевых координат на плоскость (гекс с острой вершиной вверх, радиус 1).
#[must_use]
pub fn axial_to_pixel(q: f64, r: f64) -> (f64, f64) {
    let x = 3f64.sqrt() * (q + r / 2.0);
    let y = 1.5 * r;
    (x, y)
}

/// Позиции и смежность гексов для одного размера поля
#[derive(Debug, Clone)]
pub struct BoardTopology {
    size: BoardSize,
    slots: Vec<TileSlot>,
    by_coord: HashMap<(i32, i32), usize>,
    graph: UnGraph<u32, ()>,
    neighbors: Vec<Vec<usize>>,
    triangles: Vec<Triangle>,
}

impl BoardTopology {
    /// Строит топологию для заданного размера поля.
    ///
    /// # Panics
    /// Паникует, если построенное число позиций не совпадает с размером поля:
    /// это ошибка в самой раскладке, а не во входных данных.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        let slots = slots_from_rows(size.row_lengths());
        assert_eq!(
            slots.len(),
            size.tile_count(),
            "раскладка {size:?} дала неверное число позиций"
        );

        let by_coord: HashMap<(i32, i32), usize> =
            slots.iter().map(|s| ((s.q, s.r), s.tile_id)).collect();
        assert_eq!(by_coord.len(), slots.len(), "позиции поля пересекаются");

        let mut graph = UnGraph::with_capacity(slots.len(), slots.len() * 3);
        for slot in &slots {
            let node = graph.add_node(slot.tile_id as u32);
            debug_assert_eq!(node.index(), slot.tile_id);
        }

        let mut neighbors = Vec::with_capacity(slots.len());
        for slot in &slots {
            let adjacent: Vec<usize> = AXIAL_DIRECTIONS
                .iter()
                .filter_map(|&(dq, dr)| by_coord.get(&(slot.q + dq, slot.r + dr)).copied())
                .collect();
            for &other in &adjacent {
                if slot.tile_id < other {
                    graph.add_edge(NodeIndex::new(slot.tile_id), NodeIndex::new(other), ());
                }
            }
            neighbors.push(adjacent);
        }

        let mut topology = Self {
            size,
            slots,
            by_coord,
            graph,
            neighbors,
            triangles: Vec::new(),
        };
        topology.triangles = topology.find_triangles();
        topology
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn slots(&self) -> &[TileSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Все номера гексов по порядку.
    pub fn tile_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().map(|s| s.tile_id)
    }

    #[must_use]
    pub fn slot(&self, tile_id: usize) -> Option<&TileSlot> {
        self.slots.get(tile_id)
    }

    #[must_use]
    pub fn slot_at(&self, q: i32, r: i32) -> Option<&TileSlot> {
        self.by_coord.get(&(q, r)).map(|&id| &self.slots[id])
    }

    /// Граф смежности: индекс узла равен `tile_id`.
    #[must_use]
    pub fn graph(&self) -> &UnGraph<u32, ()> {
        &self.graph
    }

    /// Соседи гекса в порядке `AXIAL_DIRECTIONS` (только существующие позиции).
    #[must_use]
    pub fn neighbors(&self, tile_id: usize) -> &[usize] {
        self.neighbors.get(tile_id).map_or(&[], Vec::as_slice)
    }

    /// Сосед через сторону `edge`, если он есть на поле.
    #[must_use]
    pub fn neighbor_across(&self, tile_id: usize, edge: u8) -> Option<usize> {
        let slot = self.slot(tile_id)?;
        let (dq, dr) = *AXIAL_DIRECTIONS.get(usize::from(edge))?;
        self.by_coord.get(&(slot.q + dq, slot.r + dr)).copied()
    }

    #[must_use]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        a < self.len()
            && b < self.len()
            && self.graph.contains_edge(NodeIndex::new(a), NodeIndex::new(b))
    }

    /// Граничный гекс — тот, у которого меньше шести соседей.
    #[must_use]
    pub fn is_boundary(&self, tile_id: usize) -> bool {
        self.neighbors(tile_id).len() < AXIAL_DIRECTIONS.len()
    }

    #[must_use]
    pub fn boundary_tiles(&self) -> Vec<usize> {
        self.tile_ids().filter(|&id| self.is_boundary(id)).collect()
    }

    /// Угловые гексы: не больше `CORNER_MAX_NEIGHBORS` соседей.
    #[must_use]
    pub fn corner_tiles(&self) -> Vec<usize> {
        self.tile_ids()
            .filter(|&id| self.neighbors(id).len() <= CORNER_MAX_NEIGHBORS)
            .collect()
    }

    /// Центр масс поля в осевых координатах.
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.slots.len().max(1) as f64;
        let q = self.slots.iter().map(|s| f64::from(s.q)).sum::<f64>() / n;
        let r = self.slots.iter().map(|s| f64::from(s.r)).sum::<f64>() / n;
        (q, r)
    }

    /// Гексы, ближайшие к центру масс (несколько при равенстве расстояний).
    #[must_use]
    pub fn center_tiles(&self) -> Vec<usize> {
        let (cq, cr) = self.centroid();
        let (cx, cy) = axial_to_pixel(cq, cr);
        let distances: Vec<f64> = self
            .slots
            .iter()
            .map(|s| {
                let (x, y) = axial_to_pixel(f64::from(s.q), f64::from(s.r));
                (x - cx).hypot(y - cy)
            })
            .collect();
        let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
        distances
            .iter()
            .enumerate()
            .filter(|&(_, &d)| (d - nearest).abs() < 1e-9)
            .map(|(id, _)| id)
            .collect()
    }

    /// Все пары (гекс, сторона), за которыми нет соседа.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(usize, u8)> {
        let mut edges = Vec::new();
        for slot in &self.slots {
            for edge in 0..AXIAL_DIRECTIONS.len() as u8 {
                if self.neighbor_across(slot.tile_id, edge).is_none() {
                    edges.push((slot.tile_id, edge));
                }
            }
        }
        edges
    }

    /// Тройки попарно смежных гексов, каждая ровно один раз, номера по возрастанию.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    fn find_triangles(&self) -> Vec<Triangle> {
        let mut seen = HashSet::new();
        let mut triangles = Vec::new();
        for tile_id in self.tile_ids() {
            let adjacent = self.neighbors(tile_id);
            for (i, &a) in adjacent.iter().enumerate() {
                for &b in &adjacent[i + 1..] {
                    if !self.are_adjacent(a, b) {
                        continue;
                    }
                    let mut triple = [tile_id, a, b];
                    triple.sort_unstable();
                    if seen.insert(triple) {
                        triangles.push(triple);
                    }
                }
            }
        }
        triangles
    }
}

/// Раскладывает ряды заданной длины в осевые координаты.
fn slots_from_rows(rows: &[usize]) -> Vec<TileSlot> {
    let mid_row = (rows.len() / 2) as i32;
    let mut slots = Vec::with_capacity(rows.iter().sum());
    let mut tile_id = 0;

    for (ri, &row_len) in rows.iter().enumerate() {
        let r = ri as i32 - mid_row;
        let mut q_start = -(row_len as i32 / 2) - r.div_euclid(2);
        // В семирядной раскладке чётные ряды сдвинуты ещё на шаг влево,
        // иначе ряд 6 гексов не стыкуется с соседними рядами.
        if rows.len() == 7 && ri % 2 == 0 {
            q_start -= 1;
        }
        for ci in 0..row_len as i32 {
            slots.push(TileSlot {
                tile_id,
                q: q_start + ci,
                r,
            });
            tile_id += 1;
        }
    }

    slots
}
