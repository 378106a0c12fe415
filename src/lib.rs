pub mod board;
pub mod candidate;
pub mod config;
pub mod error;
pub mod fairness;
pub mod harbor;
pub mod search;
pub mod terrain;
pub mod topology;
pub mod validation;

pub use board::{GeneratedBoard, generate_board, generate_boards, generate_seeded_board};
pub use config::{BoardGenerationParams, BoardSize, DesertPlacement, GenerationOptions};
pub use error::ConfigError;
pub use fairness::{FairnessMetrics, FairnessScorer, Intersection, calculate_fairness_metrics};
pub use harbor::{Harbor, HarborKind, auto_place_harbors, auto_place_harbors_with_rng};
pub use search::{BoardSearch, SearchOutcome, SearchResult, generate_map, generate_map_with_rng};
pub use terrain::{Terrain, TilePlacement};
pub use topology::{BoardTopology, TileSlot};
