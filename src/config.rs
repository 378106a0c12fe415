// src/config.rs
//! Конфигурация генерации игрового поля
//!
//! Этот модуль определяет все параметры, управляющие генерацией поля:
//! - Размер поля (стандартное на 19 гексов, расширенное на 30)
//! - Политику размещения пустыни
//! - Опциональные штрафы оценки справедливости
//! - Параметры поиска (число кандидатов, сид, гавани)
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Размер игрового поля
///
/// Определяет набор позиций гексов и их раскладку по рядам.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    /// 19 гексов, ряды 3-4-5-4-3
    #[default]
    Standard,
    /// 30 гексов, ряды 3-4-5-6-5-4-3
    Extended,
}

impl BoardSize {
    /// Длины рядов сверху вниз.
    ///
    /// # Примеры
    /// ```
    /// use hexboard::config::BoardSize;
    /// assert_eq!(BoardSize::Standard.row_lengths(), &[3, 4, 5, 4, 3]);
    /// assert_eq!(BoardSize::Extended.row_lengths().iter().sum::<usize>(), 30);
    /// ```
    #[must_use]
    pub fn row_lengths(self) -> &'static [usize] {
        match self {
            BoardSize::Standard => &[3, 4, 5, 4, 3],
            BoardSize::Extended => &[3, 4, 5, 6, 5, 4, 3],
        }
    }

    /// Общее число гексов на поле.
    #[must_use]
    pub fn tile_count(self) -> usize {
        self.row_lengths().iter().sum()
    }
}

/// Политика размещения пустыни
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DesertPlacement {
    /// Любая позиция поля
    #[default]
    Any,
    /// Только позиции, ближайшие к центру поля
    Center,
    /// Любая позиция, кроме угловых: гексов с не более чем [`CORNER_MAX_NEIGHBORS`] (3)
    /// соседями. Порог «не более двух соседей» на обоих полях ничего бы не исключал,
    /// поэтому здесь угол считается по трём соседям.
    ///
    /// [`CORNER_MAX_NEIGHBORS`]: crate::topology::CORNER_MAX_NEIGHBORS
    NoCorners,
}

/// Параметры одной генерации поля
///
/// Управляют размещением пустыни и дополнительными штрафами оценки.
/// Значения не валидируются: бессмысленный порог просто меняет оценку.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Штрафовать кластеры одинаковых ресурсов (связные группы больше двух гексов)
    #[serde(default = "default_limit_same_resource_adjacency")]
    pub limit_same_resource_adjacency: bool,

    /// Политика размещения пустыни (по умолчанию `Any`)
    #[serde(default)]
    pub desert_placement: DesertPlacement,

    /// Штрафовать перекрёстки сильнее порога `intersection_cap_value`
    #[serde(default = "default_max_intersection_value_cap")]
    pub max_intersection_value_cap: bool,

    /// Порог суммарного веса перекрёстка (в «точках» на жетонах)
    #[serde(default = "default_intersection_cap_value")]
    pub intersection_cap_value: u32,
}

fn default_limit_same_resource_adjacency() -> bool {
    true
}
fn default_max_intersection_value_cap() -> bool {
    true
}
fn default_intersection_cap_value() -> u32 {
    11
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            limit_same_resource_adjacency: true,
            desert_placement: DesertPlacement::Any,
            max_intersection_value_cap: true,
            intersection_cap_value: 11,
        }
    }
}

/// Основные параметры генерации поля
///
/// Полная конфигурация для одного запуска генератора. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGenerationParams {
    /// Сид генератора случайных чисел (`None` — недетерминированная генерация)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Размер поля (по умолчанию `Standard`)
    #[serde(default)]
    pub board_size: BoardSize,

    /// Сколько кандидатов перебирает поиск (по умолчанию 1000)
    #[serde(default = "default_candidate_count")]
    pub candidate_count: u32,

    /// Расставлять ли гавани после генерации (по умолчанию да)
    #[serde(default = "default_place_harbors")]
    pub place_harbors: bool,

    /// Параметры оценки и размещения пустыни
    #[serde(default)]
    pub options: GenerationOptions,
}

impl BoardGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Аргументы
    /// * `path` - путь к файлу конфигурации в формате TOML
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # board.toml
    /// seed = 42
    /// board_size = "extended"
    /// candidate_count = 500
    ///
    /// [options]
    /// desert_placement = "no-corners"
    /// intersection_cap_value = 10
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Разбирает параметры из строки в формате TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(contents)?;
        Ok(params)
    }
}

fn default_candidate_count() -> u32 {
    1000
}
fn default_place_harbors() -> bool {
    true
}

impl Default for BoardGenerationParams {
    fn default() -> Self {
        Self {
            seed: None,
            board_size: BoardSize::Standard,
            candidate_count: 1000,
            place_harbors: true,
            options: GenerationOptions::default(),
        }
    }
}
