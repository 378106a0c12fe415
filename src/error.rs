// src/error.rs
use thiserror::Error;

/// Ошибки загрузки конфигурации генератора
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Файл не найден или не читается
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Недопустимый формат TOML
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
