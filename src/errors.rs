use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    // Config-related errors
    #[error("Failed to read config file: {0}")]
    ConfigReadFailed(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type alias for all operations
pub type ArenaResult<T> = Result<T, ArenaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_error_display() {
        let err = ArenaError::InvalidConfig {
            reason: "grid_size out of range".to_string(),
        };
        assert!(err.to_string().contains("Invalid configuration"));

        let err = ArenaError::ConfigFileNotFound {
            path: PathBuf::from("arena.toml"),
        };
        assert!(err.to_string().contains("arena.toml"));
    }
}
