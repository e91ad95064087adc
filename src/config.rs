use crate::decor::DecorationConfig;
use crate::errors::{ArenaError, ArenaResult};
use crate::layout::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use validator::Validate;

/// Top-level configuration: seed plus the parameters of both passes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ArenaConfig {
    pub seed: u64,
    #[validate(nested)]
    pub generation: GenerationConfig,
    #[validate(nested)]
    pub decoration: DecorationConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            generation: GenerationConfig::default(),
            decoration: DecorationConfig::default(),
        }
    }
}

/// Load and validate a config from a TOML file at an explicit path.
pub fn load_config(path: &Path) -> ArenaResult<ArenaConfig> {
    if !path.exists() {
        return Err(ArenaError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    let config: ArenaConfig = toml::from_str(&contents)?;

    config
        .validate()
        .map_err(|validation_errors| ArenaError::InvalidConfig {
            reason: validation_errors.to_string(),
        })?;

    Ok(config)
}

/// Write a config as pretty TOML to an explicit path.
pub fn save_config(path: &Path, config: &ArenaConfig) -> ArenaResult<()> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let config = ArenaConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: ArenaConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.seed, config.seed);
        assert_eq!(parsed.generation, config.generation);
        assert_eq!(parsed.decoration.kinds.len(), config.decoration.kinds.len());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: ArenaConfig = toml::from_str(
            r#"
            seed = 7

            [generation]
            grid_size = 15
            anchor_count = 2
            "#,
        )
        .unwrap();
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.generation.grid_size, 15);
        assert_eq!(parsed.generation.anchor_count, 2);
        assert_eq!(
            parsed.generation.max_path_attempts,
            GenerationConfig::default().max_path_attempts
        );
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let config = ArenaConfig {
            generation: GenerationConfig {
                grid_size: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = load_config(Path::new("definitely/not/here.toml"));
        assert!(matches!(
            result,
            Err(ArenaError::ConfigFileNotFound { .. })
        ));
    }
}
