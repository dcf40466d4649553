use std::fs;
use std::path::PathBuf;

use fx_engine::AngleMode;
use serde::{Deserialize, Serialize};

/// Persistent shell settings, stored as TOML in the platform config dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Angle unit used by trig evaluation.
    pub mode: AngleMode,
    /// Print the solver's step-by-step narration.
    pub solver_steps: bool,
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            mode: AngleMode::Deg,
            solver_steps: false,
        }
    }
}

impl FxConfig {
    fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fx")
            .join("config.toml")
    }

    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("error parsing {}: {}. Using defaults.", path.display(), e),
                },
                Err(e) => eprintln!("error reading {}: {}. Using defaults.", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = FxConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: FxConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.mode, config.mode);
        assert_eq!(back.solver_steps, config.solver_steps);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: FxConfig = toml::from_str("mode = \"rad\"").unwrap();
        assert_eq!(back.mode, AngleMode::Rad);
        assert!(!back.solver_steps);
    }
}
