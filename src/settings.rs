//! Match settings
//!
//! Loaded from a JSON file; every field falls back to its default when
//! missing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::MoveRegistry;

/// A character template the roster is drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub name: String,
    /// Sprite key handed to the renderer
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_health")]
    pub health: u32,
    pub moveset: Vec<String>,
}

fn default_size() -> f32 {
    CHAR_SIZE
}

fn default_health() -> u32 {
    CHAR_MAX_HEALTH
}

impl CharacterSpec {
    pub fn new(name: &str, moveset: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            image: name.to_lowercase(),
            size: CHAR_SIZE,
            health: CHAR_MAX_HEALTH,
            moveset: moveset.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Simulation ===
    /// Nominal character speed (pixels per tick)
    pub char_speed: f32,
    /// RNG seed; same seed and settings replay the same match
    pub seed: u64,
    /// Characters drawn into each match
    pub roster_size: usize,
    pub rounds: u32,
    /// A round with no winner by then ends as a timeout
    pub max_ticks_per_round: u64,

    // === Debug ===
    /// Ask the renderer to overlay collision boxes
    pub show_collision_boxes: bool,

    /// Candidate pool
    pub characters: Vec<CharacterSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: WINDOW_WIDTH,
            arena_height: WINDOW_HEIGHT,

            char_speed: CHAR_SPEED,
            seed: 0x5EED,
            roster_size: 4,
            rounds: 1,
            max_ticks_per_round: 20_000,

            show_collision_boxes: false,

            characters: vec![
                CharacterSpec::new("Pikachu", &["Thunderbolt", U_TURN]),
                CharacterSpec::new("Charmander", &["Ember", "Hyper Beam"]),
                CharacterSpec::new("Squirtle", &["Water Gun", U_TURN]),
                CharacterSpec::new("Bulbasaur", &["Vine Whip", "Hyper Beam"]),
                CharacterSpec::new("Eevee", &[U_TURN, "Hyper Beam", "Water Gun"]),
                CharacterSpec {
                    size: 80.0,
                    health: 400,
                    ..CharacterSpec::new("Snorlax", &["Hyper Beam"])
                },
            ],
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check the settings against the move registry before a match starts
    pub fn validate(&self, moves: &MoveRegistry) -> Result<(), SettingsError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "arena must have a positive size, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if self.char_speed <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "char_speed must be positive, got {}",
                self.char_speed
            )));
        }
        if self.roster_size > self.characters.len() {
            return Err(crate::error::RosterError::NotEnoughCharacters {
                requested: self.roster_size,
                available: self.characters.len(),
            }
            .into());
        }
        for spec in &self.characters {
            if spec.size <= 0.0 || spec.health == 0 {
                return Err(SettingsError::Invalid(format!(
                    "{} needs a positive size and health",
                    spec.name
                )));
            }
            if let Some(missing) = spec.moveset.iter().find(|m| !moves.contains(m)) {
                return Err(SettingsError::Invalid(format!(
                    "{} knows {:?}, which is not a registered move",
                    spec.name, missing
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = Settings::default();
        settings.validate(&MoveRegistry::builtin()).unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "seed": 42, "characters": [{ "name": "Ditto", "moveset": [] }] }"#)
                .unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.arena_width, WINDOW_WIDTH);
        assert_eq!(settings.characters[0].size, CHAR_SIZE);
        assert_eq!(settings.characters[0].health, CHAR_MAX_HEALTH);
    }

    #[test]
    fn test_unknown_move_rejected() {
        let mut settings = Settings::default();
        settings.characters[0].moveset.push("Splash".into());
        let err = settings.validate(&MoveRegistry::builtin()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_roster_larger_than_pool_rejected() {
        let settings = Settings {
            roster_size: 7,
            ..Settings::default()
        };
        let err = settings.validate(&MoveRegistry::builtin()).unwrap_err();
        assert!(matches!(err, SettingsError::Roster(_)));
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("poke_arena_settings_{}.json", std::process::id()));
        let settings = Settings {
            seed: 7,
            rounds: 3,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/nonexistent/poke_arena.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
