//! Poke Arena - a real-time 2D battle simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, characters, moves)
//! - `roster`: Character sampling for a match
//! - `settings`: Data-driven match configuration
//! - `error`: Typed errors surfaced by the simulation and its setup

pub mod error;
pub mod roster;
pub mod settings;
pub mod sim;

pub use error::{RosterError, SettingsError, SimError};
pub use roster::choose_chars;
pub use settings::{CharacterSpec, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (legal position envelope)
    pub const WINDOW_WIDTH: f32 = 1000.0;
    pub const WINDOW_HEIGHT: f32 = 700.0;
    /// Thickness of the boundary walls placed just outside the arena
    pub const WALL_THICKNESS: f32 = 40.0;

    /// Nominal character speed (pixels per tick)
    pub const CHAR_SPEED: f32 = 2.0;
    /// Default character size and health
    pub const CHAR_SIZE: f32 = 60.0;
    pub const CHAR_MAX_HEALTH: u32 = 300;

    /// Move timer: base ticks plus a uniform roll in [1, MOVE_TIMER_JITTER]
    pub const MOVE_TIMER_BASE: u32 = 130;
    pub const MOVE_TIMER_JITTER: u32 = 200;

    /// Invincibility window after being struck by a move
    pub const HIT_IFRAMES: u32 = 180;

    /// Damage indicator lifetime and drift
    pub const INDICATOR_TTL: u32 = 120;
    pub const INDICATOR_DRIFT: f32 = 0.25;

    /// Name of the move whose collisions reverse the caster instead of bouncing
    pub const U_TURN: &str = "U Turn";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, PI / 2.0);
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 10.0).abs() < 0.001);
    }
}
