//! Floating damage numbers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{INDICATOR_DRIFT, INDICATOR_TTL};

/// Peak opacity reached while fading in
const ALPHA_PEAK: u8 = 230;
/// Opacity floor while fading out
const ALPHA_FLOOR: u8 = 25;

/// "-N" text drifting upward above a character that just took damage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageIndicator {
    pub pos: Vec2,
    pub damage: u32,
    pub ttl: u32,
    pub alpha: u8,
}

impl DamageIndicator {
    pub fn new(pos: Vec2, damage: u32) -> Self {
        Self {
            pos,
            damage,
            ttl: INDICATOR_TTL,
            alpha: 0,
        }
    }

    pub fn text(&self) -> String {
        format!("-{}", self.damage)
    }

    /// Drift up one tick and step the fade schedule
    ///
    /// Fades in by 10 while ttl >= 100, out by 5 once ttl <= 40.
    pub fn advance(&mut self) {
        self.pos.y -= INDICATOR_DRIFT;
        self.ttl = self.ttl.saturating_sub(1);

        if self.ttl >= 100 && self.alpha < ALPHA_PEAK {
            self.alpha += 10;
        } else if self.ttl <= 40 && self.alpha > ALPHA_FLOOR {
            self.alpha -= 5;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.ttl == 0
    }
}
