//! Poke: the autonomous battling character
//!
//! A Poke is built once per match and starts inert (dead, detached from the
//! collision registry). `revive` puts it in play; running out of health
//! kills it again, but the instance stays around to be revived next round.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::collision::{BodyKind, CollisionRegistry, Contact, ContactKind, EntityId};
use super::indicator::DamageIndicator;
use super::moves::{MoveRegistry, ProjectileSpawn};
use super::physics::{PhysicsObject, Rect};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::CharacterSpec;

/// Renderer-owned sprite key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageHandle(pub String);

/// Health bar geometry, relative to the body's top-left corner
const HEALTH_BAR_WIDTH: f32 = 50.0;
const HEALTH_BAR_HEIGHT: f32 = 10.0;
const HEALTH_BAR_OFFSET_Y: f32 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poke {
    pub id: EntityId,
    pub name: String,
    pub body: PhysicsObject,
    pub alive: bool,
    pub health: u32,
    pub max_health: u32,
    pub moveset: Vec<String>,
    pub image: ImageHandle,
    /// Spawn point, fixed at construction
    pub starting_pos: Vec2,
    pub size: f32,
    /// Velocity magnitude the character is held to every tick
    pub speed: f32,
    base_speed: f32,
    /// Ticks until the next move-cast decision
    pub move_timer: u32,
    pub using_move: Option<String>,
    pub using_move_timer: u32,
    /// Set for the first tick of a cast, while the move's effect runs
    pub cast_starting: bool,
    /// Invincibility ticks left after being hit
    pub i_frames: u32,
    pub damage_indicators: Vec<DamageIndicator>,
}

impl Poke {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        pos: Vec2,
        size: f32,
        max_health: u32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            body: PhysicsObject::new(pos, size, size),
            alive: false,
            health: 0,
            max_health,
            moveset: Vec::new(),
            image: ImageHandle::default(),
            starting_pos: pos,
            size,
            speed,
            base_speed: speed,
            move_timer: MOVE_TIMER_BASE,
            using_move: None,
            using_move_timer: 0,
            cast_starting: false,
            i_frames: 0,
            damage_indicators: Vec::new(),
        }
    }

    pub fn from_spec(id: EntityId, spec: &CharacterSpec, pos: Vec2, speed: f32) -> Self {
        let mut poke = Self::new(id, spec.name.clone(), pos, spec.size, spec.health, speed);
        poke.moveset = spec.moveset.clone();
        poke.image = ImageHandle(spec.image.clone());
        poke
    }

    pub fn with_moveset<S: Into<String>>(mut self, moves: impl IntoIterator<Item = S>) -> Self {
        self.moveset = moves.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    pub fn collider(&self) -> Rect {
        self.body.collider()
    }

    /// Health bar background rect (display only)
    pub fn health_box(&self) -> Rect {
        Rect::new(
            self.body.pos.x + self.size / 2.0 - HEALTH_BAR_WIDTH / 2.0,
            self.body.pos.y + HEALTH_BAR_OFFSET_Y,
            HEALTH_BAR_WIDTH,
            HEALTH_BAR_HEIGHT,
        )
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Full reset: health, timers, spawn point, heading, and collision opt-in
    pub fn revive<R: Rng>(&mut self, registry: &mut CollisionRegistry, rng: &mut R) {
        self.health = self.max_health;
        self.speed = self.base_speed;
        self.vel_start(rng);
        self.alive = true;
        registry.register(self.id, BodyKind::Character, &mut self.body);
        self.move_timer = roll_move_timer(rng);
        self.using_move_timer = 0;
        self.using_move = None;
        self.cast_starting = false;
        self.i_frames = 0;
        self.body.pos = self.starting_pos;
        log::info!("{} {} revived at {}", self.name, self.id, self.starting_pos);
    }

    pub fn kill(&mut self, registry: &mut CollisionRegistry) {
        self.alive = false;
        registry.deregister(self.id, &mut self.body);
        log::info!("{} {} fainted", self.name, self.id);
    }

    pub fn take_damage(&mut self, damage: u32, registry: &mut CollisionRegistry) {
        self.health = self.health.saturating_sub(damage);
        self.damage_indicators
            .push(DamageIndicator::new(self.body.pos, damage));

        if self.health == 0 {
            self.kill(registry);
        }
    }

    /// Pick a fresh heading
    ///
    /// Horizontal component is a uniform [-1, 1] draw rounded to -1, 0 or 1;
    /// the vertical one takes whatever is left of unit length, with a random
    /// sign. Headings are axis-aligned, never an arbitrary angle.
    pub fn vel_start<R: Rng>(&mut self, rng: &mut R) {
        let x = rng.random_range(-1.0f32..=1.0).round_ties_even();
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.body.vel = Vec2::new(x * self.speed, (1.0 - x.abs()) * self.speed * sign);
    }

    /// One simulation step; a no-op while dead
    pub fn update<R: Rng>(
        &mut self,
        arena: Vec2,
        moves: &MoveRegistry,
        spawns: &mut Vec<ProjectileSpawn>,
        rng: &mut R,
    ) -> Result<(), SimError> {
        if !self.alive {
            return Ok(());
        }

        // Repeated bounces drift the magnitude; pin it back to speed
        if self.body.vel != Vec2::ZERO {
            self.body.vel = self.body.vel.normalize() * self.speed;
        }
        self.body.update();

        self.i_frames = self.i_frames.saturating_sub(1);

        if self.body.pos.x > arena.x || self.body.pos.x < 0.0 {
            log::warn!("{} {} left the arena on the x axis at {}", self.name, self.id, self.body.pos.x);
            self.body.pos.x = (arena.x / 2.0).floor();
        }
        if self.body.pos.y > arena.y || self.body.pos.y < 0.0 {
            log::warn!("{} {} left the arena on the y axis at {}", self.name, self.id, self.body.pos.y);
            self.body.pos.y = (arena.y / 2.0).floor();
        }

        self.use_move(moves, spawns, rng)
    }

    fn use_move<R: Rng>(
        &mut self,
        moves: &MoveRegistry,
        spawns: &mut Vec<ProjectileSpawn>,
        rng: &mut R,
    ) -> Result<(), SimError> {
        if self.move_timer == 0 {
            self.move_timer = roll_move_timer(rng);
            self.vel_start(rng);
            self.using_move = self.moveset.choose(rng).cloned();
            self.cast_starting = self.using_move.is_some();
            log::debug!("{} {} chose {:?}", self.name, self.id, self.using_move);
        } else {
            self.move_timer -= 1;
        }

        let Some(name) = self.using_move.as_deref() else {
            return Ok(());
        };
        let active = moves.get(name).ok_or_else(|| SimError::UnknownMove {
            poke: self.name.clone(),
            name: name.to_string(),
        })?;

        if self.using_move_timer == 0 {
            self.using_move_timer = active.using_time();
            self.cast_starting = true;
        }
        active.use_move(self, spawns);
        self.cast_starting = false;
        Ok(())
    }

    /// React to touching `other`
    pub fn collide<R: Rng>(
        &mut self,
        other: &Contact,
        registry: &mut CollisionRegistry,
        rng: &mut R,
    ) {
        if let ContactKind::Move { owner, damage } = other.kind {
            if self.i_frames == 0 && owner != self.id {
                self.take_damage(damage, registry);
                self.i_frames = HIT_IFRAMES;
            }
            return;
        }

        if self.using_move.as_deref() == Some(U_TURN) {
            self.body.vel = -self.body.vel;
            return;
        }

        // One in three contacts throws the character off on a new heading
        if rng.random_range(0..3) == 0 {
            self.vel_start(rng);
            return;
        }

        self.bounce(&other.collider);
    }

    /// Push out of `other` along the separating axis and reflect off it
    ///
    /// The axis is picked from the offset between our centre and the centre
    /// of the overlap: a larger horizontal offset means side contact. The
    /// perpendicular velocity keeps its sign and is rescaled so the result
    /// stays close to the current speed.
    pub fn bounce(&mut self, other: &Rect) {
        let own = self.body.collider();
        let contact = own.clip(other);
        let diff = own.center() - contact.center();

        let speed = self.body.vel.length();
        if speed == 0.0 {
            return;
        }
        let direction = self.body.vel / speed;
        let vel = &mut self.body.vel;

        if diff.x.abs() < diff.y.abs() {
            if diff.y > 0.0 {
                // Obstacle above
                self.body.pos.y += contact.h;
                vel.y = vel.y.abs();
            } else {
                self.body.pos.y -= contact.h;
                vel.y = -vel.y.abs();
            }
            vel.x = signum_or_positive(vel.x) * speed * rescale_factor(direction.y);
        } else {
            if diff.x > 0.0 {
                // Obstacle to the left
                self.body.pos.x += contact.w;
                vel.x = vel.x.abs();
            } else {
                self.body.pos.x -= contact.w;
                vel.x = -vel.x.abs();
            }
            vel.y = signum_or_positive(vel.y) * speed * rescale_factor(direction.x);
        }
    }

    /// Step damage indicators and drop the expired ones
    pub fn age_indicators(&mut self) {
        for indicator in &mut self.damage_indicators {
            indicator.advance();
        }
        self.damage_indicators.retain(|i| !i.is_expired());
    }
}

fn roll_move_timer<R: Rng>(rng: &mut R) -> u32 {
    MOVE_TIMER_BASE + rng.random_range(1..=MOVE_TIMER_JITTER)
}

/// `1 - |component|`, rounded to three decimals (ties to even)
#[inline]
fn rescale_factor(component: f32) -> f32 {
    ((1.0 - component.abs()) * 1000.0).round_ties_even() / 1000.0
}

/// -1 for negative values, +1 otherwise (zero counts as positive)
#[inline]
fn signum_or_positive(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
