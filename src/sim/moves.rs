//! Move registry and move projectiles
//!
//! A move is looked up by name every tick a Poke is casting it. Its
//! `use_move` runs once per tick for the whole cast and is responsible for
//! counting the cast down and clearing `using_move` at the end. Moves that
//! fire something queue a [`ProjectileSpawn`]; the world turns those into
//! registered [`MoveProjectile`]s after the character pass.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, ContactKind, EntityId};
use super::physics::PhysicsObject;
use super::poke::Poke;
use crate::consts::U_TURN;

/// A castable move
pub trait Move {
    /// Cast duration in ticks
    fn using_time(&self) -> u32;

    /// Per-tick effect while `poke` is casting this move
    fn use_move(&self, poke: &mut Poke, spawns: &mut Vec<ProjectileSpawn>);
}

/// Count one tick of the active cast down, ending it at zero
pub fn finish_cast_tick(poke: &mut Poke) {
    poke.using_move_timer = poke.using_move_timer.saturating_sub(1);
    if poke.using_move_timer == 0 {
        poke.using_move = None;
    }
}

/// A cast with no effect of its own beyond occupying the caster
#[derive(Debug, Clone, Copy)]
pub struct TimedMove {
    using_time: u32,
}

impl TimedMove {
    pub fn new(using_time: u32) -> Self {
        Self { using_time }
    }
}

impl Move for TimedMove {
    fn using_time(&self) -> u32 {
        self.using_time
    }

    fn use_move(&self, poke: &mut Poke, _spawns: &mut Vec<ProjectileSpawn>) {
        finish_cast_tick(poke);
    }
}

/// Fires one projectile along the caster's heading when the cast starts
#[derive(Debug, Clone, Copy)]
pub struct ProjectileMove {
    using_time: u32,
    damage: u32,
    speed: f32,
    size: f32,
    ttl: u32,
}

impl ProjectileMove {
    pub fn new(using_time: u32, damage: u32, speed: f32, size: f32, ttl: u32) -> Self {
        Self {
            using_time,
            damage,
            speed,
            size,
            ttl,
        }
    }
}

impl Move for ProjectileMove {
    fn using_time(&self) -> u32 {
        self.using_time
    }

    fn use_move(&self, poke: &mut Poke, spawns: &mut Vec<ProjectileSpawn>) {
        let heading = poke.vel().normalize_or_zero();
        if poke.cast_starting && heading != Vec2::ZERO {
            let center = poke.collider().center();
            spawns.push(ProjectileSpawn {
                owner: poke.id,
                move_name: poke.using_move.clone().unwrap_or_default(),
                pos: center - Vec2::splat(self.size / 2.0),
                vel: heading * self.speed,
                size: self.size,
                damage: self.damage,
                ttl: self.ttl,
            });
        }
        finish_cast_tick(poke);
    }
}

/// Name -> move lookup
#[derive(Default)]
pub struct MoveRegistry {
    moves: HashMap<String, Box<dyn Move>>,
}

impl fmt::Debug for MoveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveRegistry")
            .field("moves", &self.names())
            .finish()
    }
}

impl MoveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference move set used by the default roster
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(U_TURN, TimedMove::new(60));
        registry.register("Thunderbolt", ProjectileMove::new(40, 40, 6.0, 20.0, 120));
        registry.register("Ember", ProjectileMove::new(30, 25, 5.0, 16.0, 150));
        registry.register("Water Gun", ProjectileMove::new(45, 30, 5.0, 18.0, 150));
        registry.register("Vine Whip", ProjectileMove::new(35, 30, 7.0, 14.0, 60));
        registry.register("Hyper Beam", ProjectileMove::new(90, 80, 4.0, 30.0, 200));
        registry
    }

    /// Add or replace a move
    pub fn register(&mut self, name: impl Into<String>, mv: impl Move + 'static) {
        self.moves.insert(name.into(), Box::new(mv));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Move> {
        self.moves.get(name).map(|m| m.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.moves.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.moves.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Deferred projectile creation
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub owner: EntityId,
    pub move_name: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: u32,
    pub ttl: u32,
}

/// A move in flight; collidable like any other body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveProjectile {
    pub id: EntityId,
    /// Caster; never damaged by its own projectile
    pub owner: EntityId,
    pub move_name: String,
    pub body: PhysicsObject,
    pub damage: u32,
    pub ttl: u32,
    /// Hit something and should be removed
    pub spent: bool,
}

impl MoveProjectile {
    pub fn from_spawn(id: EntityId, spawn: ProjectileSpawn) -> Self {
        let mut body = PhysicsObject::new(spawn.pos, spawn.size, spawn.size);
        body.vel = spawn.vel;
        Self {
            id,
            owner: spawn.owner,
            move_name: spawn.move_name,
            body,
            damage: spawn.damage,
            ttl: spawn.ttl,
            spent: false,
        }
    }

    pub fn advance(&mut self) {
        self.body.update();
        self.ttl = self.ttl.saturating_sub(1);
    }

    pub fn collide(&mut self, other: &Contact) {
        match other.kind {
            ContactKind::Wall => self.spent = true,
            ContactKind::Character if other.id != self.owner => self.spent = true,
            _ => {}
        }
    }

    pub fn is_done(&self) -> bool {
        self.spent || self.ttl == 0
    }
}
