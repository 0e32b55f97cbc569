//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod indicator;
pub mod moves;
pub mod physics;
pub mod poke;
pub mod state;
pub mod tick;

pub use collision::{
    BodyKind, CollisionRegistry, CollisionWorld, Contact, ContactKind, EntityId, Registration,
    resolve_collisions,
};
pub use indicator::DamageIndicator;
pub use moves::{Move, MoveProjectile, MoveRegistry, ProjectileMove, ProjectileSpawn, TimedMove};
pub use physics::{PhysicsObject, Rect};
pub use poke::{ImageHandle, Poke};
pub use state::{IndicatorView, PokeView, ProjectileView, Snapshot, Wall, World};
pub use tick::{RoundOutcome, run_round, tick};
