//! Collision registry and pairwise resolver
//!
//! The registry is an ordered list of every body currently eligible for
//! collision checks. Each tick the resolver walks a snapshot of it, finds
//! overlapping boxes and hands each side of a pair the other's [`Contact`].
//! Bodies may leave the registry mid-pass (a character dying, a projectile
//! being spent); later pairs involving them are skipped.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::physics::{PhysicsObject, Rect};

/// Stable entity identifier (allocated by the world, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category of a collidable body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Wall,
    Move,
    Character,
}

/// What a body sees of the thing it bumped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactKind {
    /// Static obstacle
    Wall,
    /// Move projectile and the character that cast it
    Move { owner: EntityId, damage: u32 },
    /// Another character
    Character,
}

/// The other side of a collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub collider: Rect,
    pub kind: ContactKind,
}

/// A registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: EntityId,
    pub kind: BodyKind,
}

/// Ordered set of bodies that take part in collision checks
///
/// A body is present iff its `checks_collision` flag is set; registering and
/// deregistering keep the two in step.
#[derive(Debug, Clone, Default)]
pub struct CollisionRegistry {
    entries: Vec<Registration>,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt a body in. Registering twice is a no-op.
    pub fn register(&mut self, id: EntityId, kind: BodyKind, body: &mut PhysicsObject) {
        body.checks_collision = true;
        if !self.contains(id) {
            self.entries.push(Registration { id, kind });
        }
    }

    /// Opt a body out. Returns whether it was registered.
    pub fn deregister(&mut self, id: EntityId, body: &mut PhysicsObject) -> bool {
        body.checks_collision = false;
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    /// Copy of the current entries, safe to walk while the registry changes
    pub fn snapshot(&self) -> Vec<Registration> {
        self.entries.clone()
    }
}

/// Owner of the bodies named in a registry
pub trait CollisionWorld {
    fn registry(&self) -> &CollisionRegistry;

    /// Current contact description of a registered body, if it still exists
    fn contact(&self, reg: Registration) -> Option<Contact>;

    /// Let `reg` react to touching `other`
    fn react(&mut self, reg: Registration, other: &Contact);
}

/// Run one collision pass; returns the number of overlapping pairs handled
///
/// Every unordered pair of registered bodies is checked once (O(n²)). When
/// the boxes overlap both sides react, `a` first. Wall/wall pairs are never
/// reported.
pub fn resolve_collisions<W: CollisionWorld>(world: &mut W) -> usize {
    let snapshot = world.registry().snapshot();
    let mut pairs = 0;

    for (i, &a) in snapshot.iter().enumerate() {
        for &b in &snapshot[i + 1..] {
            if a.kind == BodyKind::Wall && b.kind == BodyKind::Wall {
                continue;
            }
            if !world.registry().contains(a.id) || !world.registry().contains(b.id) {
                continue;
            }
            let (Some(contact_a), Some(contact_b)) = (world.contact(a), world.contact(b)) else {
                continue;
            };
            if !contact_a.collider.overlaps(&contact_b.collider) {
                continue;
            }

            world.react(a, &contact_b);
            world.react(b, &contact_a);
            pairs += 1;
        }
    }

    pairs
}
