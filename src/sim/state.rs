//! World state and the renderer read model
//!
//! `World` is the simulation context: it owns every body, the collision
//! registry and the seeded RNG, and is passed explicitly to whatever needs
//! them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{
    BodyKind, CollisionRegistry, CollisionWorld, Contact, ContactKind, EntityId, Registration,
};
use super::moves::{MoveProjectile, ProjectileSpawn};
use super::physics::{PhysicsObject, Rect};
use super::poke::Poke;
use crate::consts::WALL_THICKNESS;
use crate::error::RosterError;
use crate::polar_to_cartesian;
use crate::roster::choose_chars;
use crate::settings::{CharacterSpec, Settings};

/// Static arena boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub body: PhysicsObject,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Legal position envelope (width, height)
    pub arena: Vec2,
    pub char_speed: f32,
    pub show_collision_boxes: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub walls: Vec<Wall>,
    /// Characters (sorted by id for determinism)
    pub pokes: Vec<Poke>,
    /// Moves in flight (sorted by id for determinism)
    pub projectiles: Vec<MoveProjectile>,
    pub registry: CollisionRegistry,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Empty arena enclosed by four registered walls
    pub fn new(settings: &Settings) -> Self {
        let mut world = Self {
            seed: settings.seed,
            arena: Vec2::new(settings.arena_width, settings.arena_height),
            char_speed: settings.char_speed,
            show_collision_boxes: settings.show_collision_boxes,
            time_ticks: 0,
            walls: Vec::new(),
            pokes: Vec::new(),
            projectiles: Vec::new(),
            registry: CollisionRegistry::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
            next_id: 1,
        };
        world.build_walls();
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn build_walls(&mut self) {
        let (w, h, t) = (self.arena.x, self.arena.y, WALL_THICKNESS);
        // Top and bottom span the corners so side walls never overlap them
        let rects = [
            Rect::new(-t, -t, w + 2.0 * t, t),
            Rect::new(-t, h, w + 2.0 * t, t),
            Rect::new(-t, 0.0, t, h),
            Rect::new(w, 0.0, t, h),
        ];
        for rect in rects {
            let id = EntityId(self.next_entity_id());
            let mut body = PhysicsObject::new(Vec2::new(rect.x, rect.y), rect.w, rect.h);
            self.registry.register(id, BodyKind::Wall, &mut body);
            self.walls.push(Wall { id, body });
        }
    }

    /// Add an inert character at `pos`
    pub fn add_poke(&mut self, spec: &CharacterSpec, pos: Vec2) -> EntityId {
        let id = EntityId(self.next_entity_id());
        self.pokes
            .push(Poke::from_spec(id, spec, pos, self.char_speed));
        id
    }

    /// Draw `roster_size` characters from the pool and place them on a ring
    /// around the arena centre
    pub fn spawn_roster(&mut self, settings: &Settings) -> Result<Vec<EntityId>, RosterError> {
        let chosen = choose_chars(&settings.characters, settings.roster_size, &mut self.rng)?;
        let center = self.arena / 2.0;
        let radius = self.arena.min_element() * 0.35;
        let count = chosen.len().max(1) as f32;

        let mut ids = Vec::with_capacity(chosen.len());
        for (i, spec) in chosen.iter().enumerate() {
            let theta = std::f32::consts::TAU * i as f32 / count - std::f32::consts::FRAC_PI_2;
            let pos = center + polar_to_cartesian(radius, theta) - Vec2::splat(spec.size / 2.0);
            let id = self.add_poke(spec, pos);
            log::info!("{} {} joins at {}", spec.name, id, pos);
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn revive_all(&mut self) {
        for poke in &mut self.pokes {
            poke.revive(&mut self.registry, &mut self.rng);
        }
    }

    pub fn poke(&self, id: EntityId) -> Option<&Poke> {
        self.pokes.iter().find(|p| p.id == id)
    }

    pub fn poke_mut(&mut self, id: EntityId) -> Option<&mut Poke> {
        self.pokes.iter_mut().find(|p| p.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.pokes.iter().filter(|p| p.alive).count()
    }

    /// The last one standing, if exactly one is
    pub fn winner(&self) -> Option<&Poke> {
        let mut alive = self.pokes.iter().filter(|p| p.alive);
        match (alive.next(), alive.next()) {
            (Some(poke), None) => Some(poke),
            _ => None,
        }
    }

    /// Turn queued spawns into registered projectiles
    pub fn spawn_projectiles(&mut self, spawns: Vec<ProjectileSpawn>) {
        for spawn in spawns {
            let id = EntityId(self.next_entity_id());
            log::debug!("{} fired {} as {}", spawn.owner, spawn.move_name, id);
            let mut projectile = MoveProjectile::from_spawn(id, spawn);
            self.registry
                .register(id, BodyKind::Move, &mut projectile.body);
            self.projectiles.push(projectile);
        }
    }

    /// Remove spent or expired projectiles, and any whose caster is down
    pub fn cull_projectiles(&mut self) {
        let registry = &mut self.registry;
        let pokes = &self.pokes;
        self.projectiles.retain_mut(|p| {
            let caster_alive = pokes.iter().any(|c| c.id == p.owner && c.alive);
            if p.is_done() || !caster_alive {
                registry.deregister(p.id, &mut p.body);
                false
            } else {
                true
            }
        });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.pokes.sort_by_key(|p| p.id);
        self.projectiles.sort_by_key(|p| p.id);
    }

    /// Read-only view for a renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            show_collision_boxes: self.show_collision_boxes,
            arena: self.arena,
            pokes: self.pokes.iter().filter(|p| p.alive).map(PokeView::from).collect(),
            indicators: self
                .pokes
                .iter()
                .flat_map(|p| {
                    p.damage_indicators.iter().map(|i| IndicatorView {
                        owner: p.id,
                        pos: i.pos,
                        text: i.text(),
                        alpha: i.alpha,
                        ttl: i.ttl,
                    })
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    owner: p.owner,
                    move_name: p.move_name.clone(),
                    collider: p.body.collider(),
                })
                .collect(),
        }
    }
}

impl CollisionWorld for World {
    fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    fn contact(&self, reg: Registration) -> Option<Contact> {
        match reg.kind {
            BodyKind::Wall => self.walls.iter().find(|w| w.id == reg.id).map(|w| Contact {
                id: w.id,
                collider: w.body.collider(),
                kind: ContactKind::Wall,
            }),
            BodyKind::Character => self.poke(reg.id).map(|p| Contact {
                id: p.id,
                collider: p.collider(),
                kind: ContactKind::Character,
            }),
            BodyKind::Move => self
                .projectiles
                .iter()
                .find(|p| p.id == reg.id)
                .map(|p| Contact {
                    id: p.id,
                    collider: p.body.collider(),
                    kind: ContactKind::Move {
                        owner: p.owner,
                        damage: p.damage,
                    },
                }),
        }
    }

    fn react(&mut self, reg: Registration, other: &Contact) {
        let World {
            pokes,
            projectiles,
            registry,
            rng,
            ..
        } = self;

        match reg.kind {
            BodyKind::Wall => {}
            BodyKind::Character => {
                if let Some(poke) = pokes.iter_mut().find(|p| p.id == reg.id) {
                    poke.collide(other, registry, rng);
                }
            }
            BodyKind::Move => {
                if let Some(projectile) = projectiles.iter_mut().find(|p| p.id == reg.id) {
                    projectile.collide(other);
                    // One hit per projectile: leave the rest of this pass
                    if projectile.spent {
                        registry.deregister(projectile.id, &mut projectile.body);
                    }
                }
            }
        }
    }
}

/// Renderer view of a live character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokeView {
    pub id: EntityId,
    pub name: String,
    pub image: String,
    pub pos: Vec2,
    pub size: f32,
    /// Sprite is mirrored while moving right
    pub facing_right: bool,
    pub health_fraction: f32,
    pub health_box: Rect,
    pub collider: Rect,
    pub using_move: Option<String>,
}

impl From<&Poke> for PokeView {
    fn from(poke: &Poke) -> Self {
        Self {
            id: poke.id,
            name: poke.name.clone(),
            image: poke.image.0.clone(),
            pos: poke.pos(),
            size: poke.size,
            facing_right: poke.vel().x > 0.0,
            health_fraction: poke.health_fraction(),
            health_box: poke.health_box(),
            collider: poke.collider(),
            using_move: poke.using_move.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorView {
    pub owner: EntityId,
    pub pos: Vec2,
    pub text: String,
    pub alpha: u8,
    pub ttl: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub owner: EntityId,
    pub move_name: String,
    pub collider: Rect,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub show_collision_boxes: bool,
    pub arena: Vec2,
    pub pokes: Vec<PokeView>,
    pub indicators: Vec<IndicatorView>,
    pub projectiles: Vec<ProjectileView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::resolve_collisions;

    fn world_with_two() -> (World, EntityId, EntityId) {
        let settings = Settings::default();
        let mut world = World::new(&settings);
        let spec = &settings.characters[0];
        let a = world.add_poke(spec, Vec2::new(100.0, 100.0));
        let b = world.add_poke(spec, Vec2::new(400.0, 400.0));
        world.revive_all();
        (world, a, b)
    }

    #[test]
    fn test_new_world_has_walls_only() {
        let world = World::new(&Settings::default());
        assert_eq!(world.walls.len(), 4);
        assert_eq!(world.registry.len(), 4);
        assert!(world.registry.iter().all(|r| r.kind == BodyKind::Wall));
    }

    #[test]
    fn test_spawn_roster_inside_arena() {
        let settings = Settings::default();
        let mut world = World::new(&settings);
        let ids = world.spawn_roster(&settings).unwrap();
        assert_eq!(ids.len(), settings.roster_size);
        assert_eq!(world.alive_count(), 0);
        for poke in &world.pokes {
            let c = poke.collider();
            assert!(c.x >= 0.0 && c.right() <= world.arena.x);
            assert!(c.y >= 0.0 && c.bottom() <= world.arena.y);
        }
        // Pokes start inert: nothing but walls registered
        assert_eq!(world.registry.len(), 4);
    }

    #[test]
    fn test_spawn_roster_too_large() {
        let settings = Settings {
            roster_size: 10,
            ..Settings::default()
        };
        let mut world = World::new(&settings);
        assert!(world.spawn_roster(&settings).is_err());
    }

    #[test]
    fn test_projectile_hit_damages_other_poke() {
        let (mut world, a, b) = world_with_two();
        let target = world.poke(b).unwrap().pos();
        world.spawn_projectiles(vec![ProjectileSpawn {
            owner: a,
            move_name: "Ember".into(),
            pos: target + Vec2::splat(20.0),
            vel: Vec2::ZERO,
            size: 16.0,
            damage: 25,
            ttl: 10,
        }]);

        assert_eq!(resolve_collisions(&mut world), 1);
        let poke = world.poke(b).unwrap();
        assert_eq!(poke.health, poke.max_health - 25);
        assert!(poke.i_frames > 0);
        assert!(world.projectiles[0].spent);

        world.cull_projectiles();
        assert!(world.projectiles.is_empty());
        assert_eq!(world.registry.len(), 6);
    }

    #[test]
    fn test_projectile_hits_only_one_of_two_overlapping_enemies() {
        let settings = Settings::default();
        let mut world = World::new(&settings);
        let spec = &settings.characters[0];
        let a = world.add_poke(spec, Vec2::new(100.0, 100.0));
        let b = world.add_poke(spec, Vec2::new(400.0, 400.0));
        let c = world.add_poke(spec, Vec2::new(470.0, 400.0));
        world.revive_all();

        world.spawn_projectiles(vec![ProjectileSpawn {
            owner: a,
            move_name: "Ember".into(),
            pos: Vec2::new(450.0, 420.0),
            vel: Vec2::ZERO,
            size: 30.0,
            damage: 25,
            ttl: 10,
        }]);
        let projectile = world.projectiles[0].id;

        assert_eq!(resolve_collisions(&mut world), 1);
        let hurt = [b, c]
            .iter()
            .filter(|id| {
                let poke = world.poke(**id).unwrap();
                poke.health < poke.max_health
            })
            .count();
        assert_eq!(hurt, 1);
        assert_eq!(world.poke(b).unwrap().health, 275);
        assert_eq!(world.poke(c).unwrap().health, 300);
        assert!(world.projectiles[0].spent);
        assert!(!world.registry.contains(projectile));
        assert!(!world.projectiles[0].body.checks_collision());
    }

    #[test]
    fn test_projectile_stopped_by_wall_spares_poke_behind_it() {
        let settings = Settings::default();
        let mut world = World::new(&settings);
        let spec = &settings.characters[0];
        let a = world.add_poke(spec, Vec2::new(100.0, 100.0));
        let b = world.add_poke(spec, Vec2::new(930.0, 300.0));
        world.revive_all();

        // Straddles the right wall and b's right edge
        world.spawn_projectiles(vec![ProjectileSpawn {
            owner: a,
            move_name: "Ember".into(),
            pos: Vec2::new(985.0, 310.0),
            vel: Vec2::ZERO,
            size: 30.0,
            damage: 25,
            ttl: 10,
        }]);

        resolve_collisions(&mut world);
        assert!(world.projectiles[0].spent);
        assert_eq!(world.poke(b).unwrap().health, 300);
    }

    #[test]
    fn test_dying_poke_leaves_registry_mid_pass() {
        let (mut world, a, b) = world_with_two();
        world.poke_mut(b).unwrap().health = 10;
        let target = world.poke(b).unwrap().pos();
        world.spawn_projectiles(vec![ProjectileSpawn {
            owner: a,
            move_name: "Hyper Beam".into(),
            pos: target,
            vel: Vec2::ZERO,
            size: 30.0,
            damage: 80,
            ttl: 10,
        }]);

        resolve_collisions(&mut world);
        assert!(!world.poke(b).unwrap().alive);
        assert!(!world.registry.contains(b));
        assert_eq!(world.winner().map(|p| p.id), Some(a));
    }

    #[test]
    fn test_snapshot_lists_live_pokes() {
        let (mut world, a, b) = world_with_two();
        let World {
            pokes, registry, ..
        } = &mut world;
        let victim = pokes.iter_mut().find(|p| p.id == b).unwrap();
        victim.take_damage(500, registry);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.pokes.len(), 1);
        assert_eq!(snapshot.pokes[0].id, a);
        assert_eq!(snapshot.indicators.len(), 1);
        assert_eq!(snapshot.indicators[0].text, "-500");
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"show_collision_boxes\":false"));
    }
}
