//! Fixed timestep simulation tick
//!
//! Core loop that advances the world one step deterministically.

use super::collision::{EntityId, resolve_collisions};
use super::moves::MoveRegistry;
use super::state::World;
use crate::error::SimError;

/// How a round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Exactly one character left standing
    Winner { id: EntityId, name: String },
    /// Everyone went down in the same tick
    Draw,
    /// Tick limit reached with several characters still alive
    Timeout { alive: usize },
}

/// Advance the world by one tick
///
/// Order: projectiles move, collisions resolve, characters update (which
/// queues new projectiles), queued projectiles enter the world, damage
/// indicators age, finished projectiles leave.
pub fn tick(world: &mut World, moves: &MoveRegistry) -> Result<(), SimError> {
    for projectile in &mut world.projectiles {
        projectile.advance();
    }

    resolve_collisions(world);

    let mut spawns = Vec::new();
    let arena = world.arena;
    for poke in &mut world.pokes {
        poke.update(arena, moves, &mut spawns, &mut world.rng)?;
    }
    world.spawn_projectiles(spawns);

    // Dead characters keep fading out their last indicators
    for poke in &mut world.pokes {
        poke.age_indicators();
    }
    world.cull_projectiles();

    world.time_ticks += 1;

    // Ensure deterministic ordering
    world.normalize_order();
    Ok(())
}

/// Revive everyone and tick until at most one is standing or `max_ticks`
/// elapse
pub fn run_round(
    world: &mut World,
    moves: &MoveRegistry,
    max_ticks: u64,
) -> Result<RoundOutcome, SimError> {
    world.revive_all();

    for _ in 0..max_ticks {
        if world.alive_count() <= 1 {
            break;
        }
        tick(world, moves)?;
    }

    let outcome = match world.alive_count() {
        0 => RoundOutcome::Draw,
        1 => match world.winner() {
            Some(poke) => RoundOutcome::Winner {
                id: poke.id,
                name: poke.name.clone(),
            },
            None => RoundOutcome::Draw,
        },
        alive => RoundOutcome::Timeout { alive },
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::physics::Rect;
    use glam::Vec2;

    fn started(seed: u64) -> (World, MoveRegistry) {
        let settings = Settings {
            seed,
            ..Settings::default()
        };
        let mut world = World::new(&settings);
        world.spawn_roster(&settings).unwrap();
        world.revive_all();
        (world, MoveRegistry::builtin())
    }

    #[test]
    fn test_tick_advances_and_keeps_speed() {
        let (mut world, moves) = started(1);
        tick(&mut world, &moves).unwrap();
        assert_eq!(world.time_ticks, 1);
        for poke in &world.pokes {
            assert!((poke.vel().length() - poke.speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pokes_stay_in_arena() {
        let (mut world, moves) = started(2);
        let arena = Rect::new(0.0, 0.0, world.arena.x, world.arena.y);
        for _ in 0..2000 {
            tick(&mut world, &moves).unwrap();
            for poke in world.pokes.iter().filter(|p| p.alive) {
                let pos = poke.pos();
                assert!(pos.x >= arena.x && pos.x <= arena.right());
                assert!(pos.y >= arena.y && pos.y <= arena.bottom());
            }
        }
    }

    #[test]
    fn test_registry_matches_flags() {
        let (mut world, moves) = started(3);
        for _ in 0..1500 {
            tick(&mut world, &moves).unwrap();
            for poke in &world.pokes {
                assert_eq!(world.registry.contains(poke.id), poke.body.checks_collision());
                assert_eq!(poke.alive, poke.body.checks_collision());
            }
            for projectile in &world.projectiles {
                assert!(world.registry.contains(projectile.id));
            }
        }
    }

    #[test]
    fn test_unknown_move_aborts_tick() {
        let (mut world, moves) = started(4);
        world.pokes[0].using_move = Some("Splash".into());
        assert!(matches!(
            tick(&mut world, &moves),
            Err(SimError::UnknownMove { .. })
        ));
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed must produce identical results
        let (mut world1, moves) = started(99999);
        let (mut world2, _) = started(99999);

        for _ in 0..500 {
            tick(&mut world1, &moves).unwrap();
            tick(&mut world2, &moves).unwrap();
        }

        for (a, b) in world1.pokes.iter().zip(&world2.pokes) {
            assert_eq!(a.pos(), b.pos());
            assert_eq!(a.health, b.health);
        }
        assert_eq!(world1.projectiles.len(), world2.projectiles.len());
    }

    #[test]
    fn test_round_revives_reused_containers() {
        let (mut world, moves) = started(5);
        run_round(&mut world, &moves, 200).unwrap();

        for poke in &mut world.pokes {
            poke.body.pos = Vec2::new(1.0, 1.0);
        }
        run_round(&mut world, &moves, 0).unwrap();
        assert_eq!(world.alive_count(), world.pokes.len());
        for poke in &world.pokes {
            assert_eq!(poke.pos(), poke.starting_pos);
            assert_eq!(poke.health, poke.max_health);
        }
    }
}
