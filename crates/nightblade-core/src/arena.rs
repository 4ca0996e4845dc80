//! Arena: the container for every actor in a fight.
//!
//! The arena owns one player and any number of enemies. It provides:
//! - Enemy storage with deterministic iteration order (`BTreeMap`)
//! - Target queries (closest living enemy within a radius)
//! - Enemy lifecycle (spawn, removal of despawned enemies)
//!
//! # Architecture
//!
//! Actor IDs are assigned monotonically starting at 0 for the player, and the
//! `BTreeMap` ordering guarantees enemies are always visited in spawn order.
//! Every per-tick loop in the simulation relies on that order for
//! reproducibility.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightblade_core::arena::Arena;
//! use nightblade_core::config::{EnemyConfig, PlayerConfig};
//!
//! let mut arena = Arena::new(Vec2::ZERO, &PlayerConfig::default());
//! let near = arena.spawn_enemy("skeleton", Vec2::new(1.0, 0.0), &EnemyConfig::default());
//! let _far = arena.spawn_enemy("skeleton", Vec2::new(9.0, 0.0), &EnemyConfig::default());
//!
//! assert_eq!(arena.closest_enemy_within(Vec2::ZERO, 1.5), Some(near));
//! assert_eq!(arena.enemy_count(), 2);
//! ```

use std::collections::BTreeMap;

use glam::Vec2;

use crate::actor::{ActorId, CombatActor, EnemyController, PlayerController};
use crate::config::{EnemyConfig, PlayerConfig};

/// All actors taking part in a fight.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Next actor ID to hand out.
    next_id: u64,
    /// The player (always ID 0).
    player: PlayerController,
    /// Enemies in spawn order.
    enemies: BTreeMap<ActorId, EnemyController>,
}

impl Arena {
    /// Creates an arena holding only the player, spawned at `player_spawn`.
    #[must_use]
    pub fn new(player_spawn: Vec2, player_config: &PlayerConfig) -> Self {
        Self {
            next_id: 1,
            player: PlayerController::new(ActorId::new(0), player_spawn, player_config),
            enemies: BTreeMap::new(),
        }
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &PlayerController {
        &self.player
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// Spawns an enemy and returns its ID.
    pub fn spawn_enemy(&mut self, archetype: &str, position: Vec2, config: &EnemyConfig) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id += 1;
        self.enemies
            .insert(id, EnemyController::new(id, archetype, position, config));
        tracing::debug!(actor = %id, archetype, x = position.x, y = position.y, "enemy spawned");
        id
    }

    /// Looks up an enemy.
    #[must_use]
    pub fn enemy(&self, id: ActorId) -> Option<&EnemyController> {
        self.enemies.get(&id)
    }

    /// Looks up an enemy mutably.
    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut EnemyController> {
        self.enemies.get_mut(&id)
    }

    /// The player together with one enemy, both mutably.
    pub fn player_and_enemy_mut(
        &mut self,
        id: ActorId,
    ) -> Option<(&mut PlayerController, &mut EnemyController)> {
        let enemy = self.enemies.get_mut(&id)?;
        Some((&mut self.player, enemy))
    }

    /// Number of enemies, dead or alive, still in the arena.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Number of living enemies.
    #[must_use]
    pub fn living_enemy_count(&self) -> usize {
        self.enemies.values().filter(|e| !e.is_dead()).count()
    }

    /// Enemy IDs in ascending order.
    pub fn enemy_ids_sorted(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.enemies.keys().copied()
    }

    /// Enemies in ascending ID order.
    pub fn enemies_sorted(&self) -> impl Iterator<Item = &EnemyController> {
        self.enemies.values()
    }

    /// Enemies in ascending ID order, mutably.
    pub fn enemies_sorted_mut(&mut self) -> impl Iterator<Item = &mut EnemyController> {
        self.enemies.values_mut()
    }

    /// The closest living enemy whose position lies within `radius` of
    /// `center`. Ties go to the lower ID.
    #[must_use]
    pub fn closest_enemy_within(&self, center: Vec2, radius: f32) -> Option<ActorId> {
        let radius_sq = radius * radius;
        self.enemies
            .iter()
            .filter(|(_, enemy)| !enemy.is_dead())
            .map(|(id, enemy)| (*id, center.distance_squared(enemy.body().position)))
            .filter(|(_, dist_sq)| *dist_sq <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Removes enemies whose removal delay has elapsed. Returns their IDs in
    /// ascending order.
    pub fn remove_despawned(&mut self) -> Vec<ActorId> {
        let removed: Vec<ActorId> = self
            .enemies
            .iter()
            .filter(|(_, enemy)| enemy.is_removed())
            .map(|(id, _)| *id)
            .collect();
        for id in &removed {
            self.enemies.remove(id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::resolver::DamageInfo;

    fn arena_with(positions: &[f32]) -> (Arena, Vec<ActorId>) {
        let mut arena = Arena::new(Vec2::ZERO, &PlayerConfig::default());
        let ids = positions
            .iter()
            .map(|&x| arena.spawn_enemy("skeleton", Vec2::new(x, 0.0), &EnemyConfig::default()))
            .collect();
        (arena, ids)
    }

    fn kill(arena: &mut Arena, id: ActorId) {
        let mut bus = EventBus::new();
        let lethal = DamageInfo::new(1000, false, 1.0, 0.0, Vec2::X);
        arena.enemy_mut(id).unwrap().take_damage(&lethal, &mut bus);
    }

    #[test]
    fn ids_are_monotonic_and_player_is_zero() {
        let (arena, ids) = arena_with(&[1.0, 2.0, 3.0]);
        assert_eq!(arena.player().id(), ActorId::new(0));
        assert_eq!(ids, vec![ActorId::new(1), ActorId::new(2), ActorId::new(3)]);
        assert_eq!(arena.enemy_ids_sorted().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn closest_ignores_dead_and_distant() {
        let (mut arena, ids) = arena_with(&[-1.0, 0.5, 4.0]);
        assert_eq!(arena.closest_enemy_within(Vec2::ZERO, 1.5), Some(ids[1]));

        kill(&mut arena, ids[1]);
        assert_eq!(arena.closest_enemy_within(Vec2::ZERO, 1.5), Some(ids[0]));
        assert_eq!(arena.living_enemy_count(), 2);

        assert_eq!(arena.closest_enemy_within(Vec2::new(10.0, 0.0), 1.5), None);
    }

    #[test]
    fn ties_go_to_lower_id() {
        let (arena, ids) = arena_with(&[1.0, -1.0]);
        assert_eq!(arena.closest_enemy_within(Vec2::ZERO, 2.0), Some(ids[0]));
    }

    #[test]
    fn only_removed_enemies_are_dropped() {
        let (mut arena, ids) = arena_with(&[1.0, 2.0]);
        kill(&mut arena, ids[0]);
        assert!(arena.remove_despawned().is_empty());

        let mut bus = EventBus::new();
        for _ in 0..200 {
            arena.enemy_mut(ids[0]).unwrap().update(1.0 / 60.0, &mut bus);
        }
        assert_eq!(arena.remove_despawned(), vec![ids[0]]);
        assert_eq!(arena.enemy_count(), 1);
        assert!(arena.enemy(ids[1]).is_some());
    }
}
