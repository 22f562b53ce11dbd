//! Entity store for continuous-space bodies
//!
//! Entities live in a `Vec` kept sorted by id (ids are allocated
//! monotonically), so iteration order is stable and deterministic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Opaque entity identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Entity variants. Grid games (snake segments, falling pieces, trail
/// cells) keep their cells on a `Grid` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Paddle,
    Ball,
    Ship,
    Bullet,
    Enemy,
    Particle,
}

/// A moving body. Position is the top-left corner when `size` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Option<Vec2>,
    pub size: Option<Vec2>,
    /// Remaining lifetime in ticks (particles)
    pub life: Option<u32>,
}

impl Entity {
    /// Bounding box, if the entity has a size
    pub fn aabb(&self) -> Option<Aabb> {
        self.size.map(|size| Aabb::new(self.pos, size))
    }

    /// Center point (position itself for size-less entities)
    pub fn center(&self) -> Vec2 {
        match self.size {
            Some(size) => self.pos + size * 0.5,
            None => self.pos,
        }
    }
}

/// Initial state for a spawned entity
#[derive(Debug, Clone, Default)]
pub struct Spawn {
    pub pos: Vec2,
    pub vel: Option<Vec2>,
    pub size: Option<Vec2>,
    pub life: Option<u32>,
}

impl Spawn {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = Some(vel);
        self
    }

    pub fn with_life(mut self, life: u32) -> Self {
        self.life = Some(life);
        self
    }
}

/// Owner of all live entities of one game instance
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, kind: EntityKind, init: Spawn) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos: init.pos,
            vel: init.vel,
            size: init.size,
            life: init.life,
        });
        id
    }

    /// Remove an entity. Returns the removed entity if it was alive.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let idx = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        self.entities.get(idx)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        self.entities.get_mut(idx)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Ids of every entity of a kind, in id order. Safe to remove while
    /// walking this snapshot.
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.of_kind(kind).map(|e| e.id).collect()
    }

    /// Visit every entity of a kind. The callback may request removal by
    /// returning `false`; removals are applied after the walk, so no
    /// remaining entity is skipped or visited twice.
    pub fn for_each<F>(&mut self, kind: EntityKind, mut f: F)
    where
        F: FnMut(&mut Entity) -> bool,
    {
        self.entities.retain_mut(|e| e.kind != kind || f(e));
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Entity) -> bool,
    {
        self.entities.retain(|e| f(e));
    }

    /// Apply velocity to position for every entity with a velocity
    pub fn advance(&mut self, dt: f32) {
        for entity in &mut self.entities {
            if let Some(vel) = entity.vel {
                entity.pos += vel * dt;
            }
        }
    }

    /// Drop every entity. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
