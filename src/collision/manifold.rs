use crate::{core::body::RigidBody, utils::allocator::EntityId};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single contact point inside a manifold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

/// Contact manifold between a pair of bodies, produced fresh each step by the
/// external narrow phase. Ephemeral: never retained across steps.
#[derive(Debug, Clone)]
pub struct ContactManifold {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub points: Vec<ContactPoint>,
    /// Sensor manifolds report overlap but never generate a collision response.
    pub sensor: bool,
}

impl ContactManifold {
    pub fn new(body_a: EntityId, body_b: EntityId) -> Self {
        Self {
            body_a,
            body_b,
            points: Vec::new(),
            sensor: false,
        }
    }

    pub fn with_point(mut self, point: ContactPoint) -> Self {
        self.points.push(point);
        self
    }
}

/// Predicate deciding whether a contact pair needs a collision response.
/// Manifolds failing the predicate are overlap reports only and are never
/// routed into an island.
pub trait ResponseFilter {
    fn needs_response(&self, manifold: &ContactManifold, body_a: &RigidBody, body_b: &RigidBody)
        -> bool;
}

/// Default response policy: non-sensor manifolds between pairs where at least
/// one body can actually move.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResponseFilter;

impl ResponseFilter for DefaultResponseFilter {
    fn needs_response(
        &self,
        manifold: &ContactManifold,
        body_a: &RigidBody,
        body_b: &RigidBody,
    ) -> bool {
        !manifold.sensor && (body_a.merges_islands() || body_b.merges_islands())
    }
}
