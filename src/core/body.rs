use crate::utils::allocator::EntityId;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Core rigid body description storing kinematic state and activation flags.
///
/// The activation signal (`is_awake`) is maintained by the surrounding
/// collision/activation subsystem before the step runs; island partitioning
/// only reads it.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: EntityId,
    pub transform: Transform,
    pub velocity: Velocity,
    pub inverse_mass: f32,
    pub is_static: bool,
    pub is_kinematic: bool,
    pub is_awake: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            transform: Transform::default(),
            velocity: Velocity::default(),
            inverse_mass: 1.0,
            is_static: false,
            is_kinematic: false,
            is_awake: true,
        }
    }
}

impl RigidBody {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builds a static body: infinite mass, never awake, never merges islands.
    pub fn new_static(id: EntityId) -> Self {
        Self {
            id,
            inverse_mass: 0.0,
            is_static: true,
            is_awake: false,
            ..Self::default()
        }
    }

    pub fn set_velocity(&mut self, linear: Vec3, angular: Vec3) {
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    /// Whether this body propagates island membership to constrained
    /// neighbors. Static and kinematic bodies act as anchors and never merge.
    pub fn merges_islands(&self) -> bool {
        !self.is_static && !self.is_kinematic
    }

    pub fn wake(&mut self) {
        if !self.is_static {
            self.is_awake = true;
        }
    }

    pub fn sleep(&mut self) {
        self.is_awake = false;
    }
}
