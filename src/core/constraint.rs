use crate::utils::allocator::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Two-body constraints recognized by the island partitioner.
///
/// The partitioner never inspects the constraint payload, only the body
/// pair; the payload travels with the island to the external solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constraint {
    Fixed {
        body_a: EntityId,
        body_b: EntityId,
        offset_a: Vec3,
        offset_b: Vec3,
    },
    Hinge {
        body_a: EntityId,
        body_b: EntityId,
        pivot: Vec3,
        axis: Vec3,
    },
    Spring {
        body_a: EntityId,
        body_b: EntityId,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    },
    Distance {
        body_a: EntityId,
        body_b: EntityId,
        distance: f32,
    },
}

impl Constraint {
    /// The two bodies this constraint links, in declaration order.
    pub fn bodies(&self) -> (EntityId, EntityId) {
        match self {
            Constraint::Fixed { body_a, body_b, .. }
            | Constraint::Hinge { body_a, body_b, .. }
            | Constraint::Spring { body_a, body_b, .. }
            | Constraint::Distance { body_a, body_b, .. } => (*body_a, *body_b),
        }
    }
}
