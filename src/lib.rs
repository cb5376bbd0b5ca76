//! Simulation Islands – island partitioning for rigid-body physics.
//!
//! This crate determines, once per fixed step, the maximal groups of bodies
//! ("islands") that are dynamically independent of every other group, then
//! assembles per-island work units and hands them to a sequential or parallel
//! dispatch stage. Islands share no bodies, constraints, or manifolds, so
//! they can be solved concurrently without locking.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use collision::manifold::{ContactManifold, ContactPoint, DefaultResponseFilter, ResponseFilter};
pub use core::{
    body::{RigidBody, Transform, Velocity},
    constraint::Constraint,
};
pub use dynamics::{
    dispatch::{DebugDraw, IslandContext, IslandDispatcher, IslandSolver, StepParameters},
    island::{Island, IslandManager, PartitionMetrics},
    union_find::UnionFind,
};
pub use utils::allocator::{Arena, EntityId, GenerationalId};
pub use world::PhysicsWorld;
