//! Core types describing physics entities and shared data.

pub mod body;
pub mod constraint;

pub use body::{RigidBody, Transform, Velocity};
pub use constraint::Constraint;
