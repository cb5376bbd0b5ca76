//! Utility helpers: the generational entity allocator and logging support.

pub mod allocator;
pub mod logging;

pub use allocator::{Arena, EntityId, GenerationalId};
