//! Contact data handed over from the external narrow phase.

pub mod manifold;

pub use manifold::{ContactManifold, ContactPoint, DefaultResponseFilter, ResponseFilter};
