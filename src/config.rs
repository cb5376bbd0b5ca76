//! Global configuration constants for the Simulation Islands engine.

/// Default fixed timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Number of constraint solver iterations performed per island.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 4;
