//! Island partitioning and dispatch: union-find, island assembly, parallel handoff.

pub mod dispatch;
pub mod island;
pub mod union_find;

pub use dispatch::{DebugDraw, IslandContext, IslandDispatcher, IslandSolver, StepParameters};
pub use island::{Island, IslandManager, PartitionMetrics};
pub use union_find::UnionFind;
