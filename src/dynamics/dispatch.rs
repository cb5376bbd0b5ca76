use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    collision::manifold::ContactManifold,
    config::{DEFAULT_SOLVER_ITERATIONS, DEFAULT_TIME_STEP},
    core::{body::RigidBody, constraint::Constraint},
    dynamics::island::Island,
    utils::allocator::{Arena, EntityId},
};

/// Shared read-only parameters for one simulation step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepParameters {
    pub time_step: f32,
    pub solver_iterations: u32,
}

impl Default for StepParameters {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
        }
    }
}

/// Island-scoped view handed to the external solver.
///
/// `bodies` holds only this island's members; constraints and manifolds are
/// reached through index lists into the shared per-step buffers. Nothing in
/// the context aliases another island's data.
pub struct IslandContext<'a> {
    pub island_id: usize,
    pub params: StepParameters,
    pub bodies: &'a mut [RigidBody],
    body_slots: &'a HashMap<EntityId, usize>,
    constraints: &'a [Constraint],
    constraint_indices: &'a [usize],
    manifolds: &'a [ContactManifold],
    manifold_indices: &'a [usize],
}

impl<'a> IslandContext<'a> {
    /// This island's constraints, in registration order.
    pub fn constraints(&self) -> impl Iterator<Item = &'a Constraint> + '_ {
        let constraints = self.constraints;
        self.constraint_indices
            .iter()
            .map(move |&index| &constraints[index])
    }

    /// This island's response-needing manifolds.
    pub fn manifolds(&self) -> impl Iterator<Item = &'a ContactManifold> + '_ {
        let manifolds = self.manifolds;
        self.manifold_indices
            .iter()
            .map(move |&index| &manifolds[index])
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.body_slots.get(&id).map(|&slot| &self.bodies[slot])
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        let slot = self.body_slots.get(&id).copied()?;
        Some(&mut self.bodies[slot])
    }
}

/// External constraint solver invoked once per island. Implementations must
/// be `Sync`: islands may be solved concurrently in any order.
pub trait IslandSolver: Sync {
    fn solve_island(&self, context: &mut IslandContext<'_>);
}

/// Optional per-island visualization hook, called after an island is solved.
pub trait DebugDraw: Send + Sync {
    fn draw_island(&self, island_id: usize, bodies: &[RigidBody]);
}

/// Hands finished islands to the execution fabric.
///
/// Islands are mutually data-independent, so the parallel path runs each one
/// as its own job with cloned island-local body state, joins on completion,
/// then writes body state back. The step is done only when every island has
/// finished; no task ever touches shared mutable state.
pub struct IslandDispatcher {
    parallel: bool,
}

impl Default for IslandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IslandDispatcher {
    pub fn new() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled && cfg!(feature = "parallel");
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel
    }

    /// Runs the solver over every island with a non-empty member list and
    /// returns the number of islands dispatched.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch<S: IslandSolver>(
        &self,
        islands: &[Island],
        bodies: &mut Arena<RigidBody>,
        constraints: &[Constraint],
        manifolds: &[ContactManifold],
        params: StepParameters,
        solver: &S,
        debug_draw: Option<&dyn DebugDraw>,
    ) -> usize {
        let mut jobs: Vec<IslandJob<'_>> = islands
            .iter()
            .filter(|island| !island.bodies.is_empty())
            .filter_map(|island| Self::prepare_job(island, bodies))
            .collect();

        let shared = SharedStep {
            constraints,
            manifolds,
            params,
        };

        self.run_jobs(&mut jobs, &shared, solver, debug_draw);

        let dispatched = jobs.len();
        for job in jobs {
            for (id, body_state) in job.ids.into_iter().zip(job.bodies.into_iter()) {
                if let Some(slot) = bodies.get_mut(id) {
                    *slot = body_state;
                }
            }
        }
        dispatched
    }

    fn run_jobs<S: IslandSolver>(
        &self,
        jobs: &mut [IslandJob<'_>],
        shared: &SharedStep<'_>,
        solver: &S,
        debug_draw: Option<&dyn DebugDraw>,
    ) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                // Implicit completion barrier: for_each returns only once
                // every island job has finished.
                jobs.par_iter_mut()
                    .for_each(|job| run_job(job, shared, solver, debug_draw));
                return;
            }
        }

        for job in jobs.iter_mut() {
            run_job(job, shared, solver, debug_draw);
        }
    }

    fn prepare_job<'a>(
        island: &'a Island,
        bodies: &Arena<RigidBody>,
    ) -> Option<IslandJob<'a>> {
        let mut ids = Vec::with_capacity(island.bodies.len());
        let mut local_bodies = Vec::with_capacity(island.bodies.len());
        let mut slots = HashMap::with_capacity(island.bodies.len());

        for (slot, body_id) in island.bodies.iter().enumerate() {
            if let Some(body) = bodies.get(*body_id) {
                ids.push(*body_id);
                local_bodies.push(body.clone());
                slots.insert(*body_id, slot);
            }
        }

        if local_bodies.is_empty() {
            return None;
        }

        Some(IslandJob {
            island_id: island.id,
            ids,
            bodies: local_bodies,
            slots,
            constraint_indices: &island.constraint_indices,
            manifold_indices: &island.manifold_indices,
        })
    }
}

struct SharedStep<'a> {
    constraints: &'a [Constraint],
    manifolds: &'a [ContactManifold],
    params: StepParameters,
}

struct IslandJob<'a> {
    island_id: usize,
    ids: Vec<EntityId>,
    bodies: Vec<RigidBody>,
    slots: HashMap<EntityId, usize>,
    constraint_indices: &'a [usize],
    manifold_indices: &'a [usize],
}

fn run_job<S: IslandSolver>(
    job: &mut IslandJob<'_>,
    shared: &SharedStep<'_>,
    solver: &S,
    debug_draw: Option<&dyn DebugDraw>,
) {
    let mut context = IslandContext {
        island_id: job.island_id,
        params: shared.params,
        bodies: &mut job.bodies,
        body_slots: &job.slots,
        constraints: shared.constraints,
        constraint_indices: job.constraint_indices,
        manifolds: shared.manifolds,
        manifold_indices: job.manifold_indices,
    };
    solver.solve_island(&mut context);

    if let Some(draw) = debug_draw {
        draw.draw_island(job.island_id, &job.bodies);
    }
}
