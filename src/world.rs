use crate::{
    collision::manifold::{ContactManifold, DefaultResponseFilter, ResponseFilter},
    config::{DEFAULT_SOLVER_ITERATIONS, DEFAULT_TIME_STEP},
    core::{body::RigidBody, constraint::Constraint},
    dynamics::{
        dispatch::{DebugDraw, IslandDispatcher, IslandSolver, StepParameters},
        island::{Island, IslandManager, PartitionMetrics},
    },
    utils::{
        allocator::{Arena, EntityId},
        logging::ScopedTimer,
    },
};

/// Central simulation container orchestrating one fixed step:
/// merge pass → tag finalization → island assembly → dispatch.
///
/// Broad phase, narrow phase, and the numerical solver are external: the
/// caller refreshes activation state on the bodies, passes the step's fresh
/// manifolds in, and supplies the solver the islands are handed to.
pub struct PhysicsWorld {
    pub bodies: Arena<RigidBody>,
    pub constraints: Vec<Constraint>,
    pub time_step: f32,
    solver_iterations: u32,
    islands: IslandManager,
    dispatcher: IslandDispatcher,
    debug_draw: Option<Box<dyn DebugDraw>>,
}

impl PhysicsWorld {
    pub fn new(time_step: f32) -> Self {
        let ts = if time_step <= 0.0 {
            DEFAULT_TIME_STEP
        } else {
            time_step
        };

        Self {
            bodies: Arena::new(),
            constraints: Vec::new(),
            time_step: ts,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            islands: IslandManager::new(),
            dispatcher: IslandDispatcher::new(),
            debug_draw: None,
        }
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.dispatcher.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.dispatcher.parallel_enabled()
    }

    pub fn set_solver_iterations(&mut self, iterations: u32) {
        self.solver_iterations = iterations.max(1);
    }

    pub fn set_debug_draw<D>(&mut self, debug_draw: D)
    where
        D: DebugDraw + 'static,
    {
        self.debug_draw = Some(Box::new(debug_draw));
    }

    pub fn add_rigidbody(&mut self, body: RigidBody) -> EntityId {
        let id = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(id) {
            stored.id = id;
        }
        id
    }

    pub fn remove_rigidbody(&mut self, id: EntityId) -> Option<RigidBody> {
        self.bodies.remove(id)
    }

    /// Appends a constraint; index order is stable and is the order islands
    /// reference constraints by.
    pub fn add_constraint(&mut self, constraint: Constraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn wake_body(&mut self, id: EntityId) {
        if let Some(body) = self.bodies.get_mut(id) {
            body.wake();
        }
    }

    /// Islands built by the most recent step (or partition call).
    pub fn islands(&self) -> &[Island] {
        self.islands.islands()
    }

    /// Final island tag of a body after the most recent partition, `None` if
    /// the body was excluded.
    pub fn island_tag(&self, id: EntityId) -> Option<usize> {
        self.islands.tag_of(id)
    }

    pub fn partition_metrics(&self) -> &PartitionMetrics {
        self.islands.metrics()
    }

    /// Rebuilds the island partition for the current world state without
    /// dispatching. Useful for debugging and tests.
    pub fn partition(&mut self, manifolds: &[ContactManifold]) {
        self.islands.build_islands(
            &self.bodies,
            &self.constraints,
            manifolds,
            &DefaultResponseFilter,
        );
    }

    /// Advances the simulation by exactly one fixed step using the default
    /// response policy.
    pub fn step<S: IslandSolver>(&mut self, manifolds: &[ContactManifold], solver: &S) {
        self.step_with_filter(manifolds, solver, &DefaultResponseFilter);
    }

    /// Advances one fixed step with a caller-supplied response predicate.
    pub fn step_with_filter<S, F>(&mut self, manifolds: &[ContactManifold], solver: &S, filter: &F)
    where
        S: IslandSolver,
        F: ResponseFilter,
    {
        {
            let _timer = ScopedTimer::new("islands::build");
            self.islands
                .build_islands(&self.bodies, &self.constraints, manifolds, filter);
        }

        let metrics = self.islands.metrics();
        log::debug!(
            "partition: {} islands, {} bodies excluded, {} constraints dropped",
            metrics.islands_built,
            metrics.bodies_excluded,
            metrics.constraints_dropped
        );

        let params = StepParameters {
            time_step: self.time_step,
            solver_iterations: self.solver_iterations,
        };

        let dispatch_label = if self.dispatcher.parallel_enabled() {
            "dispatch::parallel"
        } else {
            "dispatch::sequential"
        };
        let _dispatch_timer = ScopedTimer::new(dispatch_label);
        self.dispatcher.dispatch(
            self.islands.islands(),
            &mut self.bodies,
            &self.constraints,
            manifolds,
            params,
            solver,
            self.debug_draw.as_deref(),
        );
    }
}
