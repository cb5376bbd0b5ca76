use crate::{
    collision::manifold::{ContactManifold, ResponseFilter},
    core::{body::RigidBody, constraint::Constraint},
    dynamics::union_find::UnionFind,
    utils::allocator::{Arena, EntityId},
};

/// A connected set of bodies that can be solved independently of every other
/// island this step.
///
/// Member constraints and manifolds are stored as indices into the shared
/// per-step buffers; the island itself owns nothing.
pub struct Island {
    pub id: usize,
    pub bodies: Vec<EntityId>,
    pub constraint_indices: Vec<usize>,
    pub manifold_indices: Vec<usize>,
}

impl Island {
    fn new(id: usize) -> Self {
        Self {
            id,
            bodies: Vec::new(),
            constraint_indices: Vec::new(),
            manifold_indices: Vec::new(),
        }
    }
}

/// Counters describing the most recent partition pass.
#[derive(Debug, Default, Clone)]
pub struct PartitionMetrics {
    pub islands_built: usize,
    pub bodies_tagged: usize,
    pub bodies_excluded: usize,
    pub constraints_routed: usize,
    pub constraints_dropped: usize,
    pub manifolds_routed: usize,
    pub manifolds_dropped: usize,
}

/// Rebuilds the island partition each step from the activation signal, the
/// ordered constraint list, and the fresh manifold list.
///
/// Tags live in a side table keyed by body slot, never inside the body
/// records, so bodies stay read-only for the whole pass. `None` marks an
/// excluded body; nothing indexed by tag can ever see an excluded member.
pub struct IslandManager {
    islands: Vec<Island>,
    tags: Vec<Option<usize>>,
    metrics: PartitionMetrics,
}

impl Default for IslandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IslandManager {
    pub fn new() -> Self {
        Self {
            islands: Vec::new(),
            tags: Vec::new(),
            metrics: PartitionMetrics::default(),
        }
    }

    /// Runs the full partition: merge pass, tag finalization, assembly.
    ///
    /// Constraints merge the sets of their two bodies when both bodies can
    /// propagate island membership and at least one is awake. Response-needing
    /// manifolds merge under the identical rule, so a contact never links two
    /// islands that would then race on a shared body. Everything else only
    /// routes work into the finished islands.
    pub fn build_islands<F: ResponseFilter>(
        &mut self,
        bodies: &Arena<RigidBody>,
        constraints: &[Constraint],
        manifolds: &[ContactManifold],
        filter: &F,
    ) {
        let slot_count = bodies.slot_count();
        self.islands.clear();
        self.tags.clear();
        self.tags.resize(slot_count, None);
        self.metrics = PartitionMetrics::default();

        // Per-step scratch state; dropped at the end of the pass.
        let mut union_find = UnionFind::new(slot_count);

        for constraint in constraints {
            let (id_a, id_b) = constraint.bodies();
            if let (Some(body_a), Some(body_b)) = (bodies.get(id_a), bodies.get(id_b)) {
                if Self::edge_merges(body_a, body_b) {
                    union_find.union(id_a.index(), id_b.index());
                }
            }
        }

        for manifold in manifolds {
            if let (Some(body_a), Some(body_b)) =
                (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            {
                if filter.needs_response(manifold, body_a, body_b)
                    && Self::edge_merges(body_a, body_b)
                {
                    union_find.union(manifold.body_a.index(), manifold.body_b.index());
                }
            }
        }

        self.finalize_tags(bodies, &mut union_find);
        self.assemble(bodies, constraints, manifolds, filter);
    }

    /// Eligibility rule shared by constraint and contact edges: both bodies
    /// merge islands and at least one is awake. A fully sleeping edge needs
    /// no simulation this step.
    fn edge_merges(body_a: &RigidBody, body_b: &RigidBody) -> bool {
        body_a.merges_islands()
            && body_b.merges_islands()
            && (body_a.is_awake || body_b.is_awake)
    }

    /// Converts set representatives into dense island tags, first-seen order.
    /// A body is tagged only if it can merge islands and its set contains at
    /// least one awake body; everything else stays excluded (`None`), so
    /// static and kinematic anchors never spawn islands of their own.
    fn finalize_tags(&mut self, bodies: &Arena<RigidBody>, union_find: &mut UnionFind) {
        let mut set_awake = vec![false; union_find.len()];
        for id in bodies.ids() {
            if bodies.get(id).is_some_and(|body| body.is_awake) {
                let root = union_find.find(id.index());
                set_awake[root] = true;
            }
        }

        let mut root_tags: Vec<Option<usize>> = vec![None; union_find.len()];
        let mut next_tag = 0usize;
        for id in bodies.ids() {
            let Some(body) = bodies.get(id) else {
                continue;
            };
            let root = union_find.find(id.index());
            if !body.merges_islands() || !set_awake[root] {
                continue;
            }
            let tag = *root_tags[root].get_or_insert_with(|| {
                let tag = next_tag;
                next_tag += 1;
                tag
            });
            self.tags[id.index()] = Some(tag);
        }

        self.islands = (0..next_tag).map(Island::new).collect();
    }

    /// Groups bodies, constraint indices, and response-needing manifold
    /// indices by final tag. Edges touching an excluded body are dropped;
    /// an excluded tag is never used as an index.
    fn assemble<F: ResponseFilter>(
        &mut self,
        bodies: &Arena<RigidBody>,
        constraints: &[Constraint],
        manifolds: &[ContactManifold],
        filter: &F,
    ) {
        for id in bodies.ids() {
            match self.tags[id.index()] {
                Some(tag) => {
                    self.islands[tag].bodies.push(id);
                    self.metrics.bodies_tagged += 1;
                }
                None => self.metrics.bodies_excluded += 1,
            }
        }

        for (index, constraint) in constraints.iter().enumerate() {
            let (id_a, id_b) = constraint.bodies();
            match (self.tag_of(id_a), self.tag_of(id_b)) {
                (Some(tag_a), Some(tag_b)) => {
                    self.islands[tag_a.max(tag_b)].constraint_indices.push(index);
                    self.metrics.constraints_routed += 1;
                }
                _ => self.metrics.constraints_dropped += 1,
            }
        }

        for (index, manifold) in manifolds.iter().enumerate() {
            let (body_a, body_b) = match (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            if !filter.needs_response(manifold, body_a, body_b) {
                continue;
            }
            match (self.tag_of(manifold.body_a), self.tag_of(manifold.body_b)) {
                (Some(tag_a), Some(tag_b)) => {
                    self.islands[tag_a.max(tag_b)].manifold_indices.push(index);
                    self.metrics.manifolds_routed += 1;
                }
                _ => self.metrics.manifolds_dropped += 1,
            }
        }

        self.metrics.islands_built = self.islands.len();
    }

    /// Final island tag for a body, or `None` if the body is excluded this
    /// step (or no longer exists).
    pub fn tag_of(&self, id: EntityId) -> Option<usize> {
        self.tags.get(id.index()).copied().flatten()
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn metrics(&self) -> &PartitionMetrics {
        &self.metrics
    }
}
