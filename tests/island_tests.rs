use simulation_islands::*;

fn add_awake_body(world: &mut PhysicsWorld) -> EntityId {
    world.add_rigidbody(RigidBody::default())
}

fn add_sleeping_body(world: &mut PhysicsWorld) -> EntityId {
    let mut body = RigidBody::default();
    body.sleep();
    world.add_rigidbody(body)
}

fn link(world: &mut PhysicsWorld, a: EntityId, b: EntityId) -> usize {
    world.add_constraint(Constraint::Distance {
        body_a: a,
        body_b: b,
        distance: 1.0,
    })
}

fn contact(a: EntityId, b: EntityId) -> ContactManifold {
    ContactManifold::new(a, b).with_point(ContactPoint {
        point: Vec3::ZERO,
        normal: Vec3::Y,
        depth: 0.01,
    })
}

#[test]
fn chain_of_constraints_forms_one_island() {
    // Scenario: A-B and B-C constrained, everything awake.
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let a = add_awake_body(&mut world);
    let b = add_awake_body(&mut world);
    let c = add_awake_body(&mut world);
    let k_ab = link(&mut world, a, b);
    let k_bc = link(&mut world, b, c);

    world.partition(&[]);

    assert_eq!(world.islands().len(), 1);
    let island = &world.islands()[0];
    assert_eq!(island.bodies.len(), 3);
    let mut constraint_indices = island.constraint_indices.clone();
    constraint_indices.sort_unstable();
    assert_eq!(constraint_indices, vec![k_ab, k_bc]);
    assert_eq!(world.island_tag(a), world.island_tag(c));
}

#[test]
fn sleeping_pair_is_excluded_and_constraint_dropped() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let d = add_sleeping_body(&mut world);
    let e = add_sleeping_body(&mut world);
    link(&mut world, d, e);

    world.partition(&[]);

    assert!(world.islands().is_empty());
    assert_eq!(world.island_tag(d), None);
    assert_eq!(world.island_tag(e), None);
    assert_eq!(world.partition_metrics().constraints_dropped, 1);
    assert_eq!(world.partition_metrics().constraints_routed, 0);
}

#[test]
fn isolated_awake_body_is_a_singleton_island() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let f = add_awake_body(&mut world);

    world.partition(&[]);

    assert_eq!(world.islands().len(), 1);
    let island = &world.islands()[0];
    assert_eq!(island.bodies, vec![f]);
    assert!(island.constraint_indices.is_empty());
    assert!(island.manifold_indices.is_empty());
}

#[test]
fn disjoint_clusters_become_disjoint_islands() {
    // Scenario: two 50-body clusters, no cross-cluster edges.
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let cluster_a: Vec<_> = (0..50).map(|_| add_awake_body(&mut world)).collect();
    let cluster_b: Vec<_> = (0..50).map(|_| add_awake_body(&mut world)).collect();
    for cluster in [&cluster_a, &cluster_b] {
        for pair in cluster.windows(2) {
            link(&mut world, pair[0], pair[1]);
        }
    }

    world.partition(&[]);

    assert_eq!(world.islands().len(), 2);
    for island in world.islands() {
        assert_eq!(island.bodies.len(), 50);
        assert_eq!(island.constraint_indices.len(), 49);
    }

    let tag_a = world.island_tag(cluster_a[0]);
    let tag_b = world.island_tag(cluster_b[0]);
    assert_ne!(tag_a, tag_b);
    for id in &cluster_a {
        assert_eq!(world.island_tag(*id), tag_a);
    }
    for id in &cluster_b {
        assert_eq!(world.island_tag(*id), tag_b);
    }
}

#[test]
fn repartition_of_unchanged_world_is_stable() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let ids: Vec<_> = (0..10).map(|_| add_awake_body(&mut world)).collect();
    for pair in ids.chunks(2) {
        link(&mut world, pair[0], pair[1]);
    }

    world.partition(&[]);
    let first: Vec<_> = ids.iter().map(|id| world.island_tag(*id)).collect();

    world.partition(&[]);
    let second: Vec<_> = ids.iter().map(|id| world.island_tag(*id)).collect();

    assert_eq!(first, second);
}

#[test]
fn every_routed_constraint_appears_in_exactly_one_island() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let ids: Vec<_> = (0..20).map(|_| add_awake_body(&mut world)).collect();
    for pair in ids.windows(3) {
        link(&mut world, pair[0], pair[2]);
    }
    // One fully sleeping edge that must be dropped.
    let asleep_a = add_sleeping_body(&mut world);
    let asleep_b = add_sleeping_body(&mut world);
    let dropped = link(&mut world, asleep_a, asleep_b);

    world.partition(&[]);

    let mut seen = vec![0usize; world.constraints.len()];
    for island in world.islands() {
        for &index in &island.constraint_indices {
            seen[index] += 1;
        }
    }

    for (index, count) in seen.iter().enumerate() {
        if index == dropped {
            assert_eq!(*count, 0, "sleeping-edge constraint must be dropped");
        } else {
            assert_eq!(*count, 1, "constraint {index} must appear exactly once");
        }
    }
}

#[test]
fn response_manifolds_are_routed_exactly_once() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let a = add_awake_body(&mut world);
    let b = add_awake_body(&mut world);
    let c = add_awake_body(&mut world);
    let d = add_sleeping_body(&mut world);
    let e = add_sleeping_body(&mut world);

    let mut sensor = contact(b, c);
    sensor.sensor = true;
    // a-b responds, b-c is sensor-only, d-e links two sleeping bodies.
    let manifolds = vec![contact(a, b), sensor, contact(d, e)];

    world.partition(&manifolds);

    let mut seen = vec![0usize; manifolds.len()];
    for island in world.islands() {
        for &index in &island.manifold_indices {
            seen[index] += 1;
        }
    }

    assert_eq!(seen, vec![1, 0, 0]);
    assert_eq!(world.island_tag(a), world.island_tag(b));
    assert_eq!(world.island_tag(d), None);
}

#[test]
fn islands_never_reference_excluded_bodies() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let ids: Vec<_> = (0..8).map(|_| add_awake_body(&mut world)).collect();
    let anchor = world.add_rigidbody(RigidBody::new_static(EntityId::default()));
    let _asleep = add_sleeping_body(&mut world);
    for pair in ids.windows(2) {
        link(&mut world, pair[0], pair[1]);
    }
    link(&mut world, ids[0], anchor);

    world.partition(&[]);

    for island in world.islands() {
        for body_id in &island.bodies {
            assert_eq!(world.island_tag(*body_id), Some(island.id));
        }
        for &index in &island.constraint_indices {
            let (a, b) = world.constraints[index].bodies();
            assert!(world.island_tag(a).is_some());
            assert!(world.island_tag(b).is_some());
        }
    }
}

#[test]
fn sleeping_body_constrained_to_awake_body_joins_its_island() {
    // One awake endpoint keeps the edge eligible; the sleeping body is
    // dragged into the awake island so the solver can wake it.
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let awake = add_awake_body(&mut world);
    let asleep = add_sleeping_body(&mut world);
    link(&mut world, awake, asleep);

    world.partition(&[]);

    assert_eq!(world.islands().len(), 1);
    assert_eq!(world.island_tag(awake), world.island_tag(asleep));
    assert_eq!(world.partition_metrics().constraints_routed, 1);
}

#[test]
fn contact_with_excluded_endpoint_is_dropped() {
    // An awake dynamic body resting on a static one: the contact needs a
    // response, but the static endpoint has no tag, so the manifold must be
    // dropped rather than routed through an excluded tag.
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let dynamic = add_awake_body(&mut world);
    let ground = world.add_rigidbody(RigidBody::new_static(EntityId::default()));
    let manifolds = vec![contact(dynamic, ground)];

    world.partition(&manifolds);

    assert!(world.island_tag(dynamic).is_some());
    assert_eq!(world.island_tag(ground), None);
    assert_eq!(world.partition_metrics().manifolds_dropped, 1);
    assert_eq!(world.partition_metrics().manifolds_routed, 0);
    for island in world.islands() {
        assert!(island.manifold_indices.is_empty());
    }
}

#[test]
fn static_anchor_stays_excluded() {
    let mut world = PhysicsWorld::new(1.0 / 60.0);
    let dynamic = add_awake_body(&mut world);
    let anchor = world.add_rigidbody(RigidBody::new_static(EntityId::default()));
    link(&mut world, dynamic, anchor);

    world.partition(&[]);

    assert_eq!(world.island_tag(anchor), None);
    assert!(world.island_tag(dynamic).is_some());
    assert_eq!(world.partition_metrics().constraints_dropped, 1);
}
