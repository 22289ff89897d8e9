use super::gate::{Band, DistanceGate};
use super::*;
use crate::world::agents::{BreedId, PatchId};
use crate::world::topology::Topology;

fn sorted(mut agents: Vec<AgentRef>) -> Vec<AgentRef> {
    agents.sort();
    agents
}

fn patch_coords(world: &PatchWorld, agents: &[AgentRef]) -> Vec<(i32, i32)> {
    let mut coords: Vec<(i32, i32)> = agents
        .iter()
        .map(|a| {
            let patch = world.patch(a.as_patch().unwrap()).unwrap();
            (patch.pxcor(), patch.pycor())
        })
        .collect();
    coords.sort();
    coords
}

/// World with `count` turtles scattered uniformly, cycling through `breeds`.
fn scattered_world(topology: Topology, count: usize, breeds: &[BreedId], rng: &mut fastrand::Rng) -> PatchWorld {
    let mut world = PatchWorld::new(topology);
    for i in 0..count {
        let x = rng.f64() * topology.width() as f64 - 0.5;
        let y = rng.f64() * topology.height() as f64 - 0.5;
        let heading = rng.f64() * 360.0;
        world
            .spawn_turtle(x, y, heading, breeds[i % breeds.len()])
            .unwrap();
    }
    world
}

// ============================================================================
// Radius queries
// ============================================================================

#[test]
fn test_wrap_symmetry_patch_radius_one() {
    let world = PatchWorld::new(Topology::torus(10, 10));
    let origin = AgentRef::Patch(world.patch_xy(0, 0).unwrap());

    let result = world.in_radius(origin, &SourceSet::AllPatches, 1.0, true).unwrap();

    assert_eq!(
        patch_coords(&world, &result),
        vec![(0, 0), (0, 1), (0, 9), (1, 0), (9, 0)]
    );
}

#[test]
fn test_no_wrap_on_torus_stays_in_the_corner() {
    let world = PatchWorld::new(Topology::torus(10, 10));
    let origin = AgentRef::Patch(world.patch_xy(0, 0).unwrap());

    let result = world.in_radius(origin, &SourceSet::AllPatches, 1.0, false).unwrap();

    assert_eq!(patch_coords(&world, &result), vec![(0, 0), (0, 1), (1, 0)]);
}

#[test]
fn test_origin_patch_includes_itself() {
    let world = PatchWorld::new(Topology::bounded(6, 6));
    for idx in 0..world.patch_count() {
        let origin = AgentRef::Patch(PatchId(idx));
        let result = world.in_radius(origin, &SourceSet::AllPatches, 0.0, true).unwrap();
        assert_eq!(result, vec![origin]);
    }
}

#[test]
fn test_in_radius_matches_brute_force() {
    let mut rng = fastrand::Rng::with_seed(1234);
    for (wrap_x, wrap_y) in [(true, true), (true, false), (false, true), (false, false)] {
        let topology = Topology::new(23, 17, wrap_x, wrap_y);
        let mut world = PatchWorld::new(topology);
        let wolves = world.register_breed("wolves");
        let sheep = world.register_breed("sheep");
        let breeds = [BreedId::TURTLES, wolves, sheep];
        for i in 0..300 {
            let x = rng.f64() * 23.0 - 0.5;
            let y = rng.f64() * 17.0 - 0.5;
            world.spawn_turtle(x, y, 0.0, breeds[i % 3]).unwrap();
        }

        for _ in 0..60 {
            let origin = if rng.bool() {
                AgentRef::Turtle(TurtleId(rng.u64(..300)))
            } else {
                AgentRef::Patch(PatchId(rng.usize(..world.patch_count())))
            };
            let radius = rng.f64() * 12.0;
            let wrap = rng.bool();
            let some_turtles: Vec<TurtleId> = (0..300).filter(|_| rng.bool()).map(TurtleId).collect();
            let some_patches: Vec<PatchId> =
                (0..world.patch_count()).filter(|_| rng.bool()).map(PatchId).collect();

            for source in [
                SourceSet::AllTurtles,
                SourceSet::Breed(wolves),
                SourceSet::Turtles(some_turtles),
                SourceSet::AllPatches,
                SourceSet::Patches(some_patches),
            ] {
                let fast = world.in_radius(origin, &source, radius, wrap).unwrap();
                let simple = world.in_radius_simple(origin, &source, radius, wrap).unwrap();
                assert_eq!(
                    sorted(fast),
                    sorted(simple),
                    "mismatch for {:?} from {:?} r={} wrap={} on ({}, {})",
                    source,
                    origin,
                    radius,
                    wrap,
                    wrap_x,
                    wrap_y
                );
            }
        }
    }
}

#[test]
fn test_radius_monotonicity() {
    let mut rng = fastrand::Rng::with_seed(99);
    let world = scattered_world(Topology::torus(20, 20), 250, &[BreedId::TURTLES], &mut rng);

    for _ in 0..50 {
        let origin = AgentRef::Turtle(TurtleId(rng.u64(..250)));
        let r1 = rng.f64() * 8.0;
        let r2 = r1 + rng.f64() * 4.0;
        let small = world.in_radius(origin, &SourceSet::AllTurtles, r1, true).unwrap();
        let large = world.in_radius(origin, &SourceSet::AllTurtles, r2, true).unwrap();
        for agent in &small {
            assert!(large.contains(agent), "{agent:?} in radius {r1} but not in {r2}");
        }
    }
}

#[test]
fn test_distance_gate_bands_are_sound() {
    let mut rng = fastrand::Rng::with_seed(5);
    let world = scattered_world(Topology::torus(30, 30), 900, &[BreedId::TURTLES], &mut rng);

    for _ in 0..40 {
        let origin = world.turtle(TurtleId(rng.u64(..900))).unwrap().clone();
        let radius = rng.f64() * 10.0;
        let gate = DistanceGate::new(world.topology(), world.roots(), origin.xcor(), origin.ycor(), radius, true);

        for patch in world.patches() {
            let band = gate.classify(patch);
            for id in patch.turtles_here() {
                let turtle = world.turtle(*id).unwrap();
                let d = world
                    .protractor()
                    .distance(turtle.xcor(), turtle.ycor(), origin.xcor(), origin.ycor(), true);
                match band {
                    Band::Inside => assert!(d <= radius, "inside band turtle at {d} > {radius}"),
                    Band::Outside => assert!(d > radius, "outside band turtle at {d} <= {radius}"),
                    Band::Boundary => {}
                }
            }
        }
    }
}

#[test]
fn test_inside_band_turtles_skip_exact_check_but_not_membership() {
    let mut world = PatchWorld::new(Topology::torus(20, 20));
    let wolves = world.register_breed("wolves");
    let sheep = world.register_breed("sheep");
    let seer = world.spawn_turtle(10.0, 10.0, 0.0, wolves).unwrap();
    // Two patches away: well inside a radius of 6.
    let near_wolf = world.spawn_turtle(12.3, 10.2, 0.0, wolves).unwrap();
    let near_sheep = world.spawn_turtle(12.3, 10.2, 0.0, sheep).unwrap();
    // Boundary band: exact check decides.
    let edge_wolf = world.spawn_turtle(15.8, 10.0, 0.0, wolves).unwrap();
    let far_wolf = world.spawn_turtle(16.4, 10.0, 0.0, wolves).unwrap();

    let result = world
        .in_radius(AgentRef::Turtle(seer), &SourceSet::Breed(wolves), 6.0, true)
        .unwrap();

    assert!(result.contains(&AgentRef::Turtle(seer)));
    assert!(result.contains(&AgentRef::Turtle(near_wolf)));
    assert!(result.contains(&AgentRef::Turtle(edge_wolf)));
    assert!(!result.contains(&AgentRef::Turtle(near_sheep)), "sheep are not wolves");
    assert!(!result.contains(&AgentRef::Turtle(far_wolf)));
}

#[test]
fn test_explicit_turtle_set() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let a = world.spawn_turtle(5.0, 5.0, 0.0, BreedId::TURTLES).unwrap();
    let b = world.spawn_turtle(5.2, 5.1, 0.0, BreedId::TURTLES).unwrap();
    let c = world.spawn_turtle(4.8, 5.3, 0.0, BreedId::TURTLES).unwrap();

    let result = world
        .in_radius(AgentRef::Turtle(a), &SourceSet::Turtles(vec![b]), 3.0, true)
        .unwrap();

    assert_eq!(result, vec![AgentRef::Turtle(b)]);
    assert!(!result.contains(&AgentRef::Turtle(c)));
}

#[test]
fn test_explicit_patch_set_from_turtle_origin() {
    let mut world = PatchWorld::new(Topology::bounded(10, 10));
    let seer = world.spawn_turtle(2.2, 2.0, 0.0, BreedId::TURTLES).unwrap();
    let near = world.patch_xy(3, 2).unwrap();
    let far = world.patch_xy(8, 8).unwrap();

    let result = world
        .in_radius(AgentRef::Turtle(seer), &SourceSet::Patches(vec![near, far]), 2.0, false)
        .unwrap();

    assert_eq!(result, vec![AgentRef::Patch(near)]);
}

#[test]
fn test_turtles_on_one_patch_keep_residency_order() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let first = world.spawn_turtle(3.1, 3.1, 0.0, BreedId::TURTLES).unwrap();
    let second = world.spawn_turtle(2.9, 2.9, 0.0, BreedId::TURTLES).unwrap();

    let result = world
        .in_radius(AgentRef::Turtle(first), &SourceSet::AllTurtles, 1.0, true)
        .unwrap();

    assert_eq!(result, vec![AgentRef::Turtle(first), AgentRef::Turtle(second)]);
}

#[test]
fn test_dead_turtles_are_never_returned() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let seer = world.spawn_turtle(5.0, 5.0, 0.0, BreedId::TURTLES).unwrap();
    let gone = world.spawn_turtle(5.5, 5.0, 0.0, BreedId::TURTLES).unwrap();
    world.die(gone).unwrap();

    let result = world
        .in_radius(AgentRef::Turtle(seer), &SourceSet::Turtles(vec![seer, gone]), 4.0, true)
        .unwrap();
    assert_eq!(result, vec![AgentRef::Turtle(seer)]);

    assert_eq!(
        world.in_radius(AgentRef::Turtle(gone), &SourceSet::AllTurtles, 1.0, true),
        Err(WorldError::UnknownTurtle(gone))
    );
}

// ============================================================================
// Cone queries
// ============================================================================

#[test]
fn test_cone_apex_is_always_inside() {
    for heading in [0.0, 90.0, 181.5, 359.9] {
        assert!(is_in_cone(3.0, 4.0, 3.0, 4.0, 0.0, 0.0, heading));
    }
}

#[test]
fn test_cone_angle_wraps_around_north() {
    // Bearing of (-0.08, 1.0) is about 355.4 degrees.
    assert!(is_in_cone(-0.08, 1.0, 0.0, 0.0, 2.0, 10.0, 5.0));
    // Bearing of (0.3, 1.0) is about 16.7 degrees: 11.7 off the heading.
    assert!(!is_in_cone(0.3, 1.0, 0.0, 0.0, 2.0, 10.0, 5.0));
}

#[test]
fn test_cone_respects_radius() {
    assert!(is_in_cone(0.0, 2.0, 0.0, 0.0, 2.0, 30.0, 0.0));
    assert!(!is_in_cone(0.0, 2.01, 0.0, 0.0, 2.0, 30.0, 0.0));
}

#[test]
fn test_cone_patches() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let seer = world.spawn_turtle(5.0, 5.0, 0.0, BreedId::TURTLES).unwrap();

    let result = world.in_cone(seer, &SourceSet::AllPatches, 2.0, 100.0, true).unwrap();

    assert_eq!(
        patch_coords(&world, &result),
        vec![(4, 6), (5, 5), (5, 6), (5, 7), (6, 6)]
    );
}

#[test]
fn test_cone_sees_across_the_seam_only_when_wrapping() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let seer = world.spawn_turtle(0.0, 5.0, 270.0, BreedId::TURTLES).unwrap();
    let target = world.spawn_turtle(9.0, 5.0, 0.0, BreedId::TURTLES).unwrap();
    let source = SourceSet::Turtles(vec![target]);

    let wrapped = world.in_cone(seer, &source, 2.0, 60.0, true).unwrap();
    assert_eq!(wrapped, vec![AgentRef::Turtle(target)]);

    let unwrapped = world.in_cone(seer, &source, 2.0, 60.0, false).unwrap();
    assert!(unwrapped.is_empty());
}

#[test]
fn test_cone_on_bounded_world_ignores_wrap_flag() {
    let mut world = PatchWorld::new(Topology::bounded(10, 10));
    let seer = world.spawn_turtle(0.0, 5.0, 270.0, BreedId::TURTLES).unwrap();
    world.spawn_turtle(9.0, 5.0, 0.0, BreedId::TURTLES).unwrap();

    let result = world.in_cone(seer, &SourceSet::AllTurtles, 2.0, 60.0, true).unwrap();
    assert_eq!(result, vec![AgentRef::Turtle(seer)]);
}

#[test]
fn test_cone_with_many_world_copies_has_no_duplicates() {
    let mut rng = fastrand::Rng::with_seed(31);
    let world = scattered_world(Topology::torus(5, 5), 12, &[BreedId::TURTLES], &mut rng);

    // Radius 12 on a 5x5 torus: every turtle is visible in several copies.
    let result = world.in_cone(TurtleId(0), &SourceSet::AllTurtles, 12.0, 360.0, true).unwrap();

    let mut unique = sorted(result.clone());
    unique.dedup();
    assert_eq!(unique.len(), result.len(), "a turtle was reported twice");
    assert_eq!(result.len(), 12);
}

#[test]
fn test_full_cone_matches_radius_query() {
    let mut rng = fastrand::Rng::with_seed(77);
    for topology in [Topology::torus(15, 11), Topology::new(15, 11, true, false), Topology::bounded(15, 11)] {
        let world = scattered_world(topology, 200, &[BreedId::TURTLES], &mut rng);
        for _ in 0..30 {
            let seer = TurtleId(rng.u64(..200));
            let radius = rng.f64() * 9.0;
            let wrap = rng.bool();
            let cone = world.in_cone(seer, &SourceSet::AllTurtles, radius, 360.0, wrap).unwrap();
            let circle = world
                .in_radius(AgentRef::Turtle(seer), &SourceSet::AllTurtles, radius, wrap)
                .unwrap();
            assert_eq!(sorted(cone), sorted(circle), "seer {seer:?} r={radius} wrap={wrap}");
        }
    }
}

#[test]
fn test_cone_breed_filter() {
    let mut world = PatchWorld::new(Topology::torus(10, 10));
    let wolves = world.register_breed("wolves");
    let sheep = world.register_breed("sheep");
    let seer = world.spawn_turtle(5.0, 5.0, 0.0, wolves).unwrap();
    let sheep_ahead = world.spawn_turtle(5.0, 6.5, 0.0, sheep).unwrap();
    world.spawn_turtle(5.1, 6.5, 0.0, wolves).unwrap();
    world.spawn_turtle(5.0, 3.5, 0.0, sheep).unwrap();

    let result = world.in_cone(seer, &SourceSet::Breed(sheep), 3.0, 90.0, true).unwrap();
    assert_eq!(result, vec![AgentRef::Turtle(sheep_ahead)]);
}

#[test]
fn test_cone_unknown_origin() {
    let world = PatchWorld::new(Topology::torus(4, 4));
    assert_eq!(
        world.in_cone(TurtleId(3), &SourceSet::AllTurtles, 1.0, 90.0, true),
        Err(WorldError::UnknownTurtle(TurtleId(3)))
    );
}

#[test]
fn test_world_copies_span() {
    let copies = WorldCopies::new(&Topology::new(10, 4, true, false), 12.0, true);
    assert_eq!(copies.count(), 5, "m = 2 horizontally, n = 0 vertically");
    let offsets: Vec<(f64, f64)> = copies.offsets().collect();
    assert_eq!(offsets.first(), Some(&(-20.0, 0.0)));
    assert_eq!(offsets.last(), Some(&(20.0, 0.0)));

    let none = WorldCopies::new(&Topology::torus(10, 10), 12.0, false);
    assert_eq!(none.count(), 1);
}
