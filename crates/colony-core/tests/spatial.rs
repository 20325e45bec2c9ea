use std::collections::BTreeMap;

use colony_core::{
    BodyId, DeterministicRng, SpatialView, Target, TickContext, Vec3, VoxelCoord, WorldView,
};

#[derive(Default)]
struct TestWorld {
    agents: BTreeMap<u64, Vec3>,
    bodies: BTreeMap<BodyId, Vec3>,
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl SpatialView for TestWorld {
    fn position(&self, agent: u64) -> Option<Vec3> {
        self.agents.get(&agent).copied()
    }

    fn is_alive(&self, agent: u64) -> bool {
        self.agents.contains_key(&agent)
    }

    fn body_position(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(&body).copied()
    }

    fn is_voxel_solid(&self, voxel: VoxelCoord) -> bool {
        voxel.y < 0
    }
}

#[test]
fn target_validity_follows_existence() {
    let mut world = TestWorld::default();
    world.agents.insert(1, Vec3::ZERO);
    world.bodies.insert(BodyId(10), Vec3::new(3.0, 0.0, 4.0));

    assert!(world.is_target_valid(Target::Agent(1)));
    assert!(!world.is_target_valid(Target::Agent(2)));
    assert!(world.is_target_valid(Target::Body(BodyId(10))));
    assert!(!world.is_target_valid(Target::Body(BodyId(11))));
    assert!(world.is_target_valid(Target::Voxel(VoxelCoord::new(0, -1, 0))));
    assert!(!world.is_target_valid(Target::Voxel(VoxelCoord::new(0, 1, 0))));
}

#[test]
fn distance_to_uses_target_positions() {
    let mut world = TestWorld::default();
    world.agents.insert(1, Vec3::ZERO);
    world.bodies.insert(BodyId(10), Vec3::new(3.0, 0.0, 4.0));

    assert_eq!(world.distance_to(1, Target::Body(BodyId(10))), Some(5.0));
    assert_eq!(world.distance_to(2, Target::Body(BodyId(10))), None);
}

#[test]
fn step_towards_never_overshoots() {
    let from = Vec3::ZERO;
    let goal = Vec3::new(10.0, 0.0, 0.0);

    assert_eq!(from.step_towards(goal, 4.0), Vec3::new(4.0, 0.0, 0.0));
    assert_eq!(from.step_towards(goal, 40.0), goal);
}

#[test]
fn agent_rng_is_deterministic_per_tick_and_agent() {
    let ctx = TickContext::new(3, 0.1, 42);
    let a = ctx.rng_for_agent(7u64, 1).next_u64();
    let b = ctx.rng_for_agent(7u64, 1).next_u64();
    let c = ctx.rng_for_agent(8u64, 1).next_u64();

    assert_eq!(a, b);
    assert_ne!(a, c);
}
