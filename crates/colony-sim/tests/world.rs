use colony_core::{SpatialMut, SpatialView, Target, Vec3, VoxelCoord};
use colony_creatures::{
    CombatWorld, EntityFactory, EnvoyId, FactionMut, FactionView, PartyId, Relationship,
    SpawnError, StatsView, VoxelWorld,
};
use colony_sim::{KindRegistry, ScenarioConfig, SimWorld};

fn world(max_entities: usize) -> SimWorld {
    let registry = KindRegistry::from_config(&ScenarioConfig::skirmish().kinds).unwrap();
    SimWorld::new(registry, max_entities)
}

#[test]
fn spawn_rejects_unknown_kind_full_world_and_bad_position() {
    let mut w = world(1);
    assert_eq!(
        w.spawn("dragon", Vec3::ZERO),
        Err(SpawnError::UnknownKind("dragon".to_owned()))
    );
    assert!(matches!(
        w.spawn("dwarf", Vec3::new(f32::NAN, 0.0, 0.0)),
        Err(SpawnError::InvalidPosition { .. })
    ));
    let first = w.spawn("dwarf", Vec3::ZERO).unwrap();
    assert_eq!(
        w.spawn("dwarf", Vec3::ZERO),
        Err(SpawnError::NoFreeSlot { limit: 1 })
    );
    assert_eq!(w.take_spawned(), vec![first]);
    assert!(w.take_spawned().is_empty());
}

#[test]
fn dead_entities_free_their_slot_once_removed() {
    let mut w = world(1);
    let a = w.spawn("dwarf", Vec3::ZERO).unwrap();
    w.kill(a);
    assert!(!w.is_alive(a));
    assert_eq!(w.position(a), None);
    assert_eq!(w.remove_dead(), vec![a]);
    assert!(w.entity(a).is_none());
    assert!(w.spawn("dwarf", Vec3::ZERO).is_ok());
    assert_eq!(w.spawned_count("dwarf"), 2);
}

#[test]
fn relationships_are_symmetric_and_kin_is_friendly() {
    let mut w = world(8);
    let undead = w.add_faction("undead");
    let dwarves = w.add_faction("dwarves");
    let elves = w.add_faction("elves");
    assert_eq!(w.add_faction("undead"), undead);

    w.set_relationship(dwarves, undead, Relationship::Hateful);
    assert_eq!(w.relationship(undead, dwarves), Relationship::Hateful);
    assert_eq!(w.relationship(dwarves, undead), Relationship::Hateful);
    assert_eq!(w.relationship(undead, undead), Relationship::Friendly);
    assert_eq!(w.relationship(undead, elves), Relationship::Neutral);
    assert_eq!(w.hateful_factions(undead), vec![dwarves]);
    assert_eq!(w.faction_name(elves), Some("elves"));
}

#[test]
fn minions_follow_faction_changes() {
    let mut w = world(8);
    let undead = w.add_faction("undead");
    let dwarves = w.add_faction("dwarves");
    let a = w.add_creature("dwarf", dwarves, Vec3::ZERO).unwrap();
    let b = w.add_creature("skeleton", undead, Vec3::ZERO).unwrap();
    assert_eq!(w.minions(dwarves), vec![a]);

    w.set_faction(a, undead);
    assert_eq!(w.minions(undead), vec![a, b]);
    assert!(w.minions(dwarves).is_empty());

    w.join_party(PartyId(4), b);
    assert_eq!(w.party_of(b), Some(PartyId(4)));
    assert_eq!(w.party_of(a), None);

    w.join_envoy(EnvoyId(2), a);
    assert_eq!(w.envoy_of(a), Some(EnvoyId(2)));
    assert_eq!(w.envoy_of(b), None);
}

#[test]
fn graves_belong_to_their_faction_and_can_be_destroyed() {
    let mut w = world(8);
    let undead = w.add_faction("undead");
    let dwarves = w.add_faction("dwarves");
    let grave = w.add_grave(dwarves, Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(w.graves(dwarves), vec![grave]);
    assert!(w.graves(undead).is_empty());
    assert!(w.is_target_valid(Target::Body(grave)));

    assert!(w.destroy_body(grave));
    assert!(!w.destroy_body(grave));
    assert!(!w.is_target_valid(Target::Body(grave)));
}

#[test]
fn digging_wears_down_and_clears_designation() {
    let mut w = world(8);
    let v = VoxelCoord::new(2, 0, 0);
    assert!(!w.designate_dig(v), "air cannot be designated");

    w.add_voxel(v, 10.0);
    assert!(w.designate_dig(v));
    assert!(!w.designate_dig(v));
    assert_eq!(w.take_new_designations(), vec![v]);

    assert!(!w.dig(v, 4.0));
    assert_eq!(w.voxel_hp(v), Some(6.0));
    assert!(w.dig(v, 6.0));
    assert!(!w.is_voxel_solid(v));
    assert!(!w.is_dig_designated(v));
    assert!(w.dig(v, 1.0));
}

#[test]
fn strikes_kill_at_zero_health() {
    let mut w = world(8);
    let f = w.add_faction("dwarves");
    let a = w.add_creature("skeleton", f, Vec3::ZERO).unwrap();
    let b = w.add_creature("skeleton", f, Vec3::ZERO).unwrap();

    assert!(!w.strike(a, b, 20.0));
    assert!(w.is_alive(b));
    assert!(w.strike(a, b, 10.0));
    assert!(!w.is_alive(b));
    assert!(!w.strike(a, b, 10.0));
}

#[test]
fn stats_come_from_the_kind_table() {
    let mut w = world(8);
    let f = w.add_faction("dwarves");
    let a = w.add_creature("dwarf", f, Vec3::ZERO).unwrap();
    let stats = w.stats(a).unwrap();
    assert_eq!(stats.dig_rate, 12.0);
    assert_eq!(stats.speed, 2.0);

    w.set_position(a, Vec3::new(3.0, 0.0, 4.0));
    assert_eq!(w.distance_to(a, Target::Point(Vec3::ZERO)), Some(5.0));
}
