//! End-to-end military coordination tests for landfall_core.
//!
//! These build whole worlds through the shared fixtures and run the
//! full defensive-map-plus-coordinator pass.

use landfall_core::defense::DefensiveMap;
use landfall_core::military::MilitaryCoordinator;
use landfall_core::mission::Mission;
use landfall_core::player::{Colony, ColonyId, PlayerId};
use landfall_core::unit::{Role, UnitId};
use landfall_test_utils::fixtures::{
    coastal_world, open_world, place_unit, tile_at, ARTILLERY, DRAGOON, SOLDIER,
};

// =============================================================================
// Allocation invariants
// =============================================================================

#[test]
fn test_every_military_unit_ends_with_one_mission() {
    let mut world = open_world(20, 20);
    world.add_colony(Colony::new(ColonyId(1), PlayerId(1), tile_at(&world, 4, 4)));
    world.add_colony(Colony::new(ColonyId(2), PlayerId(1), tile_at(&world, 14, 14)));
    place_unit(&mut world, 30, 2, SOLDIER, Role::Soldier, 6, 4);

    let mut expected = Vec::new();
    for (id, (x, y)) in [(1, (4, 4)), (2, (5, 5)), (3, (14, 14)), (4, (10, 10))] {
        place_unit(&mut world, id, 1, DRAGOON, Role::Dragoon, x, y);
        expected.push(UnitId(id));
    }
    for (id, (x, y)) in [(5, (4, 4)), (6, (18, 2)), (7, (2, 18))] {
        place_unit(&mut world, id, 1, ARTILLERY, Role::Artillery, x, y);
        expected.push(UnitId(id));
    }
    for (id, (x, y)) in [(8, (7, 7)), (9, (14, 14))] {
        place_unit(&mut world, id, 1, SOLDIER, Role::Soldier, x, y);
        expected.push(UnitId(id));
    }

    let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
    assert_eq!(missions.len(), expected.len());
    for id in expected {
        assert!(missions.contains_key(&id), "no mission for {id:?}");
    }
}

#[test]
fn test_allocation_is_deterministic() {
    let mut world = open_world(20, 20);
    world.add_colony(Colony::new(ColonyId(1), PlayerId(1), tile_at(&world, 4, 4)));
    world.add_colony(Colony::new(ColonyId(2), PlayerId(1), tile_at(&world, 14, 4)));
    place_unit(&mut world, 30, 2, SOLDIER, Role::Soldier, 6, 4);
    for id in 0..6 {
        place_unit(&mut world, 1 + id, 1, DRAGOON, Role::Dragoon, 8 + id as i32, 10);
    }

    let coordinator = MilitaryCoordinator::new(&world, PlayerId(1));
    let first = coordinator.determine_missions();
    for _ in 0..3 {
        assert_eq!(coordinator.determine_missions(), first);
    }
}

// =============================================================================
// Exposure-driven reinforcement
// =============================================================================

#[test]
fn test_water_exposed_colony_caps_at_two_artillery() {
    let mut world = coastal_world(12, 12);
    // Colony within zone reach of the eastern ocean column.
    world.add_colony(Colony::new(ColonyId(1), PlayerId(1), tile_at(&world, 9, 6)));
    place_unit(&mut world, 1, 1, ARTILLERY, Role::Artillery, 9, 6);
    place_unit(&mut world, 2, 1, ARTILLERY, Role::Artillery, 7, 6);
    place_unit(&mut world, 3, 1, ARTILLERY, Role::Artillery, 3, 3);

    let map = DefensiveMap::create(&world, PlayerId(1));
    assert!(map.zone(ColonyId(1)).unwrap().exposed_water);

    let missions =
        MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions_with(&map);
    let defending = missions
        .values()
        .filter(|m| **m == Mission::DefendColony(ColonyId(1)))
        .count();
    assert_eq!(defending, 2);
    // The third gun has nothing left to do.
    assert_eq!(missions[&UnitId(3)], Mission::Wander);
}

#[test]
fn test_dragoons_cover_land_exposed_colony() {
    let mut world = open_world(20, 20);
    world.add_colony(Colony::new(ColonyId(1), PlayerId(1), tile_at(&world, 10, 10)));
    place_unit(&mut world, 1, 1, ARTILLERY, Role::Artillery, 10, 10);
    for id in 2..=4 {
        place_unit(&mut world, id, 1, DRAGOON, Role::Dragoon, 10 + id as i32, 10);
    }

    let map = DefensiveMap::create(&world, PlayerId(1));
    assert!(map.zone(ColonyId(1)).unwrap().exposed_land);

    let missions =
        MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions_with(&map);
    let dragoons_defending = [2, 3, 4]
        .iter()
        .filter(|id| missions[&UnitId(**id)] == Mission::DefendColony(ColonyId(1)))
        .count();
    // One for the garrison minimum plus the land-exposure cap of two.
    assert_eq!(dragoons_defending, 2);
}

// =============================================================================
// Counter-attack sweeps
// =============================================================================

#[test]
fn test_counter_attack_prefers_exposed_noncombatants() {
    let mut world = open_world(20, 20);
    world.add_colony(Colony::new(ColonyId(1), PlayerId(1), tile_at(&world, 10, 10)));
    // Full garrison so the free dragoon survives the minimum steps.
    place_unit(&mut world, 1, 1, ARTILLERY, Role::Artillery, 10, 10);
    place_unit(&mut world, 2, 1, DRAGOON, Role::Dragoon, 10, 10);

    // Two enemies in the zone: an armed soldier and a helpless wagon
    // escorted by nobody. Only one free dragoon is in reach of both.
    place_unit(&mut world, 20, 2, SOLDIER, Role::Soldier, 12, 10);
    let wagon = place_unit(
        &mut world,
        21,
        2,
        landfall_test_utils::fixtures::COLONIST,
        Role::Civilian,
        12,
        12,
    );
    place_unit(&mut world, 3, 1, DRAGOON, Role::Dragoon, 13, 11);

    let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
    assert_eq!(missions[&UnitId(3)], Mission::SeekAndDestroy(wagon));
}
