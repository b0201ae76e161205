//! The military coordinator: greedy mission allocation for one player.
//!
//! A strictly ordered, non-backtracking pipeline over three disjoint
//! partitions of the player's military units (artillery, dragoons,
//! everything else) and the colony lists derived from the
//! [`DefensiveMap`]. The step order is the algorithm: later steps only
//! see leftover units, so reordering changes the result. Every unit
//! entering the pass leaves with exactly one mission.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::cost;
use crate::defense::DefensiveMap;
use crate::map::TileId;
use crate::mission::Mission;
use crate::player::{ColonyId, PlayerId};
use crate::unit::{Role, UnitId};
use crate::world::World;

/// Artillery ceiling for threatened colonies.
const THREATENED_ARTILLERY: i32 = 3;
/// Artillery ceiling for water-exposed colonies.
const WATER_EXPOSED_ARTILLERY: i32 = 2;
/// Dragoon ceiling for land-exposed colonies.
const LAND_EXPOSED_DRAGOONS: i32 = 2;

/// Plans missions for one player's military units.
pub struct MilitaryCoordinator<'a> {
    world: &'a World,
    player: PlayerId,
}

/// Working state threaded through the allocation steps.
struct Allocation {
    missions: BTreeMap<UnitId, Mission>,
    artillery: BTreeSet<UnitId>,
    dragoons: BTreeSet<UnitId>,
    others: BTreeSet<UnitId>,
    /// Artillery assigned to defend each colony so far.
    artillery_at: BTreeMap<ColonyId, i32>,
    /// Dragoons assigned to defend each colony so far.
    dragoons_at: BTreeMap<ColonyId, i32>,
    /// Others assigned to defend each colony so far.
    others_at: BTreeMap<ColonyId, i32>,
    /// Dragoons already committed per enemy target.
    engaged: BTreeMap<UnitId, i32>,
}

impl Allocation {
    fn defenders_at(&self, colony: ColonyId) -> i32 {
        self.artillery_at.get(&colony).copied().unwrap_or(0)
            + self.dragoons_at.get(&colony).copied().unwrap_or(0)
            + self.others_at.get(&colony).copied().unwrap_or(0)
    }

    fn count(map: &BTreeMap<ColonyId, i32>, colony: ColonyId) -> i32 {
        map.get(&colony).copied().unwrap_or(0)
    }
}

/// The unit partition a defender was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arm {
    Artillery,
    Dragoon,
    Other,
}

impl<'a> MilitaryCoordinator<'a> {
    /// Create a coordinator for one player.
    #[must_use]
    pub const fn new(world: &'a World, player: PlayerId) -> Self {
        Self { world, player }
    }

    /// Run the full allocation pass and return one mission per unit.
    #[must_use]
    pub fn determine_missions(&self) -> BTreeMap<UnitId, Mission> {
        let map = DefensiveMap::create(self.world, self.player);
        self.determine_missions_with(&map)
    }

    /// Run the allocation pass against a prebuilt defensive map.
    #[must_use]
    pub fn determine_missions_with(&self, map: &DefensiveMap) -> BTreeMap<UnitId, Mission> {
        let mut alloc = self.partition_units();
        let total = alloc.artillery.len() + alloc.dragoons.len() + alloc.others.len();

        self.lock_attacked_artillery(&mut alloc, map);
        self.ensure_garrison_minimums(&mut alloc, map);
        self.lock_other_garrisons(&mut alloc);
        self.reinforce_exposed(&mut alloc, map);
        self.counter_attack(&mut alloc, map);
        self.relock_and_cover_land(&mut alloc, map);
        self.assign_leftover_others(&mut alloc, map);
        self.assign_wander(&mut alloc);

        debug!(
            player = self.player.0,
            units = total,
            missions = alloc.missions.len(),
            "military missions determined"
        );
        alloc.missions
    }

    /// Partition the player's military units by role.
    fn partition_units(&self) -> Allocation {
        let mut alloc = Allocation {
            missions: BTreeMap::new(),
            artillery: BTreeSet::new(),
            dragoons: BTreeSet::new(),
            others: BTreeSet::new(),
            artillery_at: BTreeMap::new(),
            dragoons_at: BTreeMap::new(),
            others_at: BTreeMap::new(),
            engaged: BTreeMap::new(),
        };
        for unit in self.world.units.values() {
            if unit.owner != self.player || !unit.role.is_military() {
                continue;
            }
            match unit.role {
                Role::Artillery => alloc.artillery.insert(unit.id),
                Role::Dragoon => alloc.dragoons.insert(unit.id),
                _ => alloc.others.insert(unit.id),
            };
        }
        alloc
    }

    /// Step 1: artillery already garrisoning an attacked colony stays.
    fn lock_attacked_artillery(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        for colony_id in map.attacked_colonies() {
            let Some(tile) = self.colony_tile(colony_id) else {
                continue;
            };
            let present: Vec<UnitId> = alloc
                .artillery
                .iter()
                .copied()
                .filter(|id| self.unit_tile(*id) == Some(tile))
                .collect();
            for id in present {
                self.assign_defend(alloc, id, colony_id, Arm::Artillery);
            }
        }
    }

    /// Step 2: one dragoon in every attacked colony, then at least one
    /// defender in every colony, then full artillery-plus-dragoon
    /// minimums where units remain.
    fn ensure_garrison_minimums(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        for colony_id in map.attacked_colonies() {
            if Allocation::count(&alloc.dragoons_at, colony_id) == 0 {
                self.import_defender(alloc, colony_id, Arm::Dragoon);
            }
        }
        let all: Vec<ColonyId> = map.zones().map(|z| z.colony).collect();
        for &colony_id in &all {
            if alloc.defenders_at(colony_id) == 0 {
                if !self.import_defender(alloc, colony_id, Arm::Artillery) {
                    self.import_defender(alloc, colony_id, Arm::Dragoon);
                }
            }
        }
        for &colony_id in &all {
            if Allocation::count(&alloc.artillery_at, colony_id) == 0 {
                self.import_defender(alloc, colony_id, Arm::Artillery);
            }
            if Allocation::count(&alloc.dragoons_at, colony_id) == 0 {
                self.import_defender(alloc, colony_id, Arm::Dragoon);
            }
        }
    }

    /// Step 3: plain infantry already in a colony is never withdrawn.
    fn lock_other_garrisons(&self, alloc: &mut Allocation) {
        let garrison: Vec<(UnitId, ColonyId)> = alloc
            .others
            .iter()
            .copied()
            .filter_map(|id| {
                let tile = self.unit_tile(id)?;
                let colony = self.world.tile(tile)?.settlement?;
                let owned = self
                    .world
                    .colony(colony)
                    .is_some_and(|c| c.owner == self.player);
                owned.then_some((id, colony))
            })
            .collect();
        for (id, colony) in garrison {
            self.assign_defend(alloc, id, colony, Arm::Other);
        }
    }

    /// Step 4: artillery up to 3 in threatened colonies, up to 2 in
    /// water-exposed ones.
    fn reinforce_exposed(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        for colony_id in map.threatened_colonies() {
            while Allocation::count(&alloc.artillery_at, colony_id) < THREATENED_ARTILLERY {
                if !self.import_defender(alloc, colony_id, Arm::Artillery) {
                    break;
                }
            }
        }
        for colony_id in map.water_exposed_colonies() {
            while Allocation::count(&alloc.artillery_at, colony_id) < WATER_EXPOSED_ARTILLERY {
                if !self.import_defender(alloc, colony_id, Arm::Artillery) {
                    break;
                }
            }
        }
    }

    /// Step 5: counter-attacks with the remaining dragoons.
    ///
    /// For each attacked zone, sweep priority targets (exposed
    /// non-combatants, and artillery which draws two attackers) at turn
    /// radii 0 and 1, then every remaining enemy at radii 1 and 2.
    /// Engaged enemies are not double-targeted beyond their quota.
    fn counter_attack(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        for radius in [0, 1] {
            for colony_id in map.attacked_colonies() {
                let targets = self.zone_enemies(map, colony_id, true);
                self.engage_targets(alloc, &targets, radius);
            }
        }
        for radius in [1, 2] {
            for colony_id in map.attacked_colonies() {
                let targets = self.zone_enemies(map, colony_id, false);
                self.engage_targets(alloc, &targets, radius);
            }
        }
    }

    /// Step 6: re-lock dragoons into threatened colonies and artillery
    /// into threatened and exposed ones, then cover land-exposed
    /// colonies with up to 2 dragoons each.
    fn relock_and_cover_land(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        for colony_id in map.threatened_colonies() {
            self.relock_present(alloc, colony_id, Arm::Dragoon);
            self.relock_present(alloc, colony_id, Arm::Artillery);
        }
        let exposed: BTreeSet<ColonyId> = map
            .water_exposed_colonies()
            .into_iter()
            .chain(map.land_exposed_colonies())
            .collect();
        for colony_id in exposed {
            self.relock_present(alloc, colony_id, Arm::Artillery);
        }
        for colony_id in map.land_exposed_colonies() {
            while Allocation::count(&alloc.dragoons_at, colony_id) < LAND_EXPOSED_DRAGOONS {
                if !self.import_defender(alloc, colony_id, Arm::Dragoon) {
                    break;
                }
            }
        }
    }

    /// Step 7: leftover infantry defends the closest colony it can
    /// reach.
    fn assign_leftover_others(&self, alloc: &mut Allocation, map: &DefensiveMap) {
        let colonies: Vec<ColonyId> = {
            let needy: Vec<ColonyId> = map
                .zones()
                .filter(|z| z.is_threatened() || z.exposed_water || z.exposed_land)
                .map(|z| z.colony)
                .collect();
            if needy.is_empty() {
                map.zones().map(|z| z.colony).collect()
            } else {
                needy
            }
        };
        let leftover: Vec<UnitId> = alloc.others.iter().copied().collect();
        for id in leftover {
            let mut best: Option<(i32, ColonyId)> = None;
            for &colony_id in &colonies {
                let Some(tile) = self.colony_tile(colony_id) else {
                    continue;
                };
                if let Some(turns) = self.turns_to_reach(id, tile) {
                    let key = (turns, colony_id);
                    if best.map_or(true, |b| key < b) {
                        best = Some(key);
                    }
                }
            }
            if let Some((_, colony_id)) = best {
                self.assign_defend(alloc, id, colony_id, Arm::Other);
            }
        }
    }

    /// Step 8: everything still unassigned wanders toward hostiles.
    fn assign_wander(&self, alloc: &mut Allocation) {
        let leftovers: Vec<UnitId> = alloc
            .artillery
            .iter()
            .chain(alloc.dragoons.iter())
            .chain(alloc.others.iter())
            .copied()
            .collect();
        for id in leftovers {
            alloc.missions.insert(id, Mission::Wander);
        }
        alloc.artillery.clear();
        alloc.dragoons.clear();
        alloc.others.clear();
    }

    /// Lock every pooled unit of one arm standing on a colony's tile
    /// into its defense.
    fn relock_present(&self, alloc: &mut Allocation, colony: ColonyId, arm: Arm) {
        let Some(tile) = self.colony_tile(colony) else {
            return;
        };
        let pool = match arm {
            Arm::Artillery => &alloc.artillery,
            Arm::Dragoon => &alloc.dragoons,
            Arm::Other => &alloc.others,
        };
        let present: Vec<UnitId> = pool
            .iter()
            .copied()
            .filter(|id| self.unit_tile(*id) == Some(tile))
            .collect();
        for id in present {
            self.assign_defend(alloc, id, colony, arm);
        }
    }

    fn assign_defend(&self, alloc: &mut Allocation, id: UnitId, colony: ColonyId, arm: Arm) {
        let (pool, tally) = match arm {
            Arm::Artillery => (&mut alloc.artillery, &mut alloc.artillery_at),
            Arm::Dragoon => (&mut alloc.dragoons, &mut alloc.dragoons_at),
            Arm::Other => (&mut alloc.others, &mut alloc.others_at),
        };
        if pool.remove(&id) {
            *tally.entry(colony).or_insert(0) += 1;
            alloc.missions.insert(id, Mission::DefendColony(colony));
        }
    }

    /// Pick one defender for a colony: a unit already standing on the
    /// colony tile wins, otherwise the closest by (turns, unit id).
    fn import_defender(&self, alloc: &mut Allocation, colony: ColonyId, arm: Arm) -> bool {
        let Some(target) = self.colony_tile(colony) else {
            return false;
        };
        let pool = match arm {
            Arm::Artillery => &alloc.artillery,
            Arm::Dragoon => &alloc.dragoons,
            Arm::Other => &alloc.others,
        };
        let present = pool
            .iter()
            .copied()
            .find(|id| self.unit_tile(*id) == Some(target));
        let chosen = present.or_else(|| {
            let mut best: Option<(i32, UnitId)> = None;
            for &id in pool {
                if let Some(turns) = self.turns_to_reach(id, target) {
                    let key = (turns, id);
                    if best.map_or(true, |b| key < b) {
                        best = Some(key);
                    }
                }
            }
            best.map(|(_, id)| id)
        });
        match chosen {
            Some(id) => {
                self.assign_defend(alloc, id, colony, arm);
                true
            }
            None => false,
        }
    }

    /// The not-yet-fully-engaged enemies of one zone, in recorded order.
    fn zone_enemies(
        &self,
        map: &DefensiveMap,
        colony: ColonyId,
        priority_only: bool,
    ) -> Vec<UnitId> {
        let Some(zone) = map.zone(colony) else {
            return Vec::new();
        };
        zone.enemy_units
            .iter()
            .copied()
            .filter(|id| !priority_only || self.is_priority_target(*id))
            .collect()
    }

    /// Priority targets: enemy artillery, and units that cannot fight
    /// back, caught outside any settlement.
    fn is_priority_target(&self, id: UnitId) -> bool {
        let Some(unit) = self.world.unit(id) else {
            return false;
        };
        let unsettled = unit
            .tile()
            .and_then(|t| self.world.tile(t))
            .is_some_and(|t| t.settlement.is_none());
        if !unsettled {
            return false;
        }
        unit.role == Role::Artillery
            || !self
                .world
                .unit_type_of(unit)
                .is_some_and(|ut| ut.offensive)
    }

    /// Send dragoons at each target reachable within the radius.
    fn engage_targets(&self, alloc: &mut Allocation, targets: &[UnitId], radius: i32) {
        for &target_id in targets {
            let quota = if self
                .world
                .unit(target_id)
                .is_some_and(|u| u.role == Role::Artillery)
            {
                2
            } else {
                1
            };
            while alloc.engaged.get(&target_id).copied().unwrap_or(0) < quota {
                let Some(target_tile) = self.world.unit(target_id).and_then(|u| u.tile())
                else {
                    break;
                };
                let mut best: Option<(i32, UnitId)> = None;
                for &id in &alloc.dragoons {
                    if let Some(turns) = self.turns_to_reach(id, target_tile) {
                        if turns <= radius {
                            let key = (turns, id);
                            if best.map_or(true, |b| key < b) {
                                best = Some(key);
                            }
                        }
                    }
                }
                let Some((_, dragoon)) = best else {
                    break;
                };
                alloc.dragoons.remove(&dragoon);
                *alloc.engaged.entry(target_id).or_insert(0) += 1;
                alloc
                    .missions
                    .insert(dragoon, Mission::SeekAndDestroy(target_id));
            }
        }
    }

    /// Turns for a pooled unit to reach a tile, landmass-matched.
    fn turns_to_reach(&self, id: UnitId, target: TileId) -> Option<i32> {
        let unit = self.world.unit(id)?;
        let from = unit.tile()?;
        if !self.same_landmass(from, target) {
            return None;
        }
        if from == target {
            return Some(0);
        }
        let decider = cost::for_unit(self.world, unit);
        let path = self.world.find_path(unit, from, target, decider.as_ref())?;
        Some(path.turns)
    }

    fn same_landmass(&self, a: TileId, b: TileId) -> bool {
        match (self.world.tile(a), self.world.tile(b)) {
            (Some(ta), Some(tb)) => ta.contiguity == tb.contiguity,
            _ => false,
        }
    }

    fn colony_tile(&self, colony: ColonyId) -> Option<TileId> {
        self.world.colony(colony).map(|c| c.tile)
    }

    fn unit_tile(&self, id: UnitId) -> Option<TileId> {
        self.world.unit(id).and_then(|u| u.tile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TileType, TileTypeId, UnitType, UnitTypeId};
    use crate::map::Map;
    use crate::player::{Colony, Player, Stance};
    use crate::unit::Unit;

    const PLAINS: TileTypeId = TileTypeId(1);
    const SOLDIER_T: UnitTypeId = UnitTypeId(1);
    const DRAGOON_T: UnitTypeId = UnitTypeId(2);
    const ARTILLERY_T: UnitTypeId = UnitTypeId(3);
    const WAGON_T: UnitTypeId = UnitTypeId(4);

    fn test_world(width: u32, height: u32) -> World {
        let mut catalog = Catalog::new();
        catalog.register_tile_type(TileType::land(PLAINS, "Plains", 3));
        catalog.register_unit_type(UnitType::land(SOLDIER_T, "Soldier", 3).offensive());
        catalog.register_unit_type(UnitType::land(DRAGOON_T, "Dragoon", 12).offensive());
        catalog.register_unit_type(
            UnitType::land(ARTILLERY_T, "Artillery", 3).offensive().bombarding(),
        );
        catalog.register_unit_type(UnitType::land(WAGON_T, "Wagon train", 6));

        let mut world = World::new(catalog, Map::new(width, height, PLAINS));
        let mut p1 = Player::new(PlayerId(1));
        let mut p2 = Player::new(PlayerId(2));
        p1.stances.insert(PlayerId(2), Stance::War);
        p2.stances.insert(PlayerId(1), Stance::War);
        for tile in world.map.all_tiles() {
            p1.explored.insert(tile);
            p2.explored.insert(tile);
        }
        world.add_player(p1);
        world.add_player(p2);
        world
    }

    fn place(world: &mut World, id: u32, owner: u32, kind: UnitTypeId, role: Role, x: i32, y: i32) {
        let tile = world.map.tile_at(x, y).unwrap();
        let moves = world.catalog.unit_type(kind).unwrap().base_moves;
        world.add_unit(Unit::new(UnitId(id), PlayerId(owner), kind, tile, moves).with_role(role));
    }

    #[test]
    fn test_every_unit_gets_exactly_one_mission() {
        let mut world = test_world(12, 12);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(3, 3).unwrap(),
        ));
        place(&mut world, 1, 1, ARTILLERY_T, Role::Artillery, 3, 3);
        place(&mut world, 2, 1, DRAGOON_T, Role::Dragoon, 5, 5);
        place(&mut world, 3, 1, SOLDIER_T, Role::Soldier, 8, 8);
        place(&mut world, 4, 1, DRAGOON_T, Role::Dragoon, 10, 10);
        // A civilian must not enter the allocation at all.
        place(&mut world, 5, 1, WAGON_T, Role::Civilian, 6, 6);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions.len(), 4);
        for id in [1, 2, 3, 4] {
            assert!(missions.contains_key(&UnitId(id)));
        }
        assert!(!missions.contains_key(&UnitId(5)));
    }

    #[test]
    fn test_attacked_colony_keeps_its_artillery() {
        let mut world = test_world(12, 12);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(3, 3).unwrap(),
        ));
        place(&mut world, 1, 1, ARTILLERY_T, Role::Artillery, 3, 3);
        // Enemy soldier inside the zone makes the colony attacked.
        place(&mut world, 9, 2, SOLDIER_T, Role::Soldier, 5, 3);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(1)], Mission::DefendColony(ColonyId(1)));
    }

    #[test]
    fn test_two_colony_scenario_splits_the_pair() {
        // Colony A is attacked, colony B is isolated; one artillery and
        // one dragoon available. The dragoon covers A, the artillery
        // covers B, and nobody is left to wander.
        let mut world = test_world(24, 12);
        let a_tile = world.map.tile_at(4, 4).unwrap();
        let b_tile = world.map.tile_at(19, 4).unwrap();
        world.add_colony(Colony::new(ColonyId(1), PlayerId(1), a_tile));
        world.add_colony(Colony::new(ColonyId(2), PlayerId(1), b_tile));
        place(&mut world, 9, 2, SOLDIER_T, Role::Soldier, 7, 4);

        place(&mut world, 1, 1, DRAGOON_T, Role::Dragoon, 5, 5);
        place(&mut world, 2, 1, ARTILLERY_T, Role::Artillery, 16, 4);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(1)], Mission::DefendColony(ColonyId(1)));
        assert_eq!(missions[&UnitId(2)], Mission::DefendColony(ColonyId(2)));
        assert!(!missions.values().any(|m| *m == Mission::Wander));
    }

    #[test]
    fn test_garrison_infantry_is_never_withdrawn() {
        let mut world = test_world(12, 12);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(3, 3).unwrap(),
        ));
        world.add_colony(Colony::new(
            ColonyId(2),
            PlayerId(1),
            world.map.tile_at(9, 9).unwrap(),
        ));
        place(&mut world, 1, 1, SOLDIER_T, Role::Soldier, 3, 3);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(1)], Mission::DefendColony(ColonyId(1)));
    }

    #[test]
    fn test_counter_attack_targets_exposed_artillery_twice() {
        let mut world = test_world(16, 16);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(8, 8).unwrap(),
        ));
        // Garrison so the minimum steps don't consume the dragoons.
        place(&mut world, 1, 1, ARTILLERY_T, Role::Artillery, 8, 8);
        place(&mut world, 2, 1, DRAGOON_T, Role::Dragoon, 8, 8);
        // Exposed enemy artillery two tiles out.
        place(&mut world, 9, 2, ARTILLERY_T, Role::Artillery, 10, 8);
        // Two free dragoons in reach.
        place(&mut world, 3, 1, DRAGOON_T, Role::Dragoon, 9, 9);
        place(&mut world, 4, 1, DRAGOON_T, Role::Dragoon, 11, 8);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(3)], Mission::SeekAndDestroy(UnitId(9)));
        assert_eq!(missions[&UnitId(4)], Mission::SeekAndDestroy(UnitId(9)));
    }

    #[test]
    fn test_exposed_colony_keeps_surplus_artillery() {
        // On a map larger than the zone radius the lone colony is
        // land-exposed; a second gun on its tile must stay, not wander.
        let mut world = test_world(16, 16);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(8, 8).unwrap(),
        ));
        place(&mut world, 1, 1, ARTILLERY_T, Role::Artillery, 8, 8);
        place(&mut world, 2, 1, ARTILLERY_T, Role::Artillery, 8, 8);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(1)], Mission::DefendColony(ColonyId(1)));
        assert_eq!(missions[&UnitId(2)], Mission::DefendColony(ColonyId(1)));
        assert!(!missions.values().any(|m| *m == Mission::Wander));
    }

    #[test]
    fn test_unreachable_units_wander() {
        let mut world = test_world(12, 12);
        world.add_colony(Colony::new(
            ColonyId(1),
            PlayerId(1),
            world.map.tile_at(3, 3).unwrap(),
        ));
        // A different landmass: the dragoon cannot serve any colony.
        for tile in world.map.all_tiles() {
            world.map.tile_mut(tile).unwrap().contiguity = 1;
        }
        let far = world.map.tile_at(10, 10).unwrap();
        world.map.tile_mut(far).unwrap().contiguity = 2;
        place(&mut world, 1, 1, DRAGOON_T, Role::Dragoon, 10, 10);

        let missions = MilitaryCoordinator::new(&world, PlayerId(1)).determine_missions();
        assert_eq!(missions[&UnitId(1)], Mission::Wander);
    }
}
