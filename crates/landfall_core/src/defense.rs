//! Defensive zones: per-colony threat assessment for the military
//! coordinator.
//!
//! One zone per colony, grown by a multi-source bounded best-first
//! expansion over land tiles, every frontier priced in tiles. Zones
//! claim tiles exclusively; where two expansions meet, the zones become
//! neighbours and threat visibility propagates across the link.

use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tracing::debug;

use crate::map::TileId;
use crate::player::{ColonyId, PlayerId};
use crate::unit::{Unit, UnitId};
use crate::world::World;

/// Zone radius, in tiles from the colony.
pub const ZONE_SIZE_TURNS: i32 = 3;

/// The threat picture around one colony.
#[derive(Debug, Clone)]
pub struct DefensiveZone {
    /// The colony this zone protects.
    pub colony: ColonyId,
    /// Non-allied units inside the zone, in claim order.
    pub enemy_units: Vec<UnitId>,
    /// Non-allied settlements inside the zone.
    pub enemy_settlements: BTreeSet<ColonyId>,
    /// Whether the zone touches water.
    pub exposed_water: bool,
    /// Whether the zone's reach ran out before covering some direction.
    pub exposed_land: bool,
    /// Zones whose expansions met this one.
    pub neighbours: BTreeSet<ColonyId>,
    /// Whether a neighbour zone holds an offensive-capable enemy.
    pub enemies_in_neighbour: bool,
}

impl DefensiveZone {
    fn new(colony: ColonyId) -> Self {
        Self {
            colony,
            enemy_units: Vec::new(),
            enemy_settlements: BTreeSet::new(),
            exposed_water: false,
            exposed_land: false,
            neighbours: BTreeSet::new(),
            enemies_in_neighbour: false,
        }
    }

    /// Whether enemy units stand inside the zone.
    #[must_use]
    pub fn is_attacked(&self) -> bool {
        !self.enemy_units.is_empty()
    }

    /// Attacked, or bordered by a zone with offensive enemies.
    #[must_use]
    pub fn is_threatened(&self) -> bool {
        self.is_attacked() || self.enemies_in_neighbour
    }
}

/// One frontier entry of the multi-source expansion. Reversed ordering
/// turns the max-heap into a min-heap; ties break by tile id then zone
/// so runs are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneFrontier {
    cost: i32,
    tile: TileId,
    zone: ColonyId,
}

impl Ord for ZoneFrontier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.tile.cmp(&self.tile))
            .then_with(|| other.zone.cmp(&self.zone))
    }
}

impl PartialOrd for ZoneFrontier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// All of one player's defensive zones, plus the tile-to-zone claims.
#[derive(Debug, Clone)]
pub struct DefensiveMap {
    zones: BTreeMap<ColonyId, DefensiveZone>,
    tile_zone: BTreeMap<TileId, ColonyId>,
}

impl DefensiveMap {
    /// Build the defensive map for a player's colonies.
    #[must_use]
    pub fn create(world: &World, player: PlayerId) -> Self {
        let mut zones: BTreeMap<ColonyId, DefensiveZone> = BTreeMap::new();
        let mut tile_zone: BTreeMap<TileId, ColonyId> = BTreeMap::new();
        let Some(owner) = world.player(player) else {
            return Self { zones, tile_zone };
        };

        let mut open: BinaryHeap<ZoneFrontier> = BinaryHeap::new();
        for &colony_id in &owner.colonies {
            let Some(colony) = world.colony(colony_id) else {
                continue;
            };
            zones.insert(colony_id, DefensiveZone::new(colony_id));
            open.push(ZoneFrontier {
                cost: 0,
                tile: colony.tile,
                zone: colony_id,
            });
        }

        while let Some(ZoneFrontier { cost, tile, zone }) = open.pop() {
            if let Some(&claimed) = tile_zone.get(&tile) {
                if claimed != zone {
                    link_zones(&mut zones, claimed, zone);
                }
                continue;
            }
            tile_zone.insert(tile, zone);
            record_occupants(world, owner.id, &mut zones, zone, tile);

            for neighbor in world.map.neighbors(tile) {
                if !world.is_land(neighbor) {
                    if let Some(z) = zones.get_mut(&zone) {
                        z.exposed_water = true;
                    }
                    continue;
                }
                if let Some(&claimed) = tile_zone.get(&neighbor) {
                    if claimed != zone {
                        link_zones(&mut zones, claimed, zone);
                    }
                    continue;
                }
                let next = cost + 1;
                if next > ZONE_SIZE_TURNS {
                    // Reach ran out before covering this direction.
                    if let Some(z) = zones.get_mut(&zone) {
                        z.exposed_land = true;
                    }
                    continue;
                }
                open.push(ZoneFrontier {
                    cost: next,
                    tile: neighbor,
                    zone,
                });
            }
        }

        propagate_neighbour_threat(world, &mut zones);

        debug!(
            player = player.0,
            zones = zones.len(),
            attacked = zones.values().filter(|z| z.is_attacked()).count(),
            "defensive map built"
        );
        Self { zones, tile_zone }
    }

    /// The zone protecting a colony.
    #[must_use]
    pub fn zone(&self, colony: ColonyId) -> Option<&DefensiveZone> {
        self.zones.get(&colony)
    }

    /// All zones, in colony-id order.
    pub fn zones(&self) -> impl Iterator<Item = &DefensiveZone> {
        self.zones.values()
    }

    /// The zone that claimed a tile, if any.
    #[must_use]
    pub fn zone_of_tile(&self, tile: TileId) -> Option<ColonyId> {
        self.tile_zone.get(&tile).copied()
    }

    /// Colonies with enemy units inside their zone.
    #[must_use]
    pub fn attacked_colonies(&self) -> Vec<ColonyId> {
        self.collect(DefensiveZone::is_attacked)
    }

    /// Attacked colonies plus those with offensive enemies next door.
    #[must_use]
    pub fn threatened_colonies(&self) -> Vec<ColonyId> {
        self.collect(DefensiveZone::is_threatened)
    }

    /// Colonies whose zone touches water.
    #[must_use]
    pub fn water_exposed_colonies(&self) -> Vec<ColonyId> {
        self.collect(|z| z.exposed_water)
    }

    /// Colonies whose zone left land uncovered.
    #[must_use]
    pub fn land_exposed_colonies(&self) -> Vec<ColonyId> {
        self.collect(|z| z.exposed_land)
    }

    fn collect(&self, keep: impl Fn(&DefensiveZone) -> bool) -> Vec<ColonyId> {
        self.zones
            .values()
            .filter(|z| keep(z))
            .map(|z| z.colony)
            .collect()
    }
}

fn link_zones(zones: &mut BTreeMap<ColonyId, DefensiveZone>, a: ColonyId, b: ColonyId) {
    if let Some(zone) = zones.get_mut(&a) {
        zone.neighbours.insert(b);
    }
    if let Some(zone) = zones.get_mut(&b) {
        zone.neighbours.insert(a);
    }
}

/// Record non-allied settlements and, on unsettled tiles, non-allied
/// unit occupants of a freshly claimed tile.
fn record_occupants(
    world: &World,
    player: PlayerId,
    zones: &mut BTreeMap<ColonyId, DefensiveZone>,
    zone: ColonyId,
    tile: TileId,
) {
    let Some(viewer) = world.player(player) else {
        return;
    };
    let Some(t) = world.tile(tile) else {
        return;
    };
    if let Some(settlement) = t.settlement {
        let foreign = world
            .colony(settlement)
            .is_some_and(|c| !viewer.stance_toward(c.owner).is_allied());
        if foreign {
            if let Some(z) = zones.get_mut(&zone) {
                z.enemy_settlements.insert(settlement);
            }
        }
        return;
    }
    let hostiles: Vec<UnitId> = world
        .units_on(tile)
        .filter(|u| !viewer.stance_toward(u.owner).is_allied())
        .map(|u| u.id)
        .collect();
    if let Some(z) = zones.get_mut(&zone) {
        z.enemy_units.extend(hostiles);
    }
}

fn is_offensive(world: &World, unit: &Unit) -> bool {
    unit.role.is_military()
        || world.unit_type_of(unit).is_some_and(|ut| ut.offensive)
}

fn propagate_neighbour_threat(world: &World, zones: &mut BTreeMap<ColonyId, DefensiveZone>) {
    let dangerous: BTreeSet<ColonyId> = zones
        .values()
        .filter(|zone| {
            zone.enemy_units
                .iter()
                .filter_map(|id| world.unit(*id))
                .any(|u| is_offensive(world, u))
        })
        .map(|zone| zone.colony)
        .collect();
    for zone in zones.values_mut() {
        zone.enemies_in_neighbour =
            zone.neighbours.iter().any(|n| dangerous.contains(n));
    }
}
