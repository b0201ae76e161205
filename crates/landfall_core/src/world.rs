//! The assembled game state: catalog, map, players, units, colonies.
//!
//! `World` is the context every calculator and search borrows. It owns
//! no behavior beyond lookups, occupancy queries, and single-move
//! classification; the interesting algorithms live in the cost/goal
//! decider, production, and military modules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, UnitType};
use crate::map::{Map, Tile, TileId};
use crate::player::{Colony, ColonyId, Player, PlayerId};
use crate::unit::{MoveType, Unit, UnitId, UnitLocation};

/// The full game state visible to the logic core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Static type definitions.
    pub catalog: Catalog,
    /// The tile graph.
    pub map: Map,
    /// Players indexed by id.
    pub players: BTreeMap<PlayerId, Player>,
    /// Units indexed by id.
    pub units: BTreeMap<UnitId, Unit>,
    /// Colonies indexed by id.
    pub colonies: BTreeMap<ColonyId, Colony>,
}

impl World {
    /// Create a new world from a catalog and a map.
    #[must_use]
    pub fn new(catalog: Catalog, map: Map) -> Self {
        Self {
            catalog,
            map,
            players: BTreeMap::new(),
            units: BTreeMap::new(),
            colonies: BTreeMap::new(),
        }
    }

    /// Register a player.
    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    /// Place a colony on the map, linking tile and owner bookkeeping.
    pub fn add_colony(&mut self, colony: Colony) {
        if let Some(tile) = self.map.tile_mut(colony.tile) {
            tile.settlement = Some(colony.id);
        }
        if let Some(owner) = self.players.get_mut(&colony.owner) {
            owner.colonies.push(colony.id);
        }
        self.colonies.insert(colony.id, colony);
    }

    /// Place a unit in the world, registering tile occupancy.
    pub fn add_unit(&mut self, unit: Unit) {
        if let Some(tile_id) = unit.tile() {
            if let Some(tile) = self.map.tile_mut(tile_id) {
                tile.units.push(unit.id);
            }
        }
        self.units.insert(unit.id, unit);
    }

    /// Get a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Get a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Get a colony by id.
    #[must_use]
    pub fn colony(&self, id: ColonyId) -> Option<&Colony> {
        self.colonies.get(&id)
    }

    /// Get a tile by id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.map.tile(id)
    }

    /// The unit type of a unit, if registered.
    #[must_use]
    pub fn unit_type_of(&self, unit: &Unit) -> Option<&UnitType> {
        self.catalog.unit_type(unit.unit_type)
    }

    /// The movement allowance a unit starts each turn with.
    #[must_use]
    pub fn initial_moves(&self, unit: &Unit) -> i32 {
        self.unit_type_of(unit).map_or(0, |ut| ut.base_moves)
    }

    /// Whether a tile's terrain is land.
    #[must_use]
    pub fn is_land(&self, tile: TileId) -> bool {
        self.tile(tile)
            .and_then(|t| self.catalog.tile_type(t.tile_type))
            .is_some_and(|tt| tt.is_land)
    }

    /// Iterate the units standing on a tile.
    pub fn units_on(&self, tile: TileId) -> impl Iterator<Item = &Unit> {
        let ids = self
            .tile(tile)
            .map(|t| t.units.clone())
            .unwrap_or_default();
        ids.into_iter().filter_map(|id| self.units.get(&id))
    }

    /// The first unit on a tile whose owner `player` is at war with.
    #[must_use]
    pub fn hostile_occupant(&self, player: PlayerId, tile: TileId) -> Option<&Unit> {
        let viewer = self.player(player)?;
        self.units_on(tile)
            .find(|u| viewer.at_war_with(u.owner))
    }

    /// Whether a tile holds units not allied with `player`.
    #[must_use]
    pub fn has_unallied_occupant(&self, player: PlayerId, tile: TileId) -> bool {
        self.player(player).is_some_and(|viewer| {
            self.units_on(tile)
                .any(|u| !viewer.stance_toward(u.owner).is_allied())
        })
    }

    /// Classify the move a unit would execute between two locations.
    ///
    /// Returns [`MoveType::Illegal`] for anything the unit cannot do at
    /// all: unexplored destination, wrong transport mode, naval unit
    /// onto open land, land unit onto water with no carrier.
    #[must_use]
    pub fn move_type(&self, unit: &Unit, from: &UnitLocation, to: &UnitLocation) -> MoveType {
        let Some(unit_type) = self.unit_type_of(unit) else {
            return MoveType::Illegal;
        };
        match (from, to) {
            (UnitLocation::Tile(f), UnitLocation::HighSeasHaven) => {
                self.classify_high_seas(unit_type, *f)
            }
            (UnitLocation::HighSeasHaven, UnitLocation::Tile(t)) => {
                self.classify_high_seas(unit_type, *t)
            }
            (UnitLocation::Carrier(_), UnitLocation::Tile(t)) => {
                self.classify_disembark(unit, unit_type, *t)
            }
            (UnitLocation::Tile(_), UnitLocation::Tile(t)) => {
                self.classify_tile_move(unit, unit_type, *t)
            }
            _ => MoveType::Illegal,
        }
    }

    fn classify_high_seas(&self, unit_type: &UnitType, tile: TileId) -> MoveType {
        let connected = self.tile(tile).is_some_and(|t| t.high_seas);
        if unit_type.naval && unit_type.can_move_high_seas && connected {
            MoveType::HighSeas
        } else {
            MoveType::Illegal
        }
    }

    fn classify_disembark(&self, unit: &Unit, unit_type: &UnitType, to: TileId) -> MoveType {
        if unit_type.naval || !self.is_land(to) {
            return MoveType::Illegal;
        }
        let Some(tile) = self.tile(to) else {
            return MoveType::Illegal;
        };
        if tile.settlement.is_some() || self.has_unallied_occupant(unit.owner, to) {
            return MoveType::Illegal;
        }
        MoveType::Disembark
    }

    fn classify_tile_move(&self, unit: &Unit, unit_type: &UnitType, to: TileId) -> MoveType {
        let Some(tile) = self.tile(to) else {
            return MoveType::Illegal;
        };
        let Some(owner) = self.player(unit.owner) else {
            return MoveType::Illegal;
        };
        if !owner.has_explored(to) {
            return MoveType::Illegal;
        }

        let to_land = self.is_land(to);
        if unit_type.naval {
            return self.classify_naval_move(unit, unit_type, tile, to, to_land);
        }

        if tile.rumour {
            return MoveType::Explore;
        }
        if !to_land {
            // A friendly carrier with room turns this into embarkation.
            let has_carrier = self.units_on(to).any(|u| {
                u.owner == unit.owner
                    && self.unit_type_of(u).is_some_and(|ut| ut.naval)
            });
            return if has_carrier {
                MoveType::Embark
            } else {
                MoveType::Illegal
            };
        }
        if let Some(colony_id) = tile.settlement {
            let Some(colony) = self.colony(colony_id) else {
                return MoveType::Illegal;
            };
            if colony.owner == unit.owner {
                return MoveType::Move;
            }
            return if owner.at_war_with(colony.owner) {
                if unit.role.is_military() {
                    MoveType::Attack
                } else {
                    MoveType::Illegal
                }
            } else {
                MoveType::EnterSettlement
            };
        }
        if self.hostile_occupant(unit.owner, to).is_some() {
            return if unit.role.is_military() && unit_type.offensive {
                MoveType::Attack
            } else {
                MoveType::Illegal
            };
        }
        MoveType::Move
    }

    fn classify_naval_move(
        &self,
        unit: &Unit,
        unit_type: &UnitType,
        tile: &Tile,
        to: TileId,
        to_land: bool,
    ) -> MoveType {
        let Some(owner) = self.player(unit.owner) else {
            return MoveType::Illegal;
        };
        if to_land {
            // Naval units only touch land at a settlement: docking at
            // their own port, or bombarding a hostile one.
            let Some(colony_id) = tile.settlement else {
                return MoveType::Illegal;
            };
            let Some(colony) = self.colony(colony_id) else {
                return MoveType::Illegal;
            };
            if colony.owner == unit.owner {
                return MoveType::Move;
            }
            return if owner.at_war_with(colony.owner) && unit_type.can_bombard {
                MoveType::Attack
            } else {
                MoveType::Illegal
            };
        }
        if self.hostile_occupant(unit.owner, to).is_some() {
            return if unit_type.offensive {
                MoveType::Attack
            } else {
                MoveType::Illegal
            };
        }
        MoveType::Move
    }

    /// The terrain cost of stepping from one tile to another.
    ///
    /// A river corner on both tiles gives land units the cheap river
    /// passage; everything else is the destination terrain's cost.
    #[must_use]
    pub fn terrain_move_cost(&self, unit: &Unit, from: TileId, to: TileId) -> i32 {
        const RIVER_COST: i32 = 1;
        let Some(to_type) = self
            .tile(to)
            .and_then(|t| self.catalog.tile_type(t.tile_type))
        else {
            return i32::MAX;
        };
        let naval = self.unit_type_of(unit).is_some_and(|ut| ut.naval);
        if !naval {
            let river_pair = self.tile(from).is_some_and(|t| t.river)
                && self.tile(to).is_some_and(|t| t.river);
            if river_pair {
                return RIVER_COST;
            }
        }
        to_type.movement_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TileType, TileTypeId, UnitType, UnitTypeId};
    use crate::player::Stance;
    use crate::unit::Role;

    const PLAINS: TileTypeId = TileTypeId(1);
    const OCEAN: TileTypeId = TileTypeId(2);
    const COLONIST: UnitTypeId = UnitTypeId(1);
    const SOLDIER: UnitTypeId = UnitTypeId(2);
    const SHIP: UnitTypeId = UnitTypeId(3);

    fn test_world() -> World {
        let mut catalog = Catalog::new();
        catalog.register_tile_type(TileType::land(PLAINS, "Plains", 3));
        catalog.register_tile_type(TileType::water(OCEAN, "Ocean", 3));
        catalog.register_unit_type(UnitType::land(COLONIST, "Colonist", 3));
        catalog.register_unit_type(UnitType::land(SOLDIER, "Soldier", 3).offensive());
        catalog.register_unit_type(UnitType::naval(SHIP, "Caravel", 12, 3).offensive());

        let mut map = Map::new(6, 6, PLAINS);
        // Water column on the east edge, high-seas connected at the top.
        for y in 0..6 {
            let tile = map.tile_at(5, y).unwrap();
            map.tile_mut(tile).unwrap().tile_type = OCEAN;
        }
        let hs = map.tile_at(5, 0).unwrap();
        map.tile_mut(hs).unwrap().high_seas = true;

        let mut world = World::new(catalog, map);
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

    fn tile(world: &World, x: i32, y: i32) -> TileId {
        world.map.tile_at(x, y).unwrap()
    }

    #[test]
    fn test_ordinary_land_move() {
        let mut world = test_world();
        let start = tile(&world, 1, 1);
        let unit = Unit::new(UnitId(1), PlayerId(1), COLONIST, start, 3);
        world.add_unit(unit.clone());

        let to = UnitLocation::Tile(tile(&world, 2, 1));
        assert_eq!(
            world.move_type(&unit, &UnitLocation::Tile(start), &to),
            MoveType::Move
        );
    }

    #[test]
    fn test_land_unit_cannot_enter_open_water() {
        let world = test_world();
        let start = tile(&world, 4, 2);
        let unit = Unit::new(UnitId(1), PlayerId(1), COLONIST, start, 3);

        let to = UnitLocation::Tile(tile(&world, 5, 2));
        assert_eq!(
            world.move_type(&unit, &UnitLocation::Tile(start), &to),
            MoveType::Illegal
        );
    }

    #[test]
    fn test_embark_onto_friendly_carrier() {
        let mut world = test_world();
        let sea = tile(&world, 5, 2);
        world.add_unit(Unit::new(UnitId(2), PlayerId(1), SHIP, sea, 12));

        let start = tile(&world, 4, 2);
        let unit = Unit::new(UnitId(1), PlayerId(1), COLONIST, start, 3);
        assert_eq!(
            world.move_type(&unit, &UnitLocation::Tile(start), &UnitLocation::Tile(sea)),
            MoveType::Embark
        );
    }

    #[test]
    fn test_attack_requires_military_role() {
        let mut world = test_world();
        let enemy_tile = tile(&world, 2, 2);
        world.add_unit(
            Unit::new(UnitId(2), PlayerId(2), SOLDIER, enemy_tile, 3).with_role(Role::Soldier),
        );

        let start = tile(&world, 1, 2);
        let soldier =
            Unit::new(UnitId(1), PlayerId(1), SOLDIER, start, 3).with_role(Role::Soldier);
        let civilian = Unit::new(UnitId(3), PlayerId(1), COLONIST, start, 3);

        let from = UnitLocation::Tile(start);
        let to = UnitLocation::Tile(enemy_tile);
        assert_eq!(world.move_type(&soldier, &from, &to), MoveType::Attack);
        assert_eq!(world.move_type(&civilian, &from, &to), MoveType::Illegal);
    }

    #[test]
    fn test_unexplored_destination_is_illegal() {
        let mut world = test_world();
        let start = tile(&world, 1, 1);
        let dest = tile(&world, 2, 1);
        if let Some(player) = world.players.get_mut(&PlayerId(1)) {
            player.explored.remove(&dest);
        }
        let unit = Unit::new(UnitId(1), PlayerId(1), COLONIST, start, 3);
        assert_eq!(
            world.move_type(
                &unit,
                &UnitLocation::Tile(start),
                &UnitLocation::Tile(dest)
            ),
            MoveType::Illegal
        );
    }

    #[test]
    fn test_high_seas_transit_gated_on_tile_and_type() {
        let world = test_world();
        let hs_tile = tile(&world, 5, 0);
        let plain_sea = tile(&world, 5, 2);

        let ship = Unit::new(UnitId(1), PlayerId(1), SHIP, hs_tile, 12);
        assert_eq!(
            world.move_type(
                &ship,
                &UnitLocation::Tile(hs_tile),
                &UnitLocation::HighSeasHaven
            ),
            MoveType::HighSeas
        );
        assert_eq!(
            world.move_type(
                &ship,
                &UnitLocation::Tile(plain_sea),
                &UnitLocation::HighSeasHaven
            ),
            MoveType::Illegal
        );

        let colonist = Unit::new(UnitId(2), PlayerId(1), COLONIST, hs_tile, 3);
        assert_eq!(
            world.move_type(
                &colonist,
                &UnitLocation::Tile(hs_tile),
                &UnitLocation::HighSeasHaven
            ),
            MoveType::Illegal
        );
    }

    #[test]
    fn test_river_passage_cost() {
        let mut world = test_world();
        let a = tile(&world, 1, 1);
        let b = tile(&world, 2, 1);
        let unit = Unit::new(UnitId(1), PlayerId(1), COLONIST, a, 3);

        assert_eq!(world.terrain_move_cost(&unit, a, b), 3);

        world.map.tile_mut(a).unwrap().river = true;
        world.map.tile_mut(b).unwrap().river = true;
        assert_eq!(world.terrain_move_cost(&unit, a, b), 1);
    }
}
