//! Per-step move cost deciders consulted by the path search.
//!
//! A decider prices a single step between two locations for a given
//! unit. The result is an immutable [`StepCost`] value; an illegal step
//! is `None`. This keeps deciders freely shareable between searches —
//! there is no call-then-read accumulator to race on.

use crate::unit::{MoveType, Unit, UnitLocation};
use crate::world::World;

/// The priced outcome of a single legal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCost {
    /// Total cost of the step, in move units. Includes moves wasted at
    /// a turn boundary and any decider-specific penalty.
    pub cost: i32,
    /// Movement allowance remaining after the step.
    pub moves_left: i32,
    /// Whole turns consumed by the step (0 when it completes this turn).
    pub new_turns: i32,
}

/// Computes the incremental cost of one step for a mobile unit.
///
/// Implementations must be deterministic; the search engine's ordering
/// depends on exact costs.
pub trait CostDecider {
    /// Price a single step. `None` means the move cannot legally be
    /// made at all.
    fn step(
        &self,
        world: &World,
        unit: &Unit,
        from: &UnitLocation,
        to: &UnitLocation,
        moves_left: i32,
    ) -> Option<StepCost>;
}

/// The standard cost decider: terrain cost with turn-boundary semantics.
///
/// A step that fits in the remaining allowance completes this turn. A
/// step that does not spills into the next turn: the unused remainder is
/// wasted, the step is re-priced at a full allowance, and one turn is
/// consumed. Whole-turn move types (attacks, embarkation, entering a
/// settlement, exploration, disembarking) additionally zero the
/// remaining allowance.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCostDecider;

impl BaseCostDecider {
    /// Create the standard decider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CostDecider for BaseCostDecider {
    fn step(
        &self,
        world: &World,
        unit: &Unit,
        from: &UnitLocation,
        to: &UnitLocation,
        moves_left: i32,
    ) -> Option<StepCost> {
        let move_type = world.move_type(unit, from, to);
        if !move_type.is_legal() {
            return None;
        }

        let initial_moves = world.initial_moves(unit);
        if move_type == MoveType::HighSeas {
            let sail_turns = world.unit_type_of(unit).map_or(0, |ut| ut.sail_turns);
            return Some(StepCost {
                cost: sail_turns * initial_moves,
                moves_left: initial_moves,
                new_turns: sail_turns,
            });
        }

        let (UnitLocation::Tile(from_tile), UnitLocation::Tile(to_tile)) = (from, to) else {
            return None;
        };
        let terrain_cost = world.terrain_move_cost(unit, *from_tile, *to_tile);

        let (mut cost, mut left, new_turns) = if terrain_cost <= moves_left {
            (terrain_cost, moves_left - terrain_cost, 0)
        } else {
            // Spills into the next turn: the remainder of this turn is
            // wasted and the step is re-priced at a full allowance.
            let full_cost = terrain_cost.min(initial_moves);
            (moves_left + full_cost, initial_moves - full_cost, 1)
        };

        if move_type.consumes_turn() {
            cost += left;
            left = 0;
        }

        Some(StepCost {
            cost,
            moves_left: left,
            new_turns,
        })
    }
}

/// Penalty ceiling for stepping next to blocking units.
const BLOCKED_PENALTY: i32 = 20;
/// Penalty decay per turn already spent on the path.
const BLOCKED_PENALTY_DECAY: i32 = 4;

/// A decider that avoids stepping onto or past hostile units.
///
/// Wraps [`BaseCostDecider`]: a destination held by a hostile unit is
/// illegal when the arrival would land in the same turn (a unit cannot
/// move through an enemy), and otherwise draws an escalating-to-fading
/// penalty of `max(0, 20 - 4 * turns)`. The same penalty applies when a
/// hostile naval unit blockades an unsettled land destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvoidBlockingUnitsCostDecider {
    inner: BaseCostDecider,
}

impl AvoidBlockingUnitsCostDecider {
    /// Create the blocking-aware decider.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: BaseCostDecider::new(),
        }
    }

    fn penalty(turns: i32) -> i32 {
        (BLOCKED_PENALTY - turns * BLOCKED_PENALTY_DECAY).max(0)
    }
}

impl CostDecider for AvoidBlockingUnitsCostDecider {
    fn step(
        &self,
        world: &World,
        unit: &Unit,
        from: &UnitLocation,
        to: &UnitLocation,
        moves_left: i32,
    ) -> Option<StepCost> {
        let base = self.inner.step(world, unit, from, to, moves_left)?;
        let UnitLocation::Tile(to_tile) = to else {
            return Some(base);
        };

        let mut cost = base.cost;
        if world.hostile_occupant(unit.owner, *to_tile).is_some() {
            if base.new_turns == 0 {
                // Can't move through an enemy in the same turn.
                return None;
            }
            cost += Self::penalty(base.new_turns);
        } else if world.is_land(*to_tile)
            && world.tile(*to_tile).is_some_and(|t| t.settlement.is_none())
            && world.map.neighbors(*to_tile).any(|n| {
                !world.is_land(n)
                    && world
                        .hostile_occupant(unit.owner, n)
                        .and_then(|u| world.unit_type_of(u))
                        .is_some_and(|ut| ut.naval)
            })
        {
            cost += Self::penalty(base.new_turns);
        }

        Some(StepCost { cost, ..base })
    }
}

/// A decider that counts tiles: every legal same-domain step costs one.
///
/// Used by searches that measure radius in tiles rather than movement
/// points, e.g. the defensive-zone builder. Domain mismatches (a naval
/// unit onto unsettled land, a land unit onto water) are illegal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileCountDecider;

impl TileCountDecider {
    /// Create the tile-counting decider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CostDecider for TileCountDecider {
    fn step(
        &self,
        world: &World,
        unit: &Unit,
        _from: &UnitLocation,
        to: &UnitLocation,
        _moves_left: i32,
    ) -> Option<StepCost> {
        let UnitLocation::Tile(to_tile) = to else {
            return None;
        };
        let naval = world.unit_type_of(unit).is_some_and(|ut| ut.naval);
        let to_land = world.is_land(*to_tile);
        if naval == to_land {
            // Naval units may still dock at their own settlement.
            let own_settlement = naval
                && world
                    .tile(*to_tile)
                    .and_then(|t| t.settlement)
                    .and_then(|c| world.colony(c))
                    .is_some_and(|c| c.owner == unit.owner);
            if !own_settlement {
                return None;
            }
        }
        Some(StepCost {
            cost: 1,
            moves_left: 0,
            new_turns: 1,
        })
    }
}

/// The number-of-tiles decider: radius measured in tiles, not moves.
#[must_use]
pub fn number_of_tiles() -> TileCountDecider {
    TileCountDecider::new()
}

/// Select the default cost decider for a unit.
///
/// Offensive units tolerate passing enemies (they may be on their way
/// to fight them); everything else routes around blocking units.
#[must_use]
pub fn for_unit(world: &World, unit: &Unit) -> Box<dyn CostDecider> {
    let offensive = world.unit_type_of(unit).is_some_and(|ut| ut.offensive);
    if offensive && unit.role.is_military() {
        Box::new(BaseCostDecider::new())
    } else {
        Box::new(AvoidBlockingUnitsCostDecider::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TileType, TileTypeId, UnitType, UnitTypeId};
    use crate::map::Map;
    use crate::player::{Player, PlayerId, Stance};
    use crate::unit::{Role, Unit, UnitId};

    const PLAINS: TileTypeId = TileTypeId(1);
    const HILLS: TileTypeId = TileTypeId(2);
    const OCEAN: TileTypeId = TileTypeId(3);
    const COLONIST: UnitTypeId = UnitTypeId(1);
    const DRAGOON: UnitTypeId = UnitTypeId(2);
    const SHIP: UnitTypeId = UnitTypeId(3);

    fn test_world() -> World {
        let mut catalog = Catalog::new();
        catalog.register_tile_type(TileType::land(PLAINS, "Plains", 3));
        catalog.register_tile_type(TileType::land(HILLS, "Hills", 6));
        catalog.register_tile_type(TileType::water(OCEAN, "Ocean", 3));
        catalog.register_unit_type(UnitType::land(COLONIST, "Colonist", 3));
        catalog.register_unit_type(UnitType::land(DRAGOON, "Dragoon", 12).offensive());
        catalog.register_unit_type(UnitType::naval(SHIP, "Caravel", 12, 3));

        let mut map = Map::new(8, 8, PLAINS);
        for y in 0..8 {
            let tile = map.tile_at(7, y).unwrap();
            map.tile_mut(tile).unwrap().tile_type = OCEAN;
        }
        let hs = map.tile_at(7, 0).unwrap();
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

    fn at(world: &World, x: i32, y: i32) -> UnitLocation {
        UnitLocation::Tile(world.map.tile_at(x, y).unwrap())
    }

    #[test]
    fn test_move_within_allowance() {
        let world = test_world();
        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            COLONIST,
            world.map.tile_at(1, 1).unwrap(),
            3,
        );
        let decider = BaseCostDecider::new();

        let step = decider
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 3)
            .unwrap();
        assert_eq!(step.cost, 3);
        assert_eq!(step.moves_left, 0);
        assert_eq!(step.new_turns, 0);
    }

    #[test]
    fn test_move_spills_into_next_turn() {
        let mut world = test_world();
        let dest = world.map.tile_at(2, 1).unwrap();
        world.map.tile_mut(dest).unwrap().tile_type = HILLS;

        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            COLONIST,
            world.map.tile_at(1, 1).unwrap(),
            3,
        );
        let decider = BaseCostDecider::new();

        // Hills cost 6, only 2 moves left: waste 2, pay full-turn cost
        // capped at the 3-move allowance.
        let step = decider
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 2)
            .unwrap();
        assert_eq!(step.cost, 2 + 3);
        assert_eq!(step.moves_left, 0);
        assert_eq!(step.new_turns, 1);
    }

    #[test]
    fn test_attack_consumes_whole_turn() {
        let mut world = test_world();
        let enemy_tile = world.map.tile_at(2, 1).unwrap();
        world.add_unit(
            Unit::new(UnitId(9), PlayerId(2), DRAGOON, enemy_tile, 12).with_role(Role::Dragoon),
        );

        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            DRAGOON,
            world.map.tile_at(1, 1).unwrap(),
            12,
        )
        .with_role(Role::Dragoon);
        let decider = BaseCostDecider::new();

        let step = decider
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 12)
            .unwrap();
        // Terrain cost 3 plus the 9 remaining moves forfeited.
        assert_eq!(step.cost, 12);
        assert_eq!(step.moves_left, 0);
        assert_eq!(step.new_turns, 0);
    }

    #[test]
    fn test_high_seas_transit() {
        let world = test_world();
        let hs = world.map.tile_at(7, 0).unwrap();
        let unit = Unit::new(UnitId(1), PlayerId(1), SHIP, hs, 12);
        let decider = BaseCostDecider::new();

        let step = decider
            .step(
                &world,
                &unit,
                &UnitLocation::Tile(hs),
                &UnitLocation::HighSeasHaven,
                12,
            )
            .unwrap();
        assert_eq!(step.cost, 3 * 12);
        assert_eq!(step.new_turns, 3);

        // A land unit cannot make the crossing at all.
        let colonist = Unit::new(UnitId(2), PlayerId(1), COLONIST, hs, 3);
        assert!(decider
            .step(
                &world,
                &colonist,
                &UnitLocation::Tile(hs),
                &UnitLocation::HighSeasHaven,
                3,
            )
            .is_none());
    }

    #[test]
    fn test_avoid_blocking_same_turn_is_illegal() {
        let mut world = test_world();
        let blocked = world.map.tile_at(2, 1).unwrap();
        world.add_unit(
            Unit::new(UnitId(9), PlayerId(2), DRAGOON, blocked, 12).with_role(Role::Dragoon),
        );

        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            DRAGOON,
            world.map.tile_at(1, 1).unwrap(),
            12,
        )
        .with_role(Role::Dragoon);

        let decider = AvoidBlockingUnitsCostDecider::new();
        // Arrives this turn: moving through an enemy is not allowed.
        assert!(decider
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 12)
            .is_none());

        // Arriving next turn draws the penalty instead.
        let step = decider
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 2)
            .unwrap();
        let base = BaseCostDecider::new()
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 2)
            .unwrap();
        assert_eq!(step.cost, base.cost + 16); // 20 - 4 * 1
    }

    #[test]
    fn test_avoid_blocking_matches_base_when_clear() {
        let world = test_world();
        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            COLONIST,
            world.map.tile_at(1, 1).unwrap(),
            3,
        );

        let base = BaseCostDecider::new()
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 3)
            .unwrap();
        let avoid = AvoidBlockingUnitsCostDecider::new()
            .step(&world, &unit, &at(&world, 1, 1), &at(&world, 2, 1), 3)
            .unwrap();
        assert_eq!(base, avoid);
    }

    #[test]
    fn test_naval_blockade_penalty() {
        let mut world = test_world();
        // Hostile ship on the water next to the landing tile.
        let sea = world.map.tile_at(7, 2).unwrap();
        world.add_unit(Unit::new(UnitId(9), PlayerId(2), SHIP, sea, 12));

        let unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            COLONIST,
            world.map.tile_at(5, 2).unwrap(),
            3,
        );
        let decider = AvoidBlockingUnitsCostDecider::new();
        let base = BaseCostDecider::new()
            .step(&world, &unit, &at(&world, 5, 2), &at(&world, 6, 2), 3)
            .unwrap();
        let step = decider
            .step(&world, &unit, &at(&world, 5, 2), &at(&world, 6, 2), 3)
            .unwrap();
        assert_eq!(step.cost, base.cost + 20); // 20 - 4 * 0
    }

    #[test]
    fn test_tile_count_decider_domains() {
        let world = test_world();
        let land_unit = Unit::new(
            UnitId(1),
            PlayerId(1),
            COLONIST,
            world.map.tile_at(1, 1).unwrap(),
            3,
        );
        let decider = number_of_tiles();

        let step = decider
            .step(&world, &land_unit, &at(&world, 1, 1), &at(&world, 2, 1), 3)
            .unwrap();
        assert_eq!(step.cost, 1);

        // Land unit onto water: domain mismatch.
        assert!(decider
            .step(&world, &land_unit, &at(&world, 6, 2), &at(&world, 7, 2), 3)
            .is_none());

        // Naval unit onto unsettled land: domain mismatch.
        let ship = Unit::new(
            UnitId(2),
            PlayerId(1),
            SHIP,
            world.map.tile_at(7, 2).unwrap(),
            12,
        );
        assert!(decider
            .step(&world, &ship, &at(&world, 7, 2), &at(&world, 6, 2), 12)
            .is_none());
    }
}
