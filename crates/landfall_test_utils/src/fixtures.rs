//! Test fixtures and helpers.
//!
//! A standard rule catalog and pre-built world configurations for
//! consistent testing across crates.

use fixed::types::I32F32;

use landfall_core::catalog::{
    Catalog, ImprovementTypeId, TileImprovementType, TileType, TileTypeId, UnitType,
    UnitTypeId,
};
use landfall_core::goods::{AbstractGoods, GoodsId, ProductionType};
use landfall_core::map::{Map, TileId};
use landfall_core::player::{Player, PlayerId, Stance};
use landfall_core::unit::{Role, Unit, UnitId};
use landfall_core::world::World;

/// Goods id for food in the standard catalog.
pub const FOOD: GoodsId = GoodsId(1);
/// Goods id for lumber in the standard catalog.
pub const LUMBER: GoodsId = GoodsId(2);

/// Terrain id for plains in the standard catalog.
pub const PLAINS: TileTypeId = TileTypeId(1);
/// Terrain id for hills in the standard catalog.
pub const HILLS: TileTypeId = TileTypeId(2);
/// Terrain id for forest in the standard catalog.
pub const FOREST: TileTypeId = TileTypeId(3);
/// Terrain id for ocean in the standard catalog.
pub const OCEAN: TileTypeId = TileTypeId(4);

/// Improvement id for plowing in the standard catalog.
pub const PLOW: ImprovementTypeId = ImprovementTypeId(1);
/// Improvement id for clearing forest in the standard catalog.
pub const CLEAR: ImprovementTypeId = ImprovementTypeId(2);

/// Unit type id for the colonist in the standard catalog.
pub const COLONIST: UnitTypeId = UnitTypeId(1);
/// Unit type id for the soldier in the standard catalog.
pub const SOLDIER: UnitTypeId = UnitTypeId(2);
/// Unit type id for the dragoon in the standard catalog.
pub const DRAGOON: UnitTypeId = UnitTypeId(3);
/// Unit type id for the artillery in the standard catalog.
pub const ARTILLERY: UnitTypeId = UnitTypeId(4);
/// Unit type id for the caravel in the standard catalog.
pub const CARAVEL: UnitTypeId = UnitTypeId(5);

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real game code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// The standard rule catalog used across the test suites.
#[must_use]
pub fn standard_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register_tile_type(
        TileType::land(PLAINS, "Plains", 3).with_production(vec![
            ProductionType::new(vec![], vec![AbstractGoods::new(FOOD, 3)]),
            ProductionType::unattended(vec![], vec![AbstractGoods::new(FOOD, 2)]),
        ]),
    );
    catalog.register_tile_type(TileType::land(HILLS, "Hills", 6).with_defence(50));
    catalog.register_tile_type(
        TileType::land(FOREST, "Forest", 6).with_production(vec![
            ProductionType::new(vec![], vec![AbstractGoods::new(LUMBER, 4)]),
            ProductionType::new(vec![], vec![AbstractGoods::new(FOOD, 1)]),
        ]),
    );
    catalog.register_tile_type(TileType::water(OCEAN, "Ocean", 3));
    catalog.register_improvement(
        TileImprovementType::new(PLOW, "Plow")
            .with_bonus(vec![AbstractGoods::new(FOOD, 1)])
            .with_valid_on(vec![PLAINS]),
    );
    catalog.register_improvement(
        TileImprovementType::new(CLEAR, "Clear forest")
            .with_change_to(PLAINS)
            .with_valid_on(vec![FOREST]),
    );
    catalog.register_unit_type(UnitType::land(COLONIST, "Colonist", 3));
    catalog.register_unit_type(UnitType::land(SOLDIER, "Soldier", 3).offensive());
    catalog.register_unit_type(UnitType::land(DRAGOON, "Dragoon", 12).offensive());
    catalog.register_unit_type(
        UnitType::land(ARTILLERY, "Artillery", 3).offensive().bombarding(),
    );
    catalog.register_unit_type(UnitType::naval(CARAVEL, "Caravel", 12, 3).offensive());
    catalog
}

/// An all-plains world with two players at war, everything explored by
/// both.
#[must_use]
pub fn open_world(width: u32, height: u32) -> World {
    let mut world = World::new(standard_catalog(), Map::new(width, height, PLAINS));
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

/// Like [`open_world`], with an ocean column on the east edge whose
/// northern tile connects to the high seas.
#[must_use]
pub fn coastal_world(width: u32, height: u32) -> World {
    let mut world = open_world(width, height);
    let coast = width as i32 - 1;
    for y in 0..height as i32 {
        let tile = tile_at(&world, coast, y);
        if let Some(t) = world.map.tile_mut(tile) {
            t.tile_type = OCEAN;
        }
    }
    let hs = tile_at(&world, coast, 0);
    if let Some(t) = world.map.tile_mut(hs) {
        t.high_seas = true;
    }
    world
}

/// Tile id at known-in-bounds coordinates.
///
/// # Panics
///
/// Panics when the coordinates fall outside the map.
#[must_use]
pub fn tile_at(world: &World, x: i32, y: i32) -> TileId {
    world
        .map
        .tile_at(x, y)
        .unwrap_or_else(|| panic!("({x}, {y}) out of bounds"))
}

/// Place a unit with its type's full movement allowance.
pub fn place_unit(
    world: &mut World,
    id: u32,
    owner: u32,
    kind: UnitTypeId,
    role: Role,
    x: i32,
    y: i32,
) -> UnitId {
    let tile = tile_at(world, x, y);
    let moves = world
        .catalog
        .unit_type(kind)
        .map_or(0, |ut| ut.base_moves);
    let unit_id = UnitId(id);
    world.add_unit(Unit::new(unit_id, PlayerId(owner), kind, tile, moves).with_role(role));
    unit_id
}
