//! The rules catalog: static type definitions for goods, terrain,
//! improvements, units, and buildings.
//!
//! Catalog entries are data-driven definitions, loadable from RON.
//! They are registered once at startup and immutable afterwards; all
//! calculators borrow the catalog and look types up by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::goods::{AbstractGoods, GoodsId, GoodsModifier, ProductionType};

/// Unique identifier for tile (terrain) types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TileTypeId(pub u32);

/// Unique identifier for tile improvement types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ImprovementTypeId(pub u32);

/// Unique identifier for unit types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitTypeId(pub u32);

/// Unique identifier for building types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BuildingTypeId(pub u32);

/// A goods type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsType {
    /// Unique identifier.
    pub id: GoodsId,
    /// Display name.
    pub name: String,
    /// Whether this goods type counts against warehouse capacity.
    pub storable: bool,
}

impl GoodsType {
    /// Create a new storable goods type.
    #[must_use]
    pub fn new(id: GoodsId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            storable: true,
        }
    }
}

/// A terrain type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    /// Unique identifier.
    pub id: TileTypeId,
    /// Display name.
    pub name: String,
    /// Whether this terrain is land (false = water).
    pub is_land: bool,
    /// Movement cost to enter a tile of this terrain, in move units.
    pub movement_cost: i32,
    /// Defence bonus granted to a unit standing on this terrain.
    pub defence: i32,
    /// Operating modes available on this terrain.
    pub production_types: Vec<ProductionType>,
}

impl TileType {
    /// Create a new land terrain type.
    #[must_use]
    pub fn land(id: TileTypeId, name: impl Into<String>, movement_cost: i32) -> Self {
        Self {
            id,
            name: name.into(),
            is_land: true,
            movement_cost,
            defence: 0,
            production_types: Vec::new(),
        }
    }

    /// Create a new water terrain type.
    #[must_use]
    pub fn water(id: TileTypeId, name: impl Into<String>, movement_cost: i32) -> Self {
        Self {
            id,
            name: name.into(),
            is_land: false,
            movement_cost,
            defence: 0,
            production_types: Vec::new(),
        }
    }

    /// Set the defence bonus.
    #[must_use]
    pub const fn with_defence(mut self, defence: i32) -> Self {
        self.defence = defence;
        self
    }

    /// Add production modes.
    #[must_use]
    pub fn with_production(mut self, production_types: Vec<ProductionType>) -> Self {
        self.production_types = production_types;
        self
    }

    /// Base production of a goods type on this terrain.
    ///
    /// Attended and unattended production are distinct modes; a terrain
    /// that cannot produce the goods at all yields zero.
    #[must_use]
    pub fn potential_production(&self, goods: GoodsId, attended: bool) -> i32 {
        self.production_types
            .iter()
            .filter(|pt| pt.unattended != attended)
            .map(|pt| pt.output_of(goods))
            .max()
            .unwrap_or(0)
    }
}

/// A tile improvement type definition (plowing, roads, clearing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileImprovementType {
    /// Unique identifier.
    pub id: ImprovementTypeId,
    /// Display name.
    pub name: String,
    /// Natural improvements (e.g. a river) occur on their own and are
    /// excluded from the potential-production search.
    pub natural: bool,
    /// Per-goods production delta granted by this improvement.
    pub production_bonus: Vec<AbstractGoods>,
    /// Terrain this improvement turns the tile into, if any.
    pub change_to: Option<TileTypeId>,
    /// Terrain types this improvement can be built on. Empty = any land.
    pub valid_on: Vec<TileTypeId>,
}

impl TileImprovementType {
    /// Create a new buildable improvement type.
    #[must_use]
    pub fn new(id: ImprovementTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            natural: false,
            production_bonus: Vec::new(),
            change_to: None,
            valid_on: Vec::new(),
        }
    }

    /// Mark this improvement as naturally occurring.
    #[must_use]
    pub const fn natural(mut self) -> Self {
        self.natural = true;
        self
    }

    /// Set the production delta.
    #[must_use]
    pub fn with_bonus(mut self, bonus: Vec<AbstractGoods>) -> Self {
        self.production_bonus = bonus;
        self
    }

    /// Set the terrain transformation.
    #[must_use]
    pub const fn with_change_to(mut self, tile_type: TileTypeId) -> Self {
        self.change_to = Some(tile_type);
        self
    }

    /// Restrict the terrain this improvement can be built on.
    #[must_use]
    pub fn with_valid_on(mut self, tile_types: Vec<TileTypeId>) -> Self {
        self.valid_on = tile_types;
        self
    }

    /// Whether this improvement can be built on the given terrain.
    #[must_use]
    pub fn is_valid_on(&self, tile_type: &TileType) -> bool {
        if !tile_type.is_land {
            return false;
        }
        self.valid_on.is_empty() || self.valid_on.contains(&tile_type.id)
    }

    /// The production delta for a goods type, zero if absent.
    #[must_use]
    pub fn bonus_for(&self, goods: GoodsId) -> i32 {
        crate::goods::goods_amount(&self.production_bonus, goods)
    }
}

/// A unit type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    /// Unique identifier.
    pub id: UnitTypeId,
    /// Display name.
    pub name: String,
    /// Movement allowance per turn, in move units.
    pub base_moves: i32,
    /// Whether this is a naval unit.
    pub naval: bool,
    /// Whether this unit can initiate attacks.
    pub offensive: bool,
    /// Whether this unit can bombard from a settlement or ship.
    pub can_bombard: bool,
    /// Whether this unit can transit the high seas to the old world.
    pub can_move_high_seas: bool,
    /// Turns a high-seas crossing takes, for units that can make one.
    pub sail_turns: i32,
    /// Production modifiers granted by this unit's expertise.
    pub production_modifiers: Vec<GoodsModifier>,
}

impl UnitType {
    /// Create a new land unit type.
    #[must_use]
    pub fn land(id: UnitTypeId, name: impl Into<String>, base_moves: i32) -> Self {
        Self {
            id,
            name: name.into(),
            base_moves,
            naval: false,
            offensive: false,
            can_bombard: false,
            can_move_high_seas: false,
            sail_turns: 0,
            production_modifiers: Vec::new(),
        }
    }

    /// Create a new naval unit type.
    #[must_use]
    pub fn naval(
        id: UnitTypeId,
        name: impl Into<String>,
        base_moves: i32,
        sail_turns: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            base_moves,
            naval: true,
            offensive: false,
            can_bombard: false,
            can_move_high_seas: true,
            sail_turns,
            production_modifiers: Vec::new(),
        }
    }

    /// Mark this unit type as able to initiate attacks.
    #[must_use]
    pub const fn offensive(mut self) -> Self {
        self.offensive = true;
        self
    }

    /// Mark this unit type as able to bombard.
    #[must_use]
    pub const fn bombarding(mut self) -> Self {
        self.can_bombard = true;
        self
    }

    /// Add expertise production modifiers.
    #[must_use]
    pub fn with_production_modifiers(mut self, modifiers: Vec<GoodsModifier>) -> Self {
        self.production_modifiers = modifiers;
        self
    }

    /// Expertise modifiers affecting a goods type.
    pub fn modifiers_for(&self, goods: GoodsId) -> impl Iterator<Item = &GoodsModifier> {
        self.production_modifiers
            .iter()
            .filter(move |gm| gm.goods == goods)
    }
}

/// A building type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingType {
    /// Unique identifier.
    pub id: BuildingTypeId,
    /// Display name.
    pub name: String,
    /// Operating modes (unattended entries run without workers).
    pub production_types: Vec<ProductionType>,
    /// Auto-producing buildings (e.g. stables breeding horses) derive
    /// their output from current stock rather than worker count.
    pub auto_production: bool,
    /// Divisor of the breeding formula, for auto-producing buildings.
    pub breeding_divisor: i32,
    /// Factor of the breeding formula, for auto-producing buildings.
    pub breeding_factor: i32,
    /// Guaranteed output per worker for factory-ability buildings,
    /// honored even when input stock runs short. Zero = no factory
    /// ability.
    pub factory_minimum: i32,
    /// Whether production is clamped to the warehouse headroom.
    pub avoid_overflow: bool,
    /// Building-level production modifiers, applied to unattended output.
    pub modifiers: Vec<GoodsModifier>,
}

impl BuildingType {
    /// Create a new building type.
    #[must_use]
    pub fn new(id: BuildingTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            production_types: Vec::new(),
            auto_production: false,
            breeding_divisor: 1,
            breeding_factor: 1,
            factory_minimum: 0,
            avoid_overflow: false,
            modifiers: Vec::new(),
        }
    }

    /// Add production modes.
    #[must_use]
    pub fn with_production(mut self, production_types: Vec<ProductionType>) -> Self {
        self.production_types = production_types;
        self
    }

    /// Mark as auto-producing with the given breeding parameters.
    #[must_use]
    pub const fn auto_producing(mut self, divisor: i32, factor: i32) -> Self {
        self.auto_production = true;
        self.breeding_divisor = divisor;
        self.breeding_factor = factor;
        self.avoid_overflow = true;
        self
    }

    /// Grant the factory ability with a guaranteed per-worker output.
    #[must_use]
    pub const fn with_factory_minimum(mut self, minimum: i32) -> Self {
        self.factory_minimum = minimum;
        self
    }

    /// Clamp production to warehouse headroom.
    #[must_use]
    pub const fn avoiding_overflow(mut self) -> Self {
        self.avoid_overflow = true;
        self
    }

    /// Add building-level modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<GoodsModifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The unattended operating modes of this building.
    pub fn unattended_production(&self) -> impl Iterator<Item = &ProductionType> {
        self.production_types.iter().filter(|pt| pt.unattended)
    }

    /// Building-level modifiers affecting a goods type.
    pub fn modifiers_for(&self, goods: GoodsId) -> impl Iterator<Item = &GoodsModifier> {
        self.modifiers.iter().filter(move |gm| gm.goods == goods)
    }
}

/// Registry containing all static type definitions.
///
/// Provides lookup by id for game data. Fallible lookups return
/// [`GameError::UnknownType`] so misconfiguration surfaces at
/// construction time instead of silently mid-calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Goods types indexed by id.
    goods: BTreeMap<GoodsId, GoodsType>,
    /// Terrain types indexed by id.
    tile_types: BTreeMap<TileTypeId, TileType>,
    /// Improvement types indexed by id.
    improvement_types: BTreeMap<ImprovementTypeId, TileImprovementType>,
    /// Unit types indexed by id.
    unit_types: BTreeMap<UnitTypeId, UnitType>,
    /// Building types indexed by id.
    building_types: BTreeMap<BuildingTypeId, BuildingType>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| GameError::DataParse {
            path: "<ron>".into(),
            message: e.to_string(),
        })
    }

    /// Load a catalog from a RON file and validate its cross-references.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParse`] when the file cannot be read or
    /// parsed, and [`GameError::UnknownType`] when validation finds a
    /// dangling reference.
    pub fn from_ron_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::DataParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog: Self = ron::from_str(&contents).map_err(|e| GameError::DataParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        tracing::info!(
            tile_types = catalog.tile_types.len(),
            unit_types = catalog.unit_types.len(),
            building_types = catalog.building_types.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Register a goods type.
    pub fn register_goods(&mut self, goods: GoodsType) {
        self.goods.insert(goods.id, goods);
    }

    /// Register a terrain type.
    pub fn register_tile_type(&mut self, tile_type: TileType) {
        self.tile_types.insert(tile_type.id, tile_type);
    }

    /// Register an improvement type.
    pub fn register_improvement(&mut self, improvement: TileImprovementType) {
        self.improvement_types.insert(improvement.id, improvement);
    }

    /// Register a unit type.
    pub fn register_unit_type(&mut self, unit_type: UnitType) {
        self.unit_types.insert(unit_type.id, unit_type);
    }

    /// Register a building type.
    pub fn register_building_type(&mut self, building_type: BuildingType) {
        self.building_types.insert(building_type.id, building_type);
    }

    /// Get a goods type by id.
    #[must_use]
    pub fn goods(&self, id: GoodsId) -> Option<&GoodsType> {
        self.goods.get(&id)
    }

    /// Get a terrain type by id.
    #[must_use]
    pub fn tile_type(&self, id: TileTypeId) -> Option<&TileType> {
        self.tile_types.get(&id)
    }

    /// Get a terrain type by id, erroring on an unknown id.
    pub fn require_tile_type(&self, id: TileTypeId) -> Result<&TileType> {
        self.tile_types.get(&id).ok_or(GameError::UnknownType {
            kind: "tile type",
            id: id.0,
        })
    }

    /// Get an improvement type by id.
    #[must_use]
    pub fn improvement(&self, id: ImprovementTypeId) -> Option<&TileImprovementType> {
        self.improvement_types.get(&id)
    }

    /// Get a unit type by id.
    #[must_use]
    pub fn unit_type(&self, id: UnitTypeId) -> Option<&UnitType> {
        self.unit_types.get(&id)
    }

    /// Get a unit type by id, erroring on an unknown id.
    pub fn require_unit_type(&self, id: UnitTypeId) -> Result<&UnitType> {
        self.unit_types.get(&id).ok_or(GameError::UnknownType {
            kind: "unit type",
            id: id.0,
        })
    }

    /// Get a building type by id.
    #[must_use]
    pub fn building_type(&self, id: BuildingTypeId) -> Option<&BuildingType> {
        self.building_types.get(&id)
    }

    /// Get a building type by id, erroring on an unknown id.
    pub fn require_building_type(&self, id: BuildingTypeId) -> Result<&BuildingType> {
        self.building_types.get(&id).ok_or(GameError::UnknownType {
            kind: "building type",
            id: id.0,
        })
    }

    /// All registered improvement types, in id order.
    pub fn all_improvements(&self) -> impl Iterator<Item = &TileImprovementType> {
        self.improvement_types.values()
    }

    /// Validate cross-references between catalog entries.
    ///
    /// Every improvement's terrain transformation and every production
    /// mode's goods references must resolve.
    pub fn validate(&self) -> Result<()> {
        for improvement in self.improvement_types.values() {
            if let Some(target) = improvement.change_to {
                self.require_tile_type(target)?;
            }
        }
        let check_goods = |list: &[AbstractGoods]| -> Result<()> {
            for ag in list {
                if !self.goods.contains_key(&ag.goods) {
                    return Err(GameError::UnknownType {
                        kind: "goods type",
                        id: ag.goods.0,
                    });
                }
            }
            Ok(())
        };
        for tile_type in self.tile_types.values() {
            for pt in &tile_type.production_types {
                check_goods(&pt.inputs)?;
                check_goods(&pt.outputs)?;
            }
        }
        for building_type in self.building_types.values() {
            for pt in &building_type.production_types {
                check_goods(&pt.inputs)?;
                check_goods(&pt.outputs)?;
            }
        }
        Ok(())
    }
}
