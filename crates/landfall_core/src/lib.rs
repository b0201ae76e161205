//! # Landfall Core
//!
//! Deterministic game-logic core for Landfall, a turn-based
//! colonization strategy game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond parsing bundled rule catalogs
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Reproducible AI planning passes
//! - Headless rule evaluation in tests
//! - Identical results across platforms
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static type definitions (terrain, units, buildings)
//! - [`map`] - The tile graph
//! - [`world`] - Assembled game state and move classification
//! - [`cost`] / [`goal`] / [`search`] - The pluggable path search
//! - [`tile_production`] / [`building_production`] - Colony output math
//! - [`defense`] / [`military`] / [`mission`] - The AI military layer
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod building_production;
pub mod catalog;
pub mod cost;
pub mod defense;
pub mod error;
pub mod goal;
pub mod goods;
pub mod map;
pub mod math;
pub mod military;
pub mod mission;
pub mod player;
pub mod search;
pub mod tile_production;
pub mod unit;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::building_production::BuildingProductionCalculator;
    pub use crate::catalog::{
        BuildingType, BuildingTypeId, Catalog, GoodsType, ImprovementTypeId,
        TileImprovementType, TileType, TileTypeId, UnitType, UnitTypeId,
    };
    pub use crate::cost::{
        for_unit, number_of_tiles, AvoidBlockingUnitsCostDecider, BaseCostDecider,
        CostDecider, StepCost, TileCountDecider,
    };
    pub use crate::defense::{DefensiveMap, DefensiveZone, ZONE_SIZE_TURNS};
    pub use crate::error::{GameError, Result};
    pub use crate::goal::{
        AdjacentLocationGoal, ComposedGoal, DisembarkSiteGoal, EnemySettlementGoal,
        GoalDecider, HighSeasGoal, LocationGoal, MultipleAdjacentGoal,
        OurClosestSettlementGoal, OwnedHighSeasGoal, StealthyGoal,
    };
    pub use crate::goods::{
        apply_modifiers, AbstractGoods, GoodsId, GoodsModifier, Modifier, ModifierKind,
        ProductionInfo, ProductionType,
    };
    pub use crate::map::{Map, Tile, TileId};
    pub use crate::math::Fixed;
    pub use crate::military::MilitaryCoordinator;
    pub use crate::mission::Mission;
    pub use crate::player::{Colony, ColonyId, Player, PlayerId, Stance};
    pub use crate::search::PathNode;
    pub use crate::tile_production::{TileProductionCalculator, WorkerAssignment};
    pub use crate::unit::{MoveType, Role, Unit, UnitId, UnitLocation};
    pub use crate::world::World;
}
