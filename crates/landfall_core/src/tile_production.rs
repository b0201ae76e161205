//! Tile production: per-worker output of a worked or center tile.

use tracing::trace;

use crate::catalog::{Catalog, TileImprovementType, TileType, UnitTypeId};
use crate::error::{GameError, Result};
use crate::goods::{
    apply_modifiers, AbstractGoods, GoodsId, Modifier, ProductionInfo, ProductionType,
};
use crate::map::Tile;
use crate::math::{floor_to_i32, Fixed};
use crate::player::{ColonyId, Player};
use crate::world::World;

/// One worker slot on a tile: an optional unit type (none for center
/// tiles producing unattended) and the operating mode it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAssignment {
    /// The assigned worker's unit type, if any.
    pub unit_type: Option<UnitTypeId>,
    /// The operating mode this slot runs.
    pub production_type: ProductionType,
}

impl WorkerAssignment {
    /// A worked slot: a unit of the given type runs the mode.
    #[must_use]
    pub const fn worked(unit_type: UnitTypeId, production_type: ProductionType) -> Self {
        Self {
            unit_type: Some(unit_type),
            production_type,
        }
    }

    /// An unattended slot, as used by colony center tiles.
    #[must_use]
    pub const fn unattended(production_type: ProductionType) -> Self {
        Self {
            unit_type: None,
            production_type,
        }
    }
}

/// Computes production of a single tile for one colony.
///
/// Borrowed per recompute; holds no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct TileProductionCalculator<'a> {
    catalog: &'a Catalog,
    owner: &'a Player,
    /// The colony's rebel-sentiment production bonus, in additive points.
    colony_bonus: i32,
}

impl<'a> TileProductionCalculator<'a> {
    /// Create a calculator for one colony's owner and bonus.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, owner: &'a Player, colony_bonus: i32) -> Self {
        Self {
            catalog,
            owner,
            colony_bonus,
        }
    }

    /// Create a calculator for a colony resolved from the world.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MissingCollaborator`] when the colony or
    /// its owning player is absent from the roster.
    pub fn for_colony(world: &'a World, colony: ColonyId) -> Result<Self> {
        let colony = world
            .colony(colony)
            .ok_or(GameError::MissingCollaborator("colony"))?;
        let owner = world
            .player(colony.owner)
            .ok_or(GameError::MissingCollaborator("colony owner"))?;
        Ok(Self::new(&world.catalog, owner, colony.production_bonus))
    }

    /// Production of one tile slot on a given turn.
    ///
    /// Each output good starts from the terrain's base amount and runs
    /// the modifier chain: improvement bonuses on the tile, then (for
    /// worked slots) the worker's expertise, then the colony rebel
    /// bonus for worked slots and center tiles, then owner-wide
    /// modifiers. Results are floored; non-positive amounts are
    /// dropped. A terrain that cannot produce a requested good yields
    /// nothing rather than an error.
    #[must_use]
    pub fn basic_production_info(
        &self,
        tile: &Tile,
        turn: i32,
        assignment: &WorkerAssignment,
        center: bool,
    ) -> ProductionInfo {
        let mut info = ProductionInfo::new();
        let Some(tile_type) = self.catalog.tile_type(tile.tile_type) else {
            return info;
        };
        let attended = !assignment.production_type.unattended;

        for output in &assignment.production_type.outputs {
            let base = tile_type.potential_production(output.goods, attended);
            let amount = self.modified_amount(base, tile, turn, assignment, center, output.goods);
            if amount > 0 {
                info.production.push(AbstractGoods::new(output.goods, amount));
            }
        }
        trace!(
            outputs = info.production.len(),
            center,
            "tile production computed"
        );
        info
    }

    fn modified_amount(
        &self,
        base: i32,
        tile: &Tile,
        turn: i32,
        assignment: &WorkerAssignment,
        center: bool,
        goods: GoodsId,
    ) -> i32 {
        let mut chain: Vec<Modifier> = Vec::new();
        for improvement_id in &tile.improvements {
            if let Some(improvement) = self.catalog.improvement(*improvement_id) {
                let bonus = improvement.bonus_for(goods);
                if bonus != 0 {
                    chain.push(Modifier::additive(bonus));
                }
            }
        }
        if let Some(unit_type) = assignment
            .unit_type
            .and_then(|id| self.catalog.unit_type(id))
        {
            chain.extend(unit_type.modifiers_for(goods).map(|gm| gm.modifier));
        }
        // The rebel bonus boosts worked slots and the colony's own
        // center tile, never other unattended production.
        if (assignment.unit_type.is_some() || center) && self.colony_bonus != 0 {
            chain.push(Modifier::additive(self.colony_bonus));
        }
        chain.extend(
            self.owner
                .production_modifiers
                .iter()
                .filter(|gm| gm.goods == goods)
                .map(|gm| gm.modifier),
        );
        floor_to_i32(apply_modifiers(Fixed::from_num(base), turn, chain.iter()))
    }

    /// The best production of one good reachable through improvements.
    ///
    /// Brute-force enumeration: the bare terrain, each buildable
    /// improvement's bonus, and each terrain-changing improvement
    /// followed by one ordinary improvement valid on the new terrain.
    /// Catalogs hold tens of entries, so no pruning is needed.
    #[must_use]
    pub fn maximum_potential_production(
        &self,
        goods: GoodsId,
        tile: &Tile,
        attended: bool,
    ) -> i32 {
        let Some(tile_type) = self.catalog.tile_type(tile.tile_type) else {
            return 0;
        };
        let mut best = tile_type.potential_production(goods, attended);

        for improvement in self.buildable_on(tile_type) {
            let candidate = match improvement.change_to {
                None => tile_type.potential_production(goods, attended)
                    + improvement.bonus_for(goods),
                Some(new_type_id) => {
                    let Some(new_type) = self.catalog.tile_type(new_type_id) else {
                        continue;
                    };
                    let changed = new_type.potential_production(goods, attended);
                    let follow_up = self
                        .buildable_on(new_type)
                        .filter(|second| second.change_to.is_none())
                        .map(|second| second.bonus_for(goods))
                        .max()
                        .unwrap_or(0);
                    changed + follow_up.max(0)
                }
            };
            best = best.max(candidate);
        }
        best
    }

    fn buildable_on(
        &self,
        tile_type: &'a TileType,
    ) -> impl Iterator<Item = &'a TileImprovementType> {
        self.catalog
            .all_improvements()
            .filter(move |imp| !imp.natural && imp.is_valid_on(tile_type))
    }
}
