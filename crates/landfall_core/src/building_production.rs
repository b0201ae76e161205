//! Building production: ratio-constrained output of a worked building.
//!
//! The calculation merges nominal inputs/outputs from unattended modes
//! and per-worker modes, then squeezes them through three constraints in
//! order: the breeding formula for auto-producing buildings, input stock
//! availability, and warehouse headroom. All ratio math is fixed-point.

use std::collections::BTreeMap;

use tracing::trace;

use crate::catalog::{BuildingType, BuildingTypeId, Catalog};
use crate::error::Result;
use crate::goods::{
    add_goods, apply_modifiers, AbstractGoods, GoodsId, Modifier, ProductionInfo,
};
use crate::math::{floor_to_i32, Fixed};
use crate::player::Player;
use crate::tile_production::WorkerAssignment;

/// Guards the final floor against fixed-point underestimation at exact
/// integer boundaries (about 1.5e-5).
const EPSILON: Fixed = Fixed::from_bits(1 << 16);

/// Computes production of a single building for one colony.
#[derive(Debug, Clone, Copy)]
pub struct BuildingProductionCalculator<'a> {
    catalog: &'a Catalog,
    owner: &'a Player,
    /// The colony's rebel-sentiment production bonus, in additive points.
    colony_bonus: i32,
}

impl<'a> BuildingProductionCalculator<'a> {
    /// Create a calculator for one colony's owner and bonus.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, owner: &'a Player, colony_bonus: i32) -> Self {
        Self {
            catalog,
            owner,
            colony_bonus,
        }
    }

    /// Production and consumption of a building on a given turn.
    ///
    /// `stock` is the colony's current store per goods type; inputs are
    /// drawn from it and outputs are headroom-clamped against it when
    /// the building avoids overflow. Workers contribute their own
    /// operating modes on top of the building's unattended ones.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GameError::UnknownType`] when the
    /// building type is not in the catalog.
    pub fn adjusted_production_info(
        &self,
        building: BuildingTypeId,
        turn: i32,
        workers: &[WorkerAssignment],
        stock: &BTreeMap<GoodsId, i32>,
        warehouse_capacity: i32,
    ) -> Result<ProductionInfo> {
        let building_type = self.catalog.require_building_type(building)?;

        let (outputs, inputs) = self.nominal_goods(building_type, turn, workers);
        if outputs.is_empty() {
            return Ok(ProductionInfo::new());
        }

        let (mut minimum, mut maximum) = if building_type.auto_production {
            breeding_ratios(building_type, &outputs, stock, warehouse_capacity)
        } else {
            (Fixed::ONE, Fixed::ONE)
        };

        minimum = self.scale_by_inputs(building_type, &inputs, &outputs, stock, minimum, workers);

        if building_type.avoid_overflow {
            for output in &outputs {
                let headroom = (warehouse_capacity - stock_of(stock, output.goods)).max(0);
                if output.amount > 0 {
                    let limit = Fixed::from_num(headroom) / Fixed::from_num(output.amount);
                    minimum = minimum.min(limit);
                    maximum = maximum.min(limit);
                }
            }
        }

        trace!(
            building = building.0,
            minimum = %minimum,
            maximum = %maximum,
            "building ratios resolved"
        );
        Ok(realize(&outputs, &inputs, minimum, maximum))
    }

    /// Merge nominal output/input lists from unattended modes and
    /// worker slots, with the modifier asymmetry: building-level plus
    /// owner modifiers for unattended output, worker expertise plus
    /// rebel bonus plus owner modifiers for worked output.
    fn nominal_goods(
        &self,
        building_type: &BuildingType,
        turn: i32,
        workers: &[WorkerAssignment],
    ) -> (Vec<AbstractGoods>, Vec<AbstractGoods>) {
        let mut outputs: Vec<AbstractGoods> = Vec::new();
        let mut inputs: Vec<AbstractGoods> = Vec::new();

        for mode in building_type.unattended_production() {
            for output in &mode.outputs {
                let mut chain: Vec<Modifier> = building_type
                    .modifiers_for(output.goods)
                    .map(|gm| gm.modifier)
                    .collect();
                chain.extend(self.owner_modifiers(output.goods));
                let amount = floor_to_i32(apply_modifiers(
                    Fixed::from_num(output.amount),
                    turn,
                    chain.iter(),
                ));
                add_goods(&mut outputs, output.goods, amount);
            }
            for input in &mode.inputs {
                add_goods(&mut inputs, input.goods, input.amount);
            }
        }

        for worker in workers {
            for output in &worker.production_type.outputs {
                let mut chain: Vec<Modifier> = Vec::new();
                if let Some(unit_type) = worker
                    .unit_type
                    .and_then(|id| self.catalog.unit_type(id))
                {
                    chain.extend(unit_type.modifiers_for(output.goods).map(|gm| gm.modifier));
                }
                if self.colony_bonus != 0 {
                    chain.push(Modifier::additive(self.colony_bonus));
                }
                chain.extend(self.owner_modifiers(output.goods));
                let amount = floor_to_i32(apply_modifiers(
                    Fixed::from_num(output.amount),
                    turn,
                    chain.iter(),
                ));
                add_goods(&mut outputs, output.goods, amount);
            }
            for input in &worker.production_type.inputs {
                add_goods(&mut inputs, input.goods, input.amount);
            }
        }

        (outputs, inputs)
    }

    fn owner_modifiers(&self, goods: GoodsId) -> impl Iterator<Item = Modifier> + '_ {
        self.owner
            .production_modifiers
            .iter()
            .filter(move |gm| gm.goods == goods)
            .map(|gm| gm.modifier)
    }

    /// Scale the minimum ratio down when input stock falls short of the
    /// requirement, honoring the factory ability's guaranteed floor.
    fn scale_by_inputs(
        &self,
        building_type: &BuildingType,
        inputs: &[AbstractGoods],
        outputs: &[AbstractGoods],
        stock: &BTreeMap<GoodsId, i32>,
        mut minimum: Fixed,
        workers: &[WorkerAssignment],
    ) -> Fixed {
        for input in inputs {
            let required = floor_to_i32(Fixed::from_num(input.amount) * minimum);
            if required <= 0 {
                continue;
            }
            let available = stock_of(stock, input.goods);
            if available >= required {
                continue;
            }
            let scaled =
                minimum * Fixed::from_num(available.max(0)) / Fixed::from_num(required);
            if building_type.factory_minimum > 0 && !workers.is_empty() {
                let guaranteed = building_type.factory_minimum * workers.len() as i32;
                let floor_ratio = outputs
                    .iter()
                    .filter(|o| o.amount > 0)
                    .map(|o| Fixed::from_num(guaranteed) / Fixed::from_num(o.amount))
                    .fold(Fixed::ZERO, Fixed::max);
                minimum = scaled.max(floor_ratio.min(minimum));
            } else {
                minimum = scaled;
            }
        }
        minimum
    }
}

/// The breeding formula for auto-producing buildings: desired output is
/// `((available - 1) / divisor + 1) * factor`, zeroed once stock meets
/// the warehouse capacity. Ratios are desired over nominal, minimum and
/// maximum taken across outputs.
fn breeding_ratios(
    building_type: &BuildingType,
    outputs: &[AbstractGoods],
    stock: &BTreeMap<GoodsId, i32>,
    warehouse_capacity: i32,
) -> (Fixed, Fixed) {
    let mut minimum: Option<Fixed> = None;
    let mut maximum = Fixed::ZERO;
    for output in outputs {
        if output.amount <= 0 {
            continue;
        }
        let available = stock_of(stock, output.goods);
        let desired = if available >= warehouse_capacity {
            0
        } else {
            ((available - 1) / building_type.breeding_divisor + 1)
                * building_type.breeding_factor
        };
        let ratio = Fixed::from_num(desired.max(0)) / Fixed::from_num(output.amount);
        minimum = Some(minimum.map_or(ratio, |m| m.min(ratio)));
        maximum = maximum.max(ratio);
    }
    (minimum.unwrap_or(Fixed::ONE), maximum)
}

fn stock_of(stock: &BTreeMap<GoodsId, i32>, goods: GoodsId) -> i32 {
    stock.get(&goods).copied().unwrap_or(0)
}

/// Turn nominal lists and resolved ratios into final integers. Realized
/// amounts take the epsilon guard; maxima are epsilon-free and reported
/// only where strictly greater.
fn realize(
    outputs: &[AbstractGoods],
    inputs: &[AbstractGoods],
    minimum: Fixed,
    maximum: Fixed,
) -> ProductionInfo {
    let mut info = ProductionInfo::new();
    for output in outputs {
        let amount = floor_to_i32(Fixed::from_num(output.amount) * minimum + EPSILON);
        if amount != 0 {
            info.production.push(AbstractGoods::new(output.goods, amount));
        }
        let best = floor_to_i32(Fixed::from_num(output.amount) * maximum);
        if best > amount {
            info.maximum_production
                .push(AbstractGoods::new(output.goods, best));
        }
    }
    for input in inputs {
        let amount = floor_to_i32(Fixed::from_num(input.amount) * minimum + EPSILON);
        if amount != 0 {
            info.consumption.push(AbstractGoods::new(input.goods, amount));
        }
        let most = floor_to_i32(Fixed::from_num(input.amount) * maximum);
        if most > amount {
            info.maximum_consumption
                .push(AbstractGoods::new(input.goods, most));
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{UnitType, UnitTypeId};
    use crate::goods::{GoodsModifier, ProductionType};
    use crate::player::PlayerId;

    const ORE: GoodsId = GoodsId(1);
    const TOOLS: GoodsId = GoodsId(2);
    const HORSES: GoodsId = GoodsId(3);
    const SMITHY: BuildingTypeId = BuildingTypeId(1);
    const STABLES: BuildingTypeId = BuildingTypeId(2);
    const SMITH: UnitTypeId = UnitTypeId(1);

    fn smith_mode(output: i32, input: i32) -> ProductionType {
        ProductionType::new(
            vec![AbstractGoods::new(ORE, input)],
            vec![AbstractGoods::new(TOOLS, output)],
        )
    }

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register_building_type(BuildingType::new(SMITHY, "Blacksmith's house"));
        catalog.register_building_type(
            BuildingType::new(STABLES, "Stables")
                .with_production(vec![ProductionType::unattended(
                    vec![],
                    vec![AbstractGoods::new(HORSES, 1)],
                )])
                .auto_producing(2, 1),
        );
        catalog.register_unit_type(UnitType::land(SMITH, "Blacksmith", 3));
        catalog
    }

    fn stock(entries: &[(GoodsId, i32)]) -> BTreeMap<GoodsId, i32> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_full_inputs_give_nominal_output() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        let workers = vec![WorkerAssignment::worked(SMITH, smith_mode(6, 10))];
        let info = calc
            .adjusted_production_info(SMITHY, 1, &workers, &stock(&[(ORE, 50)]), 100)
            .unwrap();
        assert_eq!(info.production_of(TOOLS), 6);
        assert_eq!(info.consumption_of(ORE), 10);
        assert!(info.maximum_production.is_empty());
    }

    #[test]
    fn test_short_inputs_scale_production_down() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        // Nominal 6 tools from 10 ore; only 5 ore available.
        let workers = vec![WorkerAssignment::worked(SMITH, smith_mode(6, 10))];
        let info = calc
            .adjusted_production_info(SMITHY, 1, &workers, &stock(&[(ORE, 5)]), 100)
            .unwrap();
        assert_eq!(info.production_of(TOOLS), 3);
        assert_eq!(info.consumption_of(ORE), 5);
        // The unconstrained potential is still the nominal amount.
        assert_eq!(
            info.maximum_production,
            vec![AbstractGoods::new(TOOLS, 6)]
        );
    }

    #[test]
    fn test_factory_minimum_survives_empty_stores() {
        let mut catalog = test_catalog();
        catalog.register_building_type(
            BuildingType::new(SMITHY, "Ironworks")
                .with_factory_minimum(2),
        );
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        let workers = vec![WorkerAssignment::worked(SMITH, smith_mode(6, 10))];
        let info = calc
            .adjusted_production_info(SMITHY, 1, &workers, &stock(&[]), 100)
            .unwrap();
        // One worker's guaranteed floor of 2 tools, despite zero ore.
        assert_eq!(info.production_of(TOOLS), 2);
    }

    #[test]
    fn test_breeding_formula() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        // ((5 - 1) / 2 + 1) * 1 = 3 new horses.
        let info = calc
            .adjusted_production_info(STABLES, 1, &[], &stock(&[(HORSES, 5)]), 100)
            .unwrap();
        assert_eq!(info.production_of(HORSES), 3);
    }

    #[test]
    fn test_breeding_stops_at_capacity() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        let info = calc
            .adjusted_production_info(STABLES, 1, &[], &stock(&[(HORSES, 100)]), 100)
            .unwrap();
        assert_eq!(info.production_of(HORSES), 0);
        assert!(info.is_empty());
    }

    #[test]
    fn test_overflow_clamp_limits_breeding() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        // Formula wants ((98-1)/2+1) = 49, but only 2 fit.
        let info = calc
            .adjusted_production_info(STABLES, 1, &[], &stock(&[(HORSES, 98)]), 100)
            .unwrap();
        assert_eq!(info.production_of(HORSES), 2);
    }

    #[test]
    fn test_unknown_building_errors() {
        let catalog = test_catalog();
        let owner = Player::new(PlayerId(1));
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 0);

        let result =
            calc.adjusted_production_info(BuildingTypeId(99), 1, &[], &stock(&[]), 100);
        assert!(result.is_err());
    }

    #[test]
    fn test_unattended_output_takes_building_modifiers_only() {
        let mut catalog = test_catalog();
        catalog.register_building_type(
            BuildingType::new(SMITHY, "Town hall")
                .with_production(vec![ProductionType::unattended(
                    vec![],
                    vec![AbstractGoods::new(TOOLS, 4)],
                )])
                .with_modifiers(vec![GoodsModifier::new(TOOLS, Modifier::percentage(50))]),
        );
        let owner = Player::new(PlayerId(1));
        // A rebel bonus that must not leak into unattended output.
        let calc = BuildingProductionCalculator::new(&catalog, &owner, 3);

        let info = calc
            .adjusted_production_info(SMITHY, 1, &[], &stock(&[]), 100)
            .unwrap();
        // floor(4 * 1.5) = 6, untouched by the rebel bonus.
        assert_eq!(info.production_of(TOOLS), 6);
    }
}
