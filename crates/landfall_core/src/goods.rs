//! Goods, production modes, and modifier resolution.
//!
//! These are small, short-lived value structs: a production recompute
//! builds them fresh each time and throws them away. All scaling math
//! uses fixed-point via [`crate::math::Fixed`] for determinism.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Unique identifier for goods types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GoodsId(pub u32);

impl GoodsId {
    /// Create a new goods id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A goods type paired with an integer amount.
///
/// Amount semantics are directional: a positive amount means produced
/// (in an output list) or required (in an input list). Negative amounts
/// represent consumption when both directions share one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractGoods {
    /// The goods type.
    pub goods: GoodsId,
    /// The amount, in whole units.
    pub amount: i32,
}

impl AbstractGoods {
    /// Create a new goods/amount pair.
    #[must_use]
    pub const fn new(goods: GoodsId, amount: i32) -> Self {
        Self { goods, amount }
    }
}

/// Find the amount of a goods type in a list, defaulting to zero.
#[must_use]
pub fn goods_amount(list: &[AbstractGoods], goods: GoodsId) -> i32 {
    list.iter()
        .find(|ag| ag.goods == goods)
        .map_or(0, |ag| ag.amount)
}

/// Merge an amount into a goods list, summing with any existing entry.
///
/// Entries merged down to zero are retained; callers that must not
/// report zero amounts filter on output instead.
pub fn add_goods(list: &mut Vec<AbstractGoods>, goods: GoodsId, amount: i32) {
    if let Some(existing) = list.iter_mut().find(|ag| ag.goods == goods) {
        existing.amount += amount;
    } else {
        list.push(AbstractGoods::new(goods, amount));
    }
}

/// One operating mode's input/output goods lists for a tile or building.
///
/// A tile or building type may carry several production types, e.g. an
/// unattended mode used for center tiles and an attended per-worker mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductionType {
    /// Goods consumed by this mode, per nominal cycle.
    pub inputs: Vec<AbstractGoods>,
    /// Goods produced by this mode, per nominal cycle.
    pub outputs: Vec<AbstractGoods>,
    /// Whether this mode runs without an assigned worker.
    pub unattended: bool,
}

impl ProductionType {
    /// Create a new attended production type.
    #[must_use]
    pub fn new(inputs: Vec<AbstractGoods>, outputs: Vec<AbstractGoods>) -> Self {
        Self {
            inputs,
            outputs,
            unattended: false,
        }
    }

    /// Create a new unattended production type.
    #[must_use]
    pub fn unattended(inputs: Vec<AbstractGoods>, outputs: Vec<AbstractGoods>) -> Self {
        Self {
            inputs,
            outputs,
            unattended: true,
        }
    }

    /// The nominal output amount for a goods type, zero if absent.
    #[must_use]
    pub fn output_of(&self, goods: GoodsId) -> i32 {
        goods_amount(&self.outputs, goods)
    }
}

/// Output record of a production calculation.
///
/// Every amount in here is the floor of a real-valued ratio calculation;
/// fractional goods are never created. The `maximum_*` lists carry the
/// unconstrained potential and are populated only where it strictly
/// exceeds the realized amount.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductionInfo {
    /// Goods consumed this cycle.
    pub consumption: Vec<AbstractGoods>,
    /// Goods produced this cycle.
    pub production: Vec<AbstractGoods>,
    /// Unconstrained consumption potential, where it differs.
    pub maximum_consumption: Vec<AbstractGoods>,
    /// Unconstrained production potential, where it differs.
    pub maximum_production: Vec<AbstractGoods>,
}

impl ProductionInfo {
    /// Create an empty production record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Realized production of a goods type, zero if absent.
    #[must_use]
    pub fn production_of(&self, goods: GoodsId) -> i32 {
        goods_amount(&self.production, goods)
    }

    /// Realized consumption of a goods type, zero if absent.
    #[must_use]
    pub fn consumption_of(&self, goods: GoodsId) -> i32 {
        goods_amount(&self.consumption, goods)
    }

    /// True when nothing was produced or consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.consumption.is_empty()
    }
}

/// The numeric effect of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Added to the base value.
    Additive(#[serde(with = "fixed_serde")] Fixed),
    /// Multiplies the running value.
    Multiplicative(#[serde(with = "fixed_serde")] Fixed),
    /// Percentage points added after multiplication (25 = +25%).
    Percentage(#[serde(with = "fixed_serde")] Fixed),
}

/// A bonus or penalty applied to a production base value.
///
/// Modifiers may be scoped to a turn window, e.g. a founding-father
/// bonus that only takes effect from a given turn onward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    /// The numeric effect.
    pub kind: ModifierKind,
    /// First turn this modifier applies, if bounded below.
    pub first_turn: Option<i32>,
    /// Last turn this modifier applies, if bounded above.
    pub last_turn: Option<i32>,
}

impl Modifier {
    /// An unbounded additive modifier.
    #[must_use]
    pub fn additive(value: i32) -> Self {
        Self {
            kind: ModifierKind::Additive(Fixed::from_num(value)),
            first_turn: None,
            last_turn: None,
        }
    }

    /// An unbounded multiplicative modifier.
    #[must_use]
    pub fn multiplicative(value: Fixed) -> Self {
        Self {
            kind: ModifierKind::Multiplicative(value),
            first_turn: None,
            last_turn: None,
        }
    }

    /// An unbounded percentage modifier (25 = +25%).
    #[must_use]
    pub fn percentage(value: i32) -> Self {
        Self {
            kind: ModifierKind::Percentage(Fixed::from_num(value)),
            first_turn: None,
            last_turn: None,
        }
    }

    /// Restrict this modifier to a turn window.
    #[must_use]
    pub const fn with_turns(mut self, first: Option<i32>, last: Option<i32>) -> Self {
        self.first_turn = first;
        self.last_turn = last;
        self
    }

    /// Whether this modifier is in scope on the given turn.
    #[must_use]
    pub fn applies_on(&self, turn: i32) -> bool {
        self.first_turn.map_or(true, |first| turn >= first)
            && self.last_turn.map_or(true, |last| turn <= last)
    }
}

/// A modifier attached to a specific goods type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodsModifier {
    /// The goods type the modifier affects.
    pub goods: GoodsId,
    /// The modifier itself.
    pub modifier: Modifier,
}

impl GoodsModifier {
    /// Create a new goods-scoped modifier.
    #[must_use]
    pub const fn new(goods: GoodsId, modifier: Modifier) -> Self {
        Self { goods, modifier }
    }
}

/// Resolve a modifier chain against a base value.
///
/// Combination order is fixed: additive contributions sum onto the base,
/// then multiplicative factors apply, then percentage points:
/// `(base + sum(add)) * prod(mul) * (1 + sum(pct) / 100)`.
/// Modifiers out of scope for `turn` are skipped.
#[must_use]
pub fn apply_modifiers<'a, I>(base: Fixed, turn: i32, modifiers: I) -> Fixed
where
    I: IntoIterator<Item = &'a Modifier>,
{
    let mut additive = Fixed::ZERO;
    let mut multiplicative = Fixed::ONE;
    let mut percentage = Fixed::ZERO;

    for modifier in modifiers {
        if !modifier.applies_on(turn) {
            continue;
        }
        match modifier.kind {
            ModifierKind::Additive(v) => additive += v,
            ModifierKind::Multiplicative(v) => multiplicative *= v,
            ModifierKind::Percentage(v) => percentage += v,
        }
    }

    let hundred = Fixed::from_num(100);
    (base + additive) * multiplicative * (Fixed::ONE + percentage / hundred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::floor_to_i32;

    #[test]
    fn test_goods_amount_lookup() {
        let list = vec![
            AbstractGoods::new(GoodsId(1), 4),
            AbstractGoods::new(GoodsId(2), 7),
        ];
        assert_eq!(goods_amount(&list, GoodsId(1)), 4);
        assert_eq!(goods_amount(&list, GoodsId(2)), 7);
        assert_eq!(goods_amount(&list, GoodsId(3)), 0);
    }

    #[test]
    fn test_add_goods_merges() {
        let mut list = vec![AbstractGoods::new(GoodsId(1), 4)];
        add_goods(&mut list, GoodsId(1), 3);
        add_goods(&mut list, GoodsId(2), 5);
        assert_eq!(goods_amount(&list, GoodsId(1)), 7);
        assert_eq!(goods_amount(&list, GoodsId(2)), 5);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_apply_modifiers_order() {
        // (10 + 2) * 2 * (1 + 50/100) = 36
        let mods = vec![
            Modifier::percentage(50),
            Modifier::additive(2),
            Modifier::multiplicative(Fixed::from_num(2)),
        ];
        let result = apply_modifiers(Fixed::from_num(10), 1, mods.iter());
        assert_eq!(floor_to_i32(result), 36);
    }

    #[test]
    fn test_apply_modifiers_empty_chain() {
        let result = apply_modifiers(Fixed::from_num(5), 1, std::iter::empty());
        assert_eq!(result, Fixed::from_num(5));
    }

    #[test]
    fn test_modifier_turn_scope() {
        let scoped = Modifier::additive(10).with_turns(Some(5), Some(10));
        assert!(!scoped.applies_on(4));
        assert!(scoped.applies_on(5));
        assert!(scoped.applies_on(10));
        assert!(!scoped.applies_on(11));

        let early = apply_modifiers(Fixed::from_num(1), 4, [scoped].iter());
        assert_eq!(early, Fixed::from_num(1));
        let active = apply_modifiers(Fixed::from_num(1), 7, [scoped].iter());
        assert_eq!(active, Fixed::from_num(11));
    }

    #[test]
    fn test_production_info_accessors() {
        let mut info = ProductionInfo::new();
        assert!(info.is_empty());
        info.production.push(AbstractGoods::new(GoodsId(1), 3));
        info.consumption.push(AbstractGoods::new(GoodsId(2), 5));
        assert_eq!(info.production_of(GoodsId(1)), 3);
        assert_eq!(info.consumption_of(GoodsId(2)), 5);
        assert_eq!(info.production_of(GoodsId(9)), 0);
        assert!(!info.is_empty());
    }
}
