//! Players, diplomatic stances, and colonies.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::goods::GoodsModifier;
use crate::map::TileId;

/// Unique identifier for players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

/// Unique identifier for colonies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ColonyId(pub u32);

/// Diplomatic stance between two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    /// Full military alliance.
    Alliance,
    /// Normal peaceful relations.
    #[default]
    Peace,
    /// Hostilities suspended but not resolved.
    Ceasefire,
    /// Open war.
    War,
}

impl Stance {
    /// Whether this stance permits attacking.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::War)
    }

    /// Whether this stance counts as allied for defensive purposes.
    #[must_use]
    pub const fn is_allied(self) -> bool {
        matches!(self, Self::Alliance)
    }
}

/// One player's persistent state, as seen by the logic core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// Stances toward other players. Absent entries default to peace.
    pub stances: BTreeMap<PlayerId, Stance>,
    /// Tiles this player has explored.
    pub explored: BTreeSet<TileId>,
    /// Tiles currently visible to this player.
    pub visible: BTreeSet<TileId>,
    /// This player's colonies, in founding order.
    pub colonies: Vec<ColonyId>,
    /// Player-wide production modifiers (founding fathers, traits).
    pub production_modifiers: Vec<GoodsModifier>,
}

impl Player {
    /// Create a new player.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            stances: BTreeMap::new(),
            explored: BTreeSet::new(),
            visible: BTreeSet::new(),
            colonies: Vec::new(),
            production_modifiers: Vec::new(),
        }
    }

    /// This player's stance toward another player.
    #[must_use]
    pub fn stance_toward(&self, other: PlayerId) -> Stance {
        if other == self.id {
            return Stance::Alliance;
        }
        self.stances.get(&other).copied().unwrap_or_default()
    }

    /// Whether this player is at war with another.
    #[must_use]
    pub fn at_war_with(&self, other: PlayerId) -> bool {
        self.stance_toward(other).is_hostile()
    }

    /// Whether this player has explored a tile.
    #[must_use]
    pub fn has_explored(&self, tile: TileId) -> bool {
        self.explored.contains(&tile)
    }

    /// Whether a tile is currently visible to this player.
    #[must_use]
    pub fn can_see(&self, tile: TileId) -> bool {
        self.visible.contains(&tile)
    }
}

/// One colony's state, as seen by the logic core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    /// Unique identifier.
    pub id: ColonyId,
    /// Owning player.
    pub owner: PlayerId,
    /// The tile this colony occupies.
    pub tile: TileId,
    /// Rebel-sentiment production bonus, in additive points.
    pub production_bonus: i32,
    /// Whether this colony has a port connected to the high seas.
    pub connected_port: bool,
    /// Aggregate defensive strength of the colony's works.
    pub defence: i32,
    /// Warehouse capacity per goods type.
    pub warehouse_capacity: i32,
}

impl Colony {
    /// Default warehouse capacity per goods type.
    pub const DEFAULT_WAREHOUSE_CAPACITY: i32 = 100;

    /// Create a new colony.
    #[must_use]
    pub fn new(id: ColonyId, owner: PlayerId, tile: TileId) -> Self {
        Self {
            id,
            owner,
            tile,
            production_bonus: 0,
            connected_port: false,
            defence: 0,
            warehouse_capacity: Self::DEFAULT_WAREHOUSE_CAPACITY,
        }
    }

    /// Set the rebel production bonus.
    #[must_use]
    pub const fn with_production_bonus(mut self, bonus: i32) -> Self {
        self.production_bonus = bonus;
        self
    }

    /// Mark this colony as having a connected port.
    #[must_use]
    pub const fn with_port(mut self) -> Self {
        self.connected_port = true;
        self
    }
}
