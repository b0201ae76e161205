//! Mobile units: data, roles, locations, and move classification types.
//!
//! Units are pure data here; move legality and cost live on
//! [`crate::world::World`], which has the map and diplomatic context.

use serde::{Deserialize, Serialize};

use crate::catalog::UnitTypeId;
use crate::map::TileId;
use crate::player::PlayerId;

/// Unique identifier for units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

/// Where a unit currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitLocation {
    /// On a map tile.
    Tile(TileId),
    /// In the off-map old-world haven, reachable via the high seas.
    HighSeasHaven,
    /// Aboard a carrier unit.
    Carrier(UnitId),
}

/// A unit's military role, determined by its equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    /// No military equipment.
    #[default]
    Civilian,
    /// Armed foot soldier.
    Soldier,
    /// Mounted and armed.
    Dragoon,
    /// Artillery piece.
    Artillery,
}

impl Role {
    /// Whether this role counts as a military unit.
    #[must_use]
    pub const fn is_military(self) -> bool {
        !matches!(self, Self::Civilian)
    }
}

/// A mobile agent on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// The unit's type.
    pub unit_type: UnitTypeId,
    /// Current location.
    pub location: UnitLocation,
    /// Military role.
    pub role: Role,
    /// Movement allowance remaining this turn, in move units.
    pub moves_left: i32,
}

impl Unit {
    /// Create a new unit on a tile with a full move allowance.
    #[must_use]
    pub fn new(
        id: UnitId,
        owner: PlayerId,
        unit_type: UnitTypeId,
        tile: TileId,
        moves_left: i32,
    ) -> Self {
        Self {
            id,
            owner,
            unit_type,
            location: UnitLocation::Tile(tile),
            role: Role::Civilian,
            moves_left,
        }
    }

    /// Set the military role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// The tile this unit stands on, if it is on the map.
    #[must_use]
    pub const fn tile(&self) -> Option<TileId> {
        match self.location {
            UnitLocation::Tile(tile) => Some(tile),
            _ => None,
        }
    }
}

/// Classification of a single prospective move.
///
/// The cost deciders key their arithmetic off this: ordinary moves spend
/// terrain cost, whole-turn moves additionally zero the mover's
/// remaining allowance, and high-seas transit is priced in whole turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    /// Ordinary tile-to-tile movement.
    Move,
    /// Transit between a high-seas tile and the old-world haven.
    HighSeas,
    /// Attacking a hostile occupant or settlement. Consumes the turn.
    Attack,
    /// Boarding a friendly carrier. Consumes the turn.
    Embark,
    /// Leaving a carrier onto land. Consumes the turn.
    Disembark,
    /// Entering a foreign settlement peacefully. Consumes the turn.
    EnterSettlement,
    /// Investigating a rumour site. Consumes the turn.
    Explore,
    /// The move cannot legally be made.
    Illegal,
}

impl MoveType {
    /// Whether this move type is legal at all.
    #[must_use]
    pub const fn is_legal(self) -> bool {
        !matches!(self, Self::Illegal)
    }

    /// Whether this move type consumes the mover's whole turn.
    #[must_use]
    pub const fn consumes_turn(self) -> bool {
        matches!(
            self,
            Self::Attack | Self::Embark | Self::Disembark | Self::EnterSettlement | Self::Explore
        )
    }
}
