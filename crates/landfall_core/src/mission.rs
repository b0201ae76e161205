//! Mission assignments produced by the military coordinator.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::player::ColonyId;
use crate::unit::UnitId;

/// A standing order for one military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mission {
    /// Garrison or reinforce a colony.
    DefendColony(ColonyId),
    /// Hunt down a specific enemy unit.
    SeekAndDestroy(UnitId),
    /// Roam toward whatever hostiles turn up.
    Wander,
}

impl Mission {
    /// The stable tag naming this mission kind, for serialization and
    /// order logs.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::DefendColony(_) => "defend-colony",
            Self::SeekAndDestroy(_) => "seek-and-destroy",
            Self::Wander => "wander",
        }
    }

    /// Rebuild a mission from its tag and an optional target id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] for an unknown tag or a
    /// missing target where the mission kind needs one.
    pub fn from_tag(tag: &str, target: Option<u32>) -> Result<Self> {
        match (tag, target) {
            ("defend-colony", Some(id)) => Ok(Self::DefendColony(ColonyId(id))),
            ("seek-and-destroy", Some(id)) => Ok(Self::SeekAndDestroy(UnitId(id))),
            ("wander", _) => Ok(Self::Wander),
            ("defend-colony" | "seek-and-destroy", None) => Err(GameError::InvalidState(
                format!("mission '{tag}' requires a target"),
            )),
            _ => Err(GameError::InvalidState(format!("unknown mission tag '{tag}'"))),
        }
    }
}
