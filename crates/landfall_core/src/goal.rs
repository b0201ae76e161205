//! Goal deciders: pluggable success/ranking predicates for the search.
//!
//! Each decider is a small explicit state-holding struct. The engine
//! calls [`GoalDecider::check`] on every dequeued path in non-decreasing
//! cost order; a decider without sub-goals stops the search at its first
//! acceptance, one with sub-goals keeps ranking until the search drains.

use std::collections::{BTreeMap, BTreeSet};

use crate::map::TileId;
use crate::math::Fixed;
use crate::player::PlayerId;
use crate::search::PathNode;
use crate::unit::Unit;
use crate::world::World;

/// A search-termination/ranking predicate consulted per explored path.
pub trait GoalDecider {
    /// Inspect a dequeued path. Returning `true` signals acceptance;
    /// whether the search stops depends on [`Self::has_sub_goals`].
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool;

    /// Whether the search should keep exploring after a first success.
    fn has_sub_goals(&self) -> bool;

    /// The best path found so far, if any.
    fn goal(&self) -> Option<&PathNode>;
}

/// Succeeds exactly at a fixed target tile, keeping the lowest-cost
/// arrival (tiles may be reached again via different paths).
#[derive(Debug, Clone)]
pub struct LocationGoal {
    target: TileId,
    best: Option<PathNode>,
}

impl LocationGoal {
    /// Target a specific tile.
    #[must_use]
    pub const fn new(target: TileId) -> Self {
        Self { target, best: None }
    }
}

impl GoalDecider for LocationGoal {
    fn check(&mut self, _unit: &Unit, _world: &World, node: &PathNode) -> bool {
        if node.tile != self.target {
            return false;
        }
        let improves = self
            .best
            .as_ref()
            .map_or(true, |known| node.cost < known.cost);
        if improves {
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        false
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Succeeds on any tile of the target's 8-neighborhood; first hit wins.
#[derive(Debug, Clone)]
pub struct AdjacentLocationGoal {
    target: TileId,
    best: Option<PathNode>,
}

impl AdjacentLocationGoal {
    /// Target the neighborhood of a tile.
    #[must_use]
    pub const fn new(target: TileId) -> Self {
        Self { target, best: None }
    }
}

impl GoalDecider for AdjacentLocationGoal {
    fn check(&mut self, _unit: &Unit, world: &World, node: &PathNode) -> bool {
        if !world.map.is_adjacent(node.tile, self.target) {
            return false;
        }
        if self.best.is_none() {
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        false
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Succeeds at the first explored, high-seas-connected tile
/// encountered.
#[derive(Debug, Clone, Default)]
pub struct HighSeasGoal {
    best: Option<PathNode>,
}

impl HighSeasGoal {
    /// Create the goal.
    #[must_use]
    pub const fn new() -> Self {
        Self { best: None }
    }
}

impl GoalDecider for HighSeasGoal {
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool {
        if !world.tile(node.tile).is_some_and(|t| t.high_seas) {
            return false;
        }
        let explored = world
            .player(unit.owner)
            .is_some_and(|p| p.has_explored(node.tile));
        if !explored {
            return false;
        }
        if self.best.is_none() {
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        false
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Player-aware high-seas goal: the tile must be explored by the unit's
/// owner, high-seas connected, and free of foreign units. Keeps the
/// lowest-cost success across the whole search.
#[derive(Debug, Clone, Default)]
pub struct OwnedHighSeasGoal {
    best: Option<PathNode>,
}

impl OwnedHighSeasGoal {
    /// Create the goal.
    #[must_use]
    pub const fn new() -> Self {
        Self { best: None }
    }
}

impl GoalDecider for OwnedHighSeasGoal {
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool {
        let Some(tile) = world.tile(node.tile) else {
            return false;
        };
        let explored = world
            .player(unit.owner)
            .is_some_and(|p| p.has_explored(node.tile));
        if !tile.high_seas || !explored {
            return false;
        }
        if world.units_on(node.tile).any(|u| u.owner != unit.owner) {
            return false;
        }
        let improves = self
            .best
            .as_ref()
            .map_or(true, |known| node.cost < known.cost);
        if improves {
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Ranks the searching player's own settlements by
/// `(2 if connected port else 1) / (turns + 1)`, keeping strictly
/// improving candidates.
#[derive(Debug, Clone, Default)]
pub struct OurClosestSettlementGoal {
    best_value: Option<Fixed>,
    best: Option<PathNode>,
}

impl OurClosestSettlementGoal {
    /// Create the goal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            best_value: None,
            best: None,
        }
    }
}

impl GoalDecider for OurClosestSettlementGoal {
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool {
        let Some(colony) = world
            .tile(node.tile)
            .and_then(|t| t.settlement)
            .and_then(|id| world.colony(id))
        else {
            return false;
        };
        if colony.owner != unit.owner {
            return false;
        }
        let base = if colony.connected_port {
            Fixed::from_num(2)
        } else {
            Fixed::ONE
        };
        let value = base / Fixed::from_num(node.turns + 1);
        let improves = self.best_value.map_or(true, |known| value > known);
        if improves {
            self.best_value = Some(value);
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Succeeds on any land tile holding a settlement owned by one of the
/// supplied enemy players; first hit wins.
#[derive(Debug, Clone)]
pub struct EnemySettlementGoal {
    enemies: BTreeSet<PlayerId>,
    best: Option<PathNode>,
}

impl EnemySettlementGoal {
    /// Target settlements of the given enemy players.
    #[must_use]
    pub fn new(enemies: BTreeSet<PlayerId>) -> Self {
        Self {
            enemies,
            best: None,
        }
    }
}

impl GoalDecider for EnemySettlementGoal {
    fn check(&mut self, _unit: &Unit, world: &World, node: &PathNode) -> bool {
        if !world.is_land(node.tile) {
            return false;
        }
        let owned_by_enemy = world
            .tile(node.tile)
            .and_then(|t| t.settlement)
            .and_then(|id| world.colony(id))
            .is_some_and(|c| self.enemies.contains(&c.owner));
        if !owned_by_enemy {
            return false;
        }
        if self.best.is_none() {
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        false
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Flat score bonus for a landing site with no hostile bombarding
/// settlement in range.
const SAFE_LANDING_BONUS: i32 = 1000;

/// Scores sea tiles as disembark sites for an assault on a target.
///
/// A candidate sea tile must have at least one unoccupied,
/// settlement-free land neighbor. Each such neighbor scores
/// `defence / (1 + distance to the target)`, plus the safe-landing
/// bonus when no tile within radius 1 of the landing holds a hostile
/// bombard-capable settlement. The path with the strictly highest
/// score wins.
#[derive(Debug, Clone)]
pub struct DisembarkSiteGoal {
    target: TileId,
    best_score: Option<Fixed>,
    best: Option<PathNode>,
}

impl DisembarkSiteGoal {
    /// Target a tile the disembarked force should reach.
    #[must_use]
    pub const fn new(target: TileId) -> Self {
        Self {
            target,
            best_score: None,
            best: None,
        }
    }

    fn landing_score(&self, unit: &Unit, world: &World, landing: TileId) -> Fixed {
        let defence = world
            .tile(landing)
            .and_then(|t| world.catalog.tile_type(t.tile_type))
            .map_or(0, |tt| tt.defence);
        let distance = world.map.distance(landing, self.target);
        let mut score = Fixed::from_num(defence) / Fixed::from_num(1 + distance);

        let bombarded = world.map.tiles_within(landing, 1).any(|near| {
            world
                .tile(near)
                .and_then(|t| t.settlement)
                .and_then(|id| world.colony(id))
                .is_some_and(|colony| {
                    colony.defence > 0
                        && world
                            .player(unit.owner)
                            .is_some_and(|p| p.at_war_with(colony.owner))
                })
        });
        if !bombarded {
            score += Fixed::from_num(SAFE_LANDING_BONUS);
        }
        score
    }
}

impl GoalDecider for DisembarkSiteGoal {
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool {
        if world.is_land(node.tile) {
            return false;
        }
        let mut best_landing: Option<Fixed> = None;
        for neighbor in world.map.neighbors(node.tile) {
            let landable = world.is_land(neighbor)
                && world
                    .tile(neighbor)
                    .is_some_and(|t| t.settlement.is_none() && !t.is_occupied());
            if !landable {
                continue;
            }
            let score = self.landing_score(unit, world, neighbor);
            if best_landing.map_or(true, |known| score > known) {
                best_landing = Some(score);
            }
        }
        let Some(score) = best_landing else {
            return false;
        };
        let improves = self.best_score.map_or(true, |known| score > known);
        if improves {
            self.best_score = Some(score);
            self.best = Some(node.clone());
        }
        true
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn goal(&self) -> Option<&PathNode> {
        self.best.as_ref()
    }
}

/// Succeeds on every tile not visible to a given enemy player, always
/// keeping the latest success (last-checked-wins, not best-scored).
#[derive(Debug, Clone)]
pub struct StealthyGoal {
    enemy: PlayerId,
    latest: Option<PathNode>,
}

impl StealthyGoal {
    /// Hide from the given enemy player.
    #[must_use]
    pub const fn new(enemy: PlayerId) -> Self {
        Self {
            enemy,
            latest: None,
        }
    }
}

impl GoalDecider for StealthyGoal {
    fn check(&mut self, _unit: &Unit, world: &World, node: &PathNode) -> bool {
        let visible = world
            .player(self.enemy)
            .is_some_and(|p| p.can_see(node.tile));
        if visible {
            return false;
        }
        self.latest = Some(node.clone());
        true
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn goal(&self) -> Option<&PathNode> {
        self.latest.as_ref()
    }
}

/// How a composed decider combines its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeMode {
    /// Every component must accept the same path.
    All,
    /// The first accepting component wins, by declaration order.
    Any,
}

/// Combines two or more goal deciders.
///
/// AND-mode requires every component to accept a path and yields that
/// path as its own goal. OR-mode accepts on the first accepting
/// component and remembers which one won: once a higher-priority
/// component has accepted, lower-priority ones are no longer consulted.
pub struct ComposedGoal {
    mode: ComposeMode,
    components: Vec<Box<dyn GoalDecider>>,
    winner: Option<usize>,
    own: Option<PathNode>,
}

impl ComposedGoal {
    /// Compose with AND semantics.
    #[must_use]
    pub fn all(components: Vec<Box<dyn GoalDecider>>) -> Self {
        Self {
            mode: ComposeMode::All,
            components,
            winner: None,
            own: None,
        }
    }

    /// Compose with OR semantics, priority by declaration order.
    #[must_use]
    pub fn any(components: Vec<Box<dyn GoalDecider>>) -> Self {
        Self {
            mode: ComposeMode::Any,
            components,
            winner: None,
            own: None,
        }
    }
}

impl GoalDecider for ComposedGoal {
    fn check(&mut self, unit: &Unit, world: &World, node: &PathNode) -> bool {
        match self.mode {
            ComposeMode::All => {
                let mut accepted = true;
                for component in &mut self.components {
                    if !component.check(unit, world, node) {
                        accepted = false;
                    }
                }
                if accepted {
                    self.own = Some(node.clone());
                }
                accepted
            }
            ComposeMode::Any => {
                // Once a component has won, lower-priority ones are out.
                let limit = self.winner.unwrap_or(self.components.len());
                for (index, component) in self.components.iter_mut().enumerate() {
                    if index > limit {
                        break;
                    }
                    if component.check(unit, world, node) {
                        self.winner = Some(index);
                        return true;
                    }
                }
                false
            }
        }
    }

    fn has_sub_goals(&self) -> bool {
        match self.mode {
            ComposeMode::All => self.components.iter().all(|c| c.has_sub_goals()),
            ComposeMode::Any => self.components.iter().any(|c| c.has_sub_goals()),
        }
    }

    fn goal(&self) -> Option<&PathNode> {
        match self.mode {
            ComposeMode::All => self.own.as_ref(),
            ComposeMode::Any => self
                .winner
                .and_then(|index| self.components.get(index))
                .and_then(|c| c.goal()),
        }
    }
}

/// Tracks, for a list of target tiles, the lowest-cost path adjacent to
/// each. Never terminates the search itself; results are read per
/// target after the search drains.
#[derive(Debug, Clone)]
pub struct MultipleAdjacentGoal {
    targets: Vec<TileId>,
    best: BTreeMap<TileId, PathNode>,
}

impl MultipleAdjacentGoal {
    /// Track adjacency to the given targets.
    #[must_use]
    pub fn new(targets: Vec<TileId>) -> Self {
        Self {
            targets,
            best: BTreeMap::new(),
        }
    }

    /// The best path found adjacent to a specific target.
    #[must_use]
    pub fn best_for(&self, target: TileId) -> Option<&PathNode> {
        self.best.get(&target)
    }
}

impl GoalDecider for MultipleAdjacentGoal {
    fn check(&mut self, _unit: &Unit, world: &World, node: &PathNode) -> bool {
        for &target in &self.targets {
            if !world.map.is_adjacent(node.tile, target) {
                continue;
            }
            let improves = self
                .best
                .get(&target)
                .map_or(true, |known| node.cost < known.cost);
            if improves {
                self.best.insert(target, node.clone());
            }
        }
        // Never reports success to the engine; callers harvest results
        // per target once the search has drained.
        false
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn goal(&self) -> Option<&PathNode> {
        None
    }
}
