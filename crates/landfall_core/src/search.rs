//! Best-first search over the tile graph.
//!
//! The engine is generic over a [`CostDecider`] (edge weights) and a
//! [`GoalDecider`] (termination/ranking). It expands nodes in
//! non-decreasing accumulated cost with a deterministic tile-id
//! tie-breaker, so repeated searches over identical state produce
//! identical paths.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::cost::CostDecider;
use crate::goal::{GoalDecider, LocationGoal};
use crate::map::TileId;
use crate::unit::{Unit, UnitLocation};
use crate::world::World;

/// One explored path: the route taken and its accumulated price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    /// The tile this path ends on.
    pub tile: TileId,
    /// Accumulated cost in move units (plus decider penalties).
    pub cost: i32,
    /// Whole turns consumed along the path.
    pub turns: i32,
    /// Movement allowance remaining on arrival.
    pub moves_left: i32,
    /// The full route, start tile first.
    pub route: Vec<TileId>,
}

impl PathNode {
    /// A zero-cost path standing at a start tile.
    #[must_use]
    pub fn start(tile: TileId, moves_left: i32) -> Self {
        Self {
            tile,
            cost: 0,
            turns: 0,
            moves_left,
            route: vec![tile],
        }
    }

    /// Number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Whether the path has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A frontier entry in the open-set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Frontier {
    /// Accumulated cost (negated ordering for min-heap behavior).
    cost: i32,
    /// Tie-breaker for determinism: lower tile id first.
    tile: TileId,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse for min-heap behavior.
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.tile.cmp(&self.tile),
            ord => ord,
        }
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl World {
    /// Run a best-first search from one or more start tiles.
    ///
    /// The goal decider is consulted on every dequeued path in
    /// non-decreasing cost order. Without sub-goals the search stops at
    /// the first acceptance; with sub-goals it drains and returns
    /// whatever goal the decider retained. `turn_bound` discards paths
    /// that would exceed the given number of turns.
    ///
    /// An unreachable goal is not an error: the result is simply `None`.
    pub fn search(
        &self,
        unit: &Unit,
        starts: &[TileId],
        goal: &mut dyn GoalDecider,
        decider: &dyn CostDecider,
        turn_bound: Option<i32>,
    ) -> Option<PathNode> {
        let mut open: BinaryHeap<Frontier> = BinaryHeap::new();
        let mut best: HashMap<TileId, PathNode> = HashMap::new();

        for &start in starts {
            let node = PathNode::start(start, unit.moves_left);
            open.push(Frontier {
                cost: 0,
                tile: start,
            });
            best.insert(start, node);
        }

        while let Some(frontier) = open.pop() {
            let Some(node) = best.get(&frontier.tile).cloned() else {
                continue;
            };
            if node.cost < frontier.cost {
                continue; // Stale entry superseded by a cheaper path.
            }

            if goal.check(unit, self, &node) && !goal.has_sub_goals() {
                return goal.goal().cloned();
            }

            for next in self.map.neighbors(node.tile) {
                let Some(step) = decider.step(
                    self,
                    unit,
                    &UnitLocation::Tile(node.tile),
                    &UnitLocation::Tile(next),
                    node.moves_left,
                ) else {
                    continue;
                };
                let cost = node.cost + step.cost;
                let turns = node.turns + step.new_turns;
                if turn_bound.is_some_and(|bound| turns > bound) {
                    continue;
                }
                let better = best.get(&next).map_or(true, |known| cost < known.cost);
                if better {
                    let mut route = node.route.clone();
                    route.push(next);
                    best.insert(
                        next,
                        PathNode {
                            tile: next,
                            cost,
                            turns,
                            moves_left: step.moves_left,
                            route,
                        },
                    );
                    open.push(Frontier { cost, tile: next });
                }
            }
        }

        goal.goal().cloned()
    }

    /// Find the cheapest path between two tiles, if one exists.
    pub fn find_path(
        &self,
        unit: &Unit,
        start: TileId,
        end: TileId,
        decider: &dyn CostDecider,
    ) -> Option<PathNode> {
        if start == end {
            return Some(PathNode::start(start, unit.moves_left));
        }
        let mut goal = LocationGoal::new(end);
        self.search(unit, &[start], &mut goal, decider, None)
    }
}
