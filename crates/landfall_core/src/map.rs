//! The tile graph: a rectangular grid with 8-direction adjacency.
//!
//! Tiles are created once at map generation and mutated in place by
//! improvements and settlement placement; they are never destroyed
//! during a game. Each tile carries a contiguity id identifying its
//! connected land or water region, used to cheaply reject cross-region
//! movement before any search runs.

use serde::{Deserialize, Serialize};

use crate::catalog::{ImprovementTypeId, TileTypeId};
use crate::player::ColonyId;
use crate::unit::UnitId;

/// Unique identifier for tiles (index into the map grid).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TileId(pub u32);

/// Direction offsets for 8-directional adjacency.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),   // East
    (1, 1),   // Southeast
    (0, 1),   // South
    (-1, 1),  // Southwest
    (-1, 0),  // West
    (-1, -1), // Northwest
    (0, -1),  // North
    (1, -1),  // Northeast
];

/// One node in the map graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain type.
    pub tile_type: TileTypeId,
    /// Improvements built on this tile, in build order.
    pub improvements: Vec<ImprovementTypeId>,
    /// Settlement occupying this tile, if any.
    pub settlement: Option<ColonyId>,
    /// Units standing on this tile, in arrival order.
    pub units: Vec<UnitId>,
    /// Whether this tile connects to the high seas.
    pub high_seas: bool,
    /// Whether a river touches this tile's corner.
    pub river: bool,
    /// Whether this tile hides an unexplored rumour site.
    pub rumour: bool,
    /// Connected-region id (landmass or sea).
    pub contiguity: i32,
}

impl Tile {
    /// Create a new tile of the given terrain.
    #[must_use]
    pub fn new(tile_type: TileTypeId) -> Self {
        Self {
            tile_type,
            improvements: Vec::new(),
            settlement: None,
            units: Vec::new(),
            high_seas: false,
            river: false,
            rumour: false,
            contiguity: 0,
        }
    }

    /// Whether any unit stands on this tile.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.units.is_empty()
    }
}

/// The map: a width x height grid of tiles in row-major order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    /// Grid width in tiles.
    width: u32,
    /// Grid height in tiles.
    height: u32,
    /// Tile data stored in row-major order.
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a new map with every tile of the given terrain.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: u32, height: u32, tile_type: TileTypeId) -> Self {
        assert!(width > 0, "Map width must be positive");
        assert!(height > 0, "Map height must be positive");
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![Tile::new(tile_type); count],
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within map bounds.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Convert (x, y) coordinates to a tile id.
    ///
    /// Returns `None` if out of bounds.
    #[must_use]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        if self.in_bounds(x, y) {
            Some(TileId((y as u32) * self.width + (x as u32)))
        } else {
            None
        }
    }

    /// Convert a tile id back to (x, y) coordinates.
    #[must_use]
    pub const fn coords(&self, tile: TileId) -> (i32, i32) {
        ((tile.0 % self.width) as i32, (tile.0 / self.width) as i32)
    }

    /// Get a tile by id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    /// Get a tile by id, mutably.
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0 as usize)
    }

    /// Iterate the ids of a tile's 8-neighborhood, in direction order.
    pub fn neighbors(&self, tile: TileId) -> impl Iterator<Item = TileId> + '_ {
        let (x, y) = self.coords(tile);
        DIRECTIONS
            .iter()
            .filter_map(move |&(dx, dy)| self.tile_at(x + dx, y + dy))
    }

    /// Whether two tiles are adjacent in the 8-neighborhood.
    #[must_use]
    pub fn is_adjacent(&self, a: TileId, b: TileId) -> bool {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        let dx = (ax - bx).abs();
        let dy = (ay - by).abs();
        dx <= 1 && dy <= 1 && (dx != 0 || dy != 0)
    }

    /// Chebyshev distance between two tiles (steps in 8-direction moves).
    #[must_use]
    pub fn distance(&self, a: TileId, b: TileId) -> i32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        (ax - bx).abs().max((ay - by).abs())
    }

    /// Iterate tile ids within a Chebyshev radius of a center tile,
    /// excluding the center itself.
    pub fn tiles_within(&self, center: TileId, radius: i32) -> impl Iterator<Item = TileId> + '_ {
        let (cx, cy) = self.coords(center);
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| self.tile_at(cx + dx, cy + dy))
    }

    /// Iterate all tile ids in row-major order.
    pub fn all_tiles(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len() as u32).map(TileId)
    }
}
