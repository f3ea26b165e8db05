//! Fog of war: which cells a player can currently see and which they have already explored.
//!
//! With the fog enabled a cell is visible when it is next to the player, close to the goal, or
//! was explored earlier in the level. The explored set only ever grows until the level changes.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::cells::{CoordinateKeyError, GridCoordinate};
use crate::grid::Grid;
use crate::units::Radius;
use crate::utils::{fnv_hashset, FnvHashSet};

/// Fog of war settings for one level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FogOfWar {
    pub enabled: bool,
    /// Square neighbourhood added to the explored set around each new position.
    pub reveal_radius: Radius,
    /// Manhattan distance around the goal that is always visible.
    pub goal_radius: Radius,
}

impl FogOfWar {
    pub fn disabled() -> FogOfWar {
        FogOfWar {
            enabled: false,
            reveal_radius: Radius(1),
            goal_radius: Radius(2),
        }
    }
}

impl Default for FogOfWar {
    fn default() -> FogOfWar {
        FogOfWar::disabled()
    }
}

/// Cells the player has seen during the current level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExploredSet {
    cells: FnvHashSet<GridCoordinate>,
}

impl ExploredSet {
    pub fn new() -> ExploredSet {
        ExploredSet { cells: fnv_hashset(16) }
    }

    /// The explored set at the start of a level: only the start cell.
    pub fn starting_at(start: GridCoordinate) -> ExploredSet {
        let mut explored = ExploredSet::new();
        explored.insert(start);
        explored
    }

    /// Rebuild a set from `"x,y"` keys, e.g. ones persisted by a collaborator.
    pub fn from_keys<I, S>(keys: I) -> Result<ExploredSet, CoordinateKeyError>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let cells = keys.into_iter()
            .map(|key| key.as_ref().parse::<GridCoordinate>())
            .collect::<Result<FnvHashSet<_>, _>>()?;
        Ok(ExploredSet { cells })
    }

    /// `"x,y"` keys in row major order.
    pub fn to_keys(&self) -> Vec<String> {
        self.sorted().iter().map(GridCoordinate::to_key).collect()
    }

    #[inline]
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        self.cells.contains(&coord)
    }

    /// Returns true if the cell was not explored before.
    #[inline]
    pub fn insert(&mut self, coord: GridCoordinate) -> bool {
        self.cells.insert(coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_superset(&self, other: &ExploredSet) -> bool {
        self.cells.is_superset(&other.cells)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCoordinate> {
        self.cells.iter()
    }

    /// Mark `center` and every grid cell within `radius` king moves of it as explored.
    pub fn reveal_around(&mut self, center: GridCoordinate, radius: Radius, grid: &Grid) {
        self.cells.extend(grid.iter()
            .map(|cell| cell.coord)
            .filter(|coord| coord.chebyshev_distance(center) <= radius.0));
    }

    fn sorted(&self) -> Vec<GridCoordinate> {
        let mut coords: Vec<GridCoordinate> = self.cells.iter().cloned().collect();
        coords.sort_by_key(|coord| (coord.y, coord.x));
        coords
    }
}

impl Serialize for ExploredSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let coords = self.sorted();
        let mut seq = serializer.serialize_seq(Some(coords.len()))?;
        for coord in &coords {
            seq.serialize_element(&coord.to_key())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ExploredSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<ExploredSet, D::Error> {
        let keys = Vec::<String>::deserialize(deserializer)?;
        ExploredSet::from_keys(&keys).map_err(de::Error::custom)
    }
}

/// Can the player see `coord` right now?
///
/// Coordinates off the grid are never visible. With the fog disabled every grid cell is visible.
pub fn is_visible(grid: &Grid,
                  coord: GridCoordinate,
                  player: GridCoordinate,
                  explored: &ExploredSet,
                  fog: &FogOfWar)
                  -> bool {
    if !grid.is_valid_coordinate(coord) {
        return false;
    }
    if !fog.enabled {
        return true;
    }

    let near_player = coord.manhattan_distance(player) <= 1;
    let near_goal = grid.goal().map_or(false, |goal| coord.manhattan_distance(goal) <= fog.goal_radius.0);

    near_player || near_goal || explored.contains(coord)
}

/// Has the player explored `coord`? Only the explored set counts, not the live reveal around the
/// player or goal.
pub fn is_explored(grid: &Grid, coord: GridCoordinate, explored: &ExploredSet, fog: &FogOfWar) -> bool {
    if !grid.is_valid_coordinate(coord) {
        return false;
    }
    !fog.enabled || explored.contains(coord)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellVisibility {
    pub visible: bool,
    pub explored: bool,
}

/// Per cell visibility for rendering one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMap {
    width: usize,
    flags: Vec<CellVisibility>,
}

impl VisibilityMap {
    pub fn get(&self, coord: GridCoordinate) -> Option<CellVisibility> {
        if coord.x < 0 || coord.y < 0 || coord.x as usize >= self.width {
            return None;
        }
        self.flags.get(coord.y as usize * self.width + coord.x as usize).cloned()
    }

    pub fn iter_row(&self) -> std::slice::Chunks<'_, CellVisibility> {
        self.flags.chunks(self.width.max(1))
    }

    pub fn visible_count(&self) -> usize {
        self.flags.iter().filter(|flags| flags.visible).count()
    }
}

pub fn visibility_of(grid: &Grid,
                     player: GridCoordinate,
                     explored: &ExploredSet,
                     fog: &FogOfWar)
                     -> VisibilityMap {
    let flags = grid.iter()
        .map(|cell| {
            CellVisibility {
                visible: is_visible(grid, cell.coord, player, explored, fog),
                explored: is_explored(grid, cell.coord, explored, fog),
            }
        })
        .collect();

    VisibilityMap {
        width: grid.width().0,
        flags,
    }
}
