use rand::Rng;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A position on a maze grid.
///
/// Signed so that positions coming from the UI, e.g. one step west of the first column, can be
/// represented and then rejected by the bounds checks instead of wrapping around.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

impl GridCoordinate {
    pub fn new(x: i32, y: i32) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    /// Number of orthogonal steps between two coordinates ignoring walls.
    #[inline]
    pub fn manhattan_distance(&self, other: GridCoordinate) -> u32 {
        let (dx, dy) = self.axis_distances(other);
        (dx + dy).min(u64::from(u32::MAX)) as u32
    }

    /// Largest per-axis distance, i.e. the king-move distance.
    #[inline]
    pub fn chebyshev_distance(&self, other: GridCoordinate) -> u32 {
        let (dx, dy) = self.axis_distances(other);
        dx.max(dy).min(u64::from(u32::MAX)) as u32
    }

    /// Is `other` exactly one orthogonal step away?
    #[inline]
    pub fn is_orthogonally_adjacent(&self, other: GridCoordinate) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// The coordinate `steps` cells away in the given direction. May be off the grid.
    #[inline]
    pub fn offset(&self, direction: CompassPrimary, steps: i32) -> GridCoordinate {
        let (dx, dy) = direction.delta();
        GridCoordinate::new(self.x.saturating_add(dx.saturating_mul(steps)),
                            self.y.saturating_add(dy.saturating_mul(steps)))
    }

    /// Widened so that coordinates at the ends of the i32 range cannot overflow.
    #[inline]
    fn axis_distances(&self, other: GridCoordinate) -> (u64, u64) {
        ((i64::from(self.x) - i64::from(other.x)).unsigned_abs(),
         (i64::from(self.y) - i64::from(other.y)).unsigned_abs())
    }

    /// The `"x,y"` key used when an explored set is handed to or received from a collaborator.
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from(x_y_pair: (i32, i32)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CoordinateKeyError {
    MissingSeparator,
    InvalidNumber,
}

impl fmt::Display for CoordinateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CoordinateKeyError::MissingSeparator => write!(f, "coordinate key is not of the form x,y"),
            CoordinateKeyError::InvalidNumber => write!(f, "coordinate key holds a non integer value"),
        }
    }
}

impl std::error::Error for CoordinateKeyError {}

impl FromStr for GridCoordinate {
    type Err = CoordinateKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let mut parts = key.splitn(2, ',');
        let x_part = parts.next().ok_or(CoordinateKeyError::MissingSeparator)?;
        let y_part = parts.next().ok_or(CoordinateKeyError::MissingSeparator)?;
        let x = x_part.trim().parse::<i32>().map_err(|_| CoordinateKeyError::InvalidNumber)?;
        let y = y_part.trim().parse::<i32>().map_err(|_| CoordinateKeyError::InvalidNumber)?;
        Ok(GridCoordinate::new(x, y))
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub const ALL_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                 CompassPrimary::East,
                                                 CompassPrimary::South,
                                                 CompassPrimary::West];

impl CompassPrimary {
    /// (dx, dy) with y growing southwards.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    pub fn rand_direction<R: Rng>(rng: &mut R) -> CompassPrimary {
        ALL_DIRECTIONS[rng.gen_range(0..ALL_DIRECTIONS.len())]
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Terrain {
    Wall,
    Path,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Marker {
    Start,
    Goal,
}

/// One grid unit. A cell is either a wall or a path, never both, and a start or goal marker can
/// only sit on a path.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Cell {
    pub coord: GridCoordinate,
    terrain: Terrain,
    marker: Option<Marker>,
}

impl Cell {
    pub fn wall(coord: GridCoordinate) -> Cell {
        Cell {
            coord,
            terrain: Terrain::Wall,
            marker: None,
        }
    }

    #[inline]
    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    #[inline]
    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.terrain == Terrain::Wall
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.terrain == Terrain::Path
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.marker == Some(Marker::Start)
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.marker == Some(Marker::Goal)
    }

    /// Can the BFS connectivity check pass through this cell?
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.is_path() || self.is_goal() || self.is_start()
    }

    pub(crate) fn carve(&mut self) {
        self.terrain = Terrain::Path;
    }

    /// Turn the cell back into a wall, dropping any marker.
    #[cfg(test)]
    pub(crate) fn block(&mut self) {
        self.terrain = Terrain::Wall;
        self.marker = None;
    }

    pub(crate) fn set_marker(&mut self, marker: Marker) {
        self.terrain = Terrain::Path;
        self.marker = Some(marker);
    }

    pub(crate) fn clear_marker(&mut self) {
        self.marker = None;
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn distances() {
        let a = GridCoordinate::new(2, 2);
        assert_eq!(a.manhattan_distance(GridCoordinate::new(5, 5)), 6);
        assert_eq!(a.chebyshev_distance(GridCoordinate::new(5, 5)), 3);
        assert_eq!(a.manhattan_distance(GridCoordinate::new(-1, 2)), 3);
        assert_eq!(a.manhattan_distance(a), 0);
        let far = GridCoordinate::new(i32::MIN, i32::MAX);
        assert_eq!(a.chebyshev_distance(far), i32::MAX as u32 + 3);
        assert_eq!(far.manhattan_distance(GridCoordinate::new(i32::MAX, i32::MIN)), u32::MAX);
    }

    #[test]
    fn adjacency_is_orthogonal_only() {
        let a = GridCoordinate::new(1, 1);
        assert!(a.is_orthogonally_adjacent(GridCoordinate::new(1, 0)));
        assert!(a.is_orthogonally_adjacent(GridCoordinate::new(0, 1)));
        assert!(!a.is_orthogonally_adjacent(GridCoordinate::new(2, 2)));
        assert!(!a.is_orthogonally_adjacent(GridCoordinate::new(1, 3)));
        assert!(!a.is_orthogonally_adjacent(a));
    }

    #[test]
    fn offsets() {
        let a = GridCoordinate::new(3, 3);
        assert_eq!(a.offset(CompassPrimary::North, 1), GridCoordinate::new(3, 2));
        assert_eq!(a.offset(CompassPrimary::South, 2), GridCoordinate::new(3, 5));
        assert_eq!(a.offset(CompassPrimary::East, 1), GridCoordinate::new(4, 3));
        assert_eq!(a.offset(CompassPrimary::West, 4), GridCoordinate::new(-1, 3));
    }

    #[test]
    fn coordinate_keys() {
        let a = GridCoordinate::new(4, 7);
        assert_eq!(a.to_key(), "4,7");
        assert_eq!("4,7".parse::<GridCoordinate>(), Ok(a));
        assert_eq!(" 4, 7".parse::<GridCoordinate>(), Ok(a));
        assert_eq!("-1,0".parse::<GridCoordinate>(), Ok(GridCoordinate::new(-1, 0)));
        assert_eq!("47".parse::<GridCoordinate>(), Err(CoordinateKeyError::MissingSeparator));
        assert_eq!("a,7".parse::<GridCoordinate>(), Err(CoordinateKeyError::InvalidNumber));
        assert_eq!("4,7,1".parse::<GridCoordinate>(), Err(CoordinateKeyError::InvalidNumber));
    }

    #[test]
    fn cell_flags_are_exclusive() {
        let mut cell = Cell::wall(GridCoordinate::new(0, 0));
        assert!(cell.is_wall() && !cell.is_path());
        assert!(!cell.is_walkable());

        cell.carve();
        assert!(cell.is_path() && !cell.is_wall());

        cell.set_marker(Marker::Goal);
        assert!(cell.is_goal() && !cell.is_start() && cell.is_path());

        cell.block();
        assert!(cell.is_wall() && !cell.is_path());
        assert_eq!(cell.marker(), None);
    }
}
