use std::fmt;
use std::slice;

use crate::cells::{ALL_DIRECTIONS, Cell, CompassPrimary, CoordinateSmallVec, GridCoordinate,
                   Marker};
use crate::units::{Height, Width};


/// A rectangular maze: rows of cells stored in row major order.
///
/// Only the maze assembler and the carving strategies mutate a grid. Everything a collaborator
/// gets back is read-only, they get a grid from `maze::build_maze` or `Grid::parse`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<Cell>,
    start: Option<GridCoordinate>,
    goal: Option<GridCoordinate>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridParseError {
    Empty,
    RaggedRows,
    UnknownGlyph(char),
    MissingGoal,
    DuplicateMarker,
}

impl fmt::Display for GridParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridParseError::Empty => write!(f, "grid text has no rows"),
            GridParseError::RaggedRows => write!(f, "grid rows differ in length"),
            GridParseError::UnknownGlyph(c) => write!(f, "unknown grid glyph {:?}", c),
            GridParseError::MissingGoal => write!(f, "grid has no goal cell"),
            GridParseError::DuplicateMarker => write!(f, "grid has more than one start or goal"),
        }
    }
}

impl std::error::Error for GridParseError {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, start: {:?}, goal: {:?}, paths: {:?}",
               self.width, self.height, self.start, self.goal, self.path_count())
    }
}

impl Grid {
    /// A grid where every cell is a wall.
    pub fn new(width: Width, height: Height) -> Grid {
        let (Width(w), Height(h)) = (width, height);
        let cells = (0..h)
            .flat_map(|y| (0..w).map(move |x| Cell::wall(GridCoordinate::new(x as i32, y as i32))))
            .collect();

        Grid {
            width,
            height,
            cells,
            start: None,
            goal: None,
        }
    }

    /// Build a grid from text rows: `#` wall, `.` path, `S` start, `G` goal.
    ///
    /// Blank lines and surrounding whitespace are ignored. A grid needs exactly one goal and at most
    /// one start.
    pub fn parse(text: &str) -> Result<Grid, GridParseError> {
        let rows: Vec<&str> = text.lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        let width = rows.first().map(|row| row.chars().count()).ok_or(GridParseError::Empty)?;
        if rows.iter().any(|row| row.chars().count() != width) {
            return Err(GridParseError::RaggedRows);
        }

        let mut grid = Grid::new(Width(width), Height(rows.len()));
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let coord = GridCoordinate::new(x as i32, y as i32);
                match glyph {
                    '#' => {}
                    '.' => {
                        grid.carve(coord);
                    }
                    'S' => {
                        if grid.start.is_some() {
                            return Err(GridParseError::DuplicateMarker);
                        }
                        grid.mark(coord, Marker::Start);
                    }
                    'G' => {
                        if grid.goal.is_some() {
                            return Err(GridParseError::DuplicateMarker);
                        }
                        grid.mark(coord, Marker::Goal);
                    }
                    other => return Err(GridParseError::UnknownGlyph(other)),
                }
            }
        }

        if grid.goal.is_none() {
            return Err(GridParseError::MissingGoal);
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn start(&self) -> Option<GridCoordinate> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<GridCoordinate> {
        self.goal
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < self.width.0 &&
        (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn cell(&self, coord: GridCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    /// Out of bounds coordinates are never walkable.
    #[inline]
    pub fn is_walkable(&self, coord: GridCoordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_walkable)
    }

    #[inline]
    pub fn is_wall(&self, coord: GridCoordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_wall)
    }

    /// Cells to the North, South, East or West of a cell that lie on the grid, whatever their
    /// terrain.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        ALL_DIRECTIONS.iter()
            .map(|dir| coord.offset(*dir, 1))
            .filter(|adjacent| self.is_valid_coordinate(*adjacent))
            .collect()
    }

    /// The subset of `neighbours` that a player or a search may step onto.
    pub fn walkable_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|adjacent| self.is_walkable(*adjacent))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary,
                                  steps: i32)
                                  -> Option<GridCoordinate> {
        let neighbour_coord = coord.offset(direction, steps);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    #[inline]
    pub fn iter_row(&self) -> slice::Chunks<'_, Cell> {
        self.cells.chunks(self.width.0.max(1))
    }

    pub fn path_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_path()).count()
    }

    /// Turn a cell into a path. Returns true if a wall was opened.
    pub(crate) fn carve(&mut self, coord: GridCoordinate) -> bool {
        match self.cell_mut(coord) {
            Some(cell) if cell.is_wall() => {
                cell.carve();
                true
            }
            _ => false,
        }
    }

    /// Carve every cell on the straight line between two coordinates that share a row or column.
    pub(crate) fn carve_line(&mut self, from: GridCoordinate, to: GridCoordinate) {
        debug_assert!(from.x == to.x || from.y == to.y);
        let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
        let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.carve(GridCoordinate::new(x, y));
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn block(&mut self, coord: GridCoordinate) {
        if let Some(index) = self.grid_coordinate_to_index(coord) {
            self.cells[index].block();
            if self.start == Some(coord) {
                self.start = None;
            }
            if self.goal == Some(coord) {
                self.goal = None;
            }
        }
    }

    /// Place the start or goal marker, moving it if it was already placed elsewhere.
    pub(crate) fn mark(&mut self, coord: GridCoordinate, marker: Marker) {
        if !self.is_valid_coordinate(coord) {
            return;
        }
        let previous = match marker {
            Marker::Start => self.start.replace(coord),
            Marker::Goal => self.goal.replace(coord),
        };
        if let Some(old) = previous.filter(|old| *old != coord) {
            if let Some(cell) = self.cell_mut(old) {
                cell.clear_marker();
            }
        }
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_marker(marker);
        }
    }

    fn cell_mut(&mut self, coord: GridCoordinate) -> Option<&mut Cell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }
}
