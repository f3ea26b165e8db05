//! Path carving strategies.
//!
//! A strategy paints walkable cells onto an all wall grid. Start is the north west corner and the
//! goal the south east corner; the strategies aim to join the two but do not have to, the maze
//! assembler validates the result and repairs it if needed.

use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::cells::{ALL_DIRECTIONS, CompassPrimary, GridCoordinate};
use crate::grid::Grid;


/// The closed set of carving strategies, in increasing order of difficulty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    /// One corridor along the top row then down the last column.
    Straight,
    /// A single route with one bend, orientation picked at random.
    OneTurn,
    /// S shaped route through the middle of the grid.
    TwoTurn,
    /// Alternating east and south steps.
    Staircase,
    /// Two disjoint routes around the edge joined by a middle crossing.
    Choice,
    /// Every other row and column open.
    CorridorGrid,
    /// Small rooms joined by short crossings.
    Rooms,
    /// A sparse corridor lattice with dead end stubs.
    DeadEnds,
    /// Recursive backtracker maze. `complexity` in [0, 1] scales the extra dead ends, loops and
    /// openings added on top of the perfect maze.
    Backtracker { complexity: f64 },
}

impl Strategy {
    pub fn carve<R: Rng>(&self, grid: &mut Grid, rng: &mut R) {
        match *self {
            Strategy::Straight => straight(grid),
            Strategy::OneTurn => one_turn(grid, rng),
            Strategy::TwoTurn => two_turn(grid),
            Strategy::Staircase => staircase(grid),
            Strategy::Choice => choice(grid),
            Strategy::CorridorGrid => corridor_grid(grid),
            Strategy::Rooms => rooms(grid),
            Strategy::DeadEnds => dead_ends(grid, rng),
            Strategy::Backtracker { complexity } => backtracker(grid, rng, complexity),
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Strategy::Straight => "straight",
            Strategy::OneTurn => "one-turn",
            Strategy::TwoTurn => "two-turn",
            Strategy::Staircase => "staircase",
            Strategy::Choice => "choice",
            Strategy::CorridorGrid => "corridor-grid",
            Strategy::Rooms => "rooms",
            Strategy::DeadEnds => "dead-ends",
            Strategy::Backtracker { .. } => "backtracker",
        }
    }
}

#[inline]
fn extent(grid: &Grid) -> (i32, i32) {
    (grid.width().0 as i32, grid.height().0 as i32)
}

#[inline]
fn gc(x: i32, y: i32) -> GridCoordinate {
    GridCoordinate::new(x, y)
}

/// Level 1 route. Tiny square grids get a short staircase so that even the first maze has a turn
/// to make, anything larger is right along the top and then straight down.
pub fn straight(grid: &mut Grid) {
    let (w, h) = extent(grid);
    if w == h && w == 3 {
        for coord in &[gc(0, 0), gc(0, 1), gc(1, 1), gc(1, 2), gc(2, 2)] {
            grid.carve(*coord);
        }
    } else {
        grid.carve_line(gc(0, 0), gc(w - 1, 0));
        grid.carve_line(gc(w - 1, 0), gc(w - 1, h - 1));
    }
}

pub fn one_turn<R: Rng>(grid: &mut Grid, rng: &mut R) {
    let (w, h) = extent(grid);
    if rng.gen() {
        // east first, bend down at 70% of the width, finish along the bottom row
        let turn_x = (w as f64 * 0.7) as i32;
        let turn_x = turn_x.min(w - 1);
        grid.carve_line(gc(0, 0), gc(turn_x, 0));
        grid.carve_line(gc(turn_x, 0), gc(turn_x, h - 1));
        grid.carve_line(gc(turn_x, h - 1), gc(w - 1, h - 1));
    } else {
        let turn_y = (h as f64 * 0.7) as i32;
        let turn_y = turn_y.min(h - 1);
        grid.carve_line(gc(0, 0), gc(0, turn_y));
        grid.carve_line(gc(0, turn_y), gc(w - 1, turn_y));
        grid.carve_line(gc(w - 1, turn_y), gc(w - 1, h - 1));
    }
}

pub fn two_turn(grid: &mut Grid) {
    let (w, h) = extent(grid);
    let (mid_x, mid_y) = (w / 2, h / 2);
    grid.carve_line(gc(0, 0), gc(mid_x, 0));
    grid.carve_line(gc(mid_x, 0), gc(mid_x, mid_y));
    grid.carve_line(gc(mid_x, mid_y), gc(w - 1, mid_y));
    grid.carve_line(gc(w - 1, mid_y), gc(w - 1, h - 1));
}

/// Zigzag down to the goal. Steps are two cells long on grids big enough for that to read as a
/// staircase rather than a diagonal smear.
pub fn staircase(grid: &mut Grid) {
    let (w, h) = extent(grid);
    let stride = if w >= 6 && h >= 6 { 2 } else { 1 };
    let goal = gc(w - 1, h - 1);
    let mut current = gc(0, 0);
    let mut east = true;
    grid.carve(current);

    while current != goal {
        let next = if (east && current.x < goal.x) || current.y == goal.y {
            gc((current.x + stride).min(goal.x), current.y)
        } else {
            gc(current.x, (current.y + stride).min(goal.y))
        };
        grid.carve_line(current, next);
        current = next;
        east = !east;
    }
}

pub fn choice(grid: &mut Grid) {
    let (w, h) = extent(grid);
    // top then right hand side
    grid.carve_line(gc(0, 0), gc(w - 1, 0));
    grid.carve_line(gc(w - 1, 0), gc(w - 1, h - 1));
    // left hand side then bottom
    grid.carve_line(gc(0, 0), gc(0, h - 1));
    grid.carve_line(gc(0, h - 1), gc(w - 1, h - 1));
    // crossing
    grid.carve_line(gc(0, h / 2), gc(w - 1, h / 2));
}

pub fn corridor_grid(grid: &mut Grid) {
    carve_lattice(grid, 2);
    tie_in(grid, goal_corner(grid));
}

/// 2x2 rooms on a 3 cell lattice. Each room opens east and south through a one cell crossing.
pub fn rooms(grid: &mut Grid) {
    let (w, h) = extent(grid);
    for room_y in (0..h).step_by(3) {
        for room_x in (0..w).step_by(3) {
            for y in room_y..(room_y + 2) {
                for x in room_x..(room_x + 2) {
                    grid.carve(gc(x, y));
                }
            }
            if room_x + 3 < w {
                grid.carve(gc(room_x + 2, room_y));
            }
            if room_y + 3 < h {
                grid.carve(gc((room_x + 1).min(w - 1), room_y + 2));
            }
        }
    }
    tie_in(grid, goal_corner(grid));
}

pub fn dead_ends<R: Rng>(grid: &mut Grid, rng: &mut R) {
    carve_lattice(grid, 4);
    tie_in(grid, goal_corner(grid));
    let stubs = 1 + grid.size() / 12;
    inject_dead_ends(grid, rng, stubs);
}

pub fn backtracker<R: Rng>(grid: &mut Grid, rng: &mut R, complexity: f64) {
    let complexity = complexity.max(0.0).min(1.0);
    recursive_backtracker(grid, rng);
    tie_in(grid, goal_corner(grid));

    let cells = grid.size() as f64;
    inject_dead_ends(grid, rng, 1 + (complexity * cells / 10.0) as usize);
    inject_extra_paths(grid, rng, (complexity * 3.0).ceil() as usize);
    open_random_walls(grid, rng, complexity);
}

/// The classic recursive backtracker, iterative with an explicit stack.
///
/// Cells at even coordinates are the maze "rooms", the odd cells between them are the walls that
/// get knocked out. The result is a spanning tree over the even sublattice: exactly one route
/// between any two of its cells.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid, rng: &mut R) {
    let start = gc(0, 0);
    if !grid.is_valid_coordinate(start) {
        return;
    }
    grid.carve(start);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        // an even cell that is still a wall has not been visited
        let unvisited: SmallVec<[CompassPrimary; 4]> = ALL_DIRECTIONS.iter()
            .cloned()
            .filter(|dir| grid.is_wall(current.offset(*dir, 2)))
            .collect();

        match unvisited.choose(rng) {
            Some(dir) => {
                let next = current.offset(*dir, 2);
                grid.carve(current.offset(*dir, 1));
                grid.carve(next);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }
}

/// Carve short branches off existing paths that lead nowhere.
///
/// A branch starts at a wall with exactly one walkable neighbour and heads straight away from it
/// for up to three cells, stopping before it would touch any other walkable cell. Connectivity
/// between existing cells is never changed.
pub fn inject_dead_ends<R: Rng>(grid: &mut Grid, rng: &mut R, count: usize) {
    let candidates: Vec<(GridCoordinate, CompassPrimary)> = grid.iter()
        .filter(|cell| cell.is_wall())
        .filter_map(|cell| {
            let walkable = grid.walkable_neighbours(cell.coord);
            if walkable.len() == 1 {
                let from = walkable[0];
                let direction = ALL_DIRECTIONS.iter()
                    .cloned()
                    .find(|dir| from.offset(*dir, 1) == cell.coord)?;
                Some((cell.coord, direction))
            } else {
                None
            }
        })
        .collect();

    for &(first, direction) in candidates.choose_multiple(rng, count) {
        let length = rng.gen_range(1..=3);
        let mut previous = first.offset(direction, -1);
        let mut current = first;
        for _ in 0..length {
            let touches_other_paths = grid.walkable_neighbours(current)
                .iter()
                .any(|neighbour| *neighbour != previous);
            if !grid.is_wall(current) || touches_other_paths {
                break;
            }
            grid.carve(current);
            previous = current;
            current = current.offset(direction, 1);
        }
    }
}

/// Random walks from existing path cells, adding loops and alternate routes.
///
/// Each step moves one or two cells; a two cell step also opens the cell in between.
pub fn inject_extra_paths<R: Rng>(grid: &mut Grid, rng: &mut R, count: usize) {
    let path_cells: Vec<GridCoordinate> = grid.iter()
        .filter(|cell| cell.is_path())
        .map(|cell| cell.coord)
        .collect();

    for _ in 0..count {
        let mut current = match path_cells.choose(rng) {
            Some(coord) => *coord,
            None => return,
        };
        let steps = rng.gen_range(2..=4);
        for _ in 0..steps {
            let direction = CompassPrimary::rand_direction(rng);
            let stride = rng.gen_range(1..=2);
            let next = current.offset(direction, stride);
            if !grid.is_valid_coordinate(next) {
                continue;
            }
            if stride == 2 {
                grid.carve(current.offset(direction, 1));
            }
            grid.carve(next);
            current = next;
        }
    }
}

/// Flip each wall to a path with a probability that grows with `complexity`.
pub fn open_random_walls<R: Rng>(grid: &mut Grid, rng: &mut R, complexity: f64) {
    let probability = (complexity * 0.08).max(0.0).min(1.0);
    if probability == 0.0 {
        return;
    }
    let walls: Vec<GridCoordinate> = grid.iter()
        .filter(|cell| cell.is_wall())
        .map(|cell| cell.coord)
        .collect();
    for coord in walls {
        if rng.gen_bool(probability) {
            grid.carve(coord);
        }
    }
}

fn goal_corner(grid: &Grid) -> GridCoordinate {
    let (w, h) = extent(grid);
    gc(w - 1, h - 1)
}

/// Open every row and column whose index is a multiple of `spacing`.
fn carve_lattice(grid: &mut Grid, spacing: usize) {
    let (w, h) = extent(grid);
    for y in (0..h).step_by(spacing) {
        grid.carve_line(gc(0, y), gc(w - 1, y));
    }
    for x in (0..w).step_by(spacing) {
        grid.carve_line(gc(x, 0), gc(x, h - 1));
    }
}

/// Join a corner cell that a lattice pattern may have missed to the nearest path: tunnel west
/// along its row and, failing that, north along its column.
fn tie_in(grid: &mut Grid, coord: GridCoordinate) {
    if !grid.is_valid_coordinate(coord) {
        return;
    }
    let already_joined = !grid.walkable_neighbours(coord).is_empty();
    if already_joined {
        grid.carve(coord);
        return;
    }
    if !tunnel(grid, coord, CompassPrimary::West) {
        tunnel(grid, coord, CompassPrimary::North);
    }
}

/// Carve from `from` in `direction` until the tunnel touches a walkable cell. Returns false if it
/// ran off the grid first.
fn tunnel(grid: &mut Grid, from: GridCoordinate, direction: CompassPrimary) -> bool {
    let mut previous = None;
    let mut next = Some(from).filter(|coord| grid.is_valid_coordinate(*coord));
    while let Some(current) = next {
        grid.carve(current);
        let touches_paths = grid.walkable_neighbours(current)
            .iter()
            .any(|neighbour| Some(*neighbour) != previous);
        if touches_paths {
            return true;
        }
        previous = Some(current);
        next = grid.neighbour_at_direction(current, direction, 1);
    }
    false
}
