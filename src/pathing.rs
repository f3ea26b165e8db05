//! Breadth first searches over the walkable cells of a grid.
//!
//! Every step between orthogonal neighbours costs the same, so a plain BFS frontier gives both the
//! yes/no connectivity answer the maze assembler needs and the distance flood fill used for hint
//! routes.

use bit_set::BitSet;
use std::collections::VecDeque;

use crate::cells::GridCoordinate;
use crate::grid::Grid;


/// Is there a walkable 4-connected route from `start` to `goal`?
///
/// Cells are admitted when they are path, start or goal cells. Coordinates outside the grid are
/// never reachable. The grid is not modified.
pub fn is_reachable(grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> bool {
    let start_index = match grid.grid_coordinate_to_index(start) {
        Some(index) => index,
        None => return false,
    };
    if !grid.is_valid_coordinate(goal) {
        return false;
    }

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);
    let mut queue = VecDeque::with_capacity(grid.size());
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return true;
        }

        for neighbour in grid.walkable_neighbours(current).iter() {
            if let Some(index) = grid.grid_coordinate_to_index(*neighbour) {
                // BitSet::insert is false if already present
                if visited.insert(index) {
                    queue.push_back(*neighbour);
                }
            }
        }
    }

    false
}

/// Step counts from a start cell to every walkable cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: Vec<Option<u32>>,
    width: usize,
    max_distance: u32,
}

impl Distances {
    /// None if the start coordinate is not on the grid.
    pub fn for_grid(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {
        let start_index = grid.grid_coordinate_to_index(start_coordinate)?;

        let mut distances = vec![None; grid.size()];
        distances[start_index] = Some(0);
        let mut max = 0;

        // The distances vec doubles as the visited set: the first time a cell is reached is the
        // shortest distance to it.
        let mut frontier = vec![start_coordinate];
        let mut steps = 0;
        while !frontier.is_empty() {
            steps += 1;
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                for neighbour in grid.walkable_neighbours(*cell_coord).iter() {
                    if let Some(index) = grid.grid_coordinate_to_index(*neighbour) {
                        if distances[index].is_none() {
                            distances[index] = Some(steps);
                            max = steps;
                            new_frontier.push(*neighbour);
                        }
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            width: grid.width().0,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        if coord.x < 0 || coord.y < 0 || coord.x as usize >= self.width {
            return None;
        }
        let index = coord.y as usize * self.width + coord.x as usize;
        self.distances.get(index).cloned().flatten()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to a
/// neighbour one closer. Returns the route start first, or None when `end_point` is unreachable.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let mut current_coord = end_point;

    while current_distance > 0 {
        let closer = grid.walkable_neighbours(current_coord)
            .iter()
            .cloned()
            .find(|coord| {
                distances_from_start.distance_from_start_to(*coord) == Some(current_distance - 1)
            })?;
        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// Shortest route between two cells, both ends included.
pub fn route(grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> Option<Vec<GridCoordinate>> {
    let distances = Distances::for_grid(grid, start)?;
    shortest_path(grid, &distances, goal)
}
