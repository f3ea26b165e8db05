//! The maze assembler.
//!
//! Every grid handed out of this module has a walkable route from start to goal. Carving strategies
//! are allowed to get it wrong; the assembler checks the result and, when the goal is cut off,
//! carves an L shaped corridor between the corners.

use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::cells::{GridCoordinate, Marker};
use crate::grid::Grid;
use crate::levels::LevelPolicy;
use crate::pathing;
use crate::units::{Height, Level, Width};

/// Explicit dimensions for one maze, bypassing the level sizing table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    pub width: Width,
    pub height: Height,
    pub level: Level,
}

impl MazeConfig {
    pub fn for_level(level: Level, policy: &LevelPolicy) -> MazeConfig {
        let (width, height) = policy.size_for(level);
        MazeConfig {
            width,
            height,
            level,
        }
    }
}

/// Build the maze for a level, sized and carved by `policy`.
pub fn build_maze<R: Rng>(level: Level, policy: &LevelPolicy, rng: &mut R) -> Grid {
    build_maze_with_config(&MazeConfig::for_level(level, policy), policy, rng)
}

pub fn build_maze_with_config<R: Rng>(config: &MazeConfig,
                                      policy: &LevelPolicy,
                                      rng: &mut R)
                                      -> Grid {
    let strategy = policy.strategy_for(config.level);
    log::debug!("level {}: {}x{} grid carved by {} ({:?})",
                config.level.0,
                config.width.0,
                config.height.0,
                strategy.name(),
                strategy);

    assemble(config.width,
             config.height,
             rng,
             |grid, rng| strategy.carve(grid, rng),
             policy.declumps(config.level))
}

/// Start and goal corners of a grid of the given size.
pub fn corners(width: Width, height: Height) -> (GridCoordinate, GridCoordinate) {
    let goal = GridCoordinate::new(width.0 as i32 - 1, height.0 as i32 - 1);
    (GridCoordinate::new(0, 0), goal)
}

/// Allocate, carve, mark, optionally declump, validate and repair.
///
/// Grids are at least 2x2 so that the start and goal never share a cell.
pub(crate) fn assemble<R, F>(width: Width,
                             height: Height,
                             rng: &mut R,
                             carve: F,
                             declump: bool)
                             -> Grid
    where R: Rng,
          F: FnOnce(&mut Grid, &mut R)
{
    let (width, height) = (Width(width.0.max(2)), Height(height.0.max(2)));
    let mut grid = Grid::new(width, height);
    carve(&mut grid, rng);

    let (start, goal) = corners(width, height);
    grid.mark(start, Marker::Start);
    grid.mark(goal, Marker::Goal);

    if declump {
        let opened = declump_walls(&mut grid, rng);
        log::debug!("declumping opened {} cells", opened);
    }

    if !pathing::is_reachable(&grid, start, goal) {
        log::warn!("goal {} unreachable from {} on {:?}, carving guaranteed path",
                   goal,
                   start,
                   grid);
        carve_guaranteed_path(&mut grid, start, goal);
    }

    grid
}

/// Carve along the start row to the goal column, then down the goal column. Existing paths are
/// left alone; the corridor only opens walls.
pub(crate) fn carve_guaranteed_path(grid: &mut Grid, start: GridCoordinate, goal: GridCoordinate) {
    let bend = GridCoordinate::new(goal.x, start.y);
    grid.carve_line(start, bend);
    grid.carve_line(bend, goal);
    grid.mark(start, Marker::Start);
    grid.mark(goal, Marker::Goal);
}

/// Open up solid 2x2 wall blocks that sit next to a path.
///
/// Each such block has an even chance of getting one of its path-adjacent cells opened, so the new
/// cell always hangs off an existing path. Walls are only ever removed. Returns the number of cells
/// opened.
pub(crate) fn declump_walls<R: Rng>(grid: &mut Grid, rng: &mut R) -> usize {
    let (w, h) = (grid.width().0 as i32, grid.height().0 as i32);
    let mut opened = 0;

    for y in 0..(h - 1) {
        for x in 0..(w - 1) {
            let block = [GridCoordinate::new(x, y),
                         GridCoordinate::new(x + 1, y),
                         GridCoordinate::new(x, y + 1),
                         GridCoordinate::new(x + 1, y + 1)];
            if !block.iter().all(|coord| grid.is_wall(*coord)) {
                continue;
            }

            let next_to_path: SmallVec<[GridCoordinate; 4]> = block.iter()
                .cloned()
                .filter(|coord| !grid.walkable_neighbours(*coord).is_empty())
                .collect();
            if next_to_path.is_empty() || !rng.gen_bool(0.5) {
                continue;
            }

            if let Some(coord) = next_to_path.choose(rng) {
                if grid.carve(*coord) {
                    opened += 1;
                }
            }
        }
    }

    opened
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::pathing::is_reachable;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn check_invariants(grid: &Grid) {
        let (start, goal) = corners(grid.width(), grid.height());
        assert_eq!(grid.start(), Some(start));
        assert_eq!(grid.goal(), Some(goal));
        assert!(is_reachable(grid, start, goal), "{:?}", grid);
        assert_eq!(grid.iter().filter(|cell| cell.is_start()).count(), 1);
        assert_eq!(grid.iter().filter(|cell| cell.is_goal()).count(), 1);
        assert!(grid.iter().all(|cell| cell.is_wall() != cell.is_path()));
    }

    fn open_all_but_the_goal(grid: &mut Grid, _: &mut XorShiftRng) {
        for y in 0..6 {
            grid.carve_line(GridCoordinate::new(0, y), GridCoordinate::new(5, y));
        }
        // wall the goal in
        grid.block(GridCoordinate::new(4, 5));
        grid.block(GridCoordinate::new(5, 4));
    }

    #[test]
    fn goal_isolating_carver_is_repaired() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        let grid = assemble(Width(6), Height(6), &mut rng, open_all_but_the_goal, false);
        check_invariants(&grid);
        assert!(grid.is_walkable(GridCoordinate::new(5, 4)));
    }

    #[test]
    fn empty_carve_gets_the_l_route() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        let grid = assemble(Width(5), Height(4), &mut rng, |_, _| {}, false);
        check_invariants(&grid);
        assert_eq!(grid.path_count(), 5 + 4 - 1);
        for x in 0..5 {
            assert!(grid.is_walkable(GridCoordinate::new(x, 0)));
        }
        for y in 0..4 {
            assert!(grid.is_walkable(GridCoordinate::new(4, y)));
        }
    }

    #[test]
    fn degenerate_sizes_are_widened() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        let grid = assemble(Width(1), Height(0), &mut rng, |_, _| {}, true);
        assert_eq!((grid.width(), grid.height()), (Width(2), Height(2)));
        check_invariants(&grid);
    }

    #[test]
    fn built_mazes_hold_invariants() {
        let policy = LevelPolicy::default();
        let mut rng = XorShiftRng::seed_from_u64(11);
        for level in 1..=40 {
            for _ in 0..10 {
                let grid = build_maze(Level(level), &policy, &mut rng);
                let (width, height) = policy.size_for(Level(level));
                assert_eq!((grid.width(), grid.height()), (width, height));
                check_invariants(&grid);
            }
        }
    }

    #[test]
    fn explicit_config_sizes() {
        let policy = LevelPolicy::default();
        let mut rng = XorShiftRng::seed_from_u64(17);
        let config = MazeConfig {
            width: Width(9),
            height: Height(5),
            level: Level(20),
        };
        let grid = build_maze_with_config(&config, &policy, &mut rng);
        assert_eq!(grid.width(), Width(9));
        assert_eq!(grid.height(), Height(5));
        check_invariants(&grid);
    }

    #[test]
    fn declumping_only_opens_walls() {
        let mut rng = XorShiftRng::seed_from_u64(23);
        let mut grid = Grid::new(Width(8), Height(8));
        grid.carve_line(GridCoordinate::new(0, 0), GridCoordinate::new(7, 0));
        let before = grid.clone();

        let mut total = 0;
        for _ in 0..5 {
            total += declump_walls(&mut grid, &mut rng);
        }
        assert!(total > 0);
        assert_eq!(grid.path_count(), before.path_count() + total);
        assert!(before.iter()
            .filter(|cell| cell.is_path())
            .all(|cell| grid.is_walkable(cell.coord)));
    }

    #[test]
    fn declumping_ignores_blocks_away_from_paths() {
        let mut rng = XorShiftRng::seed_from_u64(29);
        let mut grid = Grid::new(Width(6), Height(6));
        for _ in 0..10 {
            assert_eq!(declump_walls(&mut grid, &mut rng), 0);
        }
    }
}
