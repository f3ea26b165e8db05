//! One player working through the levels.
//!
//! The session owns the current grid exclusively. A level change throws the grid away, builds a
//! fresh one and resets the player to the start with only the start cell explored.

use rand::Rng;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::cells::GridCoordinate;
use crate::fog::{self, ExploredSet, FogOfWar, VisibilityMap};
use crate::grid::Grid;
use crate::levels::LevelPolicy;
use crate::maze;
use crate::moves::{self, MoveOutcome};
use crate::pathing;
use crate::units::Level;

pub struct GameSession<R: Rng = XorShiftRng> {
    policy: LevelPolicy,
    rng: R,
    level: Level,
    grid: Grid,
    fog: FogOfWar,
    position: GridCoordinate,
    explored: ExploredSet,
    moves: u32,
    complete: bool,
}

impl GameSession<XorShiftRng> {
    /// A session whose mazes can be replayed from `seed`.
    pub fn seeded(level: Level, policy: LevelPolicy, seed: u64) -> GameSession<XorShiftRng> {
        GameSession::new(level, policy, XorShiftRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(level: Level, policy: LevelPolicy, mut rng: R) -> GameSession<R> {
        let level = policy.clamp_level(level);
        let grid = maze::build_maze(level, &policy, &mut rng);
        let fog = policy.fog_for(level);
        let start = start_of(&grid);

        GameSession {
            policy,
            rng,
            level,
            grid,
            fog,
            position: start,
            explored: ExploredSet::starting_at(start),
            moves: 0,
            complete: false,
        }
    }

    /// Jump to a level, clamped to 1...max_level, with a newly generated maze.
    pub fn select_level(&mut self, level: Level) {
        self.level = self.policy.clamp_level(level);
        self.grid = maze::build_maze(self.level, &self.policy, &mut self.rng);
        self.fog = self.policy.fog_for(self.level);
        log::debug!("selected level {} ({:?}, {:?})", self.level.0, self.grid, self.fog);
        self.restart();
    }

    /// Advance to the next level. Returns false, leaving the session untouched, on the last level.
    pub fn next_level(&mut self) -> bool {
        if self.level.0 >= self.policy.max_level {
            return false;
        }
        let next = Level(self.level.0 + 1);
        self.select_level(next);
        true
    }

    /// Back to the start of the current maze.
    pub fn restart(&mut self) {
        let start = start_of(&self.grid);
        self.position = start;
        self.explored = ExploredSet::starting_at(start);
        self.moves = 0;
        self.complete = false;
    }

    /// Try to step to `target`. Accepted moves reveal the neighbourhood of the new position.
    pub fn move_to(&mut self, target: GridCoordinate) -> MoveOutcome {
        let outcome = moves::attempt_move(&self.grid, self.position, target);
        if outcome.accepted {
            self.position = outcome.position;
            self.moves += 1;
            self.explored.reveal_around(self.position, self.fog.reveal_radius, &self.grid);
            if outcome.reached_goal && !self.complete {
                self.complete = true;
                log::info!("level {} complete in {} moves", self.level.0, self.moves);
            }
        }
        outcome
    }

    /// Rough closeness to the goal in percent: Manhattan distance against twice the longest side.
    pub fn progress(&self) -> f64 {
        let goal = match self.grid.goal() {
            Some(goal) => goal,
            None => return 0.0,
        };
        let longest_side = self.grid.width().0.max(self.grid.height().0);
        let max_distance = (2 * longest_side) as f64;
        let distance = f64::from(self.position.manhattan_distance(goal));
        ((max_distance - distance) / max_distance * 100.0).max(0.0).min(100.0)
    }

    /// Shortest route from the player to the goal, both ends included.
    pub fn hint(&self) -> Option<Vec<GridCoordinate>> {
        let goal = self.grid.goal()?;
        pathing::route(&self.grid, self.position, goal)
    }

    pub fn visibility(&self) -> VisibilityMap {
        fog::visibility_of(&self.grid, self.position, &self.explored, &self.fog)
    }

    /// Fold in an explored set saved earlier for this level. Cells off the grid are dropped.
    pub fn resume_explored(&mut self, saved: &ExploredSet) {
        for coord in saved.iter() {
            if self.grid.is_valid_coordinate(*coord) {
                self.explored.insert(*coord);
            }
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[inline]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn position(&self) -> GridCoordinate {
        self.position
    }

    #[inline]
    pub fn explored(&self) -> &ExploredSet {
        &self.explored
    }

    #[inline]
    pub fn fog(&self) -> FogOfWar {
        self.fog
    }
}

fn start_of(grid: &Grid) -> GridCoordinate {
    grid.start().unwrap_or_else(|| GridCoordinate::new(0, 0))
}
