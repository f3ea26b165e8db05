use crate::cells::GridCoordinate;
use crate::grid::Grid;

/// A move is one orthogonal step onto a path or goal cell that lies on the grid.
pub fn is_valid_move(from: GridCoordinate, to: GridCoordinate, grid: &Grid) -> bool {
    from.is_orthogonally_adjacent(to) &&
    grid.cell(to).map_or(false, |cell| cell.is_path() || cell.is_goal())
}

/// Result of asking to move the player. A rejected move leaves `position` at `from`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub position: GridCoordinate,
    pub reached_goal: bool,
}

pub fn attempt_move(grid: &Grid, from: GridCoordinate, to: GridCoordinate) -> MoveOutcome {
    let accepted = is_valid_move(from, to, grid);
    let position = if accepted { to } else { from };
    MoveOutcome {
        accepted,
        position,
        reached_goal: grid.goal() == Some(position),
    }
}
