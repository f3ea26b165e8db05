//! Text rendering of grids. Every cell is drawn two glyphs wide so the maze looks roughly square
//! in a terminal.

use std::fmt;

use crate::cells::{Cell, GridCoordinate, Marker, Terrain};
use crate::fog::VisibilityMap;
use crate::grid::Grid;
use crate::utils::{fnv_hashset, FnvHashSet};

const WALL: &str = "██";
const FLOOR: &str = "  ";
const START: &str = "S ";
const GOAL: &str = "G ";

pub trait GridDisplay {
    /// Render the contents of a grid cell as text, two glyphs wide.
    /// None leaves the cell to the next display, or to the plain terrain rendering.
    fn render_cell_body(&self, _: &Cell) -> Option<String> {
        None
    }
}

/// Marks the cells of a route, e.g. a hint, leaving the start and goal markers alone.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}

impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        let mut on_path_coordinates = fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: &Cell) -> Option<String> {
        if self.on_path_coordinates.contains(&cell.coord) && cell.marker().is_none() {
            Some(String::from("··"))
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct PlayerDisplay {
    position: GridCoordinate,
}

impl PlayerDisplay {
    pub fn new(position: GridCoordinate) -> Self {
        PlayerDisplay { position }
    }
}

impl GridDisplay for PlayerDisplay {
    fn render_cell_body(&self, cell: &Cell) -> Option<String> {
        if cell.coord == self.position {
            Some(String::from("@ "))
        } else {
            None
        }
    }
}

/// Hides cells the player cannot see.
#[derive(Debug)]
pub struct FogDisplay {
    visibility: VisibilityMap,
}

impl FogDisplay {
    pub fn new(visibility: VisibilityMap) -> Self {
        FogDisplay { visibility }
    }
}

impl GridDisplay for FogDisplay {
    fn render_cell_body(&self, cell: &Cell) -> Option<String> {
        match self.visibility.get(cell.coord) {
            Some(flags) if flags.visible => None,
            _ => Some(String::from("░░")),
        }
    }
}

fn terrain_glyphs(cell: &Cell) -> &'static str {
    match (cell.marker(), cell.terrain()) {
        (Some(Marker::Start), _) => START,
        (Some(Marker::Goal), _) => GOAL,
        (None, Terrain::Path) => FLOOR,
        (None, Terrain::Wall) => WALL,
    }
}

/// A grid with display layers on top. The first layer with something to say about a cell wins.
pub struct GridView<'a> {
    grid: &'a Grid,
    layers: Vec<&'a dyn GridDisplay>,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> GridView<'a> {
        GridView {
            grid,
            layers: vec![],
        }
    }

    pub fn with_layer(mut self, layer: &'a dyn GridDisplay) -> GridView<'a> {
        self.layers.push(layer);
        self
    }

    fn render_cell(&self, cell: &Cell) -> String {
        self.layers
            .iter()
            .filter_map(|layer| layer.render_cell_body(cell))
            .next()
            .unwrap_or_else(|| String::from(terrain_glyphs(cell)))
    }
}

impl<'a> fmt::Display for GridView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border = WALL.repeat(self.grid.width().0 + 2);
        writeln!(f, "{}", border)?;
        for row in self.grid.iter_row() {
            let mut line = String::from(WALL);
            for cell in row {
                line.push_str(&self.render_cell(cell));
            }
            line.push_str(WALL);
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", border)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        GridView::new(self).fmt(f)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::fog::{visibility_of, ExploredSet, FogOfWar};
    use crate::units::Radius;

    fn staircase() -> Grid {
        Grid::parse("S##
                     ..#
                     #.G").unwrap()
    }

    fn rows(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn plain_rendering() {
        let text = staircase().to_string();
        assert_eq!(rows(&text),
                   vec!["██████████", "██S ██████", "██    ████", "████  G ██", "██████████"]);
    }

    #[test]
    fn path_and_player_layers() {
        let g = staircase();
        let path = [GridCoordinate::new(0, 0),
                    GridCoordinate::new(0, 1),
                    GridCoordinate::new(1, 1),
                    GridCoordinate::new(1, 2),
                    GridCoordinate::new(2, 2)];
        let path_display = PathDisplay::new(&path);
        let player = PlayerDisplay::new(GridCoordinate::new(0, 1));
        let text = GridView::new(&g).with_layer(&player).with_layer(&path_display).to_string();
        assert_eq!(rows(&text)[2], "██@ ··████");
        assert_eq!(rows(&text)[3], "████··G ██");
    }

    #[test]
    fn fog_hides_unseen_cells() {
        let g = Grid::parse("S...
                             ....
                             ....
                             ...G").unwrap();
        let player = GridCoordinate::new(0, 0);
        let fog = FogOfWar {
            enabled: true,
            reveal_radius: Radius(1),
            goal_radius: Radius(1),
        };
        let visibility = visibility_of(&g, player, &ExploredSet::starting_at(player), &fog);
        let fog_display = FogDisplay::new(visibility);
        let text = GridView::new(&g).with_layer(&fog_display).to_string();
        let lines = rows(&text);
        assert_eq!(lines[1], "██S   ░░░░██");
        assert_eq!(lines[3], "██░░░░░░  ██");
        assert_eq!(lines[4], "██░░░░  G ██");
    }
}
