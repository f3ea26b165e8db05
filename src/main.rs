use docopt::Docopt;
use error_chain::bail;
use itertools::Itertools;
use little_mazes::{
    cells::GridCoordinate,
    fog::{self, ExploredSet},
    grid::Grid,
    grid_displays::{FogDisplay, GridView, PathDisplay, PlayerDisplay},
    levels::LevelPolicy,
    maze,
    pathing,
    units::Level,
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Little mazes

Usage:
    little_mazes_driver -h | --help
    little_mazes_driver [--level=<n>] [--seed=<n>] [--max-size=<n>] [--fog] [--player-x=<x> --player-y=<y>] [--show-path] [--text-out=<path>]
    little_mazes_driver check [--level=<n>] [--seed=<n>] [--max-size=<n>] [--trials=<n>]

Options:
    -h --help            Show this screen.
    --level=<n>          The level to generate a maze for [default: 1].
    --seed=<n>           Seed for the random number generator, the same seed and level give the same maze.
    --max-size=<n>       Longest grid side the level policy may hand out [default: 10].
    --fog                Render with fog of war even on levels that do not use it.
    --player-x=<x>       x coordinate of the player, the start cell if not given.
    --player-y=<y>       y coordinate of the player, the start cell if not given.
    --show-path          Mark the shortest route from the player to the goal.
    --text-out=<path>    Output file path for the text rendering, stdout if not given.
    --trials=<n>         Number of mazes to generate when checking solvability [default: 100].
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_check: bool,
    flag_level: u32,
    flag_seed: Option<u64>,
    flag_max_size: usize,
    flag_fog: bool,
    flag_player_x: Option<i32>,
    flag_player_y: Option<i32>,
    flag_show_path: bool,
    flag_text_out: String,
    flag_trials: usize,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let mut rng = match args.flag_seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    };
    let policy = LevelPolicy {
        max_size: args.flag_max_size,
        ..LevelPolicy::default()
    };
    let level = policy.clamp_level(Level(args.flag_level));

    if args.cmd_check {
        return check_solvability(level, &policy, &mut rng, args.flag_trials);
    }

    let grid = maze::build_maze(level, &policy, &mut rng);
    log::info!("level {} maze: {:?}", level.0, grid);

    let rendering = render_maze(&grid, level, &policy, &args)?;
    if args.flag_text_out.is_empty() {
        println!("{}", rendering);
    } else {
        write_text_to_file(&rendering, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn player_position(args: &DriverArgs, grid: &Grid) -> Result<GridCoordinate> {
    let start = maze::corners(grid.width(), grid.height()).0;
    let player = match (args.flag_player_x, args.flag_player_y) {
        (Some(x), Some(y)) => GridCoordinate::new(x, y),
        _ => start,
    };
    if !grid.is_walkable(player) {
        bail!("The player position {} is not an open cell of the maze", player);
    }
    Ok(player)
}

/// Layer the player, the fog and the hint route over the maze, in that order of precedence.
fn render_maze(grid: &Grid, level: Level, policy: &LevelPolicy, args: &DriverArgs) -> Result<String> {
    let player = player_position(args, grid)?;

    let mut fog_of_war = policy.fog_for(level);
    fog_of_war.enabled |= args.flag_fog;
    let mut explored = ExploredSet::starting_at(maze::corners(grid.width(), grid.height()).0);
    explored.reveal_around(player, fog_of_war.reveal_radius, grid);

    let player_display = PlayerDisplay::new(player);
    let fog_display = FogDisplay::new(fog::visibility_of(grid, player, &explored, &fog_of_war));
    let route = if args.flag_show_path {
        grid.goal().and_then(|goal| pathing::route(grid, player, goal))
    } else {
        None
    };
    let path_display = PathDisplay::new(route.as_deref().unwrap_or(&[]));

    if let Some(ref route) = route {
        log::info!("route: {}", route.iter().map(GridCoordinate::to_key).join(" -> "));
    } else if args.flag_show_path {
        log::warn!("no route from {} to the goal", player);
    }

    let mut view = GridView::new(grid).with_layer(&player_display);
    if fog_of_war.enabled {
        view = view.with_layer(&fog_display);
    }
    if route.is_some() {
        view = view.with_layer(&path_display);
    }
    Ok(view.to_string())
}

fn check_solvability(level: Level,
                     policy: &LevelPolicy,
                     rng: &mut XorShiftRng,
                     trials: usize)
                     -> Result<()> {
    let unsolvable = (0..trials)
        .filter(|_| {
            let grid = maze::build_maze(level, policy, &mut *rng);
            let (start, goal) = maze::corners(grid.width(), grid.height());
            !pathing::is_reachable(&grid, start, goal)
        })
        .count();

    if unsolvable > 0 {
        bail!("{} of {} level {} mazes had no route to the goal", unsolvable, trials, level.0);
    }
    println!("All {} level {} mazes are solvable", trials, level.0);
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
