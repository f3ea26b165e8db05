use little_mazes::cells::GridCoordinate;
use little_mazes::fog::{is_visible, ExploredSet, FogOfWar};
use little_mazes::grid::Grid;
use little_mazes::levels::LevelPolicy;
use little_mazes::maze::{self, build_maze};
use little_mazes::moves::{attempt_move, is_valid_move};
use little_mazes::pathing::{is_reachable, route};
use little_mazes::session::GameSession;
use little_mazes::units::{Level, Radius};
use quickcheck::quickcheck;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

const TRIALS_PER_LEVEL: usize = 100;

fn assert_single_flags(grid: &Grid) {
    assert!(grid.iter().all(|cell| cell.is_wall() != cell.is_path()));
    assert!(grid.iter().filter(|cell| cell.is_start()).count() <= 1);
    assert_eq!(grid.iter().filter(|cell| cell.is_goal()).count(), 1);
}

#[test]
fn every_level_is_solvable() {
    let policy = LevelPolicy::default();
    let mut rng = XorShiftRng::seed_from_u64(0x6d617a65);

    for level in 1..=policy.max_level {
        for _ in 0..TRIALS_PER_LEVEL {
            let grid = build_maze(Level(level), &policy, &mut rng);
            let (start, goal) = maze::corners(grid.width(), grid.height());
            assert_eq!(grid.goal(), Some(goal));
            assert!(is_reachable(&grid, start, goal),
                    "level {} unsolvable:\n{}",
                    level,
                    grid);
            assert_single_flags(&grid);
        }
    }
}

#[test]
fn solvable_for_any_seed() {
    fn prop(seed: u64, level: u8) -> bool {
        let policy = LevelPolicy::default();
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let grid = build_maze(Level(u32::from(level)), &policy, &mut rng);
        let (start, goal) = maze::corners(grid.width(), grid.height());
        is_reachable(&grid, start, goal)
    }
    quickcheck(prop as fn(u64, u8) -> bool);
}

#[test]
fn same_seed_same_maze() {
    let policy = LevelPolicy::default();
    for level in &[1, 3, 10, 14, 25] {
        let a = build_maze(Level(*level), &policy, &mut XorShiftRng::seed_from_u64(42));
        let b = build_maze(Level(*level), &policy, &mut XorShiftRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

#[test]
fn earliest_level_has_a_single_route() {
    let policy = LevelPolicy::default();
    let mut rng = XorShiftRng::seed_from_u64(1);
    let grid = build_maze(Level(1), &policy, &mut rng);
    let path = route(&grid, GridCoordinate::new(0, 0), GridCoordinate::new(2, 2)).unwrap();
    // every open cell is on the route
    assert_eq!(path.len(), grid.iter().filter(|cell| cell.is_walkable()).count());
}

#[test]
fn hint_route_is_a_sequence_of_valid_moves() {
    let policy = LevelPolicy::default();
    let mut rng = XorShiftRng::seed_from_u64(7);
    for level in (1..=30).step_by(3) {
        let grid = build_maze(Level(level), &policy, &mut rng);
        let (start, goal) = maze::corners(grid.width(), grid.height());
        let path = route(&grid, start, goal).unwrap();
        let mut position = start;
        for step in path.iter().skip(1) {
            assert!(is_valid_move(position, *step, &grid));
            position = attempt_move(&grid, position, *step).position;
        }
        assert_eq!(position, goal);
    }
}

#[test]
fn fogged_levels_keep_the_goal_in_sight() {
    let mut session = GameSession::seeded(Level(30), LevelPolicy::default(), 99);
    let fog = session.fog();
    assert!(fog.enabled);
    assert_eq!(fog.reveal_radius, Radius(1));

    let goal = session.grid().goal().unwrap();
    assert!(session.visibility().get(goal).unwrap().visible);

    let mut previous = session.explored().clone();
    for step in session.hint().unwrap().into_iter().skip(1) {
        assert!(session.move_to(step).accepted);
        assert!(session.explored().is_superset(&previous));
        previous = session.explored().clone();
    }
    assert!(session.is_complete());
}

#[test]
fn explored_set_survives_a_json_round_trip() {
    let mut session = GameSession::seeded(Level(13), LevelPolicy::default(), 5);
    for step in session.hint().unwrap().into_iter().skip(1).take(3) {
        session.move_to(step);
    }
    let json = serde_json::to_string(session.explored()).unwrap();
    let restored: ExploredSet = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, session.explored());

    let disabled = FogOfWar::disabled();
    let player = session.position();
    assert!(session.grid()
        .iter()
        .all(|cell| is_visible(session.grid(), cell.coord, player, &ExploredSet::new(), &disabled)));
}
