//! Level tuning: grid size, carving strategy and fog of war per level.
//!
//! All the thresholds here are a tuning table, not a contract. The only promises are that grid
//! size never shrinks as the level goes up, never exceeds `max_size`, and that fog gets tighter
//! rather than looser.

use crate::fog::FogOfWar;
use crate::generators::Strategy;
use crate::units::{Height, Level, Radius, Width};


#[derive(Clone, Debug, PartialEq)]
pub struct LevelPolicy {
    /// (last level of the band, side length), ordered by level with non-decreasing sizes.
    pub size_bands: Vec<(u32, usize)>,
    /// Past the last size band the side grows by one every `growth_every` levels.
    pub growth_every: u32,
    pub max_size: usize,
    /// (last level of the band, strategy) for the hand designed levels.
    pub strategy_bands: Vec<(u32, Strategy)>,
    /// Backtracker complexity at the first level past the strategy bands.
    pub base_complexity: f64,
    /// Complexity added per level past the strategy bands, capped at 1.
    pub complexity_per_level: f64,
    /// Open up solid wall blocks from this level on.
    pub declump_from_level: u32,
    pub fog_from_level: u32,
    /// Levels up to and including this one reveal `wide_reveal_radius` around each move.
    pub wide_reveal_until: u32,
    pub wide_reveal_radius: Radius,
    pub narrow_reveal_radius: Radius,
    pub goal_reveal_radius: Radius,
    pub max_level: u32,
}

impl Default for LevelPolicy {
    fn default() -> LevelPolicy {
        LevelPolicy {
            size_bands: vec![(1, 3), (3, 4), (5, 5), (8, 6), (12, 7), (18, 8)],
            growth_every: 5,
            max_size: 10,
            strategy_bands: vec![(1, Strategy::Straight),
                                 (3, Strategy::OneTurn),
                                 (4, Strategy::TwoTurn),
                                 (5, Strategy::Staircase),
                                 (7, Strategy::Choice),
                                 (9, Strategy::CorridorGrid),
                                 (12, Strategy::Rooms),
                                 (15, Strategy::DeadEnds)],
            base_complexity: 0.1,
            complexity_per_level: 0.05,
            declump_from_level: 16,
            fog_from_level: 12,
            wide_reveal_until: 5,
            wide_reveal_radius: Radius(2),
            narrow_reveal_radius: Radius(1),
            goal_reveal_radius: Radius(2),
            max_level: 50,
        }
    }
}

/// Levels start at 1.
#[inline]
fn normalised(level: Level) -> u32 {
    level.0.max(1)
}

impl LevelPolicy {
    /// Grid dimensions for a level. Square grids, at least 1x1, at most `max_size` a side.
    pub fn size_for(&self, level: Level) -> (Width, Height) {
        let level = normalised(level);
        let max_size = self.max_size.max(1);

        let banded = self.size_bands.iter().find(|&&(last_level, _)| level <= last_level);
        let side = match (banded, self.size_bands.last()) {
            (Some(&(_, size)), _) => size,
            (None, Some(&(last_level, last_size))) => {
                let growth = ((level - last_level) / self.growth_every.max(1)) as usize;
                last_size.saturating_add(growth)
            }
            (None, None) => max_size,
        };

        let side = side.max(1).min(max_size);
        (Width(side), Height(side))
    }

    /// Complexity in [0, 1] handed to the randomized strategies.
    pub fn complexity_for(&self, level: Level) -> f64 {
        let level = normalised(level);
        let last_banded = self.strategy_bands.last().map_or(0, |&(last_level, _)| last_level);
        if level <= last_banded {
            return 0.0;
        }
        let past = f64::from(level - last_banded - 1);
        (self.base_complexity + past * self.complexity_per_level).max(0.0).min(1.0)
    }

    pub fn strategy_for(&self, level: Level) -> Strategy {
        let level_number = normalised(level);
        self.strategy_bands
            .iter()
            .find(|&&(last_level, _)| level_number <= last_level)
            .map(|&(_, strategy)| strategy)
            .unwrap_or(Strategy::Backtracker { complexity: self.complexity_for(level) })
    }

    pub fn declumps(&self, level: Level) -> bool {
        normalised(level) >= self.declump_from_level
    }

    pub fn fog_enabled_for(&self, level: Level) -> bool {
        normalised(level) >= self.fog_from_level
    }

    /// How far around each new position a move reveals. Generous early, tighter later.
    pub fn reveal_radius_for(&self, level: Level) -> Radius {
        if normalised(level) <= self.wide_reveal_until {
            self.wide_reveal_radius
        } else {
            self.narrow_reveal_radius
        }
    }

    pub fn fog_for(&self, level: Level) -> FogOfWar {
        FogOfWar {
            enabled: self.fog_enabled_for(level),
            reveal_radius: self.reveal_radius_for(level),
            goal_radius: self.goal_reveal_radius,
        }
    }

    /// Clamp a requested level into 1...max_level.
    pub fn clamp_level(&self, level: Level) -> Level {
        Level(normalised(level).min(self.max_level.max(1)))
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn first_levels_are_tiny() {
        let policy = LevelPolicy::default();
        assert_eq!(policy.size_for(Level(1)), (Width(3), Height(3)));
        assert_eq!(policy.size_for(Level(0)), (Width(3), Height(3)));
        assert_eq!(policy.size_for(Level(3)), (Width(4), Height(4)));
    }

    #[test]
    fn sizes_saturate() {
        let policy = LevelPolicy::default();
        assert_eq!(policy.size_for(Level(1000)), (Width(10), Height(10)));
        assert_eq!(policy.size_for(Level(u32::MAX)), (Width(10), Height(10)));
    }

    #[test]
    fn size_is_monotonic_and_bounded() {
        fn prop(a: u32, b: u32) -> bool {
            let policy = LevelPolicy::default();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let (Width(low_w), Height(low_h)) = policy.size_for(Level(low));
            let (Width(high_w), Height(high_h)) = policy.size_for(Level(high));
            low_w <= high_w && low_h <= high_h && high_w <= policy.max_size && low_w >= 1
        }
        quickcheck(prop as fn(u32, u32) -> bool);
    }

    #[test]
    fn strategy_bands() {
        let policy = LevelPolicy::default();
        assert_eq!(policy.strategy_for(Level(1)), Strategy::Straight);
        assert_eq!(policy.strategy_for(Level(2)), Strategy::OneTurn);
        assert_eq!(policy.strategy_for(Level(5)), Strategy::Staircase);
        assert_eq!(policy.strategy_for(Level(7)), Strategy::Choice);
        assert_eq!(policy.strategy_for(Level(15)), Strategy::DeadEnds);
        match policy.strategy_for(Level(16)) {
            Strategy::Backtracker { complexity } => assert!((complexity - 0.1).abs() < 1e-9),
            other => panic!("expected a backtracker, got {:?}", other),
        }
    }

    #[test]
    fn complexity_grows_then_caps() {
        let policy = LevelPolicy::default();
        assert_eq!(policy.complexity_for(Level(3)), 0.0);
        assert!(policy.complexity_for(Level(20)) > policy.complexity_for(Level(16)));
        assert_eq!(policy.complexity_for(Level(500)), 1.0);
    }

    #[test]
    fn fog_tightens_with_level() {
        let policy = LevelPolicy::default();
        assert!(!policy.fog_for(Level(1)).enabled);
        assert!(policy.fog_for(Level(12)).enabled);
        assert!(policy.reveal_radius_for(Level(2)) >= policy.reveal_radius_for(Level(20)));
        assert_eq!(policy.fog_for(Level(30)).goal_radius, Radius(2));
    }

    #[test]
    fn clamp_levels() {
        let policy = LevelPolicy::default();
        assert_eq!(policy.clamp_level(Level(0)), Level(1));
        assert_eq!(policy.clamp_level(Level(51)), Level(50));
        assert_eq!(policy.clamp_level(Level(20)), Level(20));
    }
}
