//! One-shot placement of the trees and rocks decorating the ground.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::config::{Span, WorldConfig};

pub const LEAF_GREEN: u32 = 0x32620d;
pub const LEAF_GOLD: u32 = 0xd1a101;
pub const TRUNK_BROWN: u32 = 0x49011d;

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Trunk base center; y is half the size so the trunk sits on the ground.
    pub position: Vec3,
    pub size: f32,
    pub leaf_color: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rock {
    pub position: Vec3,
    /// Width, height and depth.
    pub size: Vec3,
    pub color: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub trees: Vec<Tree>,
    pub rocks: Vec<Rock>,
}

impl Environment {
    pub fn generate<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        let trees = generate_forest(
            rng,
            config.tree_count,
            config.tree_size,
            config.golden_tree_chance,
            config.spawn_area,
        );
        let rocks = generate_rocks(
            rng,
            config.rock_count,
            &config.rock_colors,
            config.rock_size,
            config.spawn_area,
        );
        debug!(trees = trees.len(), rocks = rocks.len(), "environment placed");
        Self { trees, rocks }
    }
}

fn sample<R: Rng>(rng: &mut R, span: Span) -> f32 {
    if span.max > span.min {
        rng.gen_range(span.min..span.max)
    } else {
        span.min
    }
}

pub fn generate_forest<R: Rng>(
    rng: &mut R,
    amount: usize,
    size: Span,
    golden_chance: f64,
    area: Span,
) -> Vec<Tree> {
    (0..amount)
        .map(|_| {
            let size = sample(rng, size);
            let leaf_color = if rng.gen_bool(golden_chance.clamp(0.0, 1.0)) {
                LEAF_GOLD
            } else {
                LEAF_GREEN
            };
            let position = Vec3::new(sample(rng, area), size / 2.0, sample(rng, area));
            Tree {
                position,
                size,
                leaf_color,
            }
        })
        .collect()
}

pub fn generate_rocks<R: Rng>(
    rng: &mut R,
    amount: usize,
    colors: &[u32],
    size: Span,
    area: Span,
) -> Vec<Rock> {
    if colors.is_empty() {
        return Vec::new();
    }
    (0..amount)
        .map(|_| {
            let size = Vec3::new(sample(rng, size), sample(rng, size), sample(rng, size));
            let color = colors[rng.gen_range(0..colors.len())];
            let position = Vec3::new(sample(rng, area), size.y / 2.0, sample(rng, area));
            Rock {
                position,
                size,
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn placements_respect_ranges() {
        let config = WorldConfig::default();
        let env = Environment::generate(&config, &mut StdRng::seed_from_u64(3));

        assert_eq!(env.trees.len(), 100);
        assert_eq!(env.rocks.len(), 150);
        for tree in &env.trees {
            assert!(config.tree_size.contains(tree.size));
            assert!(config.spawn_area.contains(tree.position.x));
            assert!(config.spawn_area.contains(tree.position.z));
            assert_eq!(tree.position.y, tree.size / 2.0);
            assert!(tree.leaf_color == LEAF_GREEN || tree.leaf_color == LEAF_GOLD);
        }
        for rock in &env.rocks {
            assert!(config.rock_size.contains(rock.size.x));
            assert!(config.rock_size.contains(rock.size.y));
            assert!(config.rock_size.contains(rock.size.z));
            assert_eq!(rock.position.y, rock.size.y / 2.0);
            assert!(config.rock_colors.contains(&rock.color));
        }
    }

    #[test]
    fn same_seed_same_world() {
        let config = WorldConfig::default();
        let a = Environment::generate(&config, &mut StdRng::seed_from_u64(11));
        let b = Environment::generate(&config, &mut StdRng::seed_from_u64(11));
        assert_eq!(a.trees, b.trees);
        assert_eq!(a.rocks, b.rocks);
    }

    #[test]
    fn golden_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        let area = Span::new(-1.0, 1.0);
        let size = Span::new(1.0, 1.0);
        assert!(generate_forest(&mut rng, 20, size, 1.0, area)
            .iter()
            .all(|t| t.leaf_color == LEAF_GOLD && t.size == 1.0));
        assert!(generate_forest(&mut rng, 20, size, 0.0, area)
            .iter()
            .all(|t| t.leaf_color == LEAF_GREEN));
    }

    #[test]
    fn rocks_need_a_palette() {
        let mut rng = StdRng::seed_from_u64(1);
        let rocks = generate_rocks(&mut rng, 5, &[], Span::new(0.1, 0.2), Span::new(0.0, 1.0));
        assert!(rocks.is_empty());
    }
}
