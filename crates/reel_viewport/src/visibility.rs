//! Card visibility tiers
//!
//! Cards shrink and fade by how far (in index units) they sit from the
//! active card.

use serde::{Deserialize, Serialize};

use crate::config::VisibilityConfig;

/// Scale and opacity applied to one card
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct CardVisibility {
    pub scale: f32,
    pub opacity: f32,
}

impl CardVisibility {
    pub const fn new(scale: f32, opacity: f32) -> Self {
        Self { scale, opacity }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CardVisibilityMapper {
    active: CardVisibility,
    adjacent: CardVisibility,
    distant: CardVisibility,
}

impl CardVisibilityMapper {
    pub fn new(config: &VisibilityConfig) -> Self {
        Self {
            active: config.active,
            adjacent: config.adjacent,
            distant: config.distant,
        }
    }

    /// Tier for a distance from the active card
    pub fn for_distance(&self, distance: usize) -> CardVisibility {
        match distance {
            0 => self.active,
            1 => self.adjacent,
            _ => self.distant,
        }
    }

    /// Tier for `index` when `active_index` is the active card
    pub fn for_index(&self, index: usize, active_index: usize) -> CardVisibility {
        self.for_distance(index.abs_diff(active_index))
    }
}

impl Default for CardVisibilityMapper {
    fn default() -> Self {
        Self::new(&VisibilityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let mapper = CardVisibilityMapper::default();
        assert_eq!(mapper.for_distance(0), CardVisibility::new(1.0, 1.0));
        assert_eq!(mapper.for_distance(1), CardVisibility::new(0.96, 0.8));
        assert_eq!(mapper.for_distance(2), CardVisibility::new(0.92, 0.6));
        assert_eq!(mapper.for_distance(5), CardVisibility::new(0.92, 0.6));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mapper = CardVisibilityMapper::default();
        assert_eq!(mapper.for_index(2, 3), mapper.for_index(4, 3));
        assert_eq!(mapper.for_index(0, 3), CardVisibility::new(0.92, 0.6));
        assert_eq!(mapper.for_index(3, 3).opacity, 1.0);
    }
}
