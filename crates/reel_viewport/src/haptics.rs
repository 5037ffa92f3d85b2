//! Haptic rate limiting
//!
//! After an impact plays, optional impacts are swallowed until the reset
//! timer fires. Required impacts (pull activation) always play and restart
//! the cooldown. Each impact bumps a generation so a reset scheduled for an
//! older impact cannot reopen the gate early.

use crate::config::HapticsConfig;
use crate::effects::Impact;

#[derive(Debug, Clone)]
pub struct HapticGate {
    enabled: bool,
    cooling_down: bool,
    generation: u64,
}

impl HapticGate {
    pub fn new(config: &HapticsConfig) -> Self {
        Self {
            enabled: config.enabled,
            cooling_down: false,
            generation: 0,
        }
    }

    /// Try to play an impact
    ///
    /// Returns the generation the caller should schedule a reset for, or
    /// None if the impact was swallowed.
    pub fn fire(&mut self, impact: Impact) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        if self.cooling_down {
            tracing::trace!("haptic {:?} suppressed during cooldown", impact);
            return None;
        }
        Some(self.start_cooldown())
    }

    /// Play an impact regardless of the cooldown
    ///
    /// Only a disabled gate swallows it.
    pub fn fire_required(&mut self, impact: Impact) -> Option<u64> {
        if !self.enabled {
            return None;
        }
        if self.cooling_down {
            tracing::trace!("haptic {:?} overrides cooldown", impact);
        }
        Some(self.start_cooldown())
    }

    fn start_cooldown(&mut self) -> u64 {
        self.cooling_down = true;
        self.generation += 1;
        self.generation
    }

    /// Reopen the gate if `generation` is still current
    pub fn reset(&mut self, generation: u64) -> bool {
        if !self.cooling_down || generation != self.generation {
            return false;
        }
        self.cooling_down = false;
        true
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }
}

impl Default for HapticGate {
    fn default() -> Self {
        Self::new(&HapticsConfig::default())
    }
}
