//! Viewport configuration
//!
//! Every tunable of the controller lives here, grouped by component. All
//! sections are optional in a config file; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [header]
//! collapse_distance = 60.0
//! header_height = 44.0
//! easing = "smoothstep"
//!
//! [pull]
//! max_pull = 100.0
//! drag_elasticity = 0.6
//! activation_ratio = 0.8
//!
//! [timing]
//! refresh_delay = 1.0
//! ```

use std::fs;
use std::path::Path;

use reel_animation::{Easing, SpringConfig};
use serde::{Deserialize, Serialize};

use crate::effects::Impact;
use crate::error::{ConfigError, Result};
use crate::visibility::CardVisibility;

/// Top-level viewport configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub header: HeaderConfig,
    pub resolver: ResolverConfig,
    pub visibility: VisibilityConfig,
    pub pull: PullConfig,
    pub timing: TimingConfig,
    pub haptics: HapticsConfig,
}

/// Collapsing header
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Scroll distance over which the header fully collapses
    pub collapse_distance: f32,
    /// Height the header slides up by when collapsed
    pub header_height: f32,
    pub easing: Easing,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            collapse_distance: 60.0,
            header_height: 44.0,
            easing: Easing::Smoothstep,
        }
    }
}

/// Active card resolution
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reports closer than this to the stored value are layout noise
    pub jitter_tolerance: f32,
    /// Initial viewport center, until the host supplies its geometry
    pub viewport_center_y: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            jitter_tolerance: 1.0,
            viewport_center_y: 0.0,
        }
    }
}

/// Scale/opacity tiers by distance from the active card
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub active: CardVisibility,
    pub adjacent: CardVisibility,
    pub distant: CardVisibility,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            active: CardVisibility::new(1.0, 1.0),
            adjacent: CardVisibility::new(0.96, 0.8),
            distant: CardVisibility::new(0.92, 0.6),
        }
    }
}

/// Pull-to-search gesture
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PullConfig {
    /// Upper bound of the pull distance
    pub max_pull: f32,
    /// Damping applied to drag translation
    pub drag_elasticity: f32,
    /// Fraction of `max_pull` that activates search on release
    pub activation_ratio: f32,
    /// Scroll offsets at or below this count as "at the top"
    pub top_tolerance: f32,
    /// Spring used to animate the indicator back to zero
    pub snap_back: SpringConfig,
}

impl PullConfig {
    /// Pull distance at which a release activates search
    pub fn activation_distance(&self) -> f32 {
        self.max_pull * self.activation_ratio
    }
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            max_pull: 100.0,
            drag_elasticity: 0.6,
            activation_ratio: 0.8,
            top_tolerance: 1.0,
            snap_back: SpringConfig::critically_damped(400.0, 1.0),
        }
    }
}

/// Delays of scheduled callbacks, in seconds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time a refresh stays in flight before it is reported finished
    pub refresh_delay: f32,
    /// Input stays disabled this long after an animated transition
    pub input_reenable_delay: f32,
    /// Minimum spacing between two haptic impacts
    pub haptic_reset: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_delay: 1.0,
            input_reenable_delay: 0.3,
            haptic_reset: 0.3,
        }
    }
}

/// Haptic feedback
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
    /// Impact played when a pull activates search
    pub activation_impact: Impact,
    /// Impact played when a pull first crosses the threshold mid-gesture
    pub arm_impact: Option<Impact>,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_impact: Impact::Medium,
            arm_impact: None,
        }
    }
}

impl ViewportConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("loaded viewport config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ViewportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        positive("header.collapse_distance", self.header.collapse_distance)?;
        non_negative("header.header_height", self.header.header_height)?;
        non_negative("resolver.jitter_tolerance", self.resolver.jitter_tolerance)?;
        finite("resolver.viewport_center_y", self.resolver.viewport_center_y)?;

        for (field, tier) in [
            ("visibility.active", self.visibility.active),
            ("visibility.adjacent", self.visibility.adjacent),
            ("visibility.distant", self.visibility.distant),
        ] {
            non_negative(field, tier.scale)?;
            if !(0.0..=1.0).contains(&tier.opacity) {
                return Err(ConfigError::invalid(field, "opacity must be within 0.0..=1.0"));
            }
        }

        positive("pull.max_pull", self.pull.max_pull)?;
        positive("pull.drag_elasticity", self.pull.drag_elasticity)?;
        if !(self.pull.activation_ratio > 0.0 && self.pull.activation_ratio <= 1.0) {
            return Err(ConfigError::invalid(
                "pull.activation_ratio",
                "must be within (0.0, 1.0]",
            ));
        }
        non_negative("pull.top_tolerance", self.pull.top_tolerance)?;
        positive("pull.snap_back.stiffness", self.pull.snap_back.stiffness)?;
        non_negative("pull.snap_back.damping", self.pull.snap_back.damping)?;
        positive("pull.snap_back.mass", self.pull.snap_back.mass)?;

        non_negative("timing.refresh_delay", self.timing.refresh_delay)?;
        non_negative("timing.input_reenable_delay", self.timing.input_reenable_delay)?;
        non_negative("timing.haptic_reset", self.timing.haptic_reset)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not finite")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be > 0")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be >= 0")))
    }
}
