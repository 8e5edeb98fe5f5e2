//! Zoom level for the rendered chart.
//!
//! Zoom only scales the drawing; layout coordinates never change with it.

use serde::{Deserialize, Serialize};

use crate::error::{OrgChartError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    /// Amount added or removed by one zoom-in/zoom-out step.
    pub step: f32,
    /// Level used at start and on reset.
    pub initial: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.3,
            max: 1.5,
            step: 0.1,
            initial: 1.0,
        }
    }
}

impl ZoomConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min, self.max, self.step, self.initial]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min <= 0.0 || self.step <= 0.0 {
            return Err(OrgChartError::InvalidConfig(
                "zoom.min and zoom.step must be positive numbers".into(),
            ));
        }
        if self.max < self.min {
            return Err(OrgChartError::InvalidConfig(format!(
                "zoom.max ({}) is below zoom.min ({})",
                self.max, self.min
            )));
        }
        if !(self.min..=self.max).contains(&self.initial) {
            return Err(OrgChartError::InvalidConfig(format!(
                "zoom.initial ({}) is outside [{}, {}]",
                self.initial, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Current zoom level, always inside the configured bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    config: ZoomConfig,
    level: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl Zoom {
    pub fn new(config: ZoomConfig) -> Self {
        let level = config.initial;
        Self { config, level }
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set(self.level + self.config.step)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set(self.level - self.config.step)
    }

    pub fn reset(&mut self) -> f32 {
        self.set(self.config.initial)
    }

    /// Round to one decimal, then clamp. Returns the level actually set.
    ///
    /// Non-finite input leaves the level unchanged.
    pub fn set(&mut self, level: f32) -> f32 {
        if !level.is_finite() {
            return self.level;
        }
        let rounded = (level * 10.0).round() / 10.0;
        self.level = rounded.clamp(self.config.min, self.config.max);
        self.level
    }

    /// Convert a point on the scaled drawing back to layout coordinates.
    pub fn to_layout(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        (screen_x / self.level, screen_y / self.level)
    }
}
