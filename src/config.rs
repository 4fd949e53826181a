//! Behavior configuration: arrows, line z-order, auto-select and repeat-select.
//!
//! [`Config`] is the resolved value the engine reads. Hosts never build it
//! field by field; they pass a sparse [`ConfigOverrides`] that is layered onto
//! the defaults at construction and optionally again at resize.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ARROW_DISTANCE, DEFAULT_ARROW_SIZE};

/// Arrowhead settings shared by every connected pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowConfig {
    /// Draw arrowheads on connecting lines.
    pub show: bool,
    /// Radius of the auxiliary circle shaping the arrowhead.
    pub size: f64,
    /// Offset of the arrowhead from the starting anchor's center.
    pub distance: f64,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self { show: true, size: DEFAULT_ARROW_SIZE, distance: DEFAULT_ARROW_DISTANCE }
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arrow: ArrowConfig,
    /// Draw connecting lines above anchors instead of beneath them.
    #[serde(rename = "isLineCoverAnchor")]
    pub line_cover_anchor: bool,
    /// Select anchors crossed by the straight segment between two selections.
    #[serde(rename = "isLineAutoSelect")]
    pub line_auto_select: bool,
    /// Allow an anchor to appear more than once (never twice in a row).
    #[serde(rename = "isAnchorRepeatSelect")]
    pub anchor_repeat_select: bool,
}

impl Config {
    /// Defaults with `overrides` applied.
    #[must_use]
    pub fn with_overrides(overrides: &ConfigOverrides) -> Self {
        let mut config = Self::default();
        overrides.apply(&mut config);
        config
    }
}

/// Sparse arrow update. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrowOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Sparse configuration update. Only present fields are applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowOverrides>,
    #[serde(default, rename = "isLineCoverAnchor", skip_serializing_if = "Option::is_none")]
    pub line_cover_anchor: Option<bool>,
    #[serde(default, rename = "isLineAutoSelect", skip_serializing_if = "Option::is_none")]
    pub line_auto_select: Option<bool>,
    #[serde(default, rename = "isAnchorRepeatSelect", skip_serializing_if = "Option::is_none")]
    pub anchor_repeat_select: Option<bool>,
}

impl ConfigOverrides {
    /// Merge the present fields into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(arrow) = self.arrow {
            if let Some(show) = arrow.show {
                config.arrow.show = show;
            }
            if let Some(size) = arrow.size {
                config.arrow.size = size;
            }
            if let Some(distance) = arrow.distance {
                config.arrow.distance = distance;
            }
        }
        if let Some(v) = self.line_cover_anchor {
            config.line_cover_anchor = v;
        }
        if let Some(v) = self.line_auto_select {
            config.line_auto_select = v;
        }
        if let Some(v) = self.anchor_repeat_select {
            config.anchor_repeat_select = v;
        }
    }
}
