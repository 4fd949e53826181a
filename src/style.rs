//! Statuses and the style tables that turn them into pixels.
//!
//! Anchors and connecting lines each carry a status. The built-in statuses are
//! closed enum variants; anything else (an `error` flag after a failed
//! verification, say) is an [`ExtraStatus`] tag that must be registered when
//! the [`StyleTables`] are built. Registration checks that every built-in and
//! every extra status has a style in both tables, so lookups after
//! construction cannot miss.
//!
//! Tables deserialize from JSON: a map from status name (`"not-selected"`,
//! `"selected"`, `"normal"`, `"error"`, ...) to a style object with camelCase
//! keys. Anchor styles accept either nested circles
//! (`{"anchorCircle": {"fillColor": ...}}`) or the flat prefixed keys
//! (`{"anchorCircleFillColor": ...}`). Unknown keys are rejected, so a
//! misspelled style fails to load instead of drawing nothing.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{SHADOW_NONE_COLOR, STATUS_NORMAL, STATUS_NOT_SELECTED, STATUS_SELECTED};

/// Error returned when style tables fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// An extra status reuses a built-in status name.
    #[error("extra status `{0}` collides with a built-in status")]
    ReservedStatus(String),
    /// The same extra status was registered twice.
    #[error("extra status `{0}` registered more than once")]
    DuplicateStatus(String),
    /// No anchor style is defined for a required status.
    #[error("no anchor style defined for status `{0}`")]
    MissingAnchorStyle(String),
    /// No line style is defined for a required status.
    #[error("no line style defined for status `{0}`")]
    MissingLineStyle(String),
}

/// A caller-declared status tag, registered with [`StyleTables::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtraStatus(String);

impl ExtraStatus {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a single anchor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnchorStatus {
    #[default]
    NotSelected,
    Selected,
    Extra(ExtraStatus),
}

impl AnchorStatus {
    /// The style-table key for this status.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::NotSelected => STATUS_NOT_SELECTED,
            Self::Selected => STATUS_SELECTED,
            Self::Extra(tag) => tag.as_str(),
        }
    }
}

/// Status shared by every connecting line and arrow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineStatus {
    #[default]
    Normal,
    Extra(ExtraStatus),
}

impl LineStatus {
    /// The style-table key for this status.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Normal => STATUS_NORMAL,
            Self::Extra(tag) => tag.as_str(),
        }
    }
}

/// Whether `tag` names one of the built-in anchor or line statuses.
#[must_use]
pub fn is_builtin_status(tag: &str) -> bool {
    matches!(tag, STATUS_NOT_SELECTED | STATUS_SELECTED | STATUS_NORMAL)
}

/// Drop shadow applied to a single circle's draw calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    /// The reset value: transparent, no blur, no offset.
    #[must_use]
    pub fn none() -> Self {
        Self { color: SHADOW_NONE_COLOR.to_owned(), blur: 0.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

/// Border, fill and shadow for one of an anchor's two circles.
///
/// Every field is optional. A border needs both a non-zero width and a color;
/// a fill needs a color. With neither, the circle is not drawn at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CircleStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_offset_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_offset_y: Option<f64>,
}

impl CircleStyle {
    /// Border width and color, when both are usable.
    #[must_use]
    pub fn border(&self) -> Option<(f64, &str)> {
        match (self.border_width, self.border_color.as_deref()) {
            (Some(width), Some(color)) if width.abs() > 0.0 && !color.is_empty() => Some((width, color)),
            _ => None,
        }
    }

    /// Fill color, when present and non-empty.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        self.fill_color.as_deref().filter(|c| !c.is_empty())
    }

    /// Border width used to inset the stroke and fill radii (0 when absent).
    #[must_use]
    pub fn inset(&self) -> f64 {
        self.border_width.unwrap_or(0.0)
    }

    /// Shadow for this circle, with absent fields taken from [`Shadow::none`].
    #[must_use]
    pub fn shadow(&self) -> Shadow {
        let none = Shadow::none();
        Shadow {
            color: self.shadow_color.clone().unwrap_or(none.color),
            blur: self.shadow_blur.unwrap_or(none.blur),
            offset_x: self.shadow_offset_x.unwrap_or(none.offset_x),
            offset_y: self.shadow_offset_y.unwrap_or(none.offset_y),
        }
    }

    /// Field-wise merge: present fields of `self`, the rest from `base`.
    #[must_use]
    pub fn or(self, base: Self) -> Self {
        Self {
            border_width: self.border_width.or(base.border_width),
            border_color: self.border_color.or(base.border_color),
            fill_color: self.fill_color.or(base.fill_color),
            shadow_color: self.shadow_color.or(base.shadow_color),
            shadow_blur: self.shadow_blur.or(base.shadow_blur),
            shadow_offset_x: self.shadow_offset_x.or(base.shadow_offset_x),
            shadow_offset_y: self.shadow_offset_y.or(base.shadow_offset_y),
        }
    }

    /// Whether this circle produces any draw call.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.border().is_some() || self.fill().is_some()
    }
}

/// Visual style of an anchor in one status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "AnchorStyleWire")]
pub struct AnchorStyle {
    /// The outer circle, sized by the anchor's `anchorCircleRadius`.
    pub anchor_circle: CircleStyle,
    /// The inner circle, sized by the anchor's `centerCircleRadius`.
    pub center_circle: CircleStyle,
}

/// Accepted JSON for [`AnchorStyle`]: nested circles, flat prefixed keys, or
/// both. A flat key wins over the same nested field.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AnchorStyleWire {
    #[serde(default)]
    anchor_circle: Option<CircleStyle>,
    #[serde(default)]
    center_circle: Option<CircleStyle>,

    #[serde(default)]
    anchor_circle_border_width: Option<f64>,
    #[serde(default)]
    anchor_circle_border_color: Option<String>,
    #[serde(default)]
    anchor_circle_fill_color: Option<String>,
    #[serde(default)]
    anchor_circle_shadow_color: Option<String>,
    #[serde(default)]
    anchor_circle_shadow_blur: Option<f64>,
    #[serde(default)]
    anchor_circle_shadow_offset_x: Option<f64>,
    #[serde(default)]
    anchor_circle_shadow_offset_y: Option<f64>,

    #[serde(default)]
    center_circle_border_width: Option<f64>,
    #[serde(default)]
    center_circle_border_color: Option<String>,
    #[serde(default)]
    center_circle_fill_color: Option<String>,
    #[serde(default)]
    center_circle_shadow_color: Option<String>,
    #[serde(default)]
    center_circle_shadow_blur: Option<f64>,
    #[serde(default)]
    center_circle_shadow_offset_x: Option<f64>,
    #[serde(default)]
    center_circle_shadow_offset_y: Option<f64>,
}

impl From<AnchorStyleWire> for AnchorStyle {
    fn from(w: AnchorStyleWire) -> Self {
        let outer = CircleStyle {
            border_width: w.anchor_circle_border_width,
            border_color: w.anchor_circle_border_color,
            fill_color: w.anchor_circle_fill_color,
            shadow_color: w.anchor_circle_shadow_color,
            shadow_blur: w.anchor_circle_shadow_blur,
            shadow_offset_x: w.anchor_circle_shadow_offset_x,
            shadow_offset_y: w.anchor_circle_shadow_offset_y,
        };
        let center = CircleStyle {
            border_width: w.center_circle_border_width,
            border_color: w.center_circle_border_color,
            fill_color: w.center_circle_fill_color,
            shadow_color: w.center_circle_shadow_color,
            shadow_blur: w.center_circle_shadow_blur,
            shadow_offset_x: w.center_circle_shadow_offset_x,
            shadow_offset_y: w.center_circle_shadow_offset_y,
        };
        Self {
            anchor_circle: outer.or(w.anchor_circle.unwrap_or_default()),
            center_circle: center.or(w.center_circle.unwrap_or_default()),
        }
    }
}

/// Visual style of connecting lines and arrows in one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineStyle {
    pub line_color: String,
    pub line_width: f64,
}

/// Read-only style resolution handed to anchors and the frame composer.
pub trait StyleLookup {
    fn anchor_style(&self, status: &AnchorStatus) -> Option<&AnchorStyle>;
    fn line_style(&self, status: &LineStatus) -> Option<&LineStyle>;
}

/// Validated anchor and line style tables plus the registered extra statuses.
#[derive(Debug, Clone)]
pub struct StyleTables {
    anchor: HashMap<String, AnchorStyle>,
    line: HashMap<String, LineStyle>,
    extras: Vec<ExtraStatus>,
}

impl StyleTables {
    /// Build tables, registering `extra_statuses` as the permitted extension tags.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] when an extra status reuses a built-in name or is
    /// listed twice, or when either table lacks an entry for a built-in status
    /// (`not-selected` and `selected` for anchors, `normal` for lines) or for
    /// any registered extra status.
    pub fn new<I, T>(
        anchor: HashMap<String, AnchorStyle>,
        line: HashMap<String, LineStyle>,
        extra_statuses: I,
    ) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut extras: Vec<ExtraStatus> = Vec::new();
        for tag in extra_statuses {
            let tag = tag.into();
            if is_builtin_status(&tag) {
                return Err(StyleError::ReservedStatus(tag));
            }
            if extras.iter().any(|e| e.as_str() == tag) {
                return Err(StyleError::DuplicateStatus(tag));
            }
            extras.push(ExtraStatus::new(tag));
        }

        for key in [STATUS_NOT_SELECTED, STATUS_SELECTED] {
            if !anchor.contains_key(key) {
                return Err(StyleError::MissingAnchorStyle(key.to_owned()));
            }
        }
        if !line.contains_key(STATUS_NORMAL) {
            return Err(StyleError::MissingLineStyle(STATUS_NORMAL.to_owned()));
        }
        for extra in &extras {
            if !anchor.contains_key(extra.as_str()) {
                return Err(StyleError::MissingAnchorStyle(extra.to_string()));
            }
            if !line.contains_key(extra.as_str()) {
                return Err(StyleError::MissingLineStyle(extra.to_string()));
            }
        }

        Ok(Self { anchor, line, extras })
    }

    /// The registered extra status named `tag`, if any.
    #[must_use]
    pub fn extra(&self, tag: &str) -> Option<&ExtraStatus> {
        self.extras.iter().find(|e| e.as_str() == tag)
    }

    /// All registered extra statuses in registration order.
    #[must_use]
    pub fn extra_statuses(&self) -> &[ExtraStatus] {
        &self.extras
    }

    /// Whether an anchor style exists under `tag`.
    #[must_use]
    pub fn has_anchor_style(&self, tag: &str) -> bool {
        self.anchor.contains_key(tag)
    }

    /// Whether a line style exists under `tag`.
    #[must_use]
    pub fn has_line_style(&self, tag: &str) -> bool {
        self.line.contains_key(tag)
    }
}

impl StyleLookup for StyleTables {
    fn anchor_style(&self, status: &AnchorStatus) -> Option<&AnchorStyle> {
        self.anchor.get(status.key())
    }

    fn line_style(&self, status: &LineStatus) -> Option<&LineStyle> {
        self.line.get(status.key())
    }
}
