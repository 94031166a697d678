//! Layout configuration and canvas extent.
//!
//! [`LayoutConfig`] fixes the box dimensions and spacing the layout engine
//! works with. All fields have defaults, so a partial JSON config only
//! overrides the keys it names.

use serde::{Deserialize, Serialize};

/// Whether deleting a node may pull downstream stages left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompactionPolicy {
    /// Coordinates of surviving nodes never move on delete.
    #[default]
    Never,
    /// Reclaim the stage freed by a deleted serial node when it is safe.
    FreedStage,
}

/// Dimensions and spacing used by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Approver box width (px).
    pub node_width: f64,
    /// Approver box height (px).
    pub node_height: f64,
    /// Spacing between stages/rows as a multiple of the box size.
    pub path_multiplier: f64,
    /// Position of the start node.
    pub start_x: f64,
    pub start_y: f64,
    /// Canvas extent of a fresh document.
    pub initial_width: f64,
    pub initial_height: f64,
    pub compaction: CompactionPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: 230.0,
            node_height: 100.0,
            path_multiplier: 1.5,
            start_x: 100.0,
            start_y: 100.0,
            initial_width: 900.0,
            initial_height: 400.0,
            compaction: CompactionPolicy::Never,
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between adjacent stages.
    pub fn stage_width(&self) -> f64 {
        self.node_width * self.path_multiplier
    }

    /// Vertical distance between adjacent rows.
    pub fn row_height(&self) -> f64 {
        self.node_height * self.path_multiplier
    }

    /// The extent a fresh document starts with.
    pub fn initial_canvas(&self) -> Canvas {
        Canvas {
            width: self.initial_width,
            height: self.initial_height,
        }
    }
}

/// The scrollable extent of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}
