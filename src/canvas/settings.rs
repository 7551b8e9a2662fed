use crate::diagram::LayoutType;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default graph id handed to the rendering surface.
pub const DEFAULT_GRAPH_ID: &str = "g1";

/// Default padding, in pixels, used when fitting the graph to the viewport.
pub const DEFAULT_FIT_PADDING: u32 = 80;

/// Canvas configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasSettings {
    pub layout: LayoutType,
    pub graph_id: String,
    pub fit_padding: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            layout: LayoutType::default(),
            graph_id: DEFAULT_GRAPH_ID.to_string(),
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

impl CanvasSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
