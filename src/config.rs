use crate::layout::LayoutError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyConfig {
    /// Relaxation rounds run by the depth solver.
    pub iterations: usize,
    pub width: f32,
    pub height: f32,
    /// Horizontal thickness of every node.
    pub node_width: f32,
    /// Minimum vertical gap between nodes sharing a column.
    pub node_padding: f32,
    /// Control point position for link curves, as a fraction of the span.
    pub curvature: f32,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            iterations: 32,
            width: 960.0,
            height: 500.0,
            node_width: 24.0,
            node_padding: 8.0,
            curvature: 0.5,
        }
    }
}

impl SankeyConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let sizes = [
            ("width", self.width),
            ("height", self.height),
            ("node_width", self.node_width),
            ("node_padding", self.node_padding),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.curvature) {
            return Err(LayoutError::InvalidConfig {
                field: "curvature",
                value: self.curvature,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: SankeyConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SankeyConfigFile {
    iterations: Option<usize>,
    width: Option<f32>,
    height: Option<f32>,
    node_width: Option<f32>,
    node_padding: Option<f32>,
    curvature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    sankey: Option<SankeyConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    if let Some(sankey) = parsed.sankey {
        if let Some(v) = sankey.iterations {
            config.layout.iterations = v;
        }
        if let Some(v) = sankey.width {
            config.layout.width = v;
        }
        if let Some(v) = sankey.height {
            config.layout.height = v;
        }
        if let Some(v) = sankey.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = sankey.node_padding {
            config.layout.node_padding = v;
        }
        if let Some(v) = sankey.curvature {
            config.layout.curvature = v;
        }
    }

    config.layout.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
