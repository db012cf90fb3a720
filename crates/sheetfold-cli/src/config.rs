//! TOML configuration file.
//!
//! ```toml
//! [box]
//! size = 50.0
//! thickness = 1.0
//!
//! [post_process]
//! program = "python3"
//! args = ["to_dxf.py", "out/box_{label}.dxf"]
//!
//! [[batch]]
//! label = "000 000"
//! normal = [0.2673, 0.1397, 0.9534]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use sheetfold::{BatchItem, BoxParams, CommandPostProcessor, ViewOptions};

/// Everything a config file may hold. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Base box parameters.
    #[serde(rename = "box")]
    pub box_params: BoxParams,
    /// External program run for every batch item.
    pub post_process: Option<CommandPostProcessor>,
    /// Batch items in run order.
    pub batch: Vec<BatchItem>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// Command-line overrides of [`BoxParams`] fields.
#[derive(Debug, Clone, Default, Args)]
pub struct BoxArgs {
    /// Lid normal as x,y,z
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub normal: Option<Vec<f64>>,
    /// Lid tilt about X in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub angle_x: Option<f64>,
    /// Lid tilt about Y in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub angle_y: Option<f64>,
    /// Outer box width in mm
    #[arg(long)]
    pub size: Option<f64>,
    /// Box depth in mm
    #[arg(long)]
    pub height: Option<f64>,
    /// Sheet thickness in mm
    #[arg(long)]
    pub thickness: Option<f64>,
    /// Inside bend radius in mm
    #[arg(long)]
    pub bend_radius: Option<f64>,
    /// Neutral axis position as a fraction of the thickness
    #[arg(long)]
    pub k_factor: Option<f64>,
    /// Unfold progress from 0 (folded) to 1 (flat)
    #[arg(long)]
    pub slerp: Option<f64>,
    /// Label engraved on the north wall
    #[arg(long)]
    pub label: Option<String>,
    /// Show the folded and top-aligned renderings too
    #[arg(long)]
    pub all_views: bool,
}

impl BoxArgs {
    /// `base` with every given flag applied.
    pub fn apply(&self, base: &BoxParams) -> Result<BoxParams> {
        let mut params = base.clone();
        if let Some(normal) = &self.normal {
            let [x, y, z] = normal[..] else {
                anyhow::bail!("--normal takes three components, got {}", normal.len());
            };
            params.normal = Some([x, y, z]);
        }
        if self.angle_x.is_some() || self.angle_y.is_some() {
            params.normal = None;
        }
        let overrides = [
            (&mut params.angle_around_x, self.angle_x),
            (&mut params.angle_around_y, self.angle_y),
            (&mut params.size, self.size),
            (&mut params.height, self.height),
            (&mut params.thickness, self.thickness),
            (&mut params.bend_radius, self.bend_radius),
            (&mut params.k_factor, self.k_factor),
            (&mut params.angle_slerp, self.slerp),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(label) = &self.label {
            params.label = Some(label.clone());
        }
        if self.all_views {
            params.views = ViewOptions::all();
        }
        Ok(params)
    }
}
