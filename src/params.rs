//! Machining parameters of one operation.
//!
//! Parameters are plain serde data so they can live in JSON or TOML files
//! next to a project. Nothing here is global: every generation call gets
//! its parameters and stock passed in.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::Point3;
use crate::operations::clip::Stock;

/// Cutter used by the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolEntry {
    pub name: String,
    pub diameter: f64,
    pub flutes: u32,
    /// Usable flute length; bounds how deep one operation may go.
    pub cutting_depth: f64,
}

impl ToolEntry {
    /// Returns half the tool diameter.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.diameter * 0.5
    }
}

impl Default for ToolEntry {
    fn default() -> Self {
        Self {
            name: "flat end mill 6mm".to_owned(),
            diameter: 6.0,
            flutes: 2,
            cutting_depth: 25.0,
        }
    }
}

/// Milling direction relative to the spindle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutDirection {
    #[default]
    Climb,
    Conventional,
}

impl CutDirection {
    /// Whether rings travel clockwise.
    ///
    /// With a clockwise spindle, climb milling runs counter-clockwise along
    /// the walls of a pocket and clockwise around a boss.
    #[must_use]
    pub fn ring_is_cw(self, around_boss: bool) -> bool {
        match self {
            Self::Climb => around_boss,
            Self::Conventional => !around_boss,
        }
    }
}

/// How offset fragments are assigned to pockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PocketMatching {
    /// By position in the start-angle order of each offset step.
    Index,
    /// To the pocket whose seed fragment has the nearest centroid.
    #[default]
    Centroid,
}

/// Parameters of one pocketing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachiningParams {
    pub tool: ToolEntry,
    /// Radial engagement (ae) between neighbouring rings.
    pub cut_width: f64,
    /// Axial engagement (ap) per level.
    pub cut_depth: f64,
    /// Allowance left on walls and floor.
    pub offset: f64,
    pub final_depth: f64,
    pub direction: CutDirection,
    /// Translation applied to every emitted workstep.
    pub fixture_origin: Point3,
    /// Retract height above the stock top.
    pub safe_z: f64,
    /// Distance kept between rapid moves and the stock outline.
    pub safety_margin: f64,
    /// Extra clearance per pass so rapid corridors do not coincide.
    pub corridor_step: f64,
    pub max_rings: usize,
    pub pocket_matching: PocketMatching,
    /// Group rings into pockets; otherwise cut fragments level by level.
    pub want_pockets: bool,
}

impl Default for MachiningParams {
    fn default() -> Self {
        Self {
            tool: ToolEntry::default(),
            cut_width: 3.0,
            cut_depth: 2.0,
            offset: 0.0,
            final_depth: -5.0,
            direction: CutDirection::Climb,
            fixture_origin: Point3::origin(),
            safe_z: 5.0,
            safety_margin: 1.0,
            corridor_step: 0.5,
            max_rings: 200,
            pocket_matching: PocketMatching::Centroid,
            want_pockets: true,
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

impl MachiningParams {
    /// Returns the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance of the first ring from the boundary.
    #[must_use]
    pub fn first_offset(&self) -> f64 {
        self.offset + self.tool.radius()
    }

    /// Lowest height this operation cuts at.
    #[must_use]
    pub fn last_level(&self, stock: &Stock) -> f64 {
        (stock.top_z - self.tool.cutting_depth).max(self.final_depth + self.offset)
    }

    /// Cutting heights from just below the top face down to the last level.
    #[must_use]
    pub fn levels(&self, stock: &Stock) -> Vec<f64> {
        let last = self.last_level(stock);
        let mut levels = Vec::new();
        let mut z = stock.top_z - self.cut_depth;
        while z > last + crate::math::EPSILON {
            levels.push(z);
            z -= self.cut_depth;
        }
        if last < stock.top_z {
            levels.push(last);
        }
        levels
    }

    /// Checks values that make generation meaningless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.tool.diameter <= 0.0 {
            return Err(invalid("tool.diameter", "must be > 0").into());
        }
        if self.tool.cutting_depth <= 0.0 {
            return Err(invalid("tool.cutting_depth", "must be > 0").into());
        }
        if self.cut_width <= 0.0 {
            return Err(invalid("cut_width", "must be > 0").into());
        }
        if self.cut_depth <= 0.0 {
            return Err(invalid("cut_depth", "must be > 0").into());
        }
        if self.offset < 0.0 {
            return Err(invalid("offset", "must not be negative").into());
        }
        if self.safe_z < 0.0 {
            return Err(invalid("safe_z", "must not be negative").into());
        }
        if self.max_rings == 0 {
            return Err(invalid("max_rings", "must be > 0").into());
        }
        Ok(())
    }

    /// Validates and checks the depth range against the stock.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when a parameter is out of range or the
    /// final depth lies above the stock top.
    pub fn validate_for(&self, stock: &Stock) -> Result<()> {
        self.validate()?;
        if self.final_depth >= stock.top_z {
            return Err(invalid(
                "final_depth",
                format!("{} is not below the stock top {}", self.final_depth, stock.top_z),
            )
            .into());
        }
        Ok(())
    }

    /// Loads parameters from a `.json` or `.toml` file and validates them.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the file cannot be read, parsed or
    /// validated.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        let params: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content).map_err(ConfigError::from)?,
            Some("toml") => toml::from_str(&content).map_err(ConfigError::from)?,
            _ => return Err(ConfigError::UnknownFormat(path.display().to_string()).into()),
        };
        params.validate()?;
        Ok(params)
    }

    /// Writes parameters as pretty JSON or TOML, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when validation, serialization or the write
    /// fails.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self).map_err(ConfigError::from)?,
            Some("toml") => toml::to_string_pretty(self).map_err(ConfigError::from)?,
            _ => return Err(ConfigError::UnknownFormat(path.display().to_string()).into()),
        };
        std::fs::write(path, content).map_err(ConfigError::from)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::MillpathError;

    fn stock() -> Stock {
        Stock::block(Point3::new(-50.0, -30.0, -20.0), Point3::new(50.0, 30.0, 0.0))
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("millpath-{}-{name}", std::process::id()))
    }

    #[test]
    fn levels_step_down_to_final_depth() {
        let params = MachiningParams {
            cut_depth: 5.0,
            final_depth: -10.0,
            ..MachiningParams::default()
        };
        let levels = params.levels(&stock());
        assert_eq!(levels.len(), 2);
        assert_relative_eq!(levels[0], -5.0);
        assert_relative_eq!(levels[1], -10.0);
    }

    #[test]
    fn levels_end_at_partial_step() {
        let params = MachiningParams {
            cut_depth: 4.0,
            final_depth: -10.0,
            offset: 0.5,
            ..MachiningParams::default()
        };
        assert_eq!(params.levels(&stock()), vec![-4.0, -8.0, -9.5]);
    }

    #[test]
    fn short_tool_limits_depth() {
        let mut params = MachiningParams {
            cut_depth: 5.0,
            final_depth: -18.0,
            ..MachiningParams::default()
        };
        params.tool.cutting_depth = 12.0;
        assert_eq!(params.levels(&stock()), vec![-5.0, -10.0, -12.0]);
    }

    #[test]
    fn climb_direction_depends_on_side() {
        assert!(!CutDirection::Climb.ring_is_cw(false));
        assert!(CutDirection::Climb.ring_is_cw(true));
        assert!(CutDirection::Conventional.ring_is_cw(false));
    }

    #[test]
    fn validation_names_parameter() {
        let params = MachiningParams {
            cut_width: 0.0,
            ..MachiningParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            MillpathError::Config(ConfigError::Invalid { name: "cut_width", .. })
        ));

        let above = MachiningParams {
            final_depth: 1.0,
            ..MachiningParams::default()
        };
        assert!(above.validate().is_ok());
        assert!(above.validate_for(&stock()).is_err());
    }

    #[test]
    fn tool_without_flute_length_is_rejected() {
        let mut params = MachiningParams::default();
        params.tool.cutting_depth = 0.0;
        let err = params.validate_for(&stock()).unwrap_err();
        assert!(matches!(
            err,
            MillpathError::Config(ConfigError::Invalid {
                name: "tool.cutting_depth",
                ..
            })
        ));
    }

    #[test]
    fn json_round_trip_through_file() {
        let path = temp_path("params.json");
        let params = MachiningParams {
            cut_width: 4.5,
            pocket_matching: PocketMatching::Index,
            ..MachiningParams::default()
        };
        params.save_to_file(&path).unwrap();
        let loaded = MachiningParams::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let path = temp_path("partial.toml");
        let text = "cut_width = 2.0\ndirection = \"conventional\"\n\n[tool]\ndiameter = 8.0\n";
        std::fs::write(&path, text).unwrap();
        let loaded = MachiningParams::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_relative_eq!(loaded.cut_width, 2.0);
        assert_relative_eq!(loaded.tool.diameter, 8.0);
        assert_eq!(loaded.tool.flutes, 2);
        assert_eq!(loaded.direction, CutDirection::Conventional);
        assert_eq!(loaded.max_rings, 200);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = MachiningParams::load_from_file(Path::new("params.yaml")).unwrap_err();
        assert!(matches!(
            err,
            MillpathError::Config(ConfigError::Io(_) | ConfigError::UnknownFormat(_))
        ));
    }
}
