//! Layout configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Minimum horizontal gap between neighboring subtrees. Families also reserve two of these
    /// between their parents' labels.
    pub hmargin: f64,
    /// Vertical distance per generation, added to the tallest label height of the branch.
    pub node_height: f64,
    /// Offset of the first branch from the page origin, on both axes.
    pub page_margin: f64,
    /// Gap between consecutive branches, as a multiple of `hmargin`.
    pub branch_gap_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hmargin: 20.0,
            node_height: 50.0,
            page_margin: 100.0,
            branch_gap_factor: 10.0,
        }
    }
}

impl LayoutConfig {
    /// Parses a (possibly partial) JSON object; missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("hmargin", self.hmargin),
            ("nodeHeight", self.node_height),
            ("pageMargin", self.page_margin),
            ("branchGapFactor", self.branch_gap_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a finite, non-negative number (got {value})"),
                });
            }
        }
        Ok(())
    }

    /// Horizontal distance inserted between two consecutive branches.
    pub fn branch_gap(&self) -> f64 {
        self.hmargin * self.branch_gap_factor
    }
}
