//! God Class rule presets.
//!
//! Two rule sets for the complexity-driven God Class check are in use: a
//! strict one that flags classes whose summed complexity exceeds 20, and a
//! lenient one at 47 (the classic WMC bound). Both also require the class to
//! be either highly coupled or poorly cohesive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GodClassPreset {
    #[default]
    Strict,
    Lenient,
}

impl GodClassPreset {
    /// Summed complexity (WMC proxy) above which the class is suspicious.
    pub fn wmc_threshold(self) -> f64 {
        match self {
            GodClassPreset::Strict => 20.0,
            GodClassPreset::Lenient => 47.0,
        }
    }

    /// LCOM above which the class counts as poorly cohesive.
    pub fn lcom_threshold(self) -> f64 {
        match self {
            GodClassPreset::Strict => 0.5,
            GodClassPreset::Lenient => 0.67,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_wmc() {
        assert_eq!(GodClassPreset::Strict.wmc_threshold(), 20.0);
        assert_eq!(GodClassPreset::Lenient.wmc_threshold(), 47.0);
        assert!(GodClassPreset::Lenient.lcom_threshold() > GodClassPreset::Strict.lcom_threshold());
    }
}
