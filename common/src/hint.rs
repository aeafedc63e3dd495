//! Hint selectors: which client ecosystems get example snippets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintLanguage {
    Python,
    R,
}

impl std::str::FromStr for HintLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "r" => Ok(Self::R),
            other => Err(format!("unknown hint language: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HintPackage {
    #[serde(rename = "pystac-client")]
    PystacClient,
    #[serde(rename = "python-cmr")]
    PythonCmr,
    #[serde(rename = "earthaccess")]
    Earthaccess,
    #[serde(rename = "rstac")]
    Rstac,
}

impl HintPackage {
    pub fn language(&self) -> HintLanguage {
        match self {
            Self::PystacClient | Self::PythonCmr | Self::Earthaccess => HintLanguage::Python,
            Self::Rstac => HintLanguage::R,
        }
    }
}
