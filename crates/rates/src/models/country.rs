use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RatesError;

/// Countries with a registered set of rate sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    /// Tajikistan
    Tj,
    /// Uzbekistan
    Uz,
    /// Kyrgyzstan
    Kg,
    /// Kazakhstan
    Kz,
}

impl Country {
    pub const ALL: [Country; 4] = [Self::Tj, Self::Uz, Self::Kg, Self::Kz];

    /// Lowercase selector used in configuration and source ids.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tj => "tj",
            Self::Uz => "uz",
            Self::Kg => "kg",
            Self::Kz => "kz",
        }
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = RatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selector = s.trim();
        Self::ALL
            .into_iter()
            .find(|country| country.code().eq_ignore_ascii_case(selector))
            .ok_or_else(|| RatesError::Configuration(format!("unknown country '{}'", selector)))
    }
}
