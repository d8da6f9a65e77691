//! Isotopically labeled elements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element carrying an isotope label in a tracer.
///
/// Variant order is the element order used for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabeledElement {
    C,
    N,
    H,
    O,
    S,
}

impl LabeledElement {
    pub const ALL: [LabeledElement; 5] = [Self::C, Self::N, Self::H, Self::O, Self::S];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::N => "N",
            Self::H => "H",
            Self::O => "O",
            Self::S => "S",
        }
    }
}

impl fmt::Display for LabeledElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported labeled element: '{0}'")]
pub struct ElementParseError(pub String);

impl FromStr for LabeledElement {
    type Err = ElementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.symbol() == trimmed)
            .ok_or_else(|| ElementParseError(s.to_string()))
    }
}
