//! Steady-state validity of a serum sample's FCirc values.
//!
//! FCirc is computed for every serum sample regardless; these checks only
//! say whether the steady-state assumption behind it is plausible.

use std::fmt;
use tb_core::units::{Time, as_minutes};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidityIssue {
    TimeCollectedUnknown,
    NotLastSerumSample,
    BelowSteadyStateTime {
        time_collected_min: f64,
        threshold_min: f64,
    },
}

impl fmt::Display for ValidityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeCollectedUnknown => write!(f, "serum sample time collected is unknown"),
            Self::NotLastSerumSample => {
                write!(f, "a later serum sample exists for this animal")
            }
            Self::BelowSteadyStateTime {
                time_collected_min,
                threshold_min,
            } => write!(
                f,
                "collected at {time_collected_min} min, before the {threshold_min} min steady-state threshold"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SerumValidity {
    /// Last-collected serum sample of its animal.
    pub is_last: bool,
    pub issues: Vec<ValidityIssue>,
}

impl SerumValidity {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Assess one serum sample against the other serum samples of the same animal.
///
/// `peer_times` excludes the sample itself. Samples tied for the latest time
/// are all considered last.
pub fn assess_serum_validity(
    time_collected: Option<Time>,
    peer_times: &[Option<Time>],
    steady_state_threshold: Time,
) -> SerumValidity {
    let mut issues = Vec::new();

    let is_last = match time_collected {
        Some(t) => !peer_times.iter().flatten().any(|peer| *peer > t),
        None => peer_times.is_empty(),
    };

    match time_collected {
        None => issues.push(ValidityIssue::TimeCollectedUnknown),
        Some(t) if t < steady_state_threshold => {
            issues.push(ValidityIssue::BelowSteadyStateTime {
                time_collected_min: as_minutes(t),
                threshold_min: as_minutes(steady_state_threshold),
            })
        }
        Some(_) => {}
    }

    if !is_last {
        issues.push(ValidityIssue::NotLastSerumSample);
    }

    SerumValidity { is_last, issues }
}
