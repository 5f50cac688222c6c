//! Reprojection of a symbol's indicator series onto the master date axis.
//!
//! The series is reindexed onto the ascending master axis. Its inception is
//! the first master date carrying a value; every earlier date is absent.
//! After inception, gaps are either left alone or forward-filled according
//! to an explicit [`FillPolicy`].

use crate::domain::calendar::MasterDateAxis;
use crate::domain::series::IndicatorSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Treatment of gaps after a symbol's inception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Internal gaps stay absent.
    #[default]
    LeaveGaps,
    /// Internal gaps carry the last known value.
    ForwardFill,
}

impl FromStr for FillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "gaps" => Ok(FillPolicy::LeaveGaps),
            "forward" | "ffill" => Ok(FillPolicy::ForwardFill),
            other => Err(format!(
                "unknown fill policy {other:?} (expected none or forward)"
            )),
        }
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillPolicy::LeaveGaps => f.write_str("none"),
            FillPolicy::ForwardFill => f.write_str("forward"),
        }
    }
}

/// Values of `series` on every date of `master`, ascending.
pub fn align_to_master(
    series: &IndicatorSeries,
    master: &MasterDateAxis,
    policy: FillPolicy,
) -> Vec<Option<f64>> {
    let lookup: HashMap<NaiveDate, Option<f64>> = series
        .dates
        .iter()
        .copied()
        .zip(series.values.iter().copied())
        .collect();

    let reindexed: Vec<Option<f64>> = master
        .dates()
        .iter()
        .map(|d| lookup.get(d).copied().flatten())
        .collect();

    let Some(inception) = reindexed.iter().position(Option::is_some) else {
        return reindexed;
    };

    reindexed
        .into_iter()
        .enumerate()
        .scan(None, |last: &mut Option<f64>, (i, value)| {
            let out = if i < inception {
                None
            } else {
                match policy {
                    FillPolicy::LeaveGaps => value,
                    FillPolicy::ForwardFill => {
                        if value.is_some() {
                            *last = value;
                        }
                        *last
                    }
                }
            };
            Some(out)
        })
        .collect()
}

/// The inception date of an aligned column: first master date with a value.
pub fn inception_date(aligned: &[Option<f64>], master: &MasterDateAxis) -> Option<NaiveDate> {
    aligned
        .iter()
        .position(Option::is_some)
        .and_then(|i| master.dates().get(i).copied())
}
