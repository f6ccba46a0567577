//! Flow-rate time series returned by the chart endpoints.

use crate::error::ParseEnumError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window of history requested from `/charts/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Hour,
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Hour => "hour",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Hour => "Last hour",
            TimeRange::Day => "Last 24 hours",
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            TimeRange::Hour => Duration::hours(1),
            TimeRange::Day => Duration::days(1),
            TimeRange::Week => Duration::days(7),
            TimeRange::Month => Duration::days(30),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("time range", s))
    }
}

/// One sample of multiphase flow measurements.
///
/// Rates are in barrels per day for oil and water and in standard cubic feet
/// per day for gas; GVF and WLR are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub ofr: f64,
    #[serde(default)]
    pub wfr: f64,
    #[serde(default)]
    pub gfr: f64,
    #[serde(default)]
    pub gvf: f64,
    #[serde(default)]
    pub wlr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// `data` of `GET /charts/device/{id}` and `GET /charts/hierarchy/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowSeries {
    pub points: Vec<FlowPoint>,
}

impl FlowSeries {
    pub fn latest(&self) -> Option<&FlowPoint> {
        self.points.iter().max_by_key(|p| p.timestamp)
    }

    /// Points whose timestamp lies within `range` before `now`.
    pub fn within(&self, range: TimeRange, now: DateTime<Utc>) -> Vec<&FlowPoint> {
        let start = now - range.duration();
        self.points
            .iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= now)
            .collect()
    }
}
