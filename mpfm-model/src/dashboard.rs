use serde::{Deserialize, Serialize};

/// Latest aggregate production figures for a scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Production {
    pub ofr: f64,
    pub wfr: f64,
    pub gfr: f64,
    pub gvf: f64,
    pub wlr: f64,
}

/// `data` of `GET /hierarchy/dashboard`: the cards shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_devices: u64,
    pub online_devices: u64,
    pub offline_devices: u64,
    pub active_alarms: u64,
    pub production: Production,
}

impl DashboardSummary {
    /// Share of devices online, as a percentage (0 when there are none).
    pub fn online_ratio(&self) -> f64 {
        if self.total_devices == 0 {
            0.0
        } else {
            self.online_devices as f64 * 100.0 / self.total_devices as f64
        }
    }
}
