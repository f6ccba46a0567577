//! Everything the main panel shows for one scope, fetched together on each
//! poll tick.

use mpfm_api::{AlarmQuery, ApiClient, ApiError, DeviceQuery};
use mpfm_model::alarm::AlarmsResponse;
use mpfm_model::dashboard::DashboardSummary;
use mpfm_model::device::DevicesResponse;
use mpfm_model::flow::{FlowSeries, TimeRange};
use mpfm_model::pagination::PageRequest;
use mpfm_view::ScopeFilter;

/// Inputs that define what the panel shows. A change retires in-flight polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewScope {
    pub filter: ScopeFilter,
    pub range: TimeRange,
    pub page: u32,
}

impl ViewScope {
    pub fn device_query(&self) -> DeviceQuery {
        DeviceQuery {
            hierarchy_id: self.filter.hierarchy_id.clone(),
            search: None,
            page: PageRequest {
                page: self.page.max(1),
                ..PageRequest::default()
            },
        }
    }

    pub fn alarm_query(&self) -> AlarmQuery {
        AlarmQuery {
            hierarchy_id: self.filter.hierarchy_id.clone(),
            device_id: self.filter.device_id.clone(),
            ..AlarmQuery::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub summary: DashboardSummary,
    pub devices: DevicesResponse,
    pub alarms: AlarmsResponse,
    /// Absent when nothing is selected
    pub chart: Option<FlowSeries>,
}

/// Fetch one snapshot for `scope`. Any failing request fails the snapshot.
pub async fn fetch_snapshot(client: &ApiClient, scope: &ViewScope) -> Result<Snapshot, ApiError> {
    let summary = client
        .dashboard_summary(scope.filter.hierarchy_id.as_deref())
        .await?;
    let devices = client.devices(&scope.device_query()).await?;
    let alarms = client.alarms(&scope.alarm_query()).await?;
    let chart = match (&scope.filter.device_id, &scope.filter.hierarchy_id) {
        (Some(device), _) => Some(client.device_chart(device, scope.range).await?),
        (None, Some(node)) => Some(client.hierarchy_chart(node, scope.range).await?),
        (None, None) => None,
    };
    Ok(Snapshot {
        summary,
        devices,
        alarms,
        chart,
    })
}
