//! Hierarchy, device, alarm and chart endpoints.

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use mpfm_model::alarm::{Alarm, AlarmStatus, AlarmsResponse};
use mpfm_model::dashboard::DashboardSummary;
use mpfm_model::device::{Device, DevicesResponse};
use mpfm_model::flow::{FlowSeries, TimeRange};
use mpfm_model::hierarchy::{Hierarchy, HierarchyNode};
use mpfm_model::pagination::PageRequest;
use reqwest::Method;
use serde::{Deserialize, Serialize};

type QueryPairs = Vec<(&'static str, String)>;

fn page_pairs(page: PageRequest, pairs: &mut QueryPairs) {
    pairs.push(("page", page.page.to_string()));
    pairs.push(("limit", page.limit.to_string()));
}

/// Filters of `GET /devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceQuery {
    pub hierarchy_id: Option<String>,
    pub search: Option<String>,
    pub page: PageRequest,
}

impl DeviceQuery {
    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        page_pairs(self.page, &mut pairs);
        if let Some(id) = &self.hierarchy_id {
            pairs.push(("hierarchyId", id.clone()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Filters of `GET /alarms`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmQuery {
    pub hierarchy_id: Option<String>,
    pub device_id: Option<String>,
    pub status: Option<AlarmStatus>,
    pub page: PageRequest,
}

impl AlarmQuery {
    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        page_pairs(self.page, &mut pairs);
        if let Some(id) = &self.hierarchy_id {
            pairs.push(("hierarchyId", id.clone()));
        }
        if let Some(id) = &self.device_id {
            pairs.push(("deviceId", id.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// `/hierarchy/{id}/devices` answers a device page or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceList {
    Page(DevicesResponse),
    Bare(Vec<Device>),
}

/// Tree endpoints answer the roots or `{ tree }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeResponse {
    Wrapped { tree: Vec<HierarchyNode> },
    Bare(Vec<HierarchyNode>),
}

#[derive(Serialize)]
struct StatusUpdate {
    status: AlarmStatus,
}

impl ApiClient {
    fn require_token(&self) -> Result<()> {
        match self.token() {
            Some(_) => Ok(()),
            None => Err(ApiError::NotAuthenticated),
        }
    }

    /// Root nodes of the hierarchy as sent by the server.
    pub async fn hierarchy_tree(&self) -> Result<Vec<HierarchyNode>> {
        self.require_token()?;
        let tree: TreeResponse = self.get(&["hierarchy", "tree"], &[]).await?;
        let roots = match tree {
            TreeResponse::Wrapped { tree } | TreeResponse::Bare(tree) => tree,
        };
        log::info!("Loaded hierarchy with {} root(s)", roots.len());
        Ok(roots)
    }

    /// The hierarchy, indexed for rendering and lookups.
    pub async fn hierarchy(&self) -> Result<Hierarchy> {
        let roots = self.hierarchy_tree().await?;
        Ok(Hierarchy::from_roots(roots)?)
    }

    /// Aggregates for the whole company or one node's subtree.
    pub async fn dashboard_summary(&self, hierarchy_id: Option<&str>) -> Result<DashboardSummary> {
        self.require_token()?;
        let query: QueryPairs = hierarchy_id
            .map(|id| vec![("hierarchyId", id.to_string())])
            .unwrap_or_default();
        self.get(&["hierarchy", "dashboard"], &query).await
    }

    /// Devices attached anywhere under `hierarchy_id`.
    pub async fn hierarchy_devices(&self, hierarchy_id: &str) -> Result<Vec<Device>> {
        self.require_token()?;
        let list: DeviceList = self.get(&["hierarchy", hierarchy_id, "devices"], &[]).await?;
        Ok(match list {
            DeviceList::Page(page) => page.devices,
            DeviceList::Bare(devices) => devices,
        })
    }

    pub async fn devices(&self, query: &DeviceQuery) -> Result<DevicesResponse> {
        self.require_token()?;
        self.get(&["devices"], &query.query_pairs()).await
    }

    /// Every device matching `hierarchy_id`, following the pages of
    /// `GET /devices` `page_size` devices at a time.
    pub async fn all_devices(&self, hierarchy_id: Option<&str>, page_size: u32) -> Result<Vec<Device>> {
        let mut query = DeviceQuery {
            hierarchy_id: hierarchy_id.map(str::to_string),
            search: None,
            page: PageRequest {
                page: 1,
                limit: page_size.max(1),
            },
        };
        let mut devices = Vec::new();
        loop {
            let response = self.devices(&query).await?;
            let fetched = response.devices.len();
            devices.extend(response.devices);
            if fetched == 0 || query.page.page >= response.pagination.total_pages {
                break;
            }
            query.page.page += 1;
        }
        log::debug!("Fetched {} devices in {} page(s)", devices.len(), query.page.page);
        Ok(devices)
    }

    pub async fn alarms(&self, query: &AlarmQuery) -> Result<AlarmsResponse> {
        self.require_token()?;
        self.get(&["alarms"], &query.query_pairs()).await
    }

    /// Acknowledge or resolve an alarm. Returns the updated alarm when the
    /// server sends it back.
    pub async fn update_alarm_status(
        &self,
        alarm_id: &str,
        status: AlarmStatus,
    ) -> Result<Option<Alarm>> {
        self.require_token()?;
        log::info!("Setting alarm {} to {}", alarm_id, status);
        self.send(
            Method::PATCH,
            &["alarms", alarm_id, "status"],
            &StatusUpdate { status },
        )
        .await
    }

    pub async fn device_chart(&self, device_id: &str, range: TimeRange) -> Result<FlowSeries> {
        self.require_token()?;
        let query = vec![("timeRange", range.as_str().to_string())];
        self.get(&["charts", "device", device_id], &query).await
    }

    pub async fn hierarchy_chart(&self, hierarchy_id: &str, range: TimeRange) -> Result<FlowSeries> {
        self.require_token()?;
        let query = vec![("timeRange", range.as_str().to_string())];
        self.get(&["charts", "hierarchy", hierarchy_id], &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_query_pairs() {
        let query = DeviceQuery {
            hierarchy_id: Some("17".into()),
            search: Some("  ".into()),
            page: PageRequest { page: 2, limit: 25 },
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "25".to_string()),
                ("hierarchyId", "17".to_string()),
            ]
        );
    }

    #[test]
    fn alarm_query_pairs() {
        let query = AlarmQuery {
            device_id: Some("d1".into()),
            status: Some(AlarmStatus::Active),
            ..AlarmQuery::default()
        };
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("deviceId", "d1".to_string())));
        assert!(pairs.contains(&("status", "active".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "hierarchyId"));
    }

    #[test]
    fn tree_and_device_list_shapes() {
        let bare: TreeResponse =
            serde_json::from_str(r#"[{"id": 1, "name": "Acme", "level": "company"}]"#).unwrap();
        let wrapped: TreeResponse =
            serde_json::from_str(r#"{"tree": [{"id": "1", "name": "Acme", "level": "Company"}]}"#)
                .unwrap();
        for tree in [bare, wrapped] {
            let roots = match tree {
                TreeResponse::Wrapped { tree } | TreeResponse::Bare(tree) => tree,
            };
            assert_eq!(roots[0].id, "1");
        }

        let list: DeviceList =
            serde_json::from_str(r#"{"devices": [{"id": 5, "serialNumber": "SN5"}]}"#).unwrap();
        assert!(matches!(list, DeviceList::Page(page) if page.devices.len() == 1));
    }

    #[test]
    fn status_update_body() {
        let body = serde_json::to_value(StatusUpdate {
            status: AlarmStatus::Acknowledged,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "acknowledged"}));
    }
}
