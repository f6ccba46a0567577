use crate::error::ParseEnumError;
use crate::pagination::Pagination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSeverity {
    #[serde(alias = "Critical", alias = "CRITICAL")]
    Critical,
    #[serde(alias = "Major", alias = "MAJOR")]
    Major,
    #[serde(alias = "Minor", alias = "MINOR")]
    Minor,
    #[serde(alias = "Warning", alias = "WARNING")]
    Warning,
}

impl AlarmSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlarmSeverity::Critical => "critical",
            AlarmSeverity::Major => "major",
            AlarmSeverity::Minor => "minor",
            AlarmSeverity::Warning => "warning",
        }
    }

    /// Badge colour for the alarm list.
    pub fn color(self) -> &'static str {
        match self {
            AlarmSeverity::Critical => "#C62828",
            AlarmSeverity::Major => "#EF6C00",
            AlarmSeverity::Minor => "#F9A825",
            AlarmSeverity::Warning => "#1565C0",
        }
    }
}

impl fmt::Display for AlarmSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an alarm. Only these values are accepted by
/// `PATCH /alarms/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    #[serde(alias = "Active", alias = "ACTIVE")]
    Active,
    #[serde(alias = "Acknowledged", alias = "ACKNOWLEDGED")]
    Acknowledged,
    #[serde(alias = "Resolved", alias = "RESOLVED")]
    Resolved,
}

impl AlarmStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlarmStatus::Active => "active",
            AlarmStatus::Acknowledged => "acknowledged",
            AlarmStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AlarmStatus::Active),
            "acknowledged" | "ack" => Ok(AlarmStatus::Acknowledged),
            "resolved" => Ok(AlarmStatus::Resolved),
            _ => Err(ParseEnumError::new("alarm status", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    #[serde(deserialize_with = "crate::de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::de::opt_id")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_serial: Option<String>,
    pub severity: AlarmSeverity,
    pub status: AlarmStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Alarm {
    pub fn is_active(&self) -> bool {
        self.status == AlarmStatus::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmStatistics {
    pub total: u64,
    pub active: u64,
    pub acknowledged: u64,
    pub resolved: u64,
}

/// `data` of `GET /alarms`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmsResponse {
    pub alarms: Vec<Alarm>,
    pub statistics: AlarmStatistics,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_alarm_list() {
        let json = r#"{
            "alarms": [{
                "id": "a-1", "deviceId": 3, "severity": "Critical",
                "status": "active", "message": "GVF above threshold",
                "createdAt": "2024-05-01T08:30:00Z"
            }],
            "statistics": {"total": 4, "active": 1}
        }"#;
        let response: AlarmsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.alarms.len(), 1);
        let alarm = &response.alarms[0];
        assert_eq!(alarm.device_id.as_deref(), Some("3"));
        assert_eq!(alarm.severity, AlarmSeverity::Critical);
        assert!(alarm.is_active());
        assert_eq!(response.statistics.total, 4);
        assert_eq!(response.statistics.resolved, 0);
    }

    #[test]
    fn alarm_status_from_str() {
        assert_eq!("Ack".parse::<AlarmStatus>().unwrap(), AlarmStatus::Acknowledged);
        assert_eq!("resolved".parse::<AlarmStatus>().unwrap(), AlarmStatus::Resolved);
        assert!("closed".parse::<AlarmStatus>().is_err());
    }

    #[test]
    fn severity_orders_critical_first() {
        let mut severities = vec![
            AlarmSeverity::Warning,
            AlarmSeverity::Critical,
            AlarmSeverity::Minor,
        ];
        severities.sort();
        assert_eq!(severities[0], AlarmSeverity::Critical);
    }
}
