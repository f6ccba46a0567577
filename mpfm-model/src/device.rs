use crate::error::ParseEnumError;
use crate::pagination::Pagination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Connectivity state reported for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[serde(alias = "Online", alias = "ONLINE")]
    Online,
    #[serde(alias = "Offline", alias = "OFFLINE")]
    Offline,
    #[serde(alias = "Maintenance", alias = "MAINTENANCE")]
    Maintenance,
}

impl DeviceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(DeviceStatus::Online),
            "offline" => Ok(DeviceStatus::Offline),
            "maintenance" => Ok(DeviceStatus::Maintenance),
            _ => Err(ParseEnumError::new("device status", s)),
        }
    }
}

/// A multiphase flow meter installed at a well.
///
/// `location` names the well the device belongs to. It is matched against the
/// well's display name, not its id; `hierarchy_id` carries the well id when
/// the API provides one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(deserialize_with = "crate::de::id")]
    pub id: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_id", skip_serializing_if = "Option::is_none")]
    pub hierarchy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Device {
    /// Minimal device attached to a well by name.
    pub fn new(id: impl Into<String>, serial_number: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            id: id.into(),
            serial_number: serial_number.into(),
            device_type: "MPFM".to_string(),
            location: location.map(str::to_string),
            company: None,
            hierarchy_id: None,
            status: None,
            created_at: None,
            last_seen: None,
            metadata: None,
        }
    }

    /// Trimmed, non-empty location, if any.
    pub fn location_key(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    pub fn is_online(&self) -> bool {
        self.status == Some(DeviceStatus::Online)
    }
}

/// Device counts shown above the device table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceStatistics {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
}

/// `data` of `GET /devices` and `GET /hierarchy/{id}/devices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
    pub statistics: DeviceStatistics,
    pub pagination: Pagination,
}
