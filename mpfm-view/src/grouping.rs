//! Device grouping: maps the flat device list onto the wells of the hierarchy.
//!
//! By default devices are joined to wells by `device.location == well.name`.
//! Two wells with the same display name therefore share one device group.
//! [`JoinKey::WellId`] joins on `device.hierarchy_id == well.id` instead.

use mpfm_model::device::Device;
use mpfm_model::hierarchy::{ArenaNode, Hierarchy, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Group key for devices that name no well.
pub const UNASSIGNED: &str = "unassigned";

/// How a device is matched to a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinKey {
    /// `device.location` against the well's display name.
    #[default]
    WellName,
    /// `device.hierarchy_id` against the well's id.
    WellId,
}

impl JoinKey {
    fn device_key(self, device: &Device) -> &str {
        let key = match self {
            JoinKey::WellName => device.location_key(),
            JoinKey::WellId => device
                .hierarchy_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty()),
        };
        key.unwrap_or(UNASSIGNED)
    }

    fn well_key(self, node: &ArenaNode) -> &str {
        match self {
            JoinKey::WellName => node.name.trim(),
            JoinKey::WellId => node.id.as_str(),
        }
    }
}

/// Devices bucketed by join key, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceGroups {
    join: JoinKey,
    groups: Vec<(String, Vec<Device>)>,
    index: HashMap<String, usize>,
}

impl DeviceGroups {
    /// Group `devices` in a single pass. Devices keep their relative order
    /// inside each group.
    pub fn build(devices: impl IntoIterator<Item = Device>, join: JoinKey) -> Self {
        let mut grouped = DeviceGroups {
            join,
            ..Default::default()
        };
        for device in devices {
            let key = join.device_key(&device).to_string();
            match grouped.index.get(&key) {
                Some(&slot) => grouped.groups[slot].1.push(device),
                None => {
                    grouped.index.insert(key.clone(), grouped.groups.len());
                    grouped.groups.push((key, vec![device]));
                }
            }
        }
        log::debug!(
            "Grouped {} devices into {} groups ({:?})",
            grouped.device_count(),
            grouped.groups.len(),
            join
        );
        grouped
    }

    pub fn join_key(&self) -> JoinKey {
        self.join
    }

    /// Devices under `key`, empty when no device uses it.
    pub fn get(&self, key: &str) -> &[Device] {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
            .unwrap_or(&[])
    }

    /// Devices attached to a well. Non-well nodes never have devices.
    pub fn for_well(&self, node: &ArenaNode) -> &[Device] {
        if !node.is_well() {
            return &[];
        }
        self.get(self.join.well_key(node))
    }

    pub fn unassigned(&self) -> &[Device] {
        self.get(UNASSIGNED)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Device])> {
        self.groups
            .iter()
            .map(|(key, devices)| (key.as_str(), devices.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn device_count(&self) -> usize {
        self.groups.iter().map(|(_, devices)| devices.len()).sum()
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.groups.iter().flat_map(|(_, devices)| devices.iter())
    }

    pub fn find_device(&self, id: &str) -> Option<&Device> {
        self.devices().find(|device| device.id == id)
    }

    /// Every device attached to a well in the subtree rooted at `index`.
    ///
    /// A group shared by several same-named wells is listed once.
    pub fn devices_under<'a>(&'a self, hierarchy: &Hierarchy, index: NodeIndex) -> Vec<&'a Device> {
        let mut seen = HashSet::new();
        let mut devices = Vec::new();
        for well in hierarchy.wells_under(index) {
            let key = self.join.well_key(&hierarchy[well]);
            if seen.insert(key) {
                devices.extend(self.get(key).iter());
            }
        }
        devices
    }

    /// First well (in display order) that the device is attached to.
    pub fn well_of_device(&self, hierarchy: &Hierarchy, device_id: &str) -> Option<NodeIndex> {
        let device = self.find_device(device_id)?;
        let key = self.join.device_key(device);
        hierarchy
            .wells()
            .find(|(_, node)| self.join.well_key(node) == key)
            .map(|(index, _)| index)
    }
}
