//! Hierarchy, device and summary commands.

use crate::session::Context;
use anyhow::Context as _;
use chrono::Utc;
use log::info;
use mpfm_api::DeviceQuery;
use mpfm_model::device::Device;
use mpfm_model::hierarchy::Hierarchy;
use mpfm_model::pagination::PageRequest;
use mpfm_utils::dates::{format_age, format_optional};
use mpfm_utils::units::{format_percent, format_rate, GAS_RATE_UNIT, LIQUID_RATE_UNIT};
use mpfm_view::{DeviceGroups, ExpandedSet, JoinKey, RowKind, Selection, TreeRow, TreeView};
use std::io;
use std::path::Path;

/// Page size used while fetching every device for the tree.
const TREE_PAGE_SIZE: u32 = 500;

/// "1 device", "3 devices".
pub fn device_count_label(count: usize) -> String {
    if count == 1 {
        "1 device".to_string()
    } else {
        format!("{} devices", count)
    }
}

/// Indented text line for one sidebar row, with the number of devices under
/// each node.
pub fn tree_line(row: &TreeRow<'_>, hierarchy: &Hierarchy, groups: &DeviceGroups) -> String {
    let marker = match (row.expandable, row.expanded) {
        (true, true) => "v",
        (true, false) => ">",
        (false, _) => "-",
    };
    let indent = "  ".repeat(row.depth);
    match row.kind {
        RowKind::Node { index, node } => {
            let under = groups.devices_under(hierarchy, index).len();
            format!(
                "{}{} {} [{}] ({}) {}",
                indent,
                marker,
                node.name,
                node.level,
                node.id,
                device_count_label(under)
            )
        }
        RowKind::Device { device, .. } => {
            let status = device.status.map(|s| s.as_str()).unwrap_or("unknown");
            format!("{}* {} {} {}", indent, device.serial_number, device.device_type, status)
        }
    }
}

pub async fn run_tree(
    ctx: &mut Context,
    expand_all: bool,
    expand: Vec<String>,
    join_by_id: bool,
) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let hierarchy = ctx.check(client.hierarchy().await)?;
    let devices = ctx.check(client.all_devices(None, TREE_PAGE_SIZE).await)?;
    let join = if join_by_id {
        JoinKey::WellId
    } else {
        JoinKey::WellName
    };
    let groups = DeviceGroups::build(devices, join);

    let mut expanded = ExpandedSet::new();
    if expand_all {
        expanded.expand_all(&hierarchy);
    }
    for id in &expand {
        match hierarchy.find(id) {
            Some(index) => {
                expanded.reveal(&hierarchy, index);
                expanded.expand(id);
            }
            None => log::warn!("No hierarchy node with id {}", id),
        }
    }

    let selection = Selection::Empty;
    for row in TreeView::new(&hierarchy, &groups, &expanded, &selection).rows() {
        println!("{}", tree_line(&row, &hierarchy, &groups));
    }
    let unassigned = groups.unassigned();
    if !unassigned.is_empty() {
        println!("{} device(s) not attached to any well", unassigned.len());
    }
    Ok(())
}

/// Write one CSV line per device, in group order.
pub fn write_devices_csv<W: io::Write>(writer: W, groups: &DeviceGroups) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["group", "id", "serial_number", "type", "status", "last_seen", "created_at"])?;
    for (key, devices) in groups.iter() {
        for device in devices {
            let status = device.status.map(|s| s.as_str()).unwrap_or("");
            let last_seen = format_optional(device.last_seen.as_ref());
            let created_at = format_optional(device.created_at.as_ref());
            csv.write_record([
                key,
                device.id.as_str(),
                device.serial_number.as_str(),
                device.device_type.as_str(),
                status,
                last_seen.as_str(),
                created_at.as_str(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(())
}

fn print_device(device: &Device) {
    let now = Utc::now();
    let status = device.status.map(|s| s.as_str()).unwrap_or("unknown");
    let seen = device
        .last_seen
        .as_ref()
        .map(|t| format_age(t, &now))
        .unwrap_or_else(|| "never".to_string());
    println!("  {:<16} {:<8} {:<12} {}", device.serial_number, device.device_type, status, seen);
}

fn print_groups(groups: &DeviceGroups) {
    for (key, devices) in groups.iter() {
        println!("{} ({})", key, devices.len());
        devices.iter().for_each(print_device);
    }
}

/// Without a node, one page of `GET /devices`. With a node, every device
/// under it from `GET /hierarchy/{id}/devices`.
pub async fn run_devices(
    ctx: &mut Context,
    hierarchy: Option<String>,
    page: u32,
    limit: u32,
    csv_path: Option<&Path>,
) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let groups = match hierarchy {
        Some(id) => {
            let devices = ctx.check(client.hierarchy_devices(&id).await)?;
            let groups = DeviceGroups::build(devices, JoinKey::default());
            print_groups(&groups);
            println!("{} under node {}", device_count_label(groups.device_count()), id);
            groups
        }
        None => {
            let query = DeviceQuery {
                hierarchy_id: None,
                search: None,
                page: PageRequest {
                    page: page.max(1),
                    limit: limit.max(1),
                },
            };
            let response = ctx.check(client.devices(&query).await)?;
            let groups = DeviceGroups::build(response.devices, JoinKey::default());
            print_groups(&groups);
            let stats = &response.statistics;
            let pagination = &response.pagination;
            println!(
                "{} total, {} online, {} offline; page {} of {}",
                stats.total,
                stats.online,
                stats.offline,
                pagination.page,
                pagination.total_pages.max(1)
            );
            groups
        }
    };

    if let Some(path) = csv_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Cannot create {}", path.display()))?;
        write_devices_csv(file, &groups)?;
        info!("Wrote {} devices to {}", groups.device_count(), path.display());
    }
    Ok(())
}

pub async fn run_summary(ctx: &mut Context, hierarchy: Option<String>) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let summary = ctx.check(client.dashboard_summary(hierarchy.as_deref()).await)?;
    let production = &summary.production;
    println!(
        "Devices:       {} ({} online, {} offline, {:.0} % available)",
        summary.total_devices,
        summary.online_devices,
        summary.offline_devices,
        summary.online_ratio()
    );
    println!("Active alarms: {}", summary.active_alarms);
    println!("Oil:           {}", format_rate(production.ofr, LIQUID_RATE_UNIT));
    println!("Water:         {}", format_rate(production.wfr, LIQUID_RATE_UNIT));
    println!("Gas:           {}", format_rate(production.gfr, GAS_RATE_UNIT));
    println!("GVF:           {}", format_percent(production.gvf));
    println!("WLR:           {}", format_percent(production.wlr));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpfm_model::hierarchy::{HierarchyNode, Level};

    #[test]
    fn tree_lines_nest_devices_under_expanded_wells() {
        let hierarchy = Hierarchy::from_roots(vec![HierarchyNode::new("1", "Acme", Level::Company)
            .with_child(HierarchyNode::new("2", "W1", Level::Well))])
        .unwrap();
        let groups = DeviceGroups::build(
            vec![Device::new("d1", "SN-1", Some("W1"))],
            JoinKey::WellName,
        );
        let mut expanded = ExpandedSet::new();
        expanded.expand_all(&hierarchy);
        let selection = Selection::Empty;
        let lines: Vec<String> = TreeView::new(&hierarchy, &groups, &expanded, &selection)
            .rows()
            .map(|row| tree_line(&row, &hierarchy, &groups))
            .collect();
        assert_eq!(
            lines,
            vec![
                "v Acme [company] (1) 1 device".to_string(),
                "  v W1 [well] (2) 1 device".to_string(),
                "    * SN-1 MPFM unknown".to_string(),
            ]
        );
    }

    #[test]
    fn tree_lines_count_devices_of_every_well_below() {
        let hierarchy = Hierarchy::from_roots(vec![HierarchyNode::new("1", "Acme", Level::Company)
            .with_child(
                HierarchyNode::new("2", "East", Level::Region)
                    .with_child(HierarchyNode::new("3", "W1", Level::Well))
                    .with_child(HierarchyNode::new("4", "W2", Level::Well)),
            )
            .with_child(HierarchyNode::new("5", "West", Level::Region))])
        .unwrap();
        let groups = DeviceGroups::build(
            vec![
                Device::new("d1", "SN-1", Some("W1")),
                Device::new("d2", "SN-2", Some("W2")),
                Device::new("d3", "SN-3", Some("W2")),
                Device::new("d4", "SN-4", None),
            ],
            JoinKey::WellName,
        );
        let expanded = ExpandedSet::new();
        let selection = Selection::Empty;
        let lines: Vec<String> = TreeView::new(&hierarchy, &groups, &expanded, &selection)
            .rows()
            .map(|row| tree_line(&row, &hierarchy, &groups))
            .collect();
        assert_eq!(lines, vec!["> Acme [company] (1) 3 devices".to_string()]);

        let mut expanded = ExpandedSet::new();
        expanded.expand("1");
        let lines: Vec<String> = TreeView::new(&hierarchy, &groups, &expanded, &selection)
            .rows()
            .map(|row| tree_line(&row, &hierarchy, &groups))
            .collect();
        assert_eq!(lines[1], "  > East [region] (2) 3 devices");
        assert_eq!(lines[2], "  - West [region] (5) 0 devices");
    }

    #[test]
    fn csv_lists_every_device_once() {
        let groups = DeviceGroups::build(
            vec![
                Device::new("d1", "SN-1", Some("W1")),
                Device::new("d2", "SN-2", None),
            ],
            JoinKey::WellName,
        );
        let mut out = Vec::new();
        write_devices_csv(&mut out, &groups).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("W1,d1,SN-1,MPFM"));
        assert!(lines[2].starts_with("unassigned,d2,SN-2"));
    }
}
