//! Paginated device table for the selected scope.

use crate::state::AppState;
use mpfm_model::device::{Device, DevicesResponse};
use mpfm_utils::dates::{format_age, format_optional};
use mpfm_view::{apply_action, TreeAction};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct DeviceTableProps {
    pub page: DevicesResponse,
}

fn status_badge(device: &Device) -> (&'static str, &'static str) {
    match device.status {
        Some(status) if device.is_online() => (status.as_str(), "#2E7D32"),
        Some(status) => (status.as_str(), "#C62828"),
        None => ("unknown", "#78909C"),
    }
}

#[component]
pub fn DeviceTable(props: DeviceTableProps) -> Element {
    let mut state = use_context::<AppState>();
    let now = chrono::Utc::now();
    let pagination = props.page.pagination.clone();
    let stats = props.page.statistics.clone();
    let selected_id = state
        .selection
        .read()
        .current()
        .device()
        .map(|device| device.id.clone());

    let mut select = move |device: Device| {
        let action = TreeAction::SelectDevice(device.id.clone());
        let (well, known) = {
            let groups = state.groups.read();
            (
                groups.well_of_device(&state.hierarchy.read(), &device.id),
                groups.find_device(&device.id).is_some(),
            )
        };
        if let Some(well) = well {
            let hierarchy = state.hierarchy.read();
            state.expanded.write().reveal(&hierarchy, well);
        }
        let changed = if known {
            apply_action(
                &action,
                &state.hierarchy.read(),
                &state.groups.read(),
                &mut state.expanded.write(),
                &mut state.selection.write(),
            )
        } else {
            state.selection.write().select_device(device)
        };
        if changed && action.changes_selection() {
            state.device_page.set(1);
        }
    };

    let mut go_to = move |page: u32| state.device_page.set(page);
    let previous = pagination.page.saturating_sub(1);
    let next = pagination.page + 1;

    rsx! {
        div {
            style: "margin: 12px 0;",
            h3 {
                style: "margin: 0 0 6px 0; font-size: 15px;",
                "Devices"
                span {
                    style: "font-weight: normal; font-size: 12px; color: #666; margin-left: 8px;",
                    "{stats.total} total, {stats.online} online, {stats.offline} offline"
                }
            }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                thead {
                    tr {
                        style: "text-align: left; border-bottom: 2px solid #e0e0e0;",
                        th { "Serial" }
                        th { "Type" }
                        th { "Well" }
                        th { "Status" }
                        th { "Last seen" }
                        th { "Installed" }
                    }
                }
                tbody {
                    if props.page.devices.is_empty() {
                        tr { td { colspan: "6", style: "color: #888; padding: 8px 0;", "No devices in this scope" } }
                    }
                    for device in props.page.devices.iter().cloned() {
                        {
                            let (status, color) = status_badge(&device);
                            let location = device.location_key().unwrap_or("-").to_string();
                            let last_seen = device
                                .last_seen
                                .as_ref()
                                .map(|seen| format_age(seen, &now))
                                .unwrap_or_else(|| "-".to_string());
                            let installed = format_optional(device.created_at.as_ref());
                            let highlighted = selected_id.as_deref() == Some(device.id.as_str());
                            rsx! {
                                tr {
                                    key: "{device.id}",
                                    style: if highlighted { "background: #E3F2FD; cursor: pointer;" } else { "cursor: pointer;" },
                                    onclick: {
                                        let device = device.clone();
                                        move |_| select(device.clone())
                                    },
                                    td { "{device.serial_number}" }
                                    td { "{device.device_type}" }
                                    td { "{location}" }
                                    td { span { style: "color: {color};", "{status}" } }
                                    td { "{last_seen}" }
                                    td { "{installed}" }
                                }
                            }
                        }
                    }
                }
            }
            if pagination.total_pages > 1 {
                div {
                    style: "display: flex; gap: 8px; align-items: center; margin-top: 6px; font-size: 12px;",
                    button {
                        disabled: !pagination.has_previous(),
                        onclick: move |_| go_to(previous),
                        "Previous"
                    }
                    "Page {pagination.page} of {pagination.total_pages}"
                    button {
                        disabled: !pagination.has_next(),
                        onclick: move |_| go_to(next),
                        "Next"
                    }
                }
            }
        }
    }
}
