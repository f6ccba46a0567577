//! Header breadcrumb of the current selection.

use crate::state::AppState;
use mpfm_model::hierarchy::Hierarchy;
use mpfm_view::{DeviceGroups, Selection};
use dioxus::prelude::*;

/// Path shown for `selection`, e.g. "Acme / East / W1 / SN-001".
pub fn breadcrumb_text(hierarchy: &Hierarchy, groups: &DeviceGroups, selection: &Selection) -> String {
    match selection {
        Selection::Empty => "All assets".to_string(),
        Selection::Hierarchy(node) => match hierarchy.find(&node.id) {
            Some(index) => hierarchy.breadcrumb(index),
            None => node.name.clone(),
        },
        Selection::Device(device) => match groups.well_of_device(hierarchy, &device.id) {
            Some(well) => format!("{} / {}", hierarchy.breadcrumb(well), device.serial_number),
            None => device.serial_number.clone(),
        },
    }
}

#[component]
pub fn Breadcrumb() -> Element {
    let state = use_context::<AppState>();
    let text = breadcrumb_text(
        &state.hierarchy.read(),
        &state.groups.read(),
        state.selection.read().current(),
    );

    rsx! {
        nav {
            style: "font-size: 13px; color: #455A64; padding: 4px 0 12px 0;",
            "{text}"
        }
    }
}
