//! Collapsible hierarchy tree with devices nested under their wells.

use crate::state::AppState;
use mpfm_model::hierarchy::Hierarchy;
use mpfm_view::{apply_action, DeviceGroups, RowKind, TreeAction, TreeRow, TreeView};
use dioxus::prelude::*;

/// Owned copy of a [`TreeRow`] so rendering does not hold signal borrows.
#[derive(Clone, PartialEq)]
struct SidebarRow {
    key: String,
    id: String,
    label: String,
    icon: &'static str,
    depth: usize,
    expandable: bool,
    expanded: bool,
    selected: bool,
    is_device: bool,
    /// Devices under a node; `None` on device rows
    device_count: Option<usize>,
    select: TreeAction,
}

impl SidebarRow {
    fn new(row: TreeRow<'_>, hierarchy: &Hierarchy, groups: &DeviceGroups) -> Self {
        let prefix = if row.is_device() { "device" } else { "node" };
        let device_count = match row.kind {
            RowKind::Node { index, .. } => Some(groups.devices_under(hierarchy, index).len()),
            RowKind::Device { .. } => None,
        };
        Self {
            key: format!("{}-{}", prefix, row.id()),
            id: row.id().to_string(),
            label: row.label().to_string(),
            icon: icon_glyph(row.icon()),
            depth: row.depth,
            expandable: row.expandable,
            expanded: row.expanded,
            selected: row.selected,
            is_device: row.is_device(),
            device_count,
            select: row.select_action(),
        }
    }
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "building" => "\u{1F3E2}",
        "globe" => "\u{1F310}",
        "map" => "\u{1F5FA}",
        "layers" => "\u{25A4}",
        "droplet" => "\u{1F4A7}",
        _ => "\u{25A3}",
    }
}

#[component]
pub fn SidebarTree() -> Element {
    let mut state = use_context::<AppState>();

    let rows: Vec<SidebarRow> = {
        let hierarchy = state.hierarchy.read();
        let groups = state.groups.read();
        let expanded = state.expanded.read();
        let store = state.selection.read();
        TreeView::new(&hierarchy, &groups, &expanded, store.current())
            .rows()
            .map(|row| SidebarRow::new(row, &hierarchy, &groups))
            .collect()
    };

    let mut dispatch = move |action: TreeAction| {
        let changed = apply_action(
            &action,
            &state.hierarchy.read(),
            &state.groups.read(),
            &mut state.expanded.write(),
            &mut state.selection.write(),
        );
        if changed && action.changes_selection() {
            state.device_page.set(1);
        }
    };

    let expand_all = move |_| {
        let hierarchy = state.hierarchy.read();
        state.expanded.write().expand_all(&hierarchy);
    };
    let collapse_all = move |_| state.expanded.write().collapse_all();

    rsx! {
        aside {
            style: "width: 280px; min-width: 220px; border-right: 1px solid #e0e0e0; padding: 8px 0; overflow-y: auto; font-size: 13px;",
            div {
                style: "display: flex; gap: 8px; padding: 0 12px 8px 12px;",
                button { onclick: expand_all, "Expand all" }
                button { onclick: collapse_all, "Collapse all" }
            }
            if rows.is_empty() {
                p { style: "padding: 0 12px; color: #888;", "No assets" }
            }
            for row in rows {
                div {
                    key: "{row.key}",
                    style: format!(
                        "display: flex; align-items: center; padding: 3px 8px 3px {}px; cursor: pointer; background: {}; font-style: {};",
                        12 + row.depth * 16,
                        if row.selected { "#E3F2FD" } else { "transparent" },
                        if row.is_device { "italic" } else { "normal" },
                    ),
                    span {
                        style: "width: 16px; display: inline-block; color: #607D8B;",
                        onclick: {
                            let id = row.id.clone();
                            move |evt: Event<MouseData>| {
                                evt.stop_propagation();
                                dispatch(TreeAction::Toggle(id.clone()));
                            }
                        },
                        if row.expandable {
                            if row.expanded { "\u{25BE}" } else { "\u{25B8}" }
                        }
                    }
                    span {
                        style: "flex: 1;",
                        onclick: {
                            let action = row.select.clone();
                            move |_| dispatch(action.clone())
                        },
                        "{row.icon} {row.label}"
                    }
                    if let Some(count) = row.device_count.filter(|&n| n > 0) {
                        span {
                            style: "font-size: 11px; color: #78909C; padding: 0 4px;",
                            "{count}"
                        }
                    }
                }
            }
        }
    }
}
