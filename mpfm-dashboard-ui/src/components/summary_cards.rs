//! Device, alarm and production totals for the selected scope.

use mpfm_model::dashboard::DashboardSummary;
use mpfm_utils::units::{format_percent, format_rate, GAS_RATE_UNIT, LIQUID_RATE_UNIT};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct SummaryCardsProps {
    pub summary: DashboardSummary,
}

#[component]
fn Card(title: String, value: String, detail: Option<String>) -> Element {
    rsx! {
        div {
            style: "flex: 1; min-width: 140px; padding: 10px 12px; background: #fff; border: 1px solid #e0e0e0; border-radius: 4px;",
            div { style: "font-size: 11px; color: #78909C; text-transform: uppercase;", "{title}" }
            div { style: "font-size: 20px; font-weight: 600; margin-top: 4px;", "{value}" }
            if let Some(detail) = detail {
                div { style: "font-size: 11px; color: #888;", "{detail}" }
            }
        }
    }
}

#[component]
pub fn SummaryCards(props: SummaryCardsProps) -> Element {
    let summary = &props.summary;
    let online = format!("{} online, {} offline", summary.online_devices, summary.offline_devices);
    let ratio = format!("{:.0} % online", summary.online_ratio());
    let production = &summary.production;

    rsx! {
        div {
            style: "display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 12px;",
            Card { title: "Devices", value: summary.total_devices.to_string(), detail: Some(online) }
            Card { title: "Availability", value: ratio, detail: None }
            Card { title: "Active alarms", value: summary.active_alarms.to_string(), detail: None }
            Card { title: "Oil", value: format_rate(production.ofr, LIQUID_RATE_UNIT), detail: None }
            Card { title: "Water", value: format_rate(production.wfr, LIQUID_RATE_UNIT), detail: None }
            Card { title: "Gas", value: format_rate(production.gfr, GAS_RATE_UNIT), detail: None }
            Card {
                title: "GVF / WLR",
                value: format!("{} / {}", format_percent(production.gvf), format_percent(production.wlr)),
                detail: None,
            }
        }
    }
}
