//! Chart header with title, units and last update time.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartHeaderProps {
    pub title: String,
    /// Unit legend, e.g. "Rates in bbl/d, ratios in %"
    #[props(default = String::new())]
    pub unit_description: String,
    /// Timestamp of the newest point, already formatted
    #[props(default)]
    pub updated: Option<String>,
}

#[component]
pub fn ChartHeader(props: ChartHeaderProps) -> Element {
    rsx! {
        div {
            style: "margin-bottom: 8px; display: flex; justify-content: space-between; align-items: baseline;",
            div {
                h3 {
                    style: "margin: 0 0 4px 0; font-size: 16px;",
                    "{props.title}"
                }
                if !props.unit_description.is_empty() {
                    p {
                        style: "margin: 0; font-size: 12px; color: #666;",
                        "{props.unit_description}"
                    }
                }
            }
            if let Some(updated) = props.updated {
                span {
                    style: "font-size: 11px; color: #888;",
                    "Latest reading {updated}"
                }
            }
        }
    }
}
