//! Chart container component with loading state.

use dioxus::prelude::*;

/// Props for ChartContainer
#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id D3 renders into
    pub id: String,
    #[props(default = false)]
    pub loading: bool,
    /// Shown instead of the chart, e.g. when nothing is selected
    #[props(default)]
    pub placeholder: Option<String>,
    #[props(default = 360)]
    pub min_height: u32,
}

/// A container div for the D3.js flow chart.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%; background: #fff; border: 1px solid #e0e0e0; border-radius: 4px;",
        props.min_height
    );

    rsx! {
        div {
            style: "{style}",
            if let Some(text) = props.placeholder {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #888;",
                    "{text}"
                }
            } else if props.loading {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666;",
                    "Loading chart..."
                }
            }
            div {
                id: "{props.id}",
                style: "width: 100%; position: relative;",
            }
        }
    }
}
