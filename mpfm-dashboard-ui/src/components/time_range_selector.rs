//! Time range selector for the flow chart.

use crate::state::AppState;
use mpfm_model::flow::TimeRange;
use dioxus::prelude::*;

/// Dropdown of the chart time ranges.
#[component]
pub fn TimeRangeSelector() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.time_range)();

    let on_change = move |evt: Event<FormData>| match evt.value().parse::<TimeRange>() {
        Ok(range) => state.time_range.set(range),
        Err(e) => log::warn!("{}", e),
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "Period: "
                select {
                    onchange: on_change,
                    for range in TimeRange::ALL {
                        option {
                            value: range.as_str(),
                            selected: range == current,
                            {range.label()}
                        }
                    }
                }
            }
        }
    }
}
