//! Error and notice banners.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Shows a "Retry" button when set
    #[props(default)]
    pub on_retry: Option<EventHandler<()>>,
}

/// Inline error panel for a view whose initial load failed.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A; display: flex; justify-content: space-between; align-items: center;",
            span {
                strong { "Error: " }
                "{props.message}"
            }
            if let Some(retry) = props.on_retry {
                button {
                    onclick: move |_| retry.call(()),
                    "Retry"
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct NoticeBannerProps {
    pub message: String,
    pub on_dismiss: EventHandler<()>,
}

/// Toast-style message shown after a form action.
#[component]
pub fn NoticeBanner(props: NoticeBannerProps) -> Element {
    rsx! {
        div {
            style: "position: fixed; top: 16px; right: 16px; padding: 10px 14px; background: #263238; color: #fff; border-radius: 4px; box-shadow: 0 2px 6px rgba(0,0,0,0.3); z-index: 10;",
            "{props.message}"
            button {
                style: "margin-left: 12px; background: none; border: none; color: #B0BEC5; cursor: pointer;",
                onclick: move |_| props.on_dismiss.call(()),
                "x"
            }
        }
    }
}
