//! Reusable Dioxus RSX components for the flow monitoring dashboard.

mod alarm_list;
mod breadcrumb;
mod chart_container;
mod chart_header;
mod device_table;
mod error_display;
mod loading_spinner;
mod login_form;
mod sidebar_tree;
mod summary_cards;
mod time_range_selector;

pub use alarm_list::AlarmList;
pub use breadcrumb::Breadcrumb;
pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use device_table::DeviceTable;
pub use error_display::{ErrorDisplay, NoticeBanner};
pub use loading_spinner::LoadingSpinner;
pub use login_form::LoginForm;
pub use sidebar_tree::SidebarTree;
pub use summary_cards::SummaryCards;
pub use time_range_selector::TimeRangeSelector;
