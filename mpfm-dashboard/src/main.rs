//! Multiphase flow meter monitoring dashboard
//!
//! Data flow:
//! 1. On start: restore a stored session, otherwise show the login form.
//! 2. Once signed in: load the hierarchy tree and all devices, group the
//!    devices under their wells and auto-select the default node.
//! 3. For the selected scope (selection, time range, device page) a polling
//!    task fetches a [`Snapshot`] every interval. Each fetch carries a
//!    generation ticket so a late response never replaces newer data.
//! 4. On scope change the polling task is cancelled and restarted.

use mpfm_api::{ApiClient, ApiConfig, ApiError};
use mpfm_dashboard_ui::components::{
    AlarmList, Breadcrumb, ChartContainer, ChartHeader, DeviceTable, ErrorDisplay, LoadingSpinner,
    LoginForm, NoticeBanner, SidebarTree, SummaryCards, TimeRangeSelector,
};
use mpfm_dashboard_ui::js_bridge;
use mpfm_dashboard_ui::snapshot::{fetch_snapshot, Snapshot, ViewScope};
use mpfm_dashboard_ui::state::AppState;
use mpfm_model::hierarchy::Hierarchy;
use mpfm_utils::dates::format_timestamp;
use mpfm_utils::units::LIQUID_RATE_UNIT;
use mpfm_view::refresh::{poll_interval, Generation};
use mpfm_view::{DeviceGroups, JoinKey, Outcome, Polled};
use dioxus::core::Task;
use dioxus::prelude::*;
use std::time::Duration;

/// DOM id for the D3 chart container div.
const CHART_CONTAINER_ID: &str = "flow-chart";

/// Page size used while fetching every device for the sidebar.
const TREE_PAGE_SIZE: u32 = 500;

/// How long a notice stays on screen.
const NOTICE_DURATION: Duration = Duration::from_secs(4);

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("mpfm-root"))
        .launch(App);
}

fn load_config() -> ApiConfig {
    ApiConfig::compiled().unwrap_or_else(|e| {
        log::error!("{}; using defaults", e);
        ApiConfig::default()
    })
}

/// Hierarchy plus every device grouped under its well.
async fn load_assets(client: &ApiClient) -> Result<(Hierarchy, DeviceGroups), ApiError> {
    let hierarchy = client.hierarchy().await?;
    let devices = client.all_devices(None, TREE_PAGE_SIZE).await?;
    let groups = DeviceGroups::build(devices, JoinKey::default());
    log::info!(
        "Loaded {} nodes and {} devices in {} groups",
        hierarchy.len(),
        groups.device_count(),
        groups.len()
    );
    Ok((hierarchy, groups))
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(|| AppState::new(load_config()));
    let mut snapshot = use_signal(|| Polled::<ViewScope, Snapshot>::new(ViewScope::default()));
    let mut poll_task: Signal<Option<Task>> = use_signal(|| None);
    let mut rendered: Signal<Option<Generation>> = use_signal(|| None);
    let mut reload = use_signal(|| 0u32);

    // ─── One-time setup: chart scripts and selection subscription ───
    use_hook(move || {
        js_bridge::init_charts();
        let mut revision = state.revision;
        state.selection.write().subscribe(move |selection, number| {
            log::info!("Selected {} (revision {})", selection, number);
            *revision.write() += 1;
        });
    });

    // ─── Effect 1: load the tree whenever a session starts ───
    use_effect(move || {
        let _ = reload();
        if state.session.read().is_none() {
            return;
        }
        let Some(client) = state.client() else {
            return;
        };
        state.loading.set(true);
        spawn(async move {
            match load_assets(&client).await {
                Ok((hierarchy, groups)) => {
                    if let Some(index) = hierarchy.default_selection() {
                        state.expanded.write().reveal(&hierarchy, index);
                    }
                    state.hierarchy.set(hierarchy);
                    state.groups.set(groups);
                    state.error_msg.set(None);
                    let hierarchy = state.hierarchy.read();
                    state.selection.write().auto_select(&hierarchy);
                }
                Err(e) if e.requires_login() => state.sign_out(),
                Err(e) => state.error_msg.set(Some(e.to_string())),
            }
            state.loading.set(false);
        });
    });

    // ─── Effect 2: poll the selected scope ───
    // Re-runs on selection revision, time range, page or session change.
    use_effect(move || {
        let _ = (state.revision)();
        let range = (state.time_range)();
        let page = (state.device_page)();
        let signed_in = state.session.read().is_some();

        if let Some(task) = poll_task.write().take() {
            task.cancel();
        }
        if !signed_in {
            return;
        }
        let Some(client) = state.client() else {
            return;
        };

        let scope = ViewScope {
            filter: state.selection.peek().filter(),
            range,
            page,
        };
        snapshot.write().set_scope(scope.clone());
        let interval = poll_interval(state.config.peek().poll_interval);

        let task = spawn(async move {
            loop {
                let ticket = snapshot.write().issue();
                let client = client.clone();
                let scope = scope.clone();
                spawn(async move {
                    let result = fetch_snapshot(&client, &scope).await;
                    if let Err(e) = &result {
                        if e.requires_login() {
                            state.sign_out();
                            return;
                        }
                    }
                    if let Outcome::FailedInitial(message) = snapshot.write().resolve(ticket, result) {
                        log::error!("Loading {:?} failed: {}", scope, message);
                    }
                });
                js_bridge::sleep(interval).await;
            }
        });
        poll_task.set(Some(task));
    });

    // ─── Effect 3: draw the chart for newly applied data ───
    use_effect(move || {
        let view = snapshot.read();
        let generation = view.applied_generation();
        if *rendered.peek() == Some(generation) {
            return;
        }
        rendered.set(Some(generation));

        match view.data().and_then(|data| data.chart.as_ref()) {
            Some(series) => {
                let data_json = serde_json::to_string(&series.points).unwrap_or_default();
                let config_json = serde_json::json!({
                    "rateLabel": format!("Rate ({})", LIQUID_RATE_UNIT),
                    "height": 360,
                })
                .to_string();
                js_bridge::render_flow_chart(CHART_CONTAINER_ID, &data_json, &config_json);
            }
            None => js_bridge::destroy_chart(CHART_CONTAINER_ID),
        }
    });

    // ─── Effect 4: dismiss notices after a while ───
    use_effect(move || {
        if state.notice.read().is_none() {
            return;
        }
        spawn(async move {
            js_bridge::sleep(NOTICE_DURATION).await;
            state.notice.set(None);
        });
    });

    // ─── Render ───
    let notice = state.notice.read().clone();
    let notice_banner = rsx! {
        if let Some(message) = notice {
            NoticeBanner {
                message,
                on_dismiss: move |_| state.notice.set(None),
            }
        }
    };

    let Some(session) = state.session.read().clone() else {
        return rsx! {
            {notice_banner}
            LoginForm {}
        };
    };
    let user_label = session
        .user
        .as_ref()
        .map(|user| user.email.clone())
        .unwrap_or_default();

    let (data, poll_error, poll_loading) = {
        let view = snapshot.read();
        (view.data().cloned(), view.error().map(str::to_string), view.is_loading())
    };
    let chart_updated = data
        .as_ref()
        .and_then(|data| data.chart.as_ref())
        .and_then(|chart| chart.latest())
        .map(|point| format_timestamp(&point.timestamp));
    let tree_error = state.error_msg.read().clone();
    let tree_loading = *state.loading.read();
    let nothing_selected = state.selection.read().current().is_empty();

    rsx! {
        {notice_banner}
        div {
            style: "display: flex; height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #FAFAFA;",

            SidebarTree {}

            main {
                style: "flex: 1; padding: 12px 20px; overflow-y: auto;",

                header {
                    style: "display: flex; justify-content: space-between; align-items: center;",
                    h2 { style: "margin: 0; font-size: 18px;", "MPFM Monitoring" }
                    div {
                        style: "font-size: 12px; color: #555; display: flex; gap: 12px; align-items: center;",
                        "{user_label}"
                        button { onclick: move |_| state.sign_out(), "Sign out" }
                    }
                }

                Breadcrumb {}

                if let Some(message) = tree_error {
                    ErrorDisplay {
                        message,
                        on_retry: move |_| *reload.write() += 1,
                    }
                }

                if tree_loading {
                    LoadingSpinner { label: "Loading assets..." }
                } else {
                    if let Some(message) = poll_error {
                        ErrorDisplay {
                            message,
                            on_retry: move |_| state.bump_revision(),
                        }
                    }
                    if let Some(data) = &data {
                        SummaryCards { summary: data.summary.clone() }
                    }

                    ChartHeader {
                        title: "Flow rates".to_string(),
                        unit_description: "OFR / WFR in bbl/d, GFR in Mscf/d, GVF and WLR in %".to_string(),
                        updated: chart_updated,
                    }
                    TimeRangeSelector {}
                    ChartContainer {
                        id: CHART_CONTAINER_ID.to_string(),
                        loading: poll_loading,
                        placeholder: nothing_selected.then(|| "Select an asset to see its flow rates".to_string()),
                    }

                    if let Some(data) = data {
                        DeviceTable { page: data.devices.clone() }
                        AlarmList { alarms: data.alarms.clone() }
                    }
                }
            }
        }
    }
}
