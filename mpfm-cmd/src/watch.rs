//! Poll a scope and print a line each time newer figures arrive.

use crate::session::Context;
use chrono::{DateTime, Utc};
use mpfm_api::{ApiClient, ApiError};
use mpfm_model::dashboard::DashboardSummary;
use mpfm_model::flow::{FlowPoint, TimeRange};
use mpfm_utils::dates::format_timestamp;
use mpfm_utils::units::{format_percent, format_rate, GAS_RATE_UNIT, LIQUID_RATE_UNIT};
use mpfm_view::refresh::poll_interval;
use mpfm_view::{Outcome, Polled, ScopeFilter, Ticket};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Figures fetched on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchStats {
    pub summary: DashboardSummary,
    pub latest: Option<FlowPoint>,
}

async fn fetch_stats(client: &ApiClient, filter: &ScopeFilter) -> Result<WatchStats, ApiError> {
    let summary = client
        .dashboard_summary(filter.hierarchy_id.as_deref())
        .await?;
    let series = match (&filter.device_id, &filter.hierarchy_id) {
        (Some(device), _) => Some(client.device_chart(device, TimeRange::Hour).await?),
        (None, Some(node)) => Some(client.hierarchy_chart(node, TimeRange::Hour).await?),
        (None, None) => None,
    };
    let latest = series.and_then(|s| s.latest().cloned());
    Ok(WatchStats { summary, latest })
}

pub fn watch_line(at: DateTime<Utc>, stats: &WatchStats) -> String {
    let summary = &stats.summary;
    let mut line = format!(
        "[{}] {}/{} online, {} active alarms",
        format_timestamp(&at),
        summary.online_devices,
        summary.total_devices,
        summary.active_alarms
    );
    if let Some(point) = &stats.latest {
        line.push_str(&format!(
            " | oil {} water {} gas {} GVF {} WLR {}",
            format_rate(point.ofr, LIQUID_RATE_UNIT),
            format_rate(point.wfr, LIQUID_RATE_UNIT),
            format_rate(point.gfr, GAS_RATE_UNIT),
            format_percent(point.gvf),
            format_percent(point.wlr)
        ));
    }
    line
}

/// Poll until Ctrl-C, or until `ticks` fetches have been answered.
pub async fn run_watch(
    ctx: &mut Context,
    hierarchy: Option<String>,
    device: Option<String>,
    ticks: Option<u64>,
) -> anyhow::Result<()> {
    if ticks == Some(0) {
        return Ok(());
    }
    let client = ctx.authenticated()?;
    let filter = ScopeFilter {
        hierarchy_id: hierarchy,
        device_id: device,
    };
    let interval = poll_interval(ctx.config.poll_interval);
    log::info!("Watching {:?} every {:?}", filter, interval);

    let mut view: Polled<ScopeFilter, WatchStats> = Polled::new(filter.clone());
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, Result<WatchStats, ApiError>)>();
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut issued = 0u64;

    loop {
        let more = ticks.map_or(true, |max| issued < max);
        tokio::select! {
            _ = timer.tick(), if more => {
                let ticket = view.issue();
                issued += 1;
                let client = client.clone();
                let filter = filter.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = fetch_stats(&client, &filter).await;
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => {
                if matches!(&result, Err(e) if e.requires_login()) {
                    ctx.check(result)?;
                    return Ok(());
                }
                match view.resolve(ticket, result) {
                    Outcome::Applied => {
                        if let Some(stats) = view.data() {
                            println!("{}", watch_line(Utc::now(), stats));
                        }
                    }
                    Outcome::FailedInitial(message) => eprintln!("{}", message),
                    Outcome::FailedKeptPrevious(_) | Outcome::Stale => {}
                }
                if !more && view.in_flight() == 0 {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                log::info!("Interrupted with {} request(s) in flight", view.in_flight());
                break;
            }
        }
    }
    Ok(())
}
