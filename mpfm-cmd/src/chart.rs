//! Flow-rate history of a device or hierarchy node.

use crate::session::Context;
use chrono::{DateTime, Utc};
use mpfm_model::flow::{FlowPoint, FlowSeries, TimeRange};
use mpfm_utils::dates::format_timestamp;
use mpfm_utils::units::{format_percent, format_rate, GAS_RATE_UNIT, LIQUID_RATE_UNIT};

/// What a chart is drawn for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartTarget {
    Device(String),
    Hierarchy(String),
}

fn point_row(point: &FlowPoint) -> String {
    format!(
        "{:<17} {:>10.1} {:>10.1} {:>10.1} {:>6.1} {:>6.1}",
        format_timestamp(&point.timestamp),
        point.ofr,
        point.wfr,
        point.gfr,
        point.gvf,
        point.wlr
    )
}

/// Table of the points inside `range`, oldest first.
pub fn chart_table(series: &FlowSeries, range: TimeRange, now: DateTime<Utc>) -> Vec<String> {
    let mut points = series.within(range, now);
    points.sort_by_key(|p| p.timestamp);
    let mut lines = Vec::with_capacity(points.len() + 1);
    lines.push(format!(
        "{:<17} {:>10} {:>10} {:>10} {:>6} {:>6}",
        "timestamp", "OFR", "WFR", "GFR", "GVF", "WLR"
    ));
    lines.extend(points.into_iter().map(point_row));
    lines
}

pub async fn run_chart(ctx: &mut Context, target: ChartTarget, range: TimeRange) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let series = match &target {
        ChartTarget::Device(id) => ctx.check(client.device_chart(id, range).await)?,
        ChartTarget::Hierarchy(id) => ctx.check(client.hierarchy_chart(id, range).await)?,
    };

    let Some(latest) = series.latest() else {
        println!("No data for {:?} in the {}.", target, range.label().to_lowercase());
        return Ok(());
    };
    println!("{} ({} points)", range.label(), series.points.len());
    println!(
        "Latest {}: oil {}, water {}, gas {}, GVF {}, WLR {}",
        format_timestamp(&latest.timestamp),
        format_rate(latest.ofr, LIQUID_RATE_UNIT),
        format_rate(latest.wfr, LIQUID_RATE_UNIT),
        format_rate(latest.gfr, GAS_RATE_UNIT),
        format_percent(latest.gvf),
        format_percent(latest.wlr)
    );
    for line in chart_table(&series, range, Utc::now()) {
        println!("{}", line);
    }
    Ok(())
}
