//! Alarm listing and status changes.

use crate::session::Context;
use mpfm_api::AlarmQuery;
use mpfm_model::alarm::{Alarm, AlarmStatus};
use mpfm_model::pagination::PageRequest;
use mpfm_utils::dates::format_optional;

/// One line per alarm: status, severity, device and message.
pub fn alarm_line(alarm: &Alarm) -> String {
    let device = alarm
        .device_serial
        .as_deref()
        .or(alarm.device_id.as_deref())
        .unwrap_or("-");
    format!(
        "{:<12} {:<8} {:<10} {:<16} {} ({})",
        alarm.id,
        alarm.severity.as_str(),
        alarm.status.as_str(),
        device,
        alarm.message,
        format_optional(alarm.created_at.as_ref())
    )
}

pub async fn run_alarms(
    ctx: &mut Context,
    hierarchy: Option<String>,
    device: Option<String>,
    status: Option<AlarmStatus>,
    page: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    let query = AlarmQuery {
        hierarchy_id: hierarchy,
        device_id: device,
        status,
        page: PageRequest {
            page: page.max(1),
            limit: limit.max(1),
        },
    };
    let response = ctx.check(client.alarms(&query).await)?;
    if response.alarms.is_empty() {
        println!("No alarms.");
    }
    for alarm in &response.alarms {
        println!("{}", alarm_line(alarm));
    }
    let stats = &response.statistics;
    println!(
        "{} total, {} active, {} acknowledged, {} resolved; page {} of {}",
        stats.total,
        stats.active,
        stats.acknowledged,
        stats.resolved,
        response.pagination.page,
        response.pagination.total_pages.max(1)
    );
    Ok(())
}

pub async fn run_set_alarm_status(
    ctx: &mut Context,
    id: String,
    status: AlarmStatus,
) -> anyhow::Result<()> {
    let client = ctx.authenticated()?;
    match ctx.check(client.update_alarm_status(&id, status).await)? {
        Some(alarm) => println!("{}", alarm_line(&alarm)),
        None => println!("Alarm {} is now {}", id, status),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_line_prefers_serial_over_device_id() {
        let alarm: Alarm = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "deviceId": "d1",
            "deviceSerial": "SN-1",
            "severity": "Major",
            "status": "active",
            "message": "Pressure high",
        }))
        .unwrap();
        let line = alarm_line(&alarm);
        assert!(line.contains("SN-1"));
        assert!(line.contains("major"));
        assert!(line.contains("Pressure high"));
        assert!(line.ends_with("(-)"));
    }
}
