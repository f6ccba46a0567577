//! Alarms of the selected scope with acknowledge/resolve actions.

use crate::state::AppState;
use mpfm_model::alarm::{Alarm, AlarmStatus, AlarmsResponse};
use mpfm_utils::dates::format_optional;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct AlarmListProps {
    pub alarms: AlarmsResponse,
}

/// Next status offered for an alarm, if any.
fn next_action(alarm: &Alarm) -> Option<(AlarmStatus, &'static str)> {
    match alarm.status {
        AlarmStatus::Active => Some((AlarmStatus::Acknowledged, "Acknowledge")),
        AlarmStatus::Acknowledged => Some((AlarmStatus::Resolved, "Resolve")),
        AlarmStatus::Resolved => None,
    }
}

#[component]
pub fn AlarmList(props: AlarmListProps) -> Element {
    let mut state = use_context::<AppState>();
    let stats = props.alarms.statistics.clone();

    let update = move |alarm_id: String, status: AlarmStatus| {
        let Some(client) = state.client() else {
            return;
        };
        spawn(async move {
            match client.update_alarm_status(&alarm_id, status).await {
                Ok(_) => {
                    state.notice.set(Some(format!("Alarm marked {}", status)));
                    state.bump_revision();
                }
                Err(e) if e.requires_login() => state.sign_out(),
                Err(e) => state.notice.set(Some(e.to_string())),
            }
        });
    };

    rsx! {
        div {
            style: "margin: 12px 0;",
            h3 {
                style: "margin: 0 0 6px 0; font-size: 15px;",
                "Alarms"
                span {
                    style: "font-weight: normal; font-size: 12px; color: #666; margin-left: 8px;",
                    "{stats.active} active, {stats.acknowledged} acknowledged, {stats.resolved} resolved"
                }
            }
            if props.alarms.alarms.is_empty() {
                p { style: "color: #888; font-size: 13px;", "No alarms" }
            }
            ul {
                style: "list-style: none; padding: 0; margin: 0; font-size: 13px;",
                for alarm in props.alarms.alarms.iter().cloned() {
                    {
                        let color = alarm.severity.color();
                        let severity = alarm.severity.as_str();
                        let raised = format_optional(alarm.created_at.as_ref());
                        let source = alarm.device_serial.clone().unwrap_or_default();
                        let action = next_action(&alarm);
                        let id = alarm.id.clone();
                        rsx! {
                            li {
                                key: "{alarm.id}",
                                style: "display: flex; gap: 8px; align-items: center; padding: 6px 0; border-bottom: 1px solid #eee;",
                                span {
                                    style: "min-width: 64px; font-weight: 600; color: {color}; text-transform: uppercase; font-size: 11px;",
                                    "{severity}"
                                }
                                span { style: "flex: 1;", "{alarm.message}" }
                                span { style: "color: #78909C;", "{source}" }
                                span { style: "color: #888; font-size: 11px;", "{raised}" }
                                span { style: "font-size: 11px; color: #555;", "{alarm.status}" }
                                if let Some((status, label)) = action {
                                    button {
                                        onclick: move |_| update(id.clone(), status),
                                        "{label}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpfm_model::alarm::AlarmSeverity;

    #[test]
    fn resolved_alarms_offer_no_action() {
        let mut alarm = Alarm {
            id: "1".into(),
            device_id: None,
            device_serial: None,
            severity: AlarmSeverity::Major,
            status: AlarmStatus::Active,
            message: "High GVF".into(),
            created_at: None,
            acknowledged_at: None,
        };
        assert_eq!(next_action(&alarm).map(|(s, _)| s), Some(AlarmStatus::Acknowledged));
        alarm.status = AlarmStatus::Acknowledged;
        assert_eq!(next_action(&alarm).map(|(s, _)| s), Some(AlarmStatus::Resolved));
        alarm.status = AlarmStatus::Resolved;
        assert_eq!(next_action(&alarm), None);
    }
}
