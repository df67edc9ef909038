//! Plain-text reports for the headless commands.
//!
//! Formatting lives here so the store and session code stay free of
//! presentation concerns.

use crate::domain::{Parameter, format_value};
use crate::fit::{SessionState, TickReport};
use crate::mask::MaskManager;

/// Parameter table: name, value, bounds and frozen flag, one row per parameter.
pub fn format_param_table(params: &[Parameter]) -> String {
    let name_w = params
        .iter()
        .map(|p| p.full_name.len())
        .max()
        .unwrap_or(0)
        .max("Parameter".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_w$}  {:>12}  {:>12}  {:>12}  {}\n",
        "Parameter", "Value", "Min", "Max", "Fit"
    ));
    out.push_str(&format!("{}\n", "-".repeat(name_w + 2 + 12 * 3 + 4 + 2 + 3)));
    for p in params {
        out.push_str(&format!(
            "{:<name_w$}  {:>12}  {:>12}  {:>12}  {}\n",
            p.full_name,
            format_value(&p.fmt, p.val),
            format_value(&p.fmt, p.min),
            format_value(&p.fmt, p.max),
            if p.frozen { "frozen" } else { "thawed" },
        ));
    }
    out
}

pub fn format_masks(masks: &MaskManager) -> String {
    if masks.is_empty() {
        return "Mask: none\n".to_string();
    }
    let mut out = format!("Mask: {} interval(s)\n", masks.len());
    for i in masks.intervals() {
        out.push_str(&format!("  {} .. {}\n", i.start_date, i.stop_date));
    }
    out
}

/// One-line progress summary for a poll tick.
pub fn format_tick(report: &TickReport, params: &[Parameter]) -> String {
    let mut line = format!(
        "[{}] consumed={} malformed={}",
        report.state.label(),
        report.consumed,
        report.malformed
    );
    if report.applied.is_some() {
        let vals: Vec<String> = params
            .iter()
            .filter(|p| !p.frozen)
            .map(|p| format!("{}={}", p.full_name, format_value(&p.fmt, p.val)))
            .collect();
        line.push_str(&format!(" | {}", vals.join(" ")));
    }
    line
}

pub fn format_outcome(state: SessionState) -> String {
    match state {
        SessionState::Finished => "Fit finished.".to_string(),
        SessionState::Terminated => "Fit terminated; parameters hold the last reported values.".to_string(),
        SessionState::Running | SessionState::Idle => format!("Fit {}.", state.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStatus, MaskInterval, parse_date};

    #[test]
    fn table_lists_every_parameter_with_its_format() {
        let params = vec![
            Parameter::new("solarheat__tank__P_60", 0.5, 0.0, 1.0),
            Parameter::new("tau", 20.0, 5.0, 200.0).with_fmt("{:.2f}").frozen(true),
        ];
        let table = format_param_table(&params);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("solarheat__tank__P_60"));
        assert!(lines[2].ends_with("thawed"));
        assert!(lines[3].contains("20.00"));
        assert!(lines[3].contains("200.00"));
        assert!(lines[3].ends_with("frozen"));
    }

    #[test]
    fn masks_summary() {
        let mut masks = MaskManager::new();
        assert_eq!(format_masks(&masks), "Mask: none\n");
        masks.add(MaskInterval::new(
            parse_date("2020:001").unwrap(),
            parse_date("2020:002").unwrap(),
        ));
        let text = format_masks(&masks);
        assert!(text.contains("2020:001:00:00:00.000 .. 2020:002:00:00:00.000"));
    }

    #[test]
    fn tick_line_shows_thawed_values_when_applied() {
        let params = vec![
            Parameter::new("a", 1.5, 0.0, 2.0),
            Parameter::new("b", 1.0, 0.0, 2.0).frozen(true),
        ];
        let report = TickReport {
            consumed: 2,
            malformed: 0,
            applied: Some(FitStatus::Running),
            state: SessionState::Running,
        };
        let line = format_tick(&report, &params);
        assert!(line.starts_with("[running] consumed=2"));
        assert!(line.contains("a=1.5"));
        assert!(!line.contains("b="));
    }
}
