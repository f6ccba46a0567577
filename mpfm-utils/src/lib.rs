//! Shared formatting helpers for the dashboard and the CLI.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, Utc};

    /// Format a UTC timestamp as "YYYY-MM-DD HH:MM"
    pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Format an optional timestamp, "-" when missing
    pub fn format_optional(ts: Option<&DateTime<Utc>>) -> String {
        ts.map(format_timestamp).unwrap_or_else(|| "-".to_string())
    }

    /// Parse an RFC 3339 timestamp ("2024-05-01T08:30:00Z")
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
    }

    /// Human readable age of `then` relative to `now`, e.g. "5 min ago".
    /// Timestamps in the future read as "just now".
    pub fn format_age(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
        let seconds = (*now - *then).num_seconds();
        if seconds < 60 {
            "just now".to_string()
        } else if seconds < 3_600 {
            format!("{} min ago", seconds / 60)
        } else if seconds < 86_400 {
            format!("{} h ago", seconds / 3_600)
        } else {
            format!("{} d ago", seconds / 86_400)
        }
    }

}

/// Flow measurement units
pub mod units {
    /// Liquid rates (oil, water) in barrels per day
    pub const LIQUID_RATE_UNIT: &str = "bbl/d";
    /// Gas rate in thousand standard cubic feet per day
    pub const GAS_RATE_UNIT: &str = "Mscf/d";

    /// Format a rate with thousands separators and one decimal, e.g. "12,345.6 bbl/d"
    pub fn format_rate(value: f64, unit: &str) -> String {
        format!("{} {}", group_thousands(value, 1), unit)
    }

    /// Format a percentage with one decimal, e.g. "42.5 %"
    pub fn format_percent(value: f64) -> String {
        format!("{:.1} %", value)
    }

    fn group_thousands(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (formatted.as_str(), None),
        };
        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
            "-"
        } else {
            ""
        };
        match frac_part {
            Some(frac) => format!("{sign}{grouped}.{frac}"),
            None => format!("{sign}{grouped}"),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_rate() {
            assert_eq!(format_rate(12345.64, LIQUID_RATE_UNIT), "12,345.6 bbl/d");
            assert_eq!(format_rate(999.0, GAS_RATE_UNIT), "999.0 Mscf/d");
            assert_eq!(format_rate(1_000_000.0, LIQUID_RATE_UNIT), "1,000,000.0 bbl/d");
            assert_eq!(format_rate(-1500.0, LIQUID_RATE_UNIT), "-1,500.0 bbl/d");
            assert_eq!(format_rate(0.0, LIQUID_RATE_UNIT), "0.0 bbl/d");
        }

        #[test]
        fn test_format_percent() {
            assert_eq!(format_percent(42.46), "42.5 %");
        }
    }
}
