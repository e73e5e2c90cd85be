//! The two plaintext log-line formats shared by the sampler (writer) and the
//! API service (reader).
//!
//! The power-log line is a de facto wire contract: the literal tokens
//! `"Time: "`, `", Power: "` and `" W"` must survive any change here, or
//! every previously written log becomes unreadable to `/logs/energy-monitor`
//! and `/logs/historical-data`.

use once_cell::sync::Lazy;
use regex::Regex;

pub const POWER_LOG_FILE: &str = "energy_monitor.log";
pub const API_LOG_FILE: &str = "api.log";

static POWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Time: (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}), Power: (-?\d+(?:\.\d+)?) W$")
        .expect("power line pattern is valid")
});

static API_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})")
        .expect("api line pattern is valid")
});

/// Render one power-log line, watts with exactly two decimal places.
pub fn format_power_line(timestamp: &str, watts: f64) -> String {
    format!("Time: {timestamp}, Power: {watts:.2} W")
}

/// Parse one power-log line into `(timestamp, watts)`.
///
/// Returns `None` for anything that does not match the contract exactly;
/// callers skip such lines silently.
pub fn parse_power_line(line: &str) -> Option<(String, f64)> {
    let caps = POWER_LINE.captures(line.trim_end())?;
    let timestamp = caps.get(1)?.as_str().to_string();
    let watts: f64 = caps.get(2)?.as_str().parse().ok()?;
    Some((timestamp, watts))
}

/// Extract the leading timestamp from an API access-log line.
pub fn parse_api_line_timestamp(line: &str) -> Option<String> {
    let caps = API_LINE.captures(line)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Render one API access-log line.
pub fn format_api_line(timestamp: &str, client: &str, method: &str, path: &str, status: u16) -> String {
    format!("{timestamp} - {client} - {method} {path} HTTP/1.1 - {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_line_roundtrips_through_the_contract() {
        let line = format_power_line("2024-01-15 14:30:25", 43.5);
        assert_eq!(line, "Time: 2024-01-15 14:30:25, Power: 43.50 W");

        let (ts, watts) = parse_power_line(&line).expect("line must parse");
        assert_eq!(ts, "2024-01-15 14:30:25");
        assert_eq!(watts, 43.5);
    }

    #[test]
    fn power_line_formats_two_decimal_places() {
        assert_eq!(format_power_line("2024-01-15 15:30:25", 50.0), "Time: 2024-01-15 15:30:25, Power: 50.00 W");
        assert_eq!(format_power_line("2024-01-15 15:30:25", 0.456), "Time: 2024-01-15 15:30:25, Power: 0.46 W");
    }

    #[test]
    fn negative_watts_still_parse() {
        let (_, watts) = parse_power_line("Time: 2024-01-15 14:30:25, Power: -1.25 W").expect("parse");
        assert_eq!(watts, -1.25);
    }

    #[test]
    fn malformed_power_lines_are_rejected() {
        for line in [
            "",
            "Time: 2024-01-15 14:30:25",
            "Power: 43.50 W",
            "Time: 2024-01-15, Power: 43.50 W",
            "Time: 2024-01-15 14:30:25, Power: abc W",
            "time: 2024-01-15 14:30:25, power: 43.50 w",
            "Time: 2024-01-15 14:30:25, Power: 43.50",
        ] {
            assert!(parse_power_line(line).is_none(), "should reject {line:?}");
        }
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        assert!(parse_power_line("Time: 2024-01-15 14:30:25, Power: 43.50 W\n").is_some());
    }

    #[test]
    fn api_line_timestamp_extraction() {
        let line = format_api_line("2024-01-15 14:30:25", "192.168.1.100", "GET", "/energy", 200);
        assert_eq!(line, "2024-01-15 14:30:25 - 192.168.1.100 - GET /energy HTTP/1.1 - 200");
        assert_eq!(
            parse_api_line_timestamp(&line).as_deref(),
            Some("2024-01-15 14:30:25")
        );
        assert!(parse_api_line_timestamp("no timestamp here").is_none());
    }
}
