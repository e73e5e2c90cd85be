//! Read paths over the two log files: line parsing, time filtering, and
//! per-day aggregate statistics.

use std::collections::BTreeMap;

use energy_client::domain::timestamp;
use serde::Serialize;
use time::PrimitiveDateTime;

use crate::logfmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerLogEntry {
    pub timestamp: String,
    pub watts: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiLogEntry {
    pub timestamp: String,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub count: usize,
    pub avg_watts: f64,
    pub min_watts: f64,
    pub max_watts: f64,
}

/// Parse the power log. Lines that do not match the contract are skipped,
/// never reported.
pub fn parse_power_log(text: &str) -> Vec<PowerLogEntry> {
    text.lines()
        .filter_map(logfmt::parse_power_line)
        .map(|(timestamp, watts)| PowerLogEntry { timestamp, watts })
        .collect()
}

/// Parse the API access log: raw line text alongside its leading timestamp.
pub fn parse_api_log(text: &str) -> Vec<ApiLogEntry> {
    text.lines()
        .filter_map(|line| {
            logfmt::parse_api_line_timestamp(line).map(|timestamp| ApiLogEntry {
                timestamp,
                line: line.to_string(),
            })
        })
        .collect()
}

/// Keep entries sampled at or after `cutoff`. Entries whose timestamp fails
/// to parse are dropped along with the malformed lines before them.
pub fn filter_since(entries: Vec<PowerLogEntry>, cutoff: PrimitiveDateTime) -> Vec<PowerLogEntry> {
    entries
        .into_iter()
        .filter(|e| matches!(timestamp::parse_timestamp(&e.timestamp), Ok(ts) if ts >= cutoff))
        .collect()
}

/// Group entries by calendar date and compute count/avg/min/max watts.
///
/// Keys are `YYYY-MM-DD`; a `BTreeMap` keeps days in chronological order.
pub fn daily_stats(entries: &[PowerLogEntry]) -> BTreeMap<String, DailyStats> {
    struct Acc {
        count: usize,
        sum: f64,
        min: f64,
        max: f64,
    }

    let mut days: BTreeMap<String, Acc> = BTreeMap::new();
    for entry in entries {
        // Timestamps matched the line contract, so the first ten bytes are
        // the calendar date.
        let date = entry.timestamp.get(..10).unwrap_or(&entry.timestamp).to_string();
        let acc = days.entry(date).or_insert(Acc {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        });
        acc.count += 1;
        acc.sum += entry.watts;
        acc.min = acc.min.min(entry.watts);
        acc.max = acc.max.max(entry.watts);
    }

    days.into_iter()
        .map(|(date, acc)| {
            (
                date,
                DailyStats {
                    count: acc.count,
                    avg_watts: acc.sum / acc.count as f64,
                    min_watts: acc.min,
                    max_watts: acc.max,
                },
            )
        })
        .collect()
}
