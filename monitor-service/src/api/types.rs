use std::collections::BTreeMap;

use energy_client::Reading;
use serde::Serialize;

use super::loghistory::{ApiLogEntry, DailyStats, PowerLogEntry};

/// Body for data-layer failures on the JSON endpoints (shipped with HTTP
/// 200; see the error-policy note in DESIGN.md).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub energy_monitor_log: bool,
    pub api_log: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<Reading>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PowerLogResponse {
    pub data: Vec<PowerLogEntry>,
    pub count: usize,
    pub file_size: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiLogResponse {
    pub data: Vec<ApiLogEntry>,
    pub count: usize,
    pub file_size: u64,
}

#[derive(Debug, Serialize)]
pub struct LogFileSummary {
    pub exists: bool,
    pub size_bytes: u64,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct LogsSummaryResponse {
    pub energy_monitor: LogFileSummary,
    pub api: LogFileSummary,
}

#[derive(Debug, Serialize)]
pub struct HistoricalDataResponse {
    pub days: i64,
    pub count: usize,
    pub data: Vec<PowerLogEntry>,
    pub daily_stats: BTreeMap<String, DailyStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_serializes_without_absent_appliance_fields() {
        let reading = Reading {
            timestamp: "2024-01-15 14:30:25".to_string(),
            watts: 43.5,
            appliance_id: None,
            appliance_name: None,
        };

        let json = serde_json::to_value(&reading).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"timestamp": "2024-01-15 14:30:25", "watts": 43.5})
        );
    }

    #[test]
    fn history_response_wraps_rows_under_data() {
        let body = HistoryResponse {
            data: vec![Reading {
                timestamp: "2024-01-15 14:30:25".to_string(),
                watts: 43.5,
                appliance_id: Some(1),
                appliance_name: Some("Main Appliance".to_string()),
            }],
            count: 1,
        };

        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["appliance_name"], "Main Appliance");
    }

    #[test]
    fn summary_response_has_one_section_per_log_file() {
        let body = LogsSummaryResponse {
            energy_monitor: LogFileSummary { exists: true, size_bytes: 42, records: 1 },
            api: LogFileSummary { exists: false, size_bytes: 0, records: 0 },
        };

        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["energy_monitor"]["records"], 1);
        assert_eq!(json["api"]["exists"], false);
    }
}
