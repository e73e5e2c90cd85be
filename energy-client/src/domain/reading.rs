use serde::{Deserialize, Serialize};

/// One sampled power measurement as stored in the `usage` table.
///
/// The appliance columns only exist after the schema migration has run;
/// rows read from an unmigrated database carry `None` for both.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    pub timestamp: String,
    pub watts: f64,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_id: Option<i64>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance_name: Option<String>,
}
